use std::hash::{BuildHasher, DefaultHasher, Hash, Hasher};

/// Composite benchmark key: a 32-bit datum plus a text field.
///
/// Equality is structural over both fields. `Hash` writes the datum through
/// [`Hasher::write_u32`] and the text bytes through [`Hasher::write`] so
/// [`LayoutHasher`] can recover the two components.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Key {
    pub datum: u32,
    pub text: String,
}

impl Key {
    #[inline(always)]
    pub fn new(datum: u32, text: impl Into<String>) -> Self {
        Self {
            datum,
            text: text.into(),
        }
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.datum);
        state.write(self.text.as_bytes());
    }
}

/// How the 64-bit hash of a [`Key`] is assembled from its two components.
/// The two variants are bitwise mirror images.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitLayout {
    /// Text hash in the high 32 bits, datum in the low 32 bits.
    TextHigh,
    /// Datum in the high 32 bits, low 32 bits of the text hash below it.
    DatumHigh,
}

impl BitLayout {
    /// Combine the two hash components under this layout.
    #[inline(always)]
    pub const fn combine(self, datum: u32, text_hash: u64) -> u64 {
        match self {
            BitLayout::TextHigh => (text_hash & 0xFFFF_FFFF_0000_0000) | datum as u64,
            BitLayout::DatumHigh => ((datum as u64) << 32) | (text_hash & 0xFFFF_FFFF),
        }
    }

    /// Hash a key directly, without going through a map's `BuildHasher`.
    #[inline(always)]
    pub fn hash_key(self, key: &Key) -> u64 {
        let mut hasher = DefaultHasher::new();
        hasher.write(key.text.as_bytes());
        self.combine(key.datum, hasher.finish())
    }

    #[inline(always)]
    pub const fn label(self) -> &'static str {
        match self {
            BitLayout::TextHigh => "text-high",
            BitLayout::DatumHigh => "datum-high",
        }
    }
}

/// `BuildHasher` that hands maps the layout-combined hash of a [`Key`].
/// Both backends use the same one, so they see identical hash values per
/// key and differ only in bucket selection.
#[derive(Clone, Copy, Debug)]
pub struct LayoutBuild {
    layout: BitLayout,
}

impl LayoutBuild {
    #[inline(always)]
    pub const fn new(layout: BitLayout) -> Self {
        Self { layout }
    }
}

impl BuildHasher for LayoutBuild {
    type Hasher = LayoutHasher;

    #[inline(always)]
    fn build_hasher(&self) -> LayoutHasher {
        LayoutHasher {
            layout: self.layout,
            datum: 0,
            text: DefaultHasher::new(),
        }
    }
}

/// Hasher produced by [`LayoutBuild`]. Captures the datum from `write_u32`,
/// streams everything else into a [`DefaultHasher`], and recombines the two
/// halves in `finish`.
pub struct LayoutHasher {
    layout: BitLayout,
    datum: u32,
    text: DefaultHasher,
}

impl Hasher for LayoutHasher {
    #[inline(always)]
    fn finish(&self) -> u64 {
        self.layout.combine(self.datum, self.text.finish())
    }

    #[inline(always)]
    fn write(&mut self, bytes: &[u8]) {
        self.text.write(bytes);
    }

    #[inline(always)]
    fn write_u32(&mut self, i: u32) {
        self.datum = i;
    }
}
