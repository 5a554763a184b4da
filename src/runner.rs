use std::collections::HashMap;
use std::hash::BuildHasher;
use std::time::{Duration, Instant};

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::bucket_map::BucketMap;
use crate::key::{BitLayout, Key, LayoutBuild};

/// Text shared by every generated key. It never varies, so the text hash is
/// a constant and the half of the word it occupies carries no entropy.
pub const SHARED_TEXT: &str = "all elements share the same text";

/// Seed for the datum stream. The generator is reconstructed from this seed
/// at the start of every population pass, so every iteration and every
/// backend/layout combination inserts the identical key sequence.
const DATUM_SEED: u64 = 0xC0FFEE;

/// Iteration and element counts for one benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct RunConfig {
    /// Timed population passes per backend/layout combination.
    pub iterations: u32,
    /// Keys inserted per pass.
    pub elements: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 5,
            elements: 20_000,
        }
    }
}

/// The associative-container contract the timing loop drives.
pub trait MapUnderTest {
    fn insert_key(&mut self, key: Key, value: u8);
    fn clear_all(&mut self);
    fn entry_count(&self) -> usize;
}

impl<S: BuildHasher> MapUnderTest for HashMap<Key, u8, S> {
    #[inline(always)]
    fn insert_key(&mut self, key: Key, value: u8) {
        self.insert(key, value);
    }

    #[inline(always)]
    fn clear_all(&mut self) {
        self.clear();
    }

    #[inline(always)]
    fn entry_count(&self) -> usize {
        self.len()
    }
}

impl<S: BuildHasher> MapUnderTest for BucketMap<Key, u8, S> {
    #[inline(always)]
    fn insert_key(&mut self, key: Key, value: u8) {
        self.insert(key, value);
    }

    #[inline(always)]
    fn clear_all(&mut self) {
        self.clear();
    }

    #[inline(always)]
    fn entry_count(&self) -> usize {
        self.len()
    }
}

/// Insert `elements` keys sharing [`SHARED_TEXT`] with seeded-random datum
/// values, storing `index % 256` per key. Does not clear the map first;
/// clearing between passes is the caller's job.
pub fn populate(map: &mut impl MapUnderTest, elements: u32) {
    let mut rng = StdRng::seed_from_u64(DATUM_SEED);
    for i in 0..elements {
        let key = Key::new(rng.random(), SHARED_TEXT);
        map.insert_key(key, (i % 256) as u8);
    }
}

/// Durations collected from one backend/layout trial.
#[derive(Clone, Debug)]
pub struct Trial {
    /// One elapsed wall-clock duration per iteration, in order.
    pub durations: Vec<Duration>,
    /// Sum of all iteration durations.
    pub total: Duration,
}

impl Trial {
    pub fn average(&self) -> Duration {
        if self.durations.is_empty() {
            Duration::ZERO
        } else {
            self.total / self.durations.len() as u32
        }
    }
}

/// Time `iterations` populate/clear cycles against an already-constructed
/// (and possibly pre-sized) map, printing per-iteration progress and the
/// total/average afterwards.
pub fn run_trial(map: &mut impl MapUnderTest, cfg: RunConfig) -> Trial {
    debug!(
        "trial: {} iterations of {} elements",
        cfg.iterations, cfg.elements
    );
    let mut durations = Vec::with_capacity(cfg.iterations as usize);

    for i in 0..cfg.iterations {
        let start = Instant::now();
        populate(map, cfg.elements);
        map.clear_all();
        let elapsed = start.elapsed();
        durations.push(elapsed);
        println!(
            "Iteration {i} started... ended. Duration: {}",
            elapsed.as_secs_f64()
        );
    }

    let total: Duration = durations.iter().sum();
    println!(
        "Total duration: {}; Average duration: {}",
        total.as_secs_f64(),
        total.as_secs_f64() / cfg.iterations as f64
    );

    Trial { durations, total }
}

fn run_std_trial(layout: BitLayout, cfg: RunConfig) -> Trial {
    println!("-- std HashMap, {} layout --", layout.label());
    let mut map: HashMap<Key, u8, LayoutBuild> =
        HashMap::with_capacity_and_hasher(cfg.elements as usize, LayoutBuild::new(layout));
    run_trial(&mut map, cfg)
}

fn run_bucket_trial(layout: BitLayout, cfg: RunConfig) -> Trial {
    println!("-- BucketMap, {} layout --", layout.label());
    let mut map: BucketMap<Key, u8, LayoutBuild> =
        BucketMap::with_capacity_and_hasher(cfg.elements as usize, LayoutBuild::new(layout));
    run_trial(&mut map, cfg)
}

/// Total runtimes for the four backend × layout combinations.
#[derive(Clone, Copy, Debug)]
pub struct Comparison {
    pub cfg: RunConfig,
    pub std_text_high: Duration,
    pub bucket_text_high: Duration,
    pub std_datum_high: Duration,
    pub bucket_datum_high: Duration,
}

impl Comparison {
    /// BucketMap-over-std runtime ratio for the text-high layout.
    pub fn ratio_text_high(&self) -> f64 {
        self.bucket_text_high.as_secs_f64() / self.std_text_high.as_secs_f64()
    }

    /// BucketMap-over-std runtime ratio for the datum-high layout.
    pub fn ratio_datum_high(&self) -> f64 {
        self.bucket_datum_high.as_secs_f64() / self.std_datum_high.as_secs_f64()
    }

    fn print_summary(&self) {
        println!("Number of iterations {}", self.cfg.iterations);
        println!(
            "Number of elements handled per iteration {}",
            self.cfg.elements
        );
        println!(
            "std HashMap runtime - text-high layout: {}",
            self.std_text_high.as_secs_f64()
        );
        println!(
            "BucketMap runtime - text-high layout: {}",
            self.bucket_text_high.as_secs_f64()
        );
        println!("Ratio (BucketMap/std): {}", self.ratio_text_high());
        println!(
            "std HashMap runtime - datum-high layout: {}",
            self.std_datum_high.as_secs_f64()
        );
        println!(
            "BucketMap runtime - datum-high layout: {}",
            self.bucket_datum_high.as_secs_f64()
        );
        println!("Ratio (BucketMap/std): {}", self.ratio_datum_high());
    }
}

/// Run all four backend × layout trials and print the summary block.
pub fn run_comparison(cfg: RunConfig) -> Comparison {
    let bucket_text_high = run_bucket_trial(BitLayout::TextHigh, cfg).total;
    let std_text_high = run_std_trial(BitLayout::TextHigh, cfg).total;
    let bucket_datum_high = run_bucket_trial(BitLayout::DatumHigh, cfg).total;
    let std_datum_high = run_std_trial(BitLayout::DatumHigh, cfg).total;

    let comparison = Comparison {
        cfg,
        std_text_high,
        bucket_text_high,
        std_datum_high,
        bucket_datum_high,
    };
    comparison.print_summary();
    comparison
}
