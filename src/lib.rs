//! Micro-benchmark for hash-bit-layout pathology in hash tables.
//!
//! Every key in this benchmark shares one text value, so the text hash is a
//! constant; only the 32-bit datum carries entropy. The two [`BitLayout`]
//! variants place that entropy in opposite halves of the 64-bit hash, and
//! the two backends select buckets from opposite ends of it:
//! `std::collections::HashMap` masks the low-order bits, [`BucketMap`]
//! shifts down the high-order bits. Whichever backend's selection bits land
//! on the constant half collapses into a handful of buckets, and the
//! populate/clear timings show it.

pub mod bucket_map;
pub mod key;
pub mod runner;

pub use bucket_map::BucketMap;
pub use key::{BitLayout, Key, LayoutBuild, LayoutHasher};
pub use runner::{
    populate, run_comparison, run_trial, Comparison, MapUnderTest, RunConfig, Trial, SHARED_TEXT,
};
