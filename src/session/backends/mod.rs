//! Tracking backend implementations.
//!
//! Real platform backends live behind the `TrackingBackend` trait in
//! embedder crates; this crate ships the synthetic backend used by
//! tests and the demo binary.

mod synthetic;

pub use synthetic::{SyntheticBackend, SyntheticScene};
