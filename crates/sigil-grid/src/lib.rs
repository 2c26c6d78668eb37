//! # sigil-grid
//! The collective grid charge: a single 0–100 scalar with passive decay.

pub mod engine;

pub use engine::GridChargeEngine;
