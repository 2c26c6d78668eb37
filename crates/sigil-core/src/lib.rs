//! # sigil-core
//! Foundation types and pure engines for the Sigil progression tracker.

pub mod constants;
pub mod error;
pub mod leaderboard;
pub mod level;
pub mod power;
pub mod storage;
pub mod traits;
pub mod types;
