//! # sigil-client
//! Composition of the Sigil engines into a single client facade.

pub mod client;
pub mod config;

pub use client::{ClientError, PracticeClient, ProgressionOutcome};
pub use config::ClientConfig;
