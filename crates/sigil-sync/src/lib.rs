//! # sigil-sync
//! The network boundary to the remote progression system-of-record.
//!
//! The remote owns [`ProgressionRecord`](sigil_core::types::ProgressionRecord)
//! and analytics; the client holds a read-through cache with no independent
//! authority. All calls are fail-soft: an unreachable server yields neutral
//! values, never an error surfaced to the end user.

pub mod client;
pub mod error;
pub mod rpc;
pub mod server;

pub use client::{NullRemote, RemoteClient};
pub use error::SyncError;
