//! Sync error types.
use thiserror::Error;

/// Errors constructing or binding the RPC boundary. Runtime call failures
/// are not represented here; they are absorbed by the fail-soft client.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("server bind failed: {0}")]
    ServerBind(String),
}
