//! Wallet error types.
//!
//! These are caller errors and surface synchronously. Storage write failures
//! are not errors at this layer; they are logged and swallowed, with the
//! in-memory wallet staying authoritative for the session.

use thiserror::Error;

/// Errors that can occur in wallet operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The master talisman cannot be removed.
    #[error("master talisman cannot be removed")]
    MasterImmutable,

    /// The referenced talisman does not exist in the wallet.
    #[error("unknown talisman: {0}")]
    UnknownTalisman(String),
}
