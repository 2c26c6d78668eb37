//! # sigil-wallet
//! The rune wallet: user-created talismans with hard invariants.

pub mod error;
pub mod wallet;

pub use error::WalletError;
pub use wallet::RuneWallet;
