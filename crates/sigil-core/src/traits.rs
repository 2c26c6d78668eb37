//! Trait seams: local durable storage and the remote system-of-record.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::leaderboard::LeaderboardEntry;
use crate::types::{BirthData, Element, Profile, ProgressionDelta};

/// Local durable key-value storage.
///
/// Values are strings; structured values are stored as JSON blobs per the
/// storage key contract in [`crate::constants`]. A missing key reads as
/// `Ok(None)`, never as an error.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// The remote progression system-of-record.
///
/// All methods are fail-soft by contract: implementations log transport or
/// server failures and return a neutral value ([`ProgressionDelta::NEUTRAL`],
/// `None`, or an empty list) so callers always have a renderable result.
/// Argument validation (positive amounts, non-empty element sets) is the
/// caller's responsibility and happens before the wire call.
#[async_trait]
pub trait RemoteProgression: Send + Sync {
    /// Set the user's display name.
    async fn set_display_name(&self, name: &str);

    /// Add experience; returns the updated progression or the neutral value.
    async fn add_experience(&self, amount: u64) -> ProgressionDelta;

    /// Mirror the active talisman selection (`None` clears it).
    async fn set_active_talisman(&self, id: Option<&str>);

    /// Set structured birth data on the remote profile.
    async fn set_birth_data(&self, data: &BirthData);

    /// Fetch the remote profile snapshot, if reachable.
    async fn get_profile(&self) -> Option<Profile>;

    /// Record a ritual tagged with the given elements.
    async fn record_ritual(&self, elements: &[Element], xp_amount: u64) -> ProgressionDelta;

    /// Record a meditation session; the server attributes the fixed
    /// per-minute experience conversion.
    async fn record_session(&self, minutes: u64) -> ProgressionDelta;

    /// Fetch the materialized leaderboard (empty when unreachable).
    async fn get_leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry>;

    /// Ask the server to rebuild its leaderboard cache.
    async fn refresh_leaderboard(&self);
}
