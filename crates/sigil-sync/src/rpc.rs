//! JSON-RPC contract for the remote progression record.
//!
//! Method payloads reuse the serde-ready core types, which are already
//! wire-shaped (camelCase JSON). Invalid arguments are server-rejected with
//! standard invalid-params errors; the fail-soft mapping happens one layer
//! up in [`crate::client`].

use jsonrpsee::proc_macros::rpc;
use jsonrpsee::types::ErrorObjectOwned;

use sigil_core::leaderboard::LeaderboardEntry;
use sigil_core::types::{BirthData, Element, Profile, ProgressionDelta};

/// The progression JSON-RPC interface.
#[rpc(client, server)]
pub trait ProgressionRpc {
    /// Sets the user's display name.
    #[method(name = "setdisplayname")]
    async fn set_display_name(&self, name: String) -> Result<(), ErrorObjectOwned>;

    /// Adds experience; returns the updated cumulative total and rank.
    #[method(name = "addexperience")]
    async fn add_experience(&self, amount: u64) -> Result<ProgressionDelta, ErrorObjectOwned>;

    /// Mirrors the active talisman selection; `None` clears it.
    #[method(name = "setactivetalisman")]
    async fn set_active_talisman(&self, id: Option<String>) -> Result<(), ErrorObjectOwned>;

    /// Sets structured birth data on the profile.
    #[method(name = "setbirthdata")]
    async fn set_birth_data(&self, data: BirthData) -> Result<(), ErrorObjectOwned>;

    /// Returns the profile snapshot.
    #[method(name = "getprofile")]
    async fn get_profile(&self) -> Result<Profile, ErrorObjectOwned>;

    /// Records a ritual tagged with the given elements.
    #[method(name = "recordritual")]
    async fn record_ritual(
        &self,
        elements: Vec<Element>,
        xp_amount: u64,
    ) -> Result<ProgressionDelta, ErrorObjectOwned>;

    /// Records a meditation session; the server attributes the fixed
    /// per-minute experience conversion to the spirit element.
    #[method(name = "recordsession")]
    async fn record_session(&self, minutes: u64) -> Result<ProgressionDelta, ErrorObjectOwned>;

    /// Returns the materialized leaderboard, at most `limit` entries.
    #[method(name = "getleaderboard")]
    async fn get_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ErrorObjectOwned>;

    /// Rebuilds the server-side leaderboard cache.
    #[method(name = "refreshleaderboard")]
    async fn refresh_leaderboard(&self) -> Result<(), ErrorObjectOwned>;
}

/// Create a JSON-RPC invalid-params error.
pub(crate) fn invalid_params(msg: &str) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(-32602, msg.to_string(), None::<()>)
}
