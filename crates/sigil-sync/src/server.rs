//! In-memory reference implementation of the progression RPC server.
//!
//! The production system-of-record is an external service; this reference
//! server implements the same contract for integration tests and local
//! development. It is the authority for cumulative experience and the
//! leaderboard cache, which it rebuilds wholesale on demand.

use std::net::SocketAddr;

use jsonrpsee::core::async_trait;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::types::ErrorObjectOwned;
use parking_lot::Mutex;

use sigil_core::constants::SESSION_XP_PER_MINUTE;
use sigil_core::leaderboard::{LeaderboardCache, LeaderboardEntry, ProfileSnapshot};
use sigil_core::level;
use sigil_core::types::{BirthData, Element, Profile, ProgressionDelta};

use crate::error::SyncError;
use crate::rpc::{invalid_params, ProgressionRpcServer};

struct ServerState {
    profile: Profile,
    /// Other users' progression, as the system-of-record sees it.
    peers: Vec<ProfileSnapshot>,
    leaderboard: LeaderboardCache,
}

/// Single-profile in-memory progression server.
pub struct InMemoryProgressionServer {
    state: Mutex<ServerState>,
}

impl InMemoryProgressionServer {
    pub fn new() -> Self {
        Self::with_peers(Vec::new())
    }

    /// Seed the record with other users so leaderboard queries have content.
    pub fn with_peers(peers: Vec<ProfileSnapshot>) -> Self {
        Self {
            state: Mutex::new(ServerState {
                profile: Profile::default(),
                peers,
                leaderboard: LeaderboardCache::new(),
            }),
        }
    }

    /// Start serving on the given address; returns the bound address and a
    /// handle that stops the server when dropped or explicitly stopped.
    pub async fn serve(self, addr: &str) -> Result<(SocketAddr, ServerHandle), SyncError> {
        let server = Server::builder()
            .build(addr)
            .await
            .map_err(|e| SyncError::ServerBind(e.to_string()))?;
        let bound = server
            .local_addr()
            .map_err(|e| SyncError::ServerBind(e.to_string()))?;
        let handle = server.start(self.into_rpc());
        Ok((bound, handle))
    }

    fn apply_experience(&self, amount: u64) -> ProgressionDelta {
        let mut state = self.state.lock();
        state.profile.cumulative_experience =
            state.profile.cumulative_experience.saturating_add(amount);
        state.profile.rank = level::rank_for(state.profile.cumulative_experience);
        ProgressionDelta {
            cumulative_experience: state.profile.cumulative_experience,
            rank: state.profile.rank,
        }
    }

    fn rebuild_leaderboard(state: &mut ServerState) {
        let mut snapshots = state.peers.clone();
        snapshots.push(ProfileSnapshot {
            display_name: state.profile.display_name.clone(),
            cumulative_experience: state.profile.cumulative_experience,
        });
        state.leaderboard.rebuild(&snapshots);
    }
}

impl Default for InMemoryProgressionServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressionRpcServer for InMemoryProgressionServer {
    async fn set_display_name(&self, name: String) -> Result<(), ErrorObjectOwned> {
        self.state.lock().profile.display_name = name;
        Ok(())
    }

    async fn add_experience(&self, amount: u64) -> Result<ProgressionDelta, ErrorObjectOwned> {
        if amount == 0 {
            return Err(invalid_params("amount must be positive"));
        }
        Ok(self.apply_experience(amount))
    }

    async fn set_active_talisman(&self, id: Option<String>) -> Result<(), ErrorObjectOwned> {
        self.state.lock().profile.active_talisman_id = id;
        Ok(())
    }

    async fn set_birth_data(&self, data: BirthData) -> Result<(), ErrorObjectOwned> {
        self.state.lock().profile.birth_data = Some(data);
        Ok(())
    }

    async fn get_profile(&self) -> Result<Profile, ErrorObjectOwned> {
        Ok(self.state.lock().profile.clone())
    }

    async fn record_ritual(
        &self,
        elements: Vec<Element>,
        xp_amount: u64,
    ) -> Result<ProgressionDelta, ErrorObjectOwned> {
        if elements.is_empty() {
            return Err(invalid_params("ritual must name at least one element"));
        }
        if xp_amount == 0 {
            return Err(invalid_params("xp amount must be positive"));
        }
        Ok(self.apply_experience(xp_amount))
    }

    async fn record_session(&self, minutes: u64) -> Result<ProgressionDelta, ErrorObjectOwned> {
        if minutes == 0 {
            return Err(invalid_params("minutes must be positive"));
        }
        Ok(self.apply_experience(minutes.saturating_mul(SESSION_XP_PER_MINUTE)))
    }

    async fn get_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ErrorObjectOwned> {
        let mut state = self.state.lock();
        Self::rebuild_leaderboard(&mut state);
        Ok(state.leaderboard.entries().iter().take(limit).cloned().collect())
    }

    async fn refresh_leaderboard(&self) -> Result<(), ErrorObjectOwned> {
        let mut state = self.state.lock();
        Self::rebuild_leaderboard(&mut state);
        Ok(())
    }
}
