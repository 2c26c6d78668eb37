//! Fail-soft implementations of [`RemoteProgression`].
//!
//! [`RemoteClient`] talks JSON-RPC over HTTP; any transport or server
//! failure is warn-logged and mapped to a neutral value so presentation
//! layers always have something renderable. [`NullRemote`] is the offline
//! collaborator used when no endpoint is configured.

use async_trait::async_trait;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use tracing::warn;

use sigil_core::leaderboard::LeaderboardEntry;
use sigil_core::traits::RemoteProgression;
use sigil_core::types::{BirthData, Element, Profile, ProgressionDelta};

use crate::error::SyncError;
use crate::rpc::ProgressionRpcClient;

/// JSON-RPC backed remote, fail-soft on every call.
pub struct RemoteClient {
    inner: HttpClient,
}

impl RemoteClient {
    /// Build a client for the given HTTP endpoint.
    pub fn connect(url: &str) -> Result<Self, SyncError> {
        let inner = HttpClientBuilder::default()
            .build(url)
            .map_err(|e| SyncError::InvalidEndpoint {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl RemoteProgression for RemoteClient {
    async fn set_display_name(&self, name: &str) {
        if let Err(e) = self.inner.set_display_name(name.to_string()).await {
            warn!(error = %e, "setdisplayname failed");
        }
    }

    async fn add_experience(&self, amount: u64) -> ProgressionDelta {
        match self.inner.add_experience(amount).await {
            Ok(delta) => delta,
            Err(e) => {
                warn!(error = %e, "addexperience failed, returning neutral");
                ProgressionDelta::NEUTRAL
            }
        }
    }

    async fn set_active_talisman(&self, id: Option<&str>) {
        if let Err(e) = self.inner.set_active_talisman(id.map(str::to_string)).await {
            warn!(error = %e, "setactivetalisman failed");
        }
    }

    async fn set_birth_data(&self, data: &BirthData) {
        if let Err(e) = self.inner.set_birth_data(data.clone()).await {
            warn!(error = %e, "setbirthdata failed");
        }
    }

    async fn get_profile(&self) -> Option<Profile> {
        match self.inner.get_profile().await {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "getprofile failed");
                None
            }
        }
    }

    async fn record_ritual(&self, elements: &[Element], xp_amount: u64) -> ProgressionDelta {
        match self.inner.record_ritual(elements.to_vec(), xp_amount).await {
            Ok(delta) => delta,
            Err(e) => {
                warn!(error = %e, "recordritual failed, returning neutral");
                ProgressionDelta::NEUTRAL
            }
        }
    }

    async fn record_session(&self, minutes: u64) -> ProgressionDelta {
        match self.inner.record_session(minutes).await {
            Ok(delta) => delta,
            Err(e) => {
                warn!(error = %e, "recordsession failed, returning neutral");
                ProgressionDelta::NEUTRAL
            }
        }
    }

    async fn get_leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        match self.inner.get_leaderboard(limit).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "getleaderboard failed, returning empty");
                Vec::new()
            }
        }
    }

    async fn refresh_leaderboard(&self) {
        if let Err(e) = self.inner.refresh_leaderboard().await {
            warn!(error = %e, "refreshleaderboard failed");
        }
    }
}

/// Offline remote: every call is a neutral no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRemote;

#[async_trait]
impl RemoteProgression for NullRemote {
    async fn set_display_name(&self, _name: &str) {}

    async fn add_experience(&self, _amount: u64) -> ProgressionDelta {
        ProgressionDelta::NEUTRAL
    }

    async fn set_active_talisman(&self, _id: Option<&str>) {}

    async fn set_birth_data(&self, _data: &BirthData) {}

    async fn get_profile(&self) -> Option<Profile> {
        None
    }

    async fn record_ritual(&self, _elements: &[Element], _xp_amount: u64) -> ProgressionDelta {
        ProgressionDelta::NEUTRAL
    }

    async fn record_session(&self, _minutes: u64) -> ProgressionDelta {
        ProgressionDelta::NEUTRAL
    }

    async fn get_leaderboard(&self, _limit: usize) -> Vec<LeaderboardEntry> {
        Vec::new()
    }

    async fn refresh_leaderboard(&self) {}
}
