//! The practice client: one facade wiring the engines together.
//!
//! Control flow for a completed ritual or session: the analytics aggregator
//! updates element counters and the day bucket, the amount lands on the
//! local cumulative-experience cache, rank is recomputed, and the mutation
//! is mirrored to the remote system-of-record fail-soft. The remote is the
//! authority: when it answers, its progression value replaces the local
//! cache; when it is unreachable the local optimistic value stands until the
//! next successful refresh.
//!
//! Wallet and grid operations are purely local-then-persisted and do not
//! touch the progression pipeline, except that active-talisman changes are
//! mirrored to the remote profile.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use sigil_analytics::aggregator::{AnalyticsAggregator, DayActivity};
use sigil_analytics::date::today_utc;
use sigil_core::constants::SESSION_XP_PER_MINUTE;
use sigil_core::error::{AnalyticsError, ProgressionError, StorageError};
use sigil_core::leaderboard::LeaderboardEntry;
use sigil_core::storage::FileStore;
use sigil_core::traits::{KeyValueStore, RemoteProgression};
use sigil_core::types::{
    AnalyticsRecord, BirthData, Element, Profile, ProgressionDelta, ProgressionRecord,
    TalismanDraft,
};
use sigil_grid::GridChargeEngine;
use sigil_sync::{NullRemote, RemoteClient, SyncError};
use sigil_wallet::{RuneWallet, WalletError};

use crate::config::ClientConfig;

/// Errors surfaced by client operations. All are caller errors or setup
/// failures; runtime I/O and sync failures are absorbed per the fail-soft
/// policy.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Result of a progression-bearing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionOutcome {
    pub cumulative_experience: u64,
    pub rank: u8,
    /// Whether this operation crossed a rank threshold.
    pub leveled_up: bool,
}

/// The client facade.
pub struct PracticeClient<S: KeyValueStore> {
    wallet: RuneWallet<S>,
    grid: GridChargeEngine<S>,
    analytics: AnalyticsRecord,
    progression: ProgressionRecord,
    remote: Arc<dyn RemoteProgression>,
}

impl PracticeClient<FileStore> {
    /// Open a client from configuration: file-backed storage under the data
    /// directory, remote sync when an endpoint is configured.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let store = Arc::new(FileStore::open(config.store_path())?);
        let remote: Arc<dyn RemoteProgression> = match &config.remote_url {
            Some(url) => Arc::new(RemoteClient::connect(url)?),
            None => Arc::new(NullRemote),
        };
        Ok(Self::open(store, remote))
    }
}

impl<S: KeyValueStore> PracticeClient<S> {
    /// Assemble a client over the given storage and remote collaborator.
    /// Loads wallet and grid state; grid decay is applied before any read.
    pub fn open(store: Arc<S>, remote: Arc<dyn RemoteProgression>) -> Self {
        let wallet = RuneWallet::load(Arc::clone(&store));
        let grid = GridChargeEngine::load(store);
        Self {
            wallet,
            grid,
            analytics: AnalyticsRecord::default(),
            progression: ProgressionRecord::default(),
            remote,
        }
    }

    // --- progression pipeline ---

    /// Record a completed ritual tagged with the given elements.
    ///
    /// Every named element receives the full experience amount; the amount
    /// also lands on daily activity and cumulative experience.
    pub async fn record_ritual(
        &mut self,
        elements: &[Element],
        xp_amount: u64,
    ) -> Result<ProgressionOutcome, ClientError> {
        let xp =
            AnalyticsAggregator::record_ritual(&mut self.analytics, elements, xp_amount, today_utc())?;
        let rank_before = self.progression.rank();
        self.progression.add_experience(xp)?;

        let delta = self.remote.record_ritual(elements, xp).await;
        self.adopt_remote(delta);

        Ok(self.outcome(rank_before))
    }

    /// Record a meditation session. Experience is the fixed per-minute
    /// conversion, attributed to the spirit element.
    pub async fn record_session(&mut self, minutes: u64) -> Result<ProgressionOutcome, ClientError> {
        // Convert before mutating anything so an overflowing request is
        // rejected with all counters untouched.
        let xp = minutes
            .checked_mul(SESSION_XP_PER_MINUTE)
            .ok_or(ProgressionError::ExperienceOverflow)?;
        AnalyticsAggregator::add_session_minutes(&mut self.analytics, minutes)?;
        AnalyticsAggregator::increment_element(&mut self.analytics, Element::Spirit, xp)?;
        AnalyticsAggregator::record_daily_activity(&mut self.analytics, xp, today_utc())?;

        let rank_before = self.progression.rank();
        self.progression.add_experience(xp)?;

        let delta = self.remote.record_session(minutes).await;
        self.adopt_remote(delta);

        Ok(self.outcome(rank_before))
    }

    /// Pull the remote profile and overwrite the local progression cache.
    /// The remote value wins on conflict; `None` when unreachable.
    pub async fn refresh_profile(&mut self) -> Option<Profile> {
        let profile = self.remote.get_profile().await?;
        debug!(
            xp = profile.cumulative_experience,
            "adopting remote progression"
        );
        self.progression.cumulative_experience = profile.cumulative_experience;
        Some(profile)
    }

    pub async fn set_display_name(&self, name: &str) {
        self.remote.set_display_name(name).await;
    }

    pub async fn set_birth_data(&self, data: &BirthData) {
        self.remote.set_birth_data(data).await;
    }

    pub async fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.remote.get_leaderboard(limit).await
    }

    pub async fn refresh_leaderboard(&self) {
        self.remote.refresh_leaderboard().await;
    }

    /// Local progression cache (read-through; remote is authoritative).
    pub fn progression(&self) -> &ProgressionRecord {
        &self.progression
    }

    /// Local analytics record.
    pub fn analytics(&self) -> &AnalyticsRecord {
        &self.analytics
    }

    /// Consistency heatmap ending today.
    pub fn heatmap(&self, days: u32) -> Result<Vec<DayActivity>, ClientError> {
        Ok(AnalyticsAggregator::heatmap_window(
            &self.analytics,
            days,
            today_utc(),
        )?)
    }

    // --- wallet ---

    pub fn wallet(&self) -> &RuneWallet<S> {
        &self.wallet
    }

    /// Save a talisman. Purely local; pointers are untouched.
    pub fn save_talisman(&mut self, draft: TalismanDraft) -> String {
        self.wallet.save(draft)
    }

    /// Remove a talisman; mirrors a cleared active selection when the
    /// removed entry was active.
    pub async fn remove_talisman(&mut self, id: &str) -> Result<(), ClientError> {
        let was_active = self.wallet.active_talisman_id() == Some(id);
        self.wallet.remove(id)?;
        if was_active {
            self.remote.set_active_talisman(None).await;
        }
        Ok(())
    }

    /// Toggle the active talisman and mirror the selection remotely.
    pub async fn toggle_active_talisman(&mut self, id: &str) -> Result<(), ClientError> {
        self.wallet.toggle_active(id)?;
        self.remote
            .set_active_talisman(self.wallet.active_talisman_id())
            .await;
        Ok(())
    }

    /// Consecrate a master talisman; it becomes active and the selection is
    /// mirrored remotely.
    pub async fn set_master_talisman(&mut self, draft: TalismanDraft) -> String {
        let id = self.wallet.set_master(draft);
        self.remote.set_active_talisman(Some(&id)).await;
        id
    }

    pub fn complete_seal(&mut self) {
        self.wallet.complete_seal();
    }

    // --- grid ---

    pub fn grid_charge(&self) -> u8 {
        self.grid.charge()
    }

    pub fn pledged_event(&self) -> Option<&str> {
        self.grid.pledged_event()
    }

    pub fn charge_grid(&mut self, amount: i64) {
        self.grid.add_charge(amount);
    }

    pub fn set_grid_max(&mut self) {
        self.grid.set_charge_max();
    }

    pub fn pledge(&mut self, event_ref: &str) {
        self.grid.pledge(event_ref);
    }

    pub fn unpledge(&mut self) {
        self.grid.unpledge();
    }

    // --- internals ---

    /// Adopt the remote progression value when the call succeeded. The
    /// neutral delta is indistinguishable from "no progress" by contract,
    /// so it never overwrites the local optimistic value.
    fn adopt_remote(&mut self, delta: ProgressionDelta) {
        if delta != ProgressionDelta::NEUTRAL {
            self.progression.cumulative_experience = delta.cumulative_experience;
        }
    }

    fn outcome(&self, rank_before: u8) -> ProgressionOutcome {
        let rank = self.progression.rank();
        ProgressionOutcome {
            cumulative_experience: self.progression.cumulative_experience,
            rank,
            leveled_up: rank > rank_before,
        }
    }
}
