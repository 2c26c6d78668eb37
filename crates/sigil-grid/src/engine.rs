//! Grid charge state machine.
//!
//! One decaying scalar in `[0, 100]` representing collective engagement.
//! Charge drops by a fixed amount for every full 24-hour period since the
//! last update; decay is idempotent within a period and catches up all
//! missed periods in one application. Decay must be applied on load before
//! the charge is ever displayed, so stale state is never shown un-decayed;
//! [`GridChargeEngine::load`] does this unconditionally.
//!
//! Every mutation updates in-memory state first and then mirrors the full
//! state to local storage best-effort; a failed write is logged and the
//! in-memory state stays authoritative for the session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use sigil_core::constants::{
    CHARGE_DECAY_PERIOD_HOURS, CHARGE_DECAY_PER_PERIOD, CHARGE_MAX, KEY_GRID_STATE,
};
use sigil_core::traits::KeyValueStore;
use sigil_core::types::GridState;

/// The grid charge engine: in-memory state plus a storage mirror.
pub struct GridChargeEngine<S: KeyValueStore> {
    state: GridState,
    store: Arc<S>,
}

impl<S: KeyValueStore> GridChargeEngine<S> {
    /// Load persisted grid state, falling back to the default on a missing
    /// or corrupt blob, then apply any pending decay before returning.
    pub fn load(store: Arc<S>) -> Self {
        let state = match store.get(KEY_GRID_STATE) {
            Ok(Some(blob)) => match serde_json::from_str::<GridState>(&blob) {
                Ok(state) => state,
                Err(e) => {
                    warn!(error = %e, "corrupt grid state, using defaults");
                    GridState::default()
                }
            },
            Ok(None) => GridState::default(),
            Err(e) => {
                warn!(error = %e, "failed to read grid state, using defaults");
                GridState::default()
            }
        };

        let mut engine = Self { state, store };
        engine.apply_decay(Utc::now());
        engine
    }

    /// Current charge in `[0, 100]`.
    pub fn charge(&self) -> u8 {
        self.state.charge
    }

    /// Event the user has pledged to, if any.
    pub fn pledged_event(&self) -> Option<&str> {
        self.state.pledged_event_id.as_deref()
    }

    /// Snapshot of the full grid state.
    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Add (or subtract) charge, clamped to `[0, 100]`, and restart the
    /// decay clock.
    pub fn add_charge(&mut self, amount: i64) {
        self.add_charge_at(amount, Utc::now());
    }

    /// Shortcut to full charge.
    pub fn set_charge_max(&mut self) {
        self.add_charge(CHARGE_MAX as i64);
    }

    /// Pledge to an external event. No charge side effect.
    pub fn pledge(&mut self, event_ref: &str) {
        self.state.pledged_event_id = Some(event_ref.to_string());
        self.persist();
    }

    /// Clear any pledge. No charge side effect.
    pub fn unpledge(&mut self) {
        self.state.pledged_event_id = None;
        self.persist();
    }

    /// Apply passive decay for every full period elapsed since the last
    /// update. A no-op inside the current period; catches up all missed
    /// periods at once. Negative elapsed time (clock skew) decays nothing.
    pub fn apply_decay(&mut self, now: DateTime<Utc>) {
        let hours_elapsed = (now - self.state.last_charge_update).num_hours();
        let periods = if hours_elapsed > 0 {
            hours_elapsed / CHARGE_DECAY_PERIOD_HOURS
        } else {
            0
        };
        if periods == 0 {
            return;
        }

        let loss = (periods as u64).saturating_mul(CHARGE_DECAY_PER_PERIOD as u64);
        let decayed = (self.state.charge as u64).saturating_sub(loss) as u8;
        debug!(periods, from = self.state.charge, to = decayed, "grid charge decayed");
        self.state.charge = decayed;
        self.state.last_charge_update = now;
        self.persist();
    }

    /// Test seam: `add_charge` with an explicit clock.
    pub fn add_charge_at(&mut self, amount: i64, now: DateTime<Utc>) {
        let next = (self.state.charge as i64 + amount).clamp(0, CHARGE_MAX as i64);
        self.state.charge = next as u8;
        self.state.last_charge_update = now;
        self.persist();
    }

    /// Best-effort mirror of the in-memory state into local storage.
    fn persist(&self) {
        let blob = match serde_json::to_string(&self.state) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to serialize grid state");
                return;
            }
        };
        if let Err(e) = self.store.put(KEY_GRID_STATE, &blob) {
            warn!(error = %e, "failed to persist grid state");
        }
    }
}
