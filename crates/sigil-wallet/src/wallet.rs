//! Wallet composition: the talisman collection and its invariants.
//!
//! Invariants enforced on every mutating operation:
//! - at most one talisman is master;
//! - the active id, if set, references an existing talisman (cleared in the
//!   same operation that removes its target);
//! - the master talisman is never removed by the delete operation.
//!
//! Every mutation updates in-memory state first, then mirrors the full
//! collection (and the active/seal flags independently) to local storage
//! best-effort. The in-memory state is the source of truth for the running
//! process; storage is a crash-recovery mirror.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use sigil_core::constants::{
    KEY_ACTIVE_TALISMAN, KEY_ONBOARDING_SEAL, KEY_WALLET, MASTER_ID_PREFIX, TALISMAN_ID_PREFIX,
};
use sigil_core::traits::KeyValueStore;
use sigil_core::types::{SavedTalisman, TalismanDraft};

use crate::error::WalletError;

/// The rune wallet: owned talismans, the active pointer, and the seal latch.
pub struct RuneWallet<S: KeyValueStore> {
    /// Insertion order is display order.
    talismans: Vec<SavedTalisman>,
    active_talisman_id: Option<String>,
    has_completed_onboarding_seal: bool,
    store: Arc<S>,
}

impl<S: KeyValueStore> RuneWallet<S> {
    /// Load wallet state from local storage, falling back to the declared
    /// defaults (empty wallet, nothing active, seal not completed) on any
    /// missing or corrupt value.
    pub fn load(store: Arc<S>) -> Self {
        let talismans = match store.get(KEY_WALLET) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<SavedTalisman>>(&blob) {
                Ok(talismans) => talismans,
                Err(e) => {
                    warn!(error = %e, "corrupt wallet collection, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read wallet collection, starting empty");
                Vec::new()
            }
        };

        let mut active_talisman_id = match store.get(KEY_ACTIVE_TALISMAN) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "failed to read active talisman id");
                None
            }
        };
        // A persisted active id that no longer resolves is dropped rather
        // than carried as a dangling reference.
        if let Some(id) = &active_talisman_id {
            if !talismans.iter().any(|t| &t.id == id) {
                warn!(id, "active talisman id does not resolve, clearing");
                active_talisman_id = None;
            }
        }

        let has_completed_onboarding_seal = match store.get(KEY_ONBOARDING_SEAL) {
            Ok(flag) => flag.as_deref() == Some("true"),
            Err(e) => {
                warn!(error = %e, "failed to read onboarding seal flag");
                false
            }
        };

        Self {
            talismans,
            active_talisman_id,
            has_completed_onboarding_seal,
            store,
        }
    }

    // --- reads ---

    /// All talismans in display order.
    pub fn talismans(&self) -> &[SavedTalisman] {
        &self.talismans
    }

    /// Id of the active talisman, if any.
    pub fn active_talisman_id(&self) -> Option<&str> {
        self.active_talisman_id.as_deref()
    }

    /// The active talisman, if any.
    pub fn active_talisman(&self) -> Option<&SavedTalisman> {
        let id = self.active_talisman_id.as_deref()?;
        self.talismans.iter().find(|t| t.id == id)
    }

    /// The master talisman, if one has been consecrated.
    pub fn master_talisman(&self) -> Option<&SavedTalisman> {
        self.talismans.iter().find(|t| t.is_master)
    }

    /// Whether the onboarding seal has been completed.
    pub fn has_completed_onboarding_seal(&self) -> bool {
        self.has_completed_onboarding_seal
    }

    // --- mutations ---

    /// Save a new talisman. Assigns a fresh id and creation timestamp and
    /// appends it; active and master pointers are untouched.
    pub fn save(&mut self, draft: TalismanDraft) -> String {
        let id = fresh_id(TALISMAN_ID_PREFIX);
        self.talismans.push(materialize(draft, id.clone(), false));
        info!(id, "talisman saved");
        self.persist_collection();
        id
    }

    /// Remove a talisman. Rejected for the master talisman (no state
    /// change). Clears the active pointer in the same operation when it
    /// referenced the removed entry.
    pub fn remove(&mut self, id: &str) -> Result<(), WalletError> {
        let index = self
            .talismans
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| WalletError::UnknownTalisman(id.to_string()))?;
        if self.talismans[index].is_master {
            return Err(WalletError::MasterImmutable);
        }

        self.talismans.remove(index);
        if self.active_talisman_id.as_deref() == Some(id) {
            self.active_talisman_id = None;
            self.persist_active();
        }
        self.persist_collection();
        Ok(())
    }

    /// Toggle the active talisman: clears it if `id` is already active,
    /// otherwise activates `id`. Unknown ids are rejected rather than set
    /// as a dangling reference.
    pub fn toggle_active(&mut self, id: &str) -> Result<(), WalletError> {
        if self.active_talisman_id.as_deref() == Some(id) {
            self.active_talisman_id = None;
        } else {
            if !self.talismans.iter().any(|t| t.id == id) {
                return Err(WalletError::UnknownTalisman(id.to_string()));
            }
            self.active_talisman_id = Some(id.to_string());
        }
        self.persist_active();
        Ok(())
    }

    /// Consecrate a new master talisman. Any existing master is demoted in
    /// place (it stays in the wallet as a normal entry), the new talisman
    /// is inserted at the front of display order with a reserved id prefix,
    /// and it always becomes the active talisman.
    pub fn set_master(&mut self, draft: TalismanDraft) -> String {
        for talisman in &mut self.talismans {
            talisman.is_master = false;
        }

        let id = fresh_id(MASTER_ID_PREFIX);
        self.talismans.insert(0, materialize(draft, id.clone(), true));
        self.active_talisman_id = Some(id.clone());
        info!(id, "master talisman consecrated");

        self.persist_collection();
        self.persist_active();
        id
    }

    /// One-way onboarding latch. There is no reversal operation.
    pub fn complete_seal(&mut self) {
        self.has_completed_onboarding_seal = true;
        if let Err(e) = self.store.put(KEY_ONBOARDING_SEAL, "true") {
            warn!(error = %e, "failed to persist onboarding seal");
        }
    }

    // --- persistence ---

    fn persist_collection(&self) {
        let blob = match serde_json::to_string(&self.talismans) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to serialize wallet collection");
                return;
            }
        };
        if let Err(e) = self.store.put(KEY_WALLET, &blob) {
            warn!(error = %e, "failed to persist wallet collection");
        }
    }

    fn persist_active(&self) {
        let result = match &self.active_talisman_id {
            Some(id) => self.store.put(KEY_ACTIVE_TALISMAN, id),
            None => self.store.delete(KEY_ACTIVE_TALISMAN),
        };
        if let Err(e) = result {
            warn!(error = %e, "failed to persist active talisman id");
        }
    }
}

/// Fill in the wallet-assigned fields of a draft.
fn materialize(draft: TalismanDraft, id: String, is_master: bool) -> SavedTalisman {
    SavedTalisman {
        id,
        name: draft.name,
        component_symbols: draft.component_symbols,
        keywords: draft.keywords,
        created_at: Utc::now(),
        is_master,
        intention: draft.intention,
        dignity_score_at_creation: draft.dignity_score_at_creation,
    }
}

/// Unique id: prefix, creation millis, and a random suffix to keep ids
/// distinct within the same millisecond.
fn fresh_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u16 = rand::random();
    format!("{prefix}{millis}-{suffix:04x}")
}
