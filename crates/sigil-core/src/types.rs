//! Core data model: elements, talismans, progression and analytics records.
//!
//! Wire/storage formats are JSON with camelCase field names; the shapes here
//! must stay compatible with the persisted blobs described in the storage
//! key contract (see [`crate::constants`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::CHARGE_DEFAULT;
use crate::error::{ElementParseError, ProgressionError};
use crate::level;

/// One of the five fixed elemental categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Air,
    Water,
    Earth,
    Spirit,
}

impl Element {
    /// All elements in canonical display order.
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Air,
        Element::Water,
        Element::Earth,
        Element::Spirit,
    ];

    /// Lowercase canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Air => "air",
            Element::Water => "water",
            Element::Earth => "earth",
            Element::Spirit => "spirit",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Element {
    type Err = ElementParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fire" => Ok(Element::Fire),
            "air" => Ok(Element::Air),
            "water" => Ok(Element::Water),
            "earth" => Ok(Element::Earth),
            "spirit" => Ok(Element::Spirit),
            other => Err(ElementParseError(other.to_string())),
        }
    }
}

/// Per-element experience counters.
///
/// One fixed field per element so the compiler checks exhaustiveness; there
/// is no runtime string-key dispatch into this structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTotals {
    pub fire: u64,
    pub air: u64,
    pub water: u64,
    pub earth: u64,
    pub spirit: u64,
}

impl ElementTotals {
    /// Counter for the given element.
    pub fn get(&self, element: Element) -> u64 {
        match element {
            Element::Fire => self.fire,
            Element::Air => self.air,
            Element::Water => self.water,
            Element::Earth => self.earth,
            Element::Spirit => self.spirit,
        }
    }

    /// Add to the given element's counter (saturating).
    pub fn add(&mut self, element: Element, amount: u64) {
        let slot = match element {
            Element::Fire => &mut self.fire,
            Element::Air => &mut self.air,
            Element::Water => &mut self.water,
            Element::Earth => &mut self.earth,
            Element::Spirit => &mut self.spirit,
        };
        *slot = slot.saturating_add(amount);
    }
}

/// A user-composed talisman as stored in the wallet collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTalisman {
    /// Opaque unique id. Master talismans carry a reserved prefix.
    pub id: String,
    pub name: String,
    /// Glyphs composing the talisman. Order matters for rendering only.
    pub component_symbols: Vec<String>,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub is_master: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dignity_score_at_creation: Option<i32>,
}

/// User-supplied fields for creating a talisman. Id, timestamp, and master
/// flag are assigned by the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalismanDraft {
    pub name: String,
    pub component_symbols: Vec<String>,
    pub keywords: Vec<String>,
    pub intention: Option<String>,
    pub dignity_score_at_creation: Option<i32>,
}

/// Collective grid engagement state, persisted locally as a JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridState {
    /// Current charge in [0, 100].
    pub charge: u8,
    /// Instant of the last charge mutation or applied decay.
    pub last_charge_update: DateTime<Utc>,
    /// External event the user has pledged to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pledged_event_id: Option<String>,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            charge: CHARGE_DEFAULT,
            last_charge_update: Utc::now(),
            pledged_event_id: None,
        }
    }
}

/// Cumulative-experience record. Rank is always derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionRecord {
    pub cumulative_experience: u64,
}

impl ProgressionRecord {
    /// Current rank, recomputed from cumulative experience on every read.
    pub fn rank(&self) -> u8 {
        level::rank_for(self.cumulative_experience)
    }

    /// Display title for the current rank.
    pub fn title(&self) -> &'static str {
        level::title_for_rank(self.rank())
    }

    /// Fraction of progress toward the next rank, in [0, 1].
    pub fn progress_to_next(&self) -> f64 {
        level::progress_to_next(self.cumulative_experience)
    }

    /// Add experience. Zero is a caller error; overflow is rejected rather
    /// than wrapped.
    pub fn add_experience(&mut self, amount: u64) -> Result<(), ProgressionError> {
        if amount == 0 {
            return Err(ProgressionError::NonPositiveAmount);
        }
        self.cumulative_experience = self
            .cumulative_experience
            .checked_add(amount)
            .ok_or(ProgressionError::ExperienceOverflow)?;
        Ok(())
    }
}

/// Per-user analytics counters plus the daily-activity map.
///
/// Mutated only by additive increments; counters never decrease. The
/// daily-activity map is keyed by canonical `YYYY-MM-DD` strings; absent
/// keys mean zero for that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRecord {
    #[serde(flatten)]
    pub element_totals: ElementTotals,
    pub total_session_minutes: u64,
    pub rituals_performed_count: u64,
    #[serde(default)]
    pub daily_activity: BTreeMap<String, u64>,
}

/// Structured birth data mirrored to the remote record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthData {
    pub date: String,
    pub time: Option<String>,
    pub place: Option<String>,
}

/// Remote profile snapshot returned by the system-of-record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub display_name: String,
    pub cumulative_experience: u64,
    pub rank: u8,
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_talisman_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_data: Option<BirthData>,
}

/// Progression result returned by remote experience mutations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionDelta {
    pub cumulative_experience: u64,
    pub rank: u8,
}

impl ProgressionDelta {
    /// The fail-soft value returned when the remote is unreachable. Callers
    /// that must distinguish "no progress" from "call failed" cannot; this
    /// is a documented limitation of the sync contract.
    pub const NEUTRAL: ProgressionDelta = ProgressionDelta {
        cumulative_experience: 0,
        rank: 0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Element ---

    #[test]
    fn element_roundtrip_str() {
        for e in Element::ALL {
            assert_eq!(e.as_str().parse::<Element>().unwrap(), e);
        }
    }

    #[test]
    fn element_parse_case_insensitive() {
        assert_eq!("FIRE".parse::<Element>().unwrap(), Element::Fire);
        assert_eq!("Spirit".parse::<Element>().unwrap(), Element::Spirit);
    }

    #[test]
    fn element_parse_unknown_fails() {
        let err = "aether".parse::<Element>().unwrap_err();
        assert_eq!(err.to_string(), "unknown element: aether");
    }

    #[test]
    fn element_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Element::Earth).unwrap(), "\"earth\"");
    }

    // --- ElementTotals ---

    #[test]
    fn totals_add_and_get() {
        let mut t = ElementTotals::default();
        t.add(Element::Fire, 25);
        t.add(Element::Fire, 5);
        t.add(Element::Spirit, 10);
        assert_eq!(t.get(Element::Fire), 30);
        assert_eq!(t.get(Element::Spirit), 10);
        assert_eq!(t.get(Element::Water), 0);
    }

    #[test]
    fn totals_add_saturates() {
        let mut t = ElementTotals::default();
        t.add(Element::Air, u64::MAX);
        t.add(Element::Air, 1);
        assert_eq!(t.get(Element::Air), u64::MAX);
    }

    // --- ProgressionRecord ---

    #[test]
    fn rank_derived_from_xp() {
        let mut rec = ProgressionRecord::default();
        assert_eq!(rec.rank(), 0);
        rec.add_experience(100).unwrap();
        assert_eq!(rec.rank(), 1);
        assert_eq!(rec.title(), "Zelator");
    }

    #[test]
    fn zero_experience_rejected() {
        let mut rec = ProgressionRecord::default();
        assert_eq!(
            rec.add_experience(0),
            Err(ProgressionError::NonPositiveAmount)
        );
    }

    #[test]
    fn experience_overflow_rejected() {
        let mut rec = ProgressionRecord {
            cumulative_experience: u64::MAX,
        };
        assert_eq!(
            rec.add_experience(1),
            Err(ProgressionError::ExperienceOverflow)
        );
        // State unchanged on rejection.
        assert_eq!(rec.cumulative_experience, u64::MAX);
    }

    // --- GridState ---

    #[test]
    fn grid_default_charge() {
        let g = GridState::default();
        assert_eq!(g.charge, CHARGE_DEFAULT);
        assert!(g.pledged_event_id.is_none());
    }

    #[test]
    fn grid_state_wire_format() {
        let g = GridState {
            charge: 80,
            last_charge_update: "2026-03-01T00:00:00Z".parse().unwrap(),
            pledged_event_id: Some("equinox-2026".into()),
        };
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["charge"], 80);
        assert_eq!(json["pledgedEventId"], "equinox-2026");
        assert!(json.get("lastChargeUpdate").is_some());

        let back: GridState = serde_json::from_value(json).unwrap();
        assert_eq!(back, g);
    }

    // --- AnalyticsRecord ---

    #[test]
    fn analytics_wire_format_flattens_elements() {
        let mut rec = AnalyticsRecord::default();
        rec.element_totals.add(Element::Water, 40);
        rec.daily_activity.insert("2026-03-01".into(), 40);

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["water"], 40);
        assert_eq!(json["fire"], 0);
        assert_eq!(json["dailyActivity"]["2026-03-01"], 40);
        // Absent days imply zero: only the populated key is serialized.
        assert_eq!(json["dailyActivity"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn analytics_deserializes_missing_daily_activity() {
        let rec: AnalyticsRecord = serde_json::from_str(
            r#"{"fire":1,"air":0,"water":0,"earth":0,"spirit":2,
                "totalSessionMinutes":10,"ritualsPerformedCount":1}"#,
        )
        .unwrap();
        assert!(rec.daily_activity.is_empty());
        assert_eq!(rec.element_totals.spirit, 2);
    }

    // --- SavedTalisman ---

    #[test]
    fn talisman_wire_format_camel_case() {
        let t = SavedTalisman {
            id: "tal-1".into(),
            name: "Ward of Embers".into(),
            component_symbols: vec!["ᚠ".into(), "ᚱ".into()],
            keywords: vec!["protection".into()],
            created_at: Utc::now(),
            is_master: false,
            intention: None,
            dignity_score_at_creation: Some(72),
        };
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("componentSymbols").is_some());
        assert!(json.get("isMaster").is_some());
        assert_eq!(json["dignityScoreAtCreation"], 72);
        // None options are omitted entirely.
        assert!(json.get("intention").is_none());
    }
}
