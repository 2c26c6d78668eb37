//! Leaderboard cache: a read-mostly materialized ranking.
//!
//! Rebuilt wholesale from a snapshot of all progression records on an
//! explicit trigger; never patched incrementally. A full replace avoids
//! rank-gap and stale-rank bugs under concurrent updates.

use serde::{Deserialize, Serialize};

use crate::constants::LEADERBOARD_SIZE;
use crate::level;

/// One user's progression as seen by the system-of-record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    /// Display name; empty means the user has not named themselves and is
    /// excluded from ranking.
    pub display_name: String,
    pub cumulative_experience: u64,
}

/// A materialized leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based dense rank (no gaps).
    pub rank: u32,
    pub display_name: String,
    pub cumulative_experience: u64,
    /// Initiatic rank derived from the experience total.
    pub rank_tier: u8,
}

/// Materialized ranking, rebuilt on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardCache {
    entries: Vec<LeaderboardEntry>,
}

impl LeaderboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache from a full snapshot of progression records.
    ///
    /// Unnamed records are excluded (not ranked with a placeholder), the
    /// rest are sorted by experience descending with name as a deterministic
    /// tiebreak, assigned dense 1-based ranks, and truncated to
    /// [`LEADERBOARD_SIZE`].
    pub fn rebuild(&mut self, snapshots: &[ProfileSnapshot]) {
        let mut ranked: Vec<&ProfileSnapshot> = snapshots
            .iter()
            .filter(|s| !s.display_name.trim().is_empty())
            .collect();
        ranked.sort_by(|a, b| {
            b.cumulative_experience
                .cmp(&a.cumulative_experience)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        ranked.truncate(LEADERBOARD_SIZE);

        self.entries = ranked
            .into_iter()
            .enumerate()
            .map(|(i, s)| LeaderboardEntry {
                rank: i as u32 + 1,
                display_name: s.display_name.clone(),
                cumulative_experience: s.cumulative_experience,
                rank_tier: level::rank_for(s.cumulative_experience),
            })
            .collect();
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(name: &str, xp: u64) -> ProfileSnapshot {
        ProfileSnapshot {
            display_name: name.to_string(),
            cumulative_experience: xp,
        }
    }

    #[test]
    fn rebuild_excludes_unnamed_and_stays_dense() {
        let mut cache = LeaderboardCache::new();
        cache.rebuild(&[snap("A", 500), snap("B", 900), snap("", 700)]);

        let entries = cache.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].display_name, "B");
        assert_eq!(entries[0].cumulative_experience, 900);
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[1].display_name, "A");
        assert_eq!(entries[1].cumulative_experience, 500);
    }

    #[test]
    fn whitespace_name_excluded() {
        let mut cache = LeaderboardCache::new();
        cache.rebuild(&[snap("   ", 900), snap("A", 100)]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.entries()[0].display_name, "A");
    }

    #[test]
    fn rebuild_replaces_prior_contents() {
        let mut cache = LeaderboardCache::new();
        cache.rebuild(&[snap("A", 500)]);
        cache.rebuild(&[snap("B", 100)]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.entries()[0].display_name, "B");
    }

    #[test]
    fn truncates_to_fixed_size() {
        let snaps: Vec<ProfileSnapshot> =
            (0..120).map(|i| snap(&format!("user{i}"), i as u64)).collect();
        let mut cache = LeaderboardCache::new();
        cache.rebuild(&snaps);
        assert_eq!(cache.len(), LEADERBOARD_SIZE);
        // Highest XP first.
        assert_eq!(cache.entries()[0].cumulative_experience, 119);
    }

    #[test]
    fn tie_broken_by_name() {
        let mut cache = LeaderboardCache::new();
        cache.rebuild(&[snap("zed", 500), snap("ana", 500)]);
        assert_eq!(cache.entries()[0].display_name, "ana");
        assert_eq!(cache.entries()[1].display_name, "zed");
        assert_eq!(cache.entries()[0].rank, 1);
        assert_eq!(cache.entries()[1].rank, 2);
    }

    #[test]
    fn rank_tier_derived_from_xp() {
        let mut cache = LeaderboardCache::new();
        cache.rebuild(&[snap("A", 1600), snap("B", 99)]);
        assert_eq!(cache.entries()[0].rank_tier, 5);
        assert_eq!(cache.entries()[1].rank_tier, 0);
    }

    #[test]
    fn empty_snapshot_empty_cache() {
        let mut cache = LeaderboardCache::new();
        cache.rebuild(&[]);
        assert!(cache.is_empty());
    }
}
