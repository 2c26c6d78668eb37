//! Level math: cumulative experience to rank and neighboring thresholds.
//!
//! All functions are pure lookups over [`XP_THRESHOLDS`]. Rank is an integer
//! in `[0, MAX_RANK]`; the threshold table is fixed and finite, with no
//! open-ended leveling curve past the top rank.

use crate::constants::{MAX_RANK, RANK_TITLES, XP_THRESHOLDS};

/// Rank for a cumulative experience total: the greatest index `i` such that
/// `xp >= XP_THRESHOLDS[i]`.
///
/// # Examples
///
/// ```
/// use sigil_core::level::rank_for;
/// assert_eq!(rank_for(0), 0);
/// assert_eq!(rank_for(99), 0);
/// assert_eq!(rank_for(100), 1);
/// assert_eq!(rank_for(10_000), 10);
/// ```
pub fn rank_for(xp: u64) -> u8 {
    let mut rank = 0u8;
    for (i, threshold) in XP_THRESHOLDS.iter().enumerate() {
        if xp >= *threshold {
            rank = i as u8;
        } else {
            break;
        }
    }
    rank
}

/// Experience floor of the given rank. Rank is clamped to `[0, MAX_RANK]`.
pub fn xp_floor_for_rank(rank: u8) -> u64 {
    XP_THRESHOLDS[rank.min(MAX_RANK) as usize]
}

/// Experience ceiling of the given rank: the floor of the next rank.
///
/// At `MAX_RANK` the ceiling equals the floor, signalling that no further
/// progress is possible (rather than dividing by a zero span).
pub fn xp_ceiling_for_rank(rank: u8) -> u64 {
    XP_THRESHOLDS[(rank.saturating_add(1)).min(MAX_RANK) as usize]
}

/// Fraction of progress from the current rank's floor toward its ceiling,
/// in `[0, 1]`. Defined as 1.0 when the ceiling equals the floor (max rank).
pub fn progress_to_next(xp: u64) -> f64 {
    let rank = rank_for(xp);
    let floor = xp_floor_for_rank(rank);
    let ceiling = xp_ceiling_for_rank(rank);
    if ceiling > floor {
        (xp - floor) as f64 / (ceiling - floor) as f64
    } else {
        1.0
    }
}

/// Display title for a rank. Rank is clamped to `[0, MAX_RANK]`.
pub fn title_for_rank(rank: u8) -> &'static str {
    RANK_TITLES[rank.min(MAX_RANK) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- rank_for ---

    #[test]
    fn rank_boundaries_exact() {
        assert_eq!(rank_for(0), 0);
        assert_eq!(rank_for(99), 0);
        assert_eq!(rank_for(100), 1);
        assert_eq!(rank_for(1599), 4);
        assert_eq!(rank_for(1600), 5);
        assert_eq!(rank_for(10_000), 10);
        assert_eq!(rank_for(9_999_999), 10);
    }

    #[test]
    fn rank_at_every_threshold() {
        for (i, t) in XP_THRESHOLDS.iter().enumerate() {
            assert_eq!(rank_for(*t) as usize, i, "xp={t}");
            if *t > 0 {
                assert_eq!(rank_for(*t - 1) as usize, i - 1, "xp={}", t - 1);
            }
        }
    }

    // --- floors and ceilings ---

    #[test]
    fn floor_and_ceiling_span_each_rank() {
        for rank in 0..MAX_RANK {
            assert!(xp_floor_for_rank(rank) < xp_ceiling_for_rank(rank));
        }
    }

    #[test]
    fn max_rank_ceiling_equals_floor() {
        assert_eq!(
            xp_ceiling_for_rank(MAX_RANK),
            xp_floor_for_rank(MAX_RANK)
        );
    }

    #[test]
    fn out_of_range_rank_clamped() {
        assert_eq!(xp_floor_for_rank(200), XP_THRESHOLDS[10]);
        assert_eq!(xp_ceiling_for_rank(200), XP_THRESHOLDS[10]);
        assert_eq!(title_for_rank(200), RANK_TITLES[10]);
    }

    // --- progress_to_next ---

    #[test]
    fn progress_zero_at_rank_floor() {
        assert_eq!(progress_to_next(100), 0.0);
        assert_eq!(progress_to_next(1600), 0.0);
    }

    #[test]
    fn progress_halfway() {
        // Rank 1 spans [100, 300); 200 is halfway.
        assert!((progress_to_next(200) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_full_at_max_rank() {
        assert_eq!(progress_to_next(10_000), 1.0);
        assert_eq!(progress_to_next(u64::MAX), 1.0);
    }

    // --- titles ---

    #[test]
    fn first_and_last_titles() {
        assert_eq!(title_for_rank(0), "Neophyte");
        assert_eq!(title_for_rank(10), "Ipsissimus");
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn rank_monotonic(a in 0u64..20_000, b in 0u64..20_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rank_for(lo) <= rank_for(hi));
        }

        #[test]
        fn rank_in_range(xp in 0u64..=u64::MAX) {
            prop_assert!(rank_for(xp) <= MAX_RANK);
        }

        #[test]
        fn progress_in_unit_interval(xp in 0u64..=u64::MAX) {
            let p = progress_to_next(xp);
            prop_assert!((0.0..=1.0).contains(&p));
        }

        #[test]
        fn xp_within_own_rank_span(xp in 0u64..20_000) {
            let rank = rank_for(xp);
            prop_assert!(xp >= xp_floor_for_rank(rank));
            if rank < MAX_RANK {
                prop_assert!(xp < xp_ceiling_for_rank(rank));
            }
        }
    }
}
