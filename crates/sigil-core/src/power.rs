//! Power rating: weighted composite of three 0–100 sub-scores.
//!
//! Weighting is fixed (0.4 transit, 0.4 dignity, 0.2 rune) and computed in
//! integer basis points with half-up rounding. The stasis buff multiplies
//! after weighting; clamping to 100 happens last, so a buffed perfect score
//! resolves to exactly 100 and never overflows.

use crate::constants::{
    BPS_PRECISION, DIGNITY_WEIGHT_BPS, POWER_MAX, RUNE_WEIGHT_BPS, STASIS_BUFF_BPS,
    TRANSIT_WEIGHT_BPS,
};

/// Tier classification of a power rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerTier {
    Transcendent,
    Empowered,
    Balanced,
    Challenged,
    Dormant,
}

impl PowerTier {
    /// Human-readable tier label.
    pub fn label(&self) -> &'static str {
        match self {
            PowerTier::Transcendent => "Transcendent",
            PowerTier::Empowered => "Empowered",
            PowerTier::Balanced => "Balanced",
            PowerTier::Challenged => "Challenged",
            PowerTier::Dormant => "Dormant",
        }
    }

    /// Theme color token for presentation layers.
    pub fn color_token(&self) -> &'static str {
        match self {
            PowerTier::Transcendent => "gold",
            PowerTier::Empowered => "violet",
            PowerTier::Balanced => "teal",
            PowerTier::Challenged => "amber",
            PowerTier::Dormant => "slate",
        }
    }
}

/// Composite power rating in `[0, 100]`.
///
/// Inputs out of range are clamped to 100 before weighting.
///
/// # Examples
///
/// ```
/// use sigil_core::power::compute;
/// assert_eq!(compute(100, 0, 0, false), 40);
/// assert_eq!(compute(50, 50, 50, false), 50);
/// assert_eq!(compute(100, 100, 100, true), 100);
/// ```
pub fn compute(transit: u8, dignity: u8, rune: u8, stasis_buff: bool) -> u8 {
    let t = transit.min(POWER_MAX) as u64;
    let d = dignity.min(POWER_MAX) as u64;
    let r = rune.min(POWER_MAX) as u64;

    let weighted = t * TRANSIT_WEIGHT_BPS + d * DIGNITY_WEIGHT_BPS + r * RUNE_WEIGHT_BPS;
    let mut raw = round_div(weighted, BPS_PRECISION);

    if stasis_buff {
        raw = round_div(raw * STASIS_BUFF_BPS, BPS_PRECISION);
    }

    raw.min(POWER_MAX as u64) as u8
}

/// Classify a power rating into a tier. Breakpoints are inclusive on the
/// lower bound and evaluated from highest to lowest.
pub fn classify(score: u8) -> PowerTier {
    match score {
        s if s >= 80 => PowerTier::Transcendent,
        s if s >= 65 => PowerTier::Empowered,
        s if s >= 50 => PowerTier::Balanced,
        s if s >= 35 => PowerTier::Challenged,
        _ => PowerTier::Dormant,
    }
}

/// Integer division with half-up rounding.
fn round_div(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator / 2) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- compute ---

    #[test]
    fn single_input_weights() {
        assert_eq!(compute(100, 0, 0, false), 40);
        assert_eq!(compute(0, 100, 0, false), 40);
        assert_eq!(compute(0, 0, 100, false), 20);
    }

    #[test]
    fn uniform_inputs_pass_through() {
        assert_eq!(compute(50, 50, 50, false), 50);
        assert_eq!(compute(100, 100, 100, false), 100);
        assert_eq!(compute(0, 0, 0, false), 0);
    }

    #[test]
    fn buff_clamps_at_max() {
        assert_eq!(compute(100, 100, 100, true), 100);
    }

    #[test]
    fn buff_multiplies_before_clamp() {
        // raw = 40, buffed = round(40 * 1.15) = 46
        assert_eq!(compute(100, 0, 0, true), 46);
        // raw = 50, buffed = round(57.5) = 58
        assert_eq!(compute(50, 50, 50, true), 58);
    }

    #[test]
    fn rounding_half_up() {
        // 0.4*1 = 0.4 -> 0; 0.4*2 = 0.8 -> 1
        assert_eq!(compute(1, 0, 0, false), 0);
        assert_eq!(compute(2, 0, 0, false), 1);
    }

    #[test]
    fn oversized_inputs_clamped() {
        assert_eq!(compute(255, 255, 255, false), 100);
    }

    // --- classify ---

    #[test]
    fn classify_boundaries() {
        assert_eq!(classify(80), PowerTier::Transcendent);
        assert_eq!(classify(79), PowerTier::Empowered);
        assert_eq!(classify(65), PowerTier::Empowered);
        assert_eq!(classify(64), PowerTier::Balanced);
        assert_eq!(classify(50), PowerTier::Balanced);
        assert_eq!(classify(49), PowerTier::Challenged);
        assert_eq!(classify(35), PowerTier::Challenged);
        assert_eq!(classify(34), PowerTier::Dormant);
        assert_eq!(classify(0), PowerTier::Dormant);
        assert_eq!(classify(100), PowerTier::Transcendent);
    }

    #[test]
    fn tier_labels_and_colors() {
        assert_eq!(PowerTier::Transcendent.label(), "Transcendent");
        assert_eq!(PowerTier::Dormant.color_token(), "slate");
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn result_bounded(t in 0u8..=255, d in 0u8..=255, r in 0u8..=255, buff: bool) {
            prop_assert!(compute(t, d, r, buff) <= 100);
        }

        #[test]
        fn buff_never_decreases(t in 0u8..=100, d in 0u8..=100, r in 0u8..=100) {
            prop_assert!(compute(t, d, r, true) >= compute(t, d, r, false));
        }

        #[test]
        fn monotonic_in_each_input(t in 0u8..100, d in 0u8..=100, r in 0u8..=100) {
            prop_assert!(compute(t + 1, d, r, false) >= compute(t, d, r, false));
        }
    }
}
