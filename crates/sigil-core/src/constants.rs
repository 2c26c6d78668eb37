//! Engine constants. Experience values are whole XP points; percentage-like
//! weights are expressed in basis points to keep all scoring integer-only.

/// Cumulative-experience floor for each rank, index = rank.
///
/// Rank is the greatest index whose threshold the XP total has reached.
///
/// # Examples
///
/// ```
/// use sigil_core::constants::XP_THRESHOLDS;
/// assert_eq!(XP_THRESHOLDS[0], 0);
/// assert_eq!(XP_THRESHOLDS[10], 10_000);
/// ```
pub const XP_THRESHOLDS: [u64; 11] = [
    0, 100, 300, 600, 1000, 1600, 2400, 3500, 5000, 7000, 10_000,
];

/// Highest attainable rank.
pub const MAX_RANK: u8 = 10;

/// Display title for each rank, index = rank. Exactly 11, all unique.
pub const RANK_TITLES: [&str; 11] = [
    "Neophyte",
    "Zelator",
    "Theoricus",
    "Practicus",
    "Philosophus",
    "Adeptus Minor",
    "Adeptus Major",
    "Adeptus Exemptus",
    "Magister Templi",
    "Magus",
    "Ipsissimus",
];

// --- Power rating weights (basis points) ---

/// Weight of the transit sub-score: 0.4.
pub const TRANSIT_WEIGHT_BPS: u64 = 4000;
/// Weight of the dignity sub-score: 0.4.
pub const DIGNITY_WEIGHT_BPS: u64 = 4000;
/// Weight of the rune modifier sub-score: 0.2.
pub const RUNE_WEIGHT_BPS: u64 = 2000;
/// Multiplier applied when the stasis buff is active: 1.15.
pub const STASIS_BUFF_BPS: u64 = 11_500;
pub const BPS_PRECISION: u64 = 10_000;

/// Maximum power rating and maximum value of each sub-score.
pub const POWER_MAX: u8 = 100;

// --- Grid charge ---

/// Upper bound of the collective grid charge.
pub const CHARGE_MAX: u8 = 100;
/// Charge assumed when no persisted grid state exists.
pub const CHARGE_DEFAULT: u8 = 60;
/// Charge lost per elapsed decay period.
pub const CHARGE_DECAY_PER_PERIOD: u8 = 10;
/// Length of one passive-decay period in hours.
pub const CHARGE_DECAY_PERIOD_HOURS: i64 = 24;

// --- Progression ---

/// Default experience granted for a completed ritual.
pub const DEFAULT_RITUAL_XP: u64 = 25;
/// Experience attributed per meditation-session minute (fixed conversion).
pub const SESSION_XP_PER_MINUTE: u64 = 2;

// --- Leaderboard ---

/// Number of entries retained by a leaderboard rebuild.
pub const LEADERBOARD_SIZE: usize = 50;

// --- Analytics ---

/// Rolling retention window for the daily-activity map, in days.
pub const ACTIVITY_WINDOW_DAYS: i64 = 365;
/// Default span of the consistency heatmap, in days (13 weeks).
pub const HEATMAP_DEFAULT_DAYS: u32 = 91;

// --- Wallet ---

/// Reserved id prefix for the permanent master talisman.
pub const MASTER_ID_PREFIX: &str = "master-";
/// Id prefix for ordinary saved talismans.
pub const TALISMAN_ID_PREFIX: &str = "tal-";

// --- Local storage keys ---

/// JSON array of all saved talismans.
pub const KEY_WALLET: &str = "rune_wallet";
/// Raw id string of the active talisman; absent when none is active.
pub const KEY_ACTIVE_TALISMAN: &str = "active_talisman";
/// Boolean-as-string onboarding-seal latch.
pub const KEY_ONBOARDING_SEAL: &str = "onboarding_seal";
/// JSON blob of the persisted grid state.
pub const KEY_GRID_STATE: &str = "grid_state";
