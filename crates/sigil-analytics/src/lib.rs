//! # sigil-analytics
//! Per-user analytics counters and the daily-activity heatmap projection.

pub mod aggregator;
pub mod date;

pub use aggregator::{AnalyticsAggregator, DayActivity};
pub use date::{day_key, parse_day_key, today_utc};
