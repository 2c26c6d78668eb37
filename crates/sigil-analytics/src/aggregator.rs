//! The analytics aggregator: additive transitions over an [`AnalyticsRecord`].
//!
//! All mutations are increments; counters never decrease. Non-positive
//! amounts are caller errors and are rejected synchronously, never silently
//! ignored. The daily-activity map is trimmed to a rolling window as a side
//! effect of recording, so it cannot grow without bound.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use sigil_core::constants::ACTIVITY_WINDOW_DAYS;
use sigil_core::error::AnalyticsError;
use sigil_core::types::{AnalyticsRecord, Element};

use crate::date::day_key;

/// One day of the consistency heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub value: u64,
}

/// Stateless transition functions over per-user analytics records.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsAggregator;

impl AnalyticsAggregator {
    /// Add experience to one element's counter. Amount must be positive.
    pub fn increment_element(
        record: &mut AnalyticsRecord,
        element: Element,
        amount: u64,
    ) -> Result<(), AnalyticsError> {
        if amount == 0 {
            return Err(AnalyticsError::NonPositiveAmount);
        }
        record.element_totals.add(element, amount);
        Ok(())
    }

    /// Count one performed ritual.
    pub fn increment_ritual_count(record: &mut AnalyticsRecord) {
        record.rituals_performed_count = record.rituals_performed_count.saturating_add(1);
    }

    /// Add meditation minutes. Minutes must be positive.
    pub fn add_session_minutes(
        record: &mut AnalyticsRecord,
        minutes: u64,
    ) -> Result<(), AnalyticsError> {
        if minutes == 0 {
            return Err(AnalyticsError::NonPositiveMinutes);
        }
        record.total_session_minutes = record.total_session_minutes.saturating_add(minutes);
        Ok(())
    }

    /// Add experience to the day bucket for `at_date`, then trim buckets
    /// that have aged out of the rolling window ending at `at_date`.
    pub fn record_daily_activity(
        record: &mut AnalyticsRecord,
        amount: u64,
        at_date: NaiveDate,
    ) -> Result<(), AnalyticsError> {
        if amount == 0 {
            return Err(AnalyticsError::NonPositiveAmount);
        }
        let key = day_key(at_date);
        let bucket = record.daily_activity.entry(key).or_insert(0);
        *bucket = bucket.saturating_add(amount);

        Self::trim_window(record, at_date);
        Ok(())
    }

    /// Composite ritual workflow: count once, grant the full experience
    /// amount to every named element (deliberately not split), and feed the
    /// amount into daily activity. Returns the amount so the caller can
    /// forward it to the cumulative-experience pipeline.
    pub fn record_ritual(
        record: &mut AnalyticsRecord,
        elements: &[Element],
        xp_amount: u64,
        at_date: NaiveDate,
    ) -> Result<u64, AnalyticsError> {
        if elements.is_empty() {
            return Err(AnalyticsError::EmptyElementSet);
        }
        if xp_amount == 0 {
            return Err(AnalyticsError::NonPositiveAmount);
        }

        Self::increment_ritual_count(record);

        // Dedupe: a ritual tagged with an element twice grants it once.
        let mut seen = [false; Element::ALL.len()];
        for element in elements {
            let idx = Element::ALL.iter().position(|e| e == element).unwrap_or(0);
            if !seen[idx] {
                seen[idx] = true;
                record.element_totals.add(*element, xp_amount);
            }
        }

        Self::record_daily_activity(record, xp_amount, at_date)?;
        Ok(xp_amount)
    }

    /// Pure projection of a consecutive day window ending at `ending_at`
    /// inclusive, zero-filled for absent days. Never mutates the record.
    pub fn heatmap_window(
        record: &AnalyticsRecord,
        days: u32,
        ending_at: NaiveDate,
    ) -> Result<Vec<DayActivity>, AnalyticsError> {
        if days == 0 {
            return Err(AnalyticsError::NonPositiveDays);
        }
        let start = ending_at
            .checked_sub_days(Days::new(days as u64 - 1))
            .ok_or(AnalyticsError::NonPositiveDays)?;

        let mut window = Vec::with_capacity(days as usize);
        let mut date = start;
        while date <= ending_at {
            let value = record.daily_activity.get(&day_key(date)).copied().unwrap_or(0);
            window.push(DayActivity { date, value });
            date = date.succ_opt().ok_or(AnalyticsError::NonPositiveDays)?;
        }
        Ok(window)
    }

    /// Drop day buckets older than the retention window ending at `at_date`.
    /// Canonical keys sort lexicographically in date order, so this is a
    /// single range split on the ordered map.
    fn trim_window(record: &mut AnalyticsRecord, at_date: NaiveDate) {
        let Some(cutoff) = at_date.checked_sub_days(Days::new(ACTIVITY_WINDOW_DAYS as u64 - 1))
        else {
            return;
        };
        record.daily_activity = record.daily_activity.split_off(&day_key(cutoff));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // --- increments ---

    #[test]
    fn increment_element_accumulates() {
        let mut rec = AnalyticsRecord::default();
        AnalyticsAggregator::increment_element(&mut rec, Element::Fire, 25).unwrap();
        AnalyticsAggregator::increment_element(&mut rec, Element::Fire, 10).unwrap();
        assert_eq!(rec.element_totals.fire, 35);
    }

    #[test]
    fn increment_element_zero_rejected() {
        let mut rec = AnalyticsRecord::default();
        assert_eq!(
            AnalyticsAggregator::increment_element(&mut rec, Element::Air, 0),
            Err(AnalyticsError::NonPositiveAmount)
        );
        assert_eq!(rec.element_totals.air, 0);
    }

    #[test]
    fn session_minutes_zero_rejected() {
        let mut rec = AnalyticsRecord::default();
        assert_eq!(
            AnalyticsAggregator::add_session_minutes(&mut rec, 0),
            Err(AnalyticsError::NonPositiveMinutes)
        );
    }

    #[test]
    fn ritual_count_increments() {
        let mut rec = AnalyticsRecord::default();
        AnalyticsAggregator::increment_ritual_count(&mut rec);
        AnalyticsAggregator::increment_ritual_count(&mut rec);
        assert_eq!(rec.rituals_performed_count, 2);
    }

    // --- daily activity ---

    #[test]
    fn daily_activity_same_day_accumulates() {
        let mut rec = AnalyticsRecord::default();
        let d = date(2026, 3, 7);
        AnalyticsAggregator::record_daily_activity(&mut rec, 25, d).unwrap();
        AnalyticsAggregator::record_daily_activity(&mut rec, 10, d).unwrap();
        assert_eq!(rec.daily_activity.get("2026-03-07"), Some(&35));
        assert_eq!(rec.daily_activity.len(), 1);
    }

    #[test]
    fn daily_activity_trims_rolling_window() {
        let mut rec = AnalyticsRecord::default();
        let old = date(2024, 1, 1);
        let recent = date(2026, 3, 7);
        AnalyticsAggregator::record_daily_activity(&mut rec, 5, old).unwrap();
        AnalyticsAggregator::record_daily_activity(&mut rec, 5, recent).unwrap();
        // The 2024 bucket is far outside the 365-day window ending 2026-03-07.
        assert!(!rec.daily_activity.contains_key("2024-01-01"));
        assert!(rec.daily_activity.contains_key("2026-03-07"));
    }

    #[test]
    fn daily_activity_window_edge_retained() {
        let mut rec = AnalyticsRecord::default();
        let end = date(2026, 3, 7);
        let edge = end - Days::new(ACTIVITY_WINDOW_DAYS as u64 - 1);
        let outside = end - Days::new(ACTIVITY_WINDOW_DAYS as u64);
        AnalyticsAggregator::record_daily_activity(&mut rec, 1, outside).unwrap();
        AnalyticsAggregator::record_daily_activity(&mut rec, 1, edge).unwrap();
        AnalyticsAggregator::record_daily_activity(&mut rec, 1, end).unwrap();
        assert!(rec.daily_activity.contains_key(&day_key(edge)));
        assert!(!rec.daily_activity.contains_key(&day_key(outside)));
    }

    // --- record_ritual ---

    #[test]
    fn ritual_grants_full_amount_per_element() {
        let mut rec = AnalyticsRecord::default();
        let d = date(2026, 3, 7);
        let xp = AnalyticsAggregator::record_ritual(
            &mut rec,
            &[Element::Fire, Element::Spirit],
            25,
            d,
        )
        .unwrap();

        assert_eq!(xp, 25);
        // Full amount to both elements, not 12.5 each.
        assert_eq!(rec.element_totals.fire, 25);
        assert_eq!(rec.element_totals.spirit, 25);
        assert_eq!(rec.rituals_performed_count, 1);
        assert_eq!(rec.daily_activity.get("2026-03-07"), Some(&25));
    }

    #[test]
    fn ritual_dedupes_repeated_elements() {
        let mut rec = AnalyticsRecord::default();
        AnalyticsAggregator::record_ritual(
            &mut rec,
            &[Element::Water, Element::Water],
            25,
            date(2026, 3, 7),
        )
        .unwrap();
        assert_eq!(rec.element_totals.water, 25);
    }

    #[test]
    fn ritual_empty_elements_rejected() {
        let mut rec = AnalyticsRecord::default();
        assert_eq!(
            AnalyticsAggregator::record_ritual(&mut rec, &[], 25, date(2026, 3, 7)),
            Err(AnalyticsError::EmptyElementSet)
        );
        assert_eq!(rec.rituals_performed_count, 0);
    }

    #[test]
    fn ritual_zero_xp_rejected() {
        let mut rec = AnalyticsRecord::default();
        assert_eq!(
            AnalyticsAggregator::record_ritual(&mut rec, &[Element::Fire], 0, date(2026, 3, 7)),
            Err(AnalyticsError::NonPositiveAmount)
        );
    }

    // --- heatmap_window ---

    #[test]
    fn heatmap_exact_length_zero_filled() {
        let mut rec = AnalyticsRecord::default();
        let end = date(2026, 3, 7);
        AnalyticsAggregator::record_daily_activity(&mut rec, 25, end).unwrap();
        AnalyticsAggregator::record_daily_activity(&mut rec, 10, date(2026, 2, 1)).unwrap();
        AnalyticsAggregator::record_daily_activity(&mut rec, 5, date(2026, 1, 15)).unwrap();

        let window = AnalyticsAggregator::heatmap_window(&rec, 91, end).unwrap();
        assert_eq!(window.len(), 91);
        let zeros = window.iter().filter(|d| d.value == 0).count();
        assert_eq!(zeros, 88);
        assert_eq!(window.last().unwrap().date, end);
        assert_eq!(window.last().unwrap().value, 25);
    }

    #[test]
    fn heatmap_window_is_consecutive() {
        let rec = AnalyticsRecord::default();
        let window = AnalyticsAggregator::heatmap_window(&rec, 7, date(2026, 3, 7)).unwrap();
        assert_eq!(window.first().unwrap().date, date(2026, 3, 1));
        for pair in window.windows(2) {
            assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
        }
    }

    #[test]
    fn heatmap_does_not_mutate_record() {
        let rec = AnalyticsRecord::default();
        AnalyticsAggregator::heatmap_window(&rec, 30, date(2026, 3, 7)).unwrap();
        assert!(rec.daily_activity.is_empty());
    }

    #[test]
    fn heatmap_zero_days_rejected() {
        let rec = AnalyticsRecord::default();
        assert_eq!(
            AnalyticsAggregator::heatmap_window(&rec, 0, date(2026, 3, 7)),
            Err(AnalyticsError::NonPositiveDays)
        );
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn heatmap_length_matches_days(days in 1u32..400) {
            let rec = AnalyticsRecord::default();
            let window =
                AnalyticsAggregator::heatmap_window(&rec, days, date(2026, 3, 7)).unwrap();
            prop_assert_eq!(window.len(), days as usize);
        }

        #[test]
        fn counters_never_decrease(amounts in proptest::collection::vec(1u64..1000, 1..20)) {
            let mut rec = AnalyticsRecord::default();
            let mut last = 0;
            for amount in amounts {
                AnalyticsAggregator::increment_element(&mut rec, Element::Earth, amount).unwrap();
                prop_assert!(rec.element_totals.earth >= last);
                last = rec.element_totals.earth;
            }
        }
    }
}
