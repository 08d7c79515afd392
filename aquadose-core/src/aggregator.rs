//! Sums dosing history over a trailing calendar window into per-element totals.

use aquadose_schemas::{
    fertilizer::{DosingEvent, FertilizerComposition},
    nutrient::NutrientTotals,
};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Totals plus counts of what was and wasn't included.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateReport {
    pub totals: NutrientTotals,
    pub counted_events: usize,
    /// In-window events whose fertilizer is no longer in the inventory.
    pub skipped_events: usize,
    pub skipped_fertilizer_ids: BTreeSet<String>,
    /// In-window events with a negative or non-finite amount.
    pub invalid_events: usize,
}

/// First calendar day of a `window_days` window ending on `as_of`, or `None`
/// for an empty window.
pub fn window_start(as_of: NaiveDate, window_days: u32) -> Option<NaiveDate> {
    if window_days == 0 {
        return None;
    }
    as_of.checked_sub_signed(Duration::days(i64::from(window_days) - 1))
}

pub fn aggregate(
    events: &[DosingEvent],
    compositions: &HashMap<String, FertilizerComposition>,
    window_days: u32,
    as_of: NaiveDate,
) -> NutrientTotals {
    aggregate_with_report(events, compositions, window_days, as_of).totals
}

/// Sums `amount × ppm_per_unit` for every event dated within
/// `[as_of - (window_days - 1), as_of]`, both ends inclusive.
pub fn aggregate_with_report(
    events: &[DosingEvent],
    compositions: &HashMap<String, FertilizerComposition>,
    window_days: u32,
    as_of: NaiveDate,
) -> AggregateReport {
    let mut report = AggregateReport::default();
    let Some(start) = window_start(as_of, window_days) else {
        return report;
    };

    for event in events.iter().filter(|e| e.date >= start && e.date <= as_of) {
        if !event.amount.is_finite() || event.amount < 0.0 {
            report.invalid_events += 1;
            continue;
        }
        match compositions.get(&event.fertilizer_id) {
            Some(composition) => {
                report.totals = report.totals + composition.ppm_per_unit * event.amount;
                report.counted_events += 1;
            }
            None => {
                report.skipped_events += 1;
                report.skipped_fertilizer_ids.insert(event.fertilizer_id.clone());
            }
        }
    }

    report
}
