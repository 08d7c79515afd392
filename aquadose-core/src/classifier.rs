//! Three-way sufficiency verdicts against target bands.

use crate::targets::TargetRange;
use aquadose_schemas::nutrient::{Element, NutrientTotals};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientStatus {
    Low,
    Optimal,
    High,
}

impl fmt::Display for NutrientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NutrientStatus::Low => "low",
            NutrientStatus::Optimal => "optimal",
            NutrientStatus::High => "high",
        })
    }
}

/// Bounds are inclusive: `total == min` and `total == max` are both optimal.
pub fn status_of(total: f64, range: &TargetRange) -> NutrientStatus {
    if total < range.min() {
        NutrientStatus::Low
    } else if total > range.max() {
        NutrientStatus::High
    } else {
        NutrientStatus::Optimal
    }
}

/// Classifies every element that has a target band.
pub fn classify(
    totals: &NutrientTotals,
    targets: &HashMap<Element, TargetRange>,
) -> HashMap<Element, NutrientStatus> {
    targets
        .iter()
        .map(|(element, range)| (*element, status_of(totals.get(*element), range)))
        .collect()
}

/// Progress-bar position in percent: `[0, min]` fills 0-33, `[min, max]`
/// fills 33-67 and anything above `max` pins at 100.
pub fn progress_percent(total: f64, range: &TargetRange) -> f64 {
    let total = total.max(0.0);
    if total < range.min() {
        total / range.min() * 33.0
    } else if total <= range.max() {
        let span = range.max() - range.min();
        if span > 0.0 {
            33.0 + (total - range.min()) / span * 34.0
        } else {
            50.0
        }
    } else {
        100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn range(min: f64, max: f64) -> TargetRange {
        TargetRange::new(min, max).unwrap()
    }

    #[test]
    fn boundaries_are_optimal() {
        let r = range(5.0, 10.0);
        assert_eq!(status_of(5.0, &r), NutrientStatus::Optimal);
        assert_eq!(status_of(10.0, &r), NutrientStatus::Optimal);
        assert_eq!(status_of(4.999, &r), NutrientStatus::Low);
        assert_eq!(status_of(10.001, &r), NutrientStatus::High);
    }

    #[test]
    fn classify_covers_every_targeted_element() {
        let targets: HashMap<Element, TargetRange> = Element::ALL
            .into_iter()
            .map(|e| (e, range(1.0, 2.0)))
            .collect();
        let totals = NutrientTotals {
            nitrogen: 0.5,
            phosphorus: 1.0,
            potassium: 1.5,
            iron: 2.0,
            magnesium: 3.0,
        };
        let status = classify(&totals, &targets);
        assert_eq!(status.len(), Element::ALL.len());
        assert_eq!(status[&Element::Nitrogen], NutrientStatus::Low);
        assert_eq!(status[&Element::Phosphorus], NutrientStatus::Optimal);
        assert_eq!(status[&Element::Potassium], NutrientStatus::Optimal);
        assert_eq!(status[&Element::Iron], NutrientStatus::Optimal);
        assert_eq!(status[&Element::Magnesium], NutrientStatus::High);
    }

    #[test]
    fn classify_ignores_elements_without_targets() {
        let mut targets = HashMap::new();
        targets.insert(Element::Iron, range(0.1, 0.5));
        let status = classify(&NutrientTotals::zero(), &targets);
        assert_eq!(status.len(), 1);
        assert_eq!(status[&Element::Iron], NutrientStatus::Low);
    }

    #[test]
    fn progress_zones() {
        let r = range(10.0, 20.0);
        assert_relative_eq!(progress_percent(0.0, &r), 0.0);
        assert_relative_eq!(progress_percent(5.0, &r), 16.5);
        assert_relative_eq!(progress_percent(10.0, &r), 33.0);
        assert_relative_eq!(progress_percent(15.0, &r), 50.0);
        assert_relative_eq!(progress_percent(20.0, &r), 67.0);
        assert_relative_eq!(progress_percent(20.5, &r), 100.0);
    }

    #[test]
    fn progress_handles_degenerate_ranges() {
        assert_relative_eq!(progress_percent(0.0, &range(0.0, 0.0)), 50.0);
        assert_relative_eq!(progress_percent(3.0, &range(3.0, 3.0)), 50.0);
        assert_relative_eq!(progress_percent(0.0, &range(0.0, 4.0)), 33.0);
    }
}
