//! Turns low verdicts into per-fertilizer dose suggestions.

use crate::{
    classifier::NutrientStatus, error::AquadoseError, targets::TargetRange, validation,
};
use aquadose_schemas::{
    fertilizer::{DoseUnit, FertilizerComposition},
    nutrient::{Element, NutrientTotals},
};
use serde::Serialize;
use std::collections::HashMap;

/// Days over which a deficit is closed.
pub const CORRECTION_DAYS: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DosingRecommendation {
    pub fertilizer_id: String,
    pub fertilizer_name: String,
    pub element: Element,
    pub recommended_daily_dose: f64,
    pub recommended_weekly_dose: f64,
    pub unit: DoseUnit,
    pub reasoning: String,
}

/// Suggests doses for every element classified `Low`.
///
/// Each fertilizer carrying the element yields its own suggestion; choosing
/// between them is left to the caller. `compositions` use per-liter ppm.
pub fn recommend(
    status: &HashMap<Element, NutrientStatus>,
    targets: &HashMap<Element, TargetRange>,
    totals: &NutrientTotals,
    compositions: &HashMap<String, FertilizerComposition>,
    volume_liters: f64,
) -> Result<Vec<DosingRecommendation>, AquadoseError> {
    validation::validate_volume(volume_liters)?;

    let mut fertilizers: Vec<&FertilizerComposition> = compositions
        .values()
        .filter(|f| !f.ppm_per_unit.is_all_zero())
        .collect();
    fertilizers.sort_by(|a, b| a.fertilizer_id.cmp(&b.fertilizer_id));

    let mut recommendations = Vec::new();
    for element in Element::ALL {
        if status.get(&element) != Some(&NutrientStatus::Low) {
            continue;
        }
        let Some(range) = targets.get(&element) else {
            continue;
        };

        let current = totals.get(element);
        let deficit = range.midpoint() - current;
        if deficit <= 0.0 {
            continue;
        }

        for fertilizer in &fertilizers {
            let ppm_per_unit = fertilizer.ppm_per_unit.get(element);
            if !ppm_per_unit.is_finite() || ppm_per_unit <= 0.0 {
                continue;
            }
            let daily = deficit * volume_liters / (CORRECTION_DAYS * ppm_per_unit);
            recommendations.push(DosingRecommendation {
                fertilizer_id: fertilizer.fertilizer_id.clone(),
                fertilizer_name: fertilizer.name.clone(),
                element,
                recommended_daily_dose: daily,
                recommended_weekly_dose: daily * CORRECTION_DAYS,
                unit: fertilizer.unit,
                reasoning: format!(
                    "{} is at {:.2} ppm, {:.2} ppm below the middle of its weekly target ({}). \
                     {:.2} {} of {} per day closes the gap in a week.",
                    element.label(),
                    current,
                    deficit,
                    range,
                    daily,
                    fertilizer.unit,
                    fertilizer.name
                ),
            });
        }
    }

    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use approx::assert_relative_eq;

    fn fertilizer(id: &str, unit: DoseUnit, ppm: NutrientTotals) -> FertilizerComposition {
        FertilizerComposition {
            fertilizer_id: id.to_string(),
            name: format!("{} name", id),
            unit,
            ppm_per_unit: ppm,
        }
    }

    fn inventory() -> HashMap<String, FertilizerComposition> {
        [
            fertilizer(
                "FERT-A",
                DoseUnit::Ml,
                NutrientTotals { nitrogen: 50.0, potassium: 100.0, ..Default::default() },
            ),
            fertilizer(
                "FERT-B",
                DoseUnit::G,
                NutrientTotals { nitrogen: 140.0, ..Default::default() },
            ),
            fertilizer("FERT-EMPTY", DoseUnit::Ml, NutrientTotals::zero()),
            fertilizer(
                "FERT-FE",
                DoseUnit::Ml,
                NutrientTotals { iron: 10.0, ..Default::default() },
            ),
        ]
        .into_iter()
        .map(|f| (f.fertilizer_id.clone(), f))
        .collect()
    }

    fn targets() -> HashMap<Element, TargetRange> {
        let mut targets = HashMap::new();
        targets.insert(Element::Nitrogen, TargetRange::new(4.0, 8.0).unwrap());
        targets.insert(Element::Potassium, TargetRange::new(10.0, 20.0).unwrap());
        targets.insert(Element::Iron, TargetRange::new(0.1, 0.5).unwrap());
        targets
    }

    #[test]
    fn one_recommendation_per_capable_fertilizer() {
        let totals = NutrientTotals {
            nitrogen: 2.0,
            potassium: 15.0,
            iron: 0.3,
            ..Default::default()
        };
        let status = classify(&totals, &targets());
        let recs = recommend(&status, &targets(), &totals, &inventory(), 70.0).unwrap();

        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.element == Element::Nitrogen));
        assert_eq!(recs[0].fertilizer_id, "FERT-A");
        assert_eq!(recs[1].fertilizer_id, "FERT-B");

        // deficit = 6 - 2 = 4 ppm; 4 * 70 / (7 * 50) = 0.8 ml/day
        assert_relative_eq!(recs[0].recommended_daily_dose, 0.8);
        assert_relative_eq!(recs[0].recommended_weekly_dose, 5.6);
        assert_eq!(recs[0].unit, DoseUnit::Ml);
        // 4 * 70 / (7 * 140) = 0.2857 g/day
        assert_relative_eq!(recs[1].recommended_daily_dose, 2.0 / 7.0, epsilon = 1e-12);
        assert_eq!(recs[1].unit, DoseUnit::G);
        assert!(recs[0].reasoning.contains("Nitrogen"));
    }

    #[test]
    fn high_and_optimal_elements_get_nothing() {
        let totals = NutrientTotals {
            nitrogen: 9.0,
            potassium: 15.0,
            iron: 0.3,
            ..Default::default()
        };
        let status = classify(&totals, &targets());
        assert_eq!(status[&Element::Nitrogen], NutrientStatus::High);
        let recs = recommend(&status, &targets(), &totals, &inventory(), 70.0).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn all_zero_compositions_are_excluded() {
        let totals = NutrientTotals::zero();
        let status = classify(&totals, &targets());
        let recs = recommend(&status, &targets(), &totals, &inventory(), 40.0).unwrap();
        assert!(recs.iter().all(|r| r.fertilizer_id != "FERT-EMPTY"));
        assert!(recs.iter().all(|r| r.recommended_daily_dose > 0.0));
        // nitrogen x2, potassium x1, iron x1
        assert_eq!(recs.len(), 4);
    }

    #[test]
    fn rejects_invalid_volume() {
        let status = HashMap::new();
        assert!(matches!(
            recommend(&status, &targets(), &NutrientTotals::zero(), &inventory(), 0.0),
            Err(AquadoseError::InvalidVolume(_))
        ));
    }
}
