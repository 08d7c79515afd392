//! Composes the engine components into the views the analysis panel and the
//! projection chart consume.

use crate::{
    aggregator::{self, AggregateReport},
    classifier::{self, NutrientStatus},
    consumption::{self, DemandLevel},
    error::AquadoseError,
    projection::state::ProjectionPoint,
    recommendation::{self, DosingRecommendation},
    targets::{self, DisplayNutrients, TargetRange},
    validation,
};
use aquadose_schemas::{
    fertilizer::{DosingEvent, FertilizerComposition},
    nutrient::{Element, NutrientTotals},
    tank::TankSetup,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Share of full EI dosing the keeper aims for.
    pub ei_fraction: f64,
    pub window_days: u32,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            ei_fraction: 1.0,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementAssessment {
    pub element: Element,
    pub weekly_total: f64,
    pub target: TargetRange,
    pub status: NutrientStatus,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankAnalysis {
    pub as_of: NaiveDate,
    pub multiplier: f64,
    pub demand: DemandLevel,
    pub options: AnalysisOptions,
    pub weekly_totals: NutrientTotals,
    pub display_totals: DisplayNutrients,
    pub elements: Vec<ElementAssessment>,
    pub recommendations: Vec<DosingRecommendation>,
    pub aggregate: AggregateReport,
}

impl TankAnalysis {
    pub fn status(&self, element: Element) -> Option<NutrientStatus> {
        self.elements
            .iter()
            .find(|a| a.element == element)
            .map(|a| a.status)
    }

    /// Elements dosed beyond their band. These are warnings only.
    pub fn warnings(&self) -> Vec<String> {
        self.elements
            .iter()
            .filter(|a| a.status == NutrientStatus::High)
            .map(|a| {
                format!(
                    "{} at {:.2} ppm/week is above its target of {}",
                    a.element.label(),
                    a.weekly_total,
                    a.target
                )
            })
            .collect()
    }
}

/// Runs aggregation, classification and recommendation for one tank.
///
/// `compositions` are per-liter; they are scaled to the tank before the
/// dosing history is summed. Totals from windows other than seven days are
/// normalized to a week.
pub fn analyze_tank(
    setup: &TankSetup,
    events: &[DosingEvent],
    compositions: &HashMap<String, FertilizerComposition>,
    as_of: NaiveDate,
    options: AnalysisOptions,
) -> Result<TankAnalysis, AquadoseError> {
    validation::validate_setup(setup)?;
    validation::validate_positive_factor("window days", f64::from(options.window_days))?;
    for fertilizer in compositions.values() {
        validation::validate_composition(fertilizer)?;
    }

    let multiplier = consumption::multiplier(setup);
    let targets = targets::adjusted_targets(multiplier, options.ei_fraction)?;

    let tank_compositions: HashMap<String, FertilizerComposition> = compositions
        .iter()
        .map(|(id, f)| (id.clone(), f.scaled_to_volume(setup.volume_liters)))
        .collect();
    let aggregate =
        aggregator::aggregate_with_report(events, &tank_compositions, options.window_days, as_of);
    let weekly_totals = aggregate.totals * (7.0 / f64::from(options.window_days));

    let status = classifier::classify(&weekly_totals, &targets);
    let recommendations = recommendation::recommend(
        &status,
        &targets,
        &weekly_totals,
        compositions,
        setup.volume_liters,
    )?;

    let elements = Element::ALL
        .into_iter()
        .filter_map(|element| {
            let target = *targets.get(&element)?;
            let weekly_total = weekly_totals.get(element);
            Some(ElementAssessment {
                element,
                weekly_total,
                target,
                status: *status.get(&element)?,
                progress_percent: classifier::progress_percent(weekly_total, &target),
            })
        })
        .collect();

    Ok(TankAnalysis {
        as_of,
        multiplier,
        demand: consumption::demand_band(multiplier),
        options,
        weekly_totals,
        display_totals: targets::to_display(&weekly_totals),
        elements,
        recommendations,
        aggregate,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementTrajectory {
    pub element: Element,
    pub start: f64,
    pub peak: f64,
    pub peak_day: u32,
    pub end: f64,
    /// First day the level exceeds the band's upper bound, if ever.
    pub first_day_above_target: Option<u32>,
}

/// Per-element peaks and threshold crossings of a projected sequence.
pub fn summarize_projection(
    points: &[ProjectionPoint],
    targets: &HashMap<Element, TargetRange>,
) -> Vec<ElementTrajectory> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };

    Element::ALL
        .into_iter()
        .map(|element| {
            let (peak_day, peak) = points
                .iter()
                .map(|p| (p.day, p.levels().get(element)))
                .fold((first.day, f64::MIN), |best, candidate| {
                    if candidate.1 > best.1 {
                        candidate
                    } else {
                        best
                    }
                });
            let first_day_above_target = targets.get(&element).and_then(|range| {
                points
                    .iter()
                    .find(|p| p.levels().get(element) > range.max())
                    .map(|p| p.day)
            });
            ElementTrajectory {
                element,
                start: first.levels().get(element),
                peak,
                peak_day,
                end: last.levels().get(element),
                first_day_above_target,
            }
        })
        .collect()
}
