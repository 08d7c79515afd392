//! Multi-day nutrient trajectory: daily dosing plus an optional scheduled
//! water change.

pub mod builder;
pub mod engine;
pub mod state;

use crate::error::AquadoseError;
use aquadose_schemas::{nutrient::NutrientTotals, tank::TankSetup, water::WaterSourceProfile};
use builder::ProjectionBuilder;
use state::ProjectionPoint;

/// Projects nutrient levels for `horizon_days` days.
///
/// The result has `horizon_days + 1` points and starts with `current_levels`
/// on day 0. A water change on `water_change_day == 0` never fires since day 0
/// is the unmodified starting point.
pub fn project(
    current_levels: &NutrientTotals,
    daily_dose_rates: &NutrientTotals,
    setup: &TankSetup,
    horizon_days: u32,
    water_change_fraction: f64,
    water_change_day: u32,
    source: Option<&WaterSourceProfile>,
) -> Result<Vec<ProjectionPoint>, AquadoseError> {
    let mut builder = ProjectionBuilder::new()
        .with_current_levels(*current_levels)
        .with_daily_dose_rates(*daily_dose_rates)
        .with_setup(setup.clone())
        .with_horizon_days(horizon_days)
        .with_water_change(water_change_fraction, water_change_day);
    if let Some(source) = source {
        builder = builder.with_source(source.clone());
    }
    builder.build()?.run()
}
