//! Nutrients carried into the tank by fresh water during a water change.

use crate::{
    error::AquadoseError,
    targets::{NITRATE_PER_NITROGEN, PHOSPHATE_PER_PHOSPHORUS},
    validation,
};
use aquadose_schemas::{nutrient::NutrientTotals, water::WaterSourceProfile};

/// Element-level concentrations of a source water. Nitrate and phosphate are
/// converted from their test-kit forms to N and P.
pub fn source_concentrations(source: &WaterSourceProfile) -> NutrientTotals {
    NutrientTotals {
        nitrogen: source.nitrate.unwrap_or(0.0) / NITRATE_PER_NITROGEN,
        phosphorus: source.phosphate.unwrap_or(0.0) / PHOSPHATE_PER_PHOSPHORUS,
        potassium: source.potassium.unwrap_or(0.0),
        iron: source.iron.unwrap_or(0.0),
        magnesium: source.magnesium.unwrap_or(0.0),
    }
}

/// Concentration imported by replacing `water_change_fraction` of the tank
/// with `source`. Existing in-tank levels are not considered.
pub fn contribution(
    source: &WaterSourceProfile,
    water_change_fraction: f64,
) -> Result<NutrientTotals, AquadoseError> {
    validation::validate_fraction("water change fraction", water_change_fraction)?;
    validation::validate_water_source(source)?;
    Ok(source_concentrations(source) * water_change_fraction)
}
