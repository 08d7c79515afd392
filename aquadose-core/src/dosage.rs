//! Fertilizer calculator formulas.
//!
//! The reverse form backs a per-liter concentration out of a manufacturer's
//! dosing instruction; the forward form sizes a single dose for a weekly
//! target. Both work in the per-liter convention of `FertilizerComposition`.

use crate::{error::AquadoseError, targets, validation};
use aquadose_schemas::nutrient::Element;

/// The weekly ppm an EI regime aims for: the midpoint of the element's band.
pub fn ei_weekly_target(element: Element) -> f64 {
    targets::ei_weekly_range(element).midpoint()
}

/// `(target_weekly_ppm × ei_fraction × volume) / (dose_amount × doses_per_week)`.
pub fn ppm_per_unit_from_instruction(
    target_weekly_ppm: f64,
    ei_fraction: f64,
    volume_liters: f64,
    dose_amount: f64,
    doses_per_week: u32,
) -> Result<f64, AquadoseError> {
    validation::validate_non_negative("target weekly ppm", target_weekly_ppm)?;
    validation::validate_positive_factor("EI target fraction", ei_fraction)?;
    validation::validate_volume(volume_liters)?;
    validation::validate_positive_factor("dose amount", dose_amount)?;
    validation::validate_positive_factor("doses per week", f64::from(doses_per_week))?;

    Ok(target_weekly_ppm * ei_fraction * volume_liters / (dose_amount * f64::from(doses_per_week)))
}

/// Size of each dose needed to reach `target_weekly_ppm × ei_fraction` per week.
pub fn dose_for_weekly_target(
    ppm_per_unit: f64,
    target_weekly_ppm: f64,
    ei_fraction: f64,
    volume_liters: f64,
    doses_per_week: u32,
) -> Result<f64, AquadoseError> {
    validation::validate_positive_factor("ppm per unit", ppm_per_unit)?;
    validation::validate_non_negative("target weekly ppm", target_weekly_ppm)?;
    validation::validate_positive_factor("EI target fraction", ei_fraction)?;
    validation::validate_volume(volume_liters)?;
    validation::validate_positive_factor("doses per week", f64::from(doses_per_week))?;

    Ok(target_weekly_ppm * ei_fraction * volume_liters / (ppm_per_unit * f64::from(doses_per_week)))
}
