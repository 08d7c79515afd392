//! Grams of a dry remineralizer needed to reach a TDS or GH target.

use crate::{error::AquadoseError, validation};
use aquadose_schemas::additive::Additive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum RemineralizationTarget {
    Tds(f64),
    Gh(f64),
}

impl RemineralizationTarget {
    pub fn mode_name(&self) -> &'static str {
        match self {
            RemineralizationTarget::Tds(_) => "tds",
            RemineralizationTarget::Gh(_) => "gh",
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            RemineralizationTarget::Tds(value) | RemineralizationTarget::Gh(value) => *value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RemineralizationResult {
    pub grams_per_liter: f64,
    pub total_grams: f64,
    pub result_tds: f64,
    pub result_gh: f64,
    pub result_kh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemineralizationPlan {
    Dose(RemineralizationResult),
    /// The water already sits at or above the target; nothing to add.
    TargetAlreadyReached { current: f64, target: f64 },
}

/// Parameters of water remineralized with `grams_per_liter` of `additive`.
pub fn resulting_parameters(
    additive: &Additive,
    starting_tds: f64,
    grams_per_liter: f64,
    volume_liters: f64,
) -> RemineralizationResult {
    RemineralizationResult {
        grams_per_liter,
        total_grams: grams_per_liter * volume_liters,
        result_tds: starting_tds + grams_per_liter * additive.tds_per_gram_per_liter,
        result_gh: grams_per_liter * additive.gh_per_gram_per_liter,
        result_kh: grams_per_liter * additive.kh_per_gram_per_liter,
    }
}

/// Sizes a dose of `additive` for `target`.
///
/// GH mode treats the starting water as having no hardness, as RO does.
///
/// # Errors
///
/// `InvalidRate` when the additive's rate for the active mode is not
/// positive; `InvalidVolume`/`NegativeParameter` for bad inputs.
pub fn solve_remineralization(
    additive: &Additive,
    starting_tds: f64,
    target: RemineralizationTarget,
    volume_liters: f64,
) -> Result<RemineralizationPlan, AquadoseError> {
    validation::validate_volume(volume_liters)?;
    validation::validate_non_negative("starting tds", starting_tds)?;
    validation::validate_finite("target", target.value())?;

    let (rate, current) = match target {
        RemineralizationTarget::Tds(_) => (additive.tds_per_gram_per_liter, starting_tds),
        RemineralizationTarget::Gh(_) => (additive.gh_per_gram_per_liter, 0.0),
    };
    if !rate.is_finite() || rate <= 0.0 {
        return Err(AquadoseError::InvalidRate {
            mode: target.mode_name().to_string(),
            rate,
        });
    }

    let deficit = target.value() - current;
    if deficit <= 0.0 {
        return Ok(RemineralizationPlan::TargetAlreadyReached {
            current,
            target: target.value(),
        });
    }

    let grams_per_liter = deficit / rate;
    Ok(RemineralizationPlan::Dose(resulting_parameters(
        additive,
        starting_tds,
        grams_per_liter,
        volume_liters,
    )))
}
