//! Fertilizer labels and the journal entries that record their use.

use crate::{error::ParseVariantError, nutrient::NutrientTotals};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseUnit {
    Ml,
    G,
}

impl DoseUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DoseUnit::Ml => "ml",
            DoseUnit::G => "g",
        }
    }
}

impl fmt::Display for DoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoseUnit {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ml" => Ok(DoseUnit::Ml),
            "g" => Ok(DoseUnit::G),
            _ => Err(ParseVariantError::new("dose unit", s, "ml, g")),
        }
    }
}

/// A fertilizer's nutrient content.
///
/// `ppm_per_unit` follows the manufacturer convention: the concentration that
/// one unit (ml or g) adds to one liter of water.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerComposition {
    pub fertilizer_id: String,
    pub name: String,
    pub unit: DoseUnit,
    #[serde(default)]
    pub ppm_per_unit: NutrientTotals,
}

impl FertilizerComposition {
    /// Returns a copy whose `ppm_per_unit` is the concentration one unit adds
    /// to a tank of `volume_liters`.
    pub fn scaled_to_volume(&self, volume_liters: f64) -> Self {
        Self {
            ppm_per_unit: self.ppm_per_unit * (1.0 / volume_liters),
            ..self.clone()
        }
    }
}

/// One logged addition of a fertilizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosingEvent {
    pub fertilizer_id: String,
    pub amount: f64,
    pub date: NaiveDate,
}
