//! Defines the tank setup that drives how hungry an aquarium is for nutrients.

use crate::error::ParseVariantError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How densely the tank is planted. `Dutch` is a stem-plant dominated layout
/// with little or no hardscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantDensity {
    Low,
    Medium,
    High,
    Dutch,
}

impl FromStr for PlantDensity {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PlantDensity::Low),
            "medium" => Ok(PlantDensity::Medium),
            "high" => Ok(PlantDensity::High),
            "dutch" => Ok(PlantDensity::Dutch),
            _ => Err(ParseVariantError::new("plant density", s, "low, medium, high, dutch")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightLevel {
    Low,
    Medium,
    High,
}

impl FromStr for LightLevel {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(LightLevel::Low),
            "medium" => Ok(LightLevel::Medium),
            "high" => Ok(LightLevel::High),
            _ => Err(ParseVariantError::new("light level", s, "low, medium, high")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSetup {
    pub volume_liters: f64,
    pub plant_density: PlantDensity,
    pub light_level: LightLevel,
    pub has_co2: bool,
}

/// The aquarium record as the inventory stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aquarium {
    pub aquarium_id: String,
    pub name: String,
    pub setup: TankSetup,
    pub water_source_id: Option<String>,
}
