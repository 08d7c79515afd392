//! Consumption multiplier: how much faster than a baseline tank a given setup
//! draws nutrients down.

use aquadose_schemas::tank::{LightLevel, PlantDensity, TankSetup};
use serde::{Deserialize, Serialize};

pub fn density_factor(density: PlantDensity) -> f64 {
    match density {
        PlantDensity::Low => 0.6,
        PlantDensity::Medium => 1.0,
        PlantDensity::High => 1.6,
        PlantDensity::Dutch => 2.4,
    }
}

pub fn light_factor(light: LightLevel) -> f64 {
    match light {
        LightLevel::Low => 0.7,
        LightLevel::Medium => 1.0,
        LightLevel::High => 1.5,
    }
}

pub fn co2_factor(has_co2: bool) -> f64 {
    if has_co2 {
        1.5
    } else {
        1.0
    }
}

/// Scalar demand multiplier for a tank: density × light × CO2. Not clamped.
pub fn multiplier(setup: &TankSetup) -> f64 {
    density_factor(setup.plant_density)
        * light_factor(setup.light_level)
        * co2_factor(setup.has_co2)
}

/// Coarse demand classification for colour banding in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

impl DemandLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DemandLevel::Low => "low",
            DemandLevel::Medium => "medium",
            DemandLevel::High => "high",
        }
    }
}

pub const MEDIUM_DEMAND_THRESHOLD: f64 = 1.5;
pub const HIGH_DEMAND_THRESHOLD: f64 = 3.0;

pub fn demand_band(multiplier: f64) -> DemandLevel {
    if multiplier >= HIGH_DEMAND_THRESHOLD {
        DemandLevel::High
    } else if multiplier >= MEDIUM_DEMAND_THRESHOLD {
        DemandLevel::Medium
    } else {
        DemandLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DENSITIES: [PlantDensity; 4] = [
        PlantDensity::Low,
        PlantDensity::Medium,
        PlantDensity::High,
        PlantDensity::Dutch,
    ];
    const LIGHTS: [LightLevel; 3] = [LightLevel::Low, LightLevel::Medium, LightLevel::High];

    fn setup(density: PlantDensity, light: LightLevel, has_co2: bool) -> TankSetup {
        TankSetup {
            volume_liters: 100.0,
            plant_density: density,
            light_level: light,
            has_co2,
        }
    }

    #[test]
    fn multiplier_is_positive_for_every_setup() {
        for density in DENSITIES {
            for light in LIGHTS {
                for co2 in [false, true] {
                    assert!(multiplier(&setup(density, light, co2)) > 0.0);
                }
            }
        }
    }

    #[test]
    fn multiplier_is_monotone_in_each_factor() {
        for light in LIGHTS {
            for co2 in [false, true] {
                let values: Vec<f64> = DENSITIES
                    .iter()
                    .map(|d| multiplier(&setup(*d, light, co2)))
                    .collect();
                assert!(values.windows(2).all(|w| w[0] <= w[1]));
            }
        }
        for density in DENSITIES {
            let values: Vec<f64> = LIGHTS
                .iter()
                .map(|l| multiplier(&setup(density, *l, false)))
                .collect();
            assert!(values.windows(2).all(|w| w[0] <= w[1]));
            assert!(
                multiplier(&setup(density, LightLevel::Medium, true))
                    >= multiplier(&setup(density, LightLevel::Medium, false))
            );
        }
    }

    #[test]
    fn known_extremes() {
        assert_relative_eq!(
            multiplier(&setup(PlantDensity::Low, LightLevel::Low, false)),
            0.42,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            multiplier(&setup(PlantDensity::Dutch, LightLevel::High, true)),
            5.4,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            multiplier(&setup(PlantDensity::Medium, LightLevel::Medium, false)),
            1.0
        );
    }

    #[test]
    fn demand_band_thresholds() {
        assert_eq!(demand_band(1.49), DemandLevel::Low);
        assert_eq!(demand_band(1.5), DemandLevel::Medium);
        assert_eq!(demand_band(2.99), DemandLevel::Medium);
        assert_eq!(demand_band(3.0), DemandLevel::High);
    }
}
