//! Input checks shared by the engine entry points. Every public calculation
//! validates before computing so callers never receive a partial result.

use crate::error::AquadoseError;
use aquadose_schemas::{
    fertilizer::FertilizerComposition, nutrient::NutrientTotals, tank::TankSetup,
    water::WaterSourceProfile,
};

pub fn validate_finite(parameter: &str, value: f64) -> Result<(), AquadoseError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AquadoseError::NonFiniteValue {
            parameter: parameter.to_string(),
            value,
        })
    }
}

pub fn validate_non_negative(parameter: &str, value: f64) -> Result<(), AquadoseError> {
    validate_finite(parameter, value)?;
    if value < 0.0 {
        return Err(AquadoseError::NegativeParameter {
            parameter: parameter.to_string(),
            value,
        });
    }
    Ok(())
}

pub fn validate_volume(volume_liters: f64) -> Result<(), AquadoseError> {
    if !volume_liters.is_finite() || volume_liters <= 0.0 {
        return Err(AquadoseError::InvalidVolume(volume_liters));
    }
    Ok(())
}

pub fn validate_fraction(parameter: &str, value: f64) -> Result<(), AquadoseError> {
    if !(0.0..=1.0).contains(&value) {
        // Also catches NaN, which fails every range check.
        return Err(AquadoseError::InvalidFraction {
            parameter: parameter.to_string(),
            value,
        });
    }
    Ok(())
}

pub fn validate_positive_factor(parameter: &str, value: f64) -> Result<(), AquadoseError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AquadoseError::InvalidFactor {
            parameter: parameter.to_string(),
            value,
        });
    }
    Ok(())
}

pub fn validate_setup(setup: &TankSetup) -> Result<(), AquadoseError> {
    validate_volume(setup.volume_liters)
}

pub fn validate_totals(label: &str, totals: &NutrientTotals) -> Result<(), AquadoseError> {
    for (element, value) in totals.iter() {
        validate_non_negative(&format!("{}.{}", label, element), value)?;
    }
    Ok(())
}

/// A fertilizer's per-unit strengths must be finite and non-negative.
pub fn validate_composition(fertilizer: &FertilizerComposition) -> Result<(), AquadoseError> {
    validate_totals(&fertilizer.fertilizer_id, &fertilizer.ppm_per_unit)
}

pub fn validate_water_source(source: &WaterSourceProfile) -> Result<(), AquadoseError> {
    if let Some(ph) = source.ph {
        if !(0.0..=14.0).contains(&ph) {
            return Err(AquadoseError::InvalidPh(ph));
        }
    }
    for (parameter, value) in source.concentrations() {
        if let Some(value) = value {
            validate_non_negative(parameter, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aquadose_schemas::{
        fertilizer::DoseUnit,
        tank::{LightLevel, PlantDensity},
    };

    fn fertilizer(ppm_per_unit: NutrientTotals) -> FertilizerComposition {
        FertilizerComposition {
            fertilizer_id: "FERT-X".to_string(),
            name: "Mystery bottle".to_string(),
            unit: DoseUnit::Ml,
            ppm_per_unit,
        }
    }

    #[test]
    fn rejects_non_positive_volume() {
        let setup = TankSetup {
            volume_liters: -5.0,
            plant_density: PlantDensity::Low,
            light_level: LightLevel::Low,
            has_co2: false,
        };
        assert!(matches!(
            validate_setup(&setup),
            Err(AquadoseError::InvalidVolume(_))
        ));
        assert!(validate_volume(0.0).is_err());
        assert!(validate_volume(f64::NAN).is_err());
    }

    #[test]
    fn water_source_ph_must_be_in_range() {
        let source = WaterSourceProfile {
            ph: Some(14.5),
            ..Default::default()
        };
        assert!(matches!(
            validate_water_source(&source),
            Err(AquadoseError::InvalidPh(_))
        ));
    }

    #[test]
    fn water_source_rejects_negative_concentrations() {
        let source = WaterSourceProfile {
            ph: Some(7.2),
            nitrate: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            validate_water_source(&source),
            Err(AquadoseError::NegativeParameter { .. })
        ));
    }

    #[test]
    fn fractions_outside_unit_interval_are_rejected() {
        assert!(validate_fraction("water change fraction", 0.0).is_ok());
        assert!(validate_fraction("water change fraction", 1.0).is_ok());
        assert!(validate_fraction("water change fraction", 1.2).is_err());
        assert!(validate_fraction("water change fraction", f64::NAN).is_err());
    }

    #[test]
    fn compositions_must_be_finite_and_non_negative() {
        let sound = fertilizer(NutrientTotals {
            nitrogen: 27.7,
            potassium: 77.3,
            ..Default::default()
        });
        assert!(validate_composition(&sound).is_ok());

        let negative = fertilizer(NutrientTotals {
            nitrogen: -5.0,
            ..Default::default()
        });
        match validate_composition(&negative) {
            Err(AquadoseError::NegativeParameter { parameter, value }) => {
                assert!(parameter.starts_with("FERT-X."));
                assert_eq!(value, -5.0);
            }
            other => panic!("expected a negative-parameter error, got {:?}", other),
        }

        let nan = fertilizer(NutrientTotals {
            potassium: f64::NAN,
            ..Default::default()
        });
        assert!(matches!(
            validate_composition(&nan),
            Err(AquadoseError::NonFiniteValue { .. })
        ));
    }
}
