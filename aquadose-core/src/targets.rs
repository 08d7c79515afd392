//! Reference tables: Estimative Index weekly dosing bands, the display-form
//! bands derived from them for charts, and water-chemistry presets.
//!
//! Other modules look targets up here instead of restating constants.

use crate::{error::AquadoseError, validation};
use aquadose_schemas::nutrient::{Element, NutrientTotals};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// NO3 mass per unit of nitrogen mass (62.0 / 14.0).
pub const NITRATE_PER_NITROGEN: f64 = 4.43;
/// PO4 mass per unit of phosphorus mass (95.0 / 31.0).
pub const PHOSPHATE_PER_PHOSPHORUS: f64 = 3.06;

/// An inclusive ppm band. Construction guarantees `0 <= min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTargetRange")]
pub struct TargetRange {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawTargetRange {
    min: f64,
    max: f64,
}

impl TryFrom<RawTargetRange> for TargetRange {
    type Error = AquadoseError;

    fn try_from(raw: RawTargetRange) -> Result<Self, Self::Error> {
        TargetRange::new(raw.min, raw.max)
    }
}

impl TargetRange {
    pub fn new(min: f64, max: f64) -> Result<Self, AquadoseError> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(AquadoseError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Multiplies both bounds by `factor`, which must be positive.
    pub fn scaled(&self, factor: f64) -> Result<Self, AquadoseError> {
        validation::validate_positive_factor("range scale", factor)?;
        Self::new(self.min * factor, self.max * factor)
    }
}

impl fmt::Display for TargetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}-{:.2} ppm", self.min, self.max)
    }
}

/// Unscaled EI weekly dosing band in ppm of the element.
pub fn ei_weekly_range(element: Element) -> TargetRange {
    let (min, max) = match element {
        Element::Nitrogen => (4.5, 6.8),
        Element::Phosphorus => (0.5, 1.0),
        Element::Potassium => (10.0, 30.0),
        Element::Iron => (0.1, 0.5),
        Element::Magnesium => (2.0, 5.0),
    };
    TargetRange { min, max }
}

pub fn ei_weekly_targets() -> HashMap<Element, TargetRange> {
    Element::ALL
        .into_iter()
        .map(|element| (element, ei_weekly_range(element)))
        .collect()
}

/// EI bands scaled for a particular tank: `band × multiplier × ei_fraction`.
///
/// `ei_fraction` is the share of full EI the keeper doses (1.0 full, 0.5 lean).
pub fn adjusted_targets(
    multiplier: f64,
    ei_fraction: f64,
) -> Result<HashMap<Element, TargetRange>, AquadoseError> {
    validation::validate_positive_factor("consumption multiplier", multiplier)?;
    validation::validate_positive_factor("EI target fraction", ei_fraction)?;

    let factor = multiplier * ei_fraction;
    Element::ALL
        .into_iter()
        .map(|element| {
            ei_weekly_range(element)
                .scaled(factor)
                .map(|range| (element, range))
        })
        .collect()
}

/// The forms in which hobby test kits and charts report nutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayNutrient {
    Nitrate,
    Phosphate,
    Potassium,
    Iron,
}

impl DisplayNutrient {
    pub const ALL: [DisplayNutrient; 4] = [
        DisplayNutrient::Nitrate,
        DisplayNutrient::Phosphate,
        DisplayNutrient::Potassium,
        DisplayNutrient::Iron,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DisplayNutrient::Nitrate => "Nitrate (NO3)",
            DisplayNutrient::Phosphate => "Phosphate (PO4)",
            DisplayNutrient::Potassium => "Potassium (K)",
            DisplayNutrient::Iron => "Iron (Fe)",
        }
    }

    /// The element this display form is measured from and the conversion factor.
    fn source(&self) -> (Element, f64) {
        match self {
            DisplayNutrient::Nitrate => (Element::Nitrogen, NITRATE_PER_NITROGEN),
            DisplayNutrient::Phosphate => (Element::Phosphorus, PHOSPHATE_PER_PHOSPHORUS),
            DisplayNutrient::Potassium => (Element::Potassium, 1.0),
            DisplayNutrient::Iron => (Element::Iron, 1.0),
        }
    }
}

/// Nutrient levels in display form (nitrate as NO3, phosphate as PO4).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayNutrients {
    pub nitrate: f64,
    pub phosphate: f64,
    pub potassium: f64,
    pub iron: f64,
}

impl DisplayNutrients {
    pub fn get(&self, nutrient: DisplayNutrient) -> f64 {
        match nutrient {
            DisplayNutrient::Nitrate => self.nitrate,
            DisplayNutrient::Phosphate => self.phosphate,
            DisplayNutrient::Potassium => self.potassium,
            DisplayNutrient::Iron => self.iron,
        }
    }
}

pub fn to_display(totals: &NutrientTotals) -> DisplayNutrients {
    let convert = |nutrient: DisplayNutrient| {
        let (element, factor) = nutrient.source();
        totals.get(element) * factor
    };
    DisplayNutrients {
        nitrate: convert(DisplayNutrient::Nitrate),
        phosphate: convert(DisplayNutrient::Phosphate),
        potassium: convert(DisplayNutrient::Potassium),
        iron: convert(DisplayNutrient::Iron),
    }
}

/// Chart overlay band for a display form, derived from the EI element table.
pub fn display_band(nutrient: DisplayNutrient) -> TargetRange {
    let (element, factor) = nutrient.source();
    let base = ei_weekly_range(element);
    TargetRange {
        min: base.min * factor,
        max: base.max * factor,
    }
}

/// A named set of water-chemistry ranges for a kind of aquarium.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterPreset {
    pub name: &'static str,
    pub description: &'static str,
    pub gh: (f64, f64),
    pub kh: (f64, f64),
    pub ph: (f64, f64),
    pub tds: (f64, f64),
}

impl WaterPreset {
    pub fn gh_midpoint(&self) -> f64 {
        (self.gh.0 + self.gh.1) / 2.0
    }

    pub fn kh_midpoint(&self) -> f64 {
        (self.kh.0 + self.kh.1) / 2.0
    }
}

static WATER_PRESETS: [WaterPreset; 5] = [
    WaterPreset {
        name: "planted-community",
        description: "General planted community tank",
        gh: (4.0, 8.0),
        kh: (3.0, 6.0),
        ph: (6.5, 7.5),
        tds: (150.0, 250.0),
    },
    WaterPreset {
        name: "soft-blackwater",
        description: "Soft, acidic water for tetras, rasboras and wild bettas",
        gh: (1.0, 4.0),
        kh: (0.0, 2.0),
        ph: (5.5, 6.5),
        tds: (30.0, 100.0),
    },
    WaterPreset {
        name: "caridina-shrimp",
        description: "Crystal and bee shrimp on active soil",
        gh: (4.0, 6.0),
        kh: (0.0, 1.0),
        ph: (5.8, 6.5),
        tds: (100.0, 160.0),
    },
    WaterPreset {
        name: "neocaridina-shrimp",
        description: "Cherry shrimp and other Neocaridina",
        gh: (6.0, 8.0),
        kh: (2.0, 5.0),
        ph: (6.8, 7.6),
        tds: (150.0, 250.0),
    },
    WaterPreset {
        name: "african-rift-lake",
        description: "Malawi and Tanganyika cichlids",
        gh: (10.0, 18.0),
        kh: (10.0, 16.0),
        ph: (7.8, 8.6),
        tds: (300.0, 500.0),
    },
];

pub fn water_presets() -> &'static [WaterPreset] {
    &WATER_PRESETS
}

pub fn water_preset(name: &str) -> Option<&'static WaterPreset> {
    WATER_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn range_rejects_min_above_max() {
        assert!(TargetRange::new(5.0, 2.0).is_err());
        assert!(TargetRange::new(-1.0, 2.0).is_err());
        let point = TargetRange::new(2.0, 2.0).unwrap();
        assert!(point.contains(2.0));
        assert!(!point.contains(2.1));
    }

    #[test]
    fn range_rejects_min_above_max_when_deserialized() {
        let parsed: Result<TargetRange, _> = serde_json::from_str(r#"{"min": 3.0, "max": 1.0}"#);
        assert!(parsed.is_err());
        let parsed: TargetRange = serde_json::from_str(r#"{"min": 1.0, "max": 3.0}"#).unwrap();
        assert_relative_eq!(parsed.midpoint(), 2.0);
    }

    #[test]
    fn every_element_has_a_band() {
        let targets = ei_weekly_targets();
        assert_eq!(targets.len(), Element::ALL.len());
        for range in targets.values() {
            assert!(range.min() > 0.0);
            assert!(range.min() <= range.max());
        }
    }

    #[test]
    fn adjusted_targets_scale_both_bounds() {
        let targets = adjusted_targets(2.0, 0.5).unwrap();
        let base = ei_weekly_range(Element::Potassium);
        let scaled = targets[&Element::Potassium];
        assert_relative_eq!(scaled.min(), base.min());
        assert_relative_eq!(scaled.max(), base.max());

        let targets = adjusted_targets(1.6, 1.0).unwrap();
        assert_relative_eq!(targets[&Element::Nitrogen].max(), 6.8 * 1.6);
    }

    #[test]
    fn adjusted_targets_reject_non_positive_factors() {
        assert!(adjusted_targets(0.0, 1.0).is_err());
        assert!(adjusted_targets(1.0, -0.5).is_err());
    }

    #[test]
    fn display_bands_derive_from_element_bands() {
        let nitrate = display_band(DisplayNutrient::Nitrate);
        assert_relative_eq!(nitrate.min(), 4.5 * NITRATE_PER_NITROGEN);
        let iron = display_band(DisplayNutrient::Iron);
        assert_eq!(iron, ei_weekly_range(Element::Iron));
    }

    #[test]
    fn display_conversion_keeps_unit_families_apart() {
        let totals = NutrientTotals {
            nitrogen: 2.0,
            phosphorus: 1.0,
            potassium: 10.0,
            ..Default::default()
        };
        let display = to_display(&totals);
        assert_relative_eq!(display.nitrate, 8.86);
        assert_relative_eq!(display.phosphate, 3.06);
        assert_relative_eq!(display.potassium, 10.0);
    }

    #[test]
    fn presets_are_found_case_insensitively() {
        let preset = water_preset("Caridina-Shrimp").unwrap();
        assert_relative_eq!(preset.gh_midpoint(), 5.0);
        assert!(water_preset("marine-reef").is_none());
    }
}
