//! Element-level nutrient quantities.
//!
//! Every value in this module is expressed as ppm (mg/L) *of the element
//! itself*: nitrogen as N, phosphorus as P. The NO3/PO4 forms shown on test
//! kits live in a separate display type in the engine and are never stored here.

use crate::error::ParseVariantError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

/// The nutrients the Estimative Index method tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Nitrogen,
    Phosphorus,
    Potassium,
    Iron,
    Magnesium,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Nitrogen,
        Element::Phosphorus,
        Element::Potassium,
        Element::Iron,
        Element::Magnesium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Nitrogen => "nitrogen",
            Element::Phosphorus => "phosphorus",
            Element::Potassium => "potassium",
            Element::Iron => "iron",
            Element::Magnesium => "magnesium",
        }
    }

    /// Capitalized label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Element::Nitrogen => "Nitrogen",
            Element::Phosphorus => "Phosphorus",
            Element::Potassium => "Potassium",
            Element::Iron => "Iron",
            Element::Magnesium => "Magnesium",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Element {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nitrogen" | "n" => Ok(Element::Nitrogen),
            "phosphorus" | "p" => Ok(Element::Phosphorus),
            "potassium" | "k" => Ok(Element::Potassium),
            "iron" | "fe" => Ok(Element::Iron),
            "magnesium" | "mg" => Ok(Element::Magnesium),
            _ => Err(ParseVariantError::new(
                "element",
                s,
                "nitrogen, phosphorus, potassium, iron, magnesium",
            )),
        }
    }
}

/// Per-element ppm quantities. Missing fields deserialize as zero so that a
/// partially known fertilizer label never produces `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientTotals {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub iron: f64,
    pub magnesium: f64,
}

impl NutrientTotals {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, element: Element) -> f64 {
        match element {
            Element::Nitrogen => self.nitrogen,
            Element::Phosphorus => self.phosphorus,
            Element::Potassium => self.potassium,
            Element::Iron => self.iron,
            Element::Magnesium => self.magnesium,
        }
    }

    pub fn set(&mut self, element: Element, value: f64) {
        match element {
            Element::Nitrogen => self.nitrogen = value,
            Element::Phosphorus => self.phosphorus = value,
            Element::Potassium => self.potassium = value,
            Element::Iron => self.iron = value,
            Element::Magnesium => self.magnesium = value,
        }
    }

    /// Builds a value by evaluating `f` once per element.
    pub fn from_fn<F: FnMut(Element) -> f64>(mut f: F) -> Self {
        let mut totals = Self::zero();
        for element in Element::ALL {
            totals.set(element, f(element));
        }
        totals
    }

    /// Applies `f` to every element value.
    pub fn map<F: FnMut(f64) -> f64>(&self, mut f: F) -> Self {
        Self::from_fn(|element| f(self.get(element)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, f64)> + '_ {
        Element::ALL.into_iter().map(move |element| (element, self.get(element)))
    }

    pub fn is_all_zero(&self) -> bool {
        self.iter().all(|(_, value)| value == 0.0)
    }

    pub fn clamp_non_negative(&self) -> Self {
        self.map(|value| value.max(0.0))
    }

    /// Converts a weekly total into an average daily rate.
    pub fn per_day(&self) -> Self {
        self.map(|value| value / 7.0)
    }
}

impl Add for NutrientTotals {
    type Output = NutrientTotals;

    fn add(self, rhs: NutrientTotals) -> NutrientTotals {
        NutrientTotals::from_fn(|element| self.get(element) + rhs.get(element))
    }
}

impl Mul<f64> for NutrientTotals {
    type Output = NutrientTotals;

    fn mul(self, factor: f64) -> NutrientTotals {
        self.map(|value| value * factor)
    }
}
