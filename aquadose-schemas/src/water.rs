//! Source-water chemistry as measured or published by a water utility.

use serde::{Deserialize, Serialize};

/// A tap, RO, well or rain water profile. Hardness is in °dH, pH is unitless
/// and everything else is mg/L in the form a test kit reports it (nitrate as
/// NO3, phosphate as PO4). Unmeasured parameters stay `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSourceProfile {
    pub source_id: String,
    pub name: String,
    pub gh: Option<f64>,
    pub kh: Option<f64>,
    pub ph: Option<f64>,
    pub tds: Option<f64>,
    pub nitrate: Option<f64>,
    pub nitrite: Option<f64>,
    pub ammonia: Option<f64>,
    pub phosphate: Option<f64>,
    pub calcium: Option<f64>,
    pub magnesium: Option<f64>,
    pub potassium: Option<f64>,
    pub sodium: Option<f64>,
    pub chloride: Option<f64>,
    pub sulfate: Option<f64>,
    pub iron: Option<f64>,
    pub manganese: Option<f64>,
    pub copper: Option<f64>,
    pub zinc: Option<f64>,
    pub boron: Option<f64>,
    pub molybdenum: Option<f64>,
    pub cobalt: Option<f64>,
    pub silicate: Option<f64>,
}

impl WaterSourceProfile {
    /// Every measured parameter except pH, paired with its name.
    pub fn concentrations(&self) -> [(&'static str, Option<f64>); 21] {
        [
            ("gh", self.gh),
            ("kh", self.kh),
            ("tds", self.tds),
            ("nitrate", self.nitrate),
            ("nitrite", self.nitrite),
            ("ammonia", self.ammonia),
            ("phosphate", self.phosphate),
            ("calcium", self.calcium),
            ("magnesium", self.magnesium),
            ("potassium", self.potassium),
            ("sodium", self.sodium),
            ("chloride", self.chloride),
            ("sulfate", self.sulfate),
            ("iron", self.iron),
            ("manganese", self.manganese),
            ("copper", self.copper),
            ("zinc", self.zinc),
            ("boron", self.boron),
            ("molybdenum", self.molybdenum),
            ("cobalt", self.cobalt),
            ("silicate", self.silicate),
        ]
    }
}
