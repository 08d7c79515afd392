use aquadose_schemas::nutrient::NutrientTotals;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectionEvent {
    WaterChange {
        fraction: f64,
        source_id: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ProjectionState {
    pub day: u32,
    pub levels: NutrientTotals,
    pub events: Vec<ProjectionEvent>,
}

/// Nutrient levels (ppm of the element) at the end of a simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub day: u32,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub iron: f64,
    pub magnesium: f64,
}

impl ProjectionPoint {
    pub fn new(day: u32, levels: &NutrientTotals) -> Self {
        Self {
            day,
            nitrogen: levels.nitrogen,
            phosphorus: levels.phosphorus,
            potassium: levels.potassium,
            iron: levels.iron,
            magnesium: levels.magnesium,
        }
    }

    pub fn levels(&self) -> NutrientTotals {
        NutrientTotals {
            nitrogen: self.nitrogen,
            phosphorus: self.phosphorus,
            potassium: self.potassium,
            iron: self.iron,
            magnesium: self.magnesium,
        }
    }
}

impl From<&ProjectionState> for ProjectionPoint {
    fn from(state: &ProjectionState) -> Self {
        ProjectionPoint::new(state.day, &state.levels)
    }
}
