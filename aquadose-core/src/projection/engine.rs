use super::state::{ProjectionEvent, ProjectionPoint, ProjectionState};
use crate::{error::AquadoseError, logger::ProjectionLogger};
use aquadose_schemas::nutrient::NutrientTotals;

#[derive(Debug, Clone)]
pub struct WaterChange {
    pub fraction: f64,
    pub day: u32,
    /// What the fresh water brings in, already scaled by `fraction`.
    pub contribution: NutrientTotals,
    pub source_id: Option<String>,
}

/// Discrete daily simulation of nutrient levels.
///
/// Dosing accumulates without an uptake term: plant demand is carried by the
/// target bands, not subtracted here.
pub struct ProjectionSimulator {
    pub(super) state: ProjectionState,
    pub(super) initial_levels: NutrientTotals,
    pub(super) daily_dose_rates: NutrientTotals,
    pub(super) horizon_days: u32,
    pub(super) water_change: Option<WaterChange>,
    pub(super) log_path: Option<String>,
    pub(super) logger: Option<ProjectionLogger>,
}

impl ProjectionSimulator {
    /// Runs the full horizon from day 0 and returns `horizon_days + 1` points.
    /// Every call starts again from the initial levels and rewrites the log
    /// from day 0.
    pub fn run(&mut self) -> Result<Vec<ProjectionPoint>, AquadoseError> {
        if let Some(path) = &self.log_path {
            self.logger = Some(
                ProjectionLogger::new(path).map_err(|e| AquadoseError::FileIO(path.clone(), e))?,
            );
        }
        self.state = ProjectionState {
            day: 0,
            levels: self.initial_levels,
            events: Vec::new(),
        };

        if let Some(logger) = &mut self.logger {
            logger.log_state(&self.state)?;
        }

        let mut points = Vec::with_capacity(self.horizon_days as usize + 1);
        points.push(ProjectionPoint::from(&self.state));

        loop {
            // The tick method will return false when the horizon is reached
            if !self.tick()? {
                break;
            }
            points.push(ProjectionPoint::from(&self.state));
        }
        Ok(points)
    }

    pub fn tick(&mut self) -> Result<bool, AquadoseError> {
        if self.state.day >= self.horizon_days {
            return Ok(false);
        }

        self.state.events.clear();
        self.state.day += 1;

        let mut levels = self.state.levels + self.daily_dose_rates;

        if let Some(change) = self.water_change.as_ref().filter(|c| c.day == self.state.day) {
            levels = levels * (1.0 - change.fraction) + change.contribution;
            self.state.events.push(ProjectionEvent::WaterChange {
                fraction: change.fraction,
                source_id: change.source_id.clone(),
            });
        }

        self.state.levels = levels.clamp_non_negative();

        if let Some(logger) = &mut self.logger {
            logger.log_state(&self.state)?;
        }

        Ok(true)
    }

    pub fn get_day(&self) -> u32 {
        self.state.day
    }

    pub fn get_levels(&self) -> &NutrientTotals {
        &self.state.levels
    }

    pub fn get_events(&self) -> &[ProjectionEvent] {
        &self.state.events
    }
}
