use crate::{
    error::AquadoseError,
    logger::ProjectionLogger,
    projection::{
        engine::{ProjectionSimulator, WaterChange},
        state::ProjectionState,
    },
    validation, water_source,
};
use aquadose_schemas::{nutrient::NutrientTotals, tank::TankSetup, water::WaterSourceProfile};

/// A fluent builder for constructing a `ProjectionSimulator`.
///
/// Starting levels, daily dose rates and the tank setup are required; a
/// water change and its source water are optional.
#[derive(Default)]
pub struct ProjectionBuilder {
    current_levels: Option<NutrientTotals>,
    daily_dose_rates: NutrientTotals,
    setup: Option<TankSetup>,
    horizon_days: u32,
    water_change: Option<(f64, u32)>,
    source: Option<WaterSourceProfile>,
    log_path: Option<String>,
}

impl ProjectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the measured or estimated nutrient levels on day 0.
    pub fn with_current_levels(mut self, levels: NutrientTotals) -> Self {
        self.current_levels = Some(levels);
        self
    }

    /// Sets the ppm added to the tank every simulated day.
    pub fn with_daily_dose_rates(mut self, rates: NutrientTotals) -> Self {
        self.daily_dose_rates = rates;
        self
    }

    pub fn with_setup(mut self, setup: TankSetup) -> Self {
        self.setup = Some(setup);
        self
    }

    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    /// Schedules a water change replacing `fraction` of the tank on `day`.
    pub fn with_water_change(mut self, fraction: f64, day: u32) -> Self {
        self.water_change = Some((fraction, day));
        self
    }

    /// Sets the chemistry of the water used for the water change. Without a
    /// source the change dilutes only.
    pub fn with_source(mut self, source: WaterSourceProfile) -> Self {
        self.source = Some(source);
        self
    }

    /// Configures the simulator to write one CSV row per simulated day.
    pub fn with_timeseries_logging_to_file(mut self, path: &str) -> Self {
        self.log_path = Some(path.to_string());
        self
    }

    /// Consumes the builder and returns a validated `ProjectionSimulator`.
    ///
    /// # Errors
    ///
    /// Returns an `AquadoseError` when the setup or starting levels are
    /// missing, or when any input is out of range.
    pub fn build(self) -> Result<ProjectionSimulator, AquadoseError> {
        let setup = self
            .setup
            .ok_or_else(|| AquadoseError::ConfigError("Tank setup is missing".to_string()))?;
        validation::validate_setup(&setup)?;

        let initial_levels = self.current_levels.ok_or_else(|| {
            AquadoseError::ConfigError("Current nutrient levels are missing".to_string())
        })?;
        validation::validate_totals("current levels", &initial_levels)?;
        validation::validate_totals("daily dose rates", &self.daily_dose_rates)?;

        let water_change = match self.water_change {
            Some((fraction, day)) => {
                validation::validate_fraction("water change fraction", fraction)?;
                if self.horizon_days > 0 && day >= self.horizon_days {
                    return Err(AquadoseError::InvalidWaterChangeDay {
                        day,
                        horizon_days: self.horizon_days,
                    });
                }
                let contribution = match &self.source {
                    Some(source) => water_source::contribution(source, fraction)?,
                    None => NutrientTotals::zero(),
                };
                Some(WaterChange {
                    fraction,
                    day,
                    contribution,
                    source_id: self.source.as_ref().map(|s| s.source_id.clone()),
                })
            }
            None => None,
        };

        let logger = match &self.log_path {
            Some(path) => Some(
                ProjectionLogger::new(path).map_err(|e| AquadoseError::FileIO(path.clone(), e))?,
            ),
            None => None,
        };

        Ok(ProjectionSimulator {
            state: ProjectionState {
                day: 0,
                levels: initial_levels,
                events: Vec::new(),
            },
            initial_levels,
            daily_dose_rates: self.daily_dose_rates,
            horizon_days: self.horizon_days,
            water_change,
            log_path: self.log_path,
            logger,
        })
    }
}
