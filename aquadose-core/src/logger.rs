use crate::{error::AquadoseError, projection::state::ProjectionState, targets};
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// One row of the projection time series. Element columns are ppm of the
/// element; `nitrate_no3` and `phosphate_po4` are the display forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub day: u32,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub iron: f64,
    pub magnesium: f64,
    pub nitrate_no3: f64,
    pub phosphate_po4: f64,
    pub water_change: bool,
    pub events_json: String,
}

pub struct ProjectionLogger {
    writer: Writer<fs::File>,
}

impl ProjectionLogger {
    pub fn new(path: &str) -> Result<Self, io::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_state(&mut self, state: &ProjectionState) -> Result<(), anyhow::Error> {
        let display = targets::to_display(&state.levels);
        let events_json = serde_json::to_string(&state.events)?;

        let entry = LogEntry {
            day: state.day,
            nitrogen: state.levels.nitrogen,
            phosphorus: state.levels.phosphorus,
            potassium: state.levels.potassium,
            iron: state.levels.iron,
            magnesium: state.levels.magnesium,
            nitrate_no3: display.nitrate,
            phosphate_po4: display.phosphate,
            water_change: !state.events.is_empty(),
            events_json,
        };

        self.writer.serialize(entry)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads a projection log written by `ProjectionLogger`.
pub fn read_log(path: &str) -> Result<Vec<LogEntry>, AquadoseError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| AquadoseError::CsvError(path.to_string(), e))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| AquadoseError::CsvError(path.to_string(), e)))
        .collect()
}
