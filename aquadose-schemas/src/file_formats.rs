use crate::{
    additive::Additive,
    fertilizer::{DosingEvent, FertilizerComposition},
    tank::Aquarium,
    water::WaterSourceProfile,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FertilizerFile {
    pub schema_version: String,
    pub fertilizers: Vec<FertilizerComposition>,
}

#[derive(Debug, Deserialize)]
pub struct WaterSourceFile {
    pub schema_version: String,
    pub water_sources: Vec<WaterSourceProfile>,
}

#[derive(Debug, Deserialize)]
pub struct AdditiveFile {
    pub schema_version: String,
    pub additives: Vec<Additive>,
}

#[derive(Debug, Deserialize)]
pub struct AquariumFile {
    pub schema_version: String,
    pub aquariums: Vec<Aquarium>,
}

/// A journal file holds the dosing history of a single aquarium.
#[derive(Debug, Deserialize)]
pub struct DosingLogFile {
    pub schema_version: String,
    pub aquarium_id: String,
    pub events: Vec<DosingEvent>,
}
