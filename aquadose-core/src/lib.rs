pub mod aggregator;
pub mod analysis;
pub mod classifier;
pub mod consumption;
pub mod dosage;
pub mod error;
pub mod logger;
pub mod mix;
pub mod projection;
pub mod recommendation;
pub mod remineralization;
pub mod targets;
pub mod validation;
pub mod water_source;

pub use error::AquadoseError;
