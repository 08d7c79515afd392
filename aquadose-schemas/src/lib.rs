//! Plain record types exchanged between the aquarium data layer and the
//! dosing engine. Nothing in here computes; every type is a value object
//! that deserializes from the YAML knowledge base.

pub mod additive;
pub mod error;
pub mod fertilizer;
pub mod file_formats;
pub mod nutrient;
pub mod tank;
pub mod water;

pub use error::ParseVariantError;
