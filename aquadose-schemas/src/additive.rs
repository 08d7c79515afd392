use serde::{Deserialize, Serialize};

/// A dry remineralizing salt, described by what one gram dissolved in one
/// liter of water adds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Additive {
    pub additive_id: String,
    pub name: String,
    pub tds_per_gram_per_liter: f64,
    pub gh_per_gram_per_liter: f64,
    pub kh_per_gram_per_liter: f64,
}
