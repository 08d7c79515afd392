//! RO/tap blend ratio solver.
//!
//! Hardness mixes linearly by volume, so a single target inverts directly.
//! `Balanced` mode averages the GH- and KH-driven ratios: two sources can hit
//! both targets at once only when the targets lie on the line between them,
//! so callers should show both resulting values.

use crate::error::AquadoseError;
use aquadose_schemas::ParseVariantError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// General and carbonate hardness in °dH.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaterHardness {
    pub gh: f64,
    pub kh: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixMode {
    Gh,
    Kh,
    Balanced,
}

impl FromStr for MixMode {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gh" => Ok(MixMode::Gh),
            "kh" => Ok(MixMode::Kh),
            "balanced" => Ok(MixMode::Balanced),
            _ => Err(ParseVariantError::new("mix mode", s, "gh, kh, balanced")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MixResult {
    pub ro_fraction: f64,
    pub tap_fraction: f64,
    pub result_gh: f64,
    pub result_kh: f64,
    /// False when an active target lies outside what the two sources can reach.
    pub achievable: bool,
    /// True when RO and tap share the active parameter, so the ratio is the
    /// neutral 0.5 default rather than a solution.
    pub degenerate: bool,
}

impl MixResult {
    /// Caller-facing hints for unreachable or degenerate blends.
    pub fn guidance(
        &self,
        ro: &WaterHardness,
        tap: &WaterHardness,
        target: &WaterHardness,
        mode: MixMode,
    ) -> Vec<String> {
        let mut hints = Vec::new();
        if self.degenerate {
            hints.push(
                "RO and tap water have the same hardness; blending cannot change it.".to_string(),
            );
        }
        if self.achievable {
            return hints;
        }
        for (name, ro_value, tap_value, target_value) in active_parameters(ro, tap, target, mode) {
            let (low, high) = (ro_value.min(tap_value), ro_value.max(tap_value));
            if target_value > high {
                hints.push(format!(
                    "Target {} {:.1} is above both sources ({:.1}); add tap {} or remineralize.",
                    name, target_value, high, name
                ));
            } else if target_value < low {
                hints.push(format!(
                    "Target {} {:.1} is below both sources ({:.1}); a softer source is needed.",
                    name, target_value, low
                ));
            }
        }
        hints
    }
}

struct Solved {
    ro_fraction: f64,
    achievable: bool,
    degenerate: bool,
}

/// Inverts `target = ro × f + tap × (1 − f)` for one parameter.
fn solve_parameter(ro_value: f64, tap_value: f64, target_value: f64) -> Solved {
    let achievable =
        target_value >= ro_value.min(tap_value) && target_value <= ro_value.max(tap_value);
    if tap_value == ro_value {
        return Solved {
            ro_fraction: 0.5,
            achievable,
            degenerate: true,
        };
    }
    Solved {
        ro_fraction: ((tap_value - target_value) / (tap_value - ro_value)).clamp(0.0, 1.0),
        achievable,
        degenerate: false,
    }
}

fn active_parameters(
    ro: &WaterHardness,
    tap: &WaterHardness,
    target: &WaterHardness,
    mode: MixMode,
) -> Vec<(&'static str, f64, f64, f64)> {
    let gh = ("GH", ro.gh, tap.gh, target.gh);
    let kh = ("KH", ro.kh, tap.kh, target.kh);
    match mode {
        MixMode::Gh => vec![gh],
        MixMode::Kh => vec![kh],
        MixMode::Balanced => vec![gh, kh],
    }
}

/// Hardness of a blend with `ro_fraction` RO water.
pub fn blend(ro: &WaterHardness, tap: &WaterHardness, ro_fraction: f64) -> WaterHardness {
    let tap_fraction = 1.0 - ro_fraction;
    WaterHardness {
        gh: ro.gh * ro_fraction + tap.gh * tap_fraction,
        kh: ro.kh * ro_fraction + tap.kh * tap_fraction,
    }
}

pub fn solve_mix(
    ro: &WaterHardness,
    tap: &WaterHardness,
    target: &WaterHardness,
    mode: MixMode,
) -> Result<MixResult, AquadoseError> {
    for (name, value) in [
        ("ro gh", ro.gh),
        ("ro kh", ro.kh),
        ("tap gh", tap.gh),
        ("tap kh", tap.kh),
        ("target gh", target.gh),
        ("target kh", target.kh),
    ] {
        crate::validation::validate_non_negative(name, value)?;
    }

    let solved: Vec<Solved> = active_parameters(ro, tap, target, mode)
        .into_iter()
        .map(|(_, ro_value, tap_value, target_value)| {
            solve_parameter(ro_value, tap_value, target_value)
        })
        .collect();

    let ro_fraction = solved.iter().map(|s| s.ro_fraction).sum::<f64>() / solved.len() as f64;
    let result = blend(ro, tap, ro_fraction);

    Ok(MixResult {
        ro_fraction,
        tap_fraction: 1.0 - ro_fraction,
        result_gh: result.gh,
        result_kh: result.kh,
        achievable: solved.iter().all(|s| s.achievable),
        degenerate: solved.iter().any(|s| s.degenerate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn hardness(gh: f64, kh: f64) -> WaterHardness {
        WaterHardness { gh, kh }
    }

    #[test]
    fn sixty_percent_ro_for_gh_six() {
        let result = solve_mix(
            &hardness(0.0, 0.0),
            &hardness(15.0, 10.0),
            &hardness(6.0, 4.0),
            MixMode::Gh,
        )
        .unwrap();
        assert_relative_eq!(result.ro_fraction, 0.6);
        assert_relative_eq!(result.tap_fraction, 0.4);
        assert_relative_eq!(result.result_gh, 6.0);
        assert_relative_eq!(result.result_kh, 4.0);
        assert!(result.achievable);
        assert!(!result.degenerate);
    }

    #[test]
    fn equal_sources_fall_back_to_half() {
        let result = solve_mix(
            &hardness(8.0, 5.0),
            &hardness(8.0, 9.0),
            &hardness(6.0, 7.0),
            MixMode::Gh,
        )
        .unwrap();
        assert_relative_eq!(result.ro_fraction, 0.5);
        assert!(result.degenerate);
        assert!(!result.achievable);
        assert!(result.result_gh.is_finite());
    }

    #[test]
    fn unreachable_target_is_clamped_and_flagged() {
        let ro = hardness(0.0, 0.0);
        let tap = hardness(10.0, 6.0);
        let target = hardness(14.0, 3.0);
        let result = solve_mix(&ro, &tap, &target, MixMode::Gh).unwrap();
        assert_relative_eq!(result.ro_fraction, 0.0);
        assert!(!result.achievable);
        let hints = result.guidance(&ro, &tap, &target, MixMode::Gh);
        assert_eq!(hints.len(), 1);
        assert!(hints[0].contains("increase tap GH"));
    }

    #[test]
    fn balanced_mode_averages_independent_ratios() {
        let ro = hardness(0.0, 0.0);
        let tap = hardness(15.0, 10.0);
        let target = hardness(6.0, 2.0);
        // GH alone: 0.6, KH alone: 0.8
        let result = solve_mix(&ro, &tap, &target, MixMode::Balanced).unwrap();
        assert_relative_eq!(result.ro_fraction, 0.7, epsilon = 1e-12);
        assert_relative_eq!(result.result_gh, 4.5, epsilon = 1e-12);
        assert_relative_eq!(result.result_kh, 3.0, epsilon = 1e-12);
        assert!(result.achievable);
    }

    #[test]
    fn fraction_stays_in_unit_interval() {
        let ro = hardness(1.0, 0.5);
        let tap = hardness(12.0, 8.0);
        for target_gh in [0.0, 0.5, 1.0, 4.0, 12.0, 20.0] {
            for target_kh in [0.0, 3.0, 9.0] {
                for mode in [MixMode::Gh, MixMode::Kh, MixMode::Balanced] {
                    let result =
                        solve_mix(&ro, &tap, &hardness(target_gh, target_kh), mode).unwrap();
                    assert!((0.0..=1.0).contains(&result.ro_fraction));
                    assert_relative_eq!(result.ro_fraction + result.tap_fraction, 1.0);
                }
            }
        }
    }

    #[test]
    fn result_matches_the_blend_model() {
        let ro = hardness(0.5, 0.2);
        let tap = hardness(18.0, 11.0);
        let result = solve_mix(&ro, &tap, &hardness(7.0, 4.0), MixMode::Kh).unwrap();
        let blended = blend(&ro, &tap, result.ro_fraction);
        assert_relative_eq!(blended.gh, result.result_gh, epsilon = 1e-9);
        assert_relative_eq!(blended.kh, result.result_kh, epsilon = 1e-9);
        assert_relative_eq!(result.result_kh, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn mode_parsing_fails_fast() {
        assert_eq!("Balanced".parse::<MixMode>().unwrap(), MixMode::Balanced);
        assert!("tds".parse::<MixMode>().is_err());
    }
}
