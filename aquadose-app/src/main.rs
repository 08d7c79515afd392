use anyhow::{anyhow, Result};
use aquadose_core::{
    analysis::{AnalysisOptions, DEFAULT_WINDOW_DAYS},
    mix::{MixMode, WaterHardness},
    remineralization::RemineralizationTarget,
    targets,
};
use aquadose_schemas::nutrient::Element;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

mod config;
mod plotting;
mod workflow;

/// Fertilizer dosing and water chemistry calculators for planted aquariums.
#[derive(Parser, Debug)]
#[command(name = "aquadose", version, about)]
struct Cli {
    /// Directory holding the YAML knowledge base.
    #[arg(long, global = true, default_value = "./data/knowledge_base")]
    data_dir: String,

    /// Directory where projection runs are written.
    #[arg(long, global = true, default_value = "./data/runs")]
    output_dir: String,

    /// Print results as JSON instead of text reports.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an aquarium's recent dosing against its EI targets.
    Analyze {
        aquarium: String,
        /// Last day of the dosing window (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long, default_value_t = 100.0)]
        ei_percent: f64,
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
        window: u32,
    },
    /// Project nutrient levels forward with a scheduled water change.
    Project {
        aquarium: String,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long, default_value_t = 100.0)]
        ei_percent: f64,
        #[arg(long, default_value_t = 14)]
        horizon: u32,
        #[arg(long, default_value_t = 50.0)]
        water_change_percent: f64,
        #[arg(long, default_value_t = 7)]
        water_change_day: u32,
        /// Water source used for the change. Defaults to the aquarium's own.
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        no_plots: bool,
    },
    /// Find the RO/tap ratio that reaches a GH/KH target.
    Mix {
        /// Water source id for the RO water; plain RO (GH 0 / KH 0) if omitted.
        #[arg(long)]
        ro_source: Option<String>,
        /// Water source id for the tap water.
        #[arg(long, required_unless_present_all = ["tap_gh", "tap_kh"])]
        tap_source: Option<String>,
        #[arg(long)]
        tap_gh: Option<f64>,
        #[arg(long)]
        tap_kh: Option<f64>,
        /// Named water preset whose GH/KH midpoints become the target.
        #[arg(long, conflicts_with_all = ["target_gh", "target_kh"])]
        preset: Option<String>,
        #[arg(long)]
        target_gh: Option<f64>,
        #[arg(long)]
        target_kh: Option<f64>,
        #[arg(long, default_value = "gh")]
        mode: MixMode,
    },
    /// Size a remineralizer dose for a TDS or GH target.
    Remineralize {
        additive: String,
        #[arg(long, required_unless_present = "gh", conflicts_with = "gh")]
        tds: Option<f64>,
        #[arg(long)]
        gh: Option<f64>,
        #[arg(long, default_value_t = 0.0)]
        starting_tds: f64,
        #[arg(long)]
        volume: f64,
    },
    /// Convert between a fertilizer's strength and a per-dose amount.
    Dose {
        #[arg(long)]
        element: Element,
        #[arg(long)]
        volume: f64,
        /// Weekly ppm target; defaults to the middle of the EI band.
        #[arg(long)]
        target_ppm: Option<f64>,
        #[arg(long, default_value_t = 100.0)]
        ei_percent: f64,
        #[arg(long, default_value_t = 3)]
        doses_per_week: u32,
        /// Manufacturer's dose amount; reports the implied ppm per unit.
        #[arg(long, conflicts_with_all = ["fertilizer", "ppm_per_unit"])]
        instruction_amount: Option<f64>,
        /// Fertilizer id whose strength for `element` is used.
        #[arg(long, conflicts_with = "ppm_per_unit")]
        fertilizer: Option<String>,
        #[arg(long)]
        ppm_per_unit: Option<f64>,
    },
    /// List the built-in water chemistry presets.
    Presets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if !cli.json {
        println!("--- AquaDose ---");
    }

    match cli.command {
        Command::Analyze {
            aquarium,
            as_of,
            ei_percent,
            window,
        } => {
            let kb = config::KnowledgeBase::load(&cli.data_dir)?;
            let options = AnalysisOptions {
                ei_fraction: ei_percent / 100.0,
                window_days: window,
            };
            let analysis =
                workflow::run_analysis(&kb, &aquarium, as_of.unwrap_or_else(today), options)?;
            if cli.json {
                print_json(&analysis)?;
            } else {
                workflow::print_analysis_report(kb.aquarium(&aquarium)?, &analysis);
            }
        }
        Command::Project {
            aquarium,
            as_of,
            ei_percent,
            horizon,
            water_change_percent,
            water_change_day,
            source,
            no_plots,
        } => {
            let kb = config::KnowledgeBase::load(&cli.data_dir)?;
            let options = AnalysisOptions {
                ei_fraction: ei_percent / 100.0,
                window_days: DEFAULT_WINDOW_DAYS,
            };
            let analysis =
                workflow::run_analysis(&kb, &aquarium, as_of.unwrap_or_else(today), options)?;
            let request = workflow::ProjectionRequest {
                horizon_days: horizon,
                water_change_fraction: water_change_percent / 100.0,
                water_change_day,
                source_id: source,
                plots: !no_plots,
            };
            let output = workflow::run_projection(
                &kb,
                kb.aquarium(&aquarium)?,
                &analysis,
                &request,
                &cli.output_dir,
            )?;
            if cli.json {
                print_json(&output)?;
            } else {
                workflow::print_projection_report(&output);
                println!("\nProjection complete. Results are in '{}'", output.run_dir);
            }
        }
        Command::Mix {
            ro_source,
            tap_source,
            tap_gh,
            tap_kh,
            preset,
            target_gh,
            target_kh,
            mode,
        } => {
            let kb = if ro_source.is_some() || tap_source.is_some() {
                Some(config::KnowledgeBase::load(&cli.data_dir)?)
            } else {
                None
            };
            let source_hardness = |id: &str| -> Result<WaterHardness> {
                let kb = kb.as_ref().ok_or_else(|| anyhow!("Knowledge base was not loaded"))?;
                workflow::hardness_of(kb.water_source(id)?)
            };

            let ro = match &ro_source {
                Some(id) => source_hardness(id)?,
                None => WaterHardness::default(),
            };
            let tap = match (&tap_source, tap_gh, tap_kh) {
                (Some(id), _, _) => source_hardness(id)?,
                (None, Some(gh), Some(kh)) => WaterHardness { gh, kh },
                _ => return Err(anyhow!("Give --tap-source or both --tap-gh and --tap-kh")),
            };
            let target = match preset {
                Some(name) => {
                    let preset = targets::water_preset(&name)
                        .ok_or_else(|| anyhow!("Unknown water preset '{}'", name))?;
                    WaterHardness {
                        gh: preset.gh_midpoint(),
                        kh: preset.kh_midpoint(),
                    }
                }
                // The inactive parameter only affects guidance; default it to the tap value.
                None => WaterHardness {
                    gh: target_gh.unwrap_or(tap.gh),
                    kh: target_kh.unwrap_or(tap.kh),
                },
            };

            let report = workflow::run_mix(ro, tap, target, mode)?;
            if cli.json {
                print_json(&report)?;
            } else {
                workflow::print_mix_report(&report);
            }
        }
        Command::Remineralize {
            additive,
            tds,
            gh,
            starting_tds,
            volume,
        } => {
            let kb = config::KnowledgeBase::load(&cli.data_dir)?;
            let target = match (tds, gh) {
                (Some(tds), _) => RemineralizationTarget::Tds(tds),
                (None, Some(gh)) => RemineralizationTarget::Gh(gh),
                (None, None) => return Err(anyhow!("Give either --tds or --gh")),
            };
            let report = workflow::run_remineralization(
                kb.additive(&additive)?,
                starting_tds,
                target,
                volume,
            )?;
            if cli.json {
                print_json(&report)?;
            } else {
                workflow::print_remineralization_report(&report);
            }
        }
        Command::Dose {
            element,
            volume,
            target_ppm,
            ei_percent,
            doses_per_week,
            instruction_amount,
            fertilizer,
            ppm_per_unit,
        } => {
            let mode = match (instruction_amount, fertilizer, ppm_per_unit) {
                (Some(dose_amount), _, _) => workflow::DoseMode::FromInstruction { dose_amount },
                (None, Some(id), _) => {
                    let kb = config::KnowledgeBase::load(&cli.data_dir)?;
                    workflow::DoseMode::FromStrength {
                        ppm_per_unit: kb.fertilizer(&id)?.ppm_per_unit.get(element),
                    }
                }
                (None, None, Some(ppm_per_unit)) => {
                    workflow::DoseMode::FromStrength { ppm_per_unit }
                }
                (None, None, None) => {
                    return Err(anyhow!(
                        "Give --instruction-amount, --fertilizer or --ppm-per-unit"
                    ))
                }
            };
            let report = workflow::run_dose(
                element,
                target_ppm,
                ei_percent / 100.0,
                volume,
                doses_per_week,
                mode,
            )?;
            if cli.json {
                print_json(&report)?;
            } else {
                workflow::print_dose_report(&report);
            }
        }
        Command::Presets => {
            if cli.json {
                print_json(&targets::water_presets())?;
            } else {
                workflow::print_presets();
            }
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
