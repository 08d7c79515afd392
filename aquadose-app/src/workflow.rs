use crate::config::KnowledgeBase;
use crate::plotting;
use anyhow::{anyhow, Context, Result};
use aquadose_core::{
    analysis::{self, AnalysisOptions, ElementTrajectory, TankAnalysis},
    classifier::NutrientStatus,
    dosage,
    mix::{self, MixMode, MixResult, WaterHardness},
    projection::{builder::ProjectionBuilder, state::ProjectionPoint},
    remineralization::{self, RemineralizationPlan, RemineralizationTarget},
    targets::{self, DisplayNutrient},
};
use aquadose_schemas::{
    additive::Additive,
    nutrient::Element,
    tank::Aquarium,
    water::WaterSourceProfile,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::{fs, path::Path};

/// Parameters of a projection run that don't come from the knowledge base.
#[derive(Debug, Clone)]
pub struct ProjectionRequest {
    pub horizon_days: u32,
    pub water_change_fraction: f64,
    pub water_change_day: u32,
    /// Overrides the aquarium's own water source.
    pub source_id: Option<String>,
    pub plots: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionOutput {
    pub aquarium_id: String,
    pub run_dir: String,
    pub log_path: String,
    pub source_id: Option<String>,
    pub points: Vec<ProjectionPoint>,
    pub trajectories: Vec<ElementTrajectory>,
}

/// Analyzes one aquarium's dosing history.
pub fn run_analysis(
    kb: &KnowledgeBase,
    aquarium_id: &str,
    as_of: NaiveDate,
    options: AnalysisOptions,
) -> Result<TankAnalysis> {
    eprintln!("\n--- [Analysis] Evaluating '{}' as of {} ---", aquarium_id, as_of);
    let aquarium = kb.aquarium(aquarium_id)?;
    let analysis = analysis::analyze_tank(
        &aquarium.setup,
        kb.events_for(aquarium_id),
        &kb.fertilizers,
        as_of,
        options,
    )
    .with_context(|| format!("Failed to analyze aquarium '{}'", aquarium_id))?;

    if analysis.aggregate.skipped_events > 0 {
        eprintln!(
            "[Analysis] Skipped {} event(s) for fertilizers no longer in the inventory: {}",
            analysis.aggregate.skipped_events,
            analysis
                .aggregate
                .skipped_fertilizer_ids
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    if analysis.aggregate.invalid_events > 0 {
        eprintln!(
            "[Analysis] Ignored {} event(s) with an invalid amount.",
            analysis.aggregate.invalid_events
        );
    }
    Ok(analysis)
}

/// Projects the aquarium forward from its weekly totals, seeding daily dose
/// rates from the same history, and writes the log and charts to a
/// timestamped run directory.
pub fn run_projection(
    kb: &KnowledgeBase,
    aquarium: &Aquarium,
    analysis: &TankAnalysis,
    request: &ProjectionRequest,
    output_dir: &str,
) -> Result<ProjectionOutput> {
    eprintln!("\n--- [Projection] Simulating {} days ---", request.horizon_days);

    let run_dir = format!(
        "{}/{}_{}",
        output_dir,
        aquarium.aquarium_id,
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create output directory: {}", run_dir))?;

    let log_path = Path::new(&run_dir).join("projection.csv");
    let log_path = log_path
        .to_str()
        .ok_or_else(|| anyhow!("Output path is not valid UTF-8: {:?}", log_path))?
        .to_string();

    let source_id = request
        .source_id
        .clone()
        .or_else(|| aquarium.water_source_id.clone());
    let source: Option<&WaterSourceProfile> = match &source_id {
        Some(id) => Some(kb.water_source(id)?),
        None => None,
    };

    let mut builder = ProjectionBuilder::new()
        .with_current_levels(analysis.weekly_totals)
        .with_daily_dose_rates(analysis.weekly_totals.per_day())
        .with_setup(aquarium.setup.clone())
        .with_horizon_days(request.horizon_days)
        .with_water_change(request.water_change_fraction, request.water_change_day)
        .with_timeseries_logging_to_file(&log_path);
    if let Some(source) = source {
        builder = builder.with_source(source.clone());
    }

    let mut simulator = builder.build()?;
    let points = simulator.run()?;

    let targets = targets::adjusted_targets(analysis.multiplier, analysis.options.ei_fraction)?;
    let trajectories = analysis::summarize_projection(&points, &targets);

    fs::write(
        Path::new(&run_dir).join("analysis.json"),
        serde_json::to_string_pretty(analysis)?,
    )
    .with_context(|| format!("Failed to write analysis to {}", run_dir))?;

    if request.plots {
        plotting::generate_all_plots(&run_dir, &log_path, analysis)?;
    }

    Ok(ProjectionOutput {
        aquarium_id: aquarium.aquarium_id.clone(),
        run_dir,
        log_path,
        source_id,
        points,
        trajectories,
    })
}

pub fn print_analysis_report(aquarium: &Aquarium, analysis: &TankAnalysis) {
    let setup = &aquarium.setup;
    println!("\n--- [Analysis Report] {} ---", aquarium.name);
    println!("========================================");
    println!(
        "Tank: {:.0} L | plants: {:?} | light: {:?} | CO2: {}",
        setup.volume_liters,
        setup.plant_density,
        setup.light_level,
        if setup.has_co2 { "yes" } else { "no" }
    );
    println!(
        "Consumption multiplier: {:.2} ({} demand) | EI target: {:.0}%",
        analysis.multiplier,
        analysis.demand.label(),
        analysis.options.ei_fraction * 100.0
    );
    println!(
        "Dosing window: {} day(s) ending {} | events counted: {}",
        analysis.options.window_days, analysis.as_of, analysis.aggregate.counted_events
    );
    println!("----------------------------------------");

    println!("\nWeekly totals (ppm of element):");
    for assessment in &analysis.elements {
        println!(
            "  - {:<11} {:>7.2} ppm | target {:<17} | {:<7} | {:>5.0}%",
            assessment.element.label(),
            assessment.weekly_total,
            assessment.target.to_string(),
            assessment.status,
            assessment.progress_percent
        );
    }

    println!("\nAs measured by test kits:");
    for nutrient in DisplayNutrient::ALL {
        println!(
            "  - {:<16} {:>7.2} ppm",
            nutrient.label(),
            analysis.display_totals.get(nutrient)
        );
    }

    let warnings = analysis.warnings();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in warnings {
            println!("  - {}", warning);
        }
    }

    println!("\nRecommendations:");
    if analysis.recommendations.is_empty() {
        let any_low = analysis
            .elements
            .iter()
            .any(|a| a.status == NutrientStatus::Low);
        if any_low {
            println!("  - No fertilizer in the inventory supplies the low elements.");
        } else {
            println!("  - None. Keep the current regime.");
        }
    }
    for rec in &analysis.recommendations {
        println!(
            "  - {:<10} {:<24} {:>6.2} {}/day ({:.2} {}/week)",
            rec.element.label(),
            rec.fertilizer_name,
            rec.recommended_daily_dose,
            rec.unit,
            rec.recommended_weekly_dose,
            rec.unit
        );
        println!("      {}", rec.reasoning);
    }
    println!("========================================");
}

pub fn print_projection_report(output: &ProjectionOutput) {
    println!("\n--- [Projection Report] {} ---", output.aquarium_id);
    println!("========================================");
    if let Some(source_id) = &output.source_id {
        println!("Water change source: {}", source_id);
    }
    println!(
        "  {:<11} {:>8} {:>8} {:>9} {:>8}  {}",
        "Element", "Start", "Peak", "Peak day", "End", "Above target from"
    );
    for t in &output.trajectories {
        println!(
            "  {:<11} {:>8.2} {:>8.2} {:>9} {:>8.2}  {}",
            t.element.label(),
            t.start,
            t.peak,
            t.peak_day,
            t.end,
            t.first_day_above_target
                .map_or_else(|| "-".to_string(), |d| format!("day {}", d))
        );
    }
    println!("\nProjection log: {}", output.log_path);
    println!("========================================");
}

#[derive(Debug, Clone, Serialize)]
pub struct MixReport {
    pub mode: MixMode,
    pub ro: WaterHardness,
    pub tap: WaterHardness,
    pub target: WaterHardness,
    pub result: MixResult,
    pub guidance: Vec<String>,
}

pub fn run_mix(
    ro: WaterHardness,
    tap: WaterHardness,
    target: WaterHardness,
    mode: MixMode,
) -> Result<MixReport> {
    let result = mix::solve_mix(&ro, &tap, &target, mode)?;
    let guidance = result.guidance(&ro, &tap, &target, mode);
    Ok(MixReport {
        mode,
        ro,
        tap,
        target,
        result,
        guidance,
    })
}

pub fn print_mix_report(report: &MixReport) {
    let result = &report.result;
    println!("\n--- [Mix Report] ---");
    println!("========================================");
    println!(
        "Target: GH {:.1} / KH {:.1} ({:?} mode)",
        report.target.gh, report.target.kh, report.mode
    );
    println!(
        "Blend:  {:.0}% RO + {:.0}% tap",
        result.ro_fraction * 100.0,
        result.tap_fraction * 100.0
    );
    println!("Result: GH {:.2} / KH {:.2}", result.result_gh, result.result_kh);
    for hint in &report.guidance {
        println!("  - {}", hint);
    }
    println!("========================================");
}

/// GH and KH of a stored water source; both must have been measured.
pub fn hardness_of(source: &WaterSourceProfile) -> Result<WaterHardness> {
    match (source.gh, source.kh) {
        (Some(gh), Some(kh)) => Ok(WaterHardness { gh, kh }),
        _ => Err(anyhow!(
            "Water source '{}' has no GH/KH measurement",
            source.source_id
        )),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RemineralizationReport {
    pub additive_id: String,
    pub additive_name: String,
    pub target: RemineralizationTarget,
    pub volume_liters: f64,
    pub plan: RemineralizationPlan,
}

pub fn run_remineralization(
    additive: &Additive,
    starting_tds: f64,
    target: RemineralizationTarget,
    volume_liters: f64,
) -> Result<RemineralizationReport> {
    let plan =
        remineralization::solve_remineralization(additive, starting_tds, target, volume_liters)
            .with_context(|| format!("Cannot size a dose of '{}'", additive.name))?;
    Ok(RemineralizationReport {
        additive_id: additive.additive_id.clone(),
        additive_name: additive.name.clone(),
        target,
        volume_liters,
        plan,
    })
}

pub fn print_remineralization_report(report: &RemineralizationReport) {
    println!("\n--- [Remineralization Report] {} ---", report.additive_name);
    println!("========================================");
    match &report.plan {
        RemineralizationPlan::Dose(result) => {
            println!(
                "Add {:.2} g/L, {:.1} g in total for {:.0} L.",
                result.grams_per_liter, result.total_grams, report.volume_liters
            );
            println!(
                "Result: TDS {:.0} | GH {:.2} | KH {:.2}",
                result.result_tds, result.result_gh, result.result_kh
            );
        }
        RemineralizationPlan::TargetAlreadyReached { current, target } => {
            println!(
                "Nothing to add: current {} {:.2} already meets the target of {:.2}.",
                report.target.mode_name().to_uppercase(),
                current,
                target
            );
        }
    }
    println!("========================================");
}

/// How the dose calculator obtains a fertilizer's strength.
#[derive(Debug, Clone, Copy)]
pub enum DoseMode {
    /// Back out ppm per unit from a manufacturer's dose amount.
    FromInstruction { dose_amount: f64 },
    /// Size a dose from a known ppm per unit.
    FromStrength { ppm_per_unit: f64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct DoseReport {
    pub element: Element,
    pub target_weekly_ppm: f64,
    pub ei_fraction: f64,
    pub volume_liters: f64,
    pub doses_per_week: u32,
    pub ppm_per_unit: f64,
    pub dose_amount: f64,
}

pub fn run_dose(
    element: Element,
    target_weekly_ppm: Option<f64>,
    ei_fraction: f64,
    volume_liters: f64,
    doses_per_week: u32,
    mode: DoseMode,
) -> Result<DoseReport> {
    let target_weekly_ppm = target_weekly_ppm.unwrap_or_else(|| dosage::ei_weekly_target(element));
    let (ppm_per_unit, dose_amount) = match mode {
        DoseMode::FromInstruction { dose_amount } => (
            dosage::ppm_per_unit_from_instruction(
                target_weekly_ppm,
                ei_fraction,
                volume_liters,
                dose_amount,
                doses_per_week,
            )?,
            dose_amount,
        ),
        DoseMode::FromStrength { ppm_per_unit } => (
            ppm_per_unit,
            dosage::dose_for_weekly_target(
                ppm_per_unit,
                target_weekly_ppm,
                ei_fraction,
                volume_liters,
                doses_per_week,
            )?,
        ),
    };
    Ok(DoseReport {
        element,
        target_weekly_ppm,
        ei_fraction,
        volume_liters,
        doses_per_week,
        ppm_per_unit,
        dose_amount,
    })
}

pub fn print_dose_report(report: &DoseReport) {
    println!("\n--- [Dose Report] {} ---", report.element.label());
    println!("========================================");
    println!(
        "Weekly target: {:.2} ppm x {:.0}% EI in {:.0} L, {} dose(s) per week",
        report.target_weekly_ppm,
        report.ei_fraction * 100.0,
        report.volume_liters,
        report.doses_per_week
    );
    println!("Strength: {:.2} ppm per unit per liter", report.ppm_per_unit);
    println!("Dose:     {:.2} units each time", report.dose_amount);
    println!("========================================");
}

pub fn print_presets() {
    println!("\n--- [Water Presets] ---");
    for preset in targets::water_presets() {
        println!(
            "  - {:<20} GH {:>4.1}-{:<4.1} KH {:>4.1}-{:<4.1} pH {:.1}-{:.1} TDS {:.0}-{:.0}  {}",
            preset.name,
            preset.gh.0,
            preset.gh.1,
            preset.kh.0,
            preset.kh.1,
            preset.ph.0,
            preset.ph.1,
            preset.tds.0,
            preset.tds.1,
            preset.description
        );
    }
}
