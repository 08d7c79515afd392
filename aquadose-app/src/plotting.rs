//! This module is responsible for generating all charts from projection log data.

use anyhow::Result;
use aquadose_core::{
    analysis::TankAnalysis,
    classifier::NutrientStatus,
    logger::{read_log, LogEntry},
    projection::state::ProjectionEvent,
    targets::{self, DisplayNutrient},
};
use plotters::prelude::*;

/// A flattened structure to hold the parsed data from a single log record for easy plotting.
#[derive(Clone, Debug)]
struct PlottingData {
    day: u32,
    nitrate: f64,
    phosphate: f64,
    potassium: f64,
    iron: f64,
    events: Vec<ProjectionEvent>,
}

impl PlottingData {
    fn value(&self, nutrient: DisplayNutrient) -> f64 {
        match nutrient {
            DisplayNutrient::Nitrate => self.nitrate,
            DisplayNutrient::Phosphate => self.phosphate,
            DisplayNutrient::Potassium => self.potassium,
            DisplayNutrient::Iron => self.iron,
        }
    }

    fn has_water_change(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, ProjectionEvent::WaterChange { .. }))
    }
}

/// The main function to generate and save all charts for a projection run.
pub fn generate_all_plots(output_dir: &str, log_path: &str, analysis: &TankAnalysis) -> Result<()> {
    eprintln!("[Plotting] Generating charts from projection data...");

    let data = parse_log_file(log_path)?;

    if data.is_empty() {
        eprintln!("[Plotting] Warning: No data to plot.");
        return Ok(());
    }

    let band_factor = analysis.multiplier * analysis.options.ei_fraction;
    plot_nutrient_projection(output_dir, &data, band_factor)?;
    plot_nutrient_status(output_dir, analysis)?;
    plot_water_change_timeline(output_dir, &data)?;

    eprintln!("[Plotting] Charts have been saved to '{}'.", output_dir);
    Ok(())
}

/// Parses the projection log CSV file into a vector of `PlottingData` structs.
fn parse_log_file(log_path: &str) -> Result<Vec<PlottingData>> {
    let mut data = Vec::new();
    for record in read_log(log_path)? {
        let LogEntry {
            day,
            nitrate_no3,
            phosphate_po4,
            potassium,
            iron,
            events_json,
            ..
        } = record;
        let events: Vec<ProjectionEvent> = serde_json::from_str(&events_json)?;
        data.push(PlottingData {
            day,
            nitrate: nitrate_no3,
            phosphate: phosphate_po4,
            potassium,
            iron,
            events,
        });
    }
    Ok(data)
}

/// Line charts of each display nutrient with the tank's target band dashed in.
fn plot_nutrient_projection(
    output_dir: &str,
    data: &[PlottingData],
    band_factor: f64,
) -> Result<()> {
    let path = format!("{}/1_nutrient_projection.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Projected Nutrient Levels", ("sans-serif", 40))?;

    let max_day = data.last().map_or(1, |d| d.day).max(1);
    let water_change_days: Vec<u32> = data
        .iter()
        .filter(|d| d.has_water_change())
        .map(|d| d.day)
        .collect();

    let colors = [BLUE, RED, MAGENTA, GREEN];
    let panels = root.split_evenly((2, 2));

    for ((panel, nutrient), color) in panels.iter().zip(DisplayNutrient::ALL).zip(colors) {
        let band = targets::display_band(nutrient).scaled(band_factor)?;
        let max_value = data
            .iter()
            .map(|d| d.value(nutrient))
            .fold(band.max(), f64::max)
            * 1.1;

        let mut chart = ChartBuilder::on(panel)
            .caption(nutrient.label(), ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0u32..max_day, 0f64..max_value)?;

        chart
            .configure_mesh()
            .x_desc("Day")
            .y_desc("ppm")
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                data.iter().map(|d| (d.day, d.value(nutrient))),
                color.stroke_width(2),
            ))?
            .label("Projected")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));

        chart
            .draw_series(DashedLineSeries::new(
                [(0, band.min()), (max_day, band.min())],
                5,
                5,
                (&BLACK).into(),
            ))?
            .label("Target band")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.filled()));
        chart.draw_series(DashedLineSeries::new(
            [(0, band.max()), (max_day, band.max())],
            5,
            5,
            (&BLACK).into(),
        ))?;

        for day in &water_change_days {
            chart.draw_series(DashedLineSeries::new(
                [(*day, 0.0), (*day, max_value)],
                3,
                3,
                (&CYAN).into(),
            ))?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Horizontal progress bars of this week's totals against each element's band.
fn plot_nutrient_status(output_dir: &str, analysis: &TankAnalysis) -> Result<()> {
    let path = format!("{}/2_nutrient_status.png", output_dir);
    let root_area = BitMapBackend::new(&path, (1024, 560)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.titled("Weekly Nutrient Status", ("sans-serif", 40))?;

    let drawing_area = root_area.margin(20, 20, 60, 20);
    let label_style = TextStyle::from(("sans-serif", 18).into_font()).color(&BLACK);

    let bar_left = 160;
    let bar_width = 420;
    let bar_height = 40;
    let row_gap = 30;

    for (i, assessment) in analysis.elements.iter().enumerate() {
        let top = 80 + i as i32 * (bar_height + row_gap);

        drawing_area.draw_text(assessment.element.label(), &label_style, (20, top + 10))?;

        drawing_area.draw(&Rectangle::new(
            [(bar_left, top), (bar_left + bar_width, top + bar_height)],
            RGBColor(225, 225, 225).filled(),
        ))?;

        let fill_color = match assessment.status {
            NutrientStatus::Low => RGBColor(230, 160, 40),
            NutrientStatus::Optimal => RGBColor(60, 170, 90),
            NutrientStatus::High => RGBColor(200, 60, 60),
        };
        let fill_share = assessment.progress_percent.clamp(0.0, 100.0) / 100.0;
        let fill = (fill_share * f64::from(bar_width)) as i32;
        drawing_area.draw(&Rectangle::new(
            [(bar_left, top), (bar_left + fill, top + bar_height)],
            fill_color.filled(),
        ))?;

        let detail = format!(
            "{:.2} ppm, {} ({})",
            assessment.weekly_total, assessment.status, assessment.target
        );
        drawing_area.draw_text(&detail, &label_style, (bar_left + bar_width + 10, top + 10))?;
    }

    root_area.present()?;
    Ok(())
}

/// Generates a timeline of the projection highlighting water-change days.
fn plot_water_change_timeline(output_dir: &str, data: &[PlottingData]) -> Result<()> {
    let path = format!("{}/3_water_change_timeline.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 256)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_day = data.last().map_or(1, |d| d.day).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Water Change Events", ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(20)
        .build_cartesian_2d(0u32..max_day, 0..2i32)?;

    chart
        .configure_mesh()
        .x_desc("Day")
        .disable_y_axis()
        .draw()?;

    let water_change_days: Vec<u32> = data
        .iter()
        .filter(|d| d.has_water_change())
        .map(|d| d.day)
        .collect();

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(CYAN.filled())
            .data(water_change_days.iter().map(|day| (*day, 1))),
    )?;

    root.present()?;
    Ok(())
}
