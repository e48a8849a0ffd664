use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use plotters::prelude::*;
use serde::Serialize;

use hidden_regions::HiddenRegionParams;

use crate::config::ScanConfig;

#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub a: f64,
    pub z: f64,
    pub effect: f64,
    pub deffect_dz: f64,
    pub w_baseline: f64,
    pub w_hidden: f64,
    pub dw_over_da_baseline: f64,
    pub dw_over_da_hidden: f64,
    pub integral_baseline: f64,
    pub integral_hidden: f64,
    pub cs2_eff: f64,
    pub growth_baseline: f64,
    pub growth_hidden: f64,
    pub hubble_baseline: f64,
    pub hubble_hidden: f64,
    pub source_factor: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanMetrics {
    pub max_w_shift: f64,
    pub z_at_max_w_shift: f64,
    pub w_at_transition: Option<f64>,
    pub min_cs2_eff: f64,
    pub max_growth_suppression: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub config: ScanConfig,
    pub params: HiddenRegionParams,
    pub samples: usize,
    pub metrics: ScanMetrics,
    pub outputs: OutputFiles,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputFiles {
    pub output_dir: PathBuf,
    pub csv_path: PathBuf,
    pub summary_path: PathBuf,
    pub plot_w_path: PathBuf,
    pub plot_transition_path: PathBuf,
}

pub fn write_csv(path: &Path, records: &[ScanRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to open CSV path {}", path.display()))?;

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_summary(path: &Path, summary: &ScanSummary) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_string_pretty(summary)?;
    fs::write(path, data)?;
    Ok(())
}

pub fn render_plots(records: &[ScanRecord], files: &OutputFiles) -> anyhow::Result<()> {
    plot_w_of_z(records, &files.plot_w_path)?;
    plot_transition(records, &files.plot_transition_path)?;
    Ok(())
}

fn plot_w_of_z(records: &[ScanRecord], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let z_max = records.iter().map(|r| r.z).fold(0.0_f64, f64::max).max(0.1);
    let w_min = records
        .iter()
        .map(|r| r.w_baseline.min(r.w_hidden))
        .fold(f64::INFINITY, f64::min);
    let w_max = records
        .iter()
        .map(|r| r.w_baseline.max(r.w_hidden))
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = 0.1 * (w_max - w_min).max(0.05);

    let mut chart = ChartBuilder::on(&root)
        .caption("Dark Energy Equation of State", ("sans-serif", 34).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..z_max, (w_min - pad)..(w_max + pad))?;

    chart
        .configure_mesh()
        .x_desc("Redshift z")
        .y_desc("w(z)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            records.iter().map(|r| (r.z, r.w_baseline)),
            &RED,
        ))?
        .label("CPL baseline")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], RED.stroke_width(3)));

    chart
        .draw_series(LineSeries::new(
            records.iter().map(|r| (r.z, r.w_hidden)),
            &BLUE,
        ))?
        .label("Hidden region")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.7))
        .draw()?;

    root.present()?;
    Ok(())
}

fn plot_transition(records: &[ScanRecord], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;

    let z_max = records.iter().map(|r| r.z).fold(0.0_f64, f64::max).max(0.1);

    let mut chart = ChartBuilder::on(&root)
        .caption("Hidden Region Transition", ("sans-serif", 34).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..z_max, 0.0..1.05)?;

    chart
        .configure_mesh()
        .x_desc("Redshift z")
        .y_desc("Transition effect / growth ratio")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            records.iter().map(|r| (r.z, r.effect)),
            &BLUE,
        ))?
        .label("Transition effect")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], BLUE.stroke_width(3)));

    chart
        .draw_series(LineSeries::new(
            records.iter().map(|r| (r.z, r.growth_hidden / r.growth_baseline)),
            &GREEN,
        ))?
        .label("Growth-rate ratio")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], GREEN.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerLeft)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.7))
        .draw()?;

    root.present()?;
    Ok(())
}
