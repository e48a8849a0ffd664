use std::path::PathBuf;

use clap::Parser;

use hidden_regions_scan::config::ScanConfig;
use hidden_regions_scan::run_scan;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Scan the hidden-region dark-energy model against its CPL baseline"
)]
struct Cli {
    /// Output base directory (relative paths are resolved from workspace root)
    #[arg(long, default_value = "output-hidden-regions-scan")]
    output: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable the hidden-region modification
    #[arg(long, conflicts_with = "no_hidden_region")]
    hidden_region: bool,

    /// Disable the hidden-region modification
    #[arg(long)]
    no_hidden_region: bool,

    /// Transition redshift
    #[arg(long)]
    z_transition: Option<f64>,

    /// Transition amplitude
    #[arg(long)]
    amplitude: Option<f64>,

    /// Transition width
    #[arg(long)]
    width: Option<f64>,

    /// CPL equation of state today
    #[arg(long)]
    w0: Option<f64>,

    /// CPL evolution coefficient
    #[arg(long)]
    wa: Option<f64>,

    /// Total matter density parameter today
    #[arg(long)]
    omega_m: Option<f64>,

    /// Number of scale-factor grid points
    #[arg(long)]
    points: Option<usize>,

    /// Diagnostic verbosity
    #[arg(long)]
    verbose: Option<i32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };

    if cli.hidden_region {
        cfg.hidden.enabled = true;
    }
    if cli.no_hidden_region {
        cfg.hidden.enabled = false;
    }
    if let Some(v) = cli.z_transition {
        cfg.hidden.z_transition = Some(v);
    }
    if let Some(v) = cli.amplitude {
        cfg.hidden.amplitude = Some(v);
    }
    if let Some(v) = cli.width {
        cfg.hidden.width = Some(v);
    }
    if let Some(v) = cli.w0 {
        cfg.w0 = v;
    }
    if let Some(v) = cli.wa {
        cfg.wa = v;
    }
    if let Some(v) = cli.omega_m {
        cfg.omega0_m = v;
    }
    if let Some(v) = cli.points {
        cfg.num_points = v;
    }
    if let Some(v) = cli.verbose {
        cfg.hidden.verbose = Some(v);
        cfg.background_verbose = v;
    }

    let summary = run_scan(&cfg, &cli.output)?;

    println!("Scan complete. Samples: {}", summary.samples);
    println!("Run directory: {}", summary.outputs.output_dir.display());
    println!("CSV: {}", summary.outputs.csv_path.display());
    println!("Summary: {}", summary.outputs.summary_path.display());
    println!("w(z) plot: {}", summary.outputs.plot_w_path.display());
    println!(
        "Transition plot: {}",
        summary.outputs.plot_transition_path.display()
    );

    println!(
        "Max |dw|: {:.5} at z = {:.3} | min cs2_eff: {:.3e} | max growth suppression: {:.5}",
        summary.metrics.max_w_shift,
        summary.metrics.z_at_max_w_shift,
        summary.metrics.min_cs2_eff,
        summary.metrics.max_growth_suppression
    );

    Ok(())
}
