pub mod config;
pub mod cosmology;
pub mod output;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;

use hidden_regions::{
    apply_dark_energy_perturbations, effective_cs2, growth_rate, transition_effect,
    BackgroundPoint, DarkEnergyEos, DarkEnergySources, FluidPerturbations, HiddenRegionParams,
};

use crate::config::ScanConfig;
use crate::cosmology::{dark_energy_density_ratio, normalized_hubble_rate};
use crate::output::{
    render_plots, write_csv, write_summary, OutputFiles, ScanMetrics, ScanRecord, ScanSummary,
};

pub fn run_scan(cfg: &ScanConfig, output_dir: &Path) -> anyhow::Result<ScanSummary> {
    cfg.validate()?;

    let params = HiddenRegionParams::resolve(&cfg.hidden, cfg.background_verbose)?;
    let eos = DarkEnergyEos {
        w0: cfg.w0,
        wa: cfg.wa,
        cs2: cfg.cs2_fld,
    };

    // Diagnostics live here; the core stays silent.
    if params.verbose() > 0 {
        if params.enabled() {
            println!(
                "Hidden region enabled: z_transition = {:.4}, amplitude = {:.4}, width = {:.4}",
                params.z_transition(),
                params.amplitude(),
                params.width()
            );
        } else {
            println!("Hidden region disabled");
        }
    }

    let output_base_dir = resolve_output_base_dir(output_dir);
    let run_dir = create_timestamped_run_dir(&output_base_dir)?;

    let records = scan_records(cfg, &params, &eos)?;
    let metrics = compute_metrics(&records, &params, &eos)?;

    let files = OutputFiles {
        output_dir: run_dir.clone(),
        csv_path: run_dir.join("hidden_regions_scan.csv"),
        summary_path: run_dir.join("scan_summary.json"),
        plot_w_path: run_dir.join("plot_w_of_z.png"),
        plot_transition_path: run_dir.join("plot_transition.png"),
    };

    let summary = ScanSummary {
        config: cfg.clone(),
        params,
        samples: records.len(),
        metrics,
        outputs: files.clone(),
    };

    write_csv(&files.csv_path, &records)?;
    write_summary(&files.summary_path, &summary)?;
    render_plots(&records, &files)?;

    Ok(summary)
}

/// Evaluate every modifier over the scale-factor grid.
pub fn scan_records(
    cfg: &ScanConfig,
    params: &HiddenRegionParams,
    eos: &DarkEnergyEos,
) -> anyhow::Result<Vec<ScanRecord>> {
    let baseline_params = HiddenRegionParams::disabled();
    let mut records = Vec::with_capacity(cfg.num_points);

    for a in cfg.grid() {
        let z = 1.0 / a - 1.0;

        let baseline = eos.sample(a)?;
        let hidden = eos.sample_with_hidden_region(a, params)?;
        let transition = transition_effect(params, z);
        let cs2_eff = effective_cs2(params, a, cfg.cs2_fld)?;
        let growth_baseline = growth_rate(&baseline_params, a, cfg.omega0_m, cfg.w0)?;
        let growth_hidden = growth_rate(params, a, cfg.omega0_m, cfg.w0)?;

        // Source terms for a fiducial perturbation state. The background
        // density follows the baseline integral, so the ratio of modified to
        // baseline delta_rho isolates the hidden-region factor.
        let rho_fld = (1.0 - cfg.omega0_m) * dark_energy_density_ratio(&baseline, a);
        let bg = BackgroundPoint {
            a,
            z,
            rho_fld,
            w_fld: hidden.w,
        };
        let pv = FluidPerturbations {
            delta_fld: cfg.delta_fld,
            theta_fld: cfg.theta_fld,
        };

        let mut baseline_sources = DarkEnergySources::default();
        apply_dark_energy_perturbations(eos, &bg, &pv, true, &baseline_params, &mut baseline_sources)?;
        let mut sources = DarkEnergySources::default();
        apply_dark_energy_perturbations(eos, &bg, &pv, true, params, &mut sources)?;

        let source_factor = if baseline_sources.delta_rho.abs() > 0.0 {
            sources.delta_rho / baseline_sources.delta_rho
        } else {
            1.0
        };

        if params.verbose() > 1 {
            println!(
                "a = {a:.4}  z = {z:.4}  w = {:.6} -> {:.6}  effect = {:.6}",
                baseline.w, hidden.w, transition.effect
            );
        }

        records.push(ScanRecord {
            a,
            z,
            effect: transition.effect,
            deffect_dz: transition.deffect_dz,
            w_baseline: baseline.w,
            w_hidden: hidden.w,
            dw_over_da_baseline: baseline.dw_over_da,
            dw_over_da_hidden: hidden.dw_over_da,
            integral_baseline: baseline.integral,
            integral_hidden: hidden.integral,
            cs2_eff,
            growth_baseline,
            growth_hidden,
            hubble_baseline: normalized_hubble_rate(cfg.omega0_m, &baseline, a),
            hubble_hidden: normalized_hubble_rate(cfg.omega0_m, &hidden, a),
            source_factor,
        });
    }

    Ok(records)
}

fn compute_metrics(
    records: &[ScanRecord],
    params: &HiddenRegionParams,
    eos: &DarkEnergyEos,
) -> anyhow::Result<ScanMetrics> {
    let mut max_w_shift = 0.0_f64;
    let mut z_at_max_w_shift = 0.0_f64;
    let mut min_cs2_eff = f64::INFINITY;
    let mut max_growth_suppression = 0.0_f64;

    for r in records {
        let shift = (r.w_hidden - r.w_baseline).abs();
        if shift > max_w_shift {
            max_w_shift = shift;
            z_at_max_w_shift = r.z;
        }
        min_cs2_eff = min_cs2_eff.min(r.cs2_eff);
        max_growth_suppression =
            max_growth_suppression.max(1.0 - r.growth_hidden / r.growth_baseline);
    }

    let w_at_transition = if params.enabled() {
        let a = 1.0 / (1.0 + params.z_transition());
        Some(eos.w_with_hidden_region(a, params)?)
    } else {
        None
    };

    Ok(ScanMetrics {
        max_w_shift,
        z_at_max_w_shift,
        w_at_transition,
        min_cs2_eff,
        max_growth_suppression,
    })
}

pub fn workspace_root_dir() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|_| manifest_dir.join("../.."))
}

pub fn default_output_base_dir() -> PathBuf {
    workspace_root_dir().join("output-hidden-regions-scan")
}

fn resolve_output_base_dir(requested: &Path) -> PathBuf {
    if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        workspace_root_dir().join(requested)
    }
}

fn create_timestamped_run_dir(base_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(base_dir)
        .with_context(|| format!("failed to create output base directory {}", base_dir.display()))?;

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S").to_string();
    let run_dir = base_dir.join(&timestamp);
    if !run_dir.exists() {
        fs::create_dir_all(&run_dir)?;
        return Ok(run_dir);
    }

    let mut counter: usize = 1;
    loop {
        let candidate = base_dir.join(format!("{timestamp}-{counter:02}"));
        if !candidate.exists() {
            fs::create_dir_all(&candidate)?;
            return Ok(candidate);
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> ScanConfig {
        ScanConfig {
            background_verbose: 0,
            ..ScanConfig::default()
        }
    }

    #[test]
    fn test_scan_records_cover_grid() {
        let cfg = quiet_config();
        let params = HiddenRegionParams::resolve(&cfg.hidden, cfg.background_verbose).unwrap();
        let eos = DarkEnergyEos {
            w0: cfg.w0,
            wa: cfg.wa,
            cs2: cfg.cs2_fld,
        };

        let records = scan_records(&cfg, &params, &eos).unwrap();
        assert_eq!(records.len(), cfg.num_points);
        assert!((records[0].a - cfg.a_min).abs() < 1e-15);
        assert!((records.last().unwrap().a - cfg.a_max).abs() < 1e-15);
    }

    #[test]
    fn test_source_factor_tracks_transition() {
        let cfg = quiet_config();
        let params = HiddenRegionParams::resolve(&cfg.hidden, cfg.background_verbose).unwrap();
        let eos = DarkEnergyEos {
            w0: cfg.w0,
            wa: cfg.wa,
            cs2: cfg.cs2_fld,
        };

        for r in scan_records(&cfg, &params, &eos).unwrap() {
            let expected = 1.0 + params.amplitude() * r.effect;
            assert!((r.source_factor - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_disabled_scan_is_pure_baseline() {
        let mut cfg = quiet_config();
        cfg.hidden.enabled = false;
        let params = HiddenRegionParams::resolve(&cfg.hidden, cfg.background_verbose).unwrap();
        let eos = DarkEnergyEos {
            w0: cfg.w0,
            wa: cfg.wa,
            cs2: cfg.cs2_fld,
        };

        for r in scan_records(&cfg, &params, &eos).unwrap() {
            assert_eq!(r.w_baseline, r.w_hidden);
            assert_eq!(r.growth_baseline, r.growth_hidden);
            assert_eq!(r.cs2_eff, cfg.cs2_fld);
            assert_eq!(r.source_factor, 1.0);
            assert_eq!(r.effect, 0.0);
        }
    }

    #[test]
    fn test_metrics_pick_transition_peak() {
        let cfg = quiet_config();
        let params = HiddenRegionParams::resolve(&cfg.hidden, cfg.background_verbose).unwrap();
        let eos = DarkEnergyEos {
            w0: cfg.w0,
            wa: cfg.wa,
            cs2: cfg.cs2_fld,
        };

        let records = scan_records(&cfg, &params, &eos).unwrap();
        let metrics = compute_metrics(&records, &params, &eos).unwrap();

        // The shift grows toward low redshift, approaching the full amplitude.
        assert!(metrics.max_w_shift > 0.04);
        assert!(metrics.max_w_shift <= params.amplitude() + 1e-12);
        assert!((metrics.w_at_transition.unwrap() - -1.025).abs() < 1e-12);
        assert!(metrics.min_cs2_eff < cfg.cs2_fld);
    }
}
