use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use hidden_regions::HiddenRegionOptions;

/// Runtime configuration for the hidden-region scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Lowest scale factor in the grid
    pub a_min: f64,
    /// Highest scale factor in the grid (1 is today)
    pub a_max: f64,
    /// Number of grid points, endpoints included
    pub num_points: usize,
    /// CPL equation of state today
    pub w0: f64,
    /// CPL evolution coefficient
    pub wa: f64,
    /// Fluid rest-frame sound speed squared
    pub cs2_fld: f64,
    /// Total matter density parameter today
    pub omega0_m: f64,
    /// Fiducial fluid density contrast used to exercise the source terms
    pub delta_fld: f64,
    /// Fiducial fluid velocity divergence used to exercise the source terms
    pub theta_fld: f64,
    /// Host background verbosity, fallback for the hidden-region verbosity
    pub background_verbose: i32,
    /// Hidden-region settings
    pub hidden: HiddenRegionOptions,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            a_min: 0.1,
            a_max: 1.0,
            num_points: 91,
            w0: -1.0,
            wa: 0.0,
            cs2_fld: 1.0,
            omega0_m: 0.3137,
            delta_fld: 1.0e-3,
            theta_fld: 1.0e-4,
            background_verbose: 1,
            hidden: HiddenRegionOptions {
                enabled: true,
                ..HiddenRegionOptions::default()
            },
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.a_min > 0.0, "a_min must be > 0");
        anyhow::ensure!(self.a_max > self.a_min, "a_max must be larger than a_min");
        anyhow::ensure!(self.a_max <= 1.0, "a_max must not exceed 1 (today)");
        anyhow::ensure!(self.num_points >= 2, "num_points must be at least 2");
        anyhow::ensure!(self.cs2_fld >= 0.0, "cs2_fld must be non-negative");
        anyhow::ensure!(
            self.omega0_m > 0.0 && self.omega0_m <= 1.0,
            "omega0_m must lie in (0, 1]"
        );
        Ok(())
    }

    /// Inclusive scale-factor grid from `a_min` to `a_max`.
    pub fn grid(&self) -> Vec<f64> {
        if self.num_points == 1 {
            return vec![self.a_min];
        }

        let span = self.a_max - self.a_min;
        let denom = (self.num_points - 1) as f64;

        (0..self.num_points)
            .map(|idx| self.a_min + span * idx as f64 / denom)
            .collect()
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }
}
