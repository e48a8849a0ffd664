//! Hidden-region parameter store.
//!
//! [`HiddenRegionOptions`] mirrors the host parameter-file keys, with `None`
//! standing for an absent key. [`HiddenRegionParams`] is the fully-resolved
//! immutable set every modifier reads; resolution happens exactly once, so no
//! downstream call ever re-checks defaults.

use serde::{Deserialize, Serialize};

use crate::HiddenRegionError;

/// Default transition redshift.
pub const DEFAULT_Z_TRANSITION: f64 = 0.35;
/// Default amplitude of the hidden-region effect.
pub const DEFAULT_AMPLITUDE: f64 = 0.05;
/// Default width of the transition.
pub const DEFAULT_WIDTH: f64 = 0.1;

/// Raw hidden-region settings as read from the host parameter file.
///
/// The aliases accept the host's key spelling directly.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HiddenRegionOptions {
    /// Enables the hidden-region modification.
    #[serde(alias = "hidden_region")]
    pub enabled: bool,
    /// Transition redshift.
    #[serde(alias = "z_hidden_region")]
    pub z_transition: Option<f64>,
    /// Amplitude of the effect.
    #[serde(alias = "amplitude_hidden_region")]
    pub amplitude: Option<f64>,
    /// Width of the transition.
    #[serde(alias = "width_hidden_region")]
    pub width: Option<f64>,
    /// Diagnostic verbosity.
    #[serde(alias = "hidden_region_verbose")]
    pub verbose: Option<i32>,
}

/// Resolved, immutable hidden-region parameters.
///
/// Fields are private so the construction-time invariants cannot be bypassed:
/// whenever `enabled` is true, `z_transition`, `amplitude`, and `width` are
/// positive and finite. When disabled, the numeric fields are zeroed and
/// ignored by every modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HiddenRegionParams {
    enabled: bool,
    z_transition: f64,
    amplitude: f64,
    width: f64,
    verbose: i32,
}

impl HiddenRegionParams {
    /// Validated constructor for an enabled parameter set.
    pub fn new(
        z_transition: f64,
        amplitude: f64,
        width: f64,
        verbose: i32,
    ) -> Result<Self, HiddenRegionError> {
        Ok(Self {
            enabled: true,
            z_transition: require_positive("z_transition", z_transition)?,
            amplitude: require_positive("amplitude", amplitude)?,
            width: require_positive("width", width)?,
            verbose,
        })
    }

    /// Hidden regions switched off; every modifier collapses to baseline.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            z_transition: 0.0,
            amplitude: 0.0,
            width: 0.0,
            verbose: 0,
        }
    }

    /// Resolve raw options into a fully-populated parameter set.
    ///
    /// Missing fields take their defaults; explicitly-provided values that
    /// fail validation are rejected rather than silently defaulted.
    /// `fallback_verbose` is the host background verbosity, used when
    /// `hidden_region_verbose` is unset.
    pub fn resolve(
        options: &HiddenRegionOptions,
        fallback_verbose: i32,
    ) -> Result<Self, HiddenRegionError> {
        if !options.enabled {
            return Ok(Self::disabled());
        }

        Self::new(
            resolve_field("z_transition", options.z_transition, DEFAULT_Z_TRANSITION)?,
            resolve_field("amplitude", options.amplitude, DEFAULT_AMPLITUDE)?,
            resolve_field("width", options.width, DEFAULT_WIDTH)?,
            options.verbose.unwrap_or(fallback_verbose),
        )
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn z_transition(&self) -> f64 {
        self.z_transition
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn verbose(&self) -> i32 {
        self.verbose
    }
}

fn resolve_field(name: &str, value: Option<f64>, default: f64) -> Result<f64, HiddenRegionError> {
    match value {
        Some(v) => require_positive(name, v),
        None => Ok(default),
    }
}

fn require_positive(name: &str, value: f64) -> Result<f64, HiddenRegionError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(HiddenRegionError::InvalidConfig(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}
