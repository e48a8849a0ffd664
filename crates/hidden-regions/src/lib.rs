//! Hidden-region dark-energy modification layer.
//!
//! Implements a smooth tanh-shaped departure from a CPL baseline dark-energy
//! model near a transition redshift, together with the corrections it induces
//! on the fluid perturbation source terms, the effective sound speed, and the
//! linear growth rate.
//!
//! Every operation here is a closed-form, stateless evaluation: the host
//! integrator supplies background and perturbation values, this crate returns
//! corrected values. The only shared data is the immutable
//! [`HiddenRegionParams`] set resolved once from configuration, so concurrent
//! evaluation needs no locking.

pub mod eos;
pub mod growth;
pub mod params;
pub mod perturbations;
pub mod sound_speed;
pub mod transition;

use thiserror::Error;

pub use eos::{DarkEnergyEos, EosSample};
pub use growth::{growth_rate, GROWTH_INDEX};
pub use params::{
    HiddenRegionOptions, HiddenRegionParams, DEFAULT_AMPLITUDE, DEFAULT_WIDTH,
    DEFAULT_Z_TRANSITION,
};
pub use perturbations::{
    apply_dark_energy_perturbations, BackgroundPoint, DarkEnergySources, FluidPerturbations,
};
pub use sound_speed::{effective_cs2, CS2_FLOOR};
pub use transition::{transition_effect, TransitionSample};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HiddenRegionError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("scale factor must be positive and finite, got {0}")]
    NonPositiveScaleFactor(f64),
    #[error("background redshift {z} disagrees with scale factor {a} (expected z = {expected})")]
    RedshiftMismatch { a: f64, z: f64, expected: f64 },
}

/// Scale factors must be positive and finite before computing `1/a` or `ln a`.
pub(crate) fn ensure_scale_factor(a: f64) -> Result<(), HiddenRegionError> {
    if a > 0.0 && a.is_finite() {
        Ok(())
    } else {
        Err(HiddenRegionError::NonPositiveScaleFactor(a))
    }
}
