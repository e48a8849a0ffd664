//! Smooth redshift transition profile.
//!
//! The transition is a tanh step in redshift: the effect sits near 1 well
//! below the transition redshift (late times), near 0 well above it, and
//! crosses 0.5 at the transition itself.

use crate::params::HiddenRegionParams;

/// Transition effect and its redshift derivative at a single redshift.
///
/// Ephemeral: recomputed from `z` and the parameter set on every call, never
/// cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSample {
    /// Effect in [0, 1].
    pub effect: f64,
    /// d(effect)/dz, non-positive everywhere.
    pub deffect_dz: f64,
}

impl TransitionSample {
    /// No effect; returned whenever hidden regions are disabled.
    pub const ZERO: Self = Self {
        effect: 0.0,
        deffect_dz: 0.0,
    };
}

/// Evaluate the transition profile at redshift `z`.
///
/// `effect = 0.5 * (1 - tanh((z - z_transition) / width))`. The derivative
/// uses the sech^2 identity on the same tanh evaluation, so both outputs stay
/// consistent to the last bit.
pub fn transition_effect(params: &HiddenRegionParams, z: f64) -> TransitionSample {
    if !params.enabled() {
        return TransitionSample::ZERO;
    }

    // Width is positive whenever enabled, enforced at construction.
    let t = ((z - params.z_transition()) / params.width()).tanh();

    TransitionSample {
        effect: 0.5 * (1.0 - t),
        deffect_dz: -0.5 * (1.0 - t * t) / params.width(),
    }
}
