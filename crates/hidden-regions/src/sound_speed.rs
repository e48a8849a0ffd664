//! Effective sound speed of the dark-energy fluid.

use crate::params::HiddenRegionParams;
use crate::transition::transition_effect;
use crate::{ensure_scale_factor, HiddenRegionError};

/// Lower bound on the modified sound speed squared. Keeps the fluid stable
/// when the transition drives cs2 toward zero.
pub const CS2_FLOOR: f64 = 1.0e-6;

/// Hidden-region-modified effective sound speed squared.
///
/// The sound speed is reduced near the transition to allow clustering:
/// `cs2 * (1 - 0.5 * amplitude * effect)`, floored at [`CS2_FLOOR`]. With
/// hidden regions disabled the input passes through unchanged.
pub fn effective_cs2(
    params: &HiddenRegionParams,
    a: f64,
    cs2: f64,
) -> Result<f64, HiddenRegionError> {
    if !params.enabled() {
        return Ok(cs2);
    }

    ensure_scale_factor(a)?;
    let z = 1.0 / a - 1.0;
    let transition = transition_effect(params, z);

    let modified = cs2 * (1.0 - 0.5 * params.amplitude() * transition.effect);
    if modified < CS2_FLOOR {
        Ok(CS2_FLOOR)
    } else {
        Ok(modified)
    }
}
