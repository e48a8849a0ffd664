//! Dark-energy equation of state: CPL baseline and hidden-region variant.

use serde::{Deserialize, Serialize};

use crate::params::HiddenRegionParams;
use crate::transition::transition_effect;
use crate::{ensure_scale_factor, HiddenRegionError};

/// Constant parameters of the baseline dark-energy fluid.
///
/// Owned by the background model; read-only to every modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DarkEnergyEos {
    /// CPL equation of state today.
    pub w0: f64,
    /// CPL evolution coefficient.
    pub wa: f64,
    /// Sound speed squared in the fluid rest frame.
    pub cs2: f64,
}

impl Default for DarkEnergyEos {
    /// Cosmological-constant limit.
    fn default() -> Self {
        Self {
            w0: -1.0,
            wa: 0.0,
            cs2: 1.0,
        }
    }
}

/// Equation of state with its scale-factor derivative and the integral
/// `int_a^1 w(a')/a' da'`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosSample {
    pub w: f64,
    pub dw_over_da: f64,
    pub integral: f64,
}

impl DarkEnergyEos {
    /// CPL equation of state `w(a) = w0 + wa * (1 - a)`, for callers that
    /// need neither the derivative nor the integral.
    pub fn w(&self, a: f64) -> Result<f64, HiddenRegionError> {
        ensure_scale_factor(a)?;
        Ok(self.w0 + self.wa * (1.0 - a))
    }

    /// Full CPL triple.
    ///
    /// The integral is closed-form:
    /// `int_a^1 [w0 + wa (1 - a')]/a' da' = w0 ln(1/a) + wa (1 - a + ln a)`.
    pub fn sample(&self, a: f64) -> Result<EosSample, HiddenRegionError> {
        ensure_scale_factor(a)?;
        Ok(EosSample {
            w: self.w0 + self.wa * (1.0 - a),
            dw_over_da: -self.wa,
            integral: self.w0 * (1.0 / a).ln() + self.wa * (1.0 - a + a.ln()),
        })
    }

    /// Equation of state with the hidden-region correction applied.
    pub fn w_with_hidden_region(
        &self,
        a: f64,
        params: &HiddenRegionParams,
    ) -> Result<f64, HiddenRegionError> {
        let w = self.w(a)?;
        if !params.enabled() {
            return Ok(w);
        }

        let z = 1.0 / a - 1.0;
        Ok(w - params.amplitude() * transition_effect(params, z).effect)
    }

    /// CPL triple with the hidden-region correction applied.
    ///
    /// The derivative picks up the transition term through the chain rule
    /// `dz/da = -1/a^2`. The integral correction
    /// `-amplitude * effect * ln(a)` is a first-order approximation; the
    /// exact modified integral would require quadrature across the
    /// transition region.
    pub fn sample_with_hidden_region(
        &self,
        a: f64,
        params: &HiddenRegionParams,
    ) -> Result<EosSample, HiddenRegionError> {
        let mut sample = self.sample(a)?;
        if !params.enabled() {
            return Ok(sample);
        }

        let z = 1.0 / a - 1.0;
        let transition = transition_effect(params, z);
        let dz_da = -1.0 / (a * a);

        sample.w -= params.amplitude() * transition.effect;
        sample.dw_over_da -= params.amplitude() * transition.deffect_dz * dz_da;
        sample.integral -= params.amplitude() * transition.effect * a.ln();

        Ok(sample)
    }
}
