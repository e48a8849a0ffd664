//! Linear growth rate with hidden-region suppression.

use crate::params::HiddenRegionParams;
use crate::transition::transition_effect;
use crate::{ensure_scale_factor, HiddenRegionError};

/// Exponent of the standard growth-rate fitting formula `f = Omega_m(a)^0.55`.
pub const GROWTH_INDEX: f64 = 0.55;

/// Growth rate `f = dln D / dln a`.
///
/// Baseline is the standard fit on `Omega_m(a) = Omega0_m / (Omega0_m +
/// (1 - Omega0_m) * a^(-3 w0))`. With hidden regions enabled the rate is
/// suppressed by `1 - 0.3 * amplitude * effect`, matching the reduced
/// clustering after the transition.
pub fn growth_rate(
    params: &HiddenRegionParams,
    a: f64,
    omega0_m: f64,
    w0: f64,
) -> Result<f64, HiddenRegionError> {
    ensure_scale_factor(a)?;
    if !(omega0_m > 0.0 && omega0_m <= 1.0) {
        return Err(HiddenRegionError::InvalidConfig(format!(
            "Omega0_m must lie in (0, 1], got {omega0_m}"
        )));
    }

    let omega_m_a = omega0_m / (omega0_m + (1.0 - omega0_m) * a.powf(-3.0 * w0));
    let baseline = omega_m_a.powf(GROWTH_INDEX);

    if !params.enabled() {
        return Ok(baseline);
    }

    let z = 1.0 / a - 1.0;
    let transition = transition_effect(params, z);
    Ok(baseline * (1.0 - 0.3 * params.amplitude() * transition.effect))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_params() -> HiddenRegionParams {
        HiddenRegionParams::new(0.35, 0.05, 0.1, 0).unwrap()
    }

    #[test]
    fn test_baseline_today() {
        // At a = 1 the density ratio collapses to Omega0_m for any w0.
        let params = HiddenRegionParams::disabled();
        let f = growth_rate(&params, 1.0, 0.3, -1.0).unwrap();
        assert!((f - 0.3_f64.powf(GROWTH_INDEX)).abs() < 1e-15);
    }

    #[test]
    fn test_matter_domination_limit() {
        // Deep in matter domination (small a, w0 = -1) the fit tends to 1.
        let params = HiddenRegionParams::disabled();
        let f = growth_rate(&params, 0.01, 0.3, -1.0).unwrap();
        assert!(f > 0.999);
    }

    #[test]
    fn test_suppression_at_transition() {
        let a = 1.0 / (1.0 + 0.35);
        let baseline = growth_rate(&HiddenRegionParams::disabled(), a, 0.3, -1.0).unwrap();
        let modified = growth_rate(&default_params(), a, 0.3, -1.0).unwrap();

        // Effect is 0.5 at the transition: factor 1 - 0.3 * 0.05 * 0.5.
        let expected = baseline * (1.0 - 0.3 * 0.05 * 0.5);
        assert!((modified - expected).abs() < 1e-12);
        assert!(modified < baseline);
    }

    #[test]
    fn test_disabled_matches_baseline_everywhere() {
        let params = HiddenRegionParams::disabled();
        for i in 1..=20 {
            let a = i as f64 / 20.0;
            let f = growth_rate(&params, a, 0.3137, -0.92).unwrap();
            let omega_m_a = 0.3137 / (0.3137 + (1.0 - 0.3137) * a.powf(-3.0 * -0.92));
            assert!((f - omega_m_a.powf(GROWTH_INDEX)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        let params = default_params();
        assert!(growth_rate(&params, 0.0, 0.3, -1.0).is_err());
        assert!(growth_rate(&params, 0.5, 0.0, -1.0).is_err());
        assert!(growth_rate(&params, 0.5, 1.5, -1.0).is_err());
        assert!(growth_rate(&params, 0.5, f64::NAN, -1.0).is_err());
    }
}
