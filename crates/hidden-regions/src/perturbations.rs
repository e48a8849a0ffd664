//! Dark-energy perturbation source terms.
//!
//! The host's Boltzmann hierarchy owns the workspace slots; this module
//! computes the perfect-fluid baseline sources in place and, when hidden
//! regions are enabled, scales them by a single factor derived from the
//! transition effect.

use crate::eos::DarkEnergyEos;
use crate::params::HiddenRegionParams;
use crate::transition::transition_effect;
use crate::{ensure_scale_factor, HiddenRegionError};

/// Relative tolerance for the background redshift consistency check.
const REDSHIFT_TOL: f64 = 1.0e-9;

/// Background quantities at one integration step, supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPoint {
    /// Scale factor.
    pub a: f64,
    /// Redshift from the host background table. Must agree with `1/a - 1`.
    pub z: f64,
    /// Dark-energy fluid background density.
    pub rho_fld: f64,
    /// Equation of state of the fluid at this step.
    pub w_fld: f64,
}

/// Dark-energy entries of the host perturbation vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidPerturbations {
    /// Density contrast delta.
    pub delta_fld: f64,
    /// Velocity divergence theta.
    pub theta_fld: f64,
}

/// Caller-owned source-term slots for the dark-energy fluid, written in
/// place. The core never allocates or frees this storage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DarkEnergySources {
    pub delta_rho: f64,
    pub rho_plus_p_theta: f64,
    pub delta_p: f64,
    pub rho_plus_p_shear: f64,
}

/// Compute the dark-energy source terms into `sources`.
///
/// The perfect-fluid baseline is always written first: density, momentum,
/// and pressure perturbations, plus zero shear when `has_matter_source` is
/// set. With hidden regions enabled, every written slot is then scaled by
/// `1 + amplitude * effect(z)`.
///
/// The redshift is taken from the host background point rather than derived
/// from the scale factor, and the two are cross-checked; on
/// [`HiddenRegionError::RedshiftMismatch`] the slots hold the unmodified
/// baseline values.
pub fn apply_dark_energy_perturbations(
    eos: &DarkEnergyEos,
    bg: &BackgroundPoint,
    pv: &FluidPerturbations,
    has_matter_source: bool,
    params: &HiddenRegionParams,
    sources: &mut DarkEnergySources,
) -> Result<(), HiddenRegionError> {
    let p_fld = bg.w_fld * bg.rho_fld;

    sources.delta_rho = bg.rho_fld * pv.delta_fld;
    sources.rho_plus_p_theta = (bg.rho_fld + p_fld) * pv.theta_fld;
    sources.delta_p = eos.cs2 * bg.rho_fld * pv.delta_fld;
    if has_matter_source {
        // No shear for a perfect fluid.
        sources.rho_plus_p_shear = 0.0;
    }

    if !params.enabled() {
        return Ok(());
    }

    ensure_scale_factor(bg.a)?;
    let expected = 1.0 / bg.a - 1.0;
    if (bg.z - expected).abs() > REDSHIFT_TOL * (1.0 + expected.abs()) {
        return Err(HiddenRegionError::RedshiftMismatch {
            a: bg.a,
            z: bg.z,
            expected,
        });
    }

    let factor = 1.0 + params.amplitude() * transition_effect(params, bg.z).effect;

    sources.delta_rho *= factor;
    sources.rho_plus_p_theta *= factor;
    sources.delta_p *= factor;
    if has_matter_source {
        sources.rho_plus_p_shear *= factor;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_params() -> HiddenRegionParams {
        HiddenRegionParams::new(0.35, 0.05, 0.1, 0).unwrap()
    }

    fn fixture() -> (DarkEnergyEos, BackgroundPoint, FluidPerturbations) {
        let eos = DarkEnergyEos {
            w0: -0.9,
            wa: 0.0,
            cs2: 0.8,
        };
        let a = 1.0 / (1.0 + 0.35);
        let bg = BackgroundPoint {
            a,
            z: 0.35,
            rho_fld: 2.0,
            w_fld: -0.9,
        };
        let pv = FluidPerturbations {
            delta_fld: 1.0e-3,
            theta_fld: 2.0e-4,
        };
        (eos, bg, pv)
    }

    #[test]
    fn test_baseline_sources() {
        let (eos, bg, pv) = fixture();
        let mut sources = DarkEnergySources::default();
        apply_dark_energy_perturbations(
            &eos,
            &bg,
            &pv,
            true,
            &HiddenRegionParams::disabled(),
            &mut sources,
        )
        .unwrap();

        assert!((sources.delta_rho - 2.0 * 1.0e-3).abs() < 1e-15);
        assert!((sources.rho_plus_p_theta - (2.0 + -0.9 * 2.0) * 2.0e-4).abs() < 1e-15);
        assert!((sources.delta_p - 0.8 * 2.0 * 1.0e-3).abs() < 1e-15);
        assert_eq!(sources.rho_plus_p_shear, 0.0);
    }

    #[test]
    fn test_disabled_leaves_baseline_untouched() {
        let (eos, bg, pv) = fixture();
        let params = HiddenRegionParams::disabled();

        let expected = DarkEnergySources {
            delta_rho: bg.rho_fld * pv.delta_fld,
            rho_plus_p_theta: (bg.rho_fld + bg.w_fld * bg.rho_fld) * pv.theta_fld,
            delta_p: eos.cs2 * bg.rho_fld * pv.delta_fld,
            rho_plus_p_shear: 0.0,
        };

        let mut sources = DarkEnergySources::default();
        apply_dark_energy_perturbations(&eos, &bg, &pv, true, &params, &mut sources).unwrap();
        assert_eq!(sources, expected);
    }

    #[test]
    fn test_factor_applied_to_all_written_slots() {
        let (eos, bg, pv) = fixture();
        let params = default_params();

        let mut baseline = DarkEnergySources::default();
        apply_dark_energy_perturbations(
            &eos,
            &bg,
            &pv,
            true,
            &HiddenRegionParams::disabled(),
            &mut baseline,
        )
        .unwrap();

        let mut sources = DarkEnergySources::default();
        apply_dark_energy_perturbations(&eos, &bg, &pv, true, &params, &mut sources).unwrap();

        // At z = z_transition the effect is 0.5, so the factor is 1.025.
        let factor = 1.0 + 0.05 * 0.5;
        assert!((sources.delta_rho - baseline.delta_rho * factor).abs() < 1e-15);
        assert!((sources.rho_plus_p_theta - baseline.rho_plus_p_theta * factor).abs() < 1e-15);
        assert!((sources.delta_p - baseline.delta_p * factor).abs() < 1e-15);
        assert_eq!(sources.rho_plus_p_shear, 0.0);
    }

    #[test]
    fn test_shear_written_only_with_matter_source() {
        let (eos, bg, pv) = fixture();
        let mut sources = DarkEnergySources {
            rho_plus_p_shear: 42.0,
            ..Default::default()
        };
        apply_dark_energy_perturbations(&eos, &bg, &pv, false, &default_params(), &mut sources)
            .unwrap();

        // The slot is neither zeroed nor scaled without the flag.
        assert_eq!(sources.rho_plus_p_shear, 42.0);
    }

    #[test]
    fn test_redshift_mismatch_rejected() {
        let (eos, mut bg, pv) = fixture();
        bg.z = 0.40;

        let mut sources = DarkEnergySources::default();
        let err =
            apply_dark_energy_perturbations(&eos, &bg, &pv, true, &default_params(), &mut sources)
                .unwrap_err();
        assert!(matches!(err, HiddenRegionError::RedshiftMismatch { .. }));

        // Disabled runs skip the check entirely.
        let mut sources = DarkEnergySources::default();
        apply_dark_energy_perturbations(
            &eos,
            &bg,
            &pv,
            true,
            &HiddenRegionParams::disabled(),
            &mut sources,
        )
        .unwrap();
    }

    #[test]
    fn test_non_positive_scale_factor_rejected_when_enabled() {
        let (eos, mut bg, pv) = fixture();
        bg.a = 0.0;

        let mut sources = DarkEnergySources::default();
        let err =
            apply_dark_energy_perturbations(&eos, &bg, &pv, true, &default_params(), &mut sources)
                .unwrap_err();
        assert!(matches!(err, HiddenRegionError::NonPositiveScaleFactor(_)));
    }
}
