//! Background quantities derived from the equation-of-state integral.

use hidden_regions::EosSample;

/// Dark-energy density relative to today,
/// `rho_de(a) / rho_de(1) = a^-3 * exp(3 * int_a^1 w(a')/a' da')`.
///
/// Inherits the first-order approximation of the hidden-region integral when
/// fed a modified sample.
pub fn dark_energy_density_ratio(sample: &EosSample, a: f64) -> f64 {
    a.powi(-3) * (3.0 * sample.integral).exp()
}

/// Normalized Hubble rate `E(a) = H(a)/H0` for a flat matter plus
/// dark-energy universe.
pub fn normalized_hubble_rate(omega0_m: f64, sample: &EosSample, a: f64) -> f64 {
    (omega0_m * a.powi(-3) + (1.0 - omega0_m) * dark_energy_density_ratio(sample, a)).sqrt()
}
