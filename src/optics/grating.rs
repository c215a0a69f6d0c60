//! Grating equation and the simplified per-order efficiencies.
use uom::si::f64::{Length, LinearNumberDensity};

/// Diffraction efficiency of the orders `|m| = 0, 1, 2, 3`. Higher orders carry no power.
pub const ORDER_EFFICIENCIES: [f64; 4] = [0.30, 0.22, 0.08, 0.04];

/// Returns the (simplified) diffraction efficiency of the given order.
#[must_use]
pub fn order_efficiency(order: i32) -> f64 {
    usize::try_from(order.unsigned_abs())
        .ok()
        .and_then(|idx| ORDER_EFFICIENCIES.get(idx).copied())
        .unwrap_or(0.0)
}
/// Dimensionless grating constant `λ/d` for the given wavelength and line density (`1/d`).
#[must_use]
pub fn wavelength_over_period(wavelength: Length, line_density: LinearNumberDensity) -> f64 {
    (wavelength * line_density).value
}
/// Sine of the diffraction angle of the order `m` following `d·(sinθₘ − sinθᵢ) = m·λ`.
///
/// Returns `None` if the order does not propagate (`|sinθₘ| > 1`).
#[must_use]
pub fn diffracted_sine(sin_incidence: f64, order: i32, wavelength_over_period: f64) -> Option<f64> {
    let sin_m = f64::from(order).mul_add(wavelength_over_period, sin_incidence);
    if sin_m.is_finite() && sin_m.abs() <= 1.0 {
        Some(sin_m)
    } else {
        None
    }
}
