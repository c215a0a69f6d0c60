//! Parameters of fundamental Gaussian beams.
//!
//! All lengths are given in the same (arbitrary) unit. The wavelength passed to these functions is the vacuum
//! wavelength expressed in this unit.
use num::complex::Complex64;
use std::f64::consts::PI;

/// Rayleigh range `z_R = π·w₀²·n/λ`.
#[must_use]
pub fn rayleigh_range(waist_radius: f64, wavelength: f64, refractive_index: f64) -> f64 {
    PI * waist_radius * waist_radius * refractive_index / wavelength
}
/// Waist radius `w₀ = √(z_R·λ/(π·n))` belonging to a Rayleigh range.
#[must_use]
pub fn waist_from_rayleigh_range(rayleigh_range: f64, wavelength: f64, refractive_index: f64) -> f64 {
    (rayleigh_range * wavelength / (PI * refractive_index)).sqrt()
}
/// Beam radius `w(z) = w₀·√(1 + (z/z_R)²)` at the distance `z` from the waist.
#[must_use]
pub fn beam_radius(waist_radius: f64, rayleigh_range: f64, z: f64) -> f64 {
    waist_radius * (z / rayleigh_range).mul_add(z / rayleigh_range, 1.0).sqrt()
}
/// Far-field half divergence angle `θ = w₀/z_R` (radians).
#[must_use]
pub fn divergence(waist_radius: f64, rayleigh_range: f64) -> f64 {
    waist_radius / rayleigh_range
}
/// Gouy phase `ψ(z) = atan(z/z_R)`.
#[must_use]
pub fn gouy_phase(rayleigh_range: f64, z: f64) -> f64 {
    (z / rayleigh_range).atan()
}
/// Radius of curvature of the wavefront `R(z) = z·(1 + (z_R/z)²)`.
///
/// At the waist the wavefront is flat and `f64::INFINITY` is returned.
#[must_use]
pub fn radius_of_curvature(rayleigh_range: f64, z: f64) -> f64 {
    if z == 0.0 {
        f64::INFINITY
    } else {
        z * (rayleigh_range / z).mul_add(rayleigh_range / z, 1.0)
    }
}
/// Transform a beam by an ideal thin lens using the complex beam parameter `q = z + i·z_R`.
///
/// `z` is the distance from the waist at the lens (positive if the waist lies before the lens). Returns the new
/// `(z, z_R)` pair after the lens or `None` if the transformation is singular.
#[must_use]
pub fn thin_lens_transform(z: f64, rayleigh_range: f64, focal_length: f64) -> Option<(f64, f64)> {
    let q = Complex64::new(z, rayleigh_range);
    if q.norm() < f64::EPSILON || focal_length == 0.0 || !focal_length.is_finite() {
        return None;
    }
    let inv_q = q.inv() - Complex64::new(1.0 / focal_length, 0.0);
    if inv_q.norm() < f64::EPSILON {
        return None;
    }
    let q_new = inv_q.inv();
    if !q_new.re.is_finite() || !q_new.im.is_finite() || q_new.im <= 0.0 {
        return None;
    }
    Some((q_new.re, q_new.im))
}
