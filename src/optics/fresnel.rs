//! Fresnel reflectance of an uncoated dielectric interface.
//!
//! Formulas taken from `https://de.wikipedia.org/wiki/Fresnelsche_Formeln`

/// Amplitude reflection coefficient for s-polarized light.
#[must_use]
pub fn fresnel_rs(n1: f64, n2: f64, cos_i: f64, cos_t: f64) -> f64 {
    n1.mul_add(cos_i, -(n2 * cos_t)) / n1.mul_add(cos_i, n2 * cos_t)
}
/// Amplitude reflection coefficient for p-polarized light.
#[must_use]
pub fn fresnel_rp(n1: f64, n2: f64, cos_i: f64, cos_t: f64) -> f64 {
    n2.mul_add(cos_i, -(n1 * cos_t)) / n2.mul_add(cos_i, n1 * cos_t)
}
/// Unpolarized reflectance (power) at an interface from medium `n1` into `n2` for the given cosine of the angle of incidence.
///
/// The result is the average of the squared s- and p-amplitude coefficients. Beyond the critical angle (`n1 > n2`) the reflectance is exactly 1.0.
#[must_use]
pub fn fresnel_reflectance(n1: f64, n2: f64, cos_i: f64) -> f64 {
    #[allow(clippy::float_cmp)]
    if n1 == n2 {
        return 0.0;
    }
    let cos_i = cos_i.abs().min(1.0);
    let mu = n1 / n2;
    let sin_t_sq = mu * mu * cos_i.mul_add(-cos_i, 1.0);
    if n1 > n2 && sin_t_sq >= 1.0 {
        return 1.0;
    }
    let cos_t = (1.0 - sin_t_sq).max(0.0).sqrt();
    if n1.mul_add(cos_i, n2 * cos_t) < f64::EPSILON || n2.mul_add(cos_i, n1 * cos_t) < f64::EPSILON
    {
        // grazing incidence
        return 1.0;
    }
    let r_s = fresnel_rs(n1, n2, cos_i, cos_t);
    let r_p = fresnel_rp(n1, n2, cos_i, cos_t);
    r_s.mul_add(r_s, r_p * r_p) / 2.0
}
/// Unpolarized transmittance (power) at an interface, computed from the amplitude transmission coefficients.
///
/// Beyond the critical angle the transmittance is 0.0.
#[must_use]
pub fn fresnel_transmittance(n1: f64, n2: f64, cos_i: f64) -> f64 {
    let cos_i = cos_i.abs().min(1.0);
    let mu = n1 / n2;
    let sin_t_sq = mu * mu * cos_i.mul_add(-cos_i, 1.0);
    if sin_t_sq >= 1.0 || cos_i < f64::EPSILON {
        return 0.0;
    }
    let cos_t = (1.0 - sin_t_sq).sqrt();
    let t_s = 2.0 * n1 * cos_i / n1.mul_add(cos_i, n2 * cos_t);
    let t_p = 2.0 * n1 * cos_i / n2.mul_add(cos_i, n1 * cos_t);
    let factor = (n2 * cos_t) / (n1 * cos_i);
    factor * t_s.mul_add(t_s, t_p * t_p) / 2.0
}
