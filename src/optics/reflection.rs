//! Vector form of the law of reflection and Snell's law in 2D.
use nalgebra::Vector2;

/// Vectors shorter than this are treated as degenerate.
pub const DEGENERATE_VECTOR_LENGTH: f64 = 1e-12;

/// Result of a refraction calculation at a dielectric boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Refraction {
    /// The ray is refracted into the second medium.
    Refracted {
        /// normalized direction of the transmitted ray
        direction: Vector2<f64>,
        /// cosine of the angle of incidence
        cos_incidence: f64,
        /// cosine of the angle of transmission
        cos_transmission: f64,
    },
    /// total internal reflection. No transmitted ray exists.
    TotalInternalReflection,
}

/// Reflect an incident direction on a surface with the given normal.
///
/// The reflected direction is `incident − 2·(incident·normal)·normal`. If the result degenerates to a
/// (nearly) zero vector, the surface normal is returned instead.
#[must_use]
pub fn reflect(incident: &Vector2<f64>, normal: &Vector2<f64>) -> Vector2<f64> {
    let reflected = incident - 2.0 * incident.dot(normal) * normal;
    let length = reflected.norm();
    if length < DEGENERATE_VECTOR_LENGTH || !length.is_finite() {
        normal.normalize()
    } else {
        reflected / length
    }
}
/// Refract an incident direction at a boundary between media with the indices `n1` and `n2`.
///
/// The surface `normal` must be normalized and oriented toward the incoming ray (`incident·normal < 0`). If `n1 > n2`
/// and `sin²θt ≥ 1`, [`Refraction::TotalInternalReflection`] is returned.
#[must_use]
pub fn refract(incident: &Vector2<f64>, normal: &Vector2<f64>, n1: f64, n2: f64) -> Refraction {
    let d = incident.normalize();
    let cos_i = (-d.dot(normal)).clamp(0.0, 1.0);
    let mu = n1 / n2;
    let sin_t_sq = mu * mu * cos_i.mul_add(-cos_i, 1.0);
    if n1 > n2 && sin_t_sq >= 1.0 {
        return Refraction::TotalInternalReflection;
    }
    let cos_t = (1.0 - sin_t_sq).max(0.0).sqrt();
    let direction = mu * d + mu.mul_add(cos_i, -cos_t) * normal;
    Refraction::Refracted {
        direction: direction.normalize(),
        cos_incidence: cos_i,
        cos_transmission: cos_t,
    }
}
