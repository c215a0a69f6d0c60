//! Parabolic arc
//!
//! In the local frame of the arc (`u` along the axis, `v` along the tangent, origin at the vertex) the surface
//! follows `v² = 4·f·u` for `|v| ≤ D/2`.
use nalgebra::{Point2, Vector2};

use super::{quadratic_roots, GeoSurface, SurfaceHit, PARALLEL_TOLERANCE};
use crate::{
    error::{LumosError, LumosResult},
    utils::math_utils::{is_finite_vector, perpendicular},
};

/// A parabolic arc opening toward its axis direction. The natural normal points toward the focus.
#[derive(Debug, Clone, PartialEq)]
pub struct ParabolicArc {
    vertex: Point2<f64>,
    axis: Vector2<f64>,
    tangent: Vector2<f64>,
    focal_length: f64,
    half_aperture: f64,
}
impl ParabolicArc {
    /// Creates a new [`ParabolicArc`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the vertex is not finite or the axis is degenerate
    ///   - the focal length is <= 0.0 or not finite
    ///   - the aperture (diameter) is <= 0.0 or not finite
    pub fn new(
        vertex: Point2<f64>,
        axis: Vector2<f64>,
        focal_length: f64,
        aperture: f64,
    ) -> LumosResult<Self> {
        if !is_finite_vector(&vertex.coords) {
            return Err(LumosError::Geometry("vertex must be finite".into()));
        }
        let norm = axis.norm();
        if norm < PARALLEL_TOLERANCE || !norm.is_finite() {
            return Err(LumosError::Geometry("axis must not be degenerate".into()));
        }
        if focal_length <= 0.0 || !focal_length.is_finite() {
            return Err(LumosError::Geometry(
                "focal length must be >0.0 and finite".into(),
            ));
        }
        if aperture <= 0.0 || !aperture.is_finite() {
            return Err(LumosError::Geometry(
                "aperture must be >0.0 and finite".into(),
            ));
        }
        let axis = axis / norm;
        Ok(Self {
            vertex,
            axis,
            tangent: perpendicular(&axis),
            focal_length,
            half_aperture: aperture / 2.0,
        })
    }
    /// Returns the focal point of this [`ParabolicArc`].
    #[must_use]
    pub fn focus(&self) -> Point2<f64> {
        self.vertex + self.axis * self.focal_length
    }
    /// Returns the vertex of this [`ParabolicArc`].
    #[must_use]
    pub const fn vertex(&self) -> Point2<f64> {
        self.vertex
    }
}
impl GeoSurface for ParabolicArc {
    /// The parameter of the hit is the tangent coordinate `v` of the hit point.
    fn intersect(
        &self,
        origin: &Point2<f64>,
        direction: &Vector2<f64>,
        min_distance: f64,
    ) -> Option<SurfaceHit> {
        let p = origin - self.vertex;
        let (pu, pv) = (p.dot(&self.axis), p.dot(&self.tangent));
        let (du, dv) = (direction.dot(&self.axis), direction.dot(&self.tangent));
        let four_f = 4.0 * self.focal_length;
        let mut a = dv * dv;
        if a.abs() < PARALLEL_TOLERANCE {
            a = 0.0;
        }
        let b = 2.0f64.mul_add(pv * dv, -four_f * du);
        let c = pv.mul_add(pv, -four_f * pu);
        quadratic_roots(a, b, c)
            .into_iter()
            .filter(|t| t.is_finite() && *t > min_distance)
            .find_map(|t| {
                let v = dv.mul_add(t, pv);
                if v.abs() > self.half_aperture {
                    return None;
                }
                let local_normal = Vector2::new(1.0, -v / (2.0 * self.focal_length)).normalize();
                let normal = self.axis * local_normal.x + self.tangent * local_normal.y;
                Some(SurfaceHit::oriented(
                    t,
                    origin + direction * t,
                    normal,
                    direction,
                    v,
                ))
            })
    }
}
