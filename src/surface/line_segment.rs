//! Straight line segment
use nalgebra::{Point2, Vector2};

use super::{GeoSurface, SurfaceHit, PARALLEL_TOLERANCE};
use crate::{
    error::{LumosError, LumosResult},
    utils::math_utils::{cross_2d, is_finite_vector},
};

/// A straight line segment between two points.
///
/// The natural normal points to the right of the direction `start → end`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    start: Point2<f64>,
    end: Point2<f64>,
}
impl LineSegment {
    /// Creates a new [`LineSegment`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the points are not finite or identical.
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> LumosResult<Self> {
        if !is_finite_vector(&start.coords) || !is_finite_vector(&end.coords) {
            return Err(LumosError::Geometry(
                "end points of a line segment must be finite".into(),
            ));
        }
        if (end - start).norm() < PARALLEL_TOLERANCE {
            return Err(LumosError::Geometry(
                "line segment must have a non-zero length".into(),
            ));
        }
        Ok(Self { start, end })
    }
    /// Creates a new [`LineSegment`] centered at `center`, extending by `length/2` to both sides along `tangent`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is <= 0.0, the tangent is degenerate or the values are not finite.
    pub fn centered(center: Point2<f64>, tangent: Vector2<f64>, length: f64) -> LumosResult<Self> {
        if length <= 0.0 || !length.is_finite() {
            return Err(LumosError::Geometry(
                "length of a line segment must be >0.0 and finite".into(),
            ));
        }
        let norm = tangent.norm();
        if norm < PARALLEL_TOLERANCE || !norm.is_finite() {
            return Err(LumosError::Geometry("tangent must not be degenerate".into()));
        }
        let half = tangent * (0.5 * length / norm);
        Self::new(center - half, center + half)
    }
    /// Returns the start point of this [`LineSegment`].
    #[must_use]
    pub const fn start(&self) -> Point2<f64> {
        self.start
    }
    /// Returns the end point of this [`LineSegment`].
    #[must_use]
    pub const fn end(&self) -> Point2<f64> {
        self.end
    }
    /// Returns the length of this [`LineSegment`].
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
    /// Returns the natural (normalized) normal of this [`LineSegment`].
    #[must_use]
    pub fn normal(&self) -> Vector2<f64> {
        let e = (self.end - self.start).normalize();
        Vector2::new(e.y, -e.x)
    }
}
impl GeoSurface for LineSegment {
    /// The parameter of the hit is the signed distance from the center of the segment toward `end`.
    fn intersect(
        &self,
        origin: &Point2<f64>,
        direction: &Vector2<f64>,
        min_distance: f64,
    ) -> Option<SurfaceHit> {
        let edge = self.end - self.start;
        let denom = cross_2d(direction, &edge);
        if denom.abs() < PARALLEL_TOLERANCE {
            return None;
        }
        let w = self.start - origin;
        let t = cross_2d(&w, &edge) / denom;
        let s = cross_2d(&w, direction) / denom;
        if !t.is_finite() || t <= min_distance || !(0.0..=1.0).contains(&s) {
            return None;
        }
        let length = edge.norm();
        Some(SurfaceHit::oriented(
            t,
            origin + direction * t,
            self.normal(),
            direction,
            (s - 0.5) * length,
        ))
    }
}
