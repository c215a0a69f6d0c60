#![warn(missing_docs)]
//! Module for handling the 2D geometry of optical surfaces
//!
//! All primitives work in plain scene units. An intersection is only reported for distances strictly larger than a
//! given minimum distance along the ray. This excludes self-intersections at the emission point of a ray.
mod circle;
mod line_segment;
mod parabola;
mod polygon;

pub use circle::{Circle, CircularArc};
pub use line_segment::LineSegment;
pub use parabola::ParabolicArc;
pub use polygon::Polygon;

use nalgebra::{Point2, Vector2};
use roots::{find_roots_quadratic, Roots};

/// Default minimum hit distance (in scene units).
pub const EPSILON_DISTANCE: f64 = 1e-6;

/// Denominators smaller than this are treated as parallel / degenerate.
pub const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Result of a ray-surface intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// distance along the ray to the intersection point
    pub distance: f64,
    /// intersection point
    pub point: Point2<f64>,
    /// normalized surface normal oriented toward the incoming ray
    pub normal: Vector2<f64>,
    /// `true` if the ray hits the side the natural normal of the primitive points to
    pub front_side: bool,
    /// local coordinate of the hit along the surface (tangent coordinate or angle, depending on the primitive)
    pub param: f64,
    /// index of the hit facet (for primitives built from several facets)
    pub index: usize,
}
impl SurfaceHit {
    /// Creates a new [`SurfaceHit`] from the natural normal of the primitive. The normal is flipped toward the
    /// incoming ray if necessary.
    #[must_use]
    pub fn oriented(
        distance: f64,
        point: Point2<f64>,
        natural_normal: Vector2<f64>,
        direction: &Vector2<f64>,
        param: f64,
    ) -> Self {
        let front_side = natural_normal.dot(direction) <= 0.0;
        let normal = if front_side {
            natural_normal
        } else {
            -natural_normal
        };
        Self {
            distance,
            point,
            normal,
            front_side,
            param,
            index: 0,
        }
    }
    /// Returns the same hit with the given facet index.
    #[must_use]
    pub const fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }
}

/// Trait for the intersection of 2D geometric primitives with a ray
pub trait GeoSurface {
    /// Calculate the nearest intersection of the ray `origin + t·direction` with `t > min_distance`.
    ///
    /// `direction` must be normalized. This function returns `None` if there is no such intersection.
    fn intersect(
        &self,
        origin: &Point2<f64>,
        direction: &Vector2<f64>,
        min_distance: f64,
    ) -> Option<SurfaceHit>;
}

/// Real roots of `a·t² + b·t + c = 0` in ascending order. Missing roots are `NaN`.
fn quadratic_roots(a: f64, b: f64, c: f64) -> [f64; 2] {
    match find_roots_quadratic(a, b, c) {
        Roots::One([t]) => [t, f64::NAN],
        Roots::Two([t0, t1]) => [t0.min(t1), t0.max(t1)],
        _ => [f64::NAN, f64::NAN],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::{point, vector};
    #[test]
    fn oriented() {
        let hit = SurfaceHit::oriented(1.0, point![0.0, 0.0], vector![1.0, 0.0], &vector![-1.0, 0.0], 0.5);
        assert!(hit.front_side);
        assert_eq!(hit.normal, vector![1.0, 0.0]);
        let hit = SurfaceHit::oriented(1.0, point![0.0, 0.0], vector![1.0, 0.0], &vector![1.0, 0.0], 0.5);
        assert!(!hit.front_side);
        assert_eq!(hit.normal, vector![-1.0, 0.0]);
        assert_eq!(hit.with_index(3).index, 3);
    }
    #[test]
    fn roots() {
        assert_eq!(quadratic_roots(1.0, 0.0, -4.0), [-2.0, 2.0]);
        assert!(quadratic_roots(1.0, 0.0, 4.0)[0].is_nan());
        // linear case
        assert_eq!(quadratic_roots(0.0, 2.0, -4.0)[0], 2.0);
    }
}
