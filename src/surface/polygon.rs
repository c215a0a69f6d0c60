//! Closed convex polygon
use itertools::Itertools;
use nalgebra::{Point2, Vector2};

use super::{GeoSurface, LineSegment, SurfaceHit};
use crate::{
    error::{LumosError, LumosResult},
    utils::math_utils::usize_to_f64,
};

/// A closed polygon built from line segments. The natural normals of all edges point outward.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2<f64>>,
    edges: Vec<LineSegment>,
    outward: Vec<bool>,
}
impl Polygon {
    /// Creates a new [`Polygon`] from its vertices.
    ///
    /// # Errors
    ///
    /// This function will return an error if less than three vertices are given or two consecutive vertices coincide.
    pub fn new(vertices: Vec<Point2<f64>>) -> LumosResult<Self> {
        if vertices.len() < 3 {
            return Err(LumosError::Geometry(
                "a polygon needs at least three vertices".into(),
            ));
        }
        let centroid = Self::centroid_of(&vertices);
        let mut edges = Vec::with_capacity(vertices.len());
        let mut outward = Vec::with_capacity(vertices.len());
        for (start, end) in vertices.iter().circular_tuple_windows() {
            let edge = LineSegment::new(*start, *end)?;
            let mid = start + (end - start) * 0.5;
            outward.push(edge.normal().dot(&(mid - centroid)) >= 0.0);
            edges.push(edge);
        }
        Ok(Self {
            vertices,
            edges,
            outward,
        })
    }
    fn centroid_of(vertices: &[Point2<f64>]) -> Point2<f64> {
        let sum = vertices
            .iter()
            .fold(Vector2::zeros(), |acc, v| acc + v.coords);
        Point2::from(sum / usize_to_f64(vertices.len()))
    }
    /// Returns the vertices of this [`Polygon`].
    #[must_use]
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }
    /// Returns the centroid (mean of the vertices) of this [`Polygon`].
    #[must_use]
    pub fn centroid(&self) -> Point2<f64> {
        Self::centroid_of(&self.vertices)
    }
    /// Returns the outward pointing (normalized) normal of the edge with the given index.
    #[must_use]
    pub fn outward_normal(&self, index: usize) -> Option<Vector2<f64>> {
        let edge = self.edges.get(index)?;
        let outward = self.outward.get(index)?;
        Some(if *outward { edge.normal() } else { -edge.normal() })
    }
}
impl GeoSurface for Polygon {
    /// The index of the hit is the index of the edge starting at the vertex with the same index. `front_side` is
    /// `true` if the ray enters the polygon.
    fn intersect(
        &self,
        origin: &Point2<f64>,
        direction: &Vector2<f64>,
        min_distance: f64,
    ) -> Option<SurfaceHit> {
        self.edges
            .iter()
            .zip(self.outward.iter())
            .enumerate()
            .filter_map(|(index, (edge, outward))| {
                edge.intersect(origin, direction, min_distance).map(|hit| {
                    let hit = hit.with_index(index);
                    if *outward {
                        hit
                    } else {
                        SurfaceHit {
                            front_side: !hit.front_side,
                            param: -hit.param,
                            ..hit
                        }
                    }
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
