#![warn(missing_docs)]
//! Contains the basic trait representing an optical component of the scene
use std::{any::Any, fmt::Debug};

use log::warn;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use uom::si::f64::Angle;
use uuid::Uuid;

use crate::{
    analyzers::RayTraceConfig,
    error::LumosResult,
    nodes::{ComponentAttr, ComponentConfig, ComponentKind, ComponentParams},
    ray::Ray,
    surface::SurfaceHit,
    utils::geom_transformation::Placement,
};

/// Component-local identifier of the surface that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceId {
    /// one of the faces of a thin element (0: front, 1: back)
    Face(usize),
    /// edge of a polygonal body
    Edge(usize),
    /// clear opening (e.g. slit) with the given index
    Opening(usize),
    /// opaque part of an aperture
    Blocker,
    /// input facet of a fiber
    InputFacet,
    /// active area of a detector
    ActiveArea,
}

/// Intersection of a [`Ray`] with an [`OpticalComponent`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// distance from the ray origin
    pub distance: f64,
    /// intersection point
    pub point: Point2<f64>,
    /// normalized surface normal oriented toward the incoming ray
    pub normal: Vector2<f64>,
    /// `true` if the natural front side of the surface was hit
    pub front_side: bool,
    /// local coordinate along the surface
    pub param: f64,
    /// identifier of the hit surface
    pub surface: SurfaceId,
}
impl Hit {
    /// Creates a [`Hit`] from the intersection with a geometric primitive.
    #[must_use]
    pub const fn from_surface(hit: SurfaceHit, surface: SurfaceId) -> Self {
        Self {
            distance: hit.distance,
            point: hit.point,
            normal: hit.normal,
            front_side: hit.front_side,
            param: hit.param,
            surface,
        }
    }
    /// Cosine of the angle between the ray direction and the (reversed) hit normal.
    #[must_use]
    pub fn cos_incidence(&self, ray: &Ray) -> f64 {
        -ray.direction().dot(&self.normal)
    }
}

/// Reason why the propagation of a ray ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// the ray left the scene without hitting a component
    Escaped,
    /// the ray interacted with a component which emitted zero or more child rays
    Interacted,
    /// the ray was absorbed (blocked) by a component
    Absorbed,
    /// the ray was absorbed by a detector
    Detected,
    /// the intensity of the ray fell below the configured threshold
    BelowThreshold,
    /// the configured maximum number of bounces was reached
    MaxBounces,
    /// the maximum number of rays of a trace pass was reached
    RayBudgetExhausted,
    /// the ray was aborted due to invalid geometry or numerical problems
    InvalidGeometry(String),
    /// the hit component has no interaction defined
    Unhandled(String),
}

/// Result of the interaction of a ray with a component.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// how the incoming ray ended
    pub termination: Termination,
    /// newly created rays
    pub children: Vec<Ray>,
}
impl Interaction {
    /// Interaction producing the given child rays.
    #[must_use]
    pub const fn children(children: Vec<Ray>) -> Self {
        Self {
            termination: Termination::Interacted,
            children,
        }
    }
    /// Interaction without any child rays.
    #[must_use]
    pub const fn terminated(termination: Termination) -> Self {
        Self {
            termination,
            children: Vec::new(),
        }
    }
}

/// Signal returned by mutating calls telling the caller which kind of recalculation is necessary.
///
/// Both variants invalidate all accumulated detector data. The caller should start a new trace pass.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// the geometry (position, orientation, size) changed
    Geometry,
    /// only optical parameters changed
    Optics,
}

/// Readout of a detector after a trace pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DetectorReadout {
    /// spatially resolved screen data
    Screen {
        /// coherent intensity `|Σ amplitude|²` per bin
        coherent: Vec<f64>,
        /// coherent intensity normalized to the running maximum
        normalized: Vec<f64>,
        /// incoherent intensity sum per bin
        incoherent: Vec<f64>,
        /// number of rays per bin
        hits: Vec<usize>,
        /// running maximum of the coherent intensity
        max: f64,
    },
    /// integrated power of a photodiode
    Photodiode {
        /// summed intensity of all absorbed rays
        power: f64,
        /// number of absorbed rays
        hits: usize,
    },
}

/// This is the basic trait that must be implemented by all concrete optical components.
pub trait OpticalComponent: Debug {
    /// Get the [`ComponentAttr`] (common attributes) of this component.
    fn attr(&self) -> &ComponentAttr;
    /// Get the mutable [`ComponentAttr`] of this component.
    ///
    /// **Note**: Changing the placement through this reference does not update the geometry cache. Use
    /// [`OpticalComponent::set_placement`] instead.
    fn attr_mut(&mut self) -> &mut ComponentAttr;
    /// Return the kind of this component.
    fn kind(&self) -> ComponentKind;
    /// Return a snapshot of the kind specific parameters.
    fn params(&self) -> ComponentParams;
    /// Recalculate the geometry cache after a change of placement or shape parameters.
    fn update_geometry(&mut self);
    /// Calculate the nearest intersection of the given ray with this component at a distance larger than
    /// `min_distance`.
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit>;
    /// Calculate the interaction of a ray with this component at the given hit.
    ///
    /// The default implementation terminates the ray with [`Termination::Unhandled`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the interaction cannot be calculated (e.g. due to invalid geometry).
    /// Only the affected ray is aborted.
    fn interact(
        &mut self,
        _ray: &Ray,
        _hit: &Hit,
        _config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        warn!("{}: No interaction defined.", self.kind());
        Ok(Interaction::terminated(Termination::Unhandled(format!(
            "no interaction defined for {}",
            self.kind()
        ))))
    }
    /// Reset accumulated data (detectors).
    fn reset(&mut self) {}
    /// Return the readout of a detector.
    fn readout(&self) -> Option<DetectorReadout> {
        None
    }
    /// Return configuration warnings (e.g. a detector with zero extent).
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }
    /// Return the component as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
    /// Return the component as mutable [`Any`] for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Return the configuration snapshot of this component.
    fn config(&self) -> ComponentConfig {
        ComponentConfig::new(self.attr().clone(), self.params())
    }
    /// Get the name of this component
    fn name(&self) -> String {
        self.attr().name()
    }
    /// Get the id of this component
    fn uuid(&self) -> Uuid {
        self.attr().uuid()
    }
    /// Return the [`Placement`] of this component.
    fn placement(&self) -> Placement {
        self.attr().placement()
    }
    /// Set the [`Placement`] of this component and update the geometry cache.
    fn set_placement(&mut self, placement: Placement) -> Invalidation {
        self.attr_mut().set_placement(placement);
        self.update_geometry();
        self.reset();
        Invalidation::Geometry
    }
    /// Set the position of this component.
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite.
    fn set_position(&mut self, position: Point2<f64>) -> LumosResult<Invalidation> {
        let mut placement = self.placement();
        placement.set_position(position)?;
        Ok(self.set_placement(placement))
    }
    /// Set the orientation of this component.
    ///
    /// # Errors
    ///
    /// This function will return an error if the angle is not finite.
    fn set_angle(&mut self, angle: Angle) -> LumosResult<Invalidation> {
        let mut placement = self.placement();
        placement.set_angle(angle)?;
        Ok(self.set_placement(placement))
    }
}
