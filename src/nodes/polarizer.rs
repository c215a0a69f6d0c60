#![warn(missing_docs)]
//! Ideal linear polarizer
use std::any::Any;

use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

use super::{centered_segment, check_length, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    degree,
    error::{LumosError, LumosResult},
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId, Termination},
    optics::JonesMatrix,
    ray::Ray,
    surface::{GeoSurface, LineSegment},
    utils::geom_transformation::Placement,
};

/// Parameters of a [`Polarizer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarizerParams {
    /// length of the polarizer
    pub length: f64,
    /// angle of the transmission axis
    pub transmission_axis: Angle,
}
impl Default for PolarizerParams {
    fn default() -> Self {
        Self {
            length: 50.0,
            transmission_axis: degree!(0.0),
        }
    }
}

/// An ideal linear polarizer.
///
/// The Jones vector of an incoming ray is projected onto the transmission axis. Linear light at `θ` is
/// transmitted with `cos²(θ − θₐ)`, unpolarized light with one half. A fully blocked ray is absorbed.
#[derive(Debug, Clone)]
pub struct Polarizer {
    attr: ComponentAttr,
    params: PolarizerParams,
    segment: Option<LineSegment>,
}
impl Default for Polarizer {
    fn default() -> Self {
        let mut polarizer = Self {
            attr: ComponentAttr::new("Polarizer", Placement::default()),
            params: PolarizerParams::default(),
            segment: None,
        };
        polarizer.update_geometry();
        polarizer
    }
}
impl Polarizer {
    /// Creates a new [`Polarizer`] with the given transmission axis.
    ///
    /// # Errors
    ///
    /// This function will return an error if the axis angle is not finite.
    pub fn new(name: &str, placement: Placement, transmission_axis: Angle) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            PolarizerParams {
                transmission_axis,
                ..PolarizerParams::default()
            },
        )
    }
    /// Creates a [`Polarizer`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: PolarizerParams) -> LumosResult<Self> {
        let mut polarizer = Self {
            attr,
            ..Self::default()
        };
        polarizer.set_length(params.length)?;
        polarizer.set_transmission_axis(params.transmission_axis)?;
        Ok(polarizer)
    }
    /// Sets the length of this [`Polarizer`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is <= 0.0 or not finite.
    pub fn set_length(&mut self, length: f64) -> LumosResult<Invalidation> {
        check_length(length, "polarizer length")?;
        self.params.length = length;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the transmission axis of this [`Polarizer`].
    #[must_use]
    pub const fn transmission_axis(&self) -> Angle {
        self.params.transmission_axis
    }
    /// Sets the transmission axis of this [`Polarizer`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the angle is not finite.
    pub fn set_transmission_axis(&mut self, transmission_axis: Angle) -> LumosResult<Invalidation> {
        if !transmission_axis.is_finite() {
            return Err(LumosError::Configuration(
                "transmission axis must be finite".into(),
            ));
        }
        self.params.transmission_axis = transmission_axis;
        Ok(Invalidation::Optics)
    }
}
impl OpticalComponent for Polarizer {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::Polarizer
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::Polarizer(self.params.clone())
    }
    fn update_geometry(&mut self) {
        self.segment = centered_segment(&self.attr.placement(), self.params.length);
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .segment
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        let face = if hit.front_side { 0 } else { 1 };
        Some(Hit::from_surface(hit, SurfaceId::Face(face)))
    }
    fn interact(
        &mut self,
        ray: &Ray,
        _hit: &Hit,
        _config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        let matrix = JonesMatrix::linear_polarizer(self.params.transmission_axis.get::<radian>());
        let (polarization, transmission) = ray.polarization().transform(&matrix);
        if transmission <= 0.0 {
            return Ok(Interaction::terminated(Termination::Absorbed));
        }
        let mut transmitted = ray.child(ray.direction())?;
        transmitted.scale_intensity(transmission.min(1.0))?;
        transmitted.set_polarization(polarization);
        Ok(Interaction::children(vec![transmitted]))
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
