#![warn(missing_docs)]
//! Parabolic mirror
use std::{any::Any, f64::consts::PI};

use serde::{Deserialize, Serialize};

use super::{check_length, check_ratio, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    error::LumosResult,
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId},
    optics::reflect,
    ray::Ray,
    surface::{GeoSurface, ParabolicArc},
    utils::geom_transformation::Placement,
};

/// Parameters of a [`ParabolicMirror`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParabolicMirrorParams {
    /// focal length
    pub focal_length: f64,
    /// aperture of the mirror perpendicular to its axis
    pub diameter: f64,
    /// reflectivity (`0.0..=1.0`)
    pub reflectivity: f64,
}
impl Default for ParabolicMirrorParams {
    fn default() -> Self {
        Self {
            focal_length: 100.0,
            diameter: 80.0,
            reflectivity: 0.99,
        }
    }
}

/// A parabolic mirror focusing light parallel to its axis into a single point without spherical aberration.
///
/// The placement position is the vertex, the focal point lies at `vertex + f·axis`.
#[derive(Debug, Clone)]
pub struct ParabolicMirror {
    attr: ComponentAttr,
    params: ParabolicMirrorParams,
    arc: Option<ParabolicArc>,
}
impl Default for ParabolicMirror {
    fn default() -> Self {
        let mut mirror = Self {
            attr: ComponentAttr::new("Parabolic mirror", Placement::default()),
            params: ParabolicMirrorParams::default(),
            arc: None,
        };
        mirror.update_geometry();
        mirror
    }
}
impl ParabolicMirror {
    /// Creates a new [`ParabolicMirror`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the focal length or the diameter are invalid.
    pub fn new(
        name: &str,
        placement: Placement,
        focal_length: f64,
        diameter: f64,
    ) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            ParabolicMirrorParams {
                focal_length,
                diameter,
                ..ParabolicMirrorParams::default()
            },
        )
    }
    /// Creates a [`ParabolicMirror`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: ParabolicMirrorParams) -> LumosResult<Self> {
        let mut mirror = Self {
            attr,
            ..Self::default()
        };
        mirror.set_focal_length(params.focal_length)?;
        mirror.set_diameter(params.diameter)?;
        mirror.set_reflectivity(params.reflectivity)?;
        Ok(mirror)
    }
    /// Returns the focal length of this [`ParabolicMirror`].
    #[must_use]
    pub const fn focal_length(&self) -> f64 {
        self.params.focal_length
    }
    /// Sets the focal length of this [`ParabolicMirror`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the focal length is <= 0.0 or not finite.
    pub fn set_focal_length(&mut self, focal_length: f64) -> LumosResult<Invalidation> {
        check_length(focal_length, "focal length")?;
        self.params.focal_length = focal_length;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the diameter of this [`ParabolicMirror`].
    #[must_use]
    pub const fn diameter(&self) -> f64 {
        self.params.diameter
    }
    /// Sets the diameter of this [`ParabolicMirror`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the diameter is <= 0.0 or not finite.
    pub fn set_diameter(&mut self, diameter: f64) -> LumosResult<Invalidation> {
        check_length(diameter, "mirror diameter")?;
        self.params.diameter = diameter;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the reflectivity of this [`ParabolicMirror`].
    #[must_use]
    pub const fn reflectivity(&self) -> f64 {
        self.params.reflectivity
    }
    /// Sets the reflectivity of this [`ParabolicMirror`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the reflectivity is outside the range `0.0..=1.0`.
    pub fn set_reflectivity(&mut self, reflectivity: f64) -> LumosResult<Invalidation> {
        check_ratio(reflectivity, "reflectivity")?;
        self.params.reflectivity = reflectivity;
        Ok(Invalidation::Optics)
    }
}
impl OpticalComponent for ParabolicMirror {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::ParabolicMirror
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::ParabolicMirror(self.params.clone())
    }
    fn update_geometry(&mut self) {
        let placement = self.attr.placement();
        self.arc = ParabolicArc::new(
            placement.position(),
            placement.normal(),
            self.params.focal_length,
            self.params.diameter,
        )
        .ok();
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .arc
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        let face = if hit.front_side { 0 } else { 1 };
        Some(Hit::from_surface(hit, SurfaceId::Face(face)))
    }
    fn interact(
        &mut self,
        ray: &Ray,
        hit: &Hit,
        _config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        let mut reflected = ray.child(reflect(&ray.direction(), &hit.normal))?;
        reflected.scale_intensity(self.params.reflectivity)?;
        reflected.add_phase(PI);
        Ok(Interaction::children(vec![reflected]))
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
