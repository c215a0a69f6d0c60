#![warn(missing_docs)]
//! Flat mirror
use std::{any::Any, f64::consts::PI};

use serde::{Deserialize, Serialize};

use super::{centered_segment, check_length, check_ratio, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    error::LumosResult,
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId},
    optics::reflect,
    ray::Ray,
    surface::{GeoSurface, LineSegment},
    utils::geom_transformation::Placement,
};

/// Parameters of a [`Mirror`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorParams {
    /// length of the mirror surface
    pub length: f64,
    /// reflectivity (`0.0..=1.0`)
    pub reflectivity: f64,
}
impl Default for MirrorParams {
    fn default() -> Self {
        Self {
            length: 100.0,
            reflectivity: 0.99,
        }
    }
}

/// A flat, two-sided mirror.
///
/// The reflected ray carries the reflected fraction of the intensity and an additional phase shift of π. The
/// remaining intensity is absorbed.
///
/// ## Parameters
///   - `length`: length of the mirror (default: 100)
///   - `reflectivity`: reflectivity of both sides (default: 0.99)
#[derive(Debug, Clone)]
pub struct Mirror {
    attr: ComponentAttr,
    params: MirrorParams,
    segment: Option<LineSegment>,
}
impl Default for Mirror {
    fn default() -> Self {
        let mut mirror = Self {
            attr: ComponentAttr::new("Mirror", Placement::default()),
            params: MirrorParams::default(),
            segment: None,
        };
        mirror.update_geometry();
        mirror
    }
}
impl Mirror {
    /// Creates a new [`Mirror`] with default parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the geometry cannot be constructed.
    pub fn new(name: &str, placement: Placement) -> LumosResult<Self> {
        Self::from_params(ComponentAttr::new(name, placement), MirrorParams::default())
    }
    /// Creates a [`Mirror`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: MirrorParams) -> LumosResult<Self> {
        let mut mirror = Self {
            attr,
            ..Self::default()
        };
        mirror.set_length(params.length)?;
        mirror.set_reflectivity(params.reflectivity)?;
        mirror.update_geometry();
        Ok(mirror)
    }
    /// Returns the length of this [`Mirror`].
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.params.length
    }
    /// Sets the length of this [`Mirror`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is <= 0.0 or not finite.
    pub fn set_length(&mut self, length: f64) -> LumosResult<Invalidation> {
        check_length(length, "mirror length")?;
        self.params.length = length;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the reflectivity of this [`Mirror`].
    #[must_use]
    pub const fn reflectivity(&self) -> f64 {
        self.params.reflectivity
    }
    /// Sets the reflectivity of this [`Mirror`].
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
impl OpticalComponent for Mirror {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::Mirror
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::Mirror(self.params.clone())
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::{degree, micrometer, ray::Wavelength};
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};
    #[test]
    fn default() {
        let m = Mirror::default();
        assert_eq!(m.name(), "Mirror");
        assert_eq!(m.length(), 100.0);
        assert_eq!(m.reflectivity(), 0.99);
        assert_eq!(m.kind(), ComponentKind::Mirror);
    }
    #[test]
    fn setters() {
        let mut m = Mirror::default();
        assert!(m.set_length(0.0).is_err());
        assert!(m.set_length(f64::NAN).is_err());
        assert!(m.set_reflectivity(1.1).is_err());
        assert!(m.set_reflectivity(-0.1).is_err());
        assert_eq!(m.set_length(50.0).unwrap(), Invalidation::Geometry);
        assert_eq!(m.set_reflectivity(0.5).unwrap(), Invalidation::Optics);
    }
    #[test]
    fn reflect_normal() {
        let mut m = Mirror::new("m", Placement::new(point![100.0, 0.0], degree!(180.0)).unwrap()).unwrap();
        let ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        let hit = m.intersect(&ray, 1e-6).unwrap();
        assert_abs_diff_eq!(hit.distance, 100.0, epsilon = 1e-9);
        assert_eq!(hit.surface, SurfaceId::Face(0));
        let mut ray = ray;
        ray.propagate(hit.distance, micrometer!(1.0)).unwrap();
        let interaction = m.interact(&ray, &hit, &RayTraceConfig::default()).unwrap();
        assert_eq!(interaction.children.len(), 1);
        let child = &interaction.children[0];
        assert_abs_diff_eq!(child.direction().x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(child.intensity(), 0.99, epsilon = 1e-12);
        assert_abs_diff_eq!(child.phase() - ray.phase(), PI, epsilon = 1e-9);
        assert_eq!(child.number_of_bounces(), 1);
    }
    #[test]
    fn reflect_angle_law() {
        let mut m = Mirror::new("m", Placement::new(point![10.0, 0.0], degree!(135.0)).unwrap()).unwrap();
        let mut ray = Ray::new(point![0.0, 0.0], vector![1.0, 0.2], Wavelength::default(), 1.0).unwrap();
        let hit = m.intersect(&ray, 1e-6).unwrap();
        ray.propagate(hit.distance, micrometer!(1.0)).unwrap();
        let child = m
            .interact(&ray, &hit, &RayTraceConfig::default())
            .unwrap()
            .children
            .remove(0);
        assert_abs_diff_eq!(
            ray.direction().dot(&hit.normal),
            -child.direction().dot(&hit.normal),
            epsilon = 1e-12
        );
    }
    #[test]
    fn back_side() {
        let m = Mirror::new("m", Placement::new(point![100.0, 0.0], degree!(0.0)).unwrap()).unwrap();
        let ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        let hit = m.intersect(&ray, 1e-6).unwrap();
        assert_eq!(hit.surface, SurfaceId::Face(1));
        assert_abs_diff_eq!(hit.normal.x, -1.0, epsilon = 1e-12);
    }
    #[test]
    fn miss() {
        let m = Mirror::new("m", Placement::new(point![100.0, 60.0], degree!(180.0)).unwrap()).unwrap();
        let ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        assert!(m.intersect(&ray, 1e-6).is_none());
    }
}
