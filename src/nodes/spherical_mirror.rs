#![warn(missing_docs)]
//! Spherical mirror
use std::{any::Any, f64::consts::PI};

use serde::{Deserialize, Serialize};

use super::{check_length, check_ratio, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    error::{LumosError, LumosResult},
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId},
    optics::reflect,
    ray::Ray,
    surface::{CircularArc, GeoSurface},
    utils::geom_transformation::Placement,
};

/// Parameters of a [`SphericalMirror`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphericalMirrorParams {
    /// radius of curvature. Positive values form a mirror concave toward the optical axis.
    pub radius_of_curvature: f64,
    /// chord diameter of the mirror
    pub diameter: f64,
    /// reflectivity (`0.0..=1.0`)
    pub reflectivity: f64,
}
impl Default for SphericalMirrorParams {
    fn default() -> Self {
        Self {
            radius_of_curvature: 200.0,
            diameter: 80.0,
            reflectivity: 0.99,
        }
    }
}

/// A spherical (circular in 2D) mirror.
///
/// The placement position is the vertex of the mirror. For a positive radius of curvature the center of curvature
/// lies at `vertex + R·axis`, so the mirror focuses light coming along the axis toward the vertex at `R/2`.
#[derive(Debug, Clone)]
pub struct SphericalMirror {
    attr: ComponentAttr,
    params: SphericalMirrorParams,
    arc: Option<CircularArc>,
}
impl Default for SphericalMirror {
    fn default() -> Self {
        let mut mirror = Self {
            attr: ComponentAttr::new("Spherical mirror", Placement::default()),
            params: SphericalMirrorParams::default(),
            arc: None,
        };
        mirror.update_geometry();
        mirror
    }
}
impl SphericalMirror {
    /// Creates a new [`SphericalMirror`] with the given radius of curvature and diameter.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn new(
        name: &str,
        placement: Placement,
        radius_of_curvature: f64,
        diameter: f64,
    ) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            SphericalMirrorParams {
                radius_of_curvature,
                diameter,
                ..SphericalMirrorParams::default()
            },
        )
    }
    /// Creates a [`SphericalMirror`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: SphericalMirrorParams) -> LumosResult<Self> {
        let mut mirror = Self {
            attr,
            ..Self::default()
        };
        mirror.set_shape(params.radius_of_curvature, params.diameter)?;
        mirror.set_reflectivity(params.reflectivity)?;
        Ok(mirror)
    }
    /// Returns the radius of curvature of this [`SphericalMirror`].
    #[must_use]
    pub const fn radius_of_curvature(&self) -> f64 {
        self.params.radius_of_curvature
    }
    /// Returns the diameter of this [`SphericalMirror`].
    #[must_use]
    pub const fn diameter(&self) -> f64 {
        self.params.diameter
    }
    /// Returns the focal length `R/2` of this [`SphericalMirror`].
    #[must_use]
    pub fn focal_length(&self) -> f64 {
        self.params.radius_of_curvature / 2.0
    }
    /// Sets radius of curvature and diameter of this [`SphericalMirror`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the radius is zero or not finite
    ///   - the diameter is <= 0.0 or not finite
    ///   - half of the diameter exceeds the absolute radius
    pub fn set_shape(&mut self, radius_of_curvature: f64, diameter: f64) -> LumosResult<Invalidation> {
        if radius_of_curvature == 0.0 || !radius_of_curvature.is_finite() {
            return Err(LumosError::Configuration(
                "radius of curvature must be !=0.0 and finite".into(),
            ));
        }
        check_length(diameter, "mirror diameter")?;
        if diameter / 2.0 > radius_of_curvature.abs() {
            return Err(LumosError::Configuration(
                "mirror diameter must not exceed twice the radius of curvature".into(),
            ));
        }
        self.params.radius_of_curvature = radius_of_curvature;
        self.params.diameter = diameter;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the reflectivity of this [`SphericalMirror`].
    #[must_use]
    pub const fn reflectivity(&self) -> f64 {
        self.params.reflectivity
    }
    /// Sets the reflectivity of this [`SphericalMirror`].
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
impl OpticalComponent for SphericalMirror {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::SphericalMirror
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::SphericalMirror(self.params.clone())
    }
    fn update_geometry(&mut self) {
        let placement = self.attr.placement();
        let radius = self.params.radius_of_curvature;
        let center = placement.position() + placement.normal() * radius;
        let axis = -placement.normal() * radius.signum();
        let half_angle = (self.params.diameter / 2.0 / radius.abs()).clamp(-1.0, 1.0).asin();
        self.arc = CircularArc::new(center, radius.abs(), axis, half_angle).ok();
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .arc
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        let face = if hit.normal.dot(&self.attr.placement().normal()) > 0.0 {
            0
        } else {
            1
        };
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

    fn facing_source(radius: f64) -> SphericalMirror {
        SphericalMirror::new(
            "sm",
            Placement::new(point![100.0, 0.0], degree!(180.0)).unwrap(),
            radius,
            40.0,
        )
        .unwrap()
    }
    fn reflect_ray(mirror: &mut SphericalMirror, mut ray: Ray) -> (Hit, Ray) {
        let hit = mirror.intersect(&ray, 1e-6).unwrap();
        ray.propagate(hit.distance, micrometer!(1.0)).unwrap();
        let child = mirror
            .interact(&ray, &hit, &RayTraceConfig::default())
            .unwrap()
            .children
            .remove(0);
        (hit, child)
    }
    #[test]
    fn default() {
        let m = SphericalMirror::default();
        assert_eq!(m.radius_of_curvature(), 200.0);
        assert_eq!(m.diameter(), 80.0);
        assert_eq!(m.focal_length(), 100.0);
        assert_eq!(m.reflectivity(), 0.99);
    }
    #[test]
    fn set_shape() {
        let mut m = SphericalMirror::default();
        assert!(m.set_shape(0.0, 10.0).is_err());
        assert!(m.set_shape(10.0, 0.0).is_err());
        assert!(m.set_shape(10.0, 21.0).is_err());
        assert!(m.set_shape(-10.0, 20.0).is_ok());
        assert!(m.set_reflectivity(2.0).is_err());
    }
    #[test]
    fn on_axis_retro_reflection() {
        let mut m = facing_source(200.0);
        let ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        let (hit, child) = reflect_ray(&mut m, ray);
        assert_abs_diff_eq!(hit.distance, 100.0, epsilon = 1e-9);
        assert_eq!(hit.surface, SurfaceId::Face(0));
        assert_abs_diff_eq!(child.direction(), vector![-1.0, 0.0], epsilon = 1e-12);
        assert_abs_diff_eq!(child.intensity(), 0.99, epsilon = 1e-12);
    }
    #[test]
    fn paraxial_focus() {
        // center of curvature at x = -100, focal point at x = 0
        let mut m = facing_source(200.0);
        let ray = Ray::new(point![0.0, 1.0], vector![1.0, 0.0], Wavelength::default(), 1.0).unwrap();
        let (hit, child) = reflect_ray(&mut m, ray);
        assert!(hit.distance < 100.0);
        let t = -child.position().y / child.direction().y;
        let crossing = child.position().x + t * child.direction().x;
        // spherical aberration shifts the crossing by about h²/(4R)
        assert_abs_diff_eq!(crossing, 0.0, epsilon = 1e-2);
        assert_abs_diff_eq!(
            vector![1.0, 0.0].dot(&hit.normal),
            -child.direction().dot(&hit.normal),
            epsilon = 1e-12
        );
    }
    #[test]
    fn convex_diverges() {
        let mut m = facing_source(-200.0);
        let ray = Ray::new(point![0.0, 1.0], vector![1.0, 0.0], Wavelength::default(), 1.0).unwrap();
        let (hit, child) = reflect_ray(&mut m, ray);
        assert!(hit.distance > 100.0);
        assert!(child.direction().y > 0.0);
    }
    #[test]
    fn outside_aperture() {
        let m = facing_source(200.0);
        let ray = Ray::new(point![0.0, 30.0], vector![1.0, 0.0], Wavelength::default(), 1.0).unwrap();
        assert!(m.intersect(&ray, 1e-6).is_none());
    }
}
