#![warn(missing_docs)]
//! Triangular dielectric prism
use std::any::Any;

use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

use super::{check_length, ComponentAttr, ComponentKind, ComponentParams, DielectricMaterial};
use crate::{
    analyzers::RayTraceConfig,
    degree,
    error::{LumosError, LumosResult},
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId},
    ray::Ray,
    surface::{GeoSurface, Polygon},
    utils::geom_transformation::Placement,
};

/// Parameters of a [`Prism`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrismParams {
    /// full angle at the apex
    pub apex_angle: Angle,
    /// length of the two legs enclosing the apex
    pub leg_length: f64,
    /// material of the prism
    pub material: DielectricMaterial,
}
impl Default for PrismParams {
    fn default() -> Self {
        Self {
            apex_angle: degree!(60.0),
            leg_length: 100.0,
            material: DielectricMaterial::default(),
        }
    }
}

/// An isosceles triangular prism.
///
/// The apex points along the optical axis of the placement, the centroid of the triangle lies at the placement
/// position. Edge 0 is the base, edges 1 and 2 are the legs.
#[derive(Debug, Clone)]
pub struct Prism {
    attr: ComponentAttr,
    params: PrismParams,
    body: Option<Polygon>,
}
impl Default for Prism {
    fn default() -> Self {
        let mut prism = Self {
            attr: ComponentAttr::new("Prism", Placement::default()),
            params: PrismParams::default(),
            body: None,
        };
        prism.update_geometry();
        prism
    }
}
impl Prism {
    /// Creates a new [`Prism`] of the default material.
    ///
    /// # Errors
    ///
    /// This function will return an error if the apex angle or the leg length are invalid.
    pub fn new(
        name: &str,
        placement: Placement,
        apex_angle: Angle,
        leg_length: f64,
    ) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            PrismParams {
                apex_angle,
                leg_length,
                material: DielectricMaterial::default(),
            },
        )
    }
    /// Creates a [`Prism`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: PrismParams) -> LumosResult<Self> {
        let mut prism = Self {
            attr,
            ..Self::default()
        };
        prism.set_shape(params.apex_angle, params.leg_length)?;
        prism.set_material(params.material)?;
        Ok(prism)
    }
    /// Returns the apex angle of this [`Prism`].
    #[must_use]
    pub const fn apex_angle(&self) -> Angle {
        self.params.apex_angle
    }
    /// Returns the leg length of this [`Prism`].
    #[must_use]
    pub const fn leg_length(&self) -> f64 {
        self.params.leg_length
    }
    /// Sets apex angle and leg length of this [`Prism`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the apex angle is not within `(0°, 180°)` or the leg length is <= 0.0
    /// or not finite.
    pub fn set_shape(&mut self, apex_angle: Angle, leg_length: f64) -> LumosResult<Invalidation> {
        if !apex_angle.is_finite() || apex_angle <= degree!(0.0) || apex_angle >= degree!(180.0) {
            return Err(LumosError::Configuration(
                "apex angle must be within (0°, 180°)".into(),
            ));
        }
        check_length(leg_length, "leg length")?;
        self.params.apex_angle = apex_angle;
        self.params.leg_length = leg_length;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the material of this [`Prism`].
    #[must_use]
    pub const fn material(&self) -> &DielectricMaterial {
        &self.params.material
    }
    /// Sets the material of this [`Prism`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the material parameters are invalid.
    pub fn set_material(&mut self, material: DielectricMaterial) -> LumosResult<Invalidation> {
        material.validate()?;
        self.params.material = material;
        Ok(Invalidation::Optics)
    }
}
impl OpticalComponent for Prism {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::Prism
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::Prism(self.params.clone())
    }
    fn update_geometry(&mut self) {
        let placement = self.attr.placement();
        let (sin, cos) = (self.params.apex_angle.get::<radian>() / 2.0).sin_cos();
        let length = self.params.leg_length;
        let apex_u = 2.0 / 3.0 * length * cos;
        let base_u = -length * cos / 3.0;
        self.body = Polygon::new(vec![
            placement.to_global(base_u, length * sin),
            placement.to_global(base_u, -length * sin),
            placement.to_global(apex_u, 0.0),
        ])
        .ok();
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .body
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        let index = hit.index;
        Some(Hit::from_surface(hit, SurfaceId::Edge(index)))
    }
    fn interact(
        &mut self,
        ray: &Ray,
        hit: &Hit,
        config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        self.params
            .material
            .interact(ray, hit, hit.front_side, config)
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
    use crate::{micrometer, nanometer, ray::Wavelength};
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};

    /// Trace a ray through the prism following the transmitted children only.
    fn transmit(prism: &mut Prism, mut ray: Ray) -> Ray {
        for _ in 0..2 {
            let hit = prism.intersect(&ray, 1e-6).unwrap();
            ray.propagate(hit.distance, micrometer!(1.0)).unwrap();
            ray = prism
                .interact(&ray, &hit, &RayTraceConfig::default())
                .unwrap()
                .children
                .pop()
                .unwrap();
        }
        ray
    }
    #[test]
    fn default() {
        let p = Prism::default();
        assert_eq!(p.apex_angle(), degree!(60.0));
        assert_eq!(p.leg_length(), 100.0);
    }
    #[test]
    fn set_shape() {
        let mut p = Prism::default();
        assert!(p.set_shape(degree!(0.0), 10.0).is_err());
        assert!(p.set_shape(degree!(180.0), 10.0).is_err());
        assert!(p.set_shape(degree!(30.0), 0.0).is_err());
        assert!(p.set_shape(degree!(30.0), 10.0).is_ok());
    }
    #[test]
    fn deviation_toward_base() {
        // apex points to +y, light travels along +x through the legs
        let mut p = Prism::new(
            "prism",
            Placement::new(point![100.0, 0.0], degree!(90.0)).unwrap(),
            degree!(60.0),
            40.0,
        )
        .unwrap();
        let ray = Ray::new(point![0.0, 0.0], vector![1.0, 0.0], Wavelength::default(), 1.0).unwrap();
        let out = transmit(&mut p, ray);
        assert!(out.direction().y < 0.0);
        assert_abs_diff_eq!(out.refractive_index(), 1.0, epsilon = 1e-12);
    }
    #[test]
    fn dispersion() {
        let mut p = Prism::new(
            "prism",
            Placement::new(point![100.0, 0.0], degree!(90.0)).unwrap(),
            degree!(60.0),
            40.0,
        )
        .unwrap();
        let blue = Ray::new(
            point![0.0, 0.0],
            vector![1.0, 0.0],
            Wavelength::new(nanometer!(450.0)).unwrap(),
            1.0,
        )
        .unwrap();
        let red = Ray::new(
            point![0.0, 0.0],
            vector![1.0, 0.0],
            Wavelength::new(nanometer!(650.0)).unwrap(),
            1.0,
        )
        .unwrap();
        let blue = transmit(&mut p, blue);
        let red = transmit(&mut p, red);
        // blue light is deviated more strongly
        assert!(blue.direction().y < red.direction().y);
    }
}
