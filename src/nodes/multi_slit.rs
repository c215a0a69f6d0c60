#![warn(missing_docs)]
//! Multi-slit aperture
use std::any::Any;

use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

use super::{centered_segment, check_length, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    degree,
    error::{LumosError, LumosResult},
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId, Termination},
    ray::Ray,
    surface::{GeoSurface, LineSegment},
    utils::{
        geom_transformation::Placement,
        math_utils::{f64_to_usize, rotate_2d, usize_to_f64},
    },
};

/// Parameters of a [`MultiSlit`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSlitParams {
    /// total length of the aperture
    pub length: f64,
    /// number of slits
    pub slit_count: usize,
    /// width of each slit
    pub slit_width: f64,
    /// center to center distance of neighboring slits
    pub slit_separation: f64,
    /// number of secondary rays emitted from each opening (0: geometric pass-through)
    pub diffraction_rays: usize,
    /// half angle of the fan of secondary rays
    pub diffraction_spread: Angle,
}
impl Default for MultiSlitParams {
    fn default() -> Self {
        Self {
            length: 100.0,
            slit_count: 2,
            slit_width: 2.0,
            slit_separation: 20.0,
            diffraction_rays: 0,
            diffraction_spread: degree!(30.0),
        }
    }
}

/// An opaque screen with a number of equally spaced slits, placed symmetrically around its center.
///
/// Rays hitting the opaque part are absorbed. By default rays pass the openings without deviation. If
/// `diffraction_rays` is non-zero each opening acts as a secondary source emitting a fan of coherent rays, so the
/// diffraction pattern emerges from the coherent accumulation in a downstream [`Screen`](super::Screen).
#[derive(Debug, Clone)]
pub struct MultiSlit {
    attr: ComponentAttr,
    params: MultiSlitParams,
    segment: Option<LineSegment>,
}
impl Default for MultiSlit {
    fn default() -> Self {
        let mut slit = Self {
            attr: ComponentAttr::new("Multi slit", Placement::default()),
            params: MultiSlitParams::default(),
            segment: None,
        };
        slit.update_geometry();
        slit
    }
}
impl MultiSlit {
    /// Creates a new [`MultiSlit`] with the given slit configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if the slit configuration is invalid.
    pub fn new(
        name: &str,
        placement: Placement,
        slit_count: usize,
        slit_width: f64,
        slit_separation: f64,
    ) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            MultiSlitParams {
                slit_count,
                slit_width,
                slit_separation,
                ..MultiSlitParams::default()
            },
        )
    }
    /// Creates a [`MultiSlit`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: MultiSlitParams) -> LumosResult<Self> {
        let mut slit = Self {
            attr,
            ..Self::default()
        };
        slit.set_slits(
            params.length,
            params.slit_count,
            params.slit_width,
            params.slit_separation,
        )?;
        slit.set_diffraction(params.diffraction_rays, params.diffraction_spread)?;
        Ok(slit)
    }
    /// Returns the number of slits.
    #[must_use]
    pub const fn slit_count(&self) -> usize {
        self.params.slit_count
    }
    /// Returns the width of the slits.
    #[must_use]
    pub const fn slit_width(&self) -> f64 {
        self.params.slit_width
    }
    /// Returns the center to center distance of the slits.
    #[must_use]
    pub const fn slit_separation(&self) -> f64 {
        self.params.slit_separation
    }
    /// Sets the aperture length and the slit configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - a length or width is <= 0.0 or not finite
    ///   - the slit count is zero
    ///   - neighboring slits overlap
    ///   - the slits do not fit into the aperture
    pub fn set_slits(
        &mut self,
        length: f64,
        slit_count: usize,
        slit_width: f64,
        slit_separation: f64,
    ) -> LumosResult<Invalidation> {
        check_length(length, "aperture length")?;
        check_length(slit_width, "slit width")?;
        if slit_count == 0 {
            return Err(LumosError::Configuration(
                "number of slits must be >0".into(),
            ));
        }
        if slit_count > 1 {
            check_length(slit_separation, "slit separation")?;
            if slit_separation <= slit_width {
                return Err(LumosError::Configuration(
                    "slit separation must be larger than the slit width".into(),
                ));
            }
        }
        let extent = usize_to_f64(slit_count - 1).mul_add(slit_separation, slit_width);
        if (slit_count > 1 && extent > length) || slit_width > length {
            return Err(LumosError::Configuration(
                "slits do not fit into the aperture".into(),
            ));
        }
        self.params.length = length;
        self.params.slit_count = slit_count;
        self.params.slit_width = slit_width;
        self.params.slit_separation = slit_separation;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Sets the number of secondary rays per opening and the half angle of their fan.
    ///
    /// # Errors
    ///
    /// This function will return an error if the spread is not within `[0°, 90°)`.
    pub fn set_diffraction(&mut self, rays: usize, spread: Angle) -> LumosResult<Invalidation> {
        if !spread.is_finite() || spread < degree!(0.0) || spread >= degree!(90.0) {
            return Err(LumosError::Configuration(
                "diffraction spread must be within [0°, 90°)".into(),
            ));
        }
        self.params.diffraction_rays = rays;
        self.params.diffraction_spread = spread;
        Ok(Invalidation::Optics)
    }
    /// Center positions of the slits along the aperture, measured from its center.
    #[must_use]
    pub fn slit_centers(&self) -> Vec<f64> {
        let offset = usize_to_f64(self.params.slit_count.saturating_sub(1)) / 2.0;
        (0..self.params.slit_count)
            .map(|i| (usize_to_f64(i) - offset) * self.params.slit_separation)
            .collect()
    }
    /// Index of the opening containing the given position along the aperture.
    fn opening_at(&self, param: f64) -> Option<usize> {
        let last = usize_to_f64(self.params.slit_count.saturating_sub(1));
        let offset = last / 2.0;
        let nearest = if last > 0.0 {
            (param / self.params.slit_separation + offset)
                .round()
                .clamp(0.0, last)
        } else {
            0.0
        };
        let center = (nearest - offset) * self.params.slit_separation;
        ((param - center).abs() <= self.params.slit_width / 2.0).then(|| f64_to_usize(nearest))
    }
    fn secondary_rays(&self, ray: &Ray) -> LumosResult<Vec<Ray>> {
        let count = self.params.diffraction_rays;
        let spread = self.params.diffraction_spread.get::<radian>();
        let step = if count > 1 {
            2.0 * spread / usize_to_f64(count - 1)
        } else {
            0.0
        };
        let start = if count > 1 { -spread } else { 0.0 };
        let mut rays = Vec::with_capacity(count);
        for i in 0..count {
            let angle = usize_to_f64(i).mul_add(step, start);
            let mut secondary = ray.child(rotate_2d(&ray.direction(), angle))?;
            secondary.scale_intensity(1.0 / usize_to_f64(count))?;
            rays.push(secondary);
        }
        Ok(rays)
    }
}
impl OpticalComponent for MultiSlit {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::MultiSlit
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::MultiSlit(self.params.clone())
    }
    fn update_geometry(&mut self) {
        self.segment = centered_segment(&self.attr.placement(), self.params.length);
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .segment
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        let surface = self
            .opening_at(hit.param)
            .map_or(SurfaceId::Blocker, SurfaceId::Opening);
        Some(Hit::from_surface(hit, surface))
    }
    fn interact(
        &mut self,
        ray: &Ray,
        hit: &Hit,
        _config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        match hit.surface {
            SurfaceId::Opening(_) if self.params.diffraction_rays > 0 => {
                Ok(Interaction::children(self.secondary_rays(ray)?))
            }
            SurfaceId::Opening(_) => Ok(Interaction::children(vec![ray.child(ray.direction())?])),
            _ => Ok(Interaction::terminated(Termination::Absorbed)),
        }
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
    use crate::ray::Wavelength;
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};

    fn aperture() -> MultiSlit {
        MultiSlit::new(
            "slits",
            Placement::new(point![50.0, 0.0], degree!(180.0)).unwrap(),
            2,
            2.0,
            20.0,
        )
        .unwrap()
    }
    fn ray_at(y: f64) -> Ray {
        Ray::new(point![0.0, y], vector![1.0, 0.0], Wavelength::default(), 1.0).unwrap()
    }
    #[test]
    fn default() {
        let s = MultiSlit::default();
        assert_eq!(s.slit_count(), 2);
        assert_eq!(s.slit_width(), 2.0);
        assert_eq!(s.slit_separation(), 20.0);
        assert_eq!(s.slit_centers(), vec![-10.0, 10.0]);
    }
    #[test]
    fn set_slits() {
        let mut s = MultiSlit::default();
        assert!(s.set_slits(100.0, 0, 2.0, 20.0).is_err());
        assert!(s.set_slits(100.0, 2, 0.0, 20.0).is_err());
        assert!(s.set_slits(100.0, 2, 20.0, 20.0).is_err());
        assert!(s.set_slits(10.0, 3, 2.0, 20.0).is_err());
        assert!(s.set_slits(100.0, 1, 2.0, 0.0).is_ok());
        assert_eq!(s.slit_centers(), vec![0.0]);
        assert!(s.set_diffraction(10, degree!(90.0)).is_err());
        assert!(s.set_diffraction(10, degree!(-1.0)).is_err());
    }
    #[test]
    fn openings_and_blocker() {
        let mut s = aperture();
        for y in [-10.5, 10.9, -9.5] {
            let hit = s.intersect(&ray_at(y), 1e-6).unwrap();
            assert!(matches!(hit.surface, SurfaceId::Opening(_)));
            let interaction = s.interact(&ray_at(y), &hit, &RayTraceConfig::default()).unwrap();
            assert_eq!(interaction.children.len(), 1);
            assert_abs_diff_eq!(interaction.children[0].direction(), vector![1.0, 0.0]);
        }
        for y in [0.0, 12.0, -30.0] {
            let hit = s.intersect(&ray_at(y), 1e-6).unwrap();
            assert_eq!(hit.surface, SurfaceId::Blocker);
            let interaction = s.interact(&ray_at(y), &hit, &RayTraceConfig::default()).unwrap();
            assert_eq!(interaction.termination, Termination::Absorbed);
            assert!(interaction.children.is_empty());
        }
        assert!(s.intersect(&ray_at(51.0), 1e-6).is_none());
    }
    #[test]
    fn opposite_slits_have_different_ids() {
        let s = aperture();
        let a = s.intersect(&ray_at(10.0), 1e-6).unwrap().surface;
        let b = s.intersect(&ray_at(-10.0), 1e-6).unwrap().surface;
        assert_ne!(a, b);
    }
    #[test]
    fn huygens_fan() {
        let mut s = aperture();
        s.set_diffraction(5, degree!(20.0)).unwrap();
        let ray = ray_at(10.0);
        let hit = s.intersect(&ray, 1e-6).unwrap();
        let children = s.interact(&ray, &hit, &RayTraceConfig::default()).unwrap().children;
        assert_eq!(children.len(), 5);
        let total: f64 = children.iter().map(Ray::intensity).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(children[2].direction(), vector![1.0, 0.0], epsilon = 1e-12);
        assert_abs_diff_eq!(
            children[0].direction().y,
            -(20.0_f64.to_radians().sin()),
            epsilon = 1e-12
        );
        assert!(children.iter().all(|c| c.phase() == ray.phase()));
    }
}
