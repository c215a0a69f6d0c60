#![warn(missing_docs)]
//! Integrating detector
use std::{any::Any, fmt::Debug};

use kahan::KahanSum;
use log::warn;
use serde::{Deserialize, Serialize};

use super::{centered_segment, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    error::{LumosError, LumosResult},
    optic_component::{
        DetectorReadout, Hit, Interaction, Invalidation, OpticalComponent, SurfaceId, Termination,
    },
    ray::Ray,
    surface::{GeoSurface, LineSegment},
    utils::geom_transformation::Placement,
};

/// Parameters of a [`Photodiode`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotodiodeParams {
    /// diameter of the circular active area
    pub diameter: f64,
}
impl Default for PhotodiodeParams {
    fn default() -> Self {
        Self { diameter: 10.0 }
    }
}

/// A photodiode integrating the intensity of all rays hitting its active area.
///
/// In the 2D scene the circular aperture is the segment of the given diameter across the optical axis. Rays hitting
/// the front side are absorbed and counted, rays hitting the back side are blocked.
pub struct Photodiode {
    attr: ComponentAttr,
    params: PhotodiodeParams,
    segment: Option<LineSegment>,
    power: KahanSum<f64>,
    hits: usize,
}
impl Debug for Photodiode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Photodiode")
            .field("attr", &self.attr)
            .field("params", &self.params)
            .field("power", &self.power.sum())
            .field("hits", &self.hits)
            .finish_non_exhaustive()
    }
}
impl Default for Photodiode {
    fn default() -> Self {
        let mut photodiode = Self {
            attr: ComponentAttr::new("Photodiode", Placement::default()),
            params: PhotodiodeParams::default(),
            segment: None,
            power: KahanSum::new(),
            hits: 0,
        };
        photodiode.update_geometry();
        photodiode
    }
}
impl Photodiode {
    /// Creates a new [`Photodiode`] with the given diameter of its active area.
    ///
    /// # Errors
    ///
    /// This function will return an error if the diameter is negative or not finite.
    pub fn new(name: &str, placement: Placement, diameter: f64) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            PhotodiodeParams { diameter },
        )
    }
    /// Creates a [`Photodiode`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: PhotodiodeParams) -> LumosResult<Self> {
        let mut photodiode = Self {
            attr,
            ..Self::default()
        };
        photodiode.set_diameter(params.diameter)?;
        Ok(photodiode)
    }
    /// Returns the diameter of the active area.
    #[must_use]
    pub const fn diameter(&self) -> f64 {
        self.params.diameter
    }
    /// Sets the diameter of the active area and resets the accumulated power.
    ///
    /// A diameter of zero is accepted but leads to a detector without active area.
    ///
    /// # Errors
    ///
    /// This function will return an error if the diameter is negative or not finite.
    pub fn set_diameter(&mut self, diameter: f64) -> LumosResult<Invalidation> {
        if diameter.is_sign_negative() || !diameter.is_finite() {
            return Err(LumosError::Configuration(
                "photodiode diameter must be >=0.0 and finite".into(),
            ));
        }
        self.params.diameter = diameter;
        self.update_geometry();
        self.reset();
        Ok(Invalidation::Geometry)
    }
    /// Returns the accumulated power of this [`Photodiode`].
    #[must_use]
    pub fn power(&self) -> f64 {
        self.power.sum()
    }
    /// Returns the number of absorbed rays.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }
}
impl OpticalComponent for Photodiode {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::Photodiode
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::Photodiode(self.params.clone())
    }
    fn update_geometry(&mut self) {
        self.segment = centered_segment(&self.attr.placement(), self.params.diameter);
        if self.segment.is_none() {
            warn!("photodiode '{}' has no active area", self.attr.name());
        }
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .segment
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        let surface = if hit.front_side {
            SurfaceId::ActiveArea
        } else {
            SurfaceId::Blocker
        };
        Some(Hit::from_surface(hit, surface))
    }
    fn interact(
        &mut self,
        ray: &Ray,
        hit: &Hit,
        _config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        if hit.surface != SurfaceId::ActiveArea {
            return Ok(Interaction::terminated(Termination::Absorbed));
        }
        self.power += ray.intensity();
        self.hits += 1;
        Ok(Interaction::terminated(Termination::Detected))
    }
    fn reset(&mut self) {
        self.power = KahanSum::new();
        self.hits = 0;
    }
    fn readout(&self) -> Option<DetectorReadout> {
        Some(DetectorReadout::Photodiode {
            power: self.power(),
            hits: self.hits,
        })
    }
    fn warnings(&self) -> Vec<String> {
        if self.segment.is_none() {
            vec![format!(
                "photodiode '{}' has zero extent and will not detect any light",
                self.attr.name()
            )]
        } else {
            Vec::new()
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
    use crate::{degree, ray::Wavelength, utils::test_helper::test_helper::check_warnings};
    use approx::assert_abs_diff_eq;
    use nalgebra::point;
    fn facing_source() -> Photodiode {
        Photodiode::new(
            "pd",
            Placement::new(point![50.0, 0.0], degree!(180.0)).unwrap(),
            10.0,
        )
        .unwrap()
    }
    #[test]
    fn default() {
        let pd = Photodiode::default();
        assert_eq!(pd.diameter(), 10.0);
        assert_eq!(pd.power(), 0.0);
        assert!(pd.warnings().is_empty());
        assert_eq!(
            pd.readout(),
            Some(DetectorReadout::Photodiode {
                power: 0.0,
                hits: 0
            })
        );
    }
    #[test]
    fn accumulate_and_reset() {
        let mut pd = facing_source();
        let ray = Ray::origin_along_x(Wavelength::default(), 0.25).unwrap();
        for _ in 0..4 {
            let hit = pd.intersect(&ray, 1e-6).unwrap();
            assert_eq!(hit.surface, SurfaceId::ActiveArea);
            let interaction = pd.interact(&ray, &hit, &RayTraceConfig::default()).unwrap();
            assert_eq!(interaction.termination, Termination::Detected);
            assert!(interaction.children.is_empty());
        }
        assert_abs_diff_eq!(pd.power(), 1.0, epsilon = 1e-12);
        assert_eq!(pd.hits(), 4);
        let _ = pd.set_position(point![60.0, 0.0]).unwrap();
        assert_eq!(pd.power(), 0.0);
        assert_eq!(pd.hits(), 0);
    }
    #[test]
    fn back_side_blocks() {
        let mut pd = Photodiode::new(
            "pd",
            Placement::new(point![50.0, 0.0], degree!(0.0)).unwrap(),
            10.0,
        )
        .unwrap();
        let ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        let hit = pd.intersect(&ray, 1e-6).unwrap();
        assert_eq!(hit.surface, SurfaceId::Blocker);
        let interaction = pd.interact(&ray, &hit, &RayTraceConfig::default()).unwrap();
        assert_eq!(interaction.termination, Termination::Absorbed);
        assert_eq!(pd.power(), 0.0);
    }
    #[test]
    fn zero_extent() {
        testing_logger::setup();
        let pd = Photodiode::new("pd", Placement::default(), 0.0).unwrap();
        check_warnings(vec!["photodiode 'pd' has no active area"]);
        assert_eq!(pd.warnings().len(), 1);
        let ray = Ray::new(
            point![-10.0, 0.0],
            nalgebra::vector![1.0, 0.0],
            Wavelength::default(),
            1.0,
        )
        .unwrap();
        assert!(pd.intersect(&ray, 1e-6).is_none());
    }
    #[test]
    fn invalid_diameter() {
        assert!(Photodiode::new("pd", Placement::default(), -1.0).is_err());
        assert!(Photodiode::new("pd", Placement::default(), f64::INFINITY).is_err());
    }
}
