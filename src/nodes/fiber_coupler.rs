#![warn(missing_docs)]
//! Fiber coupler with geometrically decoupled input and output facets
use std::any::Any;

use nalgebra::point;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::kilometer};

use super::{centered_segment, check_length, check_ratio, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    degree,
    error::{LumosError, LumosResult},
    meter,
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId, Termination},
    ray::{BeamProfile, Ray},
    surface::{GeoSurface, LineSegment},
    utils::geom_transformation::Placement,
};

/// Parameters of a [`FiberCoupler`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiberCouplerParams {
    /// length of the input facet
    pub facet_diameter: f64,
    /// diameter of the fiber core
    pub core_diameter: f64,
    /// numerical aperture of the fiber
    pub numerical_aperture: f64,
    /// coupling efficiency for perfectly matched input light
    pub efficiency: f64,
    /// attenuation of the fiber in dB/km
    pub attenuation: f64,
    /// length of the fiber
    pub fiber_length: Length,
    /// placement of the output facet (its angle is the emission direction)
    pub output: Placement,
}
impl Default for FiberCouplerParams {
    fn default() -> Self {
        Self {
            facet_diameter: 10.0,
            core_diameter: 4.0,
            numerical_aperture: 0.22,
            efficiency: 0.9,
            attenuation: 3.0,
            fiber_length: meter!(1.0),
            output: Placement::new(point![100.0, 0.0], degree!(0.0)).unwrap_or_default(),
        }
    }
}

/// A fiber coupler.
///
/// Light entering the input facet on its front side within the acceptance cone `sinθ ≤ NA` is coupled with the
/// Gaussian positional overlap `exp(−2·(r/r꜀)²)` (`r` being the offset from the facet center, `r꜀` the core
/// radius), the user efficiency and the fiber attenuation. The coupled power is re-emitted from the output
/// facet along its optical axis as a Gaussian beam with the core radius as waist. Light hitting the back side
/// or outside the acceptance cone is absorbed.
#[derive(Debug, Clone)]
pub struct FiberCoupler {
    attr: ComponentAttr,
    params: FiberCouplerParams,
    facet: Option<LineSegment>,
}
impl Default for FiberCoupler {
    fn default() -> Self {
        let mut coupler = Self {
            attr: ComponentAttr::new("Fiber coupler", Placement::default()),
            params: FiberCouplerParams::default(),
            facet: None,
        };
        coupler.update_geometry();
        coupler
    }
}
impl FiberCoupler {
    /// Creates a new [`FiberCoupler`] with the given output facet placement.
    ///
    /// # Errors
    ///
    /// This function will return an error if the default parameters cannot be applied.
    pub fn new(name: &str, placement: Placement, output: Placement) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            FiberCouplerParams {
                output,
                ..FiberCouplerParams::default()
            },
        )
    }
    /// Creates a [`FiberCoupler`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: FiberCouplerParams) -> LumosResult<Self> {
        let mut coupler = Self {
            attr,
            ..Self::default()
        };
        coupler.set_diameters(params.facet_diameter, params.core_diameter)?;
        coupler.set_numerical_aperture(params.numerical_aperture)?;
        coupler.set_efficiency(params.efficiency)?;
        coupler.set_attenuation(params.attenuation, params.fiber_length)?;
        let _ = coupler.set_output(params.output);
        Ok(coupler)
    }
    /// Sets the diameters of input facet and fiber core.
    ///
    /// # Errors
    ///
    /// This function will return an error if a diameter is <= 0.0 or not finite.
    pub fn set_diameters(&mut self, facet_diameter: f64, core_diameter: f64) -> LumosResult<Invalidation> {
        check_length(facet_diameter, "facet diameter")?;
        check_length(core_diameter, "core diameter")?;
        self.params.facet_diameter = facet_diameter;
        self.params.core_diameter = core_diameter;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the numerical aperture of this [`FiberCoupler`].
    #[must_use]
    pub const fn numerical_aperture(&self) -> f64 {
        self.params.numerical_aperture
    }
    /// Sets the numerical aperture of this [`FiberCoupler`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the value is not within `(0.0..=1.0]`.
    pub fn set_numerical_aperture(&mut self, numerical_aperture: f64) -> LumosResult<Invalidation> {
        if numerical_aperture <= 0.0 || numerical_aperture > 1.0 {
            return Err(LumosError::Configuration(
                "numerical aperture must be within (0.0..=1.0]".into(),
            ));
        }
        self.params.numerical_aperture = numerical_aperture;
        Ok(Invalidation::Optics)
    }
    /// Sets the coupling efficiency of this [`FiberCoupler`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the efficiency is outside the range `0.0..=1.0`.
    pub fn set_efficiency(&mut self, efficiency: f64) -> LumosResult<Invalidation> {
        check_ratio(efficiency, "coupling efficiency")?;
        self.params.efficiency = efficiency;
        Ok(Invalidation::Optics)
    }
    /// Sets the attenuation (in dB/km) and the length of the fiber.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the values is negative or not finite.
    pub fn set_attenuation(&mut self, attenuation: f64, fiber_length: Length) -> LumosResult<Invalidation> {
        if attenuation.is_sign_negative() || !attenuation.is_finite() {
            return Err(LumosError::Configuration(
                "attenuation must be >=0.0 and finite".into(),
            ));
        }
        if fiber_length.value.is_sign_negative() || !fiber_length.is_finite() {
            return Err(LumosError::Configuration(
                "fiber length must be >=0.0 and finite".into(),
            ));
        }
        self.params.attenuation = attenuation;
        self.params.fiber_length = fiber_length;
        Ok(Invalidation::Optics)
    }
    /// Returns the placement of the output facet.
    #[must_use]
    pub const fn output(&self) -> Placement {
        self.params.output
    }
    /// Sets the placement of the output facet.
    pub fn set_output(&mut self, output: Placement) -> Invalidation {
        self.params.output = output;
        Invalidation::Geometry
    }
    /// Transmission of the fiber due to its attenuation.
    #[must_use]
    pub fn fiber_transmission(&self) -> f64 {
        let loss_db = self.params.attenuation * self.params.fiber_length.get::<kilometer>();
        10.0_f64.powf(-loss_db / 10.0)
    }
    /// Positional overlap factor for an offset `r` from the facet center.
    #[must_use]
    pub fn overlap(&self, offset: f64) -> f64 {
        let core_radius = self.params.core_diameter / 2.0;
        (-2.0 * (offset / core_radius).powi(2)).exp()
    }
}
impl OpticalComponent for FiberCoupler {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::FiberCoupler
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::FiberCoupler(self.params.clone())
    }
    fn update_geometry(&mut self) {
        self.facet = centered_segment(&self.attr.placement(), self.params.facet_diameter);
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .facet
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        let surface = if hit.front_side {
            SurfaceId::InputFacet
        } else {
            SurfaceId::Blocker
        };
        Some(Hit::from_surface(hit, surface))
    }
    fn interact(
        &mut self,
        ray: &Ray,
        hit: &Hit,
        config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        if hit.surface != SurfaceId::InputFacet {
            return Ok(Interaction::terminated(Termination::Absorbed));
        }
        let cos_incidence = hit.cos_incidence(ray).clamp(-1.0, 1.0);
        let sin_incidence = cos_incidence.mul_add(-cos_incidence, 1.0).max(0.0).sqrt();
        if ray.refractive_index() * sin_incidence > self.params.numerical_aperture {
            return Ok(Interaction::terminated(Termination::Absorbed));
        }
        let coupling =
            self.params.efficiency * self.overlap(hit.param) * self.fiber_transmission();
        if coupling <= 0.0 {
            return Ok(Interaction::terminated(Termination::Absorbed));
        }
        let output = self.params.output;
        let mut emitted = ray.teleported_child(output.position(), output.normal())?;
        emitted.scale_intensity(coupling)?;
        emitted.set_refractive_index(config.ambient_refractive_index())?;
        emitted.set_beam(Some(BeamProfile::gaussian_at_waist(
            self.params.core_diameter / 2.0,
            ray.wavelength_in_units(config.length_unit()),
            config.ambient_refractive_index(),
        )?));
        Ok(Interaction::children(vec![emitted]))
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
    use crate::{micrometer, ray::Wavelength};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use nalgebra::vector;

    fn coupler() -> FiberCoupler {
        FiberCoupler::new(
            "fiber",
            Placement::new(point![50.0, 0.0], degree!(180.0)).unwrap(),
            Placement::new(point![0.0, 200.0], degree!(90.0)).unwrap(),
        )
        .unwrap()
    }
    fn couple(fiber: &mut FiberCoupler, mut ray: Ray) -> Interaction {
        let hit = fiber.intersect(&ray, 1e-6).unwrap();
        ray.propagate(hit.distance, micrometer!(1.0)).unwrap();
        fiber
            .interact(&ray, &hit, &RayTraceConfig::default())
            .unwrap()
    }
    #[test]
    fn default() {
        let f = FiberCoupler::default();
        assert_eq!(f.numerical_aperture(), 0.22);
        assert_eq!(f.output().position(), point![100.0, 0.0]);
        assert_abs_diff_eq!(f.fiber_transmission(), 10.0_f64.powf(-0.0003), epsilon = 1e-12);
    }
    #[test]
    fn setters() {
        let mut f = FiberCoupler::default();
        assert!(f.set_numerical_aperture(0.0).is_err());
        assert!(f.set_numerical_aperture(1.1).is_err());
        assert!(f.set_efficiency(1.1).is_err());
        assert!(f.set_diameters(10.0, 0.0).is_err());
        assert!(f.set_attenuation(-1.0, meter!(1.0)).is_err());
        assert!(f.set_attenuation(1.0, meter!(-1.0)).is_err());
    }
    #[test]
    fn centered_coupling() {
        let mut f = coupler();
        let ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        let interaction = couple(&mut f, ray);
        assert_eq!(interaction.children.len(), 1);
        let out = &interaction.children[0];
        assert_abs_diff_eq!(out.intensity(), 0.9 * f.fiber_transmission(), epsilon = 1e-12);
        assert_abs_diff_eq!(out.position(), point![0.0, 200.0], epsilon = 1e-12);
        assert_abs_diff_eq!(out.direction(), vector![0.0, 1.0], epsilon = 1e-12);
        assert_eq!(out.number_of_bounces(), 1);
        assert_matches!(out.beam(), Some(BeamProfile::Gaussian { waist_radius, distance_from_waist, .. }) => {
            assert_abs_diff_eq!(waist_radius, 2.0, epsilon = 1e-12);
            assert_abs_diff_eq!(distance_from_waist, 0.0);
        });
    }
    #[test]
    fn offset_reduces_overlap() {
        let mut f = coupler();
        let ray = Ray::new(point![0.0, 2.0], vector![1.0, 0.0], Wavelength::default(), 1.0).unwrap();
        let interaction = couple(&mut f, ray);
        let expected = 0.9 * (-2.0_f64).exp() * f.fiber_transmission();
        assert_abs_diff_eq!(interaction.children[0].intensity(), expected, epsilon = 1e-9);
    }
    #[test]
    fn outside_acceptance_cone() {
        let mut f = coupler();
        // sin(θ) ≈ 0.39 > NA
        let ray = Ray::new(point![0.0, -21.0], vector![50.0, 21.0], Wavelength::default(), 1.0).unwrap();
        let interaction = couple(&mut f, ray);
        assert!(interaction.children.is_empty());
        assert_matches!(interaction.termination, Termination::Absorbed);
    }
    #[test]
    fn back_side_blocks() {
        let mut f = coupler();
        let ray = Ray::new(point![100.0, 0.0], vector![-1.0, 0.0], Wavelength::default(), 1.0).unwrap();
        let hit = f.intersect(&ray, 1e-6).unwrap();
        assert_eq!(hit.surface, SurfaceId::Blocker);
        let interaction = couple(&mut f, ray);
        assert_matches!(interaction.termination, Termination::Absorbed);
    }
}
