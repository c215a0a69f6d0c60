#![warn(missing_docs)]
//! Faraday rotator and optical isolator
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

/// Operation mode of a [`FaradayRotator`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum FaradayMode {
    /// bare rotator
    #[default]
    Rotator,
    /// rotator between an input and an output polarizer
    Isolator {
        /// transmission axis of the input polarizer. The output polarizer is rotated by the rotation angle.
        input_axis: Angle,
    },
}

/// Parameters of a [`FaradayRotator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaradayRotatorParams {
    /// length of the element
    pub length: f64,
    /// rotation angle of the polarization
    pub rotation: Angle,
    /// rotator or isolator
    pub mode: FaradayMode,
}
impl Default for FaradayRotatorParams {
    fn default() -> Self {
        Self {
            length: 30.0,
            rotation: degree!(45.0),
            mode: FaradayMode::default(),
        }
    }
}

/// A Faraday rotator.
///
/// The polarization is rotated by the same angle for both propagation directions (non-reciprocal rotation). A
/// ray passing forward and backward is therefore rotated twice. In isolator mode, forward light (propagating
/// along the optical axis of the placement) passes `P(in) → R → P(in + θ)`, backward light passes
/// `P(in + θ) → R → P(in)`. For `θ = 45°`, backward light is blocked.
#[derive(Debug, Clone)]
pub struct FaradayRotator {
    attr: ComponentAttr,
    params: FaradayRotatorParams,
    segment: Option<LineSegment>,
}
impl Default for FaradayRotator {
    fn default() -> Self {
        let mut rotator = Self {
            attr: ComponentAttr::new("Faraday rotator", Placement::default()),
            params: FaradayRotatorParams::default(),
            segment: None,
        };
        rotator.update_geometry();
        rotator
    }
}
impl FaradayRotator {
    /// Creates a new [`FaradayRotator`].
    ///
    /// # Errors
    ///
    /// This function will return an error if an angle is not finite.
    pub fn new(
        name: &str,
        placement: Placement,
        rotation: Angle,
        mode: FaradayMode,
    ) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            FaradayRotatorParams {
                rotation,
                mode,
                ..FaradayRotatorParams::default()
            },
        )
    }
    /// Creates a [`FaradayRotator`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: FaradayRotatorParams) -> LumosResult<Self> {
        let mut rotator = Self {
            attr,
            ..Self::default()
        };
        rotator.set_length(params.length)?;
        rotator.set_rotation(params.rotation)?;
        rotator.set_mode(params.mode)?;
        Ok(rotator)
    }
    /// Sets the length of this [`FaradayRotator`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is <= 0.0 or not finite.
    pub fn set_length(&mut self, length: f64) -> LumosResult<Invalidation> {
        check_length(length, "rotator length")?;
        self.params.length = length;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the rotation angle of this [`FaradayRotator`].
    #[must_use]
    pub const fn rotation(&self) -> Angle {
        self.params.rotation
    }
    /// Sets the rotation angle of this [`FaradayRotator`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the angle is not finite.
    pub fn set_rotation(&mut self, rotation: Angle) -> LumosResult<Invalidation> {
        if !rotation.is_finite() {
            return Err(LumosError::Configuration(
                "rotation angle must be finite".into(),
            ));
        }
        self.params.rotation = rotation;
        Ok(Invalidation::Optics)
    }
    /// Returns the [`FaradayMode`] of this [`FaradayRotator`].
    #[must_use]
    pub const fn mode(&self) -> FaradayMode {
        self.params.mode
    }
    /// Sets the [`FaradayMode`] of this [`FaradayRotator`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the input axis of an isolator is not finite.
    pub fn set_mode(&mut self, mode: FaradayMode) -> LumosResult<Invalidation> {
        if let FaradayMode::Isolator { input_axis } = mode {
            if !input_axis.is_finite() {
                return Err(LumosError::Configuration(
                    "isolator input axis must be finite".into(),
                ));
            }
        }
        self.params.mode = mode;
        Ok(Invalidation::Optics)
    }
}
impl OpticalComponent for FaradayRotator {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::FaradayRotator
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::FaradayRotator(self.params.clone())
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
        let mut transmitted = ray.child(ray.direction())?;
        match self.params.mode {
            FaradayMode::Rotator => {
                transmitted.set_polarization(ray.polarization().rotated(self.params.rotation));
            }
            FaradayMode::Isolator { input_axis } => {
                let rotation = self.params.rotation.get::<radian>();
                let input = input_axis.get::<radian>();
                let forward = ray.direction().dot(&self.attr.placement().normal()) > 0.0;
                let (first, last) = if forward {
                    (input, input + rotation)
                } else {
                    (input + rotation, input)
                };
                let matrix = JonesMatrix::linear_polarizer(last)
                    .mul(&JonesMatrix::rotation(rotation))
                    .mul(&JonesMatrix::linear_polarizer(first));
                let (polarization, transmission) = ray.polarization().transform(&matrix);
                if transmission <= f64::EPSILON {
                    return Ok(Interaction::terminated(Termination::Absorbed));
                }
                transmitted.scale_intensity(transmission.min(1.0))?;
                transmitted.add_phase(ray.polarization().phase_shift(&matrix));
                transmitted.set_polarization(polarization);
            }
        }
        Ok(Interaction::children(vec![transmitted]))
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
    use crate::{micrometer, polarization::Polarization, ray::Wavelength};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use nalgebra::{point, vector};
    use uom::si::angle::degree;

    fn pass(rotator: &mut FaradayRotator, mut ray: Ray) -> Interaction {
        let hit = rotator.intersect(&ray, 1e-6).unwrap();
        ray.propagate(hit.distance, micrometer!(1.0)).unwrap();
        rotator
            .interact(&ray, &hit, &RayTraceConfig::default())
            .unwrap()
    }
    fn forward_ray(polarization: Polarization) -> Ray {
        let mut ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        ray.set_polarization(polarization);
        ray
    }
    fn backward_ray(polarization: Polarization) -> Ray {
        let mut ray = Ray::new(point![100.0, 0.0], vector![-1.0, 0.0], Wavelength::default(), 1.0).unwrap();
        ray.set_polarization(polarization);
        ray
    }
    fn rotator(mode: FaradayMode) -> FaradayRotator {
        FaradayRotator::new(
            "faraday",
            Placement::new(point![50.0, 0.0], degree!(0.0)).unwrap(),
            degree!(45.0),
            mode,
        )
        .unwrap()
    }
    fn angle_of(ray: &Ray) -> f64 {
        ray.polarization().linear_angle().unwrap().get::<degree>()
    }
    #[test]
    fn default() {
        let r = FaradayRotator::default();
        assert_eq!(r.rotation(), degree!(45.0));
        assert_eq!(r.mode(), FaradayMode::Rotator);
    }
    #[test]
    fn setters() {
        let mut r = FaradayRotator::default();
        assert!(r.set_rotation(degree!(f64::NAN)).is_err());
        assert!(r
            .set_mode(FaradayMode::Isolator {
                input_axis: degree!(f64::INFINITY)
            })
            .is_err());
    }
    #[test]
    fn rotation_is_non_reciprocal() {
        let mut r = rotator(FaradayMode::Rotator);
        let forward = pass(&mut r, forward_ray(Polarization::linear(degree!(0.0))));
        assert_abs_diff_eq!(angle_of(&forward.children[0]), 45.0, epsilon = 1e-6);
        let backward = pass(&mut r, backward_ray(Polarization::linear(degree!(45.0))));
        // same sense of rotation on the way back: a round trip gives 90°
        assert_abs_diff_eq!(angle_of(&backward.children[0]), 90.0, epsilon = 1e-6);
    }
    #[test]
    fn isolator_passes_forward_light() {
        let mut r = rotator(FaradayMode::Isolator {
            input_axis: degree!(0.0),
        });
        let forward = pass(&mut r, forward_ray(Polarization::linear(degree!(0.0))));
        assert_eq!(forward.children.len(), 1);
        assert_abs_diff_eq!(forward.children[0].intensity(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angle_of(&forward.children[0]), 45.0, epsilon = 1e-6);
    }
    #[test]
    fn isolator_blocks_backward_light() {
        let mut r = rotator(FaradayMode::Isolator {
            input_axis: degree!(0.0),
        });
        let backward = pass(&mut r, backward_ray(Polarization::linear(degree!(45.0))));
        assert!(backward.children.is_empty());
        assert_matches!(backward.termination, Termination::Absorbed);
    }
}
