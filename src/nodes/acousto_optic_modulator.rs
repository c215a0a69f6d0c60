#![warn(missing_docs)]
//! Acousto-optic modulator
use std::{any::Any, f64::consts::FRAC_PI_2};

use serde::{Deserialize, Serialize};
use uom::si::{
    angle::radian,
    f64::{Angle, Frequency, Length, Power, Velocity},
};

use super::{centered_segment, check_length, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    error::{LumosError, LumosResult},
    megahertz, meter_per_second,
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId},
    ray::Ray,
    surface::{GeoSurface, LineSegment},
    utils::{geom_transformation::Placement, math_utils::rotate_2d},
    watt,
};

/// Parameters of an [`AcoustoOpticModulator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcoustoOpticModulatorParams {
    /// length of the crystal aperture
    pub length: f64,
    /// RF drive frequency
    pub rf_frequency: Frequency,
    /// acoustic velocity in the crystal
    pub acoustic_velocity: Velocity,
    /// RF drive power
    pub rf_power: Power,
    /// RF power of full conversion into the first order
    pub saturation_power: Power,
}
impl Default for AcoustoOpticModulatorParams {
    fn default() -> Self {
        Self {
            length: 30.0,
            rf_frequency: megahertz!(80.0),
            acoustic_velocity: meter_per_second!(4200.0),
            rf_power: watt!(1.0),
            saturation_power: watt!(2.0),
        }
    }
}

/// An acousto-optic modulator working in the Bragg regime.
///
/// An incoming ray is split into an undeviated 0th order and a +1st order deflected (counter-clockwise) by
/// `λ·f/v`. The first order carries the fraction `η = sin²(π/2·√(P/Pₛₐₜ))` of the intensity.
#[derive(Debug, Clone)]
pub struct AcoustoOpticModulator {
    attr: ComponentAttr,
    params: AcoustoOpticModulatorParams,
    segment: Option<LineSegment>,
}
impl Default for AcoustoOpticModulator {
    fn default() -> Self {
        let mut aom = Self {
            attr: ComponentAttr::new("Acousto-optic modulator", Placement::default()),
            params: AcoustoOpticModulatorParams::default(),
            segment: None,
        };
        aom.update_geometry();
        aom
    }
}
impl AcoustoOpticModulator {
    /// Creates a new [`AcoustoOpticModulator`] driven with the given RF frequency and power.
    ///
    /// # Errors
    ///
    /// This function will return an error if the frequency is <= 0.0 or the power is negative or not finite.
    pub fn new(
        name: &str,
        placement: Placement,
        rf_frequency: Frequency,
        rf_power: Power,
    ) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            AcoustoOpticModulatorParams {
                rf_frequency,
                rf_power,
                ..AcoustoOpticModulatorParams::default()
            },
        )
    }
    /// Creates an [`AcoustoOpticModulator`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: AcoustoOpticModulatorParams) -> LumosResult<Self> {
        let mut aom = Self {
            attr,
            ..Self::default()
        };
        aom.set_length(params.length)?;
        aom.set_acoustics(params.rf_frequency, params.acoustic_velocity)?;
        aom.set_saturation_power(params.saturation_power)?;
        aom.set_rf_power(params.rf_power)?;
        Ok(aom)
    }
    /// Sets the aperture length of this [`AcoustoOpticModulator`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is <= 0.0 or not finite.
    pub fn set_length(&mut self, length: f64) -> LumosResult<Invalidation> {
        check_length(length, "modulator length")?;
        self.params.length = length;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Sets RF frequency and acoustic velocity.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the values is <= 0.0 or not finite.
    pub fn set_acoustics(
        &mut self,
        rf_frequency: Frequency,
        acoustic_velocity: Velocity,
    ) -> LumosResult<Invalidation> {
        if !rf_frequency.is_finite() || rf_frequency.value <= 0.0 {
            return Err(LumosError::Configuration(
                "RF frequency must be >0.0 and finite".into(),
            ));
        }
        if !acoustic_velocity.is_finite() || acoustic_velocity.value <= 0.0 {
            return Err(LumosError::Configuration(
                "acoustic velocity must be >0.0 and finite".into(),
            ));
        }
        self.params.rf_frequency = rf_frequency;
        self.params.acoustic_velocity = acoustic_velocity;
        Ok(Invalidation::Optics)
    }
    /// Returns the RF drive power of this [`AcoustoOpticModulator`].
    #[must_use]
    pub const fn rf_power(&self) -> Power {
        self.params.rf_power
    }
    /// Sets the RF drive power.
    ///
    /// # Errors
    ///
    /// This function will return an error if the power is negative or not finite.
    pub fn set_rf_power(&mut self, rf_power: Power) -> LumosResult<Invalidation> {
        if !rf_power.is_finite() || rf_power.value.is_sign_negative() {
            return Err(LumosError::Configuration(
                "RF power must be >=0.0 and finite".into(),
            ));
        }
        self.params.rf_power = rf_power;
        Ok(Invalidation::Optics)
    }
    /// Sets the saturation power.
    ///
    /// # Errors
    ///
    /// This function will return an error if the power is <= 0.0 or not finite.
    pub fn set_saturation_power(&mut self, saturation_power: Power) -> LumosResult<Invalidation> {
        if !saturation_power.is_finite() || saturation_power.value <= 0.0 {
            return Err(LumosError::Configuration(
                "saturation power must be >0.0 and finite".into(),
            ));
        }
        self.params.saturation_power = saturation_power;
        Ok(Invalidation::Optics)
    }
    /// Fraction of the intensity diffracted into the first order.
    #[must_use]
    pub fn diffraction_efficiency(&self) -> f64 {
        let ratio = (self.params.rf_power / self.params.saturation_power).value;
        (FRAC_PI_2 * ratio.max(0.0).sqrt()).sin().powi(2)
    }
    /// Angle between the 0th and the +1st order for the given wavelength.
    #[must_use]
    pub fn deflection_angle(&self, wavelength: Length) -> Angle {
        let angle = wavelength * self.params.rf_frequency / self.params.acoustic_velocity;
        Angle::new::<radian>(angle.value)
    }
}
impl OpticalComponent for AcoustoOpticModulator {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::AcoustoOpticModulator
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::AcoustoOpticModulator(self.params.clone())
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
        let efficiency = self.diffraction_efficiency();
        let mut children = Vec::with_capacity(2);
        if efficiency < 1.0 {
            let mut zeroth = ray.child(ray.direction())?;
            zeroth.scale_intensity(1.0 - efficiency)?;
            children.push(zeroth);
        }
        if efficiency > 0.0 {
            let angle = self.deflection_angle(ray.wavelength().effective()).value;
            let mut first = ray.child(rotate_2d(&ray.direction(), angle))?;
            first.scale_intensity(efficiency)?;
            children.push(first);
        }
        Ok(Interaction::children(children))
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
    use crate::{degree, micrometer, milliwatt, nanometer, ray::Wavelength};
    use approx::assert_abs_diff_eq;
    use nalgebra::point;

    fn aom(power: Power) -> AcoustoOpticModulator {
        AcoustoOpticModulator::new(
            "aom",
            Placement::new(point![50.0, 0.0], degree!(0.0)).unwrap(),
            megahertz!(80.0),
            power,
        )
        .unwrap()
    }
    fn modulate(aom: &mut AcoustoOpticModulator) -> Vec<Ray> {
        let mut ray = Ray::origin_along_x(Wavelength::new(nanometer!(1050.0)).unwrap(), 1.0).unwrap();
        let hit = aom.intersect(&ray, 1e-6).unwrap();
        ray.propagate(hit.distance, micrometer!(1.0)).unwrap();
        aom.interact(&ray, &hit, &RayTraceConfig::default())
            .unwrap()
            .children
    }
    #[test]
    fn default() {
        let aom = AcoustoOpticModulator::default();
        assert_eq!(aom.rf_power(), watt!(1.0));
        assert_abs_diff_eq!(aom.diffraction_efficiency(), 0.5, epsilon = 1e-12);
    }
    #[test]
    fn setters() {
        let mut aom = AcoustoOpticModulator::default();
        assert!(aom.set_rf_power(watt!(-1.0)).is_err());
        assert!(aom.set_saturation_power(watt!(0.0)).is_err());
        assert!(aom
            .set_acoustics(megahertz!(0.0), meter_per_second!(4200.0))
            .is_err());
        assert!(aom
            .set_acoustics(megahertz!(80.0), meter_per_second!(f64::NAN))
            .is_err());
        assert_eq!(aom.set_rf_power(milliwatt!(500.0)).unwrap(), Invalidation::Optics);
    }
    #[test]
    fn deflection_angle() {
        let aom = AcoustoOpticModulator::default();
        // 1050 nm · 80 MHz / 4200 m/s = 20 mrad
        assert_abs_diff_eq!(aom.deflection_angle(nanometer!(1050.0)).value, 0.02, epsilon = 1e-12);
    }
    #[test]
    fn split_orders() {
        let mut aom = aom(watt!(1.0));
        let children = modulate(&mut aom);
        assert_eq!(children.len(), 2);
        assert_abs_diff_eq!(children[0].intensity(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(children[1].intensity(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(children[0].direction().y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(children[1].direction().y.atan2(children[1].direction().x), 0.02, epsilon = 1e-12);
    }
    #[test]
    fn rf_off_passes_undeviated() {
        let mut aom = aom(watt!(0.0));
        let children = modulate(&mut aom);
        assert_eq!(children.len(), 1);
        assert_abs_diff_eq!(children[0].intensity(), 1.0, epsilon = 1e-12);
    }
    #[test]
    fn saturation_deflects_everything() {
        let mut aom = aom(watt!(2.0));
        let children = modulate(&mut aom);
        assert_eq!(children.len(), 1);
        assert!(children[0].direction().y > 0.0);
    }
}
