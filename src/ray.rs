#![warn(missing_docs)]
//! Module for handling optical rays
use std::{f64::consts::PI, fmt::Display};

use nalgebra::{Point2, Vector2};
use num::Zero;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::nanometer};
use uuid::Uuid;

use crate::{
    error::{LumosError, LumosResult},
    nanometer,
    optics::gaussian,
    polarization::Polarization,
    utils::math_utils::is_finite_vector,
};

/// Wavelength used for broadband rays wherever a numeric value is needed.
pub const BROADBAND_REFERENCE_WAVELENGTH_NM: f64 = 550.0;

/// Wavelength of a [`Ray`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Wavelength {
    /// a single (vacuum) wavelength
    Monochromatic(Length),
    /// white light without a defined wavelength
    Broadband,
}
impl Wavelength {
    /// Creates a new monochromatic [`Wavelength`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given wavelength is <= 0.0 or not finite.
    pub fn new(wavelength: Length) -> LumosResult<Self> {
        if wavelength.is_zero() || wavelength.is_sign_negative() || !wavelength.is_finite() {
            return Err(LumosError::Configuration(
                "wavelength must be >0.0 and finite".into(),
            ));
        }
        Ok(Self::Monochromatic(wavelength))
    }
    /// Returns the numeric wavelength. Broadband light is represented by 550 nm.
    #[must_use]
    pub fn effective(&self) -> Length {
        match self {
            Self::Monochromatic(wavelength) => *wavelength,
            Self::Broadband => nanometer!(BROADBAND_REFERENCE_WAVELENGTH_NM),
        }
    }
    /// Returns `true` if this is broadband light.
    #[must_use]
    pub const fn is_broadband(&self) -> bool {
        matches!(self, Self::Broadband)
    }
}
impl Default for Wavelength {
    fn default() -> Self {
        Self::Monochromatic(nanometer!(BROADBAND_REFERENCE_WAVELENGTH_NM))
    }
}
impl Display for Wavelength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monochromatic(wavelength) => write!(f, "{} nm", wavelength.get::<nanometer>()),
            Self::Broadband => write!(f, "broadband"),
        }
    }
}

/// Optional transverse beam data carried by a [`Ray`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BeamProfile {
    /// geometric beam with a fixed diameter
    Geometric {
        /// beam diameter in scene units
        diameter: f64,
    },
    /// fundamental Gaussian beam
    Gaussian {
        /// waist radius in scene units
        waist_radius: f64,
        /// Rayleigh range in scene units
        rayleigh_range: f64,
        /// signed distance from the waist (negative before the waist)
        distance_from_waist: f64,
    },
}
impl BeamProfile {
    /// Creates a Gaussian profile with its waist at the current position.
    ///
    /// # Errors
    ///
    /// This function will return an error if the waist radius or the wavelength (both in scene units) are <= 0.0
    /// or not finite.
    pub fn gaussian_at_waist(
        waist_radius: f64,
        wavelength: f64,
        refractive_index: f64,
    ) -> LumosResult<Self> {
        if waist_radius <= 0.0 || !waist_radius.is_finite() {
            return Err(LumosError::Configuration(
                "waist radius must be >0.0 and finite".into(),
            ));
        }
        if wavelength <= 0.0 || !wavelength.is_finite() {
            return Err(LumosError::Configuration(
                "wavelength must be >0.0 and finite".into(),
            ));
        }
        Ok(Self::Gaussian {
            waist_radius,
            rayleigh_range: gaussian::rayleigh_range(waist_radius, wavelength, refractive_index),
            distance_from_waist: 0.0,
        })
    }
    /// Local beam radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        match self {
            Self::Geometric { diameter } => diameter / 2.0,
            Self::Gaussian {
                waist_radius,
                rayleigh_range,
                distance_from_waist,
            } => gaussian::beam_radius(*waist_radius, *rayleigh_range, *distance_from_waist),
        }
    }
    fn propagated(self, distance: f64) -> Self {
        match self {
            Self::Geometric { .. } => self,
            Self::Gaussian {
                waist_radius,
                rayleigh_range,
                distance_from_waist,
            } => Self::Gaussian {
                waist_radius,
                rayleigh_range,
                distance_from_waist: distance_from_waist + distance,
            },
        }
    }
}

///Struct that contains all information about an optical ray
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ray {
    /// Stores the current position of the ray
    pos: Point2<f64>,
    /// Stores the position history of the ray (without the current position)
    pos_hist: Vec<Point2<f64>>,
    /// Stores the current (normalized) propagation direction of the ray
    dir: Vector2<f64>,
    wavelength: Wavelength,
    /// power-proportional scalar intensity
    intensity: f64,
    /// accumulated optical phase in radians
    phase: f64,
    polarization: Polarization,
    /// Bounce count of the ray. Used as stop criterion.
    number_of_bounces: usize,
    // refractive index of the medium this ray is propagating in.
    refractive_index: f64,
    source_id: Option<Uuid>,
    /// ignore the minimum intensity threshold for this ray
    keep_alive: bool,
    beam: Option<BeamProfile>,
}
impl Ray {
    /// Creates a new [`Ray`].
    ///
    /// The direction vector is normalized.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - the position is not finite
    ///  - the direction vector has a zero length or is not finite
    ///  - the given intensity is < 0.0, `NaN` or +inf
    pub fn new(
        position: Point2<f64>,
        direction: Vector2<f64>,
        wavelength: Wavelength,
        intensity: f64,
    ) -> LumosResult<Self> {
        if !is_finite_vector(&position.coords) {
            return Err(LumosError::Geometry("position must be finite".into()));
        }
        if intensity.is_sign_negative() || !intensity.is_finite() {
            return Err(LumosError::Configuration(
                "intensity must be >=0.0 and finite".into(),
            ));
        }
        let dir = Self::checked_direction(direction)?;
        Ok(Self {
            pos: position,
            pos_hist: Vec::<Point2<f64>>::with_capacity(4),
            dir,
            wavelength,
            intensity,
            phase: 0.0,
            polarization: Polarization::default(),
            number_of_bounces: 0,
            refractive_index: 1.0,
            source_id: None,
            keep_alive: false,
            beam: None,
        })
    }
    /// Create a ray at the coordinate origin pointing along the positive x-axis.
    ///
    /// # Errors
    ///
    /// This function will return an error if the intensity is < 0.0 or not finite.
    pub fn origin_along_x(wavelength: Wavelength, intensity: f64) -> LumosResult<Self> {
        Self::new(Point2::origin(), Vector2::x(), wavelength, intensity)
    }
    fn checked_direction(direction: Vector2<f64>) -> LumosResult<Vector2<f64>> {
        let length = direction.norm();
        if length.is_zero() || !length.is_finite() {
            return Err(LumosError::Geometry(
                "length of direction must be >0 and finite".into(),
            ));
        }
        Ok(direction / length)
    }
    /// Returns the position of this [`Ray`].
    #[must_use]
    pub const fn position(&self) -> Point2<f64> {
        self.pos
    }
    /// Returns the (normalized) direction of this [`Ray`].
    #[must_use]
    pub const fn direction(&self) -> Vector2<f64> {
        self.dir
    }
    /// Sets the direction of this [`Ray`]. The vector is normalized.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given vector has zero length or is not finite.
    pub fn set_direction(&mut self, direction: Vector2<f64>) -> LumosResult<()> {
        self.dir = Self::checked_direction(direction)?;
        Ok(())
    }
    /// Returns the wavelength of this [`Ray`].
    #[must_use]
    pub const fn wavelength(&self) -> Wavelength {
        self.wavelength
    }
    /// Returns the intensity of this [`Ray`].
    #[must_use]
    pub const fn intensity(&self) -> f64 {
        self.intensity
    }
    /// Sets the intensity of this [`Ray`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given intensity is negative or not finite.
    pub fn set_intensity(&mut self, intensity: f64) -> LumosResult<()> {
        if intensity.is_sign_negative() || !intensity.is_finite() {
            return Err(LumosError::Trace(
                "intensity must be >=0.0 and finite".into(),
            ));
        }
        self.intensity = intensity;
        Ok(())
    }
    /// Multiplies the intensity of this [`Ray`] with the given factor.
    ///
    /// # Errors
    ///
    /// This function will return an error if the factor is negative or not finite.
    pub fn scale_intensity(&mut self, factor: f64) -> LumosResult<()> {
        if factor.is_sign_negative() || !factor.is_finite() {
            return Err(LumosError::Trace(
                "intensity factor must be >=0.0 and finite".into(),
            ));
        }
        self.intensity *= factor;
        Ok(())
    }
    /// Returns the accumulated phase (in radians) of this [`Ray`].
    #[must_use]
    pub const fn phase(&self) -> f64 {
        self.phase
    }
    /// Adds a phase shift (in radians).
    pub fn add_phase(&mut self, delta: f64) {
        self.phase += delta;
    }
    /// Returns the polarization state of this [`Ray`].
    #[must_use]
    pub const fn polarization(&self) -> Polarization {
        self.polarization
    }
    /// Sets the polarization state of this [`Ray`].
    pub fn set_polarization(&mut self, polarization: Polarization) {
        self.polarization = polarization;
    }
    /// Returns the number of bounces of this [`Ray`].
    #[must_use]
    pub const fn number_of_bounces(&self) -> usize {
        self.number_of_bounces
    }
    /// Returns the refractive index of the medium this [`Ray`] is propagating in.
    #[must_use]
    pub const fn refractive_index(&self) -> f64 {
        self.refractive_index
    }
    /// Sets the refractive index of the medium this [`Ray`] is propagating in.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given refractive index is < 1.0 or not finite.
    pub fn set_refractive_index(&mut self, refractive_index: f64) -> LumosResult<()> {
        if refractive_index < 1.0 || !refractive_index.is_finite() {
            return Err(LumosError::Configuration(
                "refractive index must be >=1.0 and finite".into(),
            ));
        }
        self.refractive_index = refractive_index;
        Ok(())
    }
    /// Returns the id of the source that emitted this [`Ray`] (or its ancestor).
    #[must_use]
    pub const fn source_id(&self) -> Option<Uuid> {
        self.source_id
    }
    /// Sets the source id of this [`Ray`].
    pub fn set_source_id(&mut self, source_id: Option<Uuid>) {
        self.source_id = source_id;
    }
    /// Returns `true` if this [`Ray`] is propagated even if its intensity drops below the threshold.
    #[must_use]
    pub const fn keep_alive(&self) -> bool {
        self.keep_alive
    }
    /// Sets the "ignore intensity floor" flag of this [`Ray`].
    pub fn set_keep_alive(&mut self, keep_alive: bool) {
        self.keep_alive = keep_alive;
    }
    /// Returns the beam profile of this [`Ray`] (if any).
    #[must_use]
    pub const fn beam(&self) -> Option<BeamProfile> {
        self.beam
    }
    /// Sets the beam profile of this [`Ray`].
    pub fn set_beam(&mut self, beam: Option<BeamProfile>) {
        self.beam = beam;
    }
    /// Returns the positions this [`Ray`] passed so far. The current position is not included.
    #[must_use]
    pub fn position_history(&self) -> &[Point2<f64>] {
        &self.pos_hist
    }
    /// Returns all waypoints of this [`Ray`] including the current position.
    #[must_use]
    pub fn waypoints(&self) -> Vec<Point2<f64>> {
        let mut waypoints = self.pos_hist.clone();
        waypoints.push(self.pos);
        waypoints
    }
    /// Vacuum wavelength expressed in scene units of the given length.
    #[must_use]
    pub fn wavelength_in_units(&self, length_unit: Length) -> f64 {
        (self.wavelength.effective() / length_unit).value
    }
    /// Propagate the [`Ray`] along its direction by the given distance (in scene units).
    ///
    /// The current position is added to the position history and the optical phase `2π·n·d/λ` is accumulated.
    /// `length_unit` is the physical length of one scene unit.
    ///
    /// # Errors
    ///
    /// This function will return an error if the distance is negative or not finite.
    pub fn propagate(&mut self, distance: f64, length_unit: Length) -> LumosResult<()> {
        if distance.is_sign_negative() || !distance.is_finite() {
            return Err(LumosError::Geometry(
                "propagation distance must be >=0.0 and finite".into(),
            ));
        }
        if distance.is_zero() {
            return Ok(());
        }
        self.pos_hist.push(self.pos);
        self.pos += self.dir * distance;
        let wavelength = self.wavelength_in_units(length_unit);
        self.phase += 2.0 * PI * self.refractive_index * distance / wavelength;
        self.beam = self.beam.map(|b| b.propagated(distance));
        Ok(())
    }
    /// Create a child ray starting at the current position with the given direction.
    ///
    /// All properties are inherited, the position history is cleared and the number of bounces is incremented.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given vector has zero length or is not finite.
    pub fn child(&self, direction: Vector2<f64>) -> LumosResult<Self> {
        self.teleported_child(self.pos, direction)
    }
    /// Create a child ray starting at the given position with the given direction.
    ///
    /// This is used by components that re-emit light at a different location (e.g. a fiber output).
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite or the direction zero or not finite.
    pub fn teleported_child(&self, origin: Point2<f64>, direction: Vector2<f64>) -> LumosResult<Self> {
        if !is_finite_vector(&origin.coords) {
            return Err(LumosError::Geometry("position must be finite".into()));
        }
        let mut child = self.clone();
        child.pos = origin;
        child.pos_hist.clear();
        child.dir = Self::checked_direction(direction)?;
        child.number_of_bounces = self.number_of_bounces.saturating_add(1);
        Ok(child)
    }
}
impl Display for Ray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pos: ({}, {}), dir: ({}, {}), intensity: {:.6}, wavelength: {}, bounces: {}",
            self.pos.x,
            self.pos.y,
            self.dir.x,
            self.dir.y,
            self.intensity,
            self.wavelength,
            self.number_of_bounces
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{degree, micrometer};
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};
    #[test]
    fn wavelength() {
        assert!(Wavelength::new(nanometer!(0.0)).is_err());
        assert!(Wavelength::new(nanometer!(-1.0)).is_err());
        assert!(Wavelength::new(nanometer!(f64::NAN)).is_err());
        assert_eq!(
            Wavelength::new(nanometer!(633.0)).unwrap().effective(),
            nanometer!(633.0)
        );
        assert_eq!(Wavelength::Broadband.effective(), nanometer!(550.0));
        assert!(Wavelength::Broadband.is_broadband());
        assert_eq!(format!("{}", Wavelength::Broadband), "broadband");
    }
    #[test]
    fn new() {
        let ray = Ray::new(
            point![1.0, 2.0],
            vector![0.0, 2.0],
            Wavelength::default(),
            1.0,
        )
        .unwrap();
        assert_eq!(ray.position(), point![1.0, 2.0]);
        assert_eq!(ray.direction(), vector![0.0, 1.0]);
        assert_eq!(ray.intensity(), 1.0);
        assert_eq!(ray.phase(), 0.0);
        assert_eq!(ray.number_of_bounces(), 0);
        assert_eq!(ray.refractive_index(), 1.0);
        assert!(ray.polarization().is_unpolarized());
        assert!(ray.position_history().is_empty());
        assert!(ray.source_id().is_none());
        assert!(!ray.keep_alive());
        assert!(ray.beam().is_none());
    }
    #[test]
    fn new_wrong() {
        let wvl = Wavelength::default();
        assert!(Ray::new(point![0.0, 0.0], vector![0.0, 0.0], wvl, 1.0).is_err());
        assert!(Ray::new(point![0.0, 0.0], vector![f64::NAN, 1.0], wvl, 1.0).is_err());
        assert!(Ray::new(point![f64::INFINITY, 0.0], vector![1.0, 0.0], wvl, 1.0).is_err());
        assert!(Ray::new(point![0.0, 0.0], vector![1.0, 0.0], wvl, -1.0).is_err());
        assert!(Ray::new(point![0.0, 0.0], vector![1.0, 0.0], wvl, f64::NAN).is_err());
        assert!(Ray::new(point![0.0, 0.0], vector![1.0, 0.0], wvl, 0.0).is_ok());
    }
    #[test]
    fn set_refractive_index() {
        let mut ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        assert!(ray.set_refractive_index(f64::NAN).is_err());
        assert!(ray.set_refractive_index(f64::INFINITY).is_err());
        assert!(ray.set_refractive_index(0.99).is_err());
        assert!(ray.set_refractive_index(2.0).is_ok());
        assert_eq!(ray.refractive_index(), 2.0);
    }
    #[test]
    fn intensity() {
        let mut ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        assert!(ray.scale_intensity(-0.5).is_err());
        assert!(ray.set_intensity(f64::INFINITY).is_err());
        ray.scale_intensity(0.25).unwrap();
        assert_eq!(ray.intensity(), 0.25);
    }
    #[test]
    fn propagate() {
        let mut ray = Ray::origin_along_x(Wavelength::new(nanometer!(500.0)).unwrap(), 1.0).unwrap();
        assert!(ray.propagate(-1.0, micrometer!(1.0)).is_err());
        assert!(ray.propagate(f64::NAN, micrometer!(1.0)).is_err());
        ray.propagate(0.0, micrometer!(1.0)).unwrap();
        assert!(ray.position_history().is_empty());
        ray.propagate(1.0, micrometer!(1.0)).unwrap();
        assert_eq!(ray.position(), point![1.0, 0.0]);
        assert_eq!(ray.position_history(), &[point![0.0, 0.0]]);
        // 1 µm = 2 wavelengths
        assert_abs_diff_eq!(ray.phase(), 4.0 * PI, epsilon = 1e-9);
        ray.set_refractive_index(1.5).unwrap();
        ray.propagate(1.0, micrometer!(1.0)).unwrap();
        assert_abs_diff_eq!(ray.phase(), 10.0 * PI, epsilon = 1e-9);
        assert_eq!(
            ray.waypoints(),
            vec![point![0.0, 0.0], point![1.0, 0.0], point![2.0, 0.0]]
        );
    }
    #[test]
    fn propagate_gaussian() {
        let mut ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        ray.set_beam(Some(BeamProfile::gaussian_at_waist(2.0, 0.55, 1.0).unwrap()));
        ray.propagate(5.0, micrometer!(1.0)).unwrap();
        let Some(BeamProfile::Gaussian {
            distance_from_waist,
            ..
        }) = ray.beam()
        else {
            panic!("expected Gaussian beam")
        };
        assert_eq!(distance_from_waist, 5.0);
        assert!(ray.beam().unwrap().radius() > 2.0);
    }
    #[test]
    fn child() {
        let mut ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        ray.set_polarization(Polarization::linear(degree!(20.0)));
        ray.propagate(10.0, micrometer!(1.0)).unwrap();
        let child = ray.child(vector![0.0, -3.0]).unwrap();
        assert_eq!(child.position(), point![10.0, 0.0]);
        assert_eq!(child.direction(), vector![0.0, -1.0]);
        assert_eq!(child.number_of_bounces(), 1);
        assert!(child.position_history().is_empty());
        assert_eq!(child.phase(), ray.phase());
        assert_eq!(child.polarization(), ray.polarization());
        assert!(ray.child(vector![0.0, 0.0]).is_err());
        let teleported = child
            .teleported_child(point![-5.0, 5.0], vector![1.0, 0.0])
            .unwrap();
        assert_eq!(teleported.position(), point![-5.0, 5.0]);
        assert_eq!(teleported.number_of_bounces(), 2);
    }
    #[test]
    fn display() {
        let ray = Ray::origin_along_x(Wavelength::Broadband, 1.0).unwrap();
        assert_eq!(
            format!("{ray}"),
            "pos: (0, 0), dir: (1, 0), intensity: 1.000000, wavelength: broadband, bounces: 0"
        );
    }
}
