#![warn(missing_docs)]
//! Laser sources generating the initial rays of a trace pass.
use log::warn;
use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};
use uuid::Uuid;

use crate::{
    analyzers::RayTraceConfig,
    degree,
    error::{LumosError, LumosResult},
    polarization::Polarization,
    ray::{BeamProfile, Ray, Wavelength},
    utils::{
        geom_transformation::Placement,
        math_utils::{rotate_2d, usize_to_f64},
    },
};

/// Spatial / angular distribution of the emitted rays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BeamShape {
    /// parallel rays evenly distributed over the given width (edges included)
    Collimated {
        /// full width of the ray bundle
        width: f64,
    },
    /// rays emitted from the placement position, evenly distributed over the given full angle
    Point {
        /// full opening angle of the fan
        spread: Angle,
    },
}
impl Default for BeamShape {
    fn default() -> Self {
        Self::Collimated { width: 0.0 }
    }
}

/// A laser source.
///
/// The source emits its total intensity split evenly over `ray_count` rays along the optical axis of its
/// placement. All rays start in phase with the same polarization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserSource {
    name: String,
    uuid: Uuid,
    #[serde(default = "enabled_default")]
    enabled: bool,
    #[serde(default)]
    placement: Placement,
    wavelength: Wavelength,
    intensity: f64,
    ray_count: usize,
    #[serde(default)]
    shape: BeamShape,
    #[serde(default)]
    polarization: Polarization,
    #[serde(default)]
    gaussian_waist: Option<f64>,
    #[serde(default)]
    keep_alive: bool,
}
const fn enabled_default() -> bool {
    true
}
impl Default for LaserSource {
    fn default() -> Self {
        Self {
            name: "Laser".into(),
            uuid: Uuid::new_v4(),
            enabled: true,
            placement: Placement::default(),
            wavelength: Wavelength::default(),
            intensity: 1.0,
            ray_count: 1,
            shape: BeamShape::default(),
            polarization: Polarization::default(),
            gaussian_waist: None,
            keep_alive: false,
        }
    }
}
impl LaserSource {
    /// Creates a new single ray [`LaserSource`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the intensity is negative or not finite.
    pub fn new(
        name: &str,
        placement: Placement,
        wavelength: Wavelength,
        intensity: f64,
    ) -> LumosResult<Self> {
        let mut source = Self {
            name: name.into(),
            placement,
            wavelength,
            ..Self::default()
        };
        source.set_intensity(intensity)?;
        Ok(source)
    }
    /// Returns the name of this [`LaserSource`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Returns the id of this [`LaserSource`].
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }
    /// Returns `true` if this [`LaserSource`] emits rays.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }
    /// Switch this [`LaserSource`] on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    /// Returns the [`Placement`] of this [`LaserSource`].
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }
    /// Sets the [`Placement`] of this [`LaserSource`].
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }
    /// Returns the [`Wavelength`] of this [`LaserSource`].
    #[must_use]
    pub const fn wavelength(&self) -> Wavelength {
        self.wavelength
    }
    /// Sets the [`Wavelength`] of this [`LaserSource`].
    pub fn set_wavelength(&mut self, wavelength: Wavelength) {
        self.wavelength = wavelength;
    }
    /// Returns the total intensity of this [`LaserSource`].
    #[must_use]
    pub const fn intensity(&self) -> f64 {
        self.intensity
    }
    /// Sets the total intensity of this [`LaserSource`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the intensity is negative or not finite.
    pub fn set_intensity(&mut self, intensity: f64) -> LumosResult<()> {
        if intensity.is_sign_negative() || !intensity.is_finite() {
            return Err(LumosError::Configuration(
                "source intensity must be >=0.0 and finite".into(),
            ));
        }
        self.intensity = intensity;
        Ok(())
    }
    /// Returns the number of rays of this [`LaserSource`].
    #[must_use]
    pub const fn ray_count(&self) -> usize {
        self.ray_count
    }
    /// Sets the number of rays emitted by this [`LaserSource`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the number of rays is zero.
    pub fn set_ray_count(&mut self, ray_count: usize) -> LumosResult<()> {
        if ray_count == 0 {
            return Err(LumosError::Configuration(
                "number of rays must be >0".into(),
            ));
        }
        self.ray_count = ray_count;
        Ok(())
    }
    /// Returns the [`BeamShape`] of this [`LaserSource`].
    #[must_use]
    pub const fn shape(&self) -> BeamShape {
        self.shape
    }
    /// Sets the [`BeamShape`] of this [`LaserSource`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the width is negative or not finite or the spread not within
    /// `[0°, 360°)`.
    pub fn set_shape(&mut self, shape: BeamShape) -> LumosResult<()> {
        match shape {
            BeamShape::Collimated { width } => {
                if width.is_sign_negative() || !width.is_finite() {
                    return Err(LumosError::Configuration(
                        "beam width must be >=0.0 and finite".into(),
                    ));
                }
            }
            BeamShape::Point { spread } => {
                if !spread.is_finite() || spread < degree!(0.0) || spread >= degree!(360.0) {
                    return Err(LumosError::Configuration(
                        "angular spread must be within [0°, 360°)".into(),
                    ));
                }
            }
        }
        self.shape = shape;
        Ok(())
    }
    /// Returns the initial [`Polarization`] of the emitted rays.
    #[must_use]
    pub const fn polarization(&self) -> Polarization {
        self.polarization
    }
    /// Sets the initial polarization of the emitted rays.
    ///
    /// Scalar (legacy) descriptions are promoted to a Jones vector.
    pub fn set_polarization(&mut self, polarization: impl Into<Polarization>) {
        self.polarization = polarization.into();
    }
    /// Returns the Gaussian waist radius of the emitted rays (if any).
    #[must_use]
    pub const fn gaussian_waist(&self) -> Option<f64> {
        self.gaussian_waist
    }
    /// Let the emitted rays carry a Gaussian beam profile with its waist at the source.
    ///
    /// # Errors
    ///
    /// This function will return an error if the waist radius is <= 0.0 or not finite.
    pub fn set_gaussian_waist(&mut self, waist_radius: Option<f64>) -> LumosResult<()> {
        if let Some(w0) = waist_radius {
            if w0 <= 0.0 || !w0.is_finite() {
                return Err(LumosError::Configuration(
                    "waist radius must be >0.0 and finite".into(),
                ));
            }
        }
        self.gaussian_waist = waist_radius;
        Ok(())
    }
    /// Returns `true` if the emitted rays ignore the intensity threshold.
    #[must_use]
    pub const fn keep_alive(&self) -> bool {
        self.keep_alive
    }
    /// Let the emitted rays ignore (or respect) the intensity threshold.
    pub fn set_keep_alive(&mut self, keep_alive: bool) {
        self.keep_alive = keep_alive;
    }
    /// Check the values of this [`LaserSource`] against the constraints of its setters.
    ///
    /// Sources read from a scene document bypass the setters and must be validated before use.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the values would have been rejected by the corresponding
    /// setter.
    pub fn validate(&self) -> LumosResult<()> {
        let mut checked = Self::default();
        checked.set_placement(Placement::new(
            self.placement.position(),
            self.placement.angle(),
        )?);
        if let Wavelength::Monochromatic(wavelength) = self.wavelength {
            checked.set_wavelength(Wavelength::new(wavelength)?);
        }
        checked.set_intensity(self.intensity)?;
        checked.set_ray_count(self.ray_count)?;
        checked.set_shape(self.shape)?;
        checked.set_gaussian_waist(self.gaussian_waist)?;
        Ok(())
    }
    /// Generate the ordered list of initial rays.
    ///
    /// A disabled source emits nothing. The number of rays is capped by the `max_rays_per_source` setting of the
    /// given config.
    ///
    /// # Errors
    ///
    /// This function will return an error if a ray cannot be constructed (e.g. due to invalid values read from a
    /// scene document).
    pub fn generate_rays(&self, config: &RayTraceConfig) -> LumosResult<Vec<Ray>> {
        if !self.enabled {
            return Ok(Vec::new());
        }
        let mut nr_of_rays = self.ray_count;
        if nr_of_rays > config.max_rays_per_source() {
            warn!(
                "source '{}' requests {} rays, limited to {}",
                self.name,
                nr_of_rays,
                config.max_rays_per_source()
            );
            nr_of_rays = config.max_rays_per_source();
        }
        if nr_of_rays == 0 {
            return Ok(Vec::new());
        }
        let ray_intensity = self.intensity / usize_to_f64(nr_of_rays);
        let beam = self
            .gaussian_waist
            .map(|w0| {
                BeamProfile::gaussian_at_waist(
                    w0,
                    (self.wavelength.effective() / config.length_unit()).value,
                    config.ambient_refractive_index(),
                )
            })
            .transpose()?;
        let normal = self.placement.normal();
        let mut rays = Vec::with_capacity(nr_of_rays);
        for i in 0..nr_of_rays {
            let fraction = if nr_of_rays == 1 {
                0.0
            } else {
                usize_to_f64(i) / usize_to_f64(nr_of_rays - 1) - 0.5
            };
            let (position, direction) = match self.shape {
                BeamShape::Collimated { width } => {
                    (self.placement.to_global(0.0, fraction * width), normal)
                }
                BeamShape::Point { spread } => (
                    self.placement.position(),
                    rotate_2d(&normal, fraction * spread.get::<radian>()),
                ),
            };
            let mut ray = Ray::new(position, direction, self.wavelength, ray_intensity)?;
            ray.set_polarization(self.polarization);
            ray.set_source_id(Some(self.uuid));
            ray.set_keep_alive(self.keep_alive);
            ray.set_refractive_index(config.ambient_refractive_index())?;
            ray.set_beam(beam);
            rays.push(ray);
        }
        Ok(rays)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{nanometer, polarization::LegacyPolarization, utils::test_helper::test_helper::check_warnings};
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;
    use nalgebra::{point, vector};
    use uom::si::angle::degree;

    fn laser() -> LaserSource {
        LaserSource::new(
            "laser",
            Placement::new(point![0.0, 0.0], degree!(0.0)).unwrap(),
            Wavelength::new(nanometer!(550.0)).unwrap(),
            1.0,
        )
        .unwrap()
    }
    #[test]
    fn default() {
        let s = LaserSource::default();
        assert!(s.enabled());
        assert_eq!(s.ray_count(), 1);
        assert_eq!(s.intensity(), 1.0);
        assert!(s.polarization().is_unpolarized());
        assert!(!s.keep_alive());
    }
    #[test]
    fn setters() {
        let mut s = laser();
        assert!(s.set_intensity(-1.0).is_err());
        assert!(s.set_intensity(f64::NAN).is_err());
        assert!(s.set_ray_count(0).is_err());
        assert!(s.set_shape(BeamShape::Collimated { width: -1.0 }).is_err());
        assert!(s
            .set_shape(BeamShape::Point {
                spread: degree!(360.0)
            })
            .is_err());
        assert!(s.set_gaussian_waist(Some(0.0)).is_err());
        assert!(s.set_gaussian_waist(None).is_ok());
    }
    #[test]
    fn validate() {
        assert!(laser().validate().is_ok());
        let yaml = serde_yaml::to_string(&laser()).unwrap();
        let malformed: LaserSource =
            serde_yaml::from_str(&yaml.replace("intensity: 1.0", "intensity: -1.0")).unwrap();
        assert!(malformed.validate().is_err());
        let malformed: LaserSource =
            serde_yaml::from_str(&yaml.replace("ray_count: 1", "ray_count: 0")).unwrap();
        assert!(malformed.validate().is_err());
        let malformed: LaserSource = serde_yaml::from_str(
            &yaml.replace("gaussian_waist: null", "gaussian_waist: -2.0"),
        )
        .unwrap();
        assert!(malformed.validate().is_err());
    }
    #[test]
    fn single_ray() {
        let s = laser();
        let rays = s.generate_rays(&RayTraceConfig::default()).unwrap();
        assert_eq!(rays.len(), 1);
        assert_eq!(rays[0].position(), point![0.0, 0.0]);
        assert_abs_diff_eq!(rays[0].direction(), vector![1.0, 0.0], epsilon = 1e-12);
        assert_eq!(rays[0].source_id(), Some(s.uuid()));
        assert_eq!(rays[0].number_of_bounces(), 0);
    }
    #[test]
    fn collimated() {
        let mut s = laser();
        s.set_ray_count(3).unwrap();
        s.set_shape(BeamShape::Collimated { width: 20.0 }).unwrap();
        let rays = s.generate_rays(&RayTraceConfig::default()).unwrap();
        let ys = rays.iter().map(|r| r.position().y).collect_vec();
        assert_abs_diff_eq!(ys[0], -10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ys[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ys[2], 10.0, epsilon = 1e-12);
        let total: f64 = rays.iter().map(Ray::intensity).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
        assert!(rays.iter().all(|r| r.phase() == 0.0));
    }
    #[test]
    fn point_source() {
        let mut s = laser();
        s.set_ray_count(5).unwrap();
        s.set_shape(BeamShape::Point {
            spread: degree!(40.0),
        })
        .unwrap();
        let rays = s.generate_rays(&RayTraceConfig::default()).unwrap();
        let angles = rays
            .iter()
            .map(|r| r.direction().y.atan2(r.direction().x).to_degrees())
            .collect_vec();
        for (angle, expected) in angles.iter().zip([-20.0, -10.0, 0.0, 10.0, 20.0]) {
            assert_abs_diff_eq!(*angle, expected, epsilon = 1e-9);
        }
        assert!(rays.iter().all(|r| r.position() == point![0.0, 0.0]));
    }
    #[test]
    fn disabled_source() {
        let mut s = laser();
        s.set_enabled(false);
        assert!(s.generate_rays(&RayTraceConfig::default()).unwrap().is_empty());
    }
    #[test]
    fn ray_count_is_capped() {
        testing_logger::setup();
        let mut config = RayTraceConfig::default();
        config.set_max_rays_per_source(10).unwrap();
        let mut s = laser();
        s.set_ray_count(50).unwrap();
        let rays = s.generate_rays(&config).unwrap();
        assert_eq!(rays.len(), 10);
        assert_abs_diff_eq!(rays[0].intensity(), 0.1, epsilon = 1e-12);
        check_warnings(vec!["source 'laser' requests 50 rays, limited to 10"]);
    }
    #[test]
    fn ray_properties() {
        let mut s = laser();
        s.set_polarization(LegacyPolarization::Linear(degree!(30.0)));
        s.set_keep_alive(true);
        s.set_gaussian_waist(Some(5.0)).unwrap();
        let ray = s.generate_rays(&RayTraceConfig::default()).unwrap().remove(0);
        assert!(ray.keep_alive());
        assert_abs_diff_eq!(
            ray.polarization().linear_angle().unwrap().get::<degree>(),
            30.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(ray.beam().unwrap().radius(), 5.0, epsilon = 1e-12);
    }
}
