//! Configuration of the ray tracer
use nalgebra::{Point2, Vector2};
use num::Zero;
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use crate::{
    error::{LumosError, LumosResult},
    micrometer,
    utils::math_utils::is_finite_vector,
};

/// Axis-aligned box limiting how far escaping rays are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBounds {
    min: Point2<f64>,
    max: Point2<f64>,
}
impl ViewBounds {
    /// Creates new [`ViewBounds`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the corners are not finite or `min` is not smaller than `max`.
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> LumosResult<Self> {
        if !is_finite_vector(&min.coords) || !is_finite_vector(&max.coords) {
            return Err(LumosError::Configuration(
                "view bounds must be finite".into(),
            ));
        }
        if min.x >= max.x || min.y >= max.y {
            return Err(LumosError::Configuration(
                "view bounds must have a positive extent".into(),
            ));
        }
        Ok(Self { min, max })
    }
    /// Returns the lower left corner.
    #[must_use]
    pub const fn min(&self) -> Point2<f64> {
        self.min
    }
    /// Returns the upper right corner.
    #[must_use]
    pub const fn max(&self) -> Point2<f64> {
        self.max
    }
    /// Distance along the ray until it leaves the box (slab method).
    ///
    /// Returns `0.0` if the ray never crosses the box ahead of its origin.
    #[must_use]
    pub fn exit_distance(&self, origin: &Point2<f64>, direction: &Vector2<f64>) -> f64 {
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;
        for axis in 0..2 {
            let (o, d) = (origin[axis], direction[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < f64::EPSILON {
                if o < lo || o > hi {
                    return 0.0;
                }
                continue;
            }
            let t0 = (lo - o) / d;
            let t1 = (hi - o) / d;
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
        }
        if t_far < t_near.max(0.0) || !t_far.is_finite() {
            0.0
        } else {
            t_far
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
/// Configuration data for a ray tracing pass.
///
/// The config contains the following info
///   - minimum intensity / ray
///   - maximum number of bounces / ray lineage
///   - maximum number of rays / pass
///   - maximum number of rays / source
///   - physical length of one scene unit
///   - refractive index of the ambient medium
///   - minimum hit distance (self-intersection epsilon)
///   - drawing length and optional view bounds for escaping rays
pub struct RayTraceConfig {
    min_intensity_per_ray: f64,
    max_number_of_bounces: usize,
    max_rays_per_pass: usize,
    max_rays_per_source: usize,
    length_unit: Length,
    ambient_refractive_index: f64,
    min_hit_distance: f64,
    escape_length: f64,
    view_bounds: Option<ViewBounds>,
}
impl Default for RayTraceConfig {
    /// Create a default config for a ray tracing pass with the following parameters:
    ///   - minimum intensity / ray: `1e-4`
    ///   - maximum number of bounces / ray: `100`
    ///   - maximum number of rays / pass: `20000`
    ///   - maximum number of rays / source: `1000`
    ///   - length unit: `1 µm`
    ///   - ambient refractive index: `1.0`
    ///   - minimum hit distance: `1e-6`
    ///   - escape length: `10000`, no view bounds
    fn default() -> Self {
        Self {
            min_intensity_per_ray: 1e-4,
            max_number_of_bounces: 100,
            max_rays_per_pass: 20_000,
            max_rays_per_source: 1000,
            length_unit: micrometer!(1.0),
            ambient_refractive_index: 1.0,
            min_hit_distance: 1e-6,
            escape_length: 10_000.0,
            view_bounds: None,
        }
    }
}
impl RayTraceConfig {
    /// Returns the lower limit for ray intensities. Rays with intensities lower than this limit will be dropped.
    #[must_use]
    pub const fn min_intensity_per_ray(&self) -> f64 {
        self.min_intensity_per_ray
    }
    /// Sets the min intensity per ray. Rays with intensities lower than this limit will be dropped.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given limit is negative or not finite.
    pub fn set_min_intensity_per_ray(&mut self, min_intensity_per_ray: f64) -> LumosResult<()> {
        if !min_intensity_per_ray.is_finite() || min_intensity_per_ray.is_sign_negative() {
            return Err(LumosError::Configuration(
                "minimum intensity must be >=0.0 and finite".into(),
            ));
        }
        self.min_intensity_per_ray = min_intensity_per_ray;
        Ok(())
    }
    /// Returns the maximum number of bounces of this [`RayTraceConfig`].
    #[must_use]
    pub const fn max_number_of_bounces(&self) -> usize {
        self.max_number_of_bounces
    }
    /// Sets the max number of bounces of this [`RayTraceConfig`].
    pub fn set_max_number_of_bounces(&mut self, max_number_of_bounces: usize) {
        self.max_number_of_bounces = max_number_of_bounces;
    }
    /// Returns the maximum number of rays processed in one pass.
    #[must_use]
    pub const fn max_rays_per_pass(&self) -> usize {
        self.max_rays_per_pass
    }
    /// Sets the maximum number of rays processed in one pass.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given number is zero.
    pub fn set_max_rays_per_pass(&mut self, max_rays_per_pass: usize) -> LumosResult<()> {
        if max_rays_per_pass.is_zero() {
            return Err(LumosError::Configuration(
                "maximum number of rays per pass must be >0".into(),
            ));
        }
        self.max_rays_per_pass = max_rays_per_pass;
        Ok(())
    }
    /// Returns the maximum number of rays a single source may emit.
    #[must_use]
    pub const fn max_rays_per_source(&self) -> usize {
        self.max_rays_per_source
    }
    /// Sets the maximum number of rays a single source may emit.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given number is zero.
    pub fn set_max_rays_per_source(&mut self, max_rays_per_source: usize) -> LumosResult<()> {
        if max_rays_per_source.is_zero() {
            return Err(LumosError::Configuration(
                "maximum number of rays per source must be >0".into(),
            ));
        }
        self.max_rays_per_source = max_rays_per_source;
        Ok(())
    }
    /// Returns the physical length of one scene unit.
    #[must_use]
    pub const fn length_unit(&self) -> Length {
        self.length_unit
    }
    /// Sets the physical length of one scene unit.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given length is <= 0.0 or not finite.
    pub fn set_length_unit(&mut self, length_unit: Length) -> LumosResult<()> {
        if length_unit.is_zero() || length_unit.is_sign_negative() || !length_unit.is_finite() {
            return Err(LumosError::Configuration(
                "length unit must be >0.0 and finite".into(),
            ));
        }
        self.length_unit = length_unit;
        Ok(())
    }
    /// Returns the refractive index of the ambient medium.
    #[must_use]
    pub const fn ambient_refractive_index(&self) -> f64 {
        self.ambient_refractive_index
    }
    /// Sets the refractive index of the ambient medium.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given index is < 1.0 or not finite.
    pub fn set_ambient_refractive_index(&mut self, ambient_refractive_index: f64) -> LumosResult<()> {
        if ambient_refractive_index < 1.0 || !ambient_refractive_index.is_finite() {
            return Err(LumosError::Configuration(
                "ambient refractive index must be >=1.0 and finite".into(),
            ));
        }
        self.ambient_refractive_index = ambient_refractive_index;
        Ok(())
    }
    /// Returns the minimum distance of a valid intersection.
    #[must_use]
    pub const fn min_hit_distance(&self) -> f64 {
        self.min_hit_distance
    }
    /// Sets the minimum distance of a valid intersection.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given distance is <= 0.0 or not finite.
    pub fn set_min_hit_distance(&mut self, min_hit_distance: f64) -> LumosResult<()> {
        if min_hit_distance <= 0.0 || !min_hit_distance.is_finite() {
            return Err(LumosError::Configuration(
                "minimum hit distance must be >0.0 and finite".into(),
            ));
        }
        self.min_hit_distance = min_hit_distance;
        Ok(())
    }
    /// Returns the length escaping rays are drawn with.
    #[must_use]
    pub const fn escape_length(&self) -> f64 {
        self.escape_length
    }
    /// Sets the length escaping rays are drawn with.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given length is negative or not finite.
    pub fn set_escape_length(&mut self, escape_length: f64) -> LumosResult<()> {
        if escape_length.is_sign_negative() || !escape_length.is_finite() {
            return Err(LumosError::Configuration(
                "escape length must be >=0.0 and finite".into(),
            ));
        }
        self.escape_length = escape_length;
        Ok(())
    }
    /// Returns the view bounds (if any).
    #[must_use]
    pub const fn view_bounds(&self) -> Option<ViewBounds> {
        self.view_bounds
    }
    /// Sets the view bounds.
    pub fn set_view_bounds(&mut self, view_bounds: Option<ViewBounds>) {
        self.view_bounds = view_bounds;
    }
    /// Distance an escaping ray is drawn: the escape length, clipped to the view bounds.
    #[must_use]
    pub fn escape_distance(&self, origin: &Point2<f64>, direction: &Vector2<f64>) -> f64 {
        self.view_bounds.map_or(self.escape_length, |bounds| {
            bounds.exit_distance(origin, direction).min(self.escape_length)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};
    #[test]
    fn ray_tracing_config_default() {
        let rt_conf = RayTraceConfig::default();
        assert_eq!(rt_conf.min_intensity_per_ray(), 1e-4);
        assert_eq!(rt_conf.max_number_of_bounces(), 100);
        assert_eq!(rt_conf.max_rays_per_pass(), 20_000);
        assert_eq!(rt_conf.max_rays_per_source(), 1000);
        assert_eq!(rt_conf.length_unit(), micrometer!(1.0));
        assert_eq!(rt_conf.ambient_refractive_index(), 1.0);
        assert_eq!(rt_conf.min_hit_distance(), 1e-6);
        assert_eq!(rt_conf.escape_length(), 10_000.0);
        assert!(rt_conf.view_bounds().is_none());
    }
    #[test]
    fn ray_tracing_config_set_min_intensity() {
        let mut rt_conf = RayTraceConfig::default();
        assert!(rt_conf.set_min_intensity_per_ray(-0.1).is_err());
        assert!(rt_conf.set_min_intensity_per_ray(f64::NAN).is_err());
        assert!(rt_conf.set_min_intensity_per_ray(f64::INFINITY).is_err());
        assert!(rt_conf.set_min_intensity_per_ray(0.0).is_ok());
        assert!(rt_conf.set_min_intensity_per_ray(0.2).is_ok());
        assert_eq!(rt_conf.min_intensity_per_ray, 0.2);
    }
    #[test]
    fn ray_tracing_config_setters() {
        let mut rt_conf = RayTraceConfig::default();
        rt_conf.set_max_number_of_bounces(123);
        assert_eq!(rt_conf.max_number_of_bounces, 123);
        assert!(rt_conf.set_max_rays_per_pass(0).is_err());
        assert!(rt_conf.set_max_rays_per_source(0).is_err());
        rt_conf.set_max_rays_per_pass(10).unwrap();
        rt_conf.set_max_rays_per_source(5).unwrap();
        assert_eq!(rt_conf.max_rays_per_pass(), 10);
        assert_eq!(rt_conf.max_rays_per_source(), 5);
        assert!(rt_conf.set_length_unit(micrometer!(0.0)).is_err());
        assert!(rt_conf.set_length_unit(micrometer!(f64::NAN)).is_err());
        assert!(rt_conf.set_ambient_refractive_index(0.9).is_err());
        assert!(rt_conf.set_min_hit_distance(0.0).is_err());
        assert!(rt_conf.set_escape_length(-1.0).is_err());
        rt_conf.set_ambient_refractive_index(1.33).unwrap();
        assert_eq!(rt_conf.ambient_refractive_index(), 1.33);
    }
    #[test]
    fn view_bounds_new() {
        assert!(ViewBounds::new(point![0.0, 0.0], point![0.0, 1.0]).is_err());
        assert!(ViewBounds::new(point![f64::NAN, 0.0], point![1.0, 1.0]).is_err());
        assert!(ViewBounds::new(point![-1.0, -1.0], point![1.0, 1.0]).is_ok());
    }
    #[test]
    fn view_bounds_exit() {
        let b = ViewBounds::new(point![-10.0, -10.0], point![10.0, 10.0]).unwrap();
        assert_abs_diff_eq!(b.exit_distance(&point![0.0, 0.0], &vector![1.0, 0.0]), 10.0);
        assert_abs_diff_eq!(
            b.exit_distance(&point![0.0, 0.0], &vector![1.0, 1.0].normalize()),
            10.0 * 2.0_f64.sqrt(),
            epsilon = 1e-12
        );
        // outside, moving away
        assert_eq!(b.exit_distance(&point![20.0, 0.0], &vector![1.0, 0.0]), 0.0);
        // outside, parallel to the box
        assert_eq!(b.exit_distance(&point![0.0, 20.0], &vector![1.0, 0.0]), 0.0);
        // outside, moving through the box
        assert_abs_diff_eq!(b.exit_distance(&point![-20.0, 0.0], &vector![1.0, 0.0]), 30.0);
    }
    #[test]
    fn escape_distance() {
        let mut rt_conf = RayTraceConfig::default();
        assert_eq!(rt_conf.escape_distance(&point![0.0, 0.0], &vector![1.0, 0.0]), 10_000.0);
        rt_conf.set_view_bounds(Some(
            ViewBounds::new(point![-10.0, -10.0], point![10.0, 10.0]).unwrap(),
        ));
        assert_abs_diff_eq!(rt_conf.escape_distance(&point![0.0, 0.0], &vector![1.0, 0.0]), 10.0);
    }
    #[test]
    fn serialize() {
        let rt_conf = RayTraceConfig::default();
        let yaml = serde_yaml::to_string(&rt_conf).unwrap();
        let back: RayTraceConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, rt_conf);
        let partial: RayTraceConfig = serde_yaml::from_str("max_number_of_bounces: 7").unwrap();
        assert_eq!(partial.max_number_of_bounces(), 7);
        assert_eq!(partial.max_rays_per_pass(), 20_000);
    }
}
