//! Breadth-first ray tracer
//!
//! Rays are processed from a work queue. For each ray the nearest intersection over all components is
//! determined. The hit component computes the interaction, which terminates the ray and possibly returns child
//! rays. Children are enqueued unless they fall below the intensity threshold, reach the bounce ceiling or the
//! ray budget of the pass is exhausted.
use std::{collections::VecDeque, fmt::Display};

use log::{debug, info, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RayTraceConfig;
use crate::{
    optic_component::{Hit, OpticalComponent, Termination},
    ray::{Ray, Wavelength},
};

/// A finished ray segment as handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaySegment {
    /// ordered waypoints from the origin to the end point of the ray
    pub waypoints: Vec<Point2<f64>>,
    /// wavelength of the ray
    pub wavelength: Wavelength,
    /// intensity of the ray
    pub intensity: f64,
    /// accumulated phase at the end point
    pub phase: f64,
    /// number of bounces of the ray
    pub bounces: usize,
    /// id of the emitting source
    pub source_id: Option<Uuid>,
    /// reason of the termination
    pub termination: Termination,
}
impl RaySegment {
    fn new(ray: &Ray, termination: Termination) -> Self {
        Self {
            waypoints: ray.waypoints(),
            wavelength: ray.wavelength(),
            intensity: ray.intensity(),
            phase: ray.phase(),
            bounces: ray.number_of_bounces(),
            source_id: ray.source_id(),
            termination,
        }
    }
}

/// Counters of a trace pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStatistics {
    /// rays taken from the work queue
    pub processed: usize,
    /// rays leaving the scene
    pub escaped: usize,
    /// rays that interacted with a component
    pub interacted: usize,
    /// rays absorbed by a component
    pub absorbed: usize,
    /// rays absorbed by a detector
    pub detected: usize,
    /// rays dropped due to the intensity threshold
    pub below_threshold: usize,
    /// rays dropped due to the bounce ceiling
    pub max_bounces: usize,
    /// rays dropped since the ray budget of the pass was exhausted
    pub budget_exhausted: usize,
    /// rays aborted due to invalid geometry
    pub aborted: usize,
    /// rays hitting a component without defined interaction
    pub unhandled: usize,
}
impl TraceStatistics {
    fn count(&mut self, termination: &Termination) {
        match termination {
            Termination::Escaped => self.escaped += 1,
            Termination::Interacted => self.interacted += 1,
            Termination::Absorbed => self.absorbed += 1,
            Termination::Detected => self.detected += 1,
            Termination::BelowThreshold => self.below_threshold += 1,
            Termination::MaxBounces => self.max_bounces += 1,
            Termination::RayBudgetExhausted => self.budget_exhausted += 1,
            Termination::InvalidGeometry(_) => self.aborted += 1,
            Termination::Unhandled(_) => self.unhandled += 1,
        }
    }
}
impl Display for TraceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "processed: {}, escaped: {}, interacted: {}, absorbed: {}, detected: {}, dropped (intensity): {}, dropped (bounces): {}, dropped (budget): {}, aborted: {}, unhandled: {}",
            self.processed,
            self.escaped,
            self.interacted,
            self.absorbed,
            self.detected,
            self.below_threshold,
            self.max_bounces,
            self.budget_exhausted,
            self.aborted,
            self.unhandled
        )
    }
}

/// Result of a trace pass
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// all finished ray segments
    pub segments: Vec<RaySegment>,
    /// counters of the pass
    pub statistics: TraceStatistics,
}

/// Breadth-first ray tracer for a single pass
#[derive(Debug)]
pub struct RayTracer<'a> {
    config: &'a RayTraceConfig,
    queue: VecDeque<Ray>,
    enqueued: usize,
    budget_warned: bool,
    result: TraceResult,
}
impl<'a> RayTracer<'a> {
    /// Creates a new [`RayTracer`] with the given config.
    #[must_use]
    pub fn new(config: &'a RayTraceConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            enqueued: 0,
            budget_warned: false,
            result: TraceResult::default(),
        }
    }
    /// Trace the given rays through the components until the work queue is empty.
    #[must_use]
    pub fn trace(
        mut self,
        rays: Vec<Ray>,
        components: &mut [Box<dyn OpticalComponent>],
    ) -> TraceResult {
        info!(
            "Tracing {} rays through {} components.",
            rays.len(),
            components.len()
        );
        for ray in rays {
            self.enqueue(ray);
        }
        while let Some(ray) = self.queue.pop_front() {
            self.result.statistics.processed += 1;
            self.process(ray, components);
        }
        info!("Trace finished: {}", self.result.statistics);
        self.result
    }
    fn nearest_hit(
        &self,
        ray: &Ray,
        components: &[Box<dyn OpticalComponent>],
    ) -> Option<(usize, Hit)> {
        let min_distance = self.config.min_hit_distance();
        components
            .iter()
            .enumerate()
            .filter_map(|(idx, component)| {
                component
                    .intersect(ray, min_distance)
                    .filter(|hit| hit.distance.is_finite() && hit.distance > min_distance)
                    .map(|hit| (idx, hit))
            })
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))
    }
    fn process(&mut self, mut ray: Ray, components: &mut [Box<dyn OpticalComponent>]) {
        let length_unit = self.config.length_unit();
        let Some((idx, hit)) = self.nearest_hit(&ray, components) else {
            let distance = self
                .config
                .escape_distance(&ray.position(), &ray.direction());
            let termination = match ray.propagate(distance, length_unit) {
                Ok(()) => Termination::Escaped,
                Err(e) => Termination::InvalidGeometry(e.to_string()),
            };
            self.record(&ray, termination);
            return;
        };
        if let Err(e) = ray.propagate(hit.distance, length_unit) {
            warn!("ray aborted: {e}");
            self.record(&ray, Termination::InvalidGeometry(e.to_string()));
            return;
        }
        let component = &mut components[idx];
        match component.interact(&ray, &hit, self.config) {
            Ok(interaction) => {
                for child in interaction.children {
                    self.enqueue(child);
                }
                self.record(&ray, interaction.termination);
            }
            Err(e) => {
                warn!("ray aborted at {} ({}): {e}", component.name(), component.kind());
                self.record(&ray, Termination::InvalidGeometry(e.to_string()));
            }
        }
    }
    fn enqueue(&mut self, ray: Ray) {
        if !ray.keep_alive() && ray.intensity() < self.config.min_intensity_per_ray() {
            debug!("ray dropped: intensity {} below threshold", ray.intensity());
            self.result.statistics.below_threshold += 1;
            return;
        }
        if ray.number_of_bounces() >= self.config.max_number_of_bounces() {
            debug!("ray dropped: maximum number of bounces reached");
            self.result.statistics.max_bounces += 1;
            return;
        }
        if self.enqueued >= self.config.max_rays_per_pass() {
            if !self.budget_warned {
                warn!(
                    "maximum number of rays per pass ({}) reached. Further rays are dropped.",
                    self.config.max_rays_per_pass()
                );
                self.budget_warned = true;
            }
            self.result.statistics.budget_exhausted += 1;
            return;
        }
        self.enqueued += 1;
        self.queue.push_back(ray);
    }
    fn record(&mut self, ray: &Ray, termination: Termination) {
        self.result.statistics.count(&termination);
        self.result.segments.push(RaySegment::new(ray, termination));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        nodes::{Mirror, Photodiode},
        optic_component::OpticalComponent,
        utils::geom_transformation::Placement,
        degree,
    };
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};

    fn ray_along_x() -> Ray {
        Ray::origin_along_x(Wavelength::default(), 1.0).unwrap()
    }
    #[test]
    fn empty_scene() {
        let config = RayTraceConfig::default();
        let result = RayTracer::new(&config).trace(vec![ray_along_x()], &mut []);
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.segments[0].termination, Termination::Escaped);
        assert_eq!(
            result.segments[0].waypoints,
            vec![point![0.0, 0.0], point![10_000.0, 0.0]]
        );
        assert_eq!(result.statistics.processed, 1);
        assert_eq!(result.statistics.escaped, 1);
    }
    #[test]
    fn below_threshold() {
        let config = RayTraceConfig::default();
        let mut dim = Ray::origin_along_x(Wavelength::default(), 1e-5).unwrap();
        let result = RayTracer::new(&config).trace(vec![dim.clone()], &mut []);
        assert!(result.segments.is_empty());
        assert_eq!(result.statistics.below_threshold, 1);
        dim.set_keep_alive(true);
        let result = RayTracer::new(&config).trace(vec![dim], &mut []);
        assert_eq!(result.segments.len(), 1);
    }
    #[test]
    fn nearest_component_wins() {
        let config = RayTraceConfig::default();
        let far = Photodiode::new(
            "far",
            Placement::new(point![50.0, 0.0], degree!(180.0)).unwrap(),
            10.0,
        )
        .unwrap();
        let near = Photodiode::new(
            "near",
            Placement::new(point![20.0, 0.0], degree!(180.0)).unwrap(),
            10.0,
        )
        .unwrap();
        let mut components: Vec<Box<dyn OpticalComponent>> = vec![Box::new(far), Box::new(near)];
        let result = RayTracer::new(&config).trace(vec![ray_along_x()], &mut components);
        assert_eq!(result.statistics.detected, 1);
        assert_abs_diff_eq!(result.segments[0].waypoints[1].x, 20.0, epsilon = 1e-9);
        let near = components[1].as_any().downcast_ref::<Photodiode>().unwrap();
        assert_eq!(near.power(), 1.0);
    }
    #[test]
    fn bounce_ceiling() {
        let mut config = RayTraceConfig::default();
        config.set_max_number_of_bounces(10);
        let mut left = Mirror::new(
            "left",
            Placement::new(point![-10.0, 0.0], degree!(0.0)).unwrap(),
        )
        .unwrap();
        left.set_reflectivity(1.0).unwrap();
        let mut right = Mirror::new(
            "right",
            Placement::new(point![10.0, 0.0], degree!(180.0)).unwrap(),
        )
        .unwrap();
        right.set_reflectivity(1.0).unwrap();
        let mut components: Vec<Box<dyn OpticalComponent>> = vec![Box::new(left), Box::new(right)];
        let result = RayTracer::new(&config).trace(vec![ray_along_x()], &mut components);
        assert_eq!(result.statistics.max_bounces, 1);
        assert_eq!(result.segments.len(), 10);
        assert!(result.segments.iter().all(|s| s.bounces < 10));
    }
    #[test]
    fn ray_budget() {
        let mut config = RayTraceConfig::default();
        config.set_max_rays_per_pass(2).unwrap();
        let rays = vec![ray_along_x(), ray_along_x(), ray_along_x()];
        let result = RayTracer::new(&config).trace(rays, &mut []);
        assert_eq!(result.segments.len(), 2);
        assert_eq!(result.statistics.budget_exhausted, 1);
    }
    #[test]
    fn ray_is_not_hit_behind_its_origin() {
        let config = RayTraceConfig::default();
        let mut ray = ray_along_x();
        ray.set_direction(vector![-1.0, 0.0]).unwrap();
        let diode = Photodiode::new(
            "behind",
            Placement::new(point![20.0, 0.0], degree!(180.0)).unwrap(),
            10.0,
        )
        .unwrap();
        let mut components: Vec<Box<dyn OpticalComponent>> = vec![Box::new(diode)];
        let result = RayTracer::new(&config).trace(vec![ray], &mut components);
        assert_eq!(result.statistics.escaped, 1);
    }
    #[test]
    fn statistics_display() {
        let stats = TraceStatistics {
            processed: 2,
            ..Default::default()
        };
        assert!(format!("{stats}").starts_with("processed: 2, escaped: 0"));
    }
}
