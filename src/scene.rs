#![warn(missing_docs)]
//! The optical scene.
//!
//! A [`Scene`] owns the [`RayTraceConfig`], the laser sources and the optical components. A full trace pass is started
//! with [`Scene::trace_all`]. Every mutation of a component returns an
//! [`Invalidation`](crate::optic_component::Invalidation) value telling the caller that a new pass is needed. There
//! is no incremental recomputation: each pass starts from zeroed detectors.
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    analyzers::{RayTraceConfig, RayTracer, TraceResult},
    error::{LumosError, LumosResult},
    nodes::{create_component, ComponentKind},
    optic_component::{DetectorReadout, OpticalComponent},
    scene_document::SceneDocument,
    source::LaserSource,
};

/// Readout of one detector of the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorReport {
    /// name of the detector
    pub name: String,
    /// id of the detector
    pub uuid: Uuid,
    /// kind of the detector
    pub kind: ComponentKind,
    /// readout data
    pub readout: DetectorReadout,
}

/// The optical scene: sources, components and the trace configuration.
#[derive(Debug, Default)]
pub struct Scene {
    config: RayTraceConfig,
    sources: Vec<LaserSource>,
    components: Vec<Box<dyn OpticalComponent>>,
}
impl Scene {
    /// Creates a new (empty) [`Scene`] with the given config.
    #[must_use]
    pub fn new(config: RayTraceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
    /// Returns a reference to the [`RayTraceConfig`] of this [`Scene`].
    #[must_use]
    pub const fn config(&self) -> &RayTraceConfig {
        &self.config
    }
    /// Returns a mutable reference to the [`RayTraceConfig`] of this [`Scene`].
    pub fn config_mut(&mut self) -> &mut RayTraceConfig {
        &mut self.config
    }
    /// Sets the [`RayTraceConfig`] of this [`Scene`].
    pub fn set_config(&mut self, config: RayTraceConfig) {
        self.config = config;
    }
    /// Add a [`LaserSource`] to this [`Scene`] and return its id.
    ///
    /// # Errors
    ///
    /// This function will return an error if a source with the same id already exists or the source holds invalid
    /// values.
    pub fn add_source(&mut self, source: LaserSource) -> LumosResult<Uuid> {
        source.validate()?;
        let uuid = source.uuid();
        if self.sources.iter().any(|s| s.uuid() == uuid) {
            return Err(LumosError::Configuration(format!(
                "source with id {uuid} already exists"
            )));
        }
        self.sources.push(source);
        Ok(uuid)
    }
    /// Returns the sources of this [`Scene`].
    #[must_use]
    pub fn sources(&self) -> &[LaserSource] {
        &self.sources
    }
    /// Returns a mutable reference to the source with the given id.
    pub fn source_mut(&mut self, uuid: Uuid) -> Option<&mut LaserSource> {
        self.sources.iter_mut().find(|s| s.uuid() == uuid)
    }
    /// Remove the source with the given id.
    ///
    /// # Errors
    ///
    /// This function will return an error if no source with the given id exists.
    pub fn remove_source(&mut self, uuid: Uuid) -> LumosResult<LaserSource> {
        let idx = self
            .sources
            .iter()
            .position(|s| s.uuid() == uuid)
            .ok_or_else(|| LumosError::Configuration(format!("source with id {uuid} not found")))?;
        Ok(self.sources.remove(idx))
    }
    /// Add a boxed component to this [`Scene`] and return its id.
    ///
    /// # Errors
    ///
    /// This function will return an error if a component with the same id already exists.
    pub fn add_component(&mut self, component: Box<dyn OpticalComponent>) -> LumosResult<Uuid> {
        let uuid = component.uuid();
        if self.components.iter().any(|c| c.uuid() == uuid) {
            return Err(LumosError::Configuration(format!(
                "component with id {uuid} already exists"
            )));
        }
        self.components.push(component);
        Ok(uuid)
    }
    /// Add a concrete component to this [`Scene`] and return its id.
    ///
    /// # Errors
    ///
    /// This function will return an error if a component with the same id already exists.
    pub fn add<T: OpticalComponent + 'static>(&mut self, component: T) -> LumosResult<Uuid> {
        self.add_component(Box::new(component))
    }
    /// Returns the components of this [`Scene`].
    #[must_use]
    pub fn components(&self) -> &[Box<dyn OpticalComponent>] {
        &self.components
    }
    /// Returns the component with the given id.
    #[must_use]
    pub fn component(&self, uuid: Uuid) -> Option<&dyn OpticalComponent> {
        self.components
            .iter()
            .find(|c| c.uuid() == uuid)
            .map(|c| &**c)
    }
    /// Returns a mutable reference to the component with the given id.
    pub fn component_mut(&mut self, uuid: Uuid) -> Option<&mut Box<dyn OpticalComponent>> {
        self.components.iter_mut().find(|c| c.uuid() == uuid)
    }
    /// Returns the component with the given id downcasted to its concrete type.
    ///
    /// Returns `None` if the id was not found or the component is of a different type.
    #[must_use]
    pub fn component_as<T: OpticalComponent + 'static>(&self, uuid: Uuid) -> Option<&T> {
        self.component(uuid)?.as_any().downcast_ref::<T>()
    }
    /// Returns a mutable reference to the component with the given id downcasted to its concrete type.
    pub fn component_as_mut<T: OpticalComponent + 'static>(&mut self, uuid: Uuid) -> Option<&mut T> {
        self.component_mut(uuid)?.as_any_mut().downcast_mut::<T>()
    }
    /// Remove the component with the given id.
    ///
    /// # Errors
    ///
    /// This function will return an error if no component with the given id exists.
    pub fn remove_component(&mut self, uuid: Uuid) -> LumosResult<Box<dyn OpticalComponent>> {
        let idx = self
            .components
            .iter()
            .position(|c| c.uuid() == uuid)
            .ok_or_else(|| {
                LumosError::Configuration(format!("component with id {uuid} not found"))
            })?;
        Ok(self.components.remove(idx))
    }
    /// Zero the accumulated data of all detectors.
    pub fn reset_detectors(&mut self) {
        for component in &mut self.components {
            component.reset();
        }
    }
    /// Returns the configuration warnings of all components (e.g. detectors with zero extent).
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        self.components
            .iter()
            .flat_map(|c| {
                c.warnings()
                    .into_iter()
                    .map(move |w| format!("{} ({}): {w}", c.name(), c.kind()))
            })
            .collect()
    }
    /// Returns the readouts of all detectors in insertion order.
    #[must_use]
    pub fn readouts(&self) -> Vec<DetectorReport> {
        self.components
            .iter()
            .filter_map(|c| {
                c.readout().map(|readout| DetectorReport {
                    name: c.name(),
                    uuid: c.uuid(),
                    kind: c.kind(),
                    readout,
                })
            })
            .collect()
    }
    /// Trace all rays of all enabled sources through the scene.
    ///
    /// All detectors are zeroed before the pass. Configuration warnings are logged but do not abort the pass. A
    /// source whose rays cannot be generated is skipped with a warning and counted once as aborted.
    pub fn trace_all(&mut self) -> TraceResult {
        self.reset_detectors();
        for warning in self.warnings() {
            warn!("{warning}");
        }
        let mut rays = Vec::new();
        let mut rejected_sources = 0;
        for source in self.sources.iter().filter(|s| s.enabled()) {
            match source.generate_rays(&self.config) {
                Ok(source_rays) => rays.extend(source_rays),
                Err(e) => {
                    warn!("source '{}' skipped: {e}", source.name());
                    rejected_sources += 1;
                }
            }
        }
        if rays.is_empty() {
            info!("no active sources found");
        }
        let tracer = RayTracer::new(&self.config);
        let mut result = tracer.trace(rays, &mut self.components);
        result.statistics.aborted += rejected_sources;
        result
    }
    /// Create a [`SceneDocument`] snapshot of this [`Scene`].
    #[must_use]
    pub fn to_document(&self) -> SceneDocument {
        SceneDocument::new(
            self.config.clone(),
            self.sources.clone(),
            self.components.iter().map(|c| c.config()).collect(),
        )
    }
    /// Reconstruct a [`Scene`] from a [`SceneDocument`].
    ///
    /// # Errors
    ///
    /// Sources with invalid values are skipped with a warning.
    ///
    /// # Errors
    ///
    /// This function will return an error if a component config is invalid or ids are duplicated.
    pub fn from_document(document: &SceneDocument) -> LumosResult<Self> {
        let mut scene = Self::new(document.config().clone());
        for source in document.sources() {
            if let Err(e) = source.validate() {
                warn!("source '{}' of scene document skipped: {e}", source.name());
                continue;
            }
            scene.add_source(source.clone())?;
        }
        for component in document.components() {
            scene.add_component(create_component(component)?)?;
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        degree,
        nodes::{Mirror, Photodiode, Screen},
        ray::Wavelength,
        utils::{geom_transformation::Placement, test_helper::test_helper::check_warnings_contain},
    };
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use nalgebra::point;

    fn laser() -> LaserSource {
        LaserSource::new("laser", Placement::default(), Wavelength::default(), 1.0).unwrap()
    }
    fn diode_at(x: f64) -> Photodiode {
        Photodiode::new(
            "diode",
            Placement::new(point![x, 0.0], degree!(180.0)).unwrap(),
            20.0,
        )
        .unwrap()
    }
    #[test]
    fn default() {
        let scene = Scene::default();
        assert!(scene.sources().is_empty());
        assert!(scene.components().is_empty());
        assert_eq!(scene.config(), &RayTraceConfig::default());
    }
    #[test]
    fn add_and_remove() {
        let mut scene = Scene::default();
        let mirror = Mirror::default();
        let uuid = scene.add(mirror.clone()).unwrap();
        assert!(scene.add(mirror).is_err());
        assert!(scene.component(uuid).is_some());
        assert!(scene.component_as::<Mirror>(uuid).is_some());
        assert!(scene.component_as::<Screen>(uuid).is_none());
        assert!(scene.remove_component(Uuid::new_v4()).is_err());
        assert_eq!(scene.remove_component(uuid).unwrap().kind(), ComponentKind::Mirror);
        assert!(scene.components().is_empty());
        let source = laser();
        let source_id = scene.add_source(source.clone()).unwrap();
        assert!(scene.add_source(source).is_err());
        assert!(scene.source_mut(source_id).is_some());
        assert!(scene.remove_source(source_id).is_ok());
        assert!(scene.remove_source(source_id).is_err());
    }
    #[test]
    fn trace_into_photodiode() {
        let mut scene = Scene::default();
        scene.add_source(laser()).unwrap();
        let diode = scene.add(diode_at(100.0)).unwrap();
        let result = scene.trace_all();
        assert_eq!(result.statistics.detected, 1);
        assert_matches!(
            scene.component_as::<Photodiode>(diode).unwrap().readout(),
            Some(DetectorReadout::Photodiode { hits: 1, .. })
        );
        // a second pass does not accumulate
        scene.trace_all();
        let readouts = scene.readouts();
        assert_eq!(readouts.len(), 1);
        assert_eq!(readouts[0].uuid, diode);
        match &readouts[0].readout {
            DetectorReadout::Photodiode { power, hits } => {
                assert_abs_diff_eq!(*power, 1.0, epsilon = 1e-12);
                assert_eq!(*hits, 1);
            }
            DetectorReadout::Screen { .. } => panic!("wrong readout"),
        }
    }
    #[test]
    fn disabled_sources_emit_nothing() {
        let mut scene = Scene::default();
        let id = scene.add_source(laser()).unwrap();
        scene.source_mut(id).unwrap().set_enabled(false);
        let result = scene.trace_all();
        assert!(result.segments.is_empty());
    }
    #[test]
    fn typed_mutation() {
        let mut scene = Scene::default();
        scene.add_source(laser()).unwrap();
        let diode = scene.add(diode_at(100.0)).unwrap();
        scene
            .component_as_mut::<Photodiode>(diode)
            .unwrap()
            .set_position(point![-100.0, 0.0])
            .unwrap();
        let result = scene.trace_all();
        assert_eq!(result.statistics.detected, 0);
        assert_eq!(result.statistics.escaped, 1);
    }
    #[test]
    fn zero_extent_detector_warns() {
        testing_logger::setup();
        let mut scene = Scene::default();
        let mut screen = Screen::default();
        let _ = screen.set_length(0.0).unwrap();
        scene.add(screen).unwrap();
        scene.add_source(laser()).unwrap();
        scene.trace_all();
        check_warnings_contain("has zero extent");
    }
    fn malformed_laser() -> LaserSource {
        let yaml = serde_yaml::to_string(&laser()).unwrap();
        serde_yaml::from_str(&yaml.replace("intensity: 1.0", "intensity: -1.0")).unwrap()
    }
    #[test]
    fn add_malformed_source() {
        let mut scene = Scene::default();
        assert_matches!(
            scene.add_source(malformed_laser()),
            Err(LumosError::Configuration(_))
        );
        assert!(scene.sources().is_empty());
    }
    #[test]
    fn malformed_source_does_not_abort_pass() {
        testing_logger::setup();
        let mut scene = Scene::default();
        scene.sources.push(malformed_laser());
        scene.add_source(laser()).unwrap();
        let diode = scene.add(diode_at(100.0)).unwrap();
        let result = scene.trace_all();
        assert_eq!(result.statistics.aborted, 1);
        assert_eq!(result.statistics.detected, 1);
        let power = scene.component_as::<Photodiode>(diode).unwrap().power();
        assert_abs_diff_eq!(power, 1.0, epsilon = 1e-12);
        check_warnings_contain("source 'laser' skipped");
    }
    #[test]
    fn malformed_source_in_document_is_skipped() {
        testing_logger::setup();
        let mut scene = Scene::default();
        let good = scene.add_source(laser()).unwrap();
        scene.add(diode_at(100.0)).unwrap();
        let document = SceneDocument::new(
            scene.config().clone(),
            vec![malformed_laser(), scene.sources()[0].clone()],
            scene.components().iter().map(|c| c.config()).collect(),
        );
        let mut copy = Scene::from_document(&document).unwrap();
        check_warnings_contain("of scene document skipped");
        assert_eq!(copy.sources().len(), 1);
        assert_eq!(copy.sources()[0].uuid(), good);
        assert_eq!(copy.trace_all().statistics.detected, 1);
    }
    #[test]
    fn document_round_trip() {
        let mut scene = Scene::default();
        scene.add_source(laser()).unwrap();
        let mirror = scene.add(Mirror::default()).unwrap();
        let diode = scene.add(diode_at(50.0)).unwrap();
        let document = scene.to_document();
        let copy = Scene::from_document(&document).unwrap();
        assert_eq!(copy.sources(), scene.sources());
        assert_eq!(copy.components().len(), 2);
        assert_eq!(copy.component(mirror).unwrap().config(), scene.component(mirror).unwrap().config());
        assert_eq!(copy.component(diode).unwrap().kind(), ComponentKind::Photodiode);
    }
}
