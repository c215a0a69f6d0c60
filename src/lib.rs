//! This is the documentation for the **LUMOS** software package, a 2D optical ray tracing and physical interaction
//! engine for interactive optics design.
//!
//! A [`Scene`] holds laser sources and optical components (mirrors, lenses, dielectrics, gratings, polarization
//! optics, modulators, fibers and detectors). [`Scene::trace_all`] propagates all rays breadth-first through the
//! components and returns the finished ray segments for rendering. Detectors accumulate their readouts during the
//! pass.
#![allow(clippy::module_name_repetitions)]

pub mod analyzers;
pub mod coatings;
pub mod console;
pub mod error;
pub mod nodes;
pub mod optic_component;
pub mod optics;
pub mod polarization;
pub mod ray;
pub mod refractive_index;
pub mod scene;
pub mod scene_document;
pub mod source;
pub mod surface;
pub mod utils;

pub use scene::Scene;
pub use scene_document::SceneDocument;

/// Return the version information of the currently built LUMOS executable.
#[must_use]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
