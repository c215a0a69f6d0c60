#![warn(missing_docs)]
//! Optical Analyzers
//!
//! The ray tracer propagates all rays emitted by the sources of a [`Scene`](crate::scene::Scene) through its
//! components. Its behavior is controlled by a [`RayTraceConfig`].
pub mod raytrace;
pub mod tracer;

pub use raytrace::{RayTraceConfig, ViewBounds};
pub use tracer::{RaySegment, RayTracer, TraceResult, TraceStatistics};
