//! Shared numeric routines of the optical physics.
//!
//! This module bundles the closed-form approximations used by all components: vector reflection and
//! refraction (Snell's law), Fresnel reflectance, Jones calculus, the grating equation and the
//! parameters of Gaussian beams. Dispersion models live in [`refractive_index`](crate::refractive_index).
pub mod fresnel;
pub mod gaussian;
pub mod grating;
pub mod jones;
pub mod reflection;

pub use fresnel::fresnel_reflectance;
pub use jones::{JonesMatrix, JonesVector};
pub use reflection::{reflect, refract, Refraction};
