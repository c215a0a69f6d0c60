#![warn(missing_docs)]
//! Module for handling optical surface coatings
use serde::{Deserialize, Serialize};

mod constant_r;
mod fresnel;
mod ideal_ar;

pub use constant_r::ConstantR;
pub use fresnel::Fresnel;
pub use ideal_ar::IdealAR;

use crate::error::LumosResult;

/// Enum representing the different types of surface coatings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum CoatingType {
    /// Perfect anti-reflective coating. Reflectivity is always 0.0
    IdealAR,
    /// Ideal coating with a constant given reflectivity
    ConstantR {
        /// reflectivity in the range `0.0..=1.0`
        reflectivity: f64,
    },
    /// Fresnel reflection (e.g. uncoated surface)
    #[default]
    Fresnel,
}
impl CoatingType {
    /// Creates a [`CoatingType::ConstantR`] with a validated reflectivity.
    ///
    /// # Errors
    ///
    /// This function will return an error if the reflectivity is outside the range `0.0..=1.0`.
    pub fn constant_r(reflectivity: f64) -> LumosResult<Self> {
        Ok(ConstantR::new(reflectivity)?.to_enum())
    }
    /// Calculate the reflectivity of this coating.
    ///
    /// `n1` is the refractive index of the medium of the incoming ray, `n2` the one behind the surface and
    /// `cos_incidence` the cosine of the angle of incidence.
    #[must_use]
    pub fn calc_reflectivity(&self, n1: f64, n2: f64, cos_incidence: f64) -> f64 {
        match self {
            Self::IdealAR => IdealAR.calc_reflectivity(n1, n2, cos_incidence),
            Self::ConstantR { reflectivity } => ConstantR {
                reflectivity: *reflectivity,
            }
            .calc_reflectivity(n1, n2, cos_incidence),
            Self::Fresnel => Fresnel.calc_reflectivity(n1, n2, cos_incidence),
        }
    }
}

/// Trait for the calculation of the reflectivity of a surface coating.
pub trait Coating {
    /// Calculate the reflectivity of this coating for the given indices and angle of incidence.
    fn calc_reflectivity(&self, n1: f64, n2: f64, cos_incidence: f64) -> f64;
    /// Return the corresponding [`CoatingType`].
    fn to_enum(&self) -> CoatingType;
}
