//! Module for handling the refractive index of an optical material.
#![warn(missing_docs)]
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::EnumIter;
use strum::IntoEnumIterator;
use uom::si::f64::Length;

pub mod refr_index_cauchy;
pub mod refr_index_const;

pub use refr_index_cauchy::RefrIndexCauchy;
pub use refr_index_const::refr_index_vaccuum;
pub use refr_index_const::RefrIndexConst;

use crate::error::{LumosError, LumosResult};

/// Available models for the calculation of refractive index
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, EnumIter)]
pub enum RefractiveIndexType {
    /// Trivial model returning a wavelength-independant constant
    Const(RefrIndexConst),
    /// Cauchy model `n(λ) = A + B / λ²`
    Cauchy(RefrIndexCauchy),
}

impl Default for RefractiveIndexType {
    fn default() -> Self {
        Self::Cauchy(RefrIndexCauchy::default())
    }
}

impl RefractiveIndexType {
    /// Get the refractive index value of the [`RefractiveIndexType`] for the given wavelength.
    ///
    /// # Errors
    ///
    /// This function returns an error if the the refractive index could not be calculated e.g.:
    ///   - the given wavelength is zero, negative or not finite.
    ///   - the model would calculate a value below 1.0, NaN or infinity
    pub fn get_refractive_index(&self, wavelength: Length) -> LumosResult<f64> {
        let refr_index = match self {
            Self::Const(refr_index_const) => refr_index_const.get_refractive_index(wavelength)?,
            Self::Cauchy(refr_index_cauchy) => {
                refr_index_cauchy.get_refractive_index(wavelength)?
            }
        };
        if refr_index < 1.0 || !refr_index.is_finite() {
            return Err(LumosError::Configuration(
                "refractive index calculated by model is <1.0 or not finite".into(),
            ));
        }
        Ok(refr_index)
    }
    /// Creates a default instance of a refractive index type by name.
    ///
    /// This is used to instantiate a predefined refractive index type from a string input,
    /// e.g., in configuration files or inspector selections.
    #[must_use]
    pub fn default_from_name(name: &str) -> Option<Self> {
        Self::iter().find(|ref_ind_type| format!("{ref_ind_type}") == name)
    }
}

impl Display for RefractiveIndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Const(_) => write!(f, "Constant"),
            Self::Cauchy(_) => write!(f, "Cauchy equation"),
        }
    }
}
/// All refractive index models must implement this trait.
pub trait RefractiveIndex {
    /// Get the refractive index value of the current model for the given wavelength.
    ///
    /// # Errors
    ///
    /// This function returns an error if the the refractive index could not be calculated e.g.:
    ///   - the given wavelength is outside defined limits.
    ///   - the model would calculate a value below 1.0, NaN or infinity
    fn get_refractive_index(&self, wavelength: Length) -> LumosResult<f64>;
    /// Create a corresponding [`RefractiveIndexType`] value.
    fn to_enum(&self) -> RefractiveIndexType;
}

fn check_wavelength(wavelength: Length) -> LumosResult<()> {
    if !wavelength.is_finite() || wavelength.value <= 0.0 {
        return Err(LumosError::Configuration(
            "wavelength must be >0.0 and finite".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nanometer;
    use approx::assert_relative_eq;
    #[test]
    fn default() {
        assert!(matches!(
            RefractiveIndexType::default(),
            RefractiveIndexType::Cauchy(_)
        ));
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", RefractiveIndexType::Const(refr_index_vaccuum())),
            "Constant"
        );
        assert_eq!(
            format!("{}", RefractiveIndexType::default()),
            "Cauchy equation"
        );
    }
    #[test]
    fn default_from_name() {
        assert!(matches!(
            RefractiveIndexType::default_from_name("Cauchy equation"),
            Some(RefractiveIndexType::Cauchy(_))
        ));
        assert!(RefractiveIndexType::default_from_name("Sellmeier").is_none());
    }
    #[test]
    fn get_refractive_index() {
        let r = RefractiveIndexType::Const(RefrIndexConst::new(1.33).unwrap());
        assert_relative_eq!(r.get_refractive_index(nanometer!(600.0)).unwrap(), 1.33);
        assert!(r.get_refractive_index(nanometer!(-600.0)).is_err());
        let r = RefractiveIndexType::Cauchy(RefrIndexCauchy::from_index_at_550nm(1.5, 4200.0).unwrap());
        assert_relative_eq!(r.get_refractive_index(nanometer!(550.0)).unwrap(), 1.5);
    }
}
