//! Cauchy dispersion model `n(λ) = A + B / λ²`
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::nanometer};

use super::{check_wavelength, RefractiveIndex, RefractiveIndexType};
use crate::error::{LumosError, LumosResult};

/// Reference wavelength (in nm) at which the user specified index is matched.
pub const REFERENCE_WAVELENGTH_NM: f64 = 550.0;

/// Cauchy refractive index model.
///
/// The coefficient `B` is given in nm². The model is usually created from an "index at
/// 550 nm" via [`RefrIndexCauchy::from_index_at_550nm`] such that `A` is chosen to match
/// this value exactly.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RefrIndexCauchy {
    a: f64,
    b_nm2: f64,
}
impl RefrIndexCauchy {
    /// Create a new Cauchy model from its coefficients `A` and `B` (in nm²).
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the coefficients is not finite or `B` is negative.
    pub fn new(a: f64, b_nm2: f64) -> LumosResult<Self> {
        if !a.is_finite() || !b_nm2.is_finite() || b_nm2.is_sign_negative() {
            return Err(LumosError::Configuration(
                "Cauchy coefficients must be finite and B must be >= 0.0".into(),
            ));
        }
        Ok(Self { a, b_nm2 })
    }
    /// Create a Cauchy model whose index at 550 nm equals `index_at_550nm`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given index is < 1.0 or not finite or `B` is invalid.
    pub fn from_index_at_550nm(index_at_550nm: f64, b_nm2: f64) -> LumosResult<Self> {
        if index_at_550nm < 1.0 || !index_at_550nm.is_finite() {
            return Err(LumosError::Configuration(
                "refractive index at 550 nm must be >=1.0 and finite".into(),
            ));
        }
        let a = index_at_550nm - b_nm2 / (REFERENCE_WAVELENGTH_NM * REFERENCE_WAVELENGTH_NM);
        Self::new(a, b_nm2)
    }
    /// Returns the coefficient `A` of this model.
    #[must_use]
    pub const fn a(&self) -> f64 {
        self.a
    }
    /// Returns the coefficient `B` (in nm²) of this model.
    #[must_use]
    pub const fn b(&self) -> f64 {
        self.b_nm2
    }
    /// Returns the refractive index at the 550 nm reference wavelength.
    #[must_use]
    pub fn index_at_550nm(&self) -> f64 {
        self.a + self.b_nm2 / (REFERENCE_WAVELENGTH_NM * REFERENCE_WAVELENGTH_NM)
    }
}
impl Default for RefrIndexCauchy {
    /// Crown-glass like default (n = 1.5 at 550 nm, B = 4200 nm²)
    fn default() -> Self {
        Self {
            a: 1.5 - 4200.0 / (REFERENCE_WAVELENGTH_NM * REFERENCE_WAVELENGTH_NM),
            b_nm2: 4200.0,
        }
    }
}
impl RefractiveIndex for RefrIndexCauchy {
    fn get_refractive_index(&self, wavelength: Length) -> LumosResult<f64> {
        check_wavelength(wavelength)?;
        let lambda = wavelength.get::<nanometer>();
        Ok(self.a + self.b_nm2 / (lambda * lambda))
    }
    fn to_enum(&self) -> RefractiveIndexType {
        RefractiveIndexType::Cauchy(self.clone())
    }
}
