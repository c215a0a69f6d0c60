use super::{Coating, CoatingType};
use crate::error::{LumosError, LumosResult};

/// Ideal coating with a constant reflectivity independent of the angle of incidence
pub struct ConstantR {
    pub(super) reflectivity: f64,
}

impl ConstantR {
    /// Creates a new [`ConstantR`] coating.
    ///
    /// # Errors
    ///
    /// This function will return an error if the reflectivity is outside the range `0.0..=1.0`.
    pub fn new(reflectivity: f64) -> LumosResult<Self> {
        if !(0.0..=1.0).contains(&reflectivity) {
            return Err(LumosError::Configuration(
                "reflectivity must be within (0.0..=1.0)".into(),
            ));
        }
        Ok(Self { reflectivity })
    }
}

impl Coating for ConstantR {
    fn calc_reflectivity(&self, _n1: f64, _n2: f64, _cos_incidence: f64) -> f64 {
        self.reflectivity
    }
    fn to_enum(&self) -> CoatingType {
        CoatingType::ConstantR {
            reflectivity: self.reflectivity,
        }
    }
}
