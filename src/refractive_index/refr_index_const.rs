use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use super::{check_wavelength, RefractiveIndex, RefractiveIndexType};
use crate::error::{LumosError, LumosResult};

/// Wavelength-independent refractive index.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RefrIndexConst {
    refractive_index: f64,
}
impl RefrIndexConst {
    /// Create a new constant refractive index model.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given refractive index is < 1.0 or not finite.
    pub fn new(refractive_index: f64) -> LumosResult<Self> {
        if refractive_index < 1.0 || !refractive_index.is_finite() {
            return Err(LumosError::Configuration(
                "refractive index must be >=1.0 and finite".into(),
            ));
        }
        Ok(Self { refractive_index })
    }
}
impl Default for RefrIndexConst {
    fn default() -> Self {
        refr_index_vaccuum()
    }
}
/// Refractive index model of vacuum (n = 1.0).
#[must_use]
pub const fn refr_index_vaccuum() -> RefrIndexConst {
    RefrIndexConst {
        refractive_index: 1.0,
    }
}

impl RefractiveIndex for RefrIndexConst {
    fn get_refractive_index(&self, wavelength: Length) -> LumosResult<f64> {
        check_wavelength(wavelength)?;
        Ok(self.refractive_index)
    }
    fn to_enum(&self) -> RefractiveIndexType {
        RefractiveIndexType::Const(self.clone())
    }
}
#[cfg(test)]
mod test {
    use super::*;
    use crate::nanometer;
    #[test]
    fn new() {
        assert!(RefrIndexConst::new(0.99).is_err());
        assert!(RefrIndexConst::new(f64::NAN).is_err());
        assert!(RefrIndexConst::new(f64::INFINITY).is_err());
        assert_eq!(RefrIndexConst::new(1.5).unwrap().refractive_index, 1.5);
    }
    #[test]
    fn vacuum() {
        let n = refr_index_vaccuum();
        assert_eq!(n.get_refractive_index(nanometer!(1000.0)).unwrap(), 1.0);
        assert!(matches!(n.to_enum(), RefractiveIndexType::Const(_)));
    }
}
