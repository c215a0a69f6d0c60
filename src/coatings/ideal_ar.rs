use super::{Coating, CoatingType};

/// Ideal coating with zero reflectivity
///
/// This model represents a perfect antireflective coating with zero reflectivity and
/// full transmission independent of wavelength, angle of incidence, or refractive index of the
/// following medium.
pub struct IdealAR;

impl Coating for IdealAR {
    fn calc_reflectivity(&self, _n1: f64, _n2: f64, _cos_incidence: f64) -> f64 {
        0.0
    }
    fn to_enum(&self) -> CoatingType {
        CoatingType::IdealAR
    }
}
