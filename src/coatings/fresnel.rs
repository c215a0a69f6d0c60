use super::{Coating, CoatingType};
use crate::optics::fresnel_reflectance;

/// Uncoated dielectric surface following the Fresnel equations (unpolarized average)
pub struct Fresnel;

impl Coating for Fresnel {
    fn calc_reflectivity(&self, n1: f64, n2: f64, cos_incidence: f64) -> f64 {
        fresnel_reflectance(n1, n2, cos_incidence)
    }
    fn to_enum(&self) -> CoatingType {
        CoatingType::Fresnel
    }
}
