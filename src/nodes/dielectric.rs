//! Material of dielectric bodies and the interaction at their boundaries
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{
    analyzers::RayTraceConfig,
    coatings::CoatingType,
    error::{LumosError, LumosResult},
    optic_component::{Hit, Interaction},
    optics::{reflect, refract, Refraction},
    ray::Ray,
    refractive_index::{RefrIndexCauchy, RefractiveIndexType},
};

/// Optical material of a dielectric body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DielectricMaterial {
    /// dispersion model of the material
    pub refractive_index: RefractiveIndexType,
    /// absorption coefficient (per scene unit) of the bulk material
    pub absorption: f64,
    /// coating of all surfaces
    pub coating: CoatingType,
}
impl Default for DielectricMaterial {
    fn default() -> Self {
        Self {
            refractive_index: RefractiveIndexType::Cauchy(RefrIndexCauchy::default()),
            absorption: 0.0,
            coating: CoatingType::Fresnel,
        }
    }
}
impl DielectricMaterial {
    /// Creates a Cauchy material with the given index at 550 nm and the default dispersion.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index is < 1.0 or not finite.
    pub fn with_index_at_550nm(index: f64) -> LumosResult<Self> {
        let default_b = RefrIndexCauchy::default().b();
        Ok(Self {
            refractive_index: RefractiveIndexType::Cauchy(RefrIndexCauchy::from_index_at_550nm(
                index, default_b,
            )?),
            ..Self::default()
        })
    }
    /// Check the material parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the absorption coefficient is negative or not finite or a constant
    /// reflectivity of the coating is outside `0.0..=1.0`.
    pub fn validate(&self) -> LumosResult<()> {
        if self.absorption.is_sign_negative() || !self.absorption.is_finite() {
            return Err(LumosError::Configuration(
                "absorption coefficient must be >=0.0 and finite".into(),
            ));
        }
        if let CoatingType::ConstantR { reflectivity } = self.coating {
            CoatingType::constant_r(reflectivity)?;
        }
        Ok(())
    }
    /// Fresnel split of a ray at a boundary of a body made of this material.
    ///
    /// `entering` tells whether the ray enters the body at this hit. An outgoing ray is attenuated by the bulk
    /// absorption over the path from its origin to the hit point. Beyond the critical angle only the totally
    /// internally reflected child is created. Children with zero intensity are omitted.
    pub(super) fn interact(
        &self,
        ray: &Ray,
        hit: &Hit,
        entering: bool,
        config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        let n_body = self
            .refractive_index
            .get_refractive_index(ray.wavelength().effective())?;
        let (n1, n2) = if entering {
            (ray.refractive_index(), n_body)
        } else {
            (n_body, config.ambient_refractive_index())
        };
        let mut incoming = ray.clone();
        if !entering && self.absorption > 0.0 {
            incoming.scale_intensity((-self.absorption * hit.distance).exp())?;
        }
        let mut reflected = incoming.child(reflect(&ray.direction(), &hit.normal))?;
        match refract(&ray.direction(), &hit.normal, n1, n2) {
            Refraction::TotalInternalReflection => Ok(Interaction::children(vec![reflected])),
            Refraction::Refracted {
                direction,
                cos_incidence,
                ..
            } => {
                let reflectivity = self.coating.calc_reflectivity(n1, n2, cos_incidence);
                let mut children = Vec::with_capacity(2);
                if reflectivity > 0.0 {
                    reflected.scale_intensity(reflectivity)?;
                    if n2 > n1 {
                        reflected.add_phase(PI);
                    }
                    children.push(reflected);
                }
                if reflectivity < 1.0 {
                    let mut transmitted = incoming.child(direction)?;
                    transmitted.scale_intensity(1.0 - reflectivity)?;
                    transmitted.set_refractive_index(n2)?;
                    children.push(transmitted);
                }
                Ok(Interaction::children(children))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{optic_component::SurfaceId, ray::Wavelength, refractive_index::RefrIndexConst};
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector, Vector2};

    fn hit(normal: Vector2<f64>, distance: f64) -> Hit {
        Hit {
            distance,
            point: point![0.0, 0.0],
            normal,
            front_side: true,
            param: 0.0,
            surface: SurfaceId::Edge(0),
        }
    }
    #[test]
    fn validate() {
        assert!(DielectricMaterial::default().validate().is_ok());
        let m = DielectricMaterial {
            absorption: -1.0,
            ..DielectricMaterial::default()
        };
        assert!(m.validate().is_err());
        let m = DielectricMaterial {
            coating: CoatingType::ConstantR { reflectivity: 1.5 },
            ..DielectricMaterial::default()
        };
        assert!(m.validate().is_err());
        assert!(DielectricMaterial::with_index_at_550nm(0.9).is_err());
    }
    #[test]
    fn normal_incidence_split() {
        let m = DielectricMaterial::default();
        let ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        let interaction = m
            .interact(&ray, &hit(-Vector2::x(), 1.0), true, &RayTraceConfig::default())
            .unwrap();
        assert_eq!(interaction.children.len(), 2);
        let (r, t) = (&interaction.children[0], &interaction.children[1]);
        assert_abs_diff_eq!(r.intensity(), 0.04, epsilon = 1e-9);
        assert_abs_diff_eq!(t.intensity(), 0.96, epsilon = 1e-9);
        assert_abs_diff_eq!(r.direction(), -Vector2::x(), epsilon = 1e-12);
        assert_abs_diff_eq!(r.phase(), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(t.refractive_index(), 1.5, epsilon = 1e-12);
    }
    #[test]
    fn matched_index_is_transparent() {
        let m = DielectricMaterial {
            refractive_index: RefractiveIndexType::Const(RefrIndexConst::new(1.0).unwrap()),
            ..DielectricMaterial::default()
        };
        let ray = Ray::new(point![0.0, 0.0], vector![1.0, 0.3], Wavelength::default(), 1.0).unwrap();
        let interaction = m
            .interact(&ray, &hit(-Vector2::x(), 1.0), true, &RayTraceConfig::default())
            .unwrap();
        assert_eq!(interaction.children.len(), 1);
        let t = &interaction.children[0];
        assert_abs_diff_eq!(t.intensity(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t.direction(), ray.direction(), epsilon = 1e-12);
    }
    #[test]
    fn energy_conservation() {
        let m = DielectricMaterial::default();
        for angle in [0.0_f64, 10.0, 30.0, 60.0, 85.0] {
            let (s, c) = angle.to_radians().sin_cos();
            let ray = Ray::new(point![0.0, 0.0], vector![c, s], Wavelength::default(), 1.0).unwrap();
            let total: f64 = m
                .interact(&ray, &hit(-Vector2::x(), 1.0), true, &RayTraceConfig::default())
                .unwrap()
                .children
                .iter()
                .map(Ray::intensity)
                .sum();
            assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
        }
    }
    #[test]
    fn total_internal_reflection() {
        let m = DielectricMaterial::default();
        // critical angle of n=1.5 is about 41.8°
        let (s, c) = 45.0_f64.to_radians().sin_cos();
        let mut ray = Ray::new(point![0.0, 0.0], vector![c, s], Wavelength::default(), 1.0).unwrap();
        ray.set_refractive_index(1.5).unwrap();
        let interaction = m
            .interact(&ray, &hit(-Vector2::x(), 1.0), false, &RayTraceConfig::default())
            .unwrap();
        assert_eq!(interaction.children.len(), 1);
        let r = &interaction.children[0];
        assert_abs_diff_eq!(r.intensity(), 1.0, epsilon = 1e-12);
        assert!(r.direction().x < 0.0);
        assert_abs_diff_eq!(r.refractive_index(), 1.5, epsilon = 1e-12);
    }
    #[test]
    fn absorption_on_exit() {
        let m = DielectricMaterial {
            absorption: 0.01,
            coating: CoatingType::IdealAR,
            ..DielectricMaterial::default()
        };
        let mut ray = Ray::origin_along_x(Wavelength::default(), 1.0).unwrap();
        ray.set_refractive_index(1.5).unwrap();
        let interaction = m
            .interact(&ray, &hit(-Vector2::x(), 100.0), false, &RayTraceConfig::default())
            .unwrap();
        assert_eq!(interaction.children.len(), 1);
        assert_abs_diff_eq!(interaction.children[0].intensity(), (-1.0_f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(interaction.children[0].refractive_index(), 1.0, epsilon = 1e-12);
    }
}
