#![warn(missing_docs)]
//! Ideal thin lens
use std::any::Any;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{centered_segment, check_length, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    error::{LumosError, LumosResult},
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId},
    optics::gaussian,
    ray::{BeamProfile, Ray},
    surface::{GeoSurface, LineSegment},
    utils::geom_transformation::Placement,
};

/// Parameters of a [`ThinLens`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinLensParams {
    /// focal length. Negative values form a diverging lens.
    pub focal_length: f64,
    /// diameter of the lens
    pub diameter: f64,
}
impl Default for ThinLensParams {
    fn default() -> Self {
        Self {
            focal_length: 100.0,
            diameter: 80.0,
        }
    }
}

/// An ideal (paraxial) thin lens.
///
/// A ray hitting the lens at the height `h` (measured along the lens from its center) changes its slope with respect
/// to the optical axis by `-h/f`. Rays are refracted identically from both sides. The transmitted ray gets the phase
/// of an ideal lens `-π·h²/(λ·f)`. A Gaussian beam profile is transformed by the complex beam parameter.
#[derive(Debug, Clone)]
pub struct ThinLens {
    attr: ComponentAttr,
    params: ThinLensParams,
    segment: Option<LineSegment>,
}
impl Default for ThinLens {
    fn default() -> Self {
        let mut lens = Self {
            attr: ComponentAttr::new("Thin lens", Placement::default()),
            params: ThinLensParams::default(),
            segment: None,
        };
        lens.update_geometry();
        lens
    }
}
impl ThinLens {
    /// Creates a new [`ThinLens`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the focal length or the diameter are invalid.
    pub fn new(
        name: &str,
        placement: Placement,
        focal_length: f64,
        diameter: f64,
    ) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            ThinLensParams {
                focal_length,
                diameter,
            },
        )
    }
    /// Creates a [`ThinLens`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: ThinLensParams) -> LumosResult<Self> {
        let mut lens = Self {
            attr,
            ..Self::default()
        };
        lens.set_focal_length(params.focal_length)?;
        lens.set_diameter(params.diameter)?;
        Ok(lens)
    }
    /// Returns the focal length of this [`ThinLens`].
    #[must_use]
    pub const fn focal_length(&self) -> f64 {
        self.params.focal_length
    }
    /// Sets the focal length of this [`ThinLens`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the focal length is zero or not finite.
    pub fn set_focal_length(&mut self, focal_length: f64) -> LumosResult<Invalidation> {
        if focal_length == 0.0 || !focal_length.is_finite() {
            return Err(LumosError::Configuration(
                "focal length must be !=0.0 and finite".into(),
            ));
        }
        self.params.focal_length = focal_length;
        Ok(Invalidation::Optics)
    }
    /// Returns the diameter of this [`ThinLens`].
    #[must_use]
    pub const fn diameter(&self) -> f64 {
        self.params.diameter
    }
    /// Sets the diameter of this [`ThinLens`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the diameter is <= 0.0 or not finite.
    pub fn set_diameter(&mut self, diameter: f64) -> LumosResult<Invalidation> {
        check_length(diameter, "lens diameter")?;
        self.params.diameter = diameter;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    fn transformed_beam(&self, beam: Option<BeamProfile>, wavelength: f64, n: f64) -> Option<BeamProfile> {
        match beam? {
            BeamProfile::Gaussian {
                rayleigh_range,
                distance_from_waist,
                ..
            } => {
                let (z, z_r) = gaussian::thin_lens_transform(
                    distance_from_waist,
                    rayleigh_range,
                    self.params.focal_length,
                )?;
                Some(BeamProfile::Gaussian {
                    waist_radius: gaussian::waist_from_rayleigh_range(z_r, wavelength, n),
                    rayleigh_range: z_r,
                    distance_from_waist: z,
                })
            }
            geometric @ BeamProfile::Geometric { .. } => Some(geometric),
        }
    }
}
impl OpticalComponent for ThinLens {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::ThinLens
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::ThinLens(self.params.clone())
    }
    fn update_geometry(&mut self) {
        self.segment = centered_segment(&self.attr.placement(), self.params.diameter);
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .segment
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        let face = if hit.front_side { 0 } else { 1 };
        Some(Hit::from_surface(hit, SurfaceId::Face(face)))
    }
    fn interact(
        &mut self,
        ray: &Ray,
        hit: &Hit,
        config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        let placement = self.attr.placement();
        // axis oriented along the propagation direction
        let axis = -hit.normal;
        let tangent = placement.tangent();
        let axial = ray.direction().dot(&axis);
        if axial <= f64::EPSILON {
            return Err(LumosError::Geometry(
                "ray at grazing incidence on thin lens".into(),
            ));
        }
        let height = (hit.point - placement.position()).dot(&tangent);
        let slope = ray.direction().dot(&tangent) / axial - height / self.params.focal_length;
        let mut transmitted = ray.child(axis + tangent * slope)?;
        let wavelength = ray.wavelength_in_units(config.length_unit());
        transmitted.add_phase(-PI * height * height / (wavelength * self.params.focal_length));
        transmitted.set_beam(self.transformed_beam(
            ray.beam(),
            wavelength,
            ray.refractive_index(),
        ));
        Ok(Interaction::children(vec![transmitted]))
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
