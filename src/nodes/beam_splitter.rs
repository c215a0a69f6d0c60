#![warn(missing_docs)]
//! Plain and polarizing beam splitters
use std::{
    any::Any,
    f64::consts::{FRAC_PI_2, PI},
};

use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

use super::{centered_segment, check_length, check_ratio, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    error::{LumosError, LumosResult},
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId, Termination},
    optics::{reflect, JonesMatrix},
    ray::Ray,
    surface::{GeoSurface, LineSegment},
    utils::geom_transformation::Placement,
};

/// Splitting behaviour of a [`BeamSplitter`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SplitterType {
    /// polarization independent split
    Plain {
        /// transmitted fraction of the intensity (`0.0..=1.0`)
        ratio: f64,
    },
    /// transmits the component along `axis`, reflects the orthogonal component
    Polarizing {
        /// transmission axis
        axis: Angle,
    },
}
impl Default for SplitterType {
    fn default() -> Self {
        Self::Plain { ratio: 0.5 }
    }
}

/// Parameters of a [`BeamSplitter`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSplitterParams {
    /// length of the splitter surface
    pub length: f64,
    /// plain or polarizing
    pub splitter_type: SplitterType,
}
impl Default for BeamSplitterParams {
    fn default() -> Self {
        Self {
            length: 50.0,
            splitter_type: SplitterType::default(),
        }
    }
}

/// An ideal, lossless beam splitter.
///
/// An incoming ray is split into a transmitted child along its direction and a reflected child. Light reflected
/// off the front face gets a phase shift of π. Branches without intensity are omitted.
///
/// ## Parameters
///   - `length`: length of the splitter surface (default: 50)
///   - `splitter_type`: [`SplitterType::Plain`] with ratio 0.5 (default) or [`SplitterType::Polarizing`]
#[derive(Debug, Clone)]
pub struct BeamSplitter {
    attr: ComponentAttr,
    params: BeamSplitterParams,
    segment: Option<LineSegment>,
}
impl Default for BeamSplitter {
    fn default() -> Self {
        let mut splitter = Self {
            attr: ComponentAttr::new("Beam splitter", Placement::default()),
            params: BeamSplitterParams::default(),
            segment: None,
        };
        splitter.update_geometry();
        splitter
    }
}
impl BeamSplitter {
    /// Creates a new [`BeamSplitter`] of the given type.
    ///
    /// # Errors
    ///
    /// This function will return an error if the splitting ratio is outside the closed interval `[0.0..1.0]` or
    /// the axis of a polarizing splitter is not finite.
    pub fn new(name: &str, placement: Placement, splitter_type: SplitterType) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            BeamSplitterParams {
                splitter_type,
                ..BeamSplitterParams::default()
            },
        )
    }
    /// Creates a [`BeamSplitter`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: BeamSplitterParams) -> LumosResult<Self> {
        let mut splitter = Self {
            attr,
            ..Self::default()
        };
        splitter.set_length(params.length)?;
        splitter.set_splitter_type(params.splitter_type)?;
        Ok(splitter)
    }
    /// Sets the length of this [`BeamSplitter`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is <= 0.0 or not finite.
    pub fn set_length(&mut self, length: f64) -> LumosResult<Invalidation> {
        check_length(length, "splitter length")?;
        self.params.length = length;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the [`SplitterType`] of this [`BeamSplitter`].
    #[must_use]
    pub const fn splitter_type(&self) -> SplitterType {
        self.params.splitter_type
    }
    /// Sets the [`SplitterType`] of this [`BeamSplitter`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the splitting ratio is outside the closed interval `[0.0..1.0]` or
    /// the axis of a polarizing splitter is not finite.
    pub fn set_splitter_type(&mut self, splitter_type: SplitterType) -> LumosResult<Invalidation> {
        match splitter_type {
            SplitterType::Plain { ratio } => check_ratio(ratio, "splitting ratio")?,
            SplitterType::Polarizing { axis } => {
                if !axis.is_finite() {
                    return Err(LumosError::Configuration(
                        "splitter axis must be finite".into(),
                    ));
                }
            }
        }
        self.params.splitter_type = splitter_type;
        Ok(Invalidation::Optics)
    }
}
impl OpticalComponent for BeamSplitter {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::BeamSplitter
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::BeamSplitter(self.params.clone())
    }
    fn update_geometry(&mut self) {
        self.segment = centered_segment(&self.attr.placement(), self.params.length);
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
        _config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        let mut transmitted = ray.child(ray.direction())?;
        let mut reflected = ray.child(reflect(&ray.direction(), &hit.normal))?;
        if hit.front_side {
            reflected.add_phase(PI);
        }
        let (t, r) = match self.params.splitter_type {
            SplitterType::Plain { ratio } => (ratio, 1.0 - ratio),
            SplitterType::Polarizing { axis } => {
                let axis = axis.get::<radian>();
                let polarization = ray.polarization();
                let (p, t) = polarization.transform(&JonesMatrix::linear_polarizer(axis));
                let (s, r) =
                    polarization.transform(&JonesMatrix::linear_polarizer(axis + FRAC_PI_2));
                transmitted.set_polarization(p);
                reflected.set_polarization(s);
                (t.clamp(0.0, 1.0), r.clamp(0.0, 1.0))
            }
        };
        let mut children = Vec::with_capacity(2);
        if t > 0.0 {
            transmitted.scale_intensity(t)?;
            children.push(transmitted);
        }
        if r > 0.0 {
            reflected.scale_intensity(r)?;
            children.push(reflected);
        }
        if children.is_empty() {
            return Ok(Interaction::terminated(Termination::Absorbed));
        }
        Ok(Interaction::children(children))
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
