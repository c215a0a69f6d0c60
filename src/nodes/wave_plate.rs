#![warn(missing_docs)]
//! Half- and quarter-wave plates
use std::any::Any;

use serde::{Deserialize, Serialize};
use strum::Display;
use uom::si::{angle::radian, f64::Angle};

use super::{centered_segment, check_length, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    degree,
    error::{LumosError, LumosResult},
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId},
    optics::JonesMatrix,
    ray::Ray,
    surface::{GeoSurface, LineSegment},
    utils::geom_transformation::Placement,
};

/// Retardance of a [`WavePlate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum WavePlateType {
    /// λ/2 plate
    #[default]
    Half,
    /// λ/4 plate
    Quarter,
}

/// Parameters of a [`WavePlate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavePlateParams {
    /// length of the plate
    pub length: f64,
    /// retardance
    pub plate_type: WavePlateType,
    /// angle of the fast axis
    pub fast_axis: Angle,
}
impl Default for WavePlateParams {
    fn default() -> Self {
        Self {
            length: 50.0,
            plate_type: WavePlateType::Half,
            fast_axis: degree!(0.0),
        }
    }
}

/// A lossless wave plate.
///
/// The Jones vector is rotated into the frame of the fast axis, retarded and rotated back. A half-wave plate
/// with its fast axis at `φ` maps linear light at `θ` to `2φ − θ`.
#[derive(Debug, Clone)]
pub struct WavePlate {
    attr: ComponentAttr,
    params: WavePlateParams,
    segment: Option<LineSegment>,
}
impl Default for WavePlate {
    fn default() -> Self {
        let mut plate = Self {
            attr: ComponentAttr::new("Wave plate", Placement::default()),
            params: WavePlateParams::default(),
            segment: None,
        };
        plate.update_geometry();
        plate
    }
}
impl WavePlate {
    /// Creates a new [`WavePlate`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the fast axis angle is not finite.
    pub fn new(
        name: &str,
        placement: Placement,
        plate_type: WavePlateType,
        fast_axis: Angle,
    ) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            WavePlateParams {
                plate_type,
                fast_axis,
                ..WavePlateParams::default()
            },
        )
    }
    /// Creates a [`WavePlate`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: WavePlateParams) -> LumosResult<Self> {
        let mut plate = Self {
            attr,
            ..Self::default()
        };
        plate.set_length(params.length)?;
        plate.set_fast_axis(params.fast_axis)?;
        let _ = plate.set_plate_type(params.plate_type);
        Ok(plate)
    }
    /// Sets the length of this [`WavePlate`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is <= 0.0 or not finite.
    pub fn set_length(&mut self, length: f64) -> LumosResult<Invalidation> {
        check_length(length, "wave plate length")?;
        self.params.length = length;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the [`WavePlateType`] of this [`WavePlate`].
    #[must_use]
    pub const fn plate_type(&self) -> WavePlateType {
        self.params.plate_type
    }
    /// Sets the [`WavePlateType`] of this [`WavePlate`].
    pub fn set_plate_type(&mut self, plate_type: WavePlateType) -> Invalidation {
        self.params.plate_type = plate_type;
        Invalidation::Optics
    }
    /// Returns the fast axis of this [`WavePlate`].
    #[must_use]
    pub const fn fast_axis(&self) -> Angle {
        self.params.fast_axis
    }
    /// Sets the fast axis of this [`WavePlate`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the angle is not finite.
    pub fn set_fast_axis(&mut self, fast_axis: Angle) -> LumosResult<Invalidation> {
        if !fast_axis.is_finite() {
            return Err(LumosError::Configuration("fast axis must be finite".into()));
        }
        self.params.fast_axis = fast_axis;
        Ok(Invalidation::Optics)
    }
    fn jones_matrix(&self) -> JonesMatrix {
        let axis = self.params.fast_axis.get::<radian>();
        match self.params.plate_type {
            WavePlateType::Half => JonesMatrix::half_wave(axis),
            WavePlateType::Quarter => JonesMatrix::quarter_wave(axis),
        }
    }
}
impl OpticalComponent for WavePlate {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::WavePlate
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::WavePlate(self.params.clone())
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
        _hit: &Hit,
        _config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        let matrix = self.jones_matrix();
        let (polarization, _) = ray.polarization().transform(&matrix);
        let mut transmitted = ray.child(ray.direction())?;
        transmitted.add_phase(ray.polarization().phase_shift(&matrix));
        transmitted.set_polarization(polarization);
        Ok(Interaction::children(vec![transmitted]))
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
