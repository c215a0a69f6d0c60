#![warn(missing_docs)]
//! Diffraction grating
use std::{any::Any, f64::consts::PI};

use serde::{Deserialize, Serialize};
use strum::Display;
use uom::si::f64::LinearNumberDensity;

use super::{centered_segment, check_length, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    error::{LumosError, LumosResult},
    num_per_mm,
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId},
    optics::grating::{diffracted_sine, order_efficiency, wavelength_over_period},
    ray::Ray,
    surface::{GeoSurface, LineSegment},
    utils::geom_transformation::Placement,
};

/// Operation mode of a [`DiffractionGrating`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum GratingMode {
    /// diffracted orders leave the grating on the far side
    #[default]
    Transmission,
    /// diffracted orders are sent back to the side of the incoming light
    Reflection,
}

/// Parameters of a [`DiffractionGrating`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffractionGratingParams {
    /// length of the grating
    pub length: f64,
    /// number of grating lines per length
    pub line_density: LinearNumberDensity,
    /// lowest diffraction order
    pub min_order: i32,
    /// highest diffraction order
    pub max_order: i32,
    /// transmission or reflection grating
    pub mode: GratingMode,
}
impl Default for DiffractionGratingParams {
    fn default() -> Self {
        Self {
            length: 100.0,
            line_density: num_per_mm!(600.0),
            min_order: -2,
            max_order: 2,
            mode: GratingMode::Transmission,
        }
    }
}

/// A thin diffraction grating with its lines perpendicular to the scene plane.
///
/// Every order `m` of the configured range following `d·(sinθₘ − sinθᵢ) = m·λ` creates a child ray if
/// `|sinθₘ| ≤ 1`. The angles are measured against the grating normal, positive toward the tangent direction of
/// the placement. The intensity of an order is given by a fixed per-order efficiency table. Each order gets the
/// grating phase `2π·m·h/d` of its hit position `h`.
#[derive(Debug, Clone)]
pub struct DiffractionGrating {
    attr: ComponentAttr,
    params: DiffractionGratingParams,
    segment: Option<LineSegment>,
}
impl Default for DiffractionGrating {
    fn default() -> Self {
        let mut grating = Self {
            attr: ComponentAttr::new("Diffraction grating", Placement::default()),
            params: DiffractionGratingParams::default(),
            segment: None,
        };
        grating.update_geometry();
        grating
    }
}
impl DiffractionGrating {
    /// Creates a new [`DiffractionGrating`] with the given line density.
    ///
    /// # Errors
    ///
    /// This function will return an error if the line density is invalid.
    pub fn new(
        name: &str,
        placement: Placement,
        line_density: LinearNumberDensity,
        mode: GratingMode,
    ) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            DiffractionGratingParams {
                line_density,
                mode,
                ..DiffractionGratingParams::default()
            },
        )
    }
    /// Creates a [`DiffractionGrating`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: DiffractionGratingParams) -> LumosResult<Self> {
        let mut grating = Self {
            attr,
            ..Self::default()
        };
        grating.set_length(params.length)?;
        grating.set_line_density(params.line_density)?;
        grating.set_orders(params.min_order, params.max_order)?;
        let _ = grating.set_mode(params.mode);
        Ok(grating)
    }
    /// Sets the length of this [`DiffractionGrating`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is <= 0.0 or not finite.
    pub fn set_length(&mut self, length: f64) -> LumosResult<Invalidation> {
        check_length(length, "grating length")?;
        self.params.length = length;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the line density of this [`DiffractionGrating`].
    #[must_use]
    pub const fn line_density(&self) -> LinearNumberDensity {
        self.params.line_density
    }
    /// Sets the line density of this [`DiffractionGrating`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the line density is <= 0.0 or not finite.
    pub fn set_line_density(&mut self, line_density: LinearNumberDensity) -> LumosResult<Invalidation> {
        if !line_density.is_finite() || line_density.value <= 0.0 {
            return Err(LumosError::Configuration(
                "line density must be >0.0 and finite".into(),
            ));
        }
        self.params.line_density = line_density;
        Ok(Invalidation::Optics)
    }
    /// Returns the range of diffraction orders.
    #[must_use]
    pub const fn orders(&self) -> (i32, i32) {
        (self.params.min_order, self.params.max_order)
    }
    /// Sets the range of diffraction orders.
    ///
    /// # Errors
    ///
    /// This function will return an error if `min_order > max_order`.
    pub fn set_orders(&mut self, min_order: i32, max_order: i32) -> LumosResult<Invalidation> {
        if min_order > max_order {
            return Err(LumosError::Configuration(
                "lowest diffraction order must not exceed the highest order".into(),
            ));
        }
        self.params.min_order = min_order;
        self.params.max_order = max_order;
        Ok(Invalidation::Optics)
    }
    /// Returns the [`GratingMode`] of this [`DiffractionGrating`].
    #[must_use]
    pub const fn mode(&self) -> GratingMode {
        self.params.mode
    }
    /// Sets the [`GratingMode`] of this [`DiffractionGrating`].
    pub fn set_mode(&mut self, mode: GratingMode) -> Invalidation {
        self.params.mode = mode;
        Invalidation::Optics
    }
}
impl OpticalComponent for DiffractionGrating {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::DiffractionGrating
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::DiffractionGrating(self.params.clone())
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
        config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        let placement = self.attr.placement();
        let tangent = placement.tangent();
        let outgoing_axis = match self.params.mode {
            GratingMode::Transmission => -hit.normal,
            GratingMode::Reflection => hit.normal,
        };
        let sin_incidence = ray.direction().dot(&tangent);
        let ratio = wavelength_over_period(ray.wavelength().effective(), self.params.line_density);
        let height = (hit.point - placement.position()).dot(&tangent);
        let lines_to_hit = (config.length_unit() * self.params.line_density).value * height;
        let mut children = Vec::new();
        for order in self.params.min_order..=self.params.max_order {
            let efficiency = order_efficiency(order);
            if efficiency <= 0.0 {
                continue;
            }
            let Some(sin_m) = diffracted_sine(sin_incidence, order, ratio) else {
                continue;
            };
            let cos_m = sin_m.mul_add(-sin_m, 1.0).max(0.0).sqrt();
            let mut child = ray.child(outgoing_axis * cos_m + tangent * sin_m)?;
            child.scale_intensity(efficiency)?;
            child.add_phase(2.0 * PI * f64::from(order) * lines_to_hit);
            children.push(child);
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
