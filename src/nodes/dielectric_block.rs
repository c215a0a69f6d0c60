#![warn(missing_docs)]
//! Rectangular dielectric block
use std::any::Any;

use serde::{Deserialize, Serialize};

use super::{check_length, ComponentAttr, ComponentKind, ComponentParams, DielectricMaterial};
use crate::{
    analyzers::RayTraceConfig,
    error::LumosResult,
    optic_component::{Hit, Interaction, Invalidation, OpticalComponent, SurfaceId},
    ray::Ray,
    surface::{GeoSurface, Polygon},
    utils::geom_transformation::Placement,
};

/// Parameters of a [`DielectricBlock`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DielectricBlockParams {
    /// extent along the optical axis
    pub width: f64,
    /// extent perpendicular to the optical axis
    pub height: f64,
    /// material of the block
    pub material: DielectricMaterial,
}
impl Default for DielectricBlockParams {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 100.0,
            material: DielectricMaterial::default(),
        }
    }
}

/// A rectangular block of a dielectric material centered at its placement position.
///
/// Every boundary splits an incoming ray into a reflected and a transmitted part according to the coating of the
/// material. Light travelling inside the block is attenuated by the bulk absorption.
#[derive(Debug, Clone)]
pub struct DielectricBlock {
    attr: ComponentAttr,
    params: DielectricBlockParams,
    body: Option<Polygon>,
}
impl Default for DielectricBlock {
    fn default() -> Self {
        let mut block = Self {
            attr: ComponentAttr::new("Dielectric block", Placement::default()),
            params: DielectricBlockParams::default(),
            body: None,
        };
        block.update_geometry();
        block
    }
}
impl DielectricBlock {
    /// Creates a new [`DielectricBlock`] of the default material.
    ///
    /// # Errors
    ///
    /// This function will return an error if width or height are <= 0.0 or not finite.
    pub fn new(name: &str, placement: Placement, width: f64, height: f64) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            DielectricBlockParams {
                width,
                height,
                material: DielectricMaterial::default(),
            },
        )
    }
    /// Creates a [`DielectricBlock`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: DielectricBlockParams) -> LumosResult<Self> {
        let mut block = Self {
            attr,
            ..Self::default()
        };
        block.set_size(params.width, params.height)?;
        block.set_material(params.material)?;
        Ok(block)
    }
    /// Returns the width (along the optical axis) of this [`DielectricBlock`].
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.params.width
    }
    /// Returns the height (perpendicular to the optical axis) of this [`DielectricBlock`].
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.params.height
    }
    /// Sets the size of this [`DielectricBlock`].
    ///
    /// # Errors
    ///
    /// This function will return an error if width or height are <= 0.0 or not finite.
    pub fn set_size(&mut self, width: f64, height: f64) -> LumosResult<Invalidation> {
        check_length(width, "block width")?;
        check_length(height, "block height")?;
        self.params.width = width;
        self.params.height = height;
        self.update_geometry();
        Ok(Invalidation::Geometry)
    }
    /// Returns the material of this [`DielectricBlock`].
    #[must_use]
    pub const fn material(&self) -> &DielectricMaterial {
        &self.params.material
    }
    /// Sets the material of this [`DielectricBlock`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the material parameters are invalid.
    pub fn set_material(&mut self, material: DielectricMaterial) -> LumosResult<Invalidation> {
        material.validate()?;
        self.params.material = material;
        Ok(Invalidation::Optics)
    }
}
impl OpticalComponent for DielectricBlock {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::DielectricBlock
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::DielectricBlock(self.params.clone())
    }
    fn update_geometry(&mut self) {
        let placement = self.attr.placement();
        let (u, v) = (self.params.width / 2.0, self.params.height / 2.0);
        self.body = Polygon::new(vec![
            placement.to_global(-u, -v),
            placement.to_global(u, -v),
            placement.to_global(u, v),
            placement.to_global(-u, v),
        ])
        .ok();
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .body
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        let index = hit.index;
        Some(Hit::from_surface(hit, SurfaceId::Edge(index)))
    }
    fn interact(
        &mut self,
        ray: &Ray,
        hit: &Hit,
        config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        self.params
            .material
            .interact(ray, hit, hit.front_side, config)
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
