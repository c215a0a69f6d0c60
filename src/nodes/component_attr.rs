//! Common optical component attributes.
//!
//! This module handles common attributes of optical components such as their name, id and placement.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::geom_transformation::Placement;

/// Struct for storing common attributes of optical components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAttr {
    name: String,
    uuid: Uuid,
    #[serde(default)]
    placement: Placement,
}
impl Default for ComponentAttr {
    fn default() -> Self {
        Self::new("", Placement::default())
    }
}
impl ComponentAttr {
    /// Creates new component attributes ([`ComponentAttr`]) with a random id.
    #[must_use]
    pub fn new(name: &str, placement: Placement) -> Self {
        Self {
            name: name.into(),
            uuid: Uuid::new_v4(),
            placement,
        }
    }
    /// Returns the name of this component.
    #[must_use]
    pub fn name(&self) -> String {
        self.name.clone()
    }
    /// Sets the name of this component.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.into();
    }
    /// Returns the id of this component.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }
    /// Sets the id of this component.
    pub fn set_uuid(&mut self, uuid: Uuid) {
        self.uuid = uuid;
    }
    /// Returns the [`Placement`] of this component.
    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }
    /// Sets the [`Placement`] of this component.
    ///
    /// **Note**: This does not update the geometry of the component itself.
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }
}
