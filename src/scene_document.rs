#![warn(missing_docs)]
//! Scene files.
//!
//! A [`SceneDocument`] holds the file version, the [`RayTraceConfig`], the laser sources and the configuration
//! snapshots of all components of a [`Scene`](crate::scene::Scene). This module also handles reading and writing of
//! (YAML) scene files.
use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    analyzers::RayTraceConfig,
    error::{LumosError, LumosResult},
    nodes::ComponentConfig,
    source::LaserSource,
};

/// Version of the scene file format written by this crate.
pub const SCENE_FILE_VERSION: &str = "0.1";

/// Serializable representation of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    file_version: String,
    #[serde(default)]
    config: RayTraceConfig,
    #[serde(default)]
    sources: Vec<LaserSource>,
    #[serde(default)]
    components: Vec<ComponentConfig>,
}
impl Default for SceneDocument {
    fn default() -> Self {
        Self {
            file_version: SCENE_FILE_VERSION.to_string(),
            config: RayTraceConfig::default(),
            sources: Vec::new(),
            components: Vec::new(),
        }
    }
}
impl SceneDocument {
    /// Creates a new [`SceneDocument`].
    #[must_use]
    pub fn new(
        config: RayTraceConfig,
        sources: Vec<LaserSource>,
        components: Vec<ComponentConfig>,
    ) -> Self {
        Self {
            config,
            sources,
            components,
            ..Self::default()
        }
    }
    /// Create a new [`SceneDocument`] from a scene file at the given path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the given path is not found or readable.
    ///   - the parsing / deserialization of the file failed.
    pub fn from_file(path: &Path) -> LumosResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            LumosError::Document(format!("cannot read file {} : {}", path.display(), e))
        })?;
        info!("reading scene file {}", path.display());
        Self::from_string(&contents)
    }
    /// Create a new [`SceneDocument`] from the given YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parsing of the string failed.
    pub fn from_string(file_string: &str) -> LumosResult<Self> {
        let document: Self = serde_yaml::from_str(file_string)
            .map_err(|e| LumosError::Document(format!("parsing of scene failed: {e}")))?;
        if document.file_version != SCENE_FILE_VERSION {
            warn!("scene file version does not match the used LUMOS version.");
            warn!(
                "read version '{}' <-> program file version '{}'",
                document.file_version, SCENE_FILE_VERSION
            );
            warn!("This file might haven been written by an older or newer version of LUMOS. The scene import might not be correct.");
        }
        Ok(document)
    }
    /// Save this [`SceneDocument`] to a file with the given path
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the serialization of the document failed.
    ///   - the file path cannot be created.
    ///   - it cannot write into the file (e.g. no space).
    pub fn save_to_file(&self, path: &Path) -> LumosResult<()> {
        let serialized = self.to_yaml_string()?;
        let mut output = File::create(path).map_err(|e| {
            LumosError::Document(format!(
                "could not create file path: {}: {}",
                path.display(),
                e
            ))
        })?;
        write!(output, "{serialized}").map_err(|e| {
            LumosError::Document(format!(
                "writing to file path {} failed: {}",
                path.display(),
                e
            ))
        })?;
        Ok(())
    }
    /// Return the YAML representation of this [`SceneDocument`]
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization of the internal structures fail.
    pub fn to_yaml_string(&self) -> LumosResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LumosError::Document(format!("serialization of SceneDocument failed: {e}")))
    }
    /// Returns the file version of this [`SceneDocument`].
    #[must_use]
    pub fn file_version(&self) -> &str {
        &self.file_version
    }
    /// Returns a reference to the [`RayTraceConfig`] of this [`SceneDocument`].
    #[must_use]
    pub const fn config(&self) -> &RayTraceConfig {
        &self.config
    }
    /// Returns the sources of this [`SceneDocument`].
    #[must_use]
    pub fn sources(&self) -> &[LaserSource] {
        &self.sources
    }
    /// Returns the component configs of this [`SceneDocument`].
    #[must_use]
    pub fn components(&self) -> &[ComponentConfig] {
        &self.components
    }
}
