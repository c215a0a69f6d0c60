#![warn(missing_docs)]
//! Spatially resolving detector with coherent accumulation
use std::{any::Any, fmt::Debug};

use kahan::KahanSum;
use log::warn;
use serde::{Deserialize, Serialize};

use super::{centered_segment, ComponentAttr, ComponentKind, ComponentParams};
use crate::{
    analyzers::RayTraceConfig,
    error::{LumosError, LumosResult},
    optic_component::{
        DetectorReadout, Hit, Interaction, Invalidation, OpticalComponent, SurfaceId, Termination,
    },
    ray::Ray,
    surface::{GeoSurface, LineSegment},
    utils::{
        geom_transformation::Placement,
        math_utils::{f64_to_usize, usize_to_f64},
    },
};

/// Maximum number of bins of a [`Screen`]
pub const MAX_SCREEN_BINS: usize = 1_000_000;

/// Parameters of a [`Screen`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenParams {
    /// length of the screen
    pub length: f64,
    /// number of equally sized bins along the screen
    pub bins: usize,
}
impl Default for ScreenParams {
    fn default() -> Self {
        Self {
            length: 200.0,
            bins: 100,
        }
    }
}

/// A screen detecting the light distribution along its length.
///
/// Every hit is sorted into one of `bins` equally sized bins by its position along the screen. Each bin sums the
/// complex field amplitude `√I·e^{iφ}` of all incoming rays (coherent superposition) and separately the intensities
/// (incoherent sum). The displayed intensity of a bin is `|Σ amplitude|²`. Both sides of the screen detect.
///
/// Changing the length, the number of bins or the placement clears all bins.
pub struct Screen {
    attr: ComponentAttr,
    params: ScreenParams,
    segment: Option<LineSegment>,
    real: Vec<KahanSum<f64>>,
    imag: Vec<KahanSum<f64>>,
    incoherent: Vec<KahanSum<f64>>,
    hits: Vec<usize>,
}
impl Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("attr", &self.attr)
            .field("params", &self.params)
            .field("hits", &self.hits.iter().sum::<usize>())
            .finish_non_exhaustive()
    }
}
impl Default for Screen {
    fn default() -> Self {
        let mut screen = Self {
            attr: ComponentAttr::new("Screen", Placement::default()),
            params: ScreenParams::default(),
            segment: None,
            real: Vec::new(),
            imag: Vec::new(),
            incoherent: Vec::new(),
            hits: Vec::new(),
        };
        screen.update_geometry();
        screen.reset();
        screen
    }
}
impl Screen {
    /// Creates a new [`Screen`] with the given length and number of bins.
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is negative or not finite or the number of bins exceeds
    /// [`MAX_SCREEN_BINS`].
    pub fn new(name: &str, placement: Placement, length: f64, bins: usize) -> LumosResult<Self> {
        Self::from_params(
            ComponentAttr::new(name, placement),
            ScreenParams { length, bins },
        )
    }
    /// Creates a [`Screen`] from its attributes and parameters.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters are invalid.
    pub fn from_params(attr: ComponentAttr, params: ScreenParams) -> LumosResult<Self> {
        let mut screen = Self {
            attr,
            ..Self::default()
        };
        screen.set_length(params.length)?;
        screen.set_bins(params.bins)?;
        Ok(screen)
    }
    /// Returns the length of this [`Screen`].
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.params.length
    }
    /// Sets the length of this [`Screen`]. All bins are cleared.
    ///
    /// A length of zero is accepted but leads to a screen without active area.
    ///
    /// # Errors
    ///
    /// This function will return an error if the length is negative or not finite.
    pub fn set_length(&mut self, length: f64) -> LumosResult<Invalidation> {
        if length.is_sign_negative() || !length.is_finite() {
            return Err(LumosError::Configuration(
                "screen length must be >=0.0 and finite".into(),
            ));
        }
        self.params.length = length;
        self.update_geometry();
        self.reset();
        Ok(Invalidation::Geometry)
    }
    /// Returns the number of bins of this [`Screen`].
    #[must_use]
    pub const fn bins(&self) -> usize {
        self.params.bins
    }
    /// Sets the number of bins. All bins are cleared.
    ///
    /// # Errors
    ///
    /// This function will return an error if the number of bins exceeds [`MAX_SCREEN_BINS`].
    pub fn set_bins(&mut self, bins: usize) -> LumosResult<Invalidation> {
        if bins > MAX_SCREEN_BINS {
            return Err(LumosError::Configuration(format!(
                "number of screen bins must be <={MAX_SCREEN_BINS}"
            )));
        }
        self.params.bins = bins;
        self.update_geometry();
        self.reset();
        Ok(Invalidation::Geometry)
    }
    /// Index of the bin for the given signed position along the screen (measured from its center).
    fn bin_index(&self, param: f64) -> Option<usize> {
        let (length, bins) = (self.params.length, self.params.bins);
        if bins == 0 || length <= 0.0 {
            return None;
        }
        let relative = (param / length + 0.5).clamp(0.0, 1.0);
        Some(f64_to_usize((relative * usize_to_f64(bins)).floor()).min(bins - 1))
    }
    /// Returns the coherent intensity `|Σ amplitude|²` of every bin.
    #[must_use]
    pub fn coherent_intensities(&self) -> Vec<f64> {
        self.real
            .iter()
            .zip(self.imag.iter())
            .map(|(re, im)| re.sum().mul_add(re.sum(), im.sum() * im.sum()))
            .collect()
    }
    /// Returns the incoherent intensity sum of every bin.
    #[must_use]
    pub fn incoherent_intensities(&self) -> Vec<f64> {
        self.incoherent.iter().map(|s| s.sum()).collect()
    }
    /// Returns the number of rays detected per bin.
    #[must_use]
    pub fn hits(&self) -> &[usize] {
        &self.hits
    }
    /// Returns the maximum coherent intensity over all bins.
    #[must_use]
    pub fn max_intensity(&self) -> f64 {
        self.coherent_intensities().into_iter().fold(0.0, f64::max)
    }
}
impl OpticalComponent for Screen {
    fn attr(&self) -> &ComponentAttr {
        &self.attr
    }
    fn attr_mut(&mut self) -> &mut ComponentAttr {
        &mut self.attr
    }
    fn kind(&self) -> ComponentKind {
        ComponentKind::Screen
    }
    fn params(&self) -> ComponentParams {
        ComponentParams::Screen(self.params.clone())
    }
    fn update_geometry(&mut self) {
        self.segment = if self.params.bins == 0 {
            None
        } else {
            centered_segment(&self.attr.placement(), self.params.length)
        };
        if self.segment.is_none() {
            warn!("screen '{}' has no active area", self.attr.name());
        }
    }
    fn intersect(&self, ray: &Ray, min_distance: f64) -> Option<Hit> {
        let hit = self
            .segment
            .as_ref()?
            .intersect(&ray.position(), &ray.direction(), min_distance)?;
        Some(Hit::from_surface(hit, SurfaceId::ActiveArea))
    }
    fn interact(
        &mut self,
        ray: &Ray,
        hit: &Hit,
        _config: &RayTraceConfig,
    ) -> LumosResult<Interaction> {
        let Some(idx) = self.bin_index(hit.param) else {
            return Ok(Interaction::terminated(Termination::Absorbed));
        };
        let amplitude = ray.intensity().sqrt();
        let (sin, cos) = ray.phase().sin_cos();
        self.real[idx] += amplitude * cos;
        self.imag[idx] += amplitude * sin;
        self.incoherent[idx] += ray.intensity();
        self.hits[idx] += 1;
        Ok(Interaction::terminated(Termination::Detected))
    }
    fn reset(&mut self) {
        let bins = self.params.bins;
        self.real = (0..bins).map(|_| KahanSum::new()).collect();
        self.imag = (0..bins).map(|_| KahanSum::new()).collect();
        self.incoherent = (0..bins).map(|_| KahanSum::new()).collect();
        self.hits = vec![0; bins];
    }
    fn readout(&self) -> Option<DetectorReadout> {
        let coherent = self.coherent_intensities();
        let max = coherent.iter().copied().fold(0.0, f64::max);
        let normalized = if max > 0.0 {
            coherent.iter().map(|i| i / max).collect()
        } else {
            vec![0.0; coherent.len()]
        };
        Some(DetectorReadout::Screen {
            coherent,
            normalized,
            incoherent: self.incoherent_intensities(),
            hits: self.hits.clone(),
            max,
        })
    }
    fn warnings(&self) -> Vec<String> {
        if self.segment.is_none() {
            vec![format!(
                "screen '{}' has zero extent and will not detect any light",
                self.attr.name()
            )]
        } else {
            Vec::new()
        }
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
