#![warn(missing_docs)]
//! This module contains the concrete optical components (mirrors, lenses, polarizers, detectors, ...)
mod acousto_optic_modulator;
mod beam_splitter;
mod component_attr;
mod dielectric;
mod dielectric_block;
mod diffraction_grating;
mod faraday_rotator;
mod fiber_coupler;
mod mirror;
mod multi_slit;
mod parabolic_mirror;
mod photodiode;
mod polarizer;
mod prism;
mod screen;
mod spherical_mirror;
mod thin_lens;
mod wave_plate;

pub use acousto_optic_modulator::{AcoustoOpticModulator, AcoustoOpticModulatorParams};
pub use beam_splitter::{BeamSplitter, BeamSplitterParams, SplitterType};
pub use component_attr::ComponentAttr;
pub use dielectric::DielectricMaterial;
pub use dielectric_block::{DielectricBlock, DielectricBlockParams};
pub use diffraction_grating::{DiffractionGrating, DiffractionGratingParams, GratingMode};
pub use faraday_rotator::{FaradayMode, FaradayRotator, FaradayRotatorParams};
pub use fiber_coupler::{FiberCoupler, FiberCouplerParams};
pub use mirror::{Mirror, MirrorParams};
pub use multi_slit::{MultiSlit, MultiSlitParams};
pub use parabolic_mirror::{ParabolicMirror, ParabolicMirrorParams};
pub use photodiode::{Photodiode, PhotodiodeParams};
pub use polarizer::{Polarizer, PolarizerParams};
pub use prism::{Prism, PrismParams};
pub use screen::{Screen, ScreenParams, MAX_SCREEN_BINS};
pub use spherical_mirror::{SphericalMirror, SphericalMirrorParams};
pub use thin_lens::{ThinLens, ThinLensParams};
pub use wave_plate::{WavePlate, WavePlateParams, WavePlateType};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{
    error::{LumosError, LumosResult},
    optic_component::OpticalComponent,
    surface::LineSegment,
    utils::geom_transformation::Placement,
};

/// Kind of an optical component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ComponentKind {
    /// flat mirror
    Mirror,
    /// spherical mirror
    SphericalMirror,
    /// parabolic mirror
    ParabolicMirror,
    /// ideal thin lens
    ThinLens,
    /// rectangular dielectric block
    DielectricBlock,
    /// triangular dielectric prism
    Prism,
    /// multi-slit aperture
    MultiSlit,
    /// diffraction grating
    DiffractionGrating,
    /// linear polarizer
    Polarizer,
    /// half- or quarter-wave plate
    WavePlate,
    /// plain or polarizing beam splitter
    BeamSplitter,
    /// acousto-optic modulator
    AcoustoOpticModulator,
    /// Faraday rotator or isolator
    FaradayRotator,
    /// fiber coupler
    FiberCoupler,
    /// spatially resolving detector
    Screen,
    /// integrating detector
    Photodiode,
}

/// Kind-specific parameters of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[allow(missing_docs)]
pub enum ComponentParams {
    Mirror(MirrorParams),
    SphericalMirror(SphericalMirrorParams),
    ParabolicMirror(ParabolicMirrorParams),
    ThinLens(ThinLensParams),
    DielectricBlock(DielectricBlockParams),
    Prism(PrismParams),
    MultiSlit(MultiSlitParams),
    DiffractionGrating(DiffractionGratingParams),
    Polarizer(PolarizerParams),
    WavePlate(WavePlateParams),
    BeamSplitter(BeamSplitterParams),
    AcoustoOpticModulator(AcoustoOpticModulatorParams),
    FaradayRotator(FaradayRotatorParams),
    FiberCoupler(FiberCouplerParams),
    Screen(ScreenParams),
    Photodiode(PhotodiodeParams),
}
impl Default for ComponentParams {
    fn default() -> Self {
        Self::Mirror(MirrorParams::default())
    }
}
impl ComponentParams {
    /// Returns the [`ComponentKind`] these parameters belong to.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Mirror(_) => ComponentKind::Mirror,
            Self::SphericalMirror(_) => ComponentKind::SphericalMirror,
            Self::ParabolicMirror(_) => ComponentKind::ParabolicMirror,
            Self::ThinLens(_) => ComponentKind::ThinLens,
            Self::DielectricBlock(_) => ComponentKind::DielectricBlock,
            Self::Prism(_) => ComponentKind::Prism,
            Self::MultiSlit(_) => ComponentKind::MultiSlit,
            Self::DiffractionGrating(_) => ComponentKind::DiffractionGrating,
            Self::Polarizer(_) => ComponentKind::Polarizer,
            Self::WavePlate(_) => ComponentKind::WavePlate,
            Self::BeamSplitter(_) => ComponentKind::BeamSplitter,
            Self::AcoustoOpticModulator(_) => ComponentKind::AcoustoOpticModulator,
            Self::FaradayRotator(_) => ComponentKind::FaradayRotator,
            Self::FiberCoupler(_) => ComponentKind::FiberCoupler,
            Self::Screen(_) => ComponentKind::Screen,
            Self::Photodiode(_) => ComponentKind::Photodiode,
        }
    }
}

/// Configuration snapshot of a component: common attributes plus kind specific parameters.
///
/// This is sufficient to reconstruct an equivalent component using [`create_component`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// common attributes (name, id, placement)
    pub attr: ComponentAttr,
    /// kind specific parameters
    pub params: ComponentParams,
}
impl ComponentConfig {
    /// Creates a new [`ComponentConfig`].
    #[must_use]
    pub const fn new(attr: ComponentAttr, params: ComponentParams) -> Self {
        Self { attr, params }
    }
    /// Returns the [`ComponentKind`] of this config.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        self.params.kind()
    }
}

/// Factory function creating a new optical component from its configuration.
///
/// The created component keeps the id stored in the config.
///
/// # Errors
///
/// This function will return an [`LumosError`] if the parameters of the config are invalid.
pub fn create_component(config: &ComponentConfig) -> LumosResult<Box<dyn OpticalComponent>> {
    let attr = config.attr.clone();
    let component: Box<dyn OpticalComponent> = match &config.params {
        ComponentParams::Mirror(p) => Box::new(Mirror::from_params(attr, p.clone())?),
        ComponentParams::SphericalMirror(p) => {
            Box::new(SphericalMirror::from_params(attr, p.clone())?)
        }
        ComponentParams::ParabolicMirror(p) => {
            Box::new(ParabolicMirror::from_params(attr, p.clone())?)
        }
        ComponentParams::ThinLens(p) => Box::new(ThinLens::from_params(attr, p.clone())?),
        ComponentParams::DielectricBlock(p) => {
            Box::new(DielectricBlock::from_params(attr, p.clone())?)
        }
        ComponentParams::Prism(p) => Box::new(Prism::from_params(attr, p.clone())?),
        ComponentParams::MultiSlit(p) => Box::new(MultiSlit::from_params(attr, p.clone())?),
        ComponentParams::DiffractionGrating(p) => {
            Box::new(DiffractionGrating::from_params(attr, p.clone())?)
        }
        ComponentParams::Polarizer(p) => Box::new(Polarizer::from_params(attr, p.clone())?),
        ComponentParams::WavePlate(p) => Box::new(WavePlate::from_params(attr, p.clone())?),
        ComponentParams::BeamSplitter(p) => Box::new(BeamSplitter::from_params(attr, p.clone())?),
        ComponentParams::AcoustoOpticModulator(p) => {
            Box::new(AcoustoOpticModulator::from_params(attr, p.clone())?)
        }
        ComponentParams::FaradayRotator(p) => {
            Box::new(FaradayRotator::from_params(attr, p.clone())?)
        }
        ComponentParams::FiberCoupler(p) => Box::new(FiberCoupler::from_params(attr, p.clone())?),
        ComponentParams::Screen(p) => Box::new(Screen::from_params(attr, p.clone())?),
        ComponentParams::Photodiode(p) => Box::new(Photodiode::from_params(attr, p.clone())?),
    };
    Ok(component)
}
/// Factory function creating a default component of the given kind.
#[must_use]
pub fn create_default_component(kind: ComponentKind) -> Box<dyn OpticalComponent> {
    match kind {
        ComponentKind::Mirror => Box::<Mirror>::default(),
        ComponentKind::SphericalMirror => Box::<SphericalMirror>::default(),
        ComponentKind::ParabolicMirror => Box::<ParabolicMirror>::default(),
        ComponentKind::ThinLens => Box::<ThinLens>::default(),
        ComponentKind::DielectricBlock => Box::<DielectricBlock>::default(),
        ComponentKind::Prism => Box::<Prism>::default(),
        ComponentKind::MultiSlit => Box::<MultiSlit>::default(),
        ComponentKind::DiffractionGrating => Box::<DiffractionGrating>::default(),
        ComponentKind::Polarizer => Box::<Polarizer>::default(),
        ComponentKind::WavePlate => Box::<WavePlate>::default(),
        ComponentKind::BeamSplitter => Box::<BeamSplitter>::default(),
        ComponentKind::AcoustoOpticModulator => Box::<AcoustoOpticModulator>::default(),
        ComponentKind::FaradayRotator => Box::<FaradayRotator>::default(),
        ComponentKind::FiberCoupler => Box::<FiberCoupler>::default(),
        ComponentKind::Screen => Box::<Screen>::default(),
        ComponentKind::Photodiode => Box::<Photodiode>::default(),
    }
}

/// Line segment of the given length centered at the placement position along its tangent.
///
/// Returns `None` for a degenerate (zero) length.
fn centered_segment(placement: &Placement, length: f64) -> Option<LineSegment> {
    LineSegment::centered(placement.position(), placement.tangent(), length).ok()
}
fn check_length(value: f64, what: &str) -> LumosResult<()> {
    if value <= 0.0 || !value.is_finite() {
        return Err(LumosError::Configuration(format!(
            "{what} must be >0.0 and finite"
        )));
    }
    Ok(())
}
fn check_ratio(value: f64, what: &str) -> LumosResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(LumosError::Configuration(format!(
            "{what} must be within (0.0..=1.0)"
        )));
    }
    Ok(())
}
