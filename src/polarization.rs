#![warn(missing_docs)]
//! Polarization state of a [`Ray`](crate::ray::Ray).
//!
//! The state is stored as an (optional) normalized [`JonesVector`]. Unpolarized light carries no Jones data. Older
//! scene files describe polarization by a scalar linear angle or an "unpolarized" marker
//! ([`LegacyPolarization`]). Such values are promoted to the Jones representation on construction, so every component
//! works on the same data. A scalar angle can still be reported for linear states via [`Polarization::linear_angle`].
use crate::optics::{JonesMatrix, JonesVector};
use num::complex::Complex64;
use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

/// Scalar polarization description as used by older scene files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum LegacyPolarization {
    /// unpolarized light
    #[default]
    Unpolarized,
    /// linear polarization at the given angle
    Linear(Angle),
}

/// Polarization state of a ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Polarization {
    jones: Option<JonesVector>,
}
impl Polarization {
    /// Unpolarized light.
    #[must_use]
    pub const fn unpolarized() -> Self {
        Self { jones: None }
    }
    /// Linearly polarized light at the given angle.
    #[must_use]
    pub fn linear(angle: Angle) -> Self {
        Self {
            jones: Some(JonesVector::linear(angle.get::<radian>())),
        }
    }
    /// Polarization state from an arbitrary Jones vector.
    ///
    /// The vector is normalized. A zero vector yields an unpolarized state.
    #[must_use]
    pub fn from_jones(jones: JonesVector) -> Self {
        Self {
            jones: jones.normalized(),
        }
    }
    /// Returns the normalized Jones vector or `None` for unpolarized light.
    #[must_use]
    pub const fn jones(&self) -> Option<JonesVector> {
        self.jones
    }
    /// Returns `true` if this state is unpolarized.
    #[must_use]
    pub const fn is_unpolarized(&self) -> bool {
        self.jones.is_none()
    }
    /// Scalar fallback: angle of a linear state.
    ///
    /// Returns `None` for unpolarized or elliptically polarized light.
    #[must_use]
    pub fn linear_angle(&self) -> Option<Angle> {
        self.jones
            .and_then(|j| j.linear_angle())
            .map(Angle::new::<radian>)
    }
    /// Overall phase `arg⟨in|M·in⟩` the given Jones matrix adds to this state.
    ///
    /// This is the retardation seen by a coherent detector, e.g. π for light polarized along the slow axis of a
    /// half-wave plate. Returns zero for unpolarized light and if the outgoing state is orthogonal to the incoming
    /// one. For projectors (linear polarizers) the value is always zero.
    #[must_use]
    pub fn phase_shift(&self, matrix: &JonesMatrix) -> f64 {
        let Some(jones) = self.jones else {
            return 0.0;
        };
        let out = matrix.apply(&jones);
        let overlap = jones.x().conj() * out.x() + jones.y().conj() * out.y();
        if overlap.norm() <= f64::EPSILON {
            0.0
        } else {
            overlap.arg()
        }
    }
    /// Send this state through a Jones matrix.
    ///
    /// Returns the new (normalized) state together with the transmitted intensity fraction. The overall phase
    /// reported by [`Polarization::phase_shift`] is removed from the outgoing Jones vector. Callers have to add it
    /// to the phase of the ray. Unpolarized light is treated as an incoherent mixture of two orthogonal linear
    /// states: the transmission is the mean of both and the outgoing state is the normalized image of the dominant
    /// one. If nothing is transmitted, the state stays unchanged and the fraction is zero.
    #[must_use]
    pub fn transform(&self, matrix: &JonesMatrix) -> (Self, f64) {
        if let Some(jones) = self.jones {
            let out = matrix
                .apply(&jones)
                .scaled(Complex64::from_polar(1.0, -self.phase_shift(matrix)));
            let transmission = out.intensity();
            return out.normalized().map_or((*self, 0.0), |j| {
                (Self { jones: Some(j) }, transmission)
            });
        }
        let out_h = matrix.apply(&JonesVector::horizontal());
        let out_v = matrix.apply(&JonesVector::vertical());
        let transmission = 0.5 * (out_h.intensity() + out_v.intensity());
        if transmission <= f64::EPSILON {
            return (*self, 0.0);
        }
        // coherency matrix M·M† of the outgoing light
        let c_xx = out_h.x().norm_sqr() + out_v.x().norm_sqr();
        let c_yy = out_h.y().norm_sqr() + out_v.y().norm_sqr();
        let c_xy = out_h.x() * out_h.y().conj() + out_v.x() * out_v.y().conj();
        let tolerance = 1e-9 * (c_xx + c_yy);
        if c_xy.norm() <= tolerance && (c_xx - c_yy).abs() <= tolerance {
            return (*self, transmission);
        }
        let dominant = if out_h.intensity() >= out_v.intensity() {
            out_h
        } else {
            out_v
        };
        (Self::from_jones(dominant), transmission)
    }
    /// Rotate the polarization state by the given angle. Unpolarized light stays unpolarized.
    #[must_use]
    pub fn rotated(&self, angle: Angle) -> Self {
        Self {
            jones: self.jones.map(|j| j.rotated(angle.get::<radian>())),
        }
    }
}
impl From<LegacyPolarization> for Polarization {
    fn from(value: LegacyPolarization) -> Self {
        match value {
            LegacyPolarization::Unpolarized => Self::unpolarized(),
            LegacyPolarization::Linear(angle) => Self::linear(angle),
        }
    }
}
impl From<JonesVector> for Polarization {
    fn from(value: JonesVector) -> Self {
        Self::from_jones(value)
    }
}
