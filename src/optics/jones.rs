#![warn(missing_docs)]
//! Jones calculus for fully polarized light.
//!
//! A [`JonesVector`] holds the complex amplitudes of the two transverse field components. The transverse frame
//! is fixed to the scene: an angle of 0° denotes the "horizontal" component. Components are complex numbers
//! (`re`, `im`); products and rotations are done with the explicit helpers of [`JonesMatrix`].
use num::complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Tolerance used for deciding if a polarization state is linear.
pub const LINEARITY_TOLERANCE: f64 = 1e-9;

/// Jones vector (complex amplitudes of the two transverse field components)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JonesVector {
    x: Complex64,
    y: Complex64,
}
impl JonesVector {
    /// Creates a new [`JonesVector`] from its two components.
    #[must_use]
    pub const fn new(x: Complex64, y: Complex64) -> Self {
        Self { x, y }
    }
    /// Horizontally (0°) polarized unit vector.
    #[must_use]
    pub const fn horizontal() -> Self {
        Self::new(ONE, ZERO)
    }
    /// Vertically (90°) polarized unit vector.
    #[must_use]
    pub const fn vertical() -> Self {
        Self::new(ZERO, ONE)
    }
    /// Linearly polarized unit vector at the given angle (in radians).
    #[must_use]
    pub fn linear(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(Complex64::new(c, 0.0), Complex64::new(s, 0.0))
    }
    /// Right-hand circularly polarized unit vector.
    #[must_use]
    pub fn circular_right() -> Self {
        Self::new(
            Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0),
            Complex64::new(0.0, -1.0 / 2.0_f64.sqrt()),
        )
    }
    /// Left-hand circularly polarized unit vector.
    #[must_use]
    pub fn circular_left() -> Self {
        Self::new(
            Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0),
            Complex64::new(0.0, 1.0 / 2.0_f64.sqrt()),
        )
    }
    /// Returns the x (horizontal) component.
    #[must_use]
    pub const fn x(&self) -> Complex64 {
        self.x
    }
    /// Returns the y (vertical) component.
    #[must_use]
    pub const fn y(&self) -> Complex64 {
        self.y
    }
    /// Squared norm `|x|² + |y|²` of this vector.
    #[must_use]
    pub fn intensity(&self) -> f64 {
        self.x.norm_sqr() + self.y.norm_sqr()
    }
    /// Returns this vector scaled to unit intensity or `None` if it is (nearly) zero.
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        let norm = self.intensity().sqrt();
        if norm < f64::EPSILON || !norm.is_finite() {
            return None;
        }
        Some(Self::new(self.x / norm, self.y / norm))
    }
    /// Multiply both components with a complex factor.
    #[must_use]
    pub fn scaled(&self, factor: Complex64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
    /// Actively rotate the field vector by the given angle (in radians).
    #[must_use]
    pub fn rotated(&self, angle: f64) -> Self {
        JonesMatrix::rotation(angle).apply(self)
    }
    /// Scalar projection (complex amplitude) of this vector onto a linear axis at the given angle.
    #[must_use]
    pub fn projection(&self, angle: f64) -> Complex64 {
        let (s, c) = angle.sin_cos();
        self.x * c + self.y * s
    }
    /// Angle (in radians, range `[0, π)`) of a linearly polarized state.
    ///
    /// Returns `None` if the state is elliptical (or zero).
    #[must_use]
    pub fn linear_angle(&self) -> Option<f64> {
        let normalized = self.normalized()?;
        let cross = normalized.x * normalized.y.conj();
        if cross.im.abs() > LINEARITY_TOLERANCE {
            return None;
        }
        // remove the common phase using the dominant component
        let reference = if normalized.x.norm_sqr() >= normalized.y.norm_sqr() {
            normalized.x
        } else {
            normalized.y
        };
        let phase = Complex64::from_polar(1.0, -reference.arg());
        let a = (normalized.x * phase).re;
        let b = (normalized.y * phase).re;
        Some(f64::atan2(b, a).rem_euclid(PI))
    }
}
impl Default for JonesVector {
    fn default() -> Self {
        Self::horizontal()
    }
}

/// 2x2 complex Jones matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JonesMatrix {
    m: [[Complex64; 2]; 2],
}
impl JonesMatrix {
    /// Creates a new [`JonesMatrix`] from its rows.
    #[must_use]
    pub const fn new(m: [[Complex64; 2]; 2]) -> Self {
        Self { m }
    }
    /// The identity matrix.
    #[must_use]
    pub const fn identity() -> Self {
        Self::new([[ONE, ZERO], [ZERO, ONE]])
    }
    /// Diagonal matrix.
    #[must_use]
    pub const fn diagonal(a: Complex64, b: Complex64) -> Self {
        Self::new([[a, ZERO], [ZERO, b]])
    }
    /// Active rotation by the given angle (in radians).
    #[must_use]
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([
            [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
            [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
        ])
    }
    /// Ideal linear polarizer with its transmission axis at the given angle (in radians).
    #[must_use]
    pub fn linear_polarizer(axis: f64) -> Self {
        let (s, c) = axis.sin_cos();
        Self::new([
            [Complex64::new(c * c, 0.0), Complex64::new(c * s, 0.0)],
            [Complex64::new(c * s, 0.0), Complex64::new(s * s, 0.0)],
        ])
    }
    /// Retardation matrix `diag(1, e^{iδ})` of a wave plate in its own frame (fast axis along x).
    #[must_use]
    pub fn retardation(retardance: f64) -> Self {
        Self::diagonal(ONE, Complex64::from_polar(1.0, retardance))
    }
    /// Wave plate with the given retardance and fast axis angle (both in radians).
    ///
    /// The matrix is composed as `R(+θ) · diag(1, e^{iδ}) · R(−θ)`.
    #[must_use]
    pub fn retarder(retardance: f64, fast_axis: f64) -> Self {
        Self::rotation(fast_axis)
            .mul(&Self::retardation(retardance))
            .mul(&Self::rotation(-fast_axis))
    }
    /// Half-wave plate with the given fast axis angle (in radians).
    #[must_use]
    pub fn half_wave(fast_axis: f64) -> Self {
        Self::rotation(fast_axis)
            .mul(&Self::diagonal(ONE, -ONE))
            .mul(&Self::rotation(-fast_axis))
    }
    /// Quarter-wave plate with the given fast axis angle (in radians).
    #[must_use]
    pub fn quarter_wave(fast_axis: f64) -> Self {
        Self::rotation(fast_axis)
            .mul(&Self::diagonal(ONE, Complex64::i()))
            .mul(&Self::rotation(-fast_axis))
    }
    /// Matrix product `self · rhs`.
    #[must_use]
    pub fn mul(&self, rhs: &Self) -> Self {
        let a = &self.m;
        let b = &rhs.m;
        Self::new([
            [
                a[0][0] * b[0][0] + a[0][1] * b[1][0],
                a[0][0] * b[0][1] + a[0][1] * b[1][1],
            ],
            [
                a[1][0] * b[0][0] + a[1][1] * b[1][0],
                a[1][0] * b[0][1] + a[1][1] * b[1][1],
            ],
        ])
    }
    /// Apply this matrix to a [`JonesVector`].
    #[must_use]
    pub fn apply(&self, v: &JonesVector) -> JonesVector {
        JonesVector::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y,
            self.m[1][0] * v.x + self.m[1][1] * v.y,
        )
    }
}
impl Default for JonesMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
