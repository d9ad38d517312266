//! Propagation constants and built-in fiber profiles.
//!
//! Fiber dispersion data enters the framework through the
//! [`DispersionProfile`] trait, which maps angular frequency to the
//! wavenumber `beta(w)`. The [`PropagationConstant`] wrapper derives the
//! quantities the propagation and analysis stages need from any profile:
//! group velocity, group-velocity dispersion, and zero-dispersion points.

use thiserror::Error;

use crate::C0;

/// Errors raised by derived-quantity computations.
#[derive(Debug, Error)]
pub enum FiberError {
    #[error("group-velocity dispersion does not change sign over ({0:.3}, {1:.3}) rad/fs")]
    NoSignChange(f64, f64),

    #[error("frequency bracket must be finite and ordered (got ({0}, {1}))")]
    InvalidBracket(f64, f64),
}

/// A fiber's propagation constant as a function of angular frequency.
pub trait DispersionProfile: Send + Sync {
    /// Wavenumber `beta(w)` (1/micron) at angular frequency `w` (rad/fs).
    fn beta(&self, w: f64) -> f64;

    /// Human-readable name of the profile.
    fn profile_name(&self) -> &str;
}

impl DispersionProfile for Box<dyn DispersionProfile> {
    fn beta(&self, w: f64) -> f64 {
        (**self).beta(w)
    }

    fn profile_name(&self) -> &str {
        (**self).profile_name()
    }
}

/// Evaluate a polynomial given in ascending coefficient order.
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// "Endlessly single mode" photonic crystal fiber.
///
/// The refractive index is a rational Pade approximant of order [8/8] in
/// even powers of the angular frequency, fitted to the fiber of
/// Stone & Knight, *Opt. Express* **16** (2008) 2670. Valid over roughly
/// `w` in [0.5, 5] rad/fs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EsmFiber;

impl EsmFiber {
    /// Numerator coefficients of the index fit (ascending, even powers).
    const P: [f64; 9] = [
        16.894_75, 0.0, -319.132_16, 0.0, 34.822_10, 0.0, -0.992_495, 0.0, 0.001_067_1,
    ];
    /// Denominator coefficients of the index fit (ascending, even powers).
    const Q: [f64; 9] = [
        1.0, 0.0, -702.701_57, 0.0, 78.282_49, 0.0, -2.337_086, 0.0, 0.006_226_7,
    ];

    /// Frequency-dependent effective refractive index.
    pub fn refractive_index(&self, w: f64) -> f64 {
        1.0 + polyval(&Self::P, w) / polyval(&Self::Q, w)
    }
}

impl DispersionProfile for EsmFiber {
    fn beta(&self, w: f64) -> f64 {
        self.refractive_index(w) * w / C0
    }

    fn profile_name(&self) -> &str {
        "ESM photonic crystal fiber"
    }
}

/// Dispersion profile specified by Taylor coefficients around a reference
/// frequency: `beta(w) = sum_k c_k (w - w0)^k / k!`.
///
/// This is the standard way to describe a fiber for which only tabulated
/// dispersion coefficients are available.
#[derive(Debug, Clone)]
pub struct TaylorDispersion {
    /// Expansion frequency (rad/fs).
    pub w0: f64,
    /// Coefficients `c_k = beta_k(w0)` in ascending derivative order.
    pub coefficients: Vec<f64>,
}

impl TaylorDispersion {
    pub fn new(w0: f64, coefficients: Vec<f64>) -> Self {
        Self { w0, coefficients }
    }
}

impl DispersionProfile for TaylorDispersion {
    fn beta(&self, w: f64) -> f64 {
        let dw = w - self.w0;
        let mut term = 1.0;
        let mut sum = 0.0;
        for (k, &c) in self.coefficients.iter().enumerate() {
            if k > 0 {
                term *= dw / k as f64;
            }
            sum += c * term;
        }
        sum
    }

    fn profile_name(&self) -> &str {
        "Taylor-expansion dispersion"
    }
}

/// Derived-quantity wrapper around a dispersion profile.
///
/// Frequency derivatives are evaluated with 5-point central-difference
/// stencils at a fixed step, which is accurate to `O(h^4)` for the smooth
/// rational and polynomial profiles used here.
pub struct PropagationConstant {
    profile: Box<dyn DispersionProfile>,
    /// Finite-difference step (rad/fs).
    dw: f64,
}

impl PropagationConstant {
    const DEFAULT_STEP: f64 = 1e-3;

    pub fn new(profile: Box<dyn DispersionProfile>) -> Self {
        Self {
            profile,
            dw: Self::DEFAULT_STEP,
        }
    }

    /// Override the finite-difference step.
    pub fn with_step(profile: Box<dyn DispersionProfile>, dw: f64) -> Self {
        Self { profile, dw }
    }

    pub fn profile_name(&self) -> &str {
        self.profile.profile_name()
    }

    /// Wavenumber (1/micron).
    pub fn beta(&self, w: f64) -> f64 {
        self.profile.beta(w)
    }

    /// First frequency derivative of the wavenumber (fs/micron).
    pub fn beta1(&self, w: f64) -> f64 {
        let h = self.dw;
        let b = |x| self.profile.beta(x);
        (-b(w + 2.0 * h) + 8.0 * b(w + h) - 8.0 * b(w - h) + b(w - 2.0 * h)) / (12.0 * h)
    }

    /// Second frequency derivative of the wavenumber (fs^2/micron).
    ///
    /// Negative values mark the anomalous dispersion domain.
    pub fn beta2(&self, w: f64) -> f64 {
        let h = self.dw;
        let b = |x| self.profile.beta(x);
        (-b(w + 2.0 * h) + 16.0 * b(w + h) - 30.0 * b(w) + 16.0 * b(w - h) - b(w - 2.0 * h))
            / (12.0 * h * h)
    }

    /// Group velocity `1/beta1` (micron/fs).
    pub fn vg(&self, w: f64) -> f64 {
        1.0 / self.beta1(w)
    }

    /// Sample the wavenumber over a frequency axis.
    pub fn beta_on(&self, w: &[f64]) -> Vec<f64> {
        w.iter().map(|&x| self.profile.beta(x)).collect()
    }

    /// Locate a zero of the group-velocity dispersion by bisection.
    ///
    /// The bracket must straddle a sign change of `beta2`; the root is
    /// refined until the bracket width falls below the finite-difference
    /// step.
    pub fn zero_dispersion(&self, bracket: (f64, f64)) -> Result<f64, FiberError> {
        let (mut lo, mut hi) = bracket;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(FiberError::InvalidBracket(lo, hi));
        }

        let f_lo = self.beta2(lo);
        if (f_lo > 0.0) == (self.beta2(hi) > 0.0) {
            return Err(FiberError::NoSignChange(lo, hi));
        }

        while hi - lo > self.dw {
            let mid = 0.5 * (lo + hi);
            if (self.beta2(mid) > 0.0) == (f_lo > 0.0) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(0.5 * (lo + hi))
    }
}
