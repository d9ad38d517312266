//! Uniform temporal/spectral sampling domain.
//!
//! A [`Grid`] fixes the computational domain for a propagation run: a
//! periodic time axis of `t_num` samples spanning `[-t_max, t_max)` and the
//! matching angular-frequency axis of the discrete transform pair in
//! [`crate::fft`]. The frequency axis is kept in FFT (unshifted) ordering so
//! that spectra can be indexed without reshuffling.

use thiserror::Error;

/// Errors raised when constructing a sampling domain.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("temporal extent must be positive and finite (got {0})")]
    InvalidExtent(f64),

    #[error("sample count must be a power of two >= 2 (got {0})")]
    InvalidSampleCount(usize),
}

/// Immutable pair of sampling axes (time, derived frequency).
#[derive(Debug, Clone)]
pub struct Grid {
    /// Time samples `t[n] = -t_max + n*dt` (fs).
    pub t: Vec<f64>,
    /// Angular-frequency samples in FFT ordering (rad/fs).
    pub w: Vec<f64>,
    /// Half-extent of the time axis (fs).
    pub t_max: f64,
    /// Number of samples.
    pub t_num: usize,
    /// Time step (fs).
    pub dt: f64,
    /// Frequency step (rad/fs).
    pub dw: f64,
}

impl Grid {
    /// Construct a domain with `t_num` samples over `[-t_max, t_max)`.
    ///
    /// The endpoint is excluded so that the axis is exactly periodic with
    /// period `2*t_max`. `t_num` must be a power of two.
    pub fn new(t_max: f64, t_num: usize) -> Result<Self, GridError> {
        if !(t_max.is_finite() && t_max > 0.0) {
            return Err(GridError::InvalidExtent(t_max));
        }
        if t_num < 2 || !t_num.is_power_of_two() {
            return Err(GridError::InvalidSampleCount(t_num));
        }

        let dt = 2.0 * t_max / t_num as f64;
        let dw = std::f64::consts::PI / t_max;

        let t = (0..t_num).map(|n| -t_max + n as f64 * dt).collect();
        // FFT ordering: non-negative bins first, then the negative tail.
        let w = (0..t_num)
            .map(|k| {
                let k = if k < t_num / 2 {
                    k as f64
                } else {
                    k as f64 - t_num as f64
                };
                k * dw
            })
            .collect();

        Ok(Self {
            t,
            w,
            t_max,
            t_num,
            dt,
            dw,
        })
    }

    /// Indices of the frequency axis sorted into ascending order.
    ///
    /// Useful when writing spectra out for plotting, where the FFT ordering
    /// would split the axis in the middle.
    pub fn ascending_frequency_order(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.t_num).collect();
        idx.sort_by(|&a, &b| {
            self.w[a]
                .partial_cmp(&self.w[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        idx
    }
}
