//! Windowed time-frequency power representations.
//!
//! A spectrogram localises an analytic signal along the time axis with a
//! sliding Gaussian window and records the spectral power of each windowed
//! slice. The root-mean-square width of the window trades temporal against
//! spectral resolution: narrow windows smear the frequency axis, wide
//! windows smear the time axis.

use ndarray::{Array2, Axis};
use num_complex::Complex64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fft::FourierTransform;
use crate::grid::Grid;

/// Errors raised when computing a spectrogram.
#[derive(Debug, Error)]
pub enum SpectrogramError {
    #[error("need at least two delay samples (got {0})")]
    InvalidDelayCount(usize),

    #[error("frequency sample count must be in 1..={max} (got {requested})")]
    InvalidFrequencyCount { requested: usize, max: usize },

    #[error("window width must be positive and finite (got {0})")]
    InvalidWidth(f64),

    #[error("delay range must be ordered and finite (got ({0}, {1}))")]
    InvalidDelayRange(f64, f64),

    #[error("signal has {got} samples but the grid holds {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Parameters of a spectrogram computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpectrogramSpec {
    /// Delay range (fs); the full grid extent when `None`.
    pub t_lim: Option<(f64, f64)>,
    /// Number of delay samples.
    pub n_tau: usize,
    /// Number of frequency samples (uniform subsampling of the grid axis).
    pub n_freq: usize,
    /// Root-mean-square width of the Gaussian window (fs).
    pub rms_width: f64,
}

impl Default for SpectrogramSpec {
    fn default() -> Self {
        Self {
            t_lim: None,
            n_tau: 1000,
            n_freq: 256,
            rms_width: 20.0,
        }
    }
}

/// Joint time-frequency power representation.
///
/// Regenerated per call; nothing is cached between window-width choices.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Delay samples (fs).
    pub tau: Vec<f64>,
    /// Frequency samples (rad/fs, ascending).
    pub w: Vec<f64>,
    /// Spectral power, shape `(w.len(), tau.len())`.
    pub power: Array2<f64>,
}

impl Spectrogram {
    /// Restrict the representation to a frequency band.
    pub fn band(&self, w_lim: (f64, f64)) -> Spectrogram {
        let keep: Vec<usize> = self
            .w
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > w_lim.0 && w < w_lim.1)
            .map(|(i, _)| i)
            .collect();
        Spectrogram {
            tau: self.tau.clone(),
            w: keep.iter().map(|&i| self.w[i]).collect(),
            power: self.power.select(Axis(0), &keep),
        }
    }

    /// Location `(tau, w)` of the power maximum.
    pub fn peak(&self) -> (f64, f64) {
        let mut best = (0, 0);
        let mut best_val = f64::NEG_INFINITY;
        for ((j, i), &p) in self.power.indexed_iter() {
            if p > best_val {
                best_val = p;
                best = (j, i);
            }
        }
        (self.tau[best.1], self.w[best.0])
    }
}

/// Compute the spectrogram of a time-domain analytic signal.
///
/// For each of `n_tau` equispaced delays the signal is multiplied by a
/// normalised Gaussian window `exp(-(t - tau)^2 / (2 s0^2)) / (sqrt(2 pi) s0)`
/// and transformed; the squared magnitude is sampled on the ascending
/// frequency axis subsampled to `n_freq` points. Delay columns are
/// independent and computed in parallel.
pub fn spectrogram(
    grid: &Grid,
    signal: &[Complex64],
    spec: &SpectrogramSpec,
) -> Result<Spectrogram, SpectrogramError> {
    if signal.len() != grid.t_num {
        return Err(SpectrogramError::DimensionMismatch {
            expected: grid.t_num,
            got: signal.len(),
        });
    }
    if spec.n_tau < 2 {
        return Err(SpectrogramError::InvalidDelayCount(spec.n_tau));
    }
    if spec.n_freq == 0 || spec.n_freq > grid.t_num {
        return Err(SpectrogramError::InvalidFrequencyCount {
            requested: spec.n_freq,
            max: grid.t_num,
        });
    }
    if !(spec.rms_width.is_finite() && spec.rms_width > 0.0) {
        return Err(SpectrogramError::InvalidWidth(spec.rms_width));
    }

    let (t_min, t_max) = spec.t_lim.unwrap_or((grid.t[0], grid.t_max));
    if !(t_min.is_finite() && t_max.is_finite() && t_min < t_max) {
        return Err(SpectrogramError::InvalidDelayRange(t_min, t_max));
    }

    let tau: Vec<f64> = (0..spec.n_tau)
        .map(|i| t_min + (t_max - t_min) * i as f64 / (spec.n_tau - 1) as f64)
        .collect();

    // Uniform stride over the ascending frequency axis.
    let order = grid.ascending_frequency_order();
    let stride = (grid.t_num / spec.n_freq).max(1);
    let selected: Vec<usize> = order.iter().step_by(stride).take(spec.n_freq).copied().collect();
    let w: Vec<f64> = selected.iter().map(|&k| grid.w[k]).collect();

    let fft = FourierTransform::new(grid.t_num);
    let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * spec.rms_width);
    let two_s_sq = 2.0 * spec.rms_width * spec.rms_width;

    let columns: Vec<Vec<f64>> = tau
        .par_iter()
        .map(|&tau_i| {
            let windowed: Vec<Complex64> = signal
                .iter()
                .zip(&grid.t)
                .map(|(u, &t)| {
                    let d = t - tau_i;
                    *u * (norm * (-d * d / two_s_sq).exp())
                })
                .collect();
            let ew = fft.time_to_freq(&windowed);
            selected.iter().map(|&k| ew[k].norm_sqr()).collect()
        })
        .collect();

    let mut power = Array2::zeros((w.len(), tau.len()));
    for (i, column) in columns.iter().enumerate() {
        for (j, &p) in column.iter().enumerate() {
            power[[j, i]] = p;
        }
    }

    Ok(Spectrogram { tau, w, power })
}
