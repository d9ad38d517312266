//! Discrete Fourier transform pair in the physics sign convention.
//!
//! Monochromatic waves are written `e^{i(beta z - omega t)}`, so the
//! analysis transform (time to frequency) carries `e^{+i omega t}` and the
//! synthesis transform carries `e^{-i omega t}`:
//!
//! $$ X_k = \frac{1}{N} \sum_n x_n e^{+i \omega_k t_n}, \qquad
//!    x_n = \sum_k X_k e^{-i \omega_k t_n} $$
//!
//! The pair is an exact mutual inverse. Plans are created once per transform
//! length and reused for every call; the helper is `Send + Sync` so callers
//! can share one instance across worker threads.

use std::sync::Arc;

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// Cached transform plans for one signal length.
pub struct FourierTransform {
    /// `e^{+i}` kernel (analysis direction).
    analysis: Arc<dyn Fft<f64>>,
    /// `e^{-i}` kernel (synthesis direction).
    synthesis: Arc<dyn Fft<f64>>,
    len: usize,
}

impl FourierTransform {
    /// Plan both transform directions for signals of `len` samples.
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            analysis: planner.plan_fft_inverse(len),
            synthesis: planner.plan_fft_forward(len),
            len,
        }
    }

    /// Transform length the plans were created for.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time-domain field to frequency-domain spectrum.
    ///
    /// # Panics
    /// Panics if `field.len()` differs from the planned length.
    pub fn time_to_freq(&self, field: &[Complex64]) -> Vec<Complex64> {
        assert_eq!(field.len(), self.len, "field length must match the plan");
        let mut buf = field.to_vec();
        self.analysis.process(&mut buf);
        let norm = 1.0 / self.len as f64;
        for v in &mut buf {
            *v *= norm;
        }
        buf
    }

    /// Real-valued time-domain field to frequency-domain spectrum.
    pub fn time_to_freq_real(&self, field: &[f64]) -> Vec<Complex64> {
        let complex: Vec<Complex64> = field.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        self.time_to_freq(&complex)
    }

    /// Frequency-domain spectrum back to the time-domain field.
    ///
    /// # Panics
    /// Panics if `spectrum.len()` differs from the planned length.
    pub fn freq_to_time(&self, spectrum: &[Complex64]) -> Vec<Complex64> {
        assert_eq!(spectrum.len(), self.len, "spectrum length must match the plan");
        let mut buf = spectrum.to_vec();
        self.synthesis.process(&mut buf);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_monochromatic_wave_lands_in_single_bin() {
        let grid = Grid::new(100.0, 256).unwrap();
        let fft = FourierTransform::new(256);

        // e^{-i w_k0 t} is the physical wave at +w_k0 in this convention.
        let k0 = 17;
        let field: Vec<Complex64> = grid
            .t
            .iter()
            .map(|&t| Complex64::new(0.0, -grid.w[k0] * t).exp())
            .collect();

        let spec = fft.time_to_freq(&field);
        for (k, v) in spec.iter().enumerate() {
            if k == k0 {
                assert!((v.norm() - 1.0).abs() < 1e-10);
            } else {
                assert!(v.norm() < 1e-10, "leakage at bin {k}: {}", v.norm());
            }
        }
    }

    #[test]
    fn test_pair_is_mutually_inverse() {
        let fft = FourierTransform::new(128);
        let field: Vec<Complex64> = (0..128)
            .map(|n| Complex64::new((n as f64 * 0.37).sin(), (n as f64 * 0.11).cos()))
            .collect();

        let back = fft.freq_to_time(&fft.time_to_freq(&field));
        for (a, b) in field.iter().zip(&back) {
            assert!((a - b).norm() < 1e-12);
        }
    }
}
