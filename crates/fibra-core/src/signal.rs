//! Analytic-signal representation of real optical fields.
//!
//! The analytic signal of a real field keeps only the non-negative
//! frequency content: negative-frequency bins are zeroed and positive bins
//! doubled, so that the real part of the complex time-domain representation
//! reproduces the original field while its modulus traces the envelope.
//! The z-propagation models in [`crate::model`] act on this representation
//! in the frequency domain.

use num_complex::Complex64;

use crate::fft::FourierTransform;
use crate::grid::Grid;

/// Complex representation of a real pulse carrying only non-negative
/// frequency content.
#[derive(Debug, Clone)]
pub struct AnalyticSignal {
    /// Time-domain representation.
    pub t_rep: Vec<Complex64>,
    /// Frequency-domain representation (FFT ordering, matching `grid.w`).
    pub w_rep: Vec<Complex64>,
}

impl AnalyticSignal {
    /// Build the analytic signal of a real field sampled on `grid.t`.
    ///
    /// The Nyquist bin carries a negative frequency in FFT ordering and is
    /// zeroed together with the rest of the negative half-axis; the DC bin
    /// is kept unscaled.
    ///
    /// # Panics
    /// Panics if `field.len()` differs from `grid.t_num`.
    pub fn from_real_field(grid: &Grid, field: &[f64]) -> Self {
        assert_eq!(
            field.len(),
            grid.t_num,
            "field must be sampled on the grid's time axis"
        );

        let fft = FourierTransform::new(grid.t_num);
        let mut w_rep = fft.time_to_freq_real(field);
        for (v, &w) in w_rep.iter_mut().zip(&grid.w) {
            if w > 0.0 {
                *v *= 2.0;
            } else if w < 0.0 {
                *v = Complex64::new(0.0, 0.0);
            }
        }
        let t_rep = fft.freq_to_time(&w_rep);

        Self { t_rep, w_rep }
    }

    /// Instantaneous power `|u(t)|^2` of the time-domain representation.
    pub fn intensity(&self) -> Vec<f64> {
        self.t_rep.iter().map(|u| u.norm_sqr()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::SechPulse;

    #[test]
    fn test_real_part_reproduces_input_field() {
        let grid = Grid::new(250.0, 1024).unwrap();
        let pulse = SechPulse {
            amplitude: 3.0,
            duration: 12.0,
            center_frequency: 1.7,
        };
        let field = pulse.sample(&grid.t);

        let signal = AnalyticSignal::from_real_field(&grid, &field);
        let max_err = signal
            .t_rep
            .iter()
            .zip(&field)
            .map(|(u, &e)| (u.re - e).abs())
            .fold(0.0_f64, f64::max);
        assert!(max_err < 1e-10, "max reconstruction error {max_err}");
    }

    #[test]
    fn test_negative_frequencies_are_removed() {
        let grid = Grid::new(250.0, 512).unwrap();
        let field: Vec<f64> = grid.t.iter().map(|&t| (1.3 * t).cos()).collect();

        let signal = AnalyticSignal::from_real_field(&grid, &field);
        for (v, &w) in signal.w_rep.iter().zip(&grid.w) {
            if w < 0.0 {
                assert!(v.norm() < 1e-14);
            }
        }
        // The positive-frequency line survives with doubled weight.
        let peak = signal
            .w_rep
            .iter()
            .zip(&grid.w)
            .max_by(|a, b| a.0.norm().partial_cmp(&b.0.norm()).unwrap())
            .map(|(_, &w)| w)
            .unwrap();
        assert!((peak - 1.3).abs() < grid.dw);
    }

    #[test]
    fn test_envelope_recovers_pulse_shape() {
        let grid = Grid::new(250.0, 1024).unwrap();
        let pulse = SechPulse {
            amplitude: 2.0,
            duration: 15.0,
            center_frequency: 2.0,
        };
        let field = pulse.sample(&grid.t);
        let signal = AnalyticSignal::from_real_field(&grid, &field);

        // |u(0)| approximates the envelope amplitude, not the oscillating field.
        let center = grid.t_num / 2;
        assert!((signal.t_rep[center].norm() - 2.0).abs() < 0.05);
    }
}
