//! Forward z-propagation models for the analytic signal.
//!
//! A model provides the two operators of the evolution equation
//! `d/dz u_w = L(w) u_w + N(u_w)`: the diagonal linear operator `L` built
//! from the fiber's propagation constant, and the nonlinear functional `N`
//! evaluated by round-tripping through the time domain. Both implemented
//! models restrict the nonlinear response to the positive frequency
//! half-axis, which keeps the field an analytic signal throughout the
//! propagation.
//!
//! Both models conserve the photon number `sum_{w>0} |u_w|^2 / w`; the
//! [`photon_number`] diagnostic exposes it for step-size sanity checks.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::fft::FourierTransform;
use crate::C0;

/// The operators of one z-propagation equation.
pub trait PropagationModel: Send + Sync {
    /// Angular-frequency axis the operators are sampled on (FFT ordering).
    fn frequency_axis(&self) -> &[f64];

    /// Diagonal linear operator `L(w)`, applied in the frequency domain.
    fn linear_operator(&self) -> &[Complex64];

    /// Nonlinear operator `N(u_w)`, evaluated in the frequency domain.
    fn nonlinear_operator(&self, uw: &[Complex64]) -> Vec<Complex64>;

    /// Human-readable name of the model.
    fn model_name(&self) -> &str;
}

/// Photon number `sum_{w>0} |u_w|^2 / w` of a frequency-domain field.
///
/// Conserved by the implemented models; a drifting value signals a step
/// size that is too coarse.
pub fn photon_number(w: &[f64], uw: &[Complex64]) -> f64 {
    w.iter()
        .zip(uw)
        .filter(|&(&w, _)| w > 0.0)
        .map(|(&w, u)| u.norm_sqr() / w)
        .sum()
}

/// Raman response of fused silica as a damped oscillator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RamanResponse {
    /// Fractional Raman contribution to the nonlinearity.
    pub fraction: f64,
    /// Inverse phonon frequency (fs).
    pub tau1: f64,
    /// Phonon damping time (fs).
    pub tau2: f64,
}

impl Default for RamanResponse {
    fn default() -> Self {
        Self {
            fraction: 0.18,
            tau1: 12.2,
            tau2: 32.0,
        }
    }
}

impl RamanResponse {
    /// Frequency response `h_R(w)` sampled over an axis.
    ///
    /// `h_R(w) = (tau1^2 + tau2^2) / (tau1^2 (1 - i w tau2)^2 + tau2^2)`,
    /// normalised so that `h_R(0) = 1`.
    pub fn frequency_response(&self, w: &[f64]) -> Vec<Complex64> {
        let t1_sq = self.tau1 * self.tau1;
        let t2_sq = self.tau2 * self.tau2;
        w.iter()
            .map(|&w| {
                let damped = Complex64::new(1.0, -w * self.tau2);
                Complex64::new(t1_sq + t2_sq, 0.0) / (t1_sq * damped * damped + t2_sq)
            })
            .collect()
    }
}

/// Shared state of the analytic-signal forward models.
struct ModelCore {
    w: Vec<f64>,
    /// `i beta(w)`.
    lin: Vec<Complex64>,
    /// `i n2 w / c0`, zeroed on the non-positive half-axis.
    gamma: Vec<Complex64>,
    fft: FourierTransform,
}

impl ModelCore {
    fn new(w: &[f64], beta_w: &[f64], n2: f64) -> Self {
        assert_eq!(
            w.len(),
            beta_w.len(),
            "frequency axis and sampled propagation constant must match"
        );
        let lin = beta_w.iter().map(|&b| Complex64::new(0.0, b)).collect();
        let gamma = w
            .iter()
            .map(|&w| {
                if w > 0.0 {
                    Complex64::new(0.0, n2 * w / C0)
                } else {
                    Complex64::new(0.0, 0.0)
                }
            })
            .collect();
        Self {
            w: w.to_vec(),
            lin,
            gamma,
            fft: FourierTransform::new(w.len()),
        }
    }
}

/// Simplified forward model for the analytic signal (Kerr nonlinearity).
///
/// `N(u_w) = i (n2 w / c0) theta(w) FT[ |u|^2 u ]_w`
pub struct FmasS {
    core: ModelCore,
}

impl FmasS {
    /// Build the model from a frequency axis, the propagation constant
    /// sampled on it, and the nonlinear refractive index `n2`
    /// (micron^2/W).
    ///
    /// # Panics
    /// Panics if `w` and `beta_w` differ in length.
    pub fn new(w: &[f64], beta_w: &[f64], n2: f64) -> Self {
        Self {
            core: ModelCore::new(w, beta_w, n2),
        }
    }
}

impl PropagationModel for FmasS {
    fn frequency_axis(&self) -> &[f64] {
        &self.core.w
    }

    fn linear_operator(&self) -> &[Complex64] {
        &self.core.lin
    }

    fn nonlinear_operator(&self, uw: &[Complex64]) -> Vec<Complex64> {
        let core = &self.core;
        let ut = core.fft.freq_to_time(uw);
        let driven: Vec<Complex64> = ut.iter().map(|u| *u * u.norm_sqr()).collect();
        let nw = core.fft.time_to_freq(&driven);
        nw.iter().zip(&core.gamma).map(|(n, g)| g * n).collect()
    }

    fn model_name(&self) -> &str {
        "simplified forward model for the analytic signal (FMAS-S)"
    }
}

/// Simplified forward model for the analytic signal including the Raman
/// effect.
///
/// The Kerr intensity is blended with its convolution against the Raman
/// response before driving the nonlinearity:
///
/// `N(u_w) = i (n2 w / c0) theta(w) FT[ ((1-fR)|u|^2 + fR h_R * |u|^2) u ]_w`
pub struct FmasSRaman {
    core: ModelCore,
    response: RamanResponse,
    /// Raman frequency response sampled on the grid axis.
    hrw: Vec<Complex64>,
}

impl FmasSRaman {
    /// Build the model with the standard fused-silica Raman response.
    ///
    /// # Panics
    /// Panics if `w` and `beta_w` differ in length.
    pub fn new(w: &[f64], beta_w: &[f64], n2: f64) -> Self {
        Self::with_response(w, beta_w, n2, RamanResponse::default())
    }

    /// Build the model with a custom Raman response.
    pub fn with_response(w: &[f64], beta_w: &[f64], n2: f64, response: RamanResponse) -> Self {
        let hrw = response.frequency_response(w);
        Self {
            core: ModelCore::new(w, beta_w, n2),
            response,
            hrw,
        }
    }

    pub fn response(&self) -> &RamanResponse {
        &self.response
    }
}

impl PropagationModel for FmasSRaman {
    fn frequency_axis(&self) -> &[f64] {
        &self.core.w
    }

    fn linear_operator(&self) -> &[Complex64] {
        &self.core.lin
    }

    fn nonlinear_operator(&self, uw: &[Complex64]) -> Vec<Complex64> {
        let core = &self.core;
        let fr = self.response.fraction;

        let ut = core.fft.freq_to_time(uw);
        let intensity: Vec<Complex64> = ut
            .iter()
            .map(|u| Complex64::new(u.norm_sqr(), 0.0))
            .collect();

        // Convolve the intensity with the Raman response in the frequency
        // domain, then blend with the instantaneous contribution.
        let mut iw = core.fft.time_to_freq(&intensity);
        for (v, h) in iw.iter_mut().zip(&self.hrw) {
            *v *= *h;
        }
        let delayed = core.fft.freq_to_time(&iw);

        let driven: Vec<Complex64> = ut
            .iter()
            .zip(intensity.iter().zip(&delayed))
            .map(|(u, (inst, del))| (*inst * (1.0 - fr) + *del * fr) * *u)
            .collect();

        let nw = core.fft.time_to_freq(&driven);
        nw.iter().zip(&core.gamma).map(|(n, g)| g * n).collect()
    }

    fn model_name(&self) -> &str {
        "simplified forward model for the analytic signal with Raman effect (FMAS-S-R)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use approx::assert_relative_eq;

    fn toy_model(grid: &Grid) -> FmasSRaman {
        let beta_w: Vec<f64> = grid.w.iter().map(|&w| 4.9 * w).collect();
        FmasSRaman::new(&grid.w, &beta_w, 3.0e-8)
    }

    #[test]
    fn test_raman_response_is_normalised_at_dc() {
        let h = RamanResponse::default().frequency_response(&[0.0, 0.5, -0.5]);
        assert_relative_eq!(h[0].re, 1.0);
        assert_relative_eq!(h[0].im, 0.0);
        // Conjugate symmetry of a real time-domain response.
        assert_relative_eq!(h[1].re, h[2].re, max_relative = 1e-12);
        assert_relative_eq!(h[1].im, -h[2].im, max_relative = 1e-12);
    }

    #[test]
    fn test_nonlinearity_vanishes_for_zero_field() {
        let grid = Grid::new(100.0, 256).unwrap();
        let model = toy_model(&grid);
        let zero = vec![Complex64::new(0.0, 0.0); grid.t_num];
        assert!(model
            .nonlinear_operator(&zero)
            .iter()
            .all(|v| v.norm() == 0.0));
    }

    #[test]
    fn test_nonlinearity_is_confined_to_positive_frequencies() {
        let grid = Grid::new(100.0, 256).unwrap();
        let model = toy_model(&grid);

        let uw: Vec<Complex64> = grid
            .w
            .iter()
            .map(|&w| {
                if w > 0.0 {
                    Complex64::new((-w).exp(), 0.3)
                } else {
                    Complex64::new(0.0, 0.0)
                }
            })
            .collect();

        for (v, &w) in model.nonlinear_operator(&uw).iter().zip(&grid.w) {
            if w <= 0.0 {
                assert_eq!(v.norm(), 0.0, "response leaked to w = {w}");
            }
        }
    }

    #[test]
    fn test_nonlinearity_scales_cubically() {
        let grid = Grid::new(100.0, 256).unwrap();
        let model = toy_model(&grid);

        let uw: Vec<Complex64> = grid
            .w
            .iter()
            .map(|&w| Complex64::new((-(w - 1.0) * (w - 1.0)).exp(), 0.0))
            .collect();
        let doubled: Vec<Complex64> = uw.iter().map(|v| *v * 2.0).collect();

        let n1 = model.nonlinear_operator(&uw);
        let n2 = model.nonlinear_operator(&doubled);
        let r1: f64 = n1.iter().map(|v| v.norm_sqr()).sum::<f64>().sqrt();
        let r2: f64 = n2.iter().map(|v| v.norm_sqr()).sum::<f64>().sqrt();
        assert_relative_eq!(r2 / r1, 8.0, max_relative = 1e-10);
    }

    #[test]
    fn test_photon_number_ignores_nonpositive_bins() {
        let w = [-1.0, 0.0, 1.0, 2.0];
        let uw = [
            Complex64::new(5.0, 0.0),
            Complex64::new(5.0, 0.0),
            Complex64::new(2.0, 0.0),
            Complex64::new(2.0, 0.0),
        ];
        assert_relative_eq!(photon_number(&w, &uw), 4.0 + 2.0);
    }
}
