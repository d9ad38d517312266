//! Initial-condition helpers.

use serde::{Deserialize, Serialize};

use crate::C0;

/// Hyperbolic secant.
pub fn sech(x: f64) -> f64 {
    1.0 / x.cosh()
}

/// A sech-shaped carrier pulse, `E(t) = A sech(t/t0) cos(w0 t)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SechPulse {
    /// Peak field amplitude `A` (sqrt(W)).
    pub amplitude: f64,
    /// Duration `t0` (fs).
    pub duration: f64,
    /// Center frequency `w0` (rad/fs).
    pub center_frequency: f64,
}

impl SechPulse {
    /// Construct a higher-order soliton of the given order.
    ///
    /// The amplitude follows from the soliton condition
    /// `Ns^2 = gamma A^2 t0^2 / |beta2|` with the nonlinear coefficient
    /// `gamma = n2 w0 / c0`:
    ///
    /// `A = Ns sqrt(|beta2| c0 / (w0 n2)) / t0`
    ///
    /// # Arguments
    /// * `order` - Soliton order `Ns`.
    /// * `duration` - Pulse duration `t0` (fs).
    /// * `center_frequency` - Carrier frequency `w0` (rad/fs).
    /// * `beta2` - Group-velocity dispersion at `w0` (fs^2/micron).
    /// * `n2` - Nonlinear refractive index (micron^2/W).
    pub fn soliton(order: f64, duration: f64, center_frequency: f64, beta2: f64, n2: f64) -> Self {
        let amplitude =
            order * (beta2.abs() * C0 / (center_frequency * n2)).sqrt() / duration;
        Self {
            amplitude,
            duration,
            center_frequency,
        }
    }

    /// Real field at time `t`.
    pub fn real_field(&self, t: f64) -> f64 {
        self.amplitude * sech(t / self.duration) * (self.center_frequency * t).cos()
    }

    /// Sample the real field over a time axis.
    pub fn sample(&self, t: &[f64]) -> Vec<f64> {
        t.iter().map(|&x| self.real_field(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sech_is_even_and_normalised() {
        assert_relative_eq!(sech(0.0), 1.0);
        assert_relative_eq!(sech(2.0), sech(-2.0));
        assert!(sech(20.0) < 1e-8);
    }

    #[test]
    fn test_soliton_condition_is_exact() {
        let (order, t0, w0, beta2, n2) = (8.0, 7.0, 1.7, -2.93e-3, 3.0e-8);
        let pulse = SechPulse::soliton(order, t0, w0, beta2, n2);

        let gamma = n2 * w0 / C0;
        let recovered =
            (gamma * pulse.amplitude * pulse.amplitude * t0 * t0 / beta2.abs()).sqrt();
        assert_relative_eq!(recovered, order, max_relative = 1e-12);
    }

    #[test]
    fn test_field_peaks_at_origin() {
        let pulse = SechPulse {
            amplitude: 5.0,
            duration: 10.0,
            center_frequency: 1.7,
        };
        assert_relative_eq!(pulse.real_field(0.0), 5.0);
        assert!(pulse.real_field(50.0).abs() < 5.0 * sech(5.0));
    }
}
