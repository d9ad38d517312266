//! Fixed-step z-propagation and snapshot handling.
//!
//! The [`PropagationSolver`] trait defines the interface that all
//! integration schemes must implement. Two schemes are provided: the
//! fourth-order Runge-Kutta in the interaction picture method
//! ([`rk4ip::Rk4ipSolver`]) and a second-order symmetric split-step scheme
//! ([`split_step::SplitStepSolver`]) that doubles as a cross-validation
//! reference.

pub mod rk4ip;
pub mod split_step;

use ndarray::{Array2, ArrayView1, Axis};
use num_complex::Complex64;
use thiserror::Error;

use crate::fft::FourierTransform;
use crate::model::PropagationModel;

/// Errors that can occur during a propagation run.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("initial condition has {got} samples but the model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("propagation range must be positive and finite (got {0})")]
    InvalidRange(f64),

    #[error("step counts must be nonzero (n_steps = {n_steps}, n_skip = {n_skip})")]
    InvalidStepCount { n_steps: usize, n_skip: usize },

    #[error("field became non-finite at z = {z:.3} micron")]
    Diverged { z: f64 },
}

/// The core trait all z-propagation schemes implement.
///
/// A solver owns its propagation model and advances a frequency-domain
/// initial condition over a distance `z_range` in `n_steps` fixed steps,
/// storing every `n_skip`-th state (and always the first and last) into an
/// [`Evolution`].
pub trait PropagationSolver {
    fn propagate(
        &self,
        initial: &[Complex64],
        z_range: f64,
        n_steps: usize,
        n_skip: usize,
    ) -> Result<Evolution, SolverError>;

    /// Human-readable name of the integration scheme.
    fn method_name(&self) -> &str;
}

/// Snapshots of a frequency-domain field collected along the fiber.
#[derive(Debug, Clone)]
pub struct Evolution {
    /// Stored propagation distances (micron), starting at zero.
    pub z: Vec<f64>,
    /// Angular-frequency axis (rad/fs, FFT ordering).
    pub w: Vec<f64>,
    /// Field snapshots, one row per stored distance.
    pub uwz: Array2<Complex64>,
}

impl Evolution {
    pub fn n_snapshots(&self) -> usize {
        self.z.len()
    }

    /// Index and spectrum of the stored snapshot closest to `z`.
    pub fn snapshot_nearest(&self, z: f64) -> (usize, ArrayView1<'_, Complex64>) {
        let idx = self
            .z
            .iter()
            .enumerate()
            .min_by(|a, b| {
                (a.1 - z)
                    .abs()
                    .partial_cmp(&(b.1 - z).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
            .unwrap_or(0);
        (idx, self.uwz.index_axis(Axis(0), idx))
    }

    /// Time-domain field of one snapshot in the laboratory frame.
    pub fn field_at(&self, index: usize) -> Vec<Complex64> {
        let fft = FourierTransform::new(self.w.len());
        let row: Vec<Complex64> = self.uwz.row(index).to_vec();
        fft.freq_to_time(&row)
    }

    /// Time-domain fields of all snapshots in a co-moving frame.
    ///
    /// Each spectrum is phase-shifted by `e^{-i w z / velocity}` before the
    /// synthesis transform, so a feature travelling at `velocity` stays at a
    /// fixed position on the time axis.
    ///
    /// # Panics
    /// Panics if `velocity` is zero or non-finite.
    pub fn to_moving_frame(&self, velocity: f64) -> Array2<Complex64> {
        assert!(
            velocity.is_finite() && velocity != 0.0,
            "frame velocity must be finite and nonzero"
        );

        let n = self.w.len();
        let fft = FourierTransform::new(n);
        let mut out = Array2::zeros((self.z.len(), n));
        for (i, &z) in self.z.iter().enumerate() {
            let shifted: Vec<Complex64> = self
                .uwz
                .row(i)
                .iter()
                .zip(&self.w)
                .map(|(u, &w)| u * Complex64::new(0.0, -w * z / velocity).exp())
                .collect();
            let ut = fft.freq_to_time(&shifted);
            out.row_mut(i).assign(&ArrayView1::from(&ut[..]));
        }
        out
    }
}

/// Shared fixed-step driver.
///
/// Validates the run parameters, advances the field with the
/// scheme-provided `step` closure, collects snapshots, and aborts with
/// [`SolverError::Diverged`] as soon as a stored state stops being finite.
pub(crate) fn run_fixed_step<F>(
    model: &dyn PropagationModel,
    initial: &[Complex64],
    z_range: f64,
    n_steps: usize,
    n_skip: usize,
    mut step: F,
) -> Result<Evolution, SolverError>
where
    F: FnMut(&mut Vec<Complex64>),
{
    let n = model.frequency_axis().len();
    if initial.len() != n {
        return Err(SolverError::DimensionMismatch {
            expected: n,
            got: initial.len(),
        });
    }
    if !(z_range.is_finite() && z_range > 0.0) {
        return Err(SolverError::InvalidRange(z_range));
    }
    if n_steps == 0 || n_skip == 0 {
        return Err(SolverError::InvalidStepCount { n_steps, n_skip });
    }

    let dz = z_range / n_steps as f64;
    let mut u = initial.to_vec();

    let mut z = Vec::new();
    let mut stored: Vec<Complex64> = Vec::new();

    fn all_finite(u: &[Complex64]) -> bool {
        u.iter().all(|v| v.re.is_finite() && v.im.is_finite())
    }

    if !all_finite(&u) {
        return Err(SolverError::Diverged { z: 0.0 });
    }
    z.push(0.0);
    stored.extend_from_slice(&u);

    for i in 1..=n_steps {
        step(&mut u);
        if i % n_skip == 0 || i == n_steps {
            let z_now = i as f64 * dz;
            if !all_finite(&u) {
                return Err(SolverError::Diverged { z: z_now });
            }
            z.push(z_now);
            stored.extend_from_slice(&u);
        }
    }

    log::debug!(
        "propagated {} steps of dz = {:.4} micron, {} snapshots stored",
        n_steps,
        dz,
        z.len()
    );

    let mut uwz = Array2::zeros((z.len(), n));
    for (i, chunk) in stored.chunks_exact(n).enumerate() {
        uwz.row_mut(i).assign(&ArrayView1::from(chunk));
    }

    Ok(Evolution {
        z,
        w: model.frequency_axis().to_vec(),
        uwz,
    })
}
