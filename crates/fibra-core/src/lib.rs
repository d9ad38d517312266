//! # Fibra Core
//!
//! The numerical backbone of the Fibra framework. This crate implements
//! z-propagation of ultrashort optical pulses in nonlinear fibers in terms
//! of forward models for the analytic signal, together with the
//! time-frequency analysis tools needed to inspect the results.
//!
//! ## Architecture
//!
//! All integration schemes implement the [`solver::PropagationSolver`]
//! trait, which provides a uniform interface for advancing a
//! frequency-domain field over a propagation distance and collecting
//! snapshots. The primary implementation is the Runge-Kutta in the
//! interaction picture method ([`solver::rk4ip::Rk4ipSolver`]); a symmetric
//! split-step scheme ([`solver::split_step::SplitStepSolver`]) serves as a
//! cheaper alternative and as a cross-validation reference.
//!
//! Fiber dispersion data enters through the [`fiber::DispersionProfile`]
//! trait, and the propagation equations through the
//! [`model::PropagationModel`] trait.
//!
//! ## Modules
//!
//! - [`grid`] — Uniform temporal/spectral sampling domain.
//! - [`fft`] — Discrete Fourier transform pair in the physics convention.
//! - [`fiber`] — Propagation constants and built-in fiber profiles.
//! - [`signal`] — Analytic-signal representation of real fields.
//! - [`pulse`] — Initial-condition helpers (sech pulses, solitons).
//! - [`model`] — Forward models for the analytic signal (Kerr, Raman).
//! - [`solver`] — Fixed-step z-propagation and snapshot handling.
//! - [`spectrogram`] — Windowed time-frequency power representations.

pub mod fft;
pub mod fiber;
pub mod grid;
pub mod model;
pub mod pulse;
pub mod signal;
pub mod solver;
pub mod spectrogram;

/// Vacuum speed of light (micron/fs).
pub const C0: f64 = 0.29979;
