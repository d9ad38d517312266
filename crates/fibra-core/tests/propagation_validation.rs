//! Integration tests: cross-scheme validation and conservation laws.
//!
//! The two integration schemes are independent implementations of the same
//! evolution equation, so agreement between them validates both (the same
//! role the analytical benchmark plays for a single-method solver). The
//! photon number is an exact invariant of the implemented models and makes
//! a sharp regression check for the stepping code.

use num_complex::Complex64;

use fibra_core::fiber::{EsmFiber, PropagationConstant};
use fibra_core::grid::Grid;
use fibra_core::model::{photon_number, FmasS, FmasSRaman};
use fibra_core::pulse::SechPulse;
use fibra_core::signal::AnalyticSignal;
use fibra_core::solver::rk4ip::Rk4ipSolver;
use fibra_core::solver::split_step::SplitStepSolver;
use fibra_core::solver::PropagationSolver;

const W0: f64 = 1.7; // rad/fs
const T0: f64 = 7.0; // fs
const N2: f64 = 3.0e-8; // micron^2/W

/// Second-order soliton on a grid whose Nyquist frequency clears the third
/// harmonic of the carrier.
fn scenario() -> (Grid, PropagationConstant, Vec<f64>, Vec<Complex64>) {
    let grid = Grid::new(250.0, 1024).unwrap();
    let pc = PropagationConstant::new(Box::new(EsmFiber));
    let beta_w = pc.beta_on(&grid.w);

    let pulse = SechPulse::soliton(2.0, T0, W0, pc.beta2(W0), N2);
    let initial = AnalyticSignal::from_real_field(&grid, &pulse.sample(&grid.t)).w_rep;
    (grid, pc, beta_w, initial)
}

/// RK4IP and the symmetric split-step scheme must converge to the same
/// field; at these step sizes they agree to well below one part in 1e4.
#[test]
fn test_independent_schemes_agree() {
    let (grid, _, beta_w, initial) = scenario();

    let rk4ip = Rk4ipSolver::new(Box::new(FmasS::new(&grid.w, &beta_w, N2)));
    let split = SplitStepSolver::new(Box::new(FmasS::new(&grid.w, &beta_w, N2)));

    let a = rk4ip.propagate(&initial, 2000.0, 400, 400).unwrap();
    let b = split.propagate(&initial, 2000.0, 400, 400).unwrap();

    let end_a = a.uwz.row(a.n_snapshots() - 1);
    let end_b = b.uwz.row(b.n_snapshots() - 1);

    let diff: f64 = end_a
        .iter()
        .zip(end_b.iter())
        .map(|(x, y)| (x - y).norm_sqr())
        .sum::<f64>()
        .sqrt();
    let norm: f64 = end_a.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt();

    assert!(
        diff / norm < 1e-4,
        "schemes disagree: relative L2 difference {}",
        diff / norm
    );
}

/// The Kerr model conserves the photon number exactly; the fixed-step
/// integration should hold it to near rounding.
#[test]
fn test_photon_number_is_conserved() {
    let (grid, _, beta_w, initial) = scenario();

    let solver = Rk4ipSolver::new(Box::new(FmasS::new(&grid.w, &beta_w, N2)));
    let evo = solver.propagate(&initial, 2000.0, 200, 50).unwrap();

    let reference = photon_number(&evo.w, &initial);
    for i in 0..evo.n_snapshots() {
        let row: Vec<Complex64> = evo.uwz.row(i).to_vec();
        let drift = (photon_number(&evo.w, &row) - reference).abs() / reference;
        assert!(drift < 1e-8, "drift {drift} at z = {}", evo.z[i]);
    }
}

/// The Raman convolution is real in the time domain, so it too conserves
/// the photon number while reddening the spectrum.
#[test]
fn test_raman_conserves_photons_while_reddening() {
    let (grid, _, beta_w, initial) = scenario();

    let solver = Rk4ipSolver::new(Box::new(FmasSRaman::new(&grid.w, &beta_w, N2)));
    let evo = solver.propagate(&initial, 5000.0, 500, 500).unwrap();
    let end: Vec<Complex64> = evo.uwz.row(evo.n_snapshots() - 1).to_vec();

    let drift = (photon_number(&evo.w, &end) - photon_number(&evo.w, &initial)).abs()
        / photon_number(&evo.w, &initial);
    assert!(drift < 1e-6, "photon drift {drift}");

    // Intrapulse Raman scattering shifts the spectral centroid down.
    let centroid = |uw: &[Complex64]| {
        let mut num = 0.0;
        let mut den = 0.0;
        for (&w, u) in grid.w.iter().zip(uw) {
            if w > 0.0 {
                num += w * u.norm_sqr();
                den += u.norm_sqr();
            }
        }
        num / den
    };
    let before = centroid(&initial);
    let after = centroid(&end);
    assert!(
        after < before - 1e-3,
        "expected redshift, centroid went {before} -> {after}"
    );
}

/// After the frame-of-reference shift at the group velocity of the carrier
/// a linearly propagated pulse stays centred near t = 0, while in the lab
/// frame it would have walked off by tens of picoseconds.
#[test]
fn test_moving_frame_keeps_pulse_stationary() {
    let (grid, pc, beta_w, initial) = scenario();

    // Linear run: n2 = 0 switches the nonlinearity off.
    let solver = Rk4ipSolver::new(Box::new(FmasS::new(&grid.w, &beta_w, 0.0)));
    let evo = solver.propagate(&initial, 1.0e4, 100, 100).unwrap();

    let frame = evo.to_moving_frame(pc.vg(W0));
    let last = frame.row(frame.nrows() - 1);
    let peak_idx = last
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm().partial_cmp(&b.1.norm()).unwrap())
        .map(|(i, _)| i)
        .unwrap();

    // Third-order dispersion shifts the peak by a few femtoseconds at most.
    let t_peak = grid.t[peak_idx];
    assert!(t_peak.abs() < 10.0, "peak drifted to t = {t_peak} fs");
}
