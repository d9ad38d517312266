//! Integration test: full analysis pipeline from propagation output to a
//! banded spectrogram.

use num_complex::Complex64;

use fibra_core::fiber::{EsmFiber, PropagationConstant};
use fibra_core::grid::Grid;
use fibra_core::model::FmasSRaman;
use fibra_core::pulse::SechPulse;
use fibra_core::signal::AnalyticSignal;
use fibra_core::solver::rk4ip::Rk4ipSolver;
use fibra_core::solver::PropagationSolver;
use fibra_core::spectrogram::{spectrogram, SpectrogramSpec};

#[test]
fn test_pipeline_localises_launch_pulse() {
    let grid = Grid::new(250.0, 1024).unwrap();
    let pc = PropagationConstant::new(Box::new(EsmFiber));
    let beta_w = pc.beta_on(&grid.w);

    let w0 = 1.7;
    let pulse = SechPulse::soliton(2.0, 7.0, w0, pc.beta2(w0), 3.0e-8);
    let initial = AnalyticSignal::from_real_field(&grid, &pulse.sample(&grid.t)).w_rep;

    let solver = Rk4ipSolver::new(Box::new(FmasSRaman::new(&grid.w, &beta_w, 3.0e-8)));
    let evo = solver.propagate(&initial, 1000.0, 100, 20).unwrap();

    // Analyse the launch state through the same code path the runner uses:
    // co-moving frame, nearest snapshot, windowed transform, band filter.
    let frame = evo.to_moving_frame(pc.vg(w0));
    let (idx, _) = evo.snapshot_nearest(0.0);
    assert_eq!(idx, 0);
    let signal: Vec<Complex64> = frame.row(idx).to_vec();

    let spec = SpectrogramSpec {
        t_lim: Some((-150.0, 150.0)),
        n_tau: 151,
        n_freq: 256,
        rms_width: 25.0,
    };
    let result = spectrogram(&grid, &signal, &spec)
        .unwrap()
        .band((0.5, 3.5));

    assert!(result.w.iter().all(|&w| w > 0.5 && w < 3.5));

    let (tau_peak, w_peak) = result.peak();
    assert!(tau_peak.abs() <= 4.0, "peak delay {tau_peak} fs");
    let coarse_dw = grid.dw * (grid.t_num / 256) as f64;
    assert!(
        (w_peak - w0).abs() <= coarse_dw,
        "peak frequency {w_peak} rad/fs"
    );
}
