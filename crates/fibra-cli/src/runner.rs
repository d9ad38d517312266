//! Simulation runner: ties together fiber, grid, model, and solver.

use std::path::Path;

use anyhow::{Context, Result};
use num_complex::Complex64;

use fibra_core::fiber::{DispersionProfile, EsmFiber, PropagationConstant, TaylorDispersion};
use fibra_core::grid::Grid;
use fibra_core::model::{photon_number, FmasS, FmasSRaman, PropagationModel, RamanResponse};
use fibra_core::pulse::SechPulse;
use fibra_core::signal::AnalyticSignal;
use fibra_core::solver::rk4ip::Rk4ipSolver;
use fibra_core::solver::split_step::SplitStepSolver;
use fibra_core::solver::{Evolution, PropagationSolver};
use fibra_core::spectrogram::{spectrogram, Spectrogram, SpectrogramSpec};
use ndarray::Array2;

use crate::config::{FiberConfig, JobConfig};

/// Group-velocity and dispersion details sampled over a frequency window.
pub struct DispersionDetails {
    pub w: Vec<f64>,
    pub vg: Vec<f64>,
    pub beta2: Vec<f64>,
}

/// One computed spectrogram together with its request parameters.
pub struct NamedSpectrogram {
    /// Window width used, also the file label (fs).
    pub rms_width: f64,
    /// Distance of the analysed snapshot (micron).
    pub z: f64,
    pub spectrogram: Spectrogram,
}

/// Results from a simulation run.
pub struct SimulationOutput {
    pub grid: Grid,
    pub evolution: Evolution,
    /// Time-domain fields per snapshot in the co-moving frame.
    pub frame: Array2<Complex64>,
    pub spectrograms: Vec<NamedSpectrogram>,
    pub dispersion: Option<DispersionDetails>,
    pub photon_number_start: f64,
    pub photon_number_end: f64,
}

/// Run a full simulation from a parsed job configuration.
pub fn run_simulation(job: &JobConfig) -> Result<SimulationOutput> {
    let pc = build_propagation_constant(&job.fiber)?;
    println!("Fiber: {}", pc.profile_name());

    let dispersion = job.dispersion.as_ref().map(|cfg| {
        let [start, end] = cfg.w_range;
        let n = cfg.points.max(2);
        let w: Vec<f64> = (0..n)
            .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
            .collect();
        DispersionDetails {
            vg: w.iter().map(|&x| pc.vg(x)).collect(),
            beta2: w.iter().map(|&x| pc.beta2(x)).collect(),
            w,
        }
    });

    let grid = Grid::new(job.grid.t_max, job.grid.t_num)
        .context("invalid [grid] section")?;
    println!(
        "Grid: {} samples over [{:.0}, {:.0}) fs (dt = {:.4} fs)",
        grid.t_num, -grid.t_max, grid.t_max, grid.dt
    );

    let beta_w = pc.beta_on(&grid.w);
    log::debug!("sampled the propagation constant on {} bins", beta_w.len());
    let model = build_model(job, &grid, &beta_w);
    println!("Model: {}", model.model_name());

    let w0 = job.pulse.center_frequency;
    let beta2 = pc.beta2(w0);
    let pulse = SechPulse::soliton(
        job.pulse.soliton_order,
        job.pulse.duration,
        w0,
        beta2,
        job.model.n2,
    );
    println!(
        "Pulse: Ns = {}, t0 = {} fs, w0 = {} rad/fs, A0 = {:.3} (beta2 = {:+.3e} fs^2/micron)",
        job.pulse.soliton_order, job.pulse.duration, w0, pulse.amplitude, beta2
    );

    let initial = AnalyticSignal::from_real_field(&grid, &pulse.sample(&grid.t));

    let solver = build_solver(&job.propagation.method, model)?;
    println!(
        "Propagating {:.3e} micron in {} steps ({}), storing every {}th state...",
        job.propagation.z_range,
        job.propagation.n_steps,
        solver.method_name(),
        job.propagation.n_skip
    );

    let evolution = solver
        .propagate(
            &initial.w_rep,
            job.propagation.z_range,
            job.propagation.n_steps,
            job.propagation.n_skip,
        )
        .context("propagation failed")?;

    let photon_number_start = photon_number(&evolution.w, &initial.w_rep);
    let last_row: Vec<Complex64> = evolution.uwz.row(evolution.n_snapshots() - 1).to_vec();
    let photon_number_end = photon_number(&evolution.w, &last_row);
    let drift = ((photon_number_end - photon_number_start) / photon_number_start).abs();
    println!(
        "Photon number drift: {:.2e} ({} snapshots stored)",
        drift,
        evolution.n_snapshots()
    );
    if drift > 1e-6 {
        eprintln!("Warning: photon number drifted by {drift:.2e}; consider more steps");
    }

    // Shift to the frame in which the launch pulse is stationary.
    let v0 = pc.vg(w0);
    println!("Reference frame: moving at vg({w0}) = {v0:.5} micron/fs");
    let frame = evolution.to_moving_frame(v0);

    let mut spectrograms = Vec::with_capacity(job.output.spectrogram.len());
    for cfg in &job.output.spectrogram {
        let z_request = cfg.z.unwrap_or(job.propagation.z_range);
        let (idx, _) = evolution.snapshot_nearest(z_request);
        let signal: Vec<Complex64> = frame.row(idx).to_vec();

        let spec = SpectrogramSpec {
            t_lim: cfg.t_lim.map(|[a, b]| (a, b)),
            n_tau: cfg.n_tau,
            n_freq: cfg.n_freq,
            rms_width: cfg.rms_width,
        };
        let mut result = spectrogram(&grid, &signal, &spec)
            .with_context(|| format!("spectrogram with rms width {} fs", cfg.rms_width))?;
        if let Some([lo, hi]) = cfg.w_lim {
            result = result.band((lo, hi));
        }

        println!(
            "Spectrogram: s0 = {} fs at z = {:.3e} micron ({} x {} samples)",
            cfg.rms_width,
            evolution.z[idx],
            result.w.len(),
            result.tau.len()
        );
        spectrograms.push(NamedSpectrogram {
            rms_width: cfg.rms_width,
            z: evolution.z[idx],
            spectrogram: result,
        });
    }

    Ok(SimulationOutput {
        grid,
        evolution,
        frame,
        spectrograms,
        dispersion,
        photon_number_start,
        photon_number_end,
    })
}

/// Build the propagation-constant wrapper from the fiber configuration.
fn build_propagation_constant(config: &FiberConfig) -> Result<PropagationConstant> {
    let profile: Box<dyn DispersionProfile> = match config {
        FiberConfig::Named { profile } => match profile.as_str() {
            "esm" => Box::new(EsmFiber),
            other => anyhow::bail!(
                "Unknown fiber profile '{}'. Valid identifiers: esm (or a taylor expansion table)",
                other
            ),
        },
        FiberConfig::Taylor { w0, beta } => {
            if beta.is_empty() {
                anyhow::bail!("Taylor fiber specification requires at least one coefficient");
            }
            Box::new(TaylorDispersion::new(*w0, beta.clone()))
        }
    };
    Ok(PropagationConstant::new(profile))
}

/// Build the propagation model from the job configuration.
fn build_model(job: &JobConfig, grid: &Grid, beta_w: &[f64]) -> Box<dyn PropagationModel> {
    if job.model.raman {
        let response = RamanResponse {
            fraction: job.model.raman_fraction,
            tau1: job.model.tau1,
            tau2: job.model.tau2,
        };
        Box::new(FmasSRaman::with_response(
            &grid.w,
            beta_w,
            job.model.n2,
            response,
        ))
    } else {
        Box::new(FmasS::new(&grid.w, beta_w, job.model.n2))
    }
}

/// Select the integration scheme by name.
fn build_solver(
    method: &str,
    model: Box<dyn PropagationModel>,
) -> Result<Box<dyn PropagationSolver>> {
    match method {
        "rk4ip" => Ok(Box::new(Rk4ipSolver::new(model))),
        "split-step" => Ok(Box::new(SplitStepSolver::new(model))),
        other => anyhow::bail!(
            "Unknown propagation method '{}'. Valid identifiers: rk4ip, split-step",
            other
        ),
    }
}

/// Write group-velocity/dispersion details to a CSV file.
pub fn write_dispersion_csv(details: &DispersionDetails, path: &Path) -> Result<()> {
    use std::io::Write;

    create_parent(path)?;
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Fibra — Propagation-Constant Details")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "#")?;
    writeln!(file, "w_radfs,vg_micronfs,beta2_fs2micron")?;
    for i in 0..details.w.len() {
        writeln!(
            file,
            "{:.6},{:.6e},{:.6e}",
            details.w[i], details.vg[i], details.beta2[i]
        )?;
    }

    println!("Dispersion details written to: {}", path.display());
    Ok(())
}

/// Write the co-moving-frame intensity evolution to a CSV file.
///
/// Long format with one row per (z, t) sample, restricted to the configured
/// time window.
pub fn write_evolution_time_csv(
    output: &SimulationOutput,
    t_lim: Option<[f64; 2]>,
    path: &Path,
) -> Result<()> {
    use std::io::Write;

    create_parent(path)?;
    let mut file = std::fs::File::create(path)?;
    let [t_lo, t_hi] = t_lim.unwrap_or([-output.grid.t_max, output.grid.t_max]);

    writeln!(file, "# Fibra — Field Evolution (co-moving frame)")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "#")?;
    writeln!(file, "z_micron,t_fs,intensity")?;
    for (i, &z) in output.evolution.z.iter().enumerate() {
        for (n, &t) in output.grid.t.iter().enumerate() {
            if t < t_lo || t > t_hi {
                continue;
            }
            writeln!(file, "{:.4e},{:.4},{:.6e}", z, t, output.frame[[i, n]].norm_sqr())?;
        }
    }

    println!("Evolution (time domain) written to: {}", path.display());
    Ok(())
}

/// Write the spectral evolution to a CSV file.
pub fn write_evolution_spectrum_csv(
    output: &SimulationOutput,
    w_lim: Option<[f64; 2]>,
    path: &Path,
) -> Result<()> {
    use std::io::Write;

    create_parent(path)?;
    let mut file = std::fs::File::create(path)?;
    // Positive half-axis unless a window is requested.
    let [w_lo, w_hi] = w_lim.unwrap_or([0.0, f64::INFINITY]);

    writeln!(file, "# Fibra — Spectral Evolution")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "#")?;
    writeln!(file, "z_micron,w_radfs,power")?;
    let order = output.grid.ascending_frequency_order();
    for (i, &z) in output.evolution.z.iter().enumerate() {
        for &k in &order {
            let w = output.grid.w[k];
            if w < w_lo || w > w_hi {
                continue;
            }
            writeln!(
                file,
                "{:.4e},{:.6},{:.6e}",
                z,
                w,
                output.evolution.uwz[[i, k]].norm_sqr()
            )?;
        }
    }

    println!("Evolution (spectrum) written to: {}", path.display());
    Ok(())
}

/// Write one spectrogram to a CSV file in long format.
pub fn write_spectrogram_csv(named: &NamedSpectrogram, path: &Path) -> Result<()> {
    use std::io::Write;

    create_parent(path)?;
    let mut file = std::fs::File::create(path)?;
    let result = &named.spectrogram;

    writeln!(file, "# Fibra — Analytic-Signal Spectrogram")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# z: {:.4e} micron", named.z)?;
    writeln!(file, "# window rms width: {} fs", named.rms_width)?;
    writeln!(file, "#")?;
    writeln!(file, "tau_fs,w_radfs,power")?;
    for (j, &w) in result.w.iter().enumerate() {
        for (i, &tau) in result.tau.iter().enumerate() {
            writeln!(file, "{:.4},{:.6},{:.6e}", tau, w, result.power[[j, i]])?;
        }
    }

    println!("Spectrogram written to: {}", path.display());
    Ok(())
}

/// Write a JSON run summary.
pub fn write_summary_json(job: &JobConfig, output: &SimulationOutput, path: &Path) -> Result<()> {
    #[derive(serde::Serialize)]
    struct Summary<'a> {
        method: &'a str,
        z_range_micron: f64,
        n_steps: usize,
        snapshots: usize,
        photon_number_start: f64,
        photon_number_end: f64,
        spectrogram_widths_fs: Vec<f64>,
    }

    create_parent(path)?;
    let summary = Summary {
        method: &job.propagation.method,
        z_range_micron: job.propagation.z_range,
        n_steps: job.propagation.n_steps,
        snapshots: output.evolution.n_snapshots(),
        photon_number_start: output.photon_number_start,
        photon_number_end: output.photon_number_end,
        spectrogram_widths_fs: output.spectrograms.iter().map(|s| s.rms_width).collect(),
    };

    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    println!("Run summary written to: {}", path.display());
    Ok(())
}

/// File label for a window width: `39.1` becomes `s39p1`.
pub fn width_label(rms_width: f64) -> String {
    format!("s{}", rms_width).replace('.', "p")
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
