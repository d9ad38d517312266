//! Fibra command-line interface.
//!
//! Run propagation scenarios from TOML configuration files:
//! ```sh
//! fibra run job.toml
//! fibra validate job.toml
//! fibra fibers
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fibra")]
#[command(about = "Fibra: analytic-signal pulse propagation in nonlinear fibers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a propagation scenario from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running the simulation.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display information about the built-in fiber profiles.
    Fibers,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Fibra Pulse Propagation");
            println!("=======================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_simulation(&job)?;

            // Determine output directory
            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            // GV/GVD details (optional)
            if let Some(details) = &result.dispersion {
                let path = out_dir.join("dispersion.csv");
                runner::write_dispersion_csv(details, &path)?;
            }

            // Evolution CSVs (default on)
            if job.output.save_evolution {
                runner::write_evolution_time_csv(
                    &result,
                    job.output.t_lim,
                    &out_dir.join("evolution_time.csv"),
                )?;
                runner::write_evolution_spectrum_csv(
                    &result,
                    job.output.w_lim,
                    &out_dir.join("evolution_spectrum.csv"),
                )?;
            }

            // One file per configured window width
            for named in &result.spectrograms {
                let file = format!("spectrogram_{}.csv", runner::width_label(named.rms_width));
                runner::write_spectrogram_csv(named, &out_dir.join(file))?;
            }

            // JSON summary (optional)
            if job.output.save_json {
                runner::write_summary_json(&job, &result, &out_dir.join("summary.json"))?;
            }

            println!("Simulation complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let _job = config::load_config(&config)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Fibers => {
            println!("Built-in fiber profiles:");
            println!();
            println!("  esm     — \"Endlessly single mode\" photonic crystal fiber.");
            println!("            Rational [8/8] index fit (Stone & Knight 2008),");
            println!("            zero-dispersion point near 1.74 rad/fs.");
            println!();
            println!("  taylor  — Specify any fiber by Taylor coefficients:");
            println!("            [fiber] w0 = 1.7, beta = [b0, b1, b2, ...]");
            Ok(())
        }
    }
}
