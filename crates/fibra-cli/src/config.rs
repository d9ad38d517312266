//! TOML configuration deserialisation for propagation jobs.

use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub grid: GridConfig,
    pub fiber: FiberConfig,
    pub pulse: PulseConfig,
    pub model: ModelConfig,
    pub propagation: PropagationConfig,
    /// Optional group-velocity/dispersion detail output.
    pub dispersion: Option<DispersionConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Computational domain from TOML.
#[derive(Debug, Deserialize)]
pub struct GridConfig {
    /// Half-extent of the time axis (fs).
    pub t_max: f64,
    /// Number of samples (power of two).
    pub t_num: usize,
}

/// Fiber specification: either a built-in profile or Taylor coefficients.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FiberConfig {
    Named {
        profile: String,
    },
    Taylor {
        /// Expansion frequency (rad/fs).
        w0: f64,
        /// Coefficients `beta_k(w0)` in ascending derivative order.
        beta: Vec<f64>,
    },
}

/// Launch pulse from TOML.
#[derive(Debug, Deserialize)]
pub struct PulseConfig {
    pub soliton_order: f64,
    /// Duration t0 (fs).
    pub duration: f64,
    /// Carrier frequency w0 (rad/fs).
    pub center_frequency: f64,
}

/// Propagation model from TOML.
#[derive(Debug, Deserialize)]
pub struct ModelConfig {
    /// Nonlinear refractive index (micron^2/W).
    pub n2: f64,
    /// Whether to include the Raman contribution (default: true).
    #[serde(default = "default_true")]
    pub raman: bool,
    #[serde(default = "default_raman_fraction")]
    pub raman_fraction: f64,
    #[serde(default = "default_tau1")]
    pub tau1: f64,
    #[serde(default = "default_tau2")]
    pub tau2: f64,
}

fn default_raman_fraction() -> f64 {
    0.18
}
fn default_tau1() -> f64 {
    12.2
}
fn default_tau2() -> f64 {
    32.0
}

/// z-propagation parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct PropagationConfig {
    /// Propagation distance (micron).
    pub z_range: f64,
    pub n_steps: usize,
    /// Store every n-th step (default: 1).
    #[serde(default = "default_n_skip")]
    pub n_skip: usize,
    /// Integration scheme: "rk4ip" or "split-step". Default: "rk4ip".
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_n_skip() -> usize {
    1
}
fn default_method() -> String {
    "rk4ip".into()
}

/// Frequency window for the dispersion-detail output.
#[derive(Debug, Deserialize)]
pub struct DispersionConfig {
    /// Frequency range [start, end] (rad/fs).
    pub w_range: [f64; 2],
    #[serde(default = "default_dispersion_points")]
    pub points: usize,
}

fn default_dispersion_points() -> usize {
    400
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the field evolution as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_evolution: bool,
    /// Whether to also save a JSON run summary (default: false).
    #[serde(default)]
    pub save_json: bool,
    /// Time window of the evolution output (fs); full axis when absent.
    pub t_lim: Option<[f64; 2]>,
    /// Frequency window of the evolution output (rad/fs); positive
    /// half-axis when absent.
    pub w_lim: Option<[f64; 2]>,
    /// Spectrogram computations, one block per window width.
    #[serde(default)]
    pub spectrogram: Vec<SpectrogramConfig>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_evolution: true,
            save_json: false,
            t_lim: None,
            w_lim: None,
            spectrogram: Vec::new(),
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// A single spectrogram request.
#[derive(Debug, Deserialize)]
pub struct SpectrogramConfig {
    /// Propagation distance to analyse (micron); the nearest stored
    /// snapshot is used. Defaults to the end of the run.
    pub z: Option<f64>,
    /// Root-mean-square width of the Gaussian window (fs).
    pub rms_width: f64,
    /// Delay window (fs); full axis when absent.
    pub t_lim: Option<[f64; 2]>,
    #[serde(default = "default_n_tau")]
    pub n_tau: usize,
    #[serde(default = "default_n_freq")]
    pub n_freq: usize,
    /// Frequency band kept in the output (rad/fs).
    pub w_lim: Option<[f64; 2]>,
}

fn default_n_tau() -> usize {
    600
}
fn default_n_freq() -> usize {
    512
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}
