//! TOML job configuration: a stack of layers built on one wavelength grid.
//!
//! ```toml
//! data_dir = "nklib data"
//! unit = "nm"
//!
//! [grid]
//! wl_min = 400.0
//! wl_max = 1200.0
//! wl_step = 2.0
//!
//! [[layer]]
//! material = "ITO"
//! thickness = 150.0
//!
//! [[layer]]
//! material = "DLC5W"
//! thickness = 80.0
//! variant = "standard"
//!
//! [output]
//! directory = "./output"
//! save_json = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use nklib_materials::{Variant, WavelengthGrid, DEFAULT_WL_MAX, DEFAULT_WL_MIN, DEFAULT_WL_STEP};

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    /// Material data directory. Relative paths are resolved against the
    /// directory containing the job file.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub grid: GridConfig,
    /// Thickness unit applied to every layer.
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(rename = "layer", default)]
    pub layers: Vec<LayerConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Wavelength grid; omitted fields take the library defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_wl_min")]
    pub wl_min: f64,
    #[serde(default = "default_wl_max")]
    pub wl_max: f64,
    #[serde(default = "default_wl_step")]
    pub wl_step: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            wl_min: DEFAULT_WL_MIN,
            wl_max: DEFAULT_WL_MAX,
            wl_step: DEFAULT_WL_STEP,
        }
    }
}

impl GridConfig {
    pub fn to_grid(&self) -> anyhow::Result<WavelengthGrid> {
        Ok(WavelengthGrid::new(self.wl_min, self.wl_max, self.wl_step)?)
    }
}

fn default_unit() -> String {
    "nm".into()
}
fn default_wl_min() -> f64 {
    DEFAULT_WL_MIN
}
fn default_wl_max() -> f64 {
    DEFAULT_WL_MAX
}
fn default_wl_step() -> f64 {
    DEFAULT_WL_STEP
}

/// One layer in the stack, top to bottom.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    /// Material label (e.g. "Ag", "BK7", "DLC10W").
    pub material: String,
    pub thickness: f64,
    /// "standard" or "extended"; omitted picks extended where available.
    #[serde(default)]
    pub variant: Option<Variant>,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// One CSV per layer (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// All layers in a single `stack.json` (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Parse a job configuration from TOML text.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    if config.layers.is_empty() {
        anyhow::bail!("Job defines no [[layer]] entries");
    }
    config.grid.to_grid()?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read job file {}", path.display()))?;
    let mut config =
        parse_config(&content).with_context(|| format!("Invalid job file {}", path.display()))?;

    if let Some(dir) = config.data_dir.take() {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.data_dir = Some(if dir.is_relative() { base.join(dir) } else { dir });
    }
    Ok(config)
}

/// Pick the data directory for a job: the command-line value (flag or
/// environment) wins over the job file's `data_dir`.
pub fn resolve_data_dir(
    flag: Option<PathBuf>,
    job: &JobConfig,
    job_path: &Path,
    env_var: &str,
) -> anyhow::Result<PathBuf> {
    match (flag, &job.data_dir) {
        (Some(dir), _) => Ok(dir),
        (None, Some(from_job)) => Ok(from_job.clone()),
        (None, None) => anyhow::bail!(
            "No data directory: set data_dir in {}, pass --data-dir or set {}",
            job_path.display(),
            env_var
        ),
    }
}
