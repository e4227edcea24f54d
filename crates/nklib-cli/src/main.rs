//! nklib command-line interface.
//!
//! Build thin-film layers from a directory of measured optical constants:
//! ```sh
//! nklib materials
//! nklib validate --data-dir "nklib data"
//! nklib layer DLC5W --thickness 80 --variant standard -o dlc5w.csv
//! nklib query Ag 632.8
//! nklib run job.toml
//! ```
//!
//! The data directory comes from `--data-dir` (or the `NKLIB_DATA_DIR`
//! environment variable), falling back to `data_dir` in a job file.

mod config;
mod runner;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use nklib_materials::raw::source_paths;
use nklib_materials::{
    LayerRequest, Material, MaterialLibrary, MaterialProvider, Variant, WavelengthGrid,
    DEFAULT_WL_MAX, DEFAULT_WL_MIN, DEFAULT_WL_STEP,
};

const DATA_DIR_ENV: &str = "NKLIB_DATA_DIR";

#[derive(Parser)]
#[command(name = "nklib")]
#[command(about = "nklib: optical constants for thin-film stacks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataDirArg {
    /// Material data directory.
    #[arg(long, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,
}

impl DataDirArg {
    fn require(&self) -> anyhow::Result<PathBuf> {
        self.data_dir.clone().with_context(|| {
            format!("No data directory: pass --data-dir or set {}", DATA_DIR_ENV)
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the materials the library provides and the files behind them.
    Materials {
        #[command(flatten)]
        data: DataDirArg,
    },
    /// Load every dataset and report its wavelength range.
    Validate {
        #[command(flatten)]
        data: DataDirArg,
    },
    /// Build a single layer and write it as CSV or JSON.
    Layer {
        /// Material label (e.g. Ag, BK7, DLC10W).
        material: Material,
        /// Layer thickness, in --unit.
        #[arg(short, long)]
        thickness: f64,
        #[arg(long, default_value_t = DEFAULT_WL_MIN)]
        wl_min: f64,
        #[arg(long, default_value_t = DEFAULT_WL_MAX)]
        wl_max: f64,
        #[arg(long, default_value_t = DEFAULT_WL_STEP)]
        wl_step: f64,
        #[arg(long, default_value = "nm")]
        unit: String,
        /// "standard" or "extended" (default: extended where available).
        #[arg(long)]
        variant: Option<Variant>,
        /// Output file (default: <LABEL>.csv, or <LABEL>.json with --json).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write JSON instead of CSV.
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        data: DataDirArg,
    },
    /// Print n, k and ε of a material at one wavelength.
    Query {
        material: Material,
        wavelength_nm: f64,
        #[arg(long)]
        variant: Option<Variant>,
        #[command(flatten)]
        data: DataDirArg,
    },
    /// Build every layer of a TOML job file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        data: DataDirArg,
    },
}

fn load_library(dir: PathBuf) -> anyhow::Result<MaterialLibrary> {
    MaterialLibrary::load(&dir)
        .with_context(|| format!("Loading material library from {}", dir.display()))
}

fn layer_request(
    thickness: f64,
    wl_min: f64,
    wl_max: f64,
    wl_step: f64,
    unit: String,
    variant: Option<Variant>,
) -> anyhow::Result<LayerRequest> {
    let grid = WavelengthGrid::new(wl_min, wl_max, wl_step)?;
    let mut request = LayerRequest::new(thickness).with_grid(grid).with_unit(unit);
    request.variant = variant;
    Ok(request)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Materials { data } => {
            println!("Available materials:");
            println!();
            for material in Material::ALL {
                let descriptor = material.descriptor();
                let files = match &data.data_dir {
                    Some(dir) => source_paths(dir, &descriptor.standard)
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>(),
                    None => descriptor.standard.files().iter().map(|f| f.to_string()).collect(),
                };
                println!(
                    "  {:<7} — {}{}",
                    material.label(),
                    material.description(),
                    if material.supports_extended() {
                        " [standard, extended]"
                    } else {
                        ""
                    }
                );
                println!("            {}", files.join(", "));
            }
            Ok(())
        }
        Commands::Validate { data } => {
            let library = load_library(data.require()?)?;
            for material in library.materials() {
                for variant in [Variant::Standard, Variant::Extended] {
                    if let Ok(sample) = library.sample(material, variant) {
                        let (lo, hi) = sample.wavelength_range();
                        println!(
                            "  {:<7} {:<9} {:>5} points  {:.1}–{:.1} nm",
                            material.label(),
                            variant,
                            sample.len(),
                            lo,
                            hi
                        );
                    }
                }
            }
            println!("Library is valid: {}", library.data_dir().display());
            Ok(())
        }
        Commands::Layer {
            material,
            thickness,
            wl_min,
            wl_max,
            wl_step,
            unit,
            variant,
            output,
            json,
            data,
        } => {
            let library = load_library(data.require()?)?;
            let request = layer_request(thickness, wl_min, wl_max, wl_step, unit, variant)?;

            let layer = library.build_layer(material, &request)?;
            let extension = if json { "json" } else { "csv" };
            let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.{}", layer.label(), extension)));
            if json {
                runner::write_layers_json(std::slice::from_ref(&layer), &path)?;
            } else {
                runner::write_layer_csv(&layer, &path)?;
            }
            println!("{} ({} points) written to: {}", layer.label(), layer.len(), path.display());
            Ok(())
        }
        Commands::Query {
            material,
            wavelength_nm,
            variant,
            data,
        } => {
            let library = load_library(data.require()?)?;
            let provider = library.provider(material, variant)?;
            let nk = provider.refractive_index(wavelength_nm)?;
            let eps = provider.dielectric_function(wavelength_nm)?;
            let (lo, hi) = provider.wavelength_range();
            if wavelength_nm < lo || wavelength_nm > hi {
                log::warn!(
                    "{} nm is outside the {} data range [{:.1}, {:.1}] nm; boundary value held",
                    wavelength_nm,
                    provider.name(),
                    lo,
                    hi
                );
            }
            println!("{} ({}) at {} nm:", provider.name(), provider.variant(), wavelength_nm);
            println!("  n = {:.6}", nk.re);
            println!("  k = {:.6}", -nk.im);
            println!("  ε = {:.6} {:+.6}i", eps.re, eps.im);
            Ok(())
        }
        Commands::Run { config, output, data } => {
            println!("nklib layer builder");
            println!("===================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let data_dir = config::resolve_data_dir(data.data_dir, &job, &config, DATA_DIR_ENV)?;
            let library = load_library(data_dir)?;
            let layers = runner::build_stack(&job, &library)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_csv {
                for (i, layer) in layers.iter().enumerate() {
                    runner::write_layer_csv(layer, &out_dir.join(runner::layer_file_name(i, layer)))?;
                }
            }

            if job.output.save_json {
                runner::write_layers_json(&layers, &out_dir.join("stack.json"))?;
            }

            println!("Built {} layers into {}", layers.len(), out_dir.display());
            Ok(())
        }
    }
}
