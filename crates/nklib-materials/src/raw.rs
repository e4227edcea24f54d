//! Raw measured optical constants and the loader that reads them from disk.
//!
//! Each material is backed by one of two storage layouts (see [`DataSource`]):
//! separate $n$ and $k$ tables, or a single combined `[wl, n, k]` table.
//! Loading produces a [`RawSample`] in nanometres with the complex index
//! stored as $\tilde{n} = n - ik$.

use std::path::{Path, PathBuf};

use num_complex::Complex64;
use thiserror::Error;

use crate::interp::{interpolate_real, InterpError};
use crate::table::{read_table, TableError};

/// Relative tolerance when checking that split n/k tables share wavelengths.
const CHANNEL_WL_RTOL: f64 = 1e-9;

/// Errors raised while turning on-disk tables into a [`RawSample`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("{file}: {message}")]
    InvalidSample { file: String, message: String },

    #[error("n table {n_file} and k table {k_file} are sampled differently: {message}")]
    ChannelMismatch {
        n_file: String,
        k_file: String,
        message: String,
    },

    #[error("Resampling k channel of {k_file} failed: {source}")]
    Resample {
        k_file: String,
        #[source]
        source: InterpError,
    },
}

/// Wavelength unit used by a table's first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavelengthUnit {
    Nanometre,
    Micrometre,
}

impl WavelengthUnit {
    /// Multiplier converting this unit to nanometres.
    pub fn to_nm(self) -> f64 {
        match self {
            WavelengthUnit::Nanometre => 1.0,
            WavelengthUnit::Micrometre => 1000.0,
        }
    }
}

/// How a material's measured data is laid out on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Separate two-column tables for $n$ and $k$.
    ///
    /// With `align_k` the $k$ channel is linearly resampled onto the $n$
    /// wavelengths before combining. Otherwise both tables must share the
    /// same wavelength column.
    SplitNk {
        n_file: &'static str,
        k_file: &'static str,
        unit: WavelengthUnit,
        align_k: bool,
    },
    /// A single three-column `[wl, n, k]` table.
    Combined {
        file: &'static str,
        unit: WavelengthUnit,
    },
}

impl DataSource {
    /// File names this source reads, relative to the data directory.
    pub fn files(&self) -> Vec<&'static str> {
        match self {
            DataSource::SplitNk { n_file, k_file, .. } => vec![*n_file, *k_file],
            DataSource::Combined { file, .. } => vec![*file],
        }
    }

    pub fn unit(&self) -> WavelengthUnit {
        match self {
            DataSource::SplitNk { unit, .. } | DataSource::Combined { unit, .. } => *unit,
        }
    }
}

/// One material's measured complex refractive index.
///
/// Wavelengths are in nm, strictly increasing, and aligned 1:1 with `nk`.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    wavelengths_nm: Vec<f64>,
    nk: Vec<Complex64>,
}

impl RawSample {
    /// Build a sample, checking the alignment and ordering invariants.
    pub fn new(wavelengths_nm: Vec<f64>, nk: Vec<Complex64>) -> Result<Self, String> {
        if wavelengths_nm.is_empty() {
            return Err("sample has no points".into());
        }
        if wavelengths_nm.len() != nk.len() {
            return Err(format!(
                "{} wavelengths but {} index values",
                wavelengths_nm.len(),
                nk.len()
            ));
        }
        if let Some(i) = (1..wavelengths_nm.len()).find(|&i| wavelengths_nm[i] <= wavelengths_nm[i - 1]) {
            return Err(format!("wavelengths not strictly increasing at index {}", i));
        }
        Ok(Self { wavelengths_nm, nk })
    }

    /// Combine real and absorption channels as $n - ik$.
    pub fn from_n_k(wavelengths_nm: Vec<f64>, n: &[f64], k: &[f64]) -> Result<Self, String> {
        if n.len() != k.len() {
            return Err(format!("{} n values but {} k values", n.len(), k.len()));
        }
        let nk = n.iter().zip(k).map(|(&n, &k)| Complex64::new(n, -k)).collect();
        Self::new(wavelengths_nm, nk)
    }

    pub fn wavelengths_nm(&self) -> &[f64] {
        &self.wavelengths_nm
    }

    pub fn nk(&self) -> &[Complex64] {
        &self.nk
    }

    pub fn len(&self) -> usize {
        self.nk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nk.is_empty()
    }

    /// First and last measured wavelength (nm).
    pub fn wavelength_range(&self) -> (f64, f64) {
        // Non-empty by construction
        (self.wavelengths_nm[0], self.wavelengths_nm[self.wavelengths_nm.len() - 1])
    }
}

fn scaled(values: Vec<f64>, unit: WavelengthUnit) -> Vec<f64> {
    let factor = unit.to_nm();
    values.into_iter().map(|v| v * factor).collect()
}

fn channels_agree(a: &[f64], b: &[f64]) -> Option<String> {
    if a.len() != b.len() {
        return Some(format!("{} rows vs {} rows", a.len(), b.len()));
    }
    a.iter()
        .zip(b)
        .position(|(&x, &y)| (x - y).abs() > CHANNEL_WL_RTOL * x.abs().max(y.abs()))
        .map(|i| format!("wavelength {} vs {} at row {}", a[i], b[i], i + 1))
}

/// Load the sample described by `source` from `dir`.
pub fn load_source(dir: &Path, source: &DataSource) -> Result<RawSample, LoadError> {
    match source {
        DataSource::SplitNk {
            n_file,
            k_file,
            unit,
            align_k,
        } => {
            let n_table = read_table(&dir.join(n_file), 2)?;
            let k_table = read_table(&dir.join(k_file), 2)?;

            let wl = n_table.column(0);
            let n = n_table.column(1);
            let k_wl = k_table.column(0);
            let k_raw = k_table.column(1);

            let k = if *align_k {
                interpolate_real(&k_wl, &k_raw, &wl).map_err(|source| LoadError::Resample {
                    k_file: k_file.to_string(),
                    source,
                })?
            } else {
                if let Some(message) = channels_agree(&wl, &k_wl) {
                    return Err(LoadError::ChannelMismatch {
                        n_file: n_file.to_string(),
                        k_file: k_file.to_string(),
                        message,
                    });
                }
                k_raw
            };

            RawSample::from_n_k(scaled(wl, *unit), &n, &k).map_err(|message| {
                LoadError::InvalidSample {
                    file: n_file.to_string(),
                    message,
                }
            })
        }
        DataSource::Combined { file, unit } => {
            let table = read_table(&dir.join(file), 3)?;
            let wl = scaled(table.column(0), *unit);
            RawSample::from_n_k(wl, &table.column(1), &table.column(2)).map_err(|message| {
                LoadError::InvalidSample {
                    file: file.to_string(),
                    message,
                }
            })
        }
    }
}

/// Full path of every file `source` reads.
pub fn source_paths(dir: &Path, source: &DataSource) -> Vec<PathBuf> {
    source.files().into_iter().map(|f| dir.join(f)).collect()
}
