//! Material property provider trait and the library-wide error type.
//!
//! [`MaterialProvider`] answers single-wavelength queries. The layer
//! factory resamples whole grids instead, but both paths share the same
//! clamped linear interpolation so a point query always agrees with the
//! matching layer entry.

use std::path::PathBuf;

use num_complex::Complex64;
use thiserror::Error;

use crate::grid::GridError;
use crate::interp::{interpolate, InterpError};
use crate::layer::LayerError;
use crate::raw::{LoadError, RawSample};
use crate::registry::{Material, MaterialLibrary, Variant};

/// Errors from the material library.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("Material not found: {0}")]
    UnknownMaterial(String),

    #[error("{material} has no {variant} dataset")]
    VariantUnavailable { material: Material, variant: Variant },

    #[error("Data directory does not exist: {}", .0.display())]
    DataDirMissing(PathBuf),

    #[error("Failed to load {label} ({variant}): {source}")]
    Load {
        label: String,
        variant: Variant,
        #[source]
        source: LoadError,
    },

    #[error(transparent)]
    Interp(#[from] InterpError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error("Material library has not been initialised")]
    NotInitialised,

    #[error("Material library already initialised from {}", .0.display())]
    AlreadyInitialised(PathBuf),
}

/// Provides wavelength-dependent optical constants.
pub trait MaterialProvider: Send + Sync {
    /// Human-readable name of this material.
    fn name(&self) -> &str;

    /// Wavelength range over which data is tabulated (nm).
    fn wavelength_range(&self) -> (f64, f64);

    /// Complex refractive index $\tilde{n} = n - ik$ at a given wavelength.
    fn refractive_index(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError>;

    /// Complex dielectric function $\epsilon = \tilde{n}^2$.
    fn dielectric_function(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        let n = self.refractive_index(wavelength_nm)?;
        Ok(n * n)
    }
}

/// A view of one dataset in a [`MaterialLibrary`].
#[derive(Debug, Clone, Copy)]
pub struct TabulatedMaterial<'a> {
    material: Material,
    variant: Variant,
    sample: &'a RawSample,
}

impl<'a> TabulatedMaterial<'a> {
    pub fn material(&self) -> Material {
        self.material
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn sample(&self) -> &'a RawSample {
        self.sample
    }
}

impl MaterialProvider for TabulatedMaterial<'_> {
    fn name(&self) -> &str {
        self.material.label()
    }

    fn wavelength_range(&self) -> (f64, f64) {
        self.sample.wavelength_range()
    }

    /// Outside the tabulated range the boundary value is returned.
    fn refractive_index(&self, wavelength_nm: f64) -> Result<Complex64, MaterialError> {
        let values = interpolate(self.sample.wavelengths_nm(), self.sample.nk(), &[wavelength_nm])?;
        values
            .into_iter()
            .next()
            .ok_or(MaterialError::Interp(InterpError::EmptyInput))
    }
}

impl MaterialLibrary {
    /// Point-query provider for `material`; `variant` resolves as in
    /// [`MaterialLibrary::resolve_variant`].
    pub fn provider(
        &self,
        material: Material,
        variant: Option<Variant>,
    ) -> Result<TabulatedMaterial<'_>, MaterialError> {
        let variant = self.resolve_variant(material, variant)?;
        Ok(TabulatedMaterial {
            material,
            variant,
            sample: self.sample(material, variant)?,
        })
    }
}
