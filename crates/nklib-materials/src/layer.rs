//! The layer handed to a multilayer stack calculation.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    #[error("Layer has {wavelengths} wavelengths but {values} index values")]
    LengthMismatch { wavelengths: usize, values: usize },

    #[error("Layer thickness must be finite and non-negative, got {0}")]
    InvalidThickness(f64),
}

/// One material slab: complex index on a wavelength grid, plus thickness.
///
/// Immutable after construction. `wavelengths_nm` and `nk` always have the
/// same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LayerFields")]
pub struct Layer {
    wavelengths_nm: Vec<f64>,
    nk: Vec<Complex64>,
    thickness: f64,
    label: String,
    unit: String,
}

/// Unchecked wire form, validated through [`Layer::new`] on deserialisation.
#[derive(Deserialize)]
struct LayerFields {
    wavelengths_nm: Vec<f64>,
    nk: Vec<Complex64>,
    thickness: f64,
    label: String,
    unit: String,
}

impl TryFrom<LayerFields> for Layer {
    type Error = LayerError;

    fn try_from(f: LayerFields) -> Result<Self, Self::Error> {
        Layer::new(f.wavelengths_nm, f.nk, f.thickness, f.label, f.unit)
    }
}

impl Layer {
    /// Construct a layer.
    ///
    /// # Arguments
    /// * `wavelengths_nm` - Grid wavelengths in nm.
    /// * `nk` - Complex index $n - ik$ at each grid wavelength.
    /// * `thickness` - Slab thickness, expressed in `unit`.
    /// * `label` - Material label (e.g. "Ag", "DLC5W").
    /// * `unit` - Length unit of `thickness` (e.g. "nm").
    pub fn new(
        wavelengths_nm: Vec<f64>,
        nk: Vec<Complex64>,
        thickness: f64,
        label: impl Into<String>,
        unit: impl Into<String>,
    ) -> Result<Self, LayerError> {
        if wavelengths_nm.len() != nk.len() {
            return Err(LayerError::LengthMismatch {
                wavelengths: wavelengths_nm.len(),
                values: nk.len(),
            });
        }
        if !thickness.is_finite() || thickness < 0.0 {
            return Err(LayerError::InvalidThickness(thickness));
        }
        Ok(Self {
            wavelengths_nm,
            nk,
            thickness,
            label: label.into(),
            unit: unit.into(),
        })
    }

    pub fn wavelengths_nm(&self) -> &[f64] {
        &self.wavelengths_nm
    }

    pub fn nk(&self) -> &[Complex64] {
        &self.nk
    }

    /// Complex index at grid position `index`, or `None` past the end.
    pub fn refractive_index_at(&self, index: usize) -> Option<Complex64> {
        self.nk.get(index).copied()
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn len(&self) -> usize {
        self.nk.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nk.is_empty()
    }

    /// `(wavelength_nm, nk)` pairs in grid order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, Complex64)> + '_ {
        self.wavelengths_nm.iter().copied().zip(self.nk.iter().copied())
    }

    /// First and last grid wavelength, or `None` for an empty layer.
    pub fn wavelength_range(&self) -> Option<(f64, f64)> {
        Some((*self.wavelengths_nm.first()?, *self.wavelengths_nm.last()?))
    }
}
