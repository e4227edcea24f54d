//! Layer construction: raw sample → canonical grid → [`Layer`].
//!
//! One parameterised entry point, [`MaterialLibrary::build_layer`], serves
//! every material. The named helpers ([`MaterialLibrary::ag`] and friends)
//! are thin wrappers that fix the material.

use crate::grid::WavelengthGrid;
use crate::interp::interpolate;
use crate::layer::Layer;
use crate::provider::MaterialError;
use crate::registry::{DlcDose, Material, MaterialLibrary, Variant};

/// Parameters for building one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRequest {
    /// Slab thickness in `unit`.
    pub thickness: f64,
    pub grid: WavelengthGrid,
    /// Length unit of `thickness` (default "nm").
    pub unit: String,
    /// `None` selects the extended dataset when the material has one.
    pub variant: Option<Variant>,
}

impl LayerRequest {
    /// Request with the default grid, unit "nm" and preferred variant.
    pub fn new(thickness: f64) -> Self {
        Self {
            thickness,
            grid: WavelengthGrid::default(),
            unit: "nm".into(),
            variant: None,
        }
    }

    pub fn with_grid(mut self, grid: WavelengthGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }
}

impl MaterialLibrary {
    /// Build a layer of `material` resampled onto `request.grid`.
    ///
    /// Pure with respect to the library: identical requests give identical
    /// layers, and a failed request leaves the library untouched.
    pub fn build_layer(&self, material: Material, request: &LayerRequest) -> Result<Layer, MaterialError> {
        let wavelengths = request.grid.wavelengths()?;
        let variant = self.resolve_variant(material, request.variant)?;
        let sample = self.sample(material, variant)?;

        let nk = interpolate(sample.wavelengths_nm(), sample.nk(), &wavelengths)?;
        let layer = Layer::new(wavelengths, nk, request.thickness, material.label(), request.unit.clone())?;

        log::debug!(
            "Built {} layer ({}): {} points, thickness {} {}",
            material,
            variant,
            layer.len(),
            layer.thickness(),
            layer.unit()
        );
        Ok(layer)
    }

    /// Silver.
    pub fn ag(&self, request: &LayerRequest) -> Result<Layer, MaterialError> {
        self.build_layer(Material::Ag, request)
    }

    /// Aluminium.
    pub fn al(&self, request: &LayerRequest) -> Result<Layer, MaterialError> {
        self.build_layer(Material::Al, request)
    }

    /// BK7 glass.
    pub fn bk7(&self, request: &LayerRequest) -> Result<Layer, MaterialError> {
        self.build_layer(Material::Bk7, request)
    }

    /// Indium tin oxide.
    pub fn ito(&self, request: &LayerRequest) -> Result<Layer, MaterialError> {
        self.build_layer(Material::Ito, request)
    }

    /// Diamond-like carbon. Beyond ~800 nm the extended dataset carries an
    /// exponential extrapolation of the measured curve; request
    /// [`Variant::Standard`] to hold the last measured value instead.
    pub fn dlc(&self, dose: DlcDose, request: &LayerRequest) -> Result<Layer, MaterialError> {
        self.build_layer(Material::Dlc(dose), request)
    }
}
