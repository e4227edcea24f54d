//! # nklib Materials
//!
//! Optical constants for thin-film simulations. Measured $(n, k)$ tables
//! are loaded once from a data directory, then resampled per request onto
//! a uniform wavelength grid and packaged as immutable [`Layer`]s for a
//! multilayer stack calculation.
//!
//! ```no_run
//! use nklib_materials::{DlcDose, LayerRequest, MaterialLibrary, Variant};
//!
//! let library = MaterialLibrary::load("nklib data")?;
//! let silver = library.ag(&LayerRequest::new(40.0))?;
//! let dlc = library.dlc(DlcDose::W5, &LayerRequest::new(120.0).with_variant(Variant::Standard))?;
//! assert_eq!(silver.len(), dlc.len());
//! # Ok::<(), nklib_materials::MaterialError>(())
//! ```
//!
//! ## Modules
//!
//! - [`interp`] — Clamped piecewise-linear resampling.
//! - [`table`] — Numeric text table parser.
//! - [`raw`] — Raw samples and the on-disk loader.
//! - [`registry`] — Material descriptors and the loaded library.
//! - [`grid`] — Canonical wavelength grid.
//! - [`layer`] — The layer handed to stack simulations.
//! - [`factory`] — Layer construction.
//! - [`provider`] — Single-wavelength queries and the library error type.
//!
//! ## Sign convention
//!
//! The complex index is stored as $\tilde{n} = n - ik$ with $k \ge 0$ for
//! absorbing media.

pub mod factory;
pub mod grid;
pub mod interp;
pub mod layer;
pub mod provider;
pub mod raw;
pub mod registry;
pub mod table;

pub use factory::LayerRequest;
pub use grid::{WavelengthGrid, DEFAULT_WL_MAX, DEFAULT_WL_MIN, DEFAULT_WL_STEP, MAX_GRID_POINTS};
pub use layer::Layer;
pub use provider::{MaterialError, MaterialProvider, TabulatedMaterial};
pub use registry::{init, library, DlcDose, Material, MaterialLibrary, Variant};
