//! Material descriptors and the loaded material library.
//!
//! Every supported material is described by a [`MaterialDescriptor`]: its
//! label, where its standard dataset lives and, for the extrapolatable DLC
//! family, where the extended dataset lives. [`MaterialLibrary::load`]
//! reads all of them eagerly from one data directory; after that the
//! library is immutable and can be shared freely between threads.
//!
//! ## Available materials
//!
//! | Label | Files | Wavelength unit | Extended |
//! |-------|-------|-----------------|----------|
//! | `Ag` | `Ag_n.txt`, `Ag_k.txt` | µm | no |
//! | `Al` | `Al_n_Rakic1998.txt`, `Al_k_Rakic1998.txt` | µm | no |
//! | `BK7` | `BK7_n.txt`, `BK7_k.txt` (k resampled onto n) | µm | no |
//! | `ITO` | `ITO_n_Konig.txt`, `ITO_k_Konig.txt` | µm | no |
//! | `DLC{3,5,10,15,20,40,60}W` | `DLC{d}W_nk.txt`, `DLC{d}W_extended_nk.txt` | nm | yes |

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::provider::MaterialError;
use crate::raw::{load_source, DataSource, RawSample, WavelengthUnit};

/// Process labels of the diamond-like carbon family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DlcDose {
    W3,
    W5,
    W10,
    W15,
    W20,
    W40,
    W60,
}

impl DlcDose {
    pub const ALL: [DlcDose; 7] = [
        DlcDose::W3,
        DlcDose::W5,
        DlcDose::W10,
        DlcDose::W15,
        DlcDose::W20,
        DlcDose::W40,
        DlcDose::W60,
    ];

    pub fn watts(self) -> u32 {
        match self {
            DlcDose::W3 => 3,
            DlcDose::W5 => 5,
            DlcDose::W10 => 10,
            DlcDose::W15 => 15,
            DlcDose::W20 => 20,
            DlcDose::W40 => 40,
            DlcDose::W60 => 60,
        }
    }

    pub fn from_watts(watts: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.watts() == watts)
    }

    fn label(self) -> &'static str {
        match self {
            DlcDose::W3 => "DLC3W",
            DlcDose::W5 => "DLC5W",
            DlcDose::W10 => "DLC10W",
            DlcDose::W15 => "DLC15W",
            DlcDose::W20 => "DLC20W",
            DlcDose::W40 => "DLC40W",
            DlcDose::W60 => "DLC60W",
        }
    }

    /// `(standard, extended)` combined-table file names.
    fn files(self) -> (&'static str, &'static str) {
        match self {
            DlcDose::W3 => ("DLC3W_nk.txt", "DLC3W_extended_nk.txt"),
            DlcDose::W5 => ("DLC5W_nk.txt", "DLC5W_extended_nk.txt"),
            DlcDose::W10 => ("DLC10W_nk.txt", "DLC10W_extended_nk.txt"),
            DlcDose::W15 => ("DLC15W_nk.txt", "DLC15W_extended_nk.txt"),
            DlcDose::W20 => ("DLC20W_nk.txt", "DLC20W_extended_nk.txt"),
            DlcDose::W40 => ("DLC40W_nk.txt", "DLC40W_extended_nk.txt"),
            DlcDose::W60 => ("DLC60W_nk.txt", "DLC60W_extended_nk.txt"),
        }
    }
}

/// Material identities served by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Material {
    Ag,
    Al,
    Bk7,
    Ito,
    Dlc(DlcDose),
}

impl Material {
    pub const ALL: [Material; 11] = [
        Material::Ag,
        Material::Al,
        Material::Bk7,
        Material::Ito,
        Material::Dlc(DlcDose::W3),
        Material::Dlc(DlcDose::W5),
        Material::Dlc(DlcDose::W10),
        Material::Dlc(DlcDose::W15),
        Material::Dlc(DlcDose::W20),
        Material::Dlc(DlcDose::W40),
        Material::Dlc(DlcDose::W60),
    ];

    /// Fixed label carried by every layer of this material.
    pub fn label(self) -> &'static str {
        match self {
            Material::Ag => "Ag",
            Material::Al => "Al",
            Material::Bk7 => "BK7",
            Material::Ito => "ITO",
            Material::Dlc(dose) => dose.label(),
        }
    }

    pub fn description(self) -> String {
        match self {
            Material::Ag => "Silver".into(),
            Material::Al => "Aluminium (Rakić 1998)".into(),
            Material::Bk7 => "BK7 borosilicate glass".into(),
            Material::Ito => "Indium tin oxide (König)".into(),
            Material::Dlc(dose) => format!("Diamond-like carbon, {} W", dose.watts()),
        }
    }

    /// Where this material's data lives on disk.
    pub fn descriptor(self) -> MaterialDescriptor {
        let split = |n_file: &'static str, k_file: &'static str, align_k: bool| DataSource::SplitNk {
            n_file,
            k_file,
            unit: WavelengthUnit::Micrometre,
            align_k,
        };

        let (standard, extended) = match self {
            Material::Ag => (split("Ag_n.txt", "Ag_k.txt", false), None),
            Material::Al => (split("Al_n_Rakic1998.txt", "Al_k_Rakic1998.txt", false), None),
            // BK7's k table is sampled on a coarser grid than its n table
            Material::Bk7 => (split("BK7_n.txt", "BK7_k.txt", true), None),
            Material::Ito => (split("ITO_n_Konig.txt", "ITO_k_Konig.txt", false), None),
            Material::Dlc(dose) => {
                let (std_file, ext_file) = dose.files();
                (
                    DataSource::Combined {
                        file: std_file,
                        unit: WavelengthUnit::Nanometre,
                    },
                    Some(DataSource::Combined {
                        file: ext_file,
                        unit: WavelengthUnit::Nanometre,
                    }),
                )
            }
        };

        MaterialDescriptor {
            material: self,
            label: self.label(),
            standard,
            extended,
        }
    }

    pub fn supports_extended(self) -> bool {
        matches!(self, Material::Dlc(_))
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Material {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Material::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MaterialError::UnknownMaterial(s.to_string()))
    }
}

/// Which dataset of a material to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Measured range only.
    Standard,
    /// Measured range plus the extrapolated tail.
    Extended,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Standard => f.pad("standard"),
            Variant::Extended => f.pad("extended"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Variant::Standard),
            "extended" => Ok(Variant::Extended),
            other => Err(format!(
                "unknown variant '{}', expected 'standard' or 'extended'",
                other
            )),
        }
    }
}

/// Static description of one material's backing data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialDescriptor {
    pub material: Material,
    pub label: &'static str,
    pub standard: DataSource,
    pub extended: Option<DataSource>,
}

impl MaterialDescriptor {
    pub fn source(&self, variant: Variant) -> Option<&DataSource> {
        match variant {
            Variant::Standard => Some(&self.standard),
            Variant::Extended => self.extended.as_ref(),
        }
    }
}

#[derive(Debug, Clone)]
struct MaterialData {
    standard: RawSample,
    extended: Option<RawSample>,
}

/// All raw samples, loaded once from a data directory.
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    data_dir: PathBuf,
    samples: BTreeMap<Material, MaterialData>,
}

impl MaterialLibrary {
    /// Load every material's datasets from `dir`.
    ///
    /// Any missing or malformed file is fatal: the library is only returned
    /// once every dataset has loaded.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, MaterialError> {
        let data_dir = dir.as_ref().to_path_buf();
        if !data_dir.is_dir() {
            return Err(MaterialError::DataDirMissing(data_dir));
        }

        let mut samples = BTreeMap::new();
        for material in Material::ALL {
            let descriptor = material.descriptor();
            let standard = load_labelled(&data_dir, &descriptor, Variant::Standard, &descriptor.standard)?;
            let extended = match &descriptor.extended {
                Some(source) => Some(load_labelled(&data_dir, &descriptor, Variant::Extended, source)?),
                None => None,
            };
            samples.insert(material, MaterialData { standard, extended });
        }

        let datasets: usize = samples
            .values()
            .map(|d| 1 + usize::from(d.extended.is_some()))
            .sum();
        log::info!(
            "Loaded {} materials ({} datasets) from {}",
            samples.len(),
            datasets,
            data_dir.display()
        );

        Ok(Self { data_dir, samples })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Materials in the library, in [`Material::ALL`] order.
    pub fn materials(&self) -> impl Iterator<Item = Material> + '_ {
        self.samples.keys().copied()
    }

    /// Raw sample for `material` and `variant`.
    pub fn sample(&self, material: Material, variant: Variant) -> Result<&RawSample, MaterialError> {
        let data = self
            .samples
            .get(&material)
            .ok_or_else(|| MaterialError::UnknownMaterial(material.label().to_string()))?;
        match variant {
            Variant::Standard => Ok(&data.standard),
            Variant::Extended => data
                .extended
                .as_ref()
                .ok_or(MaterialError::VariantUnavailable { material, variant }),
        }
    }

    /// Resolve an optional variant request.
    ///
    /// `None` picks the extended dataset when the material has one and the
    /// standard dataset otherwise.
    pub fn resolve_variant(
        &self,
        material: Material,
        requested: Option<Variant>,
    ) -> Result<Variant, MaterialError> {
        let has_extended = self.sample(material, Variant::Extended).is_ok();
        match requested {
            Some(variant) => {
                self.sample(material, variant)?;
                Ok(variant)
            }
            None if has_extended => Ok(Variant::Extended),
            None => Ok(Variant::Standard),
        }
    }
}

fn load_labelled(
    dir: &Path,
    descriptor: &MaterialDescriptor,
    variant: Variant,
    source: &DataSource,
) -> Result<RawSample, MaterialError> {
    let sample = load_source(dir, source).map_err(|source| MaterialError::Load {
        label: descriptor.label.to_string(),
        variant,
        source,
    })?;
    let (lo, hi) = sample.wavelength_range();
    log::debug!(
        "{} ({}): {} points, {:.1}–{:.1} nm",
        descriptor.label,
        variant,
        sample.len(),
        lo,
        hi
    );
    Ok(sample)
}

static LIBRARY: OnceLock<MaterialLibrary> = OnceLock::new();

/// Load the process-wide library from `dir`.
///
/// May succeed only once per process. Call it during setup, before any
/// thread asks for [`library`].
pub fn init(dir: impl AsRef<Path>) -> Result<&'static MaterialLibrary, MaterialError> {
    if let Some(existing) = LIBRARY.get() {
        return Err(MaterialError::AlreadyInitialised(existing.data_dir.clone()));
    }
    let loaded = MaterialLibrary::load(dir)?;
    LIBRARY
        .set(loaded)
        .map_err(|lost| MaterialError::AlreadyInitialised(lost.data_dir))?;
    library()
}

/// The process-wide library, once [`init`] has succeeded.
pub fn library() -> Result<&'static MaterialLibrary, MaterialError> {
    LIBRARY.get().ok_or(MaterialError::NotInitialised)
}
