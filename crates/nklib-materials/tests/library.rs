//! Integration tests: data directory → library → layers.
//!
//! Coverage:
//! - Eager loading of every material and variant, fatal on bad data
//! - Unit scaling (µm → nm) and the n − ik sign convention
//! - BK7 k-channel alignment onto the n grid
//! - Canonical grid size, per-call overrides and validation
//! - Standard vs extended DLC datasets beyond the measured range
//! - Determinism, error isolation and concurrent construction
//! - Point queries agree with layer entries

mod common;

use approx::assert_abs_diff_eq;
use num_complex::Complex64;

use nklib_materials::grid::GridError;
use nklib_materials::raw::LoadError;
use nklib_materials::table::TableError;
use nklib_materials::{
    DlcDose, LayerRequest, Material, MaterialError, MaterialLibrary, MaterialProvider, Variant,
    WavelengthGrid,
};

fn load() -> (tempfile::TempDir, MaterialLibrary) {
    let dir = common::library_dir();
    let library = MaterialLibrary::load(dir.path()).unwrap();
    (dir, library)
}

/// Index of `wl` in the default grid.
fn default_index(wl: f64) -> usize {
    ((wl - 305.0) / 5.0) as usize
}

// ─────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────

#[test]
fn test_loads_every_material() {
    let (dir, library) = load();
    assert_eq!(library.data_dir(), dir.path());
    assert_eq!(library.materials().collect::<Vec<_>>(), Material::ALL.to_vec());

    for material in Material::ALL {
        assert!(library.sample(material, Variant::Standard).is_ok());
        assert_eq!(
            library.sample(material, Variant::Extended).is_ok(),
            material.supports_extended(),
            "{}",
            material
        );
    }
}

#[test]
fn test_micrometre_tables_scaled_to_nm() {
    let (_dir, library) = load();
    let ag = library.sample(Material::Ag, Variant::Standard).unwrap();
    let (lo, hi) = ag.wavelength_range();
    assert_abs_diff_eq!(lo, 200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(hi, 3000.0, epsilon = 1e-9);
    assert_eq!(ag.nk()[1], Complex64::new(0.1, -6.0));

    // DLC tables are already in nm
    let dlc = library.sample(Material::Dlc(DlcDose::W3), Variant::Extended).unwrap();
    assert_eq!(dlc.wavelength_range(), (300.0, 2600.0));
}

#[test]
fn test_bk7_k_resampled_onto_n_wavelengths() {
    let (_dir, library) = load();
    let bk7 = library.sample(Material::Bk7, Variant::Standard).unwrap();
    assert_eq!(bk7.len(), common::BK7_N.len());

    // k runs linearly from 2e-6 at 0.3 µm to 2.4e-5 at 2.5 µm
    let k_at = |wl_um: f64| 2.0e-6 + (wl_um - 0.3) / 2.2 * 2.2e-5;
    for (i, &(wl_um, n)) in common::BK7_N.iter().enumerate() {
        assert_abs_diff_eq!(bk7.nk()[i].re, n, epsilon = 1e-12);
        assert_abs_diff_eq!(-bk7.nk()[i].im, k_at(wl_um), epsilon = 1e-12);
    }
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = common::library_dir();
    std::fs::remove_file(dir.path().join("DLC60W_extended_nk.txt")).unwrap();

    match MaterialLibrary::load(dir.path()) {
        Err(MaterialError::Load {
            label,
            variant,
            source: LoadError::Table(TableError::FileNotFound { path }),
        }) => {
            assert_eq!(label, "DLC60W");
            assert_eq!(variant, Variant::Extended);
            assert!(path.ends_with("DLC60W_extended_nk.txt"));
        }
        other => panic!("expected FileNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_malformed_table_is_fatal() {
    let dir = common::library_dir();
    std::fs::write(dir.path().join("ITO_k_Konig.txt"), "Wavelength, µm\tk\n0.25 0.05\n1.0 n/a\n").unwrap();

    let err = MaterialLibrary::load(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        MaterialError::Load {
            source: LoadError::Table(TableError::MalformedTable { line: 3, .. }),
            ..
        }
    ));
    assert!(err.to_string().contains("ITO"), "{}", err);
}

#[test]
fn test_duplicate_wavelength_is_fatal() {
    let dir = common::library_dir();
    std::fs::write(
        dir.path().join("DLC10W_nk.txt"),
        "wl n k\n300 2.1 0.3\n550 2.1 0.2\n550 2.1 0.1\n",
    )
    .unwrap();

    let err = MaterialLibrary::load(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        MaterialError::Load {
            source: LoadError::Table(TableError::NonMonotonic { line: 4 }),
            ..
        }
    ));
}

// ─────────────────────────────────────────────────────────────
// Layer construction
// ─────────────────────────────────────────────────────────────

#[test]
fn test_default_grid_gives_459_points_for_every_material() {
    let (_dir, library) = load();
    for material in Material::ALL {
        let layer = library.build_layer(material, &LayerRequest::new(10.0)).unwrap();
        assert_eq!(layer.len(), 459, "{}", material);
        assert_eq!(layer.wavelengths_nm().len(), layer.nk().len());
        assert_eq!(layer.wavelength_range(), Some((305.0, 2595.0)));
        assert_eq!(layer.label(), material.label());
        assert_eq!(layer.unit(), "nm");
        assert_eq!(layer.thickness(), 10.0);
    }
}

#[test]
fn test_silver_values_on_grid() {
    let (_dir, library) = load();
    let layer = library.ag(&LayerRequest::new(40.0)).unwrap();

    // 305 nm lies between 200 nm and 1000 nm at t = 105/800
    let t = 105.0 / 800.0;
    let nk = layer.nk()[0];
    assert_abs_diff_eq!(nk.re, 0.2 - 0.1 * t, epsilon = 1e-12);
    assert_abs_diff_eq!(nk.im, -(1.0 + 5.0 * t), epsilon = 1e-12);

    // 1000 nm is a tabulated point
    assert_eq!(layer.nk()[default_index(1000.0)], Complex64::new(0.1, -6.0));
}

#[test]
fn test_grid_override_is_respected() {
    let (_dir, library) = load();
    let grid = WavelengthGrid::new(400.0, 410.0, 1.0).unwrap();
    let layer = library.al(&LayerRequest::new(100.0).with_grid(grid)).unwrap();

    assert_eq!(layer.len(), 10);
    assert_eq!(layer.wavelengths_nm()[0], 400.0);
    assert_eq!(layer.wavelengths_nm()[9], 409.0);

    // The defaults are unaffected by the override
    let default = library.al(&LayerRequest::new(100.0)).unwrap();
    assert_eq!(default.len(), 459);
}

#[test]
fn test_unit_and_thickness_carried_through() {
    let (_dir, library) = load();
    let layer = library.ito(&LayerRequest::new(0.25).with_unit("um")).unwrap();
    assert_eq!(layer.unit(), "um");
    assert_eq!(layer.thickness(), 0.25);
    assert_eq!(layer.label(), "ITO");
}

#[test]
fn test_construction_is_deterministic() {
    let (_dir, library) = load();
    let request = LayerRequest::new(75.0);
    for material in Material::ALL {
        let a = library.build_layer(material, &request).unwrap();
        let b = library.build_layer(material, &request).unwrap();
        assert_eq!(a.wavelengths_nm(), b.wavelengths_nm());
        for (x, y) in a.nk().iter().zip(b.nk()) {
            assert_eq!(x.re.to_bits(), y.re.to_bits());
            assert_eq!(x.im.to_bits(), y.im.to_bits());
        }
    }
}

#[test]
fn test_standard_dlc_holds_last_measured_value() {
    let (_dir, library) = load();
    let request = LayerRequest::new(120.0);
    let standard = library
        .dlc(DlcDose::W5, &request.clone().with_variant(Variant::Standard))
        .unwrap();
    let extended = library.dlc(DlcDose::W5, &request).unwrap();

    let n = common::dlc_n(5);
    let last_measured = Complex64::new(n, -0.1);

    for ((wl, std_nk), ext_nk) in standard.iter().zip(extended.nk()) {
        if wl <= 800.0 {
            // Identical inside the measured range
            assert_eq!(std_nk, *ext_nk, "at {} nm", wl);
        } else {
            assert_eq!(std_nk, last_measured, "standard at {} nm", wl);
            assert_ne!(*ext_nk, last_measured, "extended at {} nm", wl);
        }
    }

    // Extended follows its tabulated tail
    let at_1000 = extended.nk()[default_index(1000.0)];
    assert_abs_diff_eq!(at_1000.im, -(0.1 - 0.05 * 200.0 / 900.0), epsilon = 1e-12);
    let at_2595 = extended.nk()[458];
    assert_abs_diff_eq!(at_2595.im, -(0.05 - 0.03 * 895.0 / 900.0), epsilon = 1e-12);
}

#[test]
fn test_default_variant_is_extended_when_available() {
    let (_dir, library) = load();
    assert_eq!(
        library.resolve_variant(Material::Dlc(DlcDose::W20), None).unwrap(),
        Variant::Extended
    );
    assert_eq!(library.resolve_variant(Material::Bk7, None).unwrap(), Variant::Standard);
}

#[test]
fn test_extended_request_on_measured_only_material() {
    let (_dir, library) = load();
    let err = library
        .bk7(&LayerRequest::new(1.0e6).with_variant(Variant::Extended))
        .unwrap_err();
    assert!(matches!(
        err,
        MaterialError::VariantUnavailable {
            material: Material::Bk7,
            variant: Variant::Extended
        }
    ));

    let ok = library.bk7(&LayerRequest::new(1.0e6).with_variant(Variant::Standard));
    assert!(ok.is_ok());
}

#[test]
fn test_invalid_grid_rejected_and_library_still_usable() {
    let (_dir, library) = load();
    let mut request = LayerRequest::new(10.0);
    request.grid = WavelengthGrid {
        wl_min: 900.0,
        wl_max: 900.0,
        wl_step: 5.0,
    };
    let err = library.ag(&request).unwrap_err();
    assert!(matches!(
        err,
        MaterialError::Grid(GridError::InvalidGridParameters { .. })
    ));

    request.grid.wl_max = 1000.0;
    request.grid.wl_step = -5.0;
    assert!(library.ag(&request).is_err());

    request.grid.wl_step = 1e-300;
    assert!(matches!(
        library.ag(&request),
        Err(MaterialError::Grid(GridError::InvalidGridParameters {
            reason: "grid has too many points",
            ..
        }))
    ));

    let layer = library.ag(&LayerRequest::new(10.0)).unwrap();
    assert_eq!(layer.len(), 459);
}

#[test]
fn test_negative_thickness_rejected() {
    let (_dir, library) = load();
    let err = library.al(&LayerRequest::new(-5.0)).unwrap_err();
    assert!(matches!(err, MaterialError::Layer(_)));
}

#[test]
fn test_concurrent_construction_matches_serial() {
    let (_dir, library) = load();
    let request = LayerRequest::new(30.0);
    let serial: Vec<_> = Material::ALL
        .iter()
        .map(|&m| library.build_layer(m, &request).unwrap())
        .collect();

    let parallel: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = Material::ALL
            .iter()
            .map(|&m| {
                let library = &library;
                let request = &request;
                scope.spawn(move || library.build_layer(m, request).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(serial, parallel);
}

#[test]
fn test_layer_serialises_to_json() {
    let (_dir, library) = load();
    let grid = WavelengthGrid::new(500.0, 520.0, 10.0).unwrap();
    let layer = library.ito(&LayerRequest::new(150.0).with_grid(grid)).unwrap();

    let json = serde_json::to_value(&layer).unwrap();
    assert_eq!(json["label"], "ITO");
    assert_eq!(json["unit"], "nm");
    assert_eq!(json["wavelengths_nm"].as_array().map(|a| a.len()), Some(2));
}

// ─────────────────────────────────────────────────────────────
// Point queries
// ─────────────────────────────────────────────────────────────

#[test]
fn test_provider_agrees_with_layer() {
    let (_dir, library) = load();
    let layer = library.dlc(DlcDose::W40, &LayerRequest::new(50.0)).unwrap();
    let provider = library.provider(Material::Dlc(DlcDose::W40), None).unwrap();

    assert_eq!(provider.name(), "DLC40W");
    assert_eq!(provider.variant(), Variant::Extended);
    assert_eq!(provider.wavelength_range(), (300.0, 2600.0));

    for (wl, nk) in layer.iter().step_by(37) {
        assert_eq!(provider.refractive_index(wl).unwrap(), nk);
    }
}

#[test]
fn test_provider_dielectric_function() {
    let (_dir, library) = load();
    let provider = library.provider(Material::Ag, None).unwrap();

    // Tabulated point: ñ = 0.1 − 6i → ε = n² − k² − 2nki
    let eps = provider.dielectric_function(1000.0).unwrap();
    assert_abs_diff_eq!(eps.re, 0.01 - 36.0, epsilon = 1e-12);
    assert_abs_diff_eq!(eps.im, -1.2, epsilon = 1e-12);

    // Clamped beyond the tabulated range
    let far = provider.refractive_index(10_000.0).unwrap();
    assert_eq!(far, Complex64::new(1.0, -20.0));
}
