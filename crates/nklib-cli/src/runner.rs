//! Job runner: ties together the material library, the grid and output files.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use nklib_materials::{Layer, LayerRequest, Material, MaterialLibrary};

use crate::config::JobConfig;

/// Build every layer of a job, in file order.
pub fn build_stack(job: &JobConfig, library: &MaterialLibrary) -> Result<Vec<Layer>> {
    let grid = job.grid.to_grid()?;
    println!(
        "Grid: {}–{} nm, step {} nm ({} points)",
        grid.wl_min,
        grid.wl_max,
        grid.wl_step,
        grid.len()
    );

    let mut layers = Vec::with_capacity(job.layers.len());
    for (i, entry) in job.layers.iter().enumerate() {
        let material: Material = entry
            .material
            .parse()
            .with_context(|| format!("Layer {}", i + 1))?;

        let mut request = LayerRequest::new(entry.thickness)
            .with_grid(grid)
            .with_unit(job.unit.clone());
        request.variant = entry.variant;

        let layer = library
            .build_layer(material, &request)
            .with_context(|| format!("Layer {} ({})", i + 1, material))?;

        println!(
            "  [{}/{}] {}: {} {}",
            i + 1,
            job.layers.len(),
            layer.label(),
            layer.thickness(),
            layer.unit()
        );
        layers.push(layer);
    }
    Ok(layers)
}

/// Output file name for the `index`-th layer (zero-based).
pub fn layer_file_name(index: usize, layer: &Layer) -> String {
    format!("{:02}_{}.csv", index + 1, layer.label())
}

/// Write a layer as CSV with a metadata header.
///
/// `k` is written as a positive absorption coefficient.
pub fn write_layer_csv(layer: &Layer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;

    writeln!(file, "# nklib — {} optical constants", layer.label())?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# thickness: {} {}", layer.thickness(), layer.unit())?;
    writeln!(file, "#")?;
    writeln!(file, "wavelength_nm,n,k")?;

    for (wl, nk) in layer.iter() {
        let k = if nk.im == 0.0 { 0.0 } else { -nk.im };
        writeln!(file, "{:.2},{:.6e},{:.6e}", wl, nk.re, k)?;
    }

    log::info!("Layer {} written to {}", layer.label(), path.display());
    Ok(())
}

/// Write layers to a JSON file.
pub fn write_layers_json(layers: &[Layer], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(layers)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    std::fs::write(path, json)?;

    log::info!("{} layers (JSON) written to {}", layers.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn sample_layer() -> Layer {
        Layer::new(
            vec![400.0, 405.0],
            vec![Complex64::new(1.5, -0.25), Complex64::new(1.25, 0.0)],
            120.0,
            "DLC5W",
            "nm",
        )
        .unwrap()
    }

    #[test]
    fn test_layer_file_name() {
        assert_eq!(layer_file_name(0, &sample_layer()), "01_DLC5W.csv");
        assert_eq!(layer_file_name(11, &sample_layer()), "12_DLC5W.csv");
    }

    #[test]
    fn test_csv_reports_positive_k() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("layer.csv");
        write_layer_csv(&sample_layer(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let data: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(data[0], "wavelength_nm,n,k");
        assert_eq!(data[1], "400.00,1.500000e0,2.500000e-1");
        assert_eq!(data[2], "405.00,1.250000e0,0.000000e0");
        assert!(content.contains("# thickness: 120 nm"));
    }

    #[test]
    fn test_json_contains_every_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.json");
        write_layers_json(&[sample_layer(), sample_layer()], &path).unwrap();

        let parsed: Vec<Layer> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], sample_layer());
    }
}
