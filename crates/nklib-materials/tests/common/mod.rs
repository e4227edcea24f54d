//! Fixture data directory covering every material in the library.
//!
//! Values are synthetic and piecewise linear so expected interpolations can
//! be worked out by hand.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::Path;

use tempfile::TempDir;

/// (wavelength µm, n, k)
pub const AG: &[(f64, f64, f64)] = &[(0.2, 0.2, 1.0), (1.0, 0.1, 6.0), (3.0, 1.0, 20.0)];
pub const AL: &[(f64, f64, f64)] = &[(0.2, 0.1, 2.0), (0.8, 2.8, 8.5), (2.8, 5.0, 28.0)];
pub const ITO: &[(f64, f64, f64)] = &[(0.25, 2.2, 0.05), (1.0, 1.7, 0.01), (2.6, 0.6, 0.9)];

/// BK7 n table (µm, n) and a coarser k table (µm, k).
pub const BK7_N: &[(f64, f64)] = &[(0.3, 1.55), (0.5, 1.52), (1.0, 1.51), (2.5, 1.49)];
pub const BK7_K: &[(f64, f64)] = &[(0.3, 2.0e-6), (2.5, 2.4e-5)];

/// DLC measured range (nm): k falls linearly to 0.1 at 800 nm.
pub const DLC_STANDARD_K: &[(f64, f64)] = &[(300.0, 0.3), (550.0, 0.2), (800.0, 0.1)];
/// Extrapolated tail appended to the extended tables.
pub const DLC_EXTENDED_TAIL_K: &[(f64, f64)] = &[(1700.0, 0.05), (2600.0, 0.02)];

pub const DOSES: [u32; 7] = [3, 5, 10, 15, 20, 40, 60];

pub fn dlc_n(watts: u32) -> f64 {
    2.0 + watts as f64 / 100.0
}

fn two_column(header: &str, rows: impl Iterator<Item = (f64, f64)>) -> String {
    let mut s = format!("{}\n", header);
    for (wl, v) in rows {
        let _ = writeln!(s, "{}\t{}", wl, v);
    }
    s
}

fn write_split(dir: &Path, n_file: &str, k_file: &str, rows: &[(f64, f64, f64)]) {
    let n = two_column("Wavelength, µm\tn", rows.iter().map(|&(wl, n, _)| (wl, n)));
    let k = two_column("Wavelength, µm\tk", rows.iter().map(|&(wl, _, k)| (wl, k)));
    std::fs::write(dir.join(n_file), n).unwrap();
    std::fs::write(dir.join(k_file), k).unwrap();
}

fn write_dlc(dir: &Path, watts: u32) {
    let n = dlc_n(watts);
    let mut standard = String::from("Wavelength(nm) n k\n");
    for &(wl, k) in DLC_STANDARD_K {
        let _ = writeln!(standard, "{} {} {}", wl, n, k);
    }
    let mut extended = standard.clone();
    for &(wl, k) in DLC_EXTENDED_TAIL_K {
        let _ = writeln!(extended, "{} {} {}", wl, n, k);
    }
    std::fs::write(dir.join(format!("DLC{}W_nk.txt", watts)), standard).unwrap();
    std::fs::write(dir.join(format!("DLC{}W_extended_nk.txt", watts)), extended).unwrap();
}

/// Write a complete data directory into `dir`.
pub fn write_library(dir: &Path) {
    write_split(dir, "Ag_n.txt", "Ag_k.txt", AG);
    write_split(dir, "Al_n_Rakic1998.txt", "Al_k_Rakic1998.txt", AL);
    write_split(dir, "ITO_n_Konig.txt", "ITO_k_Konig.txt", ITO);

    std::fs::write(
        dir.join("BK7_n.txt"),
        two_column("Wavelength, µm\tn", BK7_N.iter().copied()),
    )
    .unwrap();
    std::fs::write(
        dir.join("BK7_k.txt"),
        two_column("Wavelength, µm\tk", BK7_K.iter().copied()),
    )
    .unwrap();

    for watts in DOSES {
        write_dlc(dir, watts);
    }
}

/// A fresh temporary data directory with every table present.
pub fn library_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_library(dir.path());
    dir
}
