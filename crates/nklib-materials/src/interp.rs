//! Piecewise-linear resampling of tabulated optical constants.
//!
//! Measured $(n, k)$ tables are sampled at irregular, material-specific
//! wavelengths. Layers need them on a uniform grid, so every dataset passes
//! through [`interpolate`] before it reaches a stack calculation.
//!
//! Real and imaginary parts are interpolated independently. Targets outside
//! the tabulated range take the nearest boundary value: there is no
//! extrapolation slope. Several materials rely on this to extend flatly
//! past their measured range.

use num_complex::Complex64;
use thiserror::Error;

/// Input-contract violations for the interpolator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpError {
    #[error("Known wavelengths ({wavelengths}) and values ({values}) differ in length")]
    ShapeMismatch { wavelengths: usize, values: usize },

    #[error("Interpolation requires at least one known point")]
    EmptyInput,
}

/// Where a target sits relative to the known abscissae.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Bracket {
    /// Exactly on (or clamped to) a known point.
    Node(usize),
    /// Strictly between `lo` and `lo + 1`, at fraction `t`.
    Between { lo: usize, t: f64 },
    /// Target is NaN.
    Undefined,
}

fn check_shape(wavelengths: usize, values: usize) -> Result<(), InterpError> {
    if wavelengths == 0 || values == 0 {
        return Err(InterpError::EmptyInput);
    }
    if wavelengths != values {
        return Err(InterpError::ShapeMismatch { wavelengths, values });
    }
    Ok(())
}

/// Locate `x` in the ascending slice `xs` (non-empty).
fn bracket(xs: &[f64], x: f64) -> Bracket {
    if x.is_nan() {
        return Bracket::Undefined;
    }
    let last = xs.len() - 1;
    if x <= xs[0] {
        return Bracket::Node(0);
    }
    if x >= xs[last] {
        return Bracket::Node(last);
    }

    // xs[0] < x < xs[last], so 1 <= idx <= last
    let idx = xs.partition_point(|&v| v < x);
    if xs[idx] == x {
        return Bracket::Node(idx);
    }
    let lo = idx - 1;
    let t = (x - xs[lo]) / (xs[idx] - xs[lo]);
    Bracket::Between { lo, t }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Resample complex refractive index data onto `targets`.
///
/// # Arguments
/// * `known_wavelengths` - Strictly increasing wavelengths (caller's responsibility).
/// * `known_nk` - Complex index at each known wavelength.
/// * `targets` - Wavelengths to evaluate at; may extend beyond the known range.
///
/// # Errors
/// [`InterpError::EmptyInput`] if either known slice is empty,
/// [`InterpError::ShapeMismatch`] if their lengths differ.
pub fn interpolate(
    known_wavelengths: &[f64],
    known_nk: &[Complex64],
    targets: &[f64],
) -> Result<Vec<Complex64>, InterpError> {
    check_shape(known_wavelengths.len(), known_nk.len())?;

    Ok(targets
        .iter()
        .map(|&x| match bracket(known_wavelengths, x) {
            Bracket::Node(i) => known_nk[i],
            Bracket::Between { lo, t } => {
                let a = known_nk[lo];
                let b = known_nk[lo + 1];
                Complex64::new(lerp(a.re, b.re, t), lerp(a.im, b.im, t))
            }
            Bracket::Undefined => Complex64::new(f64::NAN, f64::NAN),
        })
        .collect())
}

/// Real-valued counterpart of [`interpolate`], same contract.
///
/// Used to bring a single optical channel (typically $k$) onto another
/// channel's wavelength sampling before the two are combined.
pub fn interpolate_real(
    known_x: &[f64],
    known_y: &[f64],
    targets: &[f64],
) -> Result<Vec<f64>, InterpError> {
    check_shape(known_x.len(), known_y.len())?;

    Ok(targets
        .iter()
        .map(|&x| match bracket(known_x, x) {
            Bracket::Node(i) => known_y[i],
            Bracket::Between { lo, t } => lerp(known_y[lo], known_y[lo + 1], t),
            Bracket::Undefined => f64::NAN,
        })
        .collect())
}
