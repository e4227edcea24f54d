//! Canonical wavelength grid shared by all layers of a simulation.
//!
//! Every material is resampled onto the same uniform grid so layers can be
//! stacked point-for-point. The process-wide defaults cover 305–2600 nm in
//! 5 nm steps; callers override them per request without touching the
//! constants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default lower bound (nm, inclusive).
pub const DEFAULT_WL_MIN: f64 = 305.0;
/// Default upper bound (nm, exclusive).
pub const DEFAULT_WL_MAX: f64 = 2600.0;
/// Default spacing (nm).
pub const DEFAULT_WL_STEP: f64 = 5.0;
/// Largest grid [`WavelengthGrid::validate`] accepts.
pub const MAX_GRID_POINTS: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("Invalid grid parameters: wl_min={wl_min}, wl_max={wl_max}, wl_step={wl_step} ({reason})")]
    InvalidGridParameters {
        wl_min: f64,
        wl_max: f64,
        wl_step: f64,
        reason: &'static str,
    },
}

/// Half-open uniform grid $[\lambda_{min}, \lambda_{max})$ in nm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavelengthGrid {
    pub wl_min: f64,
    pub wl_max: f64,
    pub wl_step: f64,
}

impl Default for WavelengthGrid {
    fn default() -> Self {
        Self {
            wl_min: DEFAULT_WL_MIN,
            wl_max: DEFAULT_WL_MAX,
            wl_step: DEFAULT_WL_STEP,
        }
    }
}

impl WavelengthGrid {
    /// Construct and validate a grid.
    pub fn new(wl_min: f64, wl_max: f64, wl_step: f64) -> Result<Self, GridError> {
        let grid = Self {
            wl_min,
            wl_max,
            wl_step,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Check the bounds are finite, ordered, the step positive and the
    /// point count at most [`MAX_GRID_POINTS`].
    pub fn validate(&self) -> Result<(), GridError> {
        let reason = if !(self.wl_min.is_finite() && self.wl_max.is_finite() && self.wl_step.is_finite()) {
            Some("bounds and step must be finite")
        } else if self.wl_min >= self.wl_max {
            Some("wl_min must be less than wl_max")
        } else if self.wl_step <= 0.0 {
            Some("wl_step must be positive")
        } else if self.point_count() > MAX_GRID_POINTS as f64 {
            Some("grid has too many points")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(GridError::InvalidGridParameters {
                wl_min: self.wl_min,
                wl_max: self.wl_max,
                wl_step: self.wl_step,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Number of points: $\lceil (\lambda_{max} - \lambda_{min}) / \Delta\lambda \rceil$.
    ///
    /// Only meaningful for a validated grid; returns 0 otherwise.
    pub fn len(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        self.point_count() as usize
    }

    fn point_count(&self) -> f64 {
        ((self.wl_max - self.wl_min) / self.wl_step).ceil()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid wavelengths $\lambda_i = \lambda_{min} + i\,\Delta\lambda$.
    pub fn wavelengths(&self) -> Result<Vec<f64>, GridError> {
        self.validate()?;
        Ok((0..self.len())
            .map(|i| self.wl_min + i as f64 * self.wl_step)
            .collect())
    }
}
