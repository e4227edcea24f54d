//! Parser for whitespace-delimited numeric tables.
//!
//! Raw optical constants are stored as plain text with a single header
//! line followed by numeric rows:
//! ```text
//! Wavelength, µm	n
//! 0.1879	1.07
//! 0.1916	1.1
//! ...
//! ```
//!
//! The first column is always the wavelength and must be strictly
//! increasing. Blank lines are ignored.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors while reading or parsing a numeric table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table at line {line}: {message}")]
    MalformedTable { line: usize, message: String },

    #[error("Wavelength column is not strictly increasing at line {line}")]
    NonMonotonic { line: usize },
}

/// A parsed table: one row per data line, `columns` values per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: usize,
    rows: Vec<Vec<f64>>,
}

impl Table {
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of column `index`, top to bottom.
    ///
    /// # Panics
    /// Panics if `index >= self.columns()`.
    pub fn column(&self, index: usize) -> Vec<f64> {
        assert!(index < self.columns, "column {} out of range", index);
        self.rows.iter().map(|row| row[index]).collect()
    }
}

/// Parse a table with exactly `columns` numeric fields per row.
///
/// The first line is a header and is skipped unconditionally.
pub fn parse_table(content: &str, columns: usize) -> Result<Table, TableError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut previous_wl: Option<f64> = None;

    // Line 1 is the header (ignored)
    for (idx, line) in content.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != columns {
            return Err(TableError::MalformedTable {
                line: line_no,
                message: format!("Expected {} columns, got {}: '{}'", columns, fields.len(), line),
            });
        }

        let mut row = Vec::with_capacity(columns);
        for field in fields {
            let value: f64 = field.parse().map_err(|_| TableError::MalformedTable {
                line: line_no,
                message: format!("Invalid number: {}", field),
            })?;
            if !value.is_finite() {
                return Err(TableError::MalformedTable {
                    line: line_no,
                    message: format!("Non-finite value: {}", field),
                });
            }
            row.push(value);
        }

        let wl = row[0];
        if let Some(prev) = previous_wl {
            if wl <= prev {
                return Err(TableError::NonMonotonic { line: line_no });
            }
        }
        previous_wl = Some(wl);
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(TableError::MalformedTable {
            line: 1,
            message: "Table contains no data rows".into(),
        });
    }

    Ok(Table { columns, rows })
}

/// Read and parse a table file.
pub fn read_table(path: &Path, columns: usize) -> Result<Table, TableError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TableError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => TableError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    parse_table(&content, columns)
}
