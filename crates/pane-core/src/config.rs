#![forbid(unsafe_code)]

//! Host surface dimensions.
//!
//! A [`SurfaceConfig`] states how wide the host's grid is and how many rows
//! an interface may ask for. Interface definitions are validated against it
//! when they are built.
//!
//! # Loading
//!
//! ```toml
//! # surface.toml
//! columns = 9
//! min_rows = 1
//! max_rows = 6
//! ```
//!
//! ```rust,ignore
//! let surface = SurfaceConfig::from_toml_file("surface.toml")?;
//! ```
//!
//! Every field has a default, so a partial file only overrides what it names.

#[cfg(any(feature = "config-file", test))]
use std::path::Path;

#[cfg(any(feature = "config-file", test))]
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Legal dimensions of the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(feature = "config-file", test), derive(Serialize, Deserialize))]
#[cfg_attr(any(feature = "config-file", test), serde(default))]
pub struct SurfaceConfig {
    /// Width of every pane, in slots.
    pub columns: u16,
    /// Smallest legal row count.
    pub min_rows: u16,
    /// Largest legal row count.
    pub max_rows: u16,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            columns: 9,
            min_rows: 1,
            max_rows: 6,
        }
    }
}

impl SurfaceConfig {
    /// Validate the configuration itself.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.columns == 0 {
            errors.push("columns must be at least 1".to_string());
        }
        if self.min_rows == 0 {
            errors.push("min_rows must be at least 1".to_string());
        }
        if self.min_rows > self.max_rows {
            errors.push(format!(
                "min_rows ({}) exceeds max_rows ({})",
                self.min_rows, self.max_rows
            ));
        }
        errors
    }

    /// Check that `rows` is legal on this surface.
    pub fn check_rows(&self, rows: u16) -> Result<(), ConfigurationError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(ConfigurationError::InvalidSurface(errors));
        }
        if rows < self.min_rows || rows > self.max_rows {
            return Err(ConfigurationError::RowsOutOfRange {
                rows,
                min: self.min_rows,
                max: self.max_rows,
            });
        }
        Ok(())
    }

    /// Load from a TOML string and validate.
    #[cfg(any(feature = "config-file", test))]
    pub fn from_toml_str(s: &str) -> Result<Self, SurfaceConfigError> {
        let config: Self = toml::from_str(s).map_err(SurfaceConfigError::Toml)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(SurfaceConfigError::Validation(errors))
        }
    }

    /// Load from a TOML file on disk and validate.
    #[cfg(any(feature = "config-file", test))]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SurfaceConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(SurfaceConfigError::Io)?;
        Self::from_toml_str(&content)
    }
}

/// Errors that can occur when loading a surface configuration.
#[derive(Debug)]
pub enum SurfaceConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(any(feature = "config-file", test))]
    Toml(toml::de::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for SurfaceConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(any(feature = "config-file", test))]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SurfaceConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(any(feature = "config-file", test))]
            Self::Toml(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
