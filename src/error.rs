#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the sprite pipeline."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Only configuration problems and artifact writes surface as errors to the
//! build driver. SVG read failures are reported through [`Error::SvgIo`] so the
//! pipeline can log them uniformly, but they never abort a build.

use std::path::{Path, PathBuf};

/// Unified error type returned by the configuration loader, build driver and
/// CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading configuration files.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when the configuration violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps JSON errors raised while encoding or decoding the manifest.
    #[error("invalid manifest JSON: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while writing sprite or manifest artifacts.
    #[error("failed to write artifact at {path:?}: {source}")]
    ArtifactIo {
        /// Location of the artifact being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Wraps I/O errors that occur while reading SVG source files.
    #[error("failed to read SVG at {path:?}: {source}")]
    SvgIo {
        /// Location of the SVG file being processed.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Returned when a persisted manifest cannot be decoded.
    #[error("failed to load manifest from {path:?}: {message}")]
    Manifest {
        /// Location of the manifest file.
        path:    PathBuf,
        /// Human readable description of the decode failure.
        message: String
    },
    /// Wraps failures reported by the file-system watcher.
    #[error("watch error: {source}")]
    Watch {
        /// Underlying watcher error.
        source: notify::Error
    },
    /// Returned when the interrupt handler for watch mode cannot be installed.
    #[error("failed to install interrupt handler: {source}")]
    Signal {
        /// Underlying handler registration error.
        source: ctrlc::Error
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<notify::Error> for Error {
    fn from(source: notify::Error) -> Self {
        Self::Watch {
            source
        }
    }
}

impl From<ctrlc::Error> for Error {
    fn from(source: ctrlc::Error) -> Self {
        Self::Signal {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the configuration file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ArtifactIo`] variant capturing the failing path and
/// source.
///
/// # Parameters
///
/// * `path` - Location of the artifact that could not be written.
/// * `source` - I/O error reported by the operating system.
pub fn artifact_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ArtifactIo {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::SvgIo`] variant capturing the failing path and source.
pub fn svg_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::SvgIo {
        path: path.to_path_buf(),
        source
    }
}
