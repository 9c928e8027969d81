//! Error types for the runner.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Download planning failed.
    #[error(transparent)]
    Fetch(#[from] modscag_fetch::FetchError),

    /// Mosaicking or reprojection failed.
    #[error(transparent)]
    Raster(#[from] modscag_raster::RasterError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline configuration file could not be parsed.
    #[error("Invalid config file {path}: {source}")]
    Config {
        /// Config file path.
        path: PathBuf,
        /// Parse error.
        source: serde_yaml::Error,
    },

    /// Neither tile bounds nor a region were given.
    #[error("No tiles selected: give tile bounds or a lat/lon region")]
    NoTileSelection,

    /// Logging could not be initialized.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type for runner operations.
pub type RunnerResult<T> = Result<T, RunnerError>;
