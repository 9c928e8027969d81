//! Error types for the raster crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while mosaicking or reprojecting tiles.
#[derive(Debug, Error)]
pub enum RasterError {
    /// I/O error on the working or output tree.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by GDAL through the safe bindings.
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    /// File pattern is not a valid glob.
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// A globbed path could not be read.
    #[error("Cannot read matched path: {0}")]
    Glob(#[from] glob::GlobError),

    /// A directory could not be walked while copying.
    #[error("Cannot walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Directory is not laid out as `<root>/<year>/<doy>`.
    #[error("Invalid day directory: {0}")]
    InvalidDayDirectory(PathBuf),

    /// The output directory would be removed along with the working tree.
    #[error("Output directory {output} lies inside working root {root}")]
    OutputInsideWorkingRoot {
        /// Requested output directory.
        output: PathBuf,
        /// Working root scheduled for removal.
        root: PathBuf,
    },

    /// EPSG code is unknown to the projection database.
    #[error("Invalid EPSG code {epsg}: {reason}")]
    InvalidEpsg {
        /// Requested code.
        epsg: u32,
        /// Message from the projection library.
        reason: String,
    },

    /// The GDAL warper reported a failure.
    #[error("Warp failed during {stage}: {message}")]
    WarpFailed {
        /// Step of the warp that failed.
        stage: &'static str,
        /// Last GDAL error message.
        message: String,
    },

    /// Raster has a pixel type the pipeline cannot copy.
    #[error("Unsupported raster data type: {0}")]
    UnsupportedDataType(String),

    /// Raster has no bands.
    #[error("Raster has no bands: {0}")]
    NoBands(PathBuf),
}
