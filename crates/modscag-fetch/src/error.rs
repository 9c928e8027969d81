//! Error types for the fetch crate.

use thiserror::Error;

/// Errors that can occur while planning MODIS tile downloads.
#[derive(Debug, Error)]
pub enum FetchError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credentials file is not valid JSON.
    #[error("Invalid credentials JSON: {0}")]
    CredentialsJson(#[from] serde_json::Error),

    /// Credentials file parsed but is not a JSON object.
    #[error("Credentials file must contain a JSON object")]
    CredentialsNotObject,

    /// HTTP request error when querying the archive.
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The archive answered with a non-success status.
    #[error("Archive listing {url} returned HTTP {status}")]
    ListingFailed {
        /// URL that was requested.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Product name is not in the registry.
    #[error("Unknown product type: {0}")]
    UnknownProduct(String),

    /// Tile identifier does not have the `hNNvMM` form.
    #[error("Invalid tile identifier: {0}")]
    InvalidTileId(String),

    /// Coordinate cannot be placed on the sinusoidal grid.
    #[error("Coordinate ({lat}, {lon}) is outside the sinusoidal grid")]
    OutOfGrid {
        /// Requested latitude.
        lat: f64,
        /// Requested longitude.
        lon: f64,
    },

    /// Start date is after end date.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// First requested day.
        start: chrono::NaiveDate,
        /// Last requested day.
        end: chrono::NaiveDate,
    },
}
