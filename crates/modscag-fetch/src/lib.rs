//! # modscag-fetch
//!
//! Download planning for MODIS snow-cover tiles from the JPL snow-data archive.
//!
//! This crate provides:
//! - Enumeration of MODIS sinusoidal grid tiles (`hNNvMM`) for a region
//! - Descriptors of the archived products (`modscag`, `moddrfs`)
//! - Lookup of which days-of-year the archive has published
//! - Generation of the per-tile, per-day download list
//!
//! Fetching the listed files is left to an external downloader; the list is
//! written as a tab-separated manifest.
//!
//! ## Overview
//!
//! The archive is organised as `<product>-historic/<year>/<doy>/`, each day
//! directory holding one GeoTIFF per tile and variable, named like
//! `MOD09GA.A2001001.h24v05.005.2008324165405.snow_fraction.tif`.
//!
//! ## Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use modscag_fetch::{make_filepaths, Credentials, HttpDoyLookup, Product, TileRange};
//!
//! let credentials = Credentials::from_file("credentials.json")?;
//! let lookup = HttpDoyLookup::with_credentials(&credentials)?;
//!
//! let tiles = TileRange::new(23, 26, 4, 6).tiles();
//! let records = make_filepaths(
//!     NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2001, 1, 31).unwrap(),
//!     &[Product::lookup("modscag")?],
//!     &tiles,
//!     "*snow_fraction.tif",
//!     &lookup,
//! )?;
//! println!("{} files to download", records.len());
//! # Ok::<(), modscag_fetch::FetchError>(())
//! ```

mod availability;
mod credentials;
mod dates;
mod error;
mod paths;
mod product;
mod tile;

pub use availability::{parse_doy_listing, DoyLookup, HttpDoyLookup, StaticDoyLookup};
pub use credentials::Credentials;
pub use dates::{date_from_doy, daterange};
pub use error::FetchError;
pub use paths::{generate_filepaths, make_filepaths, write_manifest, PathRecord};
pub use product::{Product, COLLECTION, GRANULE_PREFIX, PRODUCTS};
pub use tile::{
    create_tiles, TileExtent, TileId, TileRange, GRID_COLUMNS, GRID_ROWS, GRID_X_MIN, GRID_Y_MAX,
    SPHERE_RADIUS, TILE_SIZE,
};

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
