//! # modscag-raster
//!
//! Mosaicking and reprojection of MODIS snow-cover GeoTIFF tiles.
//!
//! Downloaded tiles live in per-day working directories laid out as
//! `<product>-historic/<year>/<doy>/`. For each day this crate:
//! - merges every tile matching a variable pattern into one mosaic
//!   (`MOD09GA_<variable>_<YYYY_MM_DD>_HMA.tif`, no-data 255)
//! - optionally reprojects the mosaic to an EPSG code
//!   (`MOD09GA_<variable>_<YYYY_MM_DD>_HMA_<epsg>.tif`)
//! - copies the day directory under the output tree
//!
//! and finally removes the merged days from the working tree, pruning the
//! working root once it is empty.
//!
//! Raster I/O, mosaicking and warping are all done by GDAL.
//!
//! ## Example
//!
//! ```no_run
//! use modscag_raster::{discover_day_dirs, merge_tiles};
//! use std::path::Path;
//!
//! let days = discover_day_dirs("modscag-historic", None)?;
//! let summary = merge_tiles(&days, Path::new("mosaics"), "*snow_fraction.tif", Some(32645))?;
//! println!("{} mosaics written", summary.mosaics);
//! # Ok::<(), modscag_raster::RasterError>(())
//! ```

mod error;
mod merge;
mod naming;
mod profile;
mod reproject;
mod warp;
mod workdir;

pub use error::RasterError;
pub use merge::{matching_files, merge_tiles, mosaic, MergeSummary};
pub use naming::{output_name, variable_name, REGION};
pub use profile::RasterProfile;
pub use reproject::{reproject_tiff, spatial_ref_for_epsg, WARP_THREADS};
pub use warp::{suggested_warp_output, WarpGrid};
pub use workdir::{
    discover_day_dirs, ensure_outside_working_root, relocate, remove_working_root, DayDirectory,
};

/// No-data value stamped on every written raster.
pub const NODATA: f64 = 255.0;

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
