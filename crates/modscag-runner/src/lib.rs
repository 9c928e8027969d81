//! # modscag-runner
//!
//! Command-line front end for the MODIS snow-cover tile pipeline.
//!
//! Subcommands:
//! - `tiles`: list grid tiles for a range or a lat/lon region
//! - `paths`: write the download manifest for a date range
//! - `merge`: mosaic downloaded day directories, optionally reprojecting
//! - `reproject`: reproject a single GeoTIFF
//! - `run`: plan and merge as described by a YAML config

pub mod cli;
pub mod config;
mod error;
pub mod logging;
pub mod pipeline;

pub use cli::{execute, Cli, Command};
pub use config::{PipelineConfig, Region, TileBounds};
pub use error::{RunnerError, RunnerResult};
pub use logging::init_logging;
