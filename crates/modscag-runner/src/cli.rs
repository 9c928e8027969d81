//! Command-line interface.

use crate::config::{select_tiles, PipelineConfig, Region, TileBounds, DEFAULT_FILE_PATTERN, DEFAULT_PRODUCT};
use crate::error::RunnerResult;
use crate::pipeline::{self, MergeRequest, PlanRequest};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use modscag_fetch::TileRange;
use modscag_raster::{merge_tiles, reproject_tiff, DayDirectory};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "modscag")]
#[command(about = "Plan, mosaic and reproject MODIS snow-cover tiles", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the sinusoidal grid tiles of a range or region
    Tiles(TileArgs),
    /// Write the download manifest for a date range
    Paths(PathsArgs),
    /// Mosaic downloaded day directories
    Merge(MergeArgs),
    /// Reproject a single GeoTIFF
    Reproject(ReprojectArgs),
    /// Run the pipeline described by a YAML config
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
pub struct TileArgs {
    /// Tile bounds as H_START,H_END,V_START,V_END (inclusive)
    #[arg(long, conflicts_with = "bbox")]
    pub tiles: Option<TileBounds>,

    /// Region as MIN_LAT,MAX_LAT,MIN_LON,MAX_LON in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<Region>,
}

impl TileArgs {
    fn range(&self) -> RunnerResult<TileRange> {
        select_tiles(self.tiles, self.bbox)
    }
}

#[derive(Debug, Clone, Args)]
pub struct PathsArgs {
    #[command(flatten)]
    pub tiles: TileArgs,

    /// First day, YYYY-MM-DD (inclusive)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day, YYYY-MM-DD (inclusive)
    #[arg(long)]
    pub end: NaiveDate,

    /// Archive product; repeat for several
    #[arg(long = "product", default_value = DEFAULT_PRODUCT)]
    pub products: Vec<String>,

    /// Variable file pattern
    #[arg(long, default_value = DEFAULT_FILE_PATTERN)]
    pub file_pattern: String,

    /// JSON credentials for the archive
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Manifest file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct MergeArgs {
    /// Day directories to merge; discovered under --working-root when omitted
    pub dirs: Vec<PathBuf>,

    /// Directory holding the downloaded <year>/<doy> tree
    #[arg(long, default_value = "modscag-historic")]
    pub working_root: PathBuf,

    /// Directory for mosaics and relocated days
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Variable file pattern
    #[arg(long, default_value = DEFAULT_FILE_PATTERN)]
    pub file_pattern: String,

    /// Also reproject each mosaic to this EPSG code
    #[arg(long)]
    pub epsg: Option<u32>,

    /// Only merge discovered days on or after this date
    #[arg(long, requires = "end", conflicts_with = "dirs")]
    pub start: Option<NaiveDate>,

    /// Only merge discovered days on or before this date
    #[arg(long, requires = "start", conflicts_with = "dirs")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Args)]
pub struct ReprojectArgs {
    /// Source GeoTIFF
    pub input: PathBuf,

    /// Destination GeoTIFF
    pub output: PathBuf,

    /// Target EPSG code
    #[arg(long)]
    pub epsg: u32,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Pipeline config file
    pub config: PathBuf,
}

/// Execute a parsed command.
pub fn execute(command: Command) -> RunnerResult<()> {
    match command {
        Command::Tiles(args) => {
            let range = args.range()?;
            let mut out = std::io::stdout().lock();
            for tile in range.tiles() {
                writeln!(out, "{}", tile)?;
            }
        }
        Command::Paths(args) => {
            let lookup = pipeline::archive_lookup(args.credentials.as_deref())?;
            let request = PlanRequest {
                products: args.products,
                start: args.start,
                end: args.end,
                tiles: args.tiles.range()?,
                file_pattern: args.file_pattern,
            };
            let records = pipeline::plan(&request, &lookup)?;
            pipeline::emit_manifest(&records, args.output.as_deref())?;
        }
        Command::Merge(args) if !args.dirs.is_empty() => {
            let days = args
                .dirs
                .iter()
                .map(DayDirectory::parse)
                .collect::<Result<Vec<_>, _>>()?;
            let summary = merge_tiles(&days, &args.output_dir, &args.file_pattern, args.epsg)?;
            info!(?summary, "Merge finished");
        }
        Command::Merge(args) => {
            pipeline::merge(&MergeRequest {
                working_root: args.working_root,
                output_dir: args.output_dir,
                file_pattern: args.file_pattern,
                epsg: args.epsg,
                dates: args.start.zip(args.end),
            })?;
        }
        Command::Reproject(args) => {
            let profile = reproject_tiff(&args.input, &args.output, args.epsg)?;
            info!(output = %args.output.display(), width = profile.width, height = profile.height, "Reprojected");
        }
        Command::Run(args) => {
            let config = PipelineConfig::from_file(&args.config)?;
            pipeline::run(&config)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tiles_command() {
        let cli = Cli::try_parse_from(["modscag", "tiles", "--tiles", "23,26,4,6"]).unwrap();
        match cli.command {
            Command::Tiles(args) => {
                assert_eq!(args.range().unwrap(), TileRange::new(23, 26, 4, 6));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_tiles_and_bbox_conflict() {
        let result = Cli::try_parse_from([
            "modscag", "tiles", "--tiles", "23,26,4,6", "--bbox", "27,29,84,88",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_bbox() {
        let cli = Cli::try_parse_from(["modscag", "tiles", "--bbox", "-10,-5,-60,-55"]).unwrap();
        match cli.command {
            Command::Tiles(args) => {
                let region = args.bbox.unwrap();
                assert_eq!(region.min_lat, -10.0);
                assert_eq!(region.max_lon, -55.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_paths_defaults() {
        let cli = Cli::try_parse_from([
            "modscag", "-v", "paths", "--start", "2001-01-01", "--end", "2001-01-31", "--tiles",
            "23,26,4,6",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Command::Paths(args) => {
                assert_eq!(args.products, vec![DEFAULT_PRODUCT]);
                assert_eq!(args.file_pattern, DEFAULT_FILE_PATTERN);
                assert_eq!(args.start, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_merge_with_epsg() {
        let cli = Cli::try_parse_from([
            "modscag", "merge", "-o", "mosaics", "--epsg", "32645", "modscag-historic/2001/001",
        ])
        .unwrap();
        match cli.command {
            Command::Merge(args) => {
                assert_eq!(args.epsg, Some(32645));
                assert_eq!(args.dirs.len(), 1);
                assert_eq!(args.working_root, PathBuf::from("modscag-historic"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_merge_date_filter_needs_both_ends() {
        let result = Cli::try_parse_from(["modscag", "merge", "-o", "out", "--start", "2001-01-01"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_date_filter_conflicts_with_explicit_dirs() {
        let result = Cli::try_parse_from([
            "modscag", "merge", "-o", "out", "--start", "2001-01-01", "--end", "2001-01-31",
            "modscag-historic/2001/001",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "modscag", "merge", "-o", "out", "--start", "2001-01-01", "--end", "2001-01-31",
        ])
        .unwrap();
        match cli.command {
            Command::Merge(args) => assert!(args.dirs.is_empty() && args.start.is_some()),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_reproject_requires_epsg() {
        assert!(Cli::try_parse_from(["modscag", "reproject", "a.tif", "b.tif"]).is_err());
        assert!(Cli::try_parse_from(["modscag", "reproject", "a.tif", "b.tif", "--epsg", "4326"]).is_ok());
    }
}
