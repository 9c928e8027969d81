//! Steps of the tile pipeline as driven by the CLI.

use crate::config::PipelineConfig;
use crate::error::RunnerResult;
use chrono::NaiveDate;
use modscag_fetch::{
    make_filepaths, write_manifest, Credentials, DoyLookup, HttpDoyLookup, PathRecord, Product,
    TileRange,
};
use modscag_raster::{discover_day_dirs, merge_tiles, MergeSummary};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What to plan downloads for.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Product registry names.
    pub products: Vec<String>,
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
    /// Tiles to fetch on each day.
    pub tiles: TileRange,
    /// Variable file pattern.
    pub file_pattern: String,
}

impl PlanRequest {
    fn from_config(config: &PipelineConfig) -> RunnerResult<Self> {
        Ok(Self {
            products: config.products.clone(),
            start: config.start_date,
            end: config.end_date,
            tiles: config.tile_range()?,
            file_pattern: config.file_pattern.clone(),
        })
    }
}

/// What to merge.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// Directory holding the downloaded `<year>/<doy>` tree.
    pub working_root: PathBuf,
    /// Where mosaics and relocated days are written.
    pub output_dir: PathBuf,
    /// Variable file pattern.
    pub file_pattern: String,
    /// Target CRS for reprojected mosaics.
    pub epsg: Option<u32>,
    /// Inclusive date filter; days outside it stay in the working root.
    pub dates: Option<(NaiveDate, NaiveDate)>,
}

/// Build an archive lookup, authenticated when credentials are given.
pub fn archive_lookup(credentials: Option<&Path>) -> RunnerResult<HttpDoyLookup> {
    let lookup = match credentials {
        Some(path) => HttpDoyLookup::with_credentials(&Credentials::from_file(path)?)?,
        None => HttpDoyLookup::new()?,
    };
    Ok(lookup)
}

/// Build the download list for `request`.
pub fn plan<L: DoyLookup + ?Sized>(request: &PlanRequest, lookup: &L) -> RunnerResult<Vec<PathRecord>> {
    let products = request
        .products
        .iter()
        .map(|name| Product::lookup(name))
        .collect::<Result<Vec<_>, _>>()?;
    let tiles = request.tiles.tiles();

    info!(
        products = ?request.products,
        tiles = tiles.len(),
        start = %request.start,
        end = %request.end,
        "Planning downloads"
    );

    Ok(make_filepaths(
        request.start,
        request.end,
        &products,
        &tiles,
        &request.file_pattern,
        lookup,
    )?)
}

/// Write the manifest to `path`, or to stdout.
pub fn emit_manifest(records: &[PathRecord], path: Option<&Path>) -> RunnerResult<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            write_manifest(records, BufWriter::new(File::create(path)?))?;
            info!(path = %path.display(), records = records.len(), "Wrote manifest");
        }
        None => write_manifest(records, io::stdout().lock())?,
    }
    Ok(())
}

/// Merge every day directory found under the working root.
///
/// A missing working root means nothing was downloaded and is not an error.
pub fn merge(request: &MergeRequest) -> RunnerResult<MergeSummary> {
    if !request.working_root.is_dir() {
        warn!(root = %request.working_root.display(), "Working root not found, nothing to merge");
        return Ok(MergeSummary::default());
    }

    let days = discover_day_dirs(&request.working_root, request.dates)?;
    if days.is_empty() {
        warn!(root = %request.working_root.display(), "No day directories found");
        return Ok(MergeSummary::default());
    }

    let summary = merge_tiles(&days, &request.output_dir, &request.file_pattern, request.epsg)?;
    info!(?summary, "Merge finished");
    Ok(summary)
}

/// Plan downloads, write the manifest, then merge whatever is in the
/// working root.
pub fn run(config: &PipelineConfig) -> RunnerResult<MergeSummary> {
    let lookup = archive_lookup(config.credentials.as_deref())?;
    let records = plan(&PlanRequest::from_config(config)?, &lookup)?;
    emit_manifest(&records, config.manifest.as_deref())?;

    merge(&MergeRequest {
        working_root: config.working_root.clone(),
        output_dir: config.output_dir.clone(),
        file_pattern: config.file_pattern.clone(),
        epsg: config.epsg,
        dates: Some((config.start_date, config.end_date)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunnerError;
    use modscag_fetch::{FetchError, StaticDoyLookup};

    fn request(products: &[&str]) -> PlanRequest {
        PlanRequest {
            products: products.iter().map(|p| p.to_string()).collect(),
            start: NaiveDate::from_ymd_opt(2001, 12, 30).unwrap(),
            end: NaiveDate::from_ymd_opt(2002, 1, 2).unwrap(),
            tiles: TileRange::new(24, 25, 5, 5),
            file_pattern: "*snow_fraction.tif".to_string(),
        }
    }

    #[test]
    fn test_plan_across_year_boundary() {
        let mut lookup = StaticDoyLookup::new();
        lookup.insert("modscag", 2001, [364, 365]);
        lookup.insert("modscag", 2002, [2]);

        let records = plan(&request(&["modscag"]), &lookup).unwrap();

        // Three published days times two tiles
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| r.product.name == "modscag"));
        assert_eq!(records[0].year, 2001);
        assert_eq!(records[5].year, 2002);
        assert_eq!(records[5].doy, 2);
    }

    #[test]
    fn test_plan_unknown_product() {
        let lookup = StaticDoyLookup::new();
        let result = plan(&request(&["modis"]), &lookup);
        assert!(matches!(
            result,
            Err(RunnerError::Fetch(FetchError::UnknownProduct(_)))
        ));
    }

    #[test]
    fn test_emit_manifest_to_file() {
        let mut lookup = StaticDoyLookup::new();
        lookup.insert("moddrfs", 2001, [364]);

        let records = plan(&request(&["moddrfs"]), &lookup).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lists/manifest.tsv");
        emit_manifest(&records, Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("h24v05"));
        assert!(text.contains("moddrfs-historic"));
    }

    #[test]
    fn test_merge_missing_working_root() {
        let dir = tempfile::tempdir().unwrap();
        let summary = merge(&MergeRequest {
            working_root: dir.path().join("modscag-historic"),
            output_dir: dir.path().join("out"),
            file_pattern: "*snow_fraction.tif".to_string(),
            epsg: None,
            dates: None,
        })
        .unwrap();
        assert_eq!(summary, MergeSummary::default());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_merge_date_filter_keeps_other_days() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("modscag-historic");
        std::fs::create_dir_all(root.join("2001/001")).unwrap();
        std::fs::create_dir_all(root.join("2001/100")).unwrap();

        let day = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        let summary = merge(&MergeRequest {
            working_root: root.clone(),
            output_dir: dir.path().join("out"),
            file_pattern: "*snow_fraction.tif".to_string(),
            epsg: None,
            dates: Some((day, day)),
        })
        .unwrap();

        assert_eq!(summary.skipped, 1);
        assert!(dir.path().join("out/modscag-historic/2001/001").exists());
        assert!(!root.join("2001/001").exists());
        assert!(root.join("2001/100").exists());
    }
}
