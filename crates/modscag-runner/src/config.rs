//! Pipeline configuration file.
//!
//! ```yaml
//! credentials: credentials.json
//! products: [modscag]
//! start_date: 2001-01-01
//! end_date: 2001-01-31
//! tiles: { h_start: 23, h_end: 26, v_start: 4, v_end: 6 }
//! file_pattern: "*snow_fraction.tif"
//! working_root: modscag-historic
//! output_dir: mosaics
//! epsg: 32645
//! ```

use crate::error::{RunnerError, RunnerResult};
use chrono::NaiveDate;
use modscag_fetch::TileRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default variable pattern.
pub const DEFAULT_FILE_PATTERN: &str = "*snow_fraction.tif";

/// Default product.
pub const DEFAULT_PRODUCT: &str = "modscag";

/// Inclusive tile index bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBounds {
    /// First column.
    pub h_start: u32,
    /// Last column (inclusive).
    pub h_end: u32,
    /// First row.
    pub v_start: u32,
    /// Last row (inclusive).
    pub v_end: u32,
}

impl From<TileBounds> for TileRange {
    fn from(b: TileBounds) -> Self {
        TileRange::new(b.h_start, b.h_end, b.v_start, b.v_end)
    }
}

impl FromStr for TileBounds {
    type Err = String;

    /// Parse `H_START,H_END,V_START,V_END`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>().map_err(|e| format!("'{}': {}", p.trim(), e)))
            .collect::<Result<Vec<_>, _>>()?;
        match parts[..] {
            [h_start, h_end, v_start, v_end] => Ok(Self {
                h_start,
                h_end,
                v_start,
                v_end,
            }),
            _ => Err("expected H_START,H_END,V_START,V_END".to_string()),
        }
    }
}

/// Latitude/longitude box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
}

impl FromStr for Region {
    type Err = String;

    /// Parse `MIN_LAT,MAX_LAT,MIN_LON,MAX_LON`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>().map_err(|e| format!("'{}': {}", p.trim(), e)))
            .collect::<Result<Vec<_>, _>>()?;
        match parts[..] {
            [min_lat, max_lat, min_lon, max_lon] => Ok(Self {
                min_lat,
                max_lat,
                min_lon,
                max_lon,
            }),
            _ => Err("expected MIN_LAT,MAX_LAT,MIN_LON,MAX_LON".to_string()),
        }
    }
}

/// Resolve explicit bounds or a region into a tile range. Bounds win.
pub fn select_tiles(bounds: Option<TileBounds>, region: Option<Region>) -> RunnerResult<TileRange> {
    match (bounds, region) {
        (Some(b), _) => Ok(b.into()),
        (None, Some(r)) => Ok(TileRange::covering(r.min_lat, r.max_lat, r.min_lon, r.max_lon)?),
        (None, None) => Err(RunnerError::NoTileSelection),
    }
}

fn default_products() -> Vec<String> {
    vec![DEFAULT_PRODUCT.to_string()]
}

fn default_file_pattern() -> String {
    DEFAULT_FILE_PATTERN.to_string()
}

fn default_working_root() -> PathBuf {
    PathBuf::from("modscag-historic")
}

/// Settings for a full `run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// JSON credentials for the archive.
    #[serde(default)]
    pub credentials: Option<PathBuf>,
    /// Product registry names.
    #[serde(default = "default_products")]
    pub products: Vec<String>,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Explicit tile bounds.
    #[serde(default)]
    pub tiles: Option<TileBounds>,
    /// Region to cover when no bounds are given.
    #[serde(default)]
    pub region: Option<Region>,
    /// Variable file pattern.
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    /// Directory holding the downloaded `<year>/<doy>` tree.
    #[serde(default = "default_working_root")]
    pub working_root: PathBuf,
    /// Where mosaics and relocated days are written.
    pub output_dir: PathBuf,
    /// Target CRS for reprojected mosaics.
    #[serde(default)]
    pub epsg: Option<u32>,
    /// Manifest destination; stdout when unset.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

impl PipelineConfig {
    /// Load a config from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RunnerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&text).map_err(|source| RunnerError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Tiles selected by the config.
    pub fn tile_range(&self) -> RunnerResult<TileRange> {
        select_tiles(self.tiles, self.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
credentials: creds.json
products: [modscag, moddrfs]
start_date: 2001-01-01
end_date: 2001-01-31
tiles: {{ h_start: 23, h_end: 26, v_start: 4, v_end: 6 }}
output_dir: mosaics
epsg: 32645
"#
        )
        .unwrap();

        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.products, vec!["modscag", "moddrfs"]);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2001, 1, 1).unwrap());
        assert_eq!(config.file_pattern, DEFAULT_FILE_PATTERN);
        assert_eq!(config.working_root, PathBuf::from("modscag-historic"));
        assert_eq!(config.epsg, Some(32645));
        assert_eq!(config.tile_range().unwrap().len(), 12);
    }

    #[test]
    fn test_region_config() {
        let config: PipelineConfig = serde_yaml::from_str(
            r#"
start_date: 2005-03-01
end_date: 2005-03-02
region: { min_lat: 27.0, max_lat: 29.0, min_lon: 84.0, max_lon: 88.0 }
output_dir: out
"#,
        )
        .unwrap();

        assert_eq!(config.products, vec![DEFAULT_PRODUCT]);
        let range = config.tile_range().unwrap();
        assert!(range.tiles().contains(&modscag_fetch::TileId::new(25, 6)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "start_date: 2001-01-01\nend_date: 2001-01-02\noutput_dir: out\nepgs: 4326\n"
        )
        .unwrap();

        assert!(matches!(
            PipelineConfig::from_file(file.path()),
            Err(RunnerError::Config { .. })
        ));
    }

    #[test]
    fn test_no_tile_selection() {
        assert!(matches!(select_tiles(None, None), Err(RunnerError::NoTileSelection)));
    }

    #[test]
    fn test_parse_bounds_and_region() {
        let bounds: TileBounds = "23, 26,4,6".parse().unwrap();
        assert_eq!(TileRange::from(bounds), TileRange::new(23, 26, 4, 6));
        assert!("23,26,4".parse::<TileBounds>().is_err());
        assert!("23,26,4,x".parse::<TileBounds>().is_err());

        let region: Region = "27.5,29,84,88.25".parse().unwrap();
        assert_eq!(region.max_lon, 88.25);
        assert!("1,2,3".parse::<Region>().is_err());
    }
}
