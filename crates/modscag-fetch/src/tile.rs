//! MODIS sinusoidal tile grid.
//!
//! The MODIS land products are distributed on a fixed equal-area grid of
//! 36 x 18 tiles laid over the sinusoidal projection:
//! - `h` is the column (0 at the antimeridian in the west, increases eastward)
//! - `v` is the row (0 at the north pole, increases southward)
//!
//! Each tile spans 1111950.52 m on a side. Tiles are named `hNNvMM` with both
//! indices zero-padded to two digits, e.g. `h24v05`.

use crate::{FetchError, Result};
use std::fmt;
use std::str::FromStr;

/// Radius of the authalic sphere used by the MODIS sinusoidal projection.
pub const SPHERE_RADIUS: f64 = 6_371_007.181;

/// Western edge of the grid (projected x of the antimeridian).
pub const GRID_X_MIN: f64 = -20_015_109.354;

/// Northern edge of the grid (projected y of the north pole).
pub const GRID_Y_MAX: f64 = 10_007_554.677;

/// Number of tile columns.
pub const GRID_COLUMNS: u32 = 36;

/// Number of tile rows.
pub const GRID_ROWS: u32 = 18;

/// Side length of one tile in projected metres.
pub const TILE_SIZE: f64 = -2.0 * GRID_X_MIN / GRID_COLUMNS as f64;

/// A cell of the sinusoidal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    /// Horizontal index (column).
    pub h: u32,
    /// Vertical index (row).
    pub v: u32,
}

/// Projected extent of a tile in sinusoidal metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileExtent {
    /// Western edge.
    pub min_x: f64,
    /// Eastern edge.
    pub max_x: f64,
    /// Southern edge.
    pub min_y: f64,
    /// Northern edge.
    pub max_y: f64,
}

impl TileExtent {
    /// Check if a projected point lies within the extent.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl TileId {
    /// Create a tile identifier.
    pub fn new(h: u32, v: u32) -> Self {
        Self { h, v }
    }

    /// Whether the indices fall inside the 36 x 18 global grid.
    pub fn is_on_grid(&self) -> bool {
        self.h < GRID_COLUMNS && self.v < GRID_ROWS
    }

    /// Project latitude/longitude onto the sinusoidal plane.
    ///
    /// Returns `(x, y)` in metres.
    pub fn project(lat: f64, lon: f64) -> (f64, f64) {
        let lat_rad = lat.to_radians();
        let x = SPHERE_RADIUS * lon.to_radians() * lat_rad.cos();
        let y = SPHERE_RADIUS * lat_rad;
        (x, y)
    }

    /// Find the tile containing a latitude/longitude.
    ///
    /// # Arguments
    /// * `lat` - Latitude in degrees (-90 to 90)
    /// * `lon` - Longitude in degrees (-180 to 180)
    pub fn from_lat_lon(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(FetchError::OutOfGrid { lat, lon });
        }

        let (x, y) = Self::project(lat, lon);
        let h = ((x - GRID_X_MIN) / TILE_SIZE).floor().max(0.0) as u32;
        let v = ((GRID_Y_MAX - y) / TILE_SIZE).floor().max(0.0) as u32;

        // The eastern and southern grid edges belong to the last tile
        Ok(Self {
            h: h.min(GRID_COLUMNS - 1),
            v: v.min(GRID_ROWS - 1),
        })
    }

    /// Get the projected extent of this tile.
    pub fn extent(&self) -> TileExtent {
        let min_x = GRID_X_MIN + self.h as f64 * TILE_SIZE;
        let max_y = GRID_Y_MAX - self.v as f64 * TILE_SIZE;
        TileExtent {
            min_x,
            max_x: min_x + TILE_SIZE,
            min_y: max_y - TILE_SIZE,
            max_y,
        }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{:02}v{:02}", self.h, self.v)
    }
}

impl FromStr for TileId {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FetchError::InvalidTileId(s.to_string());

        let rest = s.strip_prefix('h').ok_or_else(invalid)?;
        let (h_str, v_str) = rest.split_once('v').ok_or_else(invalid)?;
        if h_str.len() != 2 || v_str.len() != 2 {
            return Err(invalid());
        }
        if !h_str.bytes().chain(v_str.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let h = h_str.parse().map_err(|_| invalid())?;
        let v = v_str.parse().map_err(|_| invalid())?;
        Ok(Self { h, v })
    }
}

/// Inclusive rectangle of tile indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    /// First column.
    pub h_start: u32,
    /// Last column (inclusive).
    pub h_end: u32,
    /// First row.
    pub v_start: u32,
    /// Last row (inclusive).
    pub v_end: u32,
}

impl TileRange {
    /// Create a range from its bounds.
    pub fn new(h_start: u32, h_end: u32, v_start: u32, v_end: u32) -> Self {
        Self {
            h_start,
            h_end,
            v_start,
            v_end,
        }
    }

    /// Smallest range of tiles covering a latitude/longitude box.
    ///
    /// Meridians converge toward the poles on the sinusoidal plane, so the
    /// widest column span of the box sits on the parallel closest to the
    /// equator. That parallel is sampled alongside the four corners.
    pub fn covering(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let equatorward_lat = if min_lat > 0.0 {
            min_lat
        } else if max_lat < 0.0 {
            max_lat
        } else {
            0.0
        };

        let samples = [
            TileId::from_lat_lon(max_lat, min_lon)?,
            TileId::from_lat_lon(max_lat, max_lon)?,
            TileId::from_lat_lon(min_lat, min_lon)?,
            TileId::from_lat_lon(min_lat, max_lon)?,
            TileId::from_lat_lon(equatorward_lat, min_lon)?,
            TileId::from_lat_lon(equatorward_lat, max_lon)?,
        ];

        let h_start = samples.iter().map(|t| t.h).min().unwrap_or_default();
        let h_end = samples.iter().map(|t| t.h).max().unwrap_or_default();
        let v_start = samples.iter().map(|t| t.v).min().unwrap_or_default();
        let v_end = samples.iter().map(|t| t.v).max().unwrap_or_default();

        Ok(Self::new(h_start, h_end, v_start, v_end))
    }

    /// Number of tiles in the range. Inverted bounds contain no tiles.
    pub fn len(&self) -> usize {
        let columns = (u64::from(self.h_end) + 1).saturating_sub(u64::from(self.h_start));
        let rows = (u64::from(self.v_end) + 1).saturating_sub(u64::from(self.v_start));
        usize::try_from(columns.saturating_mul(rows)).unwrap_or(usize::MAX)
    }

    /// Whether the range contains no tiles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerate every tile in the range, column-major (all rows of `h_start` first).
    pub fn tiles(&self) -> Vec<TileId> {
        let mut tiles = Vec::with_capacity(self.len());
        for h in self.h_start..=self.h_end {
            for v in self.v_start..=self.v_end {
                tiles.push(TileId::new(h, v));
            }
        }
        tiles
    }
}

/// List the `hNNvMM` names of every tile between the given bounds (inclusive).
///
/// Inverted bounds yield an empty list.
pub fn create_tiles(h_start: u32, h_end: u32, v_start: u32, v_end: u32) -> Vec<String> {
    TileRange::new(h_start, h_end, v_start, v_end)
        .tiles()
        .iter()
        .map(TileId::to_string)
        .collect()
}
