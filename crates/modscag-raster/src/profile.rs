//! Summary of a raster's layout and georeferencing.

use crate::Result;
use gdal::Dataset;

/// Layout and georeferencing of a written raster.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterProfile {
    /// GDAL driver short name.
    pub driver: String,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Number of bands.
    pub count: usize,
    /// Pixel type of band 1.
    pub data_type: String,
    /// Affine geotransform `[x0, dx, rx, y0, ry, dy]`.
    pub geo_transform: [f64; 6],
    /// Coordinate reference system as WKT (empty when unset).
    pub crs_wkt: String,
    /// No-data value of band 1.
    pub nodata: Option<f64>,
}

impl RasterProfile {
    /// Read the profile of an open dataset.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let (width, height) = dataset.raster_size();
        let band = dataset.rasterband(1)?;

        Ok(Self {
            driver: dataset.driver().short_name(),
            width,
            height,
            count: dataset.raster_count(),
            data_type: format!("{:?}", band.band_type()),
            geo_transform: dataset.geo_transform()?,
            crs_wkt: dataset.projection(),
            nodata: band.no_data_value(),
        })
    }

    /// Projected bounds as `(min_x, min_y, max_x, max_y)` for a north-up raster.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let gt = &self.geo_transform;
        let x1 = gt[0] + self.width as f64 * gt[1];
        let y1 = gt[3] + self.height as f64 * gt[5];
        (gt[0].min(x1), gt[3].min(y1), gt[0].max(x1), gt[3].max(y1))
    }

    /// Pixel size as `(width, height)` in CRS units.
    pub fn resolution(&self) -> (f64, f64) {
        (self.geo_transform[1].abs(), self.geo_transform[5].abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(geo_transform: [f64; 6], width: usize, height: usize) -> RasterProfile {
        RasterProfile {
            driver: "GTiff".to_string(),
            width,
            height,
            count: 1,
            data_type: "UInt8".to_string(),
            geo_transform,
            crs_wkt: String::new(),
            nodata: Some(255.0),
        }
    }

    #[test]
    fn test_bounds_north_up() {
        let p = profile([100.0, 10.0, 0.0, 500.0, 0.0, -5.0], 20, 8);
        assert_eq!(p.bounds(), (100.0, 460.0, 300.0, 500.0));
        assert_eq!(p.resolution(), (10.0, 5.0));
    }
}
