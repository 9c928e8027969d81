//! Reprojection of a mosaic into another coordinate reference system.

use crate::profile::RasterProfile;
use crate::warp::{reproject_band, suggested_warp_output, WarpGrid};
use crate::{RasterError, Result, NODATA};
use gdal::raster::{GdalDataType, GdalType};
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager};
use std::path::Path;
use tracing::info;

/// Number of warper worker threads.
pub const WARP_THREADS: usize = 2;

/// Sets a thread-local GDAL config option and clears it on drop.
struct ConfigOption {
    key: &'static str,
}

impl ConfigOption {
    fn set(key: &'static str, value: &str) -> Result<Self> {
        gdal::config::set_thread_local_config_option(key, value)?;
        Ok(Self { key })
    }
}

impl Drop for ConfigOption {
    fn drop(&mut self) {
        let _ = gdal::config::clear_thread_local_config_option(self.key);
    }
}

/// Resolve an EPSG code to a spatial reference.
pub fn spatial_ref_for_epsg(epsg: u32) -> Result<SpatialRef> {
    SpatialRef::from_epsg(epsg).map_err(|e| RasterError::InvalidEpsg {
        epsg,
        reason: e.to_string(),
    })
}

/// Reproject band 1 of `src_path` into `epsg`, writing a GeoTIFF to `dst_path`.
///
/// The destination grid is the one GDAL suggests for the source extent.
/// Pixels are resampled with nearest-neighbour using [`WARP_THREADS`] workers.
/// The no-data value of the source is carried over (255 when unset).
pub fn reproject_tiff(src_path: &Path, dst_path: &Path, epsg: u32) -> Result<RasterProfile> {
    let dst_srs = spatial_ref_for_epsg(epsg)?;
    let dst_wkt = dst_srs.to_wkt()?;

    let _invert_check = ConfigOption::set("CHECK_WITH_INVERT_PROJ", "YES")?;

    let src = Dataset::open(src_path)?;
    if src.raster_count() == 0 {
        return Err(RasterError::NoBands(src_path.to_path_buf()));
    }

    let grid = suggested_warp_output(&src, &dst_wkt)?;
    let band = src.rasterband(1)?;
    let nodata = band.no_data_value().unwrap_or(NODATA);

    let dst = match band.band_type() {
        GdalDataType::UInt8 => create_destination::<u8>(dst_path, &grid, &dst_wkt, nodata)?,
        GdalDataType::UInt16 => create_destination::<u16>(dst_path, &grid, &dst_wkt, nodata)?,
        GdalDataType::Int16 => create_destination::<i16>(dst_path, &grid, &dst_wkt, nodata)?,
        GdalDataType::UInt32 => create_destination::<u32>(dst_path, &grid, &dst_wkt, nodata)?,
        GdalDataType::Int32 => create_destination::<i32>(dst_path, &grid, &dst_wkt, nodata)?,
        GdalDataType::Float32 => create_destination::<f32>(dst_path, &grid, &dst_wkt, nodata)?,
        GdalDataType::Float64 => create_destination::<f64>(dst_path, &grid, &dst_wkt, nodata)?,
        other => return Err(RasterError::UnsupportedDataType(format!("{:?}", other))),
    };

    reproject_band(&src, &dst, 1, WARP_THREADS)?;

    let profile = RasterProfile::from_dataset(&dst)?;
    info!(?profile, epsg, "Reprojected profile");
    Ok(profile)
}

fn create_destination<T: GdalType + Copy>(
    path: &Path,
    grid: &WarpGrid,
    wkt: &str,
    nodata: f64,
) -> Result<Dataset> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut dst = driver.create_with_band_type::<T, _>(path, grid.width, grid.height, 1)?;
    dst.set_geo_transform(&grid.geo_transform)?;
    dst.set_projection(wkt)?;
    dst.rasterband(1)?.set_no_data_value(Some(nodata))?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_epsg() {
        assert!(matches!(
            spatial_ref_for_epsg(999_999),
            Err(RasterError::InvalidEpsg { epsg: 999_999, .. })
        ));
        assert!(spatial_ref_for_epsg(4326).is_ok());
    }

    #[test]
    fn test_reproject_missing_source() {
        let tmp = tempfile::tempdir().unwrap();
        let result = reproject_tiff(
            &tmp.path().join("missing.tif"),
            &tmp.path().join("out.tif"),
            4326,
        );
        assert!(matches!(result, Err(RasterError::Gdal(_))));
        assert!(!tmp.path().join("out.tif").exists());
    }
}
