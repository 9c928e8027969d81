//! Mosaicking of same-day tiles.

use crate::naming::{output_name, variable_name};
use crate::profile::RasterProfile;
use crate::reproject::reproject_tiff;
use crate::workdir::{ensure_outside_working_root, relocate, remove_working_root, DayDirectory};
use crate::{RasterError, Result, NODATA};
use gdal::programs::raster::{build_vrt, BuildVRTOptions};
use gdal::raster::{Buffer, GdalDataType, GdalType};
use gdal::{Dataset, DriverManager};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Counts reported by [`merge_tiles`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Mosaics written.
    pub mosaics: usize,
    /// Reprojected mosaics written.
    pub reprojected: usize,
    /// Reprojections that failed and were skipped.
    pub reprojection_failures: usize,
    /// Day directories with no file matching the pattern.
    pub skipped: usize,
}

/// Merge the tiles of each day directory into one mosaic per day.
///
/// For every directory the files matching `file_pattern` are mosaicked into
/// `MOD09GA_<variable>_<YYYY_MM_DD>_HMA.tif` in `output_dir`. When `epsg` is
/// given the mosaic is also reprojected; a failed reprojection is logged and
/// does not stop the run. Each directory is then copied under `output_dir`,
/// and finally removed from the working tree along with any directory left
/// empty, the working root included.
pub fn merge_tiles(
    dirs: &[DayDirectory],
    output_dir: &Path,
    file_pattern: &str,
    epsg: Option<u32>,
) -> Result<MergeSummary> {
    ensure_outside_working_root(dirs, output_dir)?;
    fs::create_dir_all(output_dir)?;

    let variable = variable_name(file_pattern);
    let mut summary = MergeSummary::default();

    info!(days = dirs.len(), %variable, "Merging tiles ...");
    let bar = progress_bar(dirs.len());

    for day in dirs {
        bar.set_message(day.date.to_string());
        let sources = matching_files(&day.path, file_pattern)?;

        if sources.is_empty() {
            warn!(dir = %day.path.display(), file_pattern, "No tiles match pattern, skipping merge");
            summary.skipped += 1;
        } else {
            let output = output_dir.join(output_name(&variable, day.date, None));
            let profile = mosaic(&sources, &output)?;
            info!(?profile, output = %output.display(), "Merged profile");
            summary.mosaics += 1;

            if let Some(code) = epsg {
                let reprojected = output_dir.join(output_name(&variable, day.date, Some(code)));
                match reproject_tiff(&output, &reprojected, code) {
                    Ok(_) => summary.reprojected += 1,
                    Err(RasterError::InvalidEpsg { epsg, reason }) => {
                        warn!(epsg, %reason, "Invalid EPSG Code. Go to http://epsg.io/");
                        summary.reprojection_failures += 1;
                    }
                    Err(e) => {
                        warn!(output = %output.display(), "Reprojection failed: {}", e);
                        summary.reprojection_failures += 1;
                    }
                }
            }
        }

        relocate(day, output_dir)?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    if let Some(root) = remove_working_root(dirs)? {
        info!(root = %root.display(), "Removed working directory");
    }

    info!(?summary, "Merge complete");
    Ok(summary)
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg:>10} [{bar:40}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

/// Files in `dir` matching `file_pattern`, sorted by path.
pub fn matching_files(dir: &Path, file_pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = fs::canonicalize(dir)?;
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        file_pattern
    );

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Mosaic `sources` into a single GeoTIFF at `output`.
///
/// The mosaic spans the union of the source extents. Pixels covered by no
/// source are set to 255, which is also recorded as the no-data value. All
/// sources must share one pixel type and CRS. Where sources overlap, the
/// first one in `sources` wins.
pub fn mosaic(sources: &[PathBuf], output: &Path) -> Result<RasterProfile> {
    // The VRT paints later sources over earlier ones
    let datasets = sources
        .iter()
        .rev()
        .map(Dataset::open)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let options = BuildVRTOptions::new(["-vrtnodata", "255"])?;
    let merged = build_vrt(None, datasets.as_slice(), Some(options))?;
    if merged.raster_count() == 0 {
        return Err(RasterError::NoBands(sources.first().cloned().unwrap_or_default()));
    }

    let written = match merged.rasterband(1)?.band_type() {
        GdalDataType::UInt8 => write_gtiff::<u8>(&merged, output)?,
        GdalDataType::UInt16 => write_gtiff::<u16>(&merged, output)?,
        GdalDataType::Int16 => write_gtiff::<i16>(&merged, output)?,
        GdalDataType::UInt32 => write_gtiff::<u32>(&merged, output)?,
        GdalDataType::Int32 => write_gtiff::<i32>(&merged, output)?,
        GdalDataType::Float32 => write_gtiff::<f32>(&merged, output)?,
        GdalDataType::Float64 => write_gtiff::<f64>(&merged, output)?,
        other => return Err(RasterError::UnsupportedDataType(format!("{:?}", other))),
    };

    RasterProfile::from_dataset(&written)
}

/// Copy every band of `src` into a new GeoTIFF with no-data 255.
fn write_gtiff<T: GdalType + Copy>(src: &Dataset, path: &Path) -> Result<Dataset> {
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let (width, height) = src.raster_size();
    let count = src.raster_count();

    let mut dst = driver.create_with_band_type::<T, _>(path, width, height, count)?;
    dst.set_geo_transform(&src.geo_transform()?)?;
    let wkt = src.projection();
    if !wkt.is_empty() {
        dst.set_projection(&wkt)?;
    }

    for index in 1..=count {
        let mut buffer: Buffer<T> = src
            .rasterband(index)?
            .read_as((0, 0), (width, height), (width, height), None)?;
        let mut band = dst.rasterband(index)?;
        band.set_no_data_value(Some(NODATA))?;
        band.write((0, 0), (width, height), &mut buffer)?;
    }

    Ok(dst)
}
