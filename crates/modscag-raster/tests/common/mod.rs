//! Helpers for writing small synthetic GeoTIFF tiles.

#![allow(dead_code)]

use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager};
use std::path::Path;

/// MODIS 500 m pixel size in sinusoidal metres.
pub const MODIS_500M: f64 = 463.312_716_527_778;

/// PROJ definition of the MODIS sinusoidal projection.
pub const SINUSOIDAL_PROJ4: &str =
    "+proj=sinu +lon_0=0 +x_0=0 +y_0=0 +R=6371007.181 +units=m +no_defs";

pub fn sinusoidal_wkt() -> String {
    SpatialRef::from_proj4(SINUSOIDAL_PROJ4)
        .and_then(|srs| srs.to_wkt())
        .expect("sinusoidal definition should parse")
}

pub fn epsg_wkt(epsg: u32) -> String {
    SpatialRef::from_epsg(epsg)
        .and_then(|srs| srs.to_wkt())
        .expect("EPSG code should resolve")
}

/// Write a single-band u8 GeoTIFF filled with `value`.
pub fn write_tile(
    path: &Path,
    wkt: &str,
    origin: (f64, f64),
    pixel_size: f64,
    size: (usize, usize),
    value: u8,
) {
    let (width, height) = size;
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut ds = driver
        .create_with_band_type::<u8, _>(path, width, height, 1)
        .unwrap();
    ds.set_geo_transform(&[origin.0, pixel_size, 0.0, origin.1, 0.0, -pixel_size])
        .unwrap();
    ds.set_projection(wkt).unwrap();

    let mut band = ds.rasterband(1).unwrap();
    band.set_no_data_value(Some(255.0)).unwrap();
    let mut buffer = Buffer::new((width, height), vec![value; width * height]);
    band.write((0, 0), (width, height), &mut buffer).unwrap();
}

/// Read band 1 of a raster as u8, row-major.
pub fn read_band(path: &Path) -> (usize, usize, Vec<u8>) {
    let ds = Dataset::open(path).unwrap();
    let (width, height) = ds.raster_size();
    let buffer: Buffer<u8> = ds
        .rasterband(1)
        .unwrap()
        .read_as((0, 0), (width, height), (width, height), None)
        .unwrap();
    (width, height, buffer.data().to_vec())
}
