//! Product descriptors for the JPL snow-cover archives.

use crate::{FetchError, Result};

/// Granule prefix of the MODIS surface reflectance inputs.
pub const GRANULE_PREFIX: &str = "MOD09GA";

/// MODIS collection of the archived granules.
pub const COLLECTION: &str = "005";

/// A remote snow-cover product and its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    /// Registry name (e.g. `modscag`).
    pub name: &'static str,
    /// Remote directory URL template with `{year}` and `{doy}` placeholders.
    pub url_template: &'static str,
    /// Working directory root the downloader mirrors into.
    pub local_root: &'static str,
    /// Granule prefix used in file names.
    pub granule_prefix: &'static str,
    /// Collection number used in file names.
    pub collection: &'static str,
}

/// All products known to the pipeline.
pub const PRODUCTS: &[Product] = &[
    Product {
        name: "modscag",
        url_template: "https://snow-data.jpl.nasa.gov/modscag-historic/{year}/{doy}",
        local_root: "modscag-historic",
        granule_prefix: GRANULE_PREFIX,
        collection: COLLECTION,
    },
    Product {
        name: "moddrfs",
        url_template: "https://snow-data.jpl.nasa.gov/moddrfs-historic/{year}/{doy}",
        local_root: "moddrfs-historic",
        granule_prefix: GRANULE_PREFIX,
        collection: COLLECTION,
    },
];

impl Product {
    /// Look up a product by registry name.
    pub fn lookup(name: &str) -> Result<&'static Product> {
        PRODUCTS
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| FetchError::UnknownProduct(name.to_string()))
    }

    /// Look up a product by its working directory root (e.g. `modscag-historic`).
    pub fn for_local_root(root: &str) -> Option<&'static Product> {
        PRODUCTS.iter().find(|p| p.local_root == root)
    }

    /// Remote directory holding the granules of one day.
    pub fn day_url(&self, year: i32, doy: u32) -> String {
        self.url_template
            .replace("{year}", &year.to_string())
            .replace("{doy}", &format!("{:03}", doy))
    }

    /// Remote directory listing the days published for a year.
    pub fn year_url(&self, year: i32) -> String {
        let day = self.day_url(year, 0);
        match day.rsplit_once('/') {
            Some((year_dir, _)) => format!("{}/", year_dir),
            None => day,
        }
    }
}
