//! Download list generation.

use crate::availability::DoyLookup;
use crate::dates::daterange;
use crate::product::Product;
use crate::tile::TileId;
use crate::Result;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// One tile of one product on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRecord {
    /// Product the granule belongs to.
    pub product: &'static Product,
    /// Grid tile.
    pub tile: TileId,
    /// Calendar year.
    pub year: i32,
    /// Day of year (1-based).
    pub doy: u32,
    /// File name suffix selecting the variable, e.g. `*snow_fraction.tif`.
    pub file_pattern: String,
}

impl PathRecord {
    /// Local working directory for the day, `<root>/<year>/<doy>`.
    pub fn local_dir(&self) -> PathBuf {
        PathBuf::from(self.product.local_root)
            .join(self.year.to_string())
            .join(format!("{:03}", self.doy))
    }

    /// Remote directory for the day.
    pub fn remote_dir(&self) -> String {
        self.product.day_url(self.year, self.doy)
    }

    /// Glob matching the tile's granule within the day directory.
    ///
    /// The processing timestamp embedded in archived names is not known
    /// until the day is listed, so it is left as a wildcard.
    pub fn file_glob(&self) -> String {
        format!(
            "{}.A{}{:03}.{}.{}.*{}",
            self.product.granule_prefix,
            self.year,
            self.doy,
            self.tile,
            self.product.collection,
            self.file_pattern.trim_start_matches('*'),
        )
    }

    /// Manifest line: remote directory, file glob and local directory, tab separated.
    pub fn manifest_line(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.remote_dir(),
            self.file_glob(),
            self.local_dir().display()
        )
    }
}

/// Build the records of every tile for one product-day.
pub fn generate_filepaths(
    product: &'static Product,
    tiles: &[TileId],
    year: i32,
    doy: u32,
    file_pattern: &str,
) -> Vec<PathRecord> {
    tiles
        .iter()
        .map(|tile| PathRecord {
            product,
            tile: *tile,
            year,
            doy,
            file_pattern: file_pattern.to_string(),
        })
        .collect()
}

/// Build the download list for a date range.
///
/// Days that the archive has not published are logged and skipped. A year
/// whose listing cannot be fetched is treated as having no published days.
pub fn make_filepaths<L: DoyLookup + ?Sized>(
    start: NaiveDate,
    end: NaiveDate,
    products: &[&'static Product],
    tiles: &[TileId],
    file_pattern: &str,
    lookup: &L,
) -> Result<Vec<PathRecord>> {
    let mut filepaths = Vec::new();
    let mut available: HashMap<(&str, i32), BTreeSet<u32>> = HashMap::new();
    let mut skipped = 0usize;

    for product in products {
        for (year, doy) in daterange(start, end)? {
            let doys = available.entry((product.name, year)).or_insert_with(|| {
                lookup.available_doys(product, year).unwrap_or_else(|e| {
                    warn!(product = product.name, year, "Day listing unavailable: {}", e);
                    BTreeSet::new()
                })
            });

            if doys.contains(&doy) {
                filepaths.extend(generate_filepaths(product, tiles, year, doy, file_pattern));
            } else {
                warn!("Unable to download:: {}", product.day_url(year, doy));
                skipped += 1;
            }
        }
    }

    info!(
        records = filepaths.len(),
        skipped_days = skipped,
        "Generated download list"
    );
    Ok(filepaths)
}

/// Write one manifest line per record.
pub fn write_manifest<W: Write>(records: &[PathRecord], mut out: W) -> Result<()> {
    for record in records {
        writeln!(out, "{}", record.manifest_line())?;
    }
    out.flush()?;
    Ok(())
}
