//! Output file naming.

use chrono::NaiveDate;

/// Region tag embedded in every mosaic name (High Mountain Asia).
pub const REGION: &str = "HMA";

/// Variable name carried by a file pattern, e.g. `*snow_fraction.tif` -> `snow_fraction`.
pub fn variable_name(file_pattern: &str) -> String {
    file_pattern.replace('*', "").replace(".tif", "")
}

/// Mosaic file name, `MOD09GA_<variable>_<YYYY_MM_DD>_HMA[_<epsg>].tif`.
pub fn output_name(variable: &str, date: NaiveDate, epsg: Option<u32>) -> String {
    let suffix = epsg.map(|code| format!("_{}", code)).unwrap_or_default();
    format!(
        "{}_{}_{}_{}{}.tif",
        modscag_fetch::GRANULE_PREFIX,
        variable,
        date.format("%Y_%m_%d"),
        REGION,
        suffix
    )
}
