//! Calendar helpers for day-of-year addressed archives.

use crate::{FetchError, Result};
use chrono::{Datelike, NaiveDate};

/// Iterate `(year, day_of_year)` for every day from `start` to `end` inclusive.
pub fn daterange(start: NaiveDate, end: NaiveDate) -> Result<impl Iterator<Item = (i32, u32)>> {
    if start > end {
        return Err(FetchError::InvalidDateRange { start, end });
    }

    Ok(start
        .iter_days()
        .take_while(move |d| *d <= end)
        .map(|d| (d.year(), d.ordinal())))
}

/// Date of a `(year, day_of_year)` pair, if it exists.
pub fn date_from_doy(year: i32, doy: u32) -> Option<NaiveDate> {
    NaiveDate::from_yo_opt(year, doy)
}
