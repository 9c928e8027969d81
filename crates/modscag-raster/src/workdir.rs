//! Working directory bookkeeping.
//!
//! Downloads land in `<root>/<year>/<doy>/` (e.g. `modscag-historic/2001/001/`).
//! After a day is merged its directory is copied under the output tree at the
//! same relative location. Once every day is done the merged days are removed
//! from the working tree, and the working root goes with them when nothing
//! else is left in it.

use crate::{RasterError, Result};
use chrono::NaiveDate;
use modscag_fetch::date_from_doy;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// A per-day download directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDirectory {
    /// Path as given (relative or absolute).
    pub path: PathBuf,
    /// Calendar date encoded by the path.
    pub date: NaiveDate,
    /// `<root>/<year>/<doy>` part of the path.
    relative: PathBuf,
}

impl DayDirectory {
    /// Parse the date from a path laid out as `<root>/<YYYY>/<DOY>`.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let invalid = || RasterError::InvalidDayDirectory(path.to_path_buf());

        let doy_name = file_name(path).ok_or_else(invalid)?;
        let year_dir = path.parent().ok_or_else(invalid)?;
        let year_name = file_name(year_dir).ok_or_else(invalid)?;
        let root_name = year_dir
            .parent()
            .and_then(file_name)
            .ok_or_else(invalid)?;

        if year_name.len() != 4 || !is_digits(year_name) || doy_name.len() > 3 || !is_digits(doy_name) {
            return Err(invalid());
        }

        let year: i32 = year_name.parse().map_err(|_| invalid())?;
        let doy: u32 = doy_name.parse().map_err(|_| invalid())?;
        let date = date_from_doy(year, doy).ok_or_else(invalid)?;

        Ok(Self {
            path: path.to_path_buf(),
            date,
            relative: Path::new(root_name).join(year_name).join(doy_name),
        })
    }

    /// Location relative to the output tree, `<root>/<year>/<doy>`.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// The working root two levels above the day directory.
    pub fn working_root(&self) -> Option<&Path> {
        self.path.parent().and_then(Path::parent)
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|s| s.to_str())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Find every `<root>/<year>/<doy>` directory, in date order.
///
/// Entries that do not parse as a day are ignored. When `range` is given,
/// only days within it (inclusive) are returned.
pub fn discover_day_dirs<P: AsRef<Path>>(
    root: P,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<DayDirectory>> {
    let root = root.as_ref();
    let mut days = Vec::new();

    for year_entry in fs::read_dir(root)? {
        let year_entry = year_entry?;
        if !year_entry.file_type()?.is_dir() {
            continue;
        }

        for day_entry in fs::read_dir(year_entry.path())? {
            let day_entry = day_entry?;
            if !day_entry.file_type()?.is_dir() {
                continue;
            }

            match DayDirectory::parse(day_entry.path()) {
                Ok(day) => {
                    let in_range = range.map_or(true, |(start, end)| day.date >= start && day.date <= end);
                    if in_range {
                        days.push(day);
                    }
                }
                Err(_) => debug!(path = %day_entry.path().display(), "Ignoring non-day directory"),
            }
        }
    }

    days.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path)));
    Ok(days)
}

/// Copy a day directory under the output tree, replacing any previous copy.
///
/// Returns the destination path.
pub fn relocate(day: &DayDirectory, output_dir: &Path) -> Result<PathBuf> {
    let dest = output_dir.join(day.relative());
    if dest.exists() {
        fs::remove_dir_all(&dest)?;
    }
    copy_dir_recursive(&day.path, &dest)?;
    debug!(from = %day.path.display(), to = %dest.display(), "Relocated day directory");
    Ok(dest)
}

/// Remove merged day directories, then prune the working tree.
///
/// Each day in `days` is deleted, followed by any year directory and working
/// root left empty. Days that were not merged stay in place, and so does
/// their root. Returns the working root when it was removed.
pub fn remove_working_root(days: &[DayDirectory]) -> Result<Option<PathBuf>> {
    for day in days {
        if day.path.exists() {
            fs::remove_dir_all(&day.path)?;
        }
    }

    let mut years: Vec<&Path> = days.iter().filter_map(|d| d.path.parent()).collect();
    years.sort();
    years.dedup();
    for year in years {
        remove_if_empty(year)?;
    }

    let Some(root) = days.first().and_then(DayDirectory::working_root) else {
        return Ok(None);
    };
    if remove_if_empty(root)? {
        debug!(root = %root.display(), "Removed working root");
        Ok(Some(root.to_path_buf()))
    } else {
        if root.exists() {
            info!(root = %root.display(), "Working root kept, unmerged entries remain");
        }
        Ok(None)
    }
}

fn remove_if_empty(dir: &Path) -> Result<bool> {
    if !dir.is_dir() || fs::read_dir(dir)?.next().is_some() {
        return Ok(false);
    }
    fs::remove_dir(dir)?;
    Ok(true)
}

/// Fail when the output directory would be deleted with the working root.
pub fn ensure_outside_working_root(days: &[DayDirectory], output_dir: &Path) -> Result<()> {
    let Some(root) = days.first().and_then(DayDirectory::working_root) else {
        return Ok(());
    };

    let root_abs = absolute(root)?;
    let output_abs = absolute(output_dir)?;
    if output_abs.starts_with(&root_abs) {
        return Err(RasterError::OutputInsideWorkingRoot {
            output: output_dir.to_path_buf(),
            root: root.to_path_buf(),
        });
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
