//! Integration tests for download planning.
//!
//! These run fully offline against an in-memory availability lookup.

use chrono::NaiveDate;
use modscag_fetch::{
    create_tiles, make_filepaths, write_manifest, Product, StaticDoyLookup, TileId, TileRange,
};
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Tile enumeration
// ============================================================================

#[test]
fn test_tiles_match_range() {
    let range = TileRange::new(23, 26, 4, 6);
    let names = create_tiles(23, 26, 4, 6);
    let ids: Vec<String> = range.tiles().iter().map(|t| t.to_string()).collect();

    assert_eq!(names, ids);
    assert_eq!(names.len(), range.len());
    assert_eq!(names.len(), 12);

    // Every name parses back to a tile inside the range
    for name in &names {
        let tile: TileId = name.parse().expect("tile name should parse");
        assert!((23..=26).contains(&tile.h));
        assert!((4..=6).contains(&tile.v));
    }
}

// ============================================================================
// Path generation
// ============================================================================

#[test]
fn test_plan_month_with_gaps() {
    // January 2001 with a gap on the 10th and 20th
    let mut lookup = StaticDoyLookup::new();
    lookup.insert("modscag", 2001, (1..=31).filter(|d| *d != 10 && *d != 20));

    let tiles = TileRange::new(24, 25, 5, 5).tiles();
    let records = make_filepaths(
        date(2001, 1, 1),
        date(2001, 1, 31),
        &[Product::lookup("modscag").unwrap()],
        &tiles,
        "*snow_fraction.tif",
        &lookup,
    )
    .expect("planning should succeed");

    assert_eq!(records.len(), 29 * tiles.len());

    let days: HashSet<u32> = records.iter().map(|r| r.doy).collect();
    assert!(!days.contains(&10));
    assert!(!days.contains(&20));

    let dirs: HashSet<_> = records.iter().map(|r| r.local_dir()).collect();
    assert_eq!(dirs.len(), 29);
}

#[test]
fn test_manifest_round_trip_fields() {
    let mut lookup = StaticDoyLookup::new();
    lookup.insert("moddrfs", 2010, [60]);

    let records = make_filepaths(
        date(2010, 3, 1),
        date(2010, 3, 1),
        &[Product::lookup("moddrfs").unwrap()],
        &[TileId::new(25, 6)],
        "*snow_fraction.tif",
        &lookup,
    )
    .unwrap();

    let mut out = Vec::new();
    write_manifest(&records, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let fields: Vec<&str> = text.trim_end().split('\t').collect();

    assert_eq!(
        fields,
        vec![
            "https://snow-data.jpl.nasa.gov/moddrfs-historic/2010/060",
            "MOD09GA.A2010060.h25v06.005.*snow_fraction.tif",
            "moddrfs-historic/2010/060",
        ]
    );
}

#[test]
fn test_no_days_published() {
    let lookup = StaticDoyLookup::new();
    let records = make_filepaths(
        date(2003, 5, 1),
        date(2003, 5, 7),
        &[Product::lookup("modscag").unwrap()],
        &[TileId::new(24, 5)],
        "*snow_fraction.tif",
        &lookup,
    )
    .unwrap();

    assert!(records.is_empty());
}
