//! Lookup of the days published in the snow-data archive.
//!
//! The archive serves plain directory listings: each product has one
//! directory per year, holding one directory per day-of-year (`001/` to
//! `366/`). A day is considered available when its directory is listed.

use crate::credentials::Credentials;
use crate::product::Product;
use crate::{FetchError, Result};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Timeout for a single listing request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of the days-of-year a product has published for a year.
pub trait DoyLookup {
    /// Return every published day-of-year of `product` in `year`.
    fn available_doys(&self, product: &Product, year: i32) -> Result<BTreeSet<u32>>;
}

/// Queries the archive's year listings over HTTP.
pub struct HttpDoyLookup {
    /// HTTP client for listing requests.
    client: reqwest::blocking::Client,
    /// Basic auth pair taken from the credentials file.
    auth: Option<(String, String)>,
    /// Number of listings fetched this session.
    listings_fetched: AtomicUsize,
}

impl std::fmt::Debug for HttpDoyLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDoyLookup")
            .field("authenticated", &self.auth.is_some())
            .field("listings_fetched", &self.listings_fetched())
            .finish()
    }
}

impl HttpDoyLookup {
    /// Create an anonymous lookup.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            auth: None,
            listings_fetched: AtomicUsize::new(0),
        })
    }

    /// Create a lookup that authenticates with the given credentials.
    pub fn with_credentials(credentials: &Credentials) -> Result<Self> {
        let mut lookup = Self::new()?;
        lookup.auth = credentials
            .basic_auth()
            .map(|(user, pass)| (user.to_string(), pass.to_string()));
        Ok(lookup)
    }

    /// Number of listings fetched this session.
    pub fn listings_fetched(&self) -> usize {
        self.listings_fetched.load(Ordering::Relaxed)
    }
}

impl DoyLookup for HttpDoyLookup {
    fn available_doys(&self, product: &Product, year: i32) -> Result<BTreeSet<u32>> {
        let url = product.year_url(year);
        debug!(%url, "Fetching day listing");

        let mut request = self.client.get(&url);
        if let Some((user, pass)) = &self.auth {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send()?;
        if !response.status().is_success() {
            return Err(FetchError::ListingFailed {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text()?;
        self.listings_fetched.fetch_add(1, Ordering::Relaxed);

        let doys = parse_doy_listing(&body);
        debug!(%url, days = doys.len(), "Parsed day listing");
        Ok(doys)
    }
}

/// In-memory lookup keyed by product name and year.
#[derive(Debug, Clone, Default)]
pub struct StaticDoyLookup {
    days: HashMap<(String, i32), BTreeSet<u32>>,
}

impl StaticDoyLookup {
    /// Create an empty lookup; every query answers with no days.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the published days of a product-year.
    pub fn insert<I: IntoIterator<Item = u32>>(&mut self, product: &str, year: i32, doys: I) {
        self.days
            .entry((product.to_string(), year))
            .or_default()
            .extend(doys);
    }
}

impl DoyLookup for StaticDoyLookup {
    fn available_doys(&self, product: &Product, year: i32) -> Result<BTreeSet<u32>> {
        Ok(self
            .days
            .get(&(product.name.to_string(), year))
            .cloned()
            .unwrap_or_default())
    }
}

/// Quoted link to a directory whose last segment is one to three digits.
fn doy_link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"href=["'](?:[^"']*/)?(\d{1,3})/["']"#).expect("day listing pattern is valid")
    })
}

/// Extract day-of-year directory entries from an HTML index page.
///
/// Link targets may be relative (`001/`) or absolute
/// (`/modscag-historic/2001/001/`); only the last path segment is inspected.
pub fn parse_doy_listing(html: &str) -> BTreeSet<u32> {
    doy_link_pattern()
        .captures_iter(html)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .filter(|doy| (1..=366).contains(doy))
        .collect()
}
