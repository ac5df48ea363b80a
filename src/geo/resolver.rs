//! Geodata resolver — orchestrates the query strategies.
//!
//! Bounds flow:  cache → built-in county table → provider area resolution → absent
//! Towns flow:   cache → area query → (sparse? bounding-box query, keep larger) → dedupe/sort
//! Search flow:  empty text short-circuit → cached town list filter → provider search query
//!
//! Every operation degrades to an empty result on provider failure; the
//! marketplace around this client treats "no data" as a normal state.

use super::cache::ResultCache;
use super::counties;
use super::places::{self, OverpassResponse};
use super::query;
use super::rate_gate::RateGate;
use super::retry::{HttpTransport, RetryExecutor, Transport};
use super::types::{BoundingBox, GeoError, PlaceEntry};

/// Below this many places, the named-area strategy is considered sparse
/// and the bounding-box strategy is tried as well. Area queries are more
/// precise but occasionally miss cross-boundary settlements a plain
/// rectangle catches.
pub const SPARSE_RESULT_THRESHOLD: usize = 10;

const BOUNDS_TTL_MINUTES: i64 = 60;
const TOWNS_TTL_MINUTES: i64 = 5;
const SEARCH_TTL_MINUTES: i64 = 20;

/// The geodata resolver. One instance per process, shared via `Arc`;
/// every method takes `&self` and all mutable state is internally locked.
pub struct GeoResolver {
    transport: Box<dyn Transport>,
    gate: RateGate,
    retry: RetryExecutor,
    bounds_cache: ResultCache<BoundingBox>,
    towns_cache: ResultCache<Vec<PlaceEntry>>,
    search_cache: ResultCache<Vec<PlaceEntry>>,
}

impl GeoResolver {
    pub fn new() -> Self {
        Self::with_transport(Box::new(HttpTransport::new()))
    }

    /// Resolver over a specific transport (for testing, or a non-default
    /// Overpass endpoint).
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            gate: RateGate::new(),
            retry: RetryExecutor::new(),
            bounds_cache: ResultCache::new(),
            towns_cache: ResultCache::new(),
            search_cache: ResultCache::new(),
        }
    }

    /// Replace the rate gate and retry policy (for testing).
    pub fn with_policies(mut self, gate: RateGate, retry: RetryExecutor) -> Self {
        self.gate = gate;
        self.retry = retry;
        self
    }

    /// Resolve a county's bounding box.
    ///
    /// Checks the cache, then the built-in 26-county table (no network),
    /// and only then asks the provider for the boundary geometry. Absent
    /// is a normal outcome for unrecognized input, not an error.
    pub fn resolve_county_bounds(&self, county: &str) -> Option<BoundingBox> {
        let county = county.trim();
        if county.is_empty() {
            return None;
        }
        let key = county.to_lowercase();

        if let Some(bounds) = self.bounds_cache.get(&key) {
            return Some(bounds);
        }

        if let Some(bounds) = counties::lookup(county) {
            self.bounds_cache.set(&key, bounds, BOUNDS_TTL_MINUTES);
            return Some(bounds);
        }

        match self.fetch_bounds(county) {
            Ok(Some(bounds)) => {
                self.bounds_cache.set(&key, bounds, BOUNDS_TTL_MINUTES);
                Some(bounds)
            }
            Ok(None) => {
                log::debug!("no boundary found for county '{}'", county);
                None
            }
            Err(e) => {
                log::warn!("county bounds lookup for '{}' failed: {}", county, e);
                None
            }
        }
    }

    /// List the towns and notable places in a county, deduped and sorted
    /// alphabetically. Empty on provider failure.
    pub fn list_places_in_county(&self, county: &str) -> Vec<PlaceEntry> {
        let county = county.trim();
        if county.is_empty() {
            return Vec::new();
        }
        let key = county.to_lowercase();

        if let Some(places) = self.towns_cache.get(&key) {
            return places;
        }

        let mut result = match self.fetch_places(&query::build_area_query(county)) {
            Ok(places) => places,
            Err(e) => {
                log::warn!("area query for county '{}' failed: {}", county, e);
                return Vec::new();
            }
        };

        if result.len() < SPARSE_RESULT_THRESHOLD {
            log::debug!(
                "area query for '{}' returned {} places, trying bounding box",
                county,
                result.len()
            );
            if let Some(bounds) = self.resolve_county_bounds(county) {
                match self.fetch_places(&query::build_bounding_box_query(&bounds, county)) {
                    Ok(boxed) if boxed.len() > result.len() => result = boxed,
                    Ok(_) => {}
                    // Keep the sparse area result rather than losing it.
                    Err(e) => log::warn!("bounding-box query for '{}' failed: {}", county, e),
                }
            }
        }

        let mut result = places::dedupe_places(result);
        result.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        self.towns_cache.set(&key, result.clone(), TOWNS_TTL_MINUTES);
        result
    }

    /// Search places in a county by a case-insensitive name fragment.
    ///
    /// Empty search text returns an empty list with no I/O. A cached full
    /// county list is filtered in memory in preference to a provider
    /// round-trip.
    pub fn search_places_in_county(&self, county: &str, text: &str) -> Vec<PlaceEntry> {
        let county = county.trim();
        let text = text.trim();
        if county.is_empty() || text.is_empty() {
            return Vec::new();
        }
        let county_key = county.to_lowercase();
        let needle = text.to_lowercase();

        if let Some(all) = self.towns_cache.get(&county_key) {
            return all
                .into_iter()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .collect();
        }

        let search_key = format!("{}|{}", county_key, needle);
        if let Some(hits) = self.search_cache.get(&search_key) {
            return hits;
        }

        let Some(bounds) = self.resolve_county_bounds(county) else {
            return Vec::new();
        };

        match self.fetch_places(&query::build_search_query(&bounds, text)) {
            Ok(places) => {
                let places = places::dedupe_places(places);
                self.search_cache.set(&search_key, places.clone(), SEARCH_TTL_MINUTES);
                places
            }
            Err(e) => {
                log::warn!("search query '{}' in '{}' failed: {}", text, county, e);
                Vec::new()
            }
        }
    }

    fn fetch(&self, q: &str) -> Result<OverpassResponse, GeoError> {
        let body = self.retry.execute(&self.gate, self.transport.as_ref(), q)?;
        places::parse_response(&body)
    }

    fn fetch_places(&self, q: &str) -> Result<Vec<PlaceEntry>, GeoError> {
        Ok(places::extract_places(&self.fetch(q)?))
    }

    fn fetch_bounds(&self, county: &str) -> Result<Option<BoundingBox>, GeoError> {
        let response = self.fetch(&query::build_county_area_resolution_query(county))?;
        Ok(places::aggregate_bounds(&response.elements))
    }
}

impl Default for GeoResolver {
    fn default() -> Self {
        Self::new()
    }
}
