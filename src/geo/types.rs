//! Core types for the geodata subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of place an element describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceKind {
    Settlement,
    NaturalFeature,
    Attraction,
}

impl fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settlement => write!(f, "settlement"),
            Self::NaturalFeature => write!(f, "natural-feature"),
            Self::Attraction => write!(f, "attraction"),
        }
    }
}

/// A named, geolocatable place inside a county.
///
/// Identity for deduplication is the lower-cased, trimmed `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceEntry {
    /// OSM element id, kept so collaborators can link back to the provider.
    pub external_id: i64,
    pub name: String,
    pub kind: PlaceKind,
    pub lat: f64,
    pub lon: f64,
}

impl PlaceEntry {
    /// The key used for deduplication and case-insensitive matching.
    pub fn dedupe_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// Axis-aligned lat/lon rectangle, `min_lat <= max_lat`, `min_lon <= max_lon`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self { min_lat, max_lat, min_lon, max_lon }
    }

    /// Bounding-box filter in Overpass order: south,west,north,east.
    pub fn overpass_filter(&self) -> String {
        format!(
            "({},{},{},{})",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

/// Geodata provider errors.
///
/// Only `Throttled` is retryable; everything else fails the call
/// immediately. The resolver converts all of these into empty results at
/// its public boundary.
#[derive(Debug, Clone)]
pub enum GeoError {
    /// A single HTTP 429 from the provider.
    Throttled,
    /// Throttled on the final attempt of the retry loop.
    RetriesExhausted { attempts: u32 },
    /// Any other non-2xx status.
    Provider { status: u16 },
    /// Network-level failure (timeout, DNS, connection reset).
    Transport(String),
    /// The body was not the JSON shape we expect.
    InvalidResponse(String),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Throttled => write!(f, "provider throttled the request (429)"),
            Self::RetriesExhausted { attempts } => {
                write!(f, "rate limited, exhausted retries after {} attempts", attempts)
            }
            Self::Provider { status } => write!(f, "provider returned HTTP {}", status),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "invalid provider response: {}", msg),
        }
    }
}

impl std::error::Error for GeoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&PlaceKind::NaturalFeature).unwrap();
        assert_eq!(json, "\"natural-feature\"");
        assert_eq!(PlaceKind::NaturalFeature.to_string(), "natural-feature");
    }

    #[test]
    fn test_dedupe_key_trims_and_lowercases() {
        let place = PlaceEntry {
            external_id: 1,
            name: "  Athlone ".into(),
            kind: PlaceKind::Settlement,
            lat: 53.42,
            lon: -7.94,
        };
        assert_eq!(place.dedupe_key(), "athlone");
    }

    #[test]
    fn test_overpass_filter_order() {
        let b = BoundingBox::new(52.69, 53.23, -6.79, -5.99);
        assert_eq!(b.overpass_filter(), "(52.69,-6.79,53.23,-5.99)");
    }

    #[test]
    fn test_exhausted_error_mentions_attempts() {
        let e = GeoError::RetriesExhausted { attempts: 3 };
        assert!(e.to_string().contains("3 attempts"));
    }
}
