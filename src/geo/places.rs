//! Overpass response parsing, deduplication, and bounds aggregation.

use super::types::{BoundingBox, GeoError, PlaceEntry, PlaceKind};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// One element of an Overpass response. Which fields are populated
/// depends on the element type and the query's `out` mode.
#[derive(Deserialize, Debug, Clone)]
pub struct OverpassElement {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Coordinate>,
    #[serde(default)]
    pub bounds: Option<ElementBounds>,
    #[serde(default)]
    pub geometry: Option<Vec<Coordinate>>,
    #[serde(default)]
    pub tags: ElementTags,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct ElementBounds {
    pub minlat: f64,
    pub maxlat: f64,
    pub minlon: f64,
    pub maxlon: f64,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ElementTags {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub natural: Option<String>,
    #[serde(default)]
    pub tourism: Option<String>,
}

impl OverpassElement {
    /// Direct point, or the computed center for ways/relations.
    fn coordinate(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => self.center.map(|c| (c.lat, c.lon)),
        }
    }

    fn kind(&self) -> PlaceKind {
        if self.tags.place.is_some() {
            PlaceKind::Settlement
        } else if self.tags.natural.is_some() {
            PlaceKind::NaturalFeature
        } else {
            PlaceKind::Attraction
        }
    }
}

/// Parse a raw provider body into its element list.
pub fn parse_response(body: &str) -> Result<OverpassResponse, GeoError> {
    serde_json::from_str(body).map_err(|e| GeoError::InvalidResponse(e.to_string()))
}

/// Elements with both a name and a resolvable coordinate become place
/// entries; everything else is silently dropped.
pub fn extract_places(response: &OverpassResponse) -> Vec<PlaceEntry> {
    response
        .elements
        .iter()
        .filter_map(|el| {
            let name = el.tags.name.as_deref()?.trim();
            if name.is_empty() {
                return None;
            }
            let (lat, lon) = el.coordinate()?;
            Some(PlaceEntry {
                external_id: el.id,
                name: name.to_string(),
                kind: el.kind(),
                lat,
                lon,
            })
        })
        .collect()
}

/// Keep the first occurrence per lower-cased trimmed name, preserving the
/// provider's original ordering.
pub fn dedupe_places(entries: Vec<PlaceEntry>) -> Vec<PlaceEntry> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.dedupe_key()))
        .collect()
}

/// Fold every `bounds` field and every `geometry` coordinate into one
/// rectangle. `None` if no coordinate was ever seen — never a degenerate
/// infinity-initialized box.
pub fn aggregate_bounds(elements: &[OverpassElement]) -> Option<BoundingBox> {
    let mut min_lat = f64::INFINITY;
    let mut max_lat = f64::NEG_INFINITY;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;
    let mut seen = false;

    for el in elements {
        if let Some(b) = el.bounds {
            min_lat = min_lat.min(b.minlat);
            max_lat = max_lat.max(b.maxlat);
            min_lon = min_lon.min(b.minlon);
            max_lon = max_lon.max(b.maxlon);
            seen = true;
        }
        if let Some(ref geometry) = el.geometry {
            for coord in geometry {
                min_lat = min_lat.min(coord.lat);
                max_lat = max_lat.max(coord.lat);
                min_lon = min_lon.min(coord.lon);
                max_lon = max_lon.max(coord.lon);
                seen = true;
            }
        }
    }

    seen.then(|| BoundingBox::new(min_lat, max_lat, min_lon, max_lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn place(name: &str) -> PlaceEntry {
        PlaceEntry {
            external_id: 0,
            name: name.to_string(),
            kind: PlaceKind::Settlement,
            lat: 0.0,
            lon: 0.0,
        }
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_in_order() {
        let result = dedupe_places(vec![place("Athlone"), place("athlone "), place("Galway")]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Athlone");
        assert_eq!(result[1].name, "Galway");
    }

    #[test]
    fn test_extract_places_drops_unusable_elements() {
        let body = r#"{"elements":[
            {"type":"node","id":1,"lat":53.2,"lon":-6.1,"tags":{"name":"Bray","place":"town"}},
            {"type":"node","id":2,"lat":53.3,"lon":-6.2,"tags":{"place":"town"}},
            {"type":"way","id":3,"tags":{"name":"Nameless Way","place":"village"}},
            {"type":"way","id":4,"center":{"lat":52.98,"lon":-6.04},"tags":{"name":"Greystones","place":"town"}}
        ]}"#;
        let response = parse_response(body).unwrap();
        let places = extract_places(&response);
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Bray");
        assert_eq!(places[1].name, "Greystones");
        assert_relative_eq!(places[1].lat, 52.98);
    }

    #[test]
    fn test_extract_classifies_kinds() {
        let body = r#"{"elements":[
            {"type":"node","id":1,"lat":1.0,"lon":1.0,"tags":{"name":"Town","place":"town"}},
            {"type":"node","id":2,"lat":1.0,"lon":1.0,"tags":{"name":"Peak","natural":"peak"}},
            {"type":"node","id":3,"lat":1.0,"lon":1.0,"tags":{"name":"Gardens","tourism":"attraction"}}
        ]}"#;
        let places = extract_places(&parse_response(body).unwrap());
        assert_eq!(places[0].kind, PlaceKind::Settlement);
        assert_eq!(places[1].kind, PlaceKind::NaturalFeature);
        assert_eq!(places[2].kind, PlaceKind::Attraction);
    }

    #[test]
    fn test_aggregate_bounds_folds_bounds_and_geometry() {
        let body = r#"{"elements":[
            {"type":"relation","id":1,
             "bounds":{"minlat":53.0,"maxlat":53.5,"minlon":-7.0,"maxlon":-6.5},
             "geometry":[{"lat":52.9,"lon":-6.4},{"lat":53.6,"lon":-7.1}]}
        ]}"#;
        let response = parse_response(body).unwrap();
        let bounds = aggregate_bounds(&response.elements).unwrap();
        assert_relative_eq!(bounds.min_lat, 52.9);
        assert_relative_eq!(bounds.max_lat, 53.6);
        assert_relative_eq!(bounds.min_lon, -7.1);
        assert_relative_eq!(bounds.max_lon, -6.4);
    }

    #[test]
    fn test_aggregate_bounds_exact_rectangle() {
        let body = r#"{"elements":[
            {"type":"relation","id":1,
             "bounds":{"minlat":53.0,"maxlat":53.5,"minlon":-7.0,"maxlon":-6.5}}
        ]}"#;
        let response = parse_response(body).unwrap();
        let bounds = aggregate_bounds(&response.elements).unwrap();
        assert_eq!(bounds, BoundingBox::new(53.0, 53.5, -7.0, -6.5));
    }

    #[test]
    fn test_aggregate_bounds_absent_without_coordinates() {
        let body = r#"{"elements":[{"type":"node","id":1,"tags":{"name":"x"}}]}"#;
        let response = parse_response(body).unwrap();
        assert!(aggregate_bounds(&response.elements).is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_body() {
        assert!(parse_response("<html>gateway timeout</html>").is_err());
    }

    #[test]
    fn test_parse_tolerates_missing_elements_key() {
        let response = parse_response("{}").unwrap();
        assert!(response.elements.is_empty());
    }
}
