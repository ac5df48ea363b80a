//! Built-in bounding boxes for the 26 counties of the Republic of Ireland.
//!
//! These cover every county the marketplace operates in, so the common
//! path never needs the provider to resolve a boundary. The boxes are
//! deliberately generous: they are used to scope place queries, not to
//! draw borders.

use super::types::BoundingBox;

struct CountyBounds {
    name: &'static str,
    bounds: BoundingBox,
}

const COUNTIES: &[CountyBounds] = &[
    CountyBounds { name: "Carlow", bounds: BoundingBox::new(52.46, 52.92, -7.11, -6.50) },
    CountyBounds { name: "Cavan", bounds: BoundingBox::new(53.76, 54.30, -8.05, -6.77) },
    CountyBounds { name: "Clare", bounds: BoundingBox::new(52.55, 53.17, -9.94, -8.27) },
    CountyBounds { name: "Cork", bounds: BoundingBox::new(51.42, 52.39, -10.25, -7.84) },
    CountyBounds { name: "Donegal", bounds: BoundingBox::new(54.46, 55.44, -8.80, -6.92) },
    CountyBounds { name: "Dublin", bounds: BoundingBox::new(53.18, 53.63, -6.55, -5.99) },
    CountyBounds { name: "Galway", bounds: BoundingBox::new(52.97, 53.72, -10.31, -7.96) },
    CountyBounds { name: "Kerry", bounds: BoundingBox::new(51.69, 52.59, -10.62, -9.12) },
    CountyBounds { name: "Kildare", bounds: BoundingBox::new(52.86, 53.45, -7.17, -6.46) },
    CountyBounds { name: "Kilkenny", bounds: BoundingBox::new(52.24, 52.89, -7.68, -6.92) },
    CountyBounds { name: "Laois", bounds: BoundingBox::new(52.78, 53.22, -7.74, -6.93) },
    CountyBounds { name: "Leitrim", bounds: BoundingBox::new(53.82, 54.47, -8.42, -7.58) },
    CountyBounds { name: "Limerick", bounds: BoundingBox::new(52.28, 52.75, -9.38, -8.16) },
    CountyBounds { name: "Longford", bounds: BoundingBox::new(53.52, 53.94, -8.02, -7.37) },
    CountyBounds { name: "Louth", bounds: BoundingBox::new(53.70, 54.11, -6.70, -6.09) },
    CountyBounds { name: "Mayo", bounds: BoundingBox::new(53.47, 54.35, -10.26, -8.60) },
    CountyBounds { name: "Meath", bounds: BoundingBox::new(53.38, 53.92, -7.34, -6.21) },
    CountyBounds { name: "Monaghan", bounds: BoundingBox::new(53.90, 54.42, -7.34, -6.55) },
    CountyBounds { name: "Offaly", bounds: BoundingBox::new(52.85, 53.42, -8.08, -6.98) },
    CountyBounds { name: "Roscommon", bounds: BoundingBox::new(53.27, 54.12, -8.81, -7.87) },
    CountyBounds { name: "Sligo", bounds: BoundingBox::new(53.91, 54.47, -9.14, -8.16) },
    CountyBounds { name: "Tipperary", bounds: BoundingBox::new(52.20, 53.17, -8.48, -7.37) },
    CountyBounds { name: "Waterford", bounds: BoundingBox::new(51.94, 52.36, -8.16, -6.95) },
    CountyBounds { name: "Westmeath", bounds: BoundingBox::new(53.32, 53.79, -7.96, -6.95) },
    CountyBounds { name: "Wexford", bounds: BoundingBox::new(52.11, 52.80, -7.00, -6.14) },
    CountyBounds { name: "Wicklow", bounds: BoundingBox::new(52.69, 53.23, -6.79, -5.99) },
];

/// Look up a county's built-in bounds. Case-insensitive, trimmed, and
/// tolerant of a "County " prefix.
pub fn lookup(county: &str) -> Option<BoundingBox> {
    let q = county.trim().to_lowercase();
    let q = q.strip_prefix("county ").unwrap_or(&q);
    COUNTIES
        .iter()
        .find(|c| c.name.to_lowercase() == q)
        .map(|c| c.bounds)
}

/// All known county names, in table order (for collaborator dropdowns).
pub fn county_names() -> Vec<&'static str> {
    COUNTIES.iter().map(|c| c.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_all_twenty_six_counties() {
        assert_eq!(county_names().len(), 26);
    }

    #[test]
    fn test_lookup_case_insensitive_and_trimmed() {
        assert!(lookup("wicklow").is_some());
        assert!(lookup("  WICKLOW  ").is_some());
        assert!(lookup("County Wicklow").is_some());
    }

    #[test]
    fn test_lookup_unknown_is_none() {
        assert!(lookup("Antrim").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_every_box_is_well_formed() {
        for name in county_names() {
            let b = lookup(name).unwrap();
            assert!(b.min_lat <= b.max_lat, "{} lat inverted", name);
            assert!(b.min_lon <= b.max_lon, "{} lon inverted", name);
            // Sanity: all of Ireland sits inside this envelope.
            assert!(b.min_lat > 51.0 && b.max_lat < 55.6, "{} out of range", name);
            assert!(b.min_lon > -11.0 && b.max_lon < -5.5, "{} out of range", name);
        }
    }

    #[test]
    fn test_wicklow_exact_box() {
        let b = lookup("Wicklow").unwrap();
        assert_eq!(b, BoundingBox::new(52.69, 53.23, -6.79, -5.99));
    }
}
