//! Overpass QL builders for the three retrieval strategies.
//!
//! Pure string assembly, no I/O. Callers trim their input; every builder
//! must be handed a non-empty county/search string.

use super::types::BoundingBox;

/// `[out:json]` prologue shared by every query.
const PROLOGUE: &str = "[out:json][timeout:25];";

/// Settlement classes we treat as towns for listing purposes.
const SETTLEMENT_KINDS: &str = "^(city|town|village|hamlet|locality|suburb)$";

/// Named natural features worth listing alongside settlements.
const NATURAL_KINDS: &str = "^(beach|bay|peak|cliff)$";

/// Tourism features worth listing alongside settlements.
const TOURISM_KINDS: &str = "^(attraction|viewpoint)$";

/// Matches "Wicklow" or "County Wicklow" at county-level admin boundaries.
fn county_name_pattern(county: &str) -> String {
    let escaped = escape_pattern(county);
    format!("^(County {}|{})$", escaped, escaped)
}

/// Escape regex metacharacters and quotes in user-supplied text before
/// interpolating it into an Overpass `~` filter.
pub fn escape_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^'
            | '$' => {
                out.push('\\');
                out.push(c);
            }
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

/// The union of place/natural/tourism clauses, each suffixed with `scope`
/// (an `(area.x)` or bbox filter) and an optional name filter.
fn place_union(scope: &str, name_filter: &str) -> String {
    format!(
        concat!(
            "(",
            "node[\"place\"~\"{kinds}\"]{name}{scope};",
            "way[\"place\"~\"{kinds}\"]{name}{scope};",
            "relation[\"place\"~\"{kinds}\"]{name}{scope};",
            "node[\"natural\"~\"{natural}\"][\"name\"]{name}{scope};",
            "node[\"tourism\"~\"{tourism}\"][\"name\"]{name}{scope};",
            ");"
        ),
        kinds = SETTLEMENT_KINDS,
        natural = NATURAL_KINDS,
        tourism = TOURISM_KINDS,
        name = name_filter,
        scope = scope,
    )
}

/// Query the settlements and notable features inside a named county area.
///
/// Resolves an administrative area matching the county name (with or
/// without the "County " prefix) at admin level 6 or 7, then lists places
/// inside it with center coordinates for non-point geometries.
pub fn build_area_query(county: &str) -> String {
    debug_assert!(!county.trim().is_empty());
    format!(
        "{}area[\"name\"~\"{}\"][\"admin_level\"~\"^(6|7)$\"]->.county;{}out center;",
        PROLOGUE,
        county_name_pattern(county),
        place_union("(area.county)", ""),
    )
}

/// Same place filter as [`build_area_query`], scoped to an explicit
/// rectangle. Used when the named-area strategy comes back sparse or the
/// area lookup itself had to be resolved from bounds.
pub fn build_bounding_box_query(bounds: &BoundingBox, county: &str) -> String {
    debug_assert!(!county.trim().is_empty());
    format!(
        "{}{}out center;",
        PROLOGUE,
        place_union(&bounds.overpass_filter(), ""),
    )
}

/// Bounding-box query with a case-insensitive name-pattern filter, for
/// search-as-you-type.
pub fn build_search_query(bounds: &BoundingBox, text: &str) -> String {
    debug_assert!(!text.trim().is_empty());
    let name_filter = format!("[\"name\"~\"{}\",i]", escape_pattern(text));
    format!(
        "{}{}out center;",
        PROLOGUE,
        place_union(&bounds.overpass_filter(), &name_filter),
    )
}

/// Fetch only the county boundary's own geometry, to derive a bounding box
/// when no hardcoded entry exists.
pub fn build_county_area_resolution_query(county: &str) -> String {
    debug_assert!(!county.trim().is_empty());
    format!(
        "{}relation[\"boundary\"=\"administrative\"][\"admin_level\"~\"^(6|7)$\"][\"name\"~\"{}\"];out geom;",
        PROLOGUE,
        county_name_pattern(county),
    )
}
