//! Geodata resolution client for the uniform exchange.
//!
//! Resolves Irish county boundaries and town/locality names against a
//! public Overpass-compatible provider, with request spacing, bounded
//! retries on throttling, and TTL caching so the provider is queried as
//! rarely as possible.

pub mod cache;
pub mod counties;
pub mod places;
pub mod query;
pub mod rate_gate;
pub mod resolver;
pub mod retry;
pub mod types;

pub use counties::county_names;
pub use resolver::{GeoResolver, SPARSE_RESULT_THRESHOLD};
pub use retry::{HttpTransport, Transport};
pub use types::{BoundingBox, GeoError, PlaceEntry, PlaceKind};
