//! Eirelocate — Irish geodata resolution for the school uniform exchange.
//!
//! The marketplace itself (listings, accounts, email) lives elsewhere and
//! calls into this crate for two things: county bounding boxes and the
//! towns/places inside a county. Both come from a rate-limited public
//! Overpass provider, so the [`geo`] module wraps every call in a request
//! gate, a 429 retry loop, and a TTL cache, and degrades to empty results
//! when the provider is down.

pub mod geo;
pub mod server;
