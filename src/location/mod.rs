//! Place geocoding for artwork maps.
//!
//! Resolves free-text place names through a built-in table first and an
//! external geocoder second, and derives map pins for an artwork's places.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{builtin_lookup, Geocoder, NominatimGeocoder};
pub use resolver::PlaceResolver;
pub use types::{Coordinate, GeocodeError, GeocodeSource, GeocodeStatus, MapPin};
