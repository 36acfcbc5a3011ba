//! Place resolver: built-in table, external geocoder, museum place lookup.
//!
//! Name flow:  built-in table → external geocoder → not found
//! Pin flow:   record centroid → museum place lookup → name flow

use std::sync::Arc;

use tracing::{debug, warn};

use super::providers::{builtin_lookup, Geocoder, NominatimGeocoder};
use super::types::{Coordinate, GeocodeSource, GeocodeStatus, MapPin};
use crate::api::{Artwork, HarvardClient, Place};
use crate::config::Config;

pub const NOT_FOUND_MESSAGE: &str = "Location not found";

#[derive(Clone)]
pub struct PlaceResolver {
    geocoder: Arc<dyn Geocoder>,
    places: Option<HarvardClient>,
}

impl PlaceResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder,
            places: None,
        }
    }

    /// Name-only resolver backed by the configured Nominatim endpoint.
    /// Needs no museum API key.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(NominatimGeocoder::new(
            config.http_agent(),
            config.geocoder_url.clone(),
        )))
    }

    /// Also consult the museum's place endpoint when a place has no centroid.
    pub fn with_place_lookup(mut self, client: HarvardClient) -> Self {
        self.places = Some(client);
        self
    }

    /// Resolve a free-text place name. Never retries, never caches.
    pub fn resolve(&self, query: &str) -> GeocodeStatus {
        let query = query.trim();
        if query.is_empty() {
            return not_found(query, NOT_FOUND_MESSAGE);
        }

        if let Some(coordinate) = builtin_lookup(query) {
            return found(query, coordinate, GeocodeSource::Builtin);
        }

        match self.geocoder.geocode(query) {
            Ok(Some(coordinate)) => found(query, coordinate, GeocodeSource::Geocoder),
            Ok(None) => not_found(query, NOT_FOUND_MESSAGE),
            Err(e) => {
                warn!(query, error = %e, "geocoding failed");
                not_found(query, &format!("{}: {}", NOT_FOUND_MESSAGE, e))
            }
        }
    }

    /// [`resolve`](Self::resolve) on the blocking pool.
    pub async fn resolve_async(&self, query: String) -> GeocodeStatus {
        let resolver = self.clone();
        let fallback = query.clone();
        tokio::task::spawn_blocking(move || resolver.resolve(&query))
            .await
            .unwrap_or_else(|e| not_found(&fallback, &format!("{}: {}", NOT_FOUND_MESSAGE, e)))
    }

    /// Map pin for one artwork place, if any source can place it.
    pub fn pin_for_place(&self, place: &Place) -> Option<MapPin> {
        let (coordinate, source) = self.locate(place)?;
        Some(MapPin {
            place_id: place.placeid,
            title: place
                .displayname
                .clone()
                .unwrap_or_else(|| format!("Place {}", place.placeid)),
            place_type: place.place_type.clone(),
            coordinate,
            source,
        })
    }

    pub fn pins_for_artwork(&self, artwork: &Artwork) -> Vec<MapPin> {
        artwork
            .places
            .iter()
            .flatten()
            .filter_map(|place| self.pin_for_place(place))
            .collect()
    }

    fn locate(&self, place: &Place) -> Option<(Coordinate, GeocodeSource)> {
        if let Some(centroid) = place.centroid {
            return Some((centroid.into(), GeocodeSource::Centroid));
        }

        if let Some(client) = &self.places {
            match client.fetch_place(place.placeid) {
                Ok(Some(detail)) => {
                    if let Some(geo) = detail.geo {
                        return Some((geo.into(), GeocodeSource::PlaceLookup));
                    }
                }
                Ok(None) => debug!(place_id = place.placeid, "place unknown to museum API"),
                Err(e) => debug!(place_id = place.placeid, error = %e, "place lookup failed"),
            }
        }

        let name = place.displayname.as_deref()?;
        match self.resolve(name) {
            GeocodeStatus::Found { coordinate, source, .. } => Some((coordinate, source)),
            GeocodeStatus::NotFound { .. } => None,
        }
    }
}

fn found(query: &str, coordinate: Coordinate, source: GeocodeSource) -> GeocodeStatus {
    GeocodeStatus::Found {
        query: query.to_string(),
        coordinate,
        source,
    }
}

fn not_found(query: &str, message: &str) -> GeocodeStatus {
    GeocodeStatus::NotFound {
        query: query.to_string(),
        message: message.to_string(),
    }
}
