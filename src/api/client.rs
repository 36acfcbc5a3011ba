//! Blocking client for the Harvard Art Museums API.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::query::{build_culture_url, build_object_url, build_place_url, redact_key};
use super::types::{ApiError, ArtworkPage, CultureRecord, PlaceDetail, RawEnvelope};
use crate::config::ApiSettings;
use crate::filters::AppliedFilters;

/// Performs a single HTTP GET and returns the body.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<String, ApiError>;
}

/// Production transport over a shared `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<String, ApiError> {
        match self.agent.get(url).call() {
            Ok(response) => response
                .into_string()
                .map_err(|e| ApiError::Network(e.to_string())),
            Err(ureq::Error::Status(status, response)) => Err(ApiError::Status {
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(e) => Err(ApiError::Network(e.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct HarvardClient {
    settings: ApiSettings,
    transport: Arc<dyn Transport>,
}

impl HarvardClient {
    pub fn new(settings: ApiSettings, transport: Arc<dyn Transport>) -> Self {
        Self { settings, transport }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Fetch one page of artworks for `filters`.
    ///
    /// Network and decode failures are retried immediately, up to
    /// `max_attempts` attempts in total. Records without a primary image are
    /// dropped from the page.
    pub fn fetch_artworks(&self, filters: &AppliedFilters) -> Result<ArtworkPage, ApiError> {
        let url = build_object_url(&self.settings, filters);
        let max_attempts = self.settings.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            debug!(attempt, url = %redact_key(&url), "fetching artworks");
            match self.transport.get(&url).and_then(|body| decode_artwork_page(&body)) {
                Ok(page) => {
                    info!(
                        attempt,
                        count = page.records.len(),
                        skipped = page.skipped,
                        "fetched artworks"
                    );
                    return Ok(page);
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "artwork fetch failed");
                    last_error = Some(e);
                }
            }
        }

        Err(ApiError::Exhausted {
            attempts: max_attempts,
            last: Box::new(last_error.unwrap_or_else(|| ApiError::Network("no attempt made".into()))),
        })
    }

    /// Names from the culture facet listing, in server order.
    pub fn fetch_cultures(&self) -> Result<Vec<String>, ApiError> {
        let url = build_culture_url(&self.settings);
        debug!(url = %redact_key(&url), "fetching cultures");
        let body = self.transport.get(&url)?;
        let envelope: RawEnvelope =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        let names = envelope
            .records
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<CultureRecord>(value) {
                Ok(record) => Some(record.name),
                Err(e) => {
                    debug!(error = %e, "skipping culture record");
                    None
                }
            })
            .collect();
        Ok(names)
    }

    /// Place detail lookup. `Ok(None)` when the API knows no such place.
    pub fn fetch_place(&self, place_id: i64) -> Result<Option<PlaceDetail>, ApiError> {
        let url = build_place_url(&self.settings, place_id);
        debug!(url = %redact_key(&url), "fetching place");
        let body = self.transport.get(&url)?;
        let envelope: RawEnvelope =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        match envelope.records.into_iter().next() {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ApiError::Decode(e.to_string())),
            None => Ok(None),
        }
    }
}

/// Decode an object listing, dropping records that fail to decode or lack a
/// primary image. A malformed envelope is an error.
pub fn decode_artwork_page(body: &str) -> Result<ArtworkPage, ApiError> {
    let envelope: RawEnvelope =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    let mut records = Vec::with_capacity(envelope.records.len());
    let mut skipped = 0;
    for value in envelope.records {
        match serde_json::from_value::<super::Artwork>(value) {
            Ok(artwork) if artwork.has_primary_image() => records.push(artwork),
            Ok(artwork) => {
                debug!(id = artwork.id, "dropping artwork without primary image");
                skipped += 1;
            }
            Err(e) => {
                warn!(error = %e, "dropping undecodable artwork record");
                skipped += 1;
            }
        }
    }

    Ok(ArtworkPage {
        info: envelope.info,
        records,
        skipped,
    })
}
