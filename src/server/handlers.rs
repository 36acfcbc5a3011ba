use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::Artwork;
use crate::culture::load_cultures;
use crate::explorer::ExplorerState;
use crate::filters::{AppliedFilters, FilterEvent, FilterSelection, CENTURIES, CLASSIFICATIONS};
use crate::location::{GeocodeStatus, MapPin};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: u16,
}

pub struct HttpError(StatusCode, String);

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn http_error(status: StatusCode, msg: impl Into<String>) -> HttpError {
    HttpError(status, msg.into())
}

fn artwork_or_404(state: &AppState, id: i64) -> Result<Artwork, HttpError> {
    state
        .explorer
        .snapshot()
        .artwork(id)
        .cloned()
        .ok_or_else(|| http_error(StatusCode::NOT_FOUND, format!("Artwork {} is not in the current list", id)))
}

// ─── Artworks ────────────────────────────────────────────────────

pub async fn artworks(State(state): State<Arc<AppState>>) -> Json<ExplorerState> {
    Json(state.explorer.snapshot())
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> StatusCode {
    state.explorer.refresh();
    StatusCode::ACCEPTED
}

#[derive(Serialize)]
pub struct ArtworkDetail {
    #[serde(flatten)]
    pub artwork: Artwork,
    pub full_description: String,
    pub image_url: Option<String>,
}

pub async fn artwork_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ArtworkDetail>, HttpError> {
    let artwork = artwork_or_404(&state, id)?;
    Ok(Json(ArtworkDetail {
        full_description: artwork.full_description(),
        image_url: artwork.image_url().map(str::to_string),
        artwork,
    }))
}

pub async fn artwork_pins(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<MapPin>>, HttpError> {
    let artwork = artwork_or_404(&state, id)?;
    let places = state.places.clone();
    let pins = tokio::task::spawn_blocking(move || places.pins_for_artwork(&artwork))
        .await
        .map_err(|e| {
            error!(error = %e, "pin task failed");
            http_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not resolve places")
        })?;
    Ok(Json(pins))
}

// ─── Filters ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FiltersResponse {
    pub selection: FilterSelection,
    pub applied: Option<AppliedFilters>,
    pub centuries: &'static [&'static str],
    pub classifications: &'static [&'static str],
}

pub async fn get_filters(State(state): State<Arc<AppState>>) -> Json<FiltersResponse> {
    Json(FiltersResponse {
        selection: state.filters.selection(),
        applied: state.explorer.snapshot().applied().cloned(),
        centuries: CENTURIES,
        classifications: CLASSIFICATIONS,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterUpdate {
    pub culture: Option<String>,
    pub century: Option<String>,
    pub classification: Option<String>,
    pub random: Option<bool>,
    #[serde(default)]
    pub reset: bool,
}

impl FilterUpdate {
    fn into_events(self) -> Vec<FilterEvent> {
        let mut events = Vec::new();
        if self.reset {
            events.push(FilterEvent::Reset);
        }
        events.extend(self.culture.map(FilterEvent::Culture));
        events.extend(self.century.map(FilterEvent::Century));
        events.extend(self.classification.map(FilterEvent::Classification));
        events.extend(self.random.map(FilterEvent::Random));
        events
    }
}

pub async fn update_filters(
    State(state): State<Arc<AppState>>,
    Json(update): Json<FilterUpdate>,
) -> Result<StatusCode, HttpError> {
    let events = update.into_events();
    if events.is_empty() {
        return Err(http_error(StatusCode::BAD_REQUEST, "No filter fields given"));
    }
    for event in events {
        if !state.filters.send(event) {
            return Err(http_error(StatusCode::SERVICE_UNAVAILABLE, "Filter pipeline stopped"));
        }
    }
    Ok(StatusCode::ACCEPTED)
}

pub async fn apply_filters(State(state): State<Arc<AppState>>) -> Result<StatusCode, HttpError> {
    if state.filters.send(FilterEvent::ApplyNow) {
        Ok(StatusCode::ACCEPTED)
    } else {
        Err(http_error(StatusCode::SERVICE_UNAVAILABLE, "Filter pipeline stopped"))
    }
}

// ─── Cultures ────────────────────────────────────────────────────

pub async fn cultures(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, HttpError> {
    let task_state = state.clone();
    let names = tokio::task::spawn_blocking(move || {
        let mut cache = task_state
            .cultures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        load_cultures(&task_state.client, &mut cache)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "culture task failed");
        http_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not load cultures")
    })?;
    info!(count = names.len(), "culture options served");
    Ok(Json(names))
}

// ─── Geocoding ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GeocodeQuery {
    pub q: Option<String>,
}

pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeQuery>,
) -> Result<Json<GeocodeStatus>, HttpError> {
    let query = params.q.as_deref().unwrap_or("").trim().to_string();
    if query.is_empty() {
        return Err(http_error(StatusCode::BAD_REQUEST, "Missing 'q' parameter"));
    }
    Ok(Json(state.places.resolve_async(query).await))
}
