//! Core types for geocoding and map pins.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::api::Centroid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl From<Centroid> for Coordinate {
    fn from(c: Centroid) -> Self {
        Self::new(c.latitude, c.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}\u{00B0} {}, {:.4}\u{00B0} {}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// How a coordinate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeSource {
    /// Centroid shipped with the artwork record.
    Centroid,
    /// Museum API place lookup.
    PlaceLookup,
    /// Built-in place table.
    Builtin,
    /// External geocoding service.
    Geocoder,
}

impl fmt::Display for GeocodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Centroid => write!(f, "Centroid"),
            Self::PlaceLookup => write!(f, "Place lookup"),
            Self::Builtin => write!(f, "Built-in"),
            Self::Geocoder => write!(f, "Geocoder"),
        }
    }
}

/// Outcome of resolving a free-text place name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeStatus {
    Found {
        query: String,
        coordinate: Coordinate,
        source: GeocodeSource,
    },
    NotFound {
        query: String,
        message: String,
    },
}

impl GeocodeStatus {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Found { coordinate, .. } => Some(*coordinate),
            Self::NotFound { .. } => None,
        }
    }
}

/// A map annotation derived from one of an artwork's places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPin {
    pub place_id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_type: Option<String>,
    pub coordinate: Coordinate,
    pub source: GeocodeSource,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),
}
