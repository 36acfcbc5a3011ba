//! Geocoding providers: built-in place table and Nominatim.

use serde::Deserialize;
use tracing::debug;

use super::types::{Coordinate, GeocodeError};
use crate::api::percent_encode;

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinPlace {
    names: &'static [&'static str], // lowercase; matched as whole words inside the query
    lat: f64,
    lon: f64,
}

/// Cities come before countries so "Kyoto, Japan" resolves to Kyoto.
/// Within each group, longer names shadow shorter ones they contain.
const BUILTIN_PLACES: &[BuiltinPlace] = &[
    // North America
    BuiltinPlace { names: &["boston"], lat: 42.3601, lon: -71.0589 },
    BuiltinPlace { names: &["cambridge, massachusetts", "cambridge, ma"], lat: 42.3736, lon: -71.1097 },
    BuiltinPlace { names: &["new york", "brooklyn", "manhattan"], lat: 40.7128, lon: -74.0060 },
    BuiltinPlace { names: &["philadelphia"], lat: 39.9526, lon: -75.1652 },
    BuiltinPlace { names: &["washington, d.c.", "washington, dc"], lat: 38.9072, lon: -77.0369 },
    BuiltinPlace { names: &["chicago"], lat: 41.8781, lon: -87.6298 },
    BuiltinPlace { names: &["san francisco"], lat: 37.7749, lon: -122.4194 },
    BuiltinPlace { names: &["los angeles"], lat: 34.0522, lon: -118.2437 },
    BuiltinPlace { names: &["mexico city", "ciudad de méxico", "tenochtitlan"], lat: 19.4326, lon: -99.1332 },
    // South America
    BuiltinPlace { names: &["cuzco", "cusco"], lat: -13.5320, lon: -71.9675 },
    BuiltinPlace { names: &["lima, peru"], lat: -12.0464, lon: -77.0428 },
    // Europe
    BuiltinPlace { names: &["london"], lat: 51.5074, lon: -0.1278 },
    BuiltinPlace { names: &["paris"], lat: 48.8566, lon: 2.3522 },
    BuiltinPlace { names: &["rome"], lat: 41.9028, lon: 12.4964 },
    BuiltinPlace { names: &["florence", "firenze"], lat: 43.7696, lon: 11.2558 },
    BuiltinPlace { names: &["venice", "venezia"], lat: 45.4408, lon: 12.3155 },
    BuiltinPlace { names: &["naples", "napoli"], lat: 40.8518, lon: 14.2681 },
    BuiltinPlace { names: &["milan", "milano"], lat: 45.4642, lon: 9.1900 },
    BuiltinPlace { names: &["siena"], lat: 43.3188, lon: 11.3308 },
    BuiltinPlace { names: &["madrid"], lat: 40.4168, lon: -3.7038 },
    BuiltinPlace { names: &["seville", "sevilla"], lat: 37.3891, lon: -5.9845 },
    BuiltinPlace { names: &["lisbon", "lisboa"], lat: 38.7223, lon: -9.1393 },
    BuiltinPlace { names: &["amsterdam"], lat: 52.3676, lon: 4.9041 },
    BuiltinPlace { names: &["haarlem"], lat: 52.3874, lon: 4.6462 },
    BuiltinPlace { names: &["delft"], lat: 52.0116, lon: 4.3571 },
    BuiltinPlace { names: &["utrecht"], lat: 52.0907, lon: 5.1214 },
    BuiltinPlace { names: &["antwerp", "antwerpen"], lat: 51.2194, lon: 4.4025 },
    BuiltinPlace { names: &["brussels", "bruxelles"], lat: 50.8503, lon: 4.3517 },
    BuiltinPlace { names: &["berlin"], lat: 52.5200, lon: 13.4050 },
    BuiltinPlace { names: &["munich", "münchen"], lat: 48.1351, lon: 11.5820 },
    BuiltinPlace { names: &["nuremberg", "nürnberg"], lat: 49.4521, lon: 11.0767 },
    BuiltinPlace { names: &["dresden"], lat: 51.0504, lon: 13.7373 },
    BuiltinPlace { names: &["vienna", "wien"], lat: 48.2082, lon: 16.3738 },
    BuiltinPlace { names: &["prague", "praha"], lat: 50.0755, lon: 14.4378 },
    BuiltinPlace { names: &["basel"], lat: 47.5596, lon: 7.5886 },
    BuiltinPlace { names: &["zurich", "zürich"], lat: 47.3769, lon: 8.5417 },
    BuiltinPlace { names: &["copenhagen"], lat: 55.6761, lon: 12.5683 },
    BuiltinPlace { names: &["stockholm"], lat: 59.3293, lon: 18.0686 },
    BuiltinPlace { names: &["st. petersburg", "saint petersburg"], lat: 59.9311, lon: 30.3609 },
    BuiltinPlace { names: &["moscow"], lat: 55.7558, lon: 37.6173 },
    BuiltinPlace { names: &["athens"], lat: 37.9838, lon: 23.7275 },
    BuiltinPlace { names: &["istanbul", "constantinople"], lat: 41.0082, lon: 28.9784 },
    // Africa and Western Asia
    BuiltinPlace { names: &["cairo"], lat: 30.0444, lon: 31.2357 },
    BuiltinPlace { names: &["alexandria"], lat: 31.2001, lon: 29.9187 },
    BuiltinPlace { names: &["luxor", "thebes"], lat: 25.6872, lon: 32.6396 },
    BuiltinPlace { names: &["jerusalem"], lat: 31.7683, lon: 35.2137 },
    BuiltinPlace { names: &["damascus"], lat: 33.5138, lon: 36.2765 },
    BuiltinPlace { names: &["baghdad"], lat: 33.3152, lon: 44.3661 },
    BuiltinPlace { names: &["isfahan", "esfahan"], lat: 32.6546, lon: 51.6680 },
    BuiltinPlace { names: &["tehran"], lat: 35.6892, lon: 51.3890 },
    // South and East Asia
    BuiltinPlace { names: &["delhi"], lat: 28.6139, lon: 77.2090 },
    BuiltinPlace { names: &["agra"], lat: 27.1767, lon: 78.0081 },
    BuiltinPlace { names: &["mumbai", "bombay"], lat: 19.0760, lon: 72.8777 },
    BuiltinPlace { names: &["beijing", "peking"], lat: 39.9042, lon: 116.4074 },
    BuiltinPlace { names: &["shanghai"], lat: 31.2304, lon: 121.4737 },
    BuiltinPlace { names: &["nanjing"], lat: 32.0603, lon: 118.7969 },
    BuiltinPlace { names: &["hangzhou"], lat: 30.2741, lon: 120.1551 },
    BuiltinPlace { names: &["xi'an", "xian"], lat: 34.3416, lon: 108.9398 },
    BuiltinPlace { names: &["jingdezhen"], lat: 29.2689, lon: 117.1781 },
    BuiltinPlace { names: &["kyoto"], lat: 35.0116, lon: 135.7681 },
    BuiltinPlace { names: &["tokyo"], lat: 35.6762, lon: 139.6503 },
    BuiltinPlace { names: &["osaka"], lat: 34.6937, lon: 135.5023 },
    BuiltinPlace { names: &["seoul"], lat: 37.5665, lon: 126.9780 },
    // Countries
    BuiltinPlace { names: &["japan"], lat: 36.2048, lon: 138.2529 },
    BuiltinPlace { names: &["china"], lat: 35.8617, lon: 104.1954 },
    BuiltinPlace { names: &["korea"], lat: 36.5, lon: 127.9 },
    BuiltinPlace { names: &["egypt"], lat: 26.8206, lon: 30.8025 },
    BuiltinPlace { names: &["greece"], lat: 39.0742, lon: 21.8243 },
    BuiltinPlace { names: &["italy"], lat: 41.8719, lon: 12.5674 },
    BuiltinPlace { names: &["france"], lat: 46.2276, lon: 2.2137 },
    BuiltinPlace { names: &["england", "united kingdom"], lat: 52.3555, lon: -1.1743 },
    BuiltinPlace { names: &["netherlands", "holland"], lat: 52.1326, lon: 5.2913 },
    BuiltinPlace { names: &["germany"], lat: 51.1657, lon: 10.4515 },
    BuiltinPlace { names: &["spain"], lat: 40.4637, lon: -3.7492 },
    BuiltinPlace { names: &["iran", "persia"], lat: 32.4279, lon: 53.6880 },
    BuiltinPlace { names: &["peru"], lat: -9.19, lon: -75.0152 },
];

/// First built-in entry with a name contained (case-insensitively) in `query`.
///
/// A name only counts when it is not glued to letters or digits on either
/// side, so "Romania" does not hit "roma" and "Tirana" does not hit "iran".
pub fn builtin_lookup(query: &str) -> Option<Coordinate> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }

    BUILTIN_PLACES
        .iter()
        .find(|place| place.names.iter().any(|name| contains_word(&q, name)))
        .map(|place| Coordinate::new(place.lat, place.lon))
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Number of entries in the built-in table.
pub fn builtin_place_count() -> usize {
    BUILTIN_PLACES.len()
}

// ─── External geocoder ──────────────────────────────────────────

/// A free-text geocoding service. `Ok(None)` means the service answered
/// but knows no such place.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError>;
}

#[derive(Deserialize, Debug, Clone)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim search, first result only.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(agent: ureq::Agent, endpoint: impl Into<String>) -> Self {
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&format=json&limit=1&addressdetails=0",
            self.endpoint,
            percent_encode(query)
        )
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let url = self.search_url(query);
        debug!(%url, "geocoding");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        first_coordinate(&results)
    }
}

fn first_coordinate(results: &[NominatimResult]) -> Result<Option<Coordinate>, GeocodeError> {
    let Some(first) = results.first() else {
        return Ok(None);
    };
    let lat: f64 = first
        .lat
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad latitude '{}'", first.lat)))?;
    let lon: f64 = first
        .lon
        .parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad longitude '{}'", first.lon)))?;
    debug!(name = first.display_name.as_deref().unwrap_or("?"), lat, lon, "geocoder hit");
    Ok(Some(Coordinate::new(lat, lon)))
}
