//! Response models for the Harvard Art Museums API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from talking to the museum API.
///
/// `Network`, `Status` and `Decode` are all treated as transient by the
/// artwork fetch loop; `Exhausted` is what the caller sees once the attempt
/// budget is spent.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid API response: {0}")]
    Decode(String),

    #[error("Failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<ApiError> },
}

/// Paging block of every `{info, records}` envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub totalrecordsperquery: u32,
    #[serde(default)]
    pub totalrecords: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub page: u32,
}

/// Envelope with undecoded records, so one bad record does not sink the page.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEnvelope {
    pub info: PageInfo,
    pub records: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub primaryimageurl: Option<String>,
    pub labeltext: Option<String>,
    pub commentary: Option<String>,
    pub period: Option<String>,
    pub medium: Option<String>,
    pub technique: Option<String>,
    pub culture: Option<String>,
    pub classification: Option<String>,
    pub dated: Option<String>,
    pub department: Option<String>,
    pub images: Option<Vec<ArtworkImage>>,
    pub people: Option<Vec<Person>>,
    pub places: Option<Vec<Place>>,
}

impl Artwork {
    pub fn image_url(&self) -> Option<&str> {
        self.primaryimageurl
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub fn has_primary_image(&self) -> bool {
        self.image_url().is_some()
    }

    /// Description, label text and commentary joined by blank lines.
    pub fn full_description(&self) -> String {
        [&self.description, &self.labeltext, &self.commentary]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtworkImage {
    pub baseimageurl: Option<String>,
    pub iiifbaseuri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// A place attached to an artwork (creation place, find spot, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(alias = "id")]
    pub placeid: i64,
    pub displayname: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub confidence: Option<String>,
    #[serde(default, alias = "geo")]
    pub centroid: Option<Centroid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
}

/// One decoded page of the object listing, after filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtworkPage {
    pub info: PageInfo,
    pub records: Vec<Artwork>,
    /// Records dropped for a missing image or a failed decode.
    pub skipped: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CultureRecord {
    pub name: String,
}

/// Result of a place detail lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub id: i64,
    pub name: Option<String>,
    #[serde(default)]
    pub geo: Option<Centroid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artwork(json: &str) -> Artwork {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_artwork() {
        let a = artwork(r#"{"id": 7, "title": "Untitled"}"#);
        assert_eq!(a.id, 7);
        assert!(a.culture.is_none());
        assert!(!a.has_primary_image());
        assert_eq!(a.full_description(), "");
    }

    #[test]
    fn test_missing_title_fails() {
        assert!(serde_json::from_str::<Artwork>(r#"{"id": 7}"#).is_err());
    }

    #[test]
    fn test_full_description_skips_absent_parts() {
        let a = artwork(
            r#"{"id": 1, "title": "T", "description": "Desc", "labeltext": null, "commentary": "Comm"}"#,
        );
        assert_eq!(a.full_description(), "Desc\n\nComm");
    }

    #[test]
    fn test_blank_image_url_is_no_image() {
        let a = artwork(r#"{"id": 1, "title": "T", "primaryimageurl": "  "}"#);
        assert!(!a.has_primary_image());
    }

    #[test]
    fn test_place_with_and_without_centroid() {
        let a = artwork(
            r#"{"id": 1, "title": "T", "places": [
                {"placeid": 2028220, "displayname": "Boston, Massachusetts", "type": "Creation Place", "confidence": "0"},
                {"id": 5, "geo": {"lat": 35.0, "lon": 135.7}}
            ]}"#,
        );
        let places = a.places.unwrap();
        assert_eq!(places[0].place_type.as_deref(), Some("Creation Place"));
        assert!(places[0].centroid.is_none());
        assert_eq!(places[1].placeid, 5);
        assert_eq!(places[1].centroid, Some(Centroid { latitude: 35.0, longitude: 135.7 }));
    }

    #[test]
    fn test_page_info_defaults() {
        let info: PageInfo = serde_json::from_str(r#"{"totalrecords": 12}"#).unwrap();
        assert_eq!(info.totalrecords, 12);
        assert_eq!(info.pages, 0);
    }
}
