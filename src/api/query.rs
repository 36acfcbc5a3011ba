//! Query URL construction for the museum API.

use crate::config::ApiSettings;
use crate::filters::AppliedFilters;

/// Cultures requested when the culture facet is "Any", so an unfiltered
/// listing is not dominated by a single collection.
pub const FALLBACK_CULTURES: &[&str] = &[
    "American", "Chinese", "Dutch", "French", "German",
    "Greek", "Italian", "Japanese", "Korean", "Roman",
];

/// Fields projected in object listings.
pub const OBJECT_FIELDS: &[&str] = &[
    "id", "title", "description", "labeltext", "commentary",
    "primaryimageurl", "period", "medium", "technique", "culture",
    "classification", "dated", "department", "images", "people", "places",
];

/// Culture facet listing size.
pub const CULTURE_PAGE_SIZE: u32 = 200;

/// Object listing URL for one applied-filter snapshot.
pub fn build_object_url(api: &ApiSettings, filters: &AppliedFilters) -> String {
    let mut url = format!(
        "{}/object?apikey={}&size={}&hasimage=1&fields={}",
        api.base_url,
        percent_encode(&api.api_key),
        api.page_size,
        percent_encode(&OBJECT_FIELDS.join(",")),
    );

    let culture = match filters.culture() {
        Some(c) => percent_encode(c),
        None => FALLBACK_CULTURES
            .iter()
            .map(|c| percent_encode(c))
            .collect::<Vec<_>>()
            .join("%7C"),
    };
    url.push_str("&culture=");
    url.push_str(&culture);

    if let Some(century) = filters.century() {
        url.push_str("&century=");
        url.push_str(&percent_encode(century));
    }
    if let Some(classification) = filters.classification() {
        url.push_str("&classification=");
        url.push_str(&percent_encode(classification));
    }
    if filters.random {
        url.push_str("&sort=random");
    }
    url
}

pub fn build_culture_url(api: &ApiSettings) -> String {
    format!(
        "{}/culture?apikey={}&size={}",
        api.base_url,
        percent_encode(&api.api_key),
        CULTURE_PAGE_SIZE,
    )
}

pub fn build_place_url(api: &ApiSettings, place_id: i64) -> String {
    format!(
        "{}/place?apikey={}&id={}",
        api.base_url,
        percent_encode(&api.api_key),
        place_id,
    )
}

/// Strip the key from a request URL before it reaches the logs.
pub fn redact_key(url: &str) -> String {
    match url.find("apikey=") {
        Some(start) => {
            let value_start = start + "apikey=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
