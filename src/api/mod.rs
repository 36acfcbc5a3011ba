//! Harvard Art Museums API: models, query construction and the retrying client.

pub mod client;
pub mod query;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{decode_artwork_page, HarvardClient, Transport, UreqTransport};
pub use query::{build_object_url, percent_encode, FALLBACK_CULTURES};
pub use types::{ApiError, Artwork, ArtworkImage, ArtworkPage, Centroid, PageInfo, Person, Place, PlaceDetail};
