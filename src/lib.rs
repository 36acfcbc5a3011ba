//! Art Explorer: browse and filter the Harvard Art Museums collection.

pub mod api;
pub mod config;
pub mod culture;
pub mod explorer;
pub mod filters;
pub mod location;
pub mod server;
