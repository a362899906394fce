//! Catalog data model and the client for the catalog service.
//!
//! - [`taxonomy`]: the static category and language tables
//! - [`video`]: the `Video` record as delivered by the service
//! - [`client`]: `CatalogClient`, the only code that talks to the network

mod client;
mod taxonomy;
mod video;

pub use client::{CatalogClient, CatalogError, ErrorKind, HealthReport, DEFAULT_TIMEOUT};
pub use taxonomy::{
    category_by_slug, default_category, language_by_slug, Category, CategoryKind, Language,
    CATEGORIES, DEFAULT_CATEGORY, LANGUAGES, LANGUAGE_HUB,
};
pub use video::{compact_count, Video};
