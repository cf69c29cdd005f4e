//! Remote Google API surfaces
//!
//! Three collaborators, each a thin call built on the resilient fetch layer:
//! - sitemap discovery (Search Console sitemap list + sitemap XML fetch)
//! - per-URL inspection (coverage state lookup)
//! - the Indexing API (publish metadata query + submission)

mod indexing;
mod inspection;
mod sitemaps;

pub use indexing::{get_publish_metadata, request_indexing};
pub use inspection::get_page_indexing_status;
pub use sitemaps::get_sitemap_pages;
