//! Per-URL indexing status: coverage states, cached records, staleness policy

mod coverage;
mod record;

pub use coverage::CoverageState;
pub use record::{bucket_by_status, should_recheck, StatusCache, UrlStatusRecord};
