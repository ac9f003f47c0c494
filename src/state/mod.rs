//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: where one start URL's traversal currently is
//! - `CrawlContext`: the seen-URL set for one source crawl
//! - `Quota`: the record budget shared by every source in a run
//! - `Throttle`: per-source minimum spacing between outbound requests

mod context;
mod phase;
mod throttle;

// Re-export main types
pub use context::{CrawlContext, Quota};
pub use phase::CrawlPhase;
pub use throttle::Throttle;
