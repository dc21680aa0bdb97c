//! State module for tracking crawl progress
//!
//! The crawl is strictly sequential, so its state is plain owned data held by
//! the [`Mirror`](crate::crawler::Mirror) driving it.
//!
//! # Components
//!
//! - `VisitedSet`: pages saved so far, used for cycle avoidance and for the
//!   link localization pass

mod visited;

// Re-export main types
pub use visited::VisitedSet;
