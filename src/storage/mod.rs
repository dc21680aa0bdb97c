//! Storage module for the mirrored site on disk
//!
//! This module handles everything about where things are saved:
//! - Deterministic, sanitized names derived from URLs
//! - The per-host folder layout below the storage root
//! - Relative links between saved pages and resources

mod layout;
mod naming;

pub use layout::{relative_page_link, resource_link, SiteLayout};
pub use naming::{folder_name, page_file_name, resource_file_name, sanitize, ResourceKind};
