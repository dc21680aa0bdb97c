//! URL handling module for Sumi-Mirror
//!
//! This module resolves references found in pages to absolute URLs, validates
//! seed URLs, and decides whether two URLs belong to the same site.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::{authority, same_host};
pub use resolve::{looks_local, parse_seed, resolve_reference, without_fragment};
