//! Markup processing for mirrored pages
//!
//! One walk over the page ([`rewrite_page`]) serves both passes of a mirror.
//! The pass is chosen by the strategy handed to it:
//!
//! - [`ExtractStrategy`] runs while crawling. Links become absolute and the
//!   in-domain ones are collected; images and stylesheets point at their
//!   downloaded copies; `<style>` blocks get absolute `url(...)`s.
//! - [`LocalizeStrategy`] runs once the crawl is over and turns links to
//!   saved pages into relative paths.

mod css;
mod page;
mod strategy;

pub use css::rewrite_css_urls;
pub use page::{collect_resources, decode_reference, is_stylesheet_link, rewrite_page, ResourceRef};
pub use strategy::{ExtractStrategy, LocalizeStrategy, ResourceMap, RewriteStrategy};

use crate::state::VisitedSet;
use crate::MarkupError;
use url::Url;

/// Output of the extract pass over one page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Rewritten markup, ready to be saved
    pub html: String,
    /// In-domain links, in document order
    pub links: Vec<Url>,
}

/// Runs the extract pass over a page fetched from `base`
///
/// `resources` holds the replacement for each image and stylesheet reference;
/// references missing from it are left as written.
pub fn extract_page(
    html: &str,
    base: &Url,
    resources: &ResourceMap,
) -> Result<ExtractedPage, MarkupError> {
    let mut strategy = ExtractStrategy::new(base, resources);
    let html = rewrite_page(html, &mut strategy)?;

    Ok(ExtractedPage {
        html,
        links: strategy.into_links(),
    })
}

/// Runs the localize pass over a page saved for `base`
///
/// Returns the rewritten markup and the number of links made local.
pub fn localize_page(
    html: &str,
    base: &Url,
    visited: &VisitedSet,
) -> Result<(String, usize), MarkupError> {
    let mut strategy = LocalizeStrategy::new(base, visited);
    let html = rewrite_page(html, &mut strategy)?;

    Ok((html, strategy.localized()))
}
