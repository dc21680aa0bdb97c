//! Second pass: relative links between saved pages
//!
//! Only once the crawl has finished is it known which pages exist on disk, so
//! links are localized in a separate pass over every visited page.

use crate::markup::localize_page;
use crate::state::VisitedSet;
use crate::storage::SiteLayout;
use crate::MirrorError;
use url::Url;

/// Outcome of the localization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalizeStats {
    /// Pages rewritten in place
    pub pages_rewritten: usize,
    /// Pages that could not be read, rewritten or written back
    pub pages_failed: usize,
    /// Links turned into relative paths across all pages
    pub links_localized: usize,
}

/// Rewrites the links of every visited page to point at saved pages
///
/// Pages are processed in no particular order; each rewrite only reads the
/// visited set, so the order does not affect the result. A page that fails is
/// logged and skipped.
pub async fn localize_saved_pages(layout: &SiteLayout, visited: &VisitedSet) -> LocalizeStats {
    tracing::info!("Updating links in {} saved pages", visited.len());

    let mut stats = LocalizeStats::default();
    let pages: Vec<Url> = visited.urls().collect();

    for page in pages {
        match localize_saved_page(layout, visited, &page).await {
            Ok(links) => {
                stats.pages_rewritten += 1;
                stats.links_localized += links;
                tracing::debug!(
                    "Localized {} links in {}",
                    links,
                    layout.page_path(&page).display()
                );
            }
            Err(e) => {
                stats.pages_failed += 1;
                tracing::warn!("Could not update links for {}: {}", page, e);
            }
        }
    }

    tracing::info!(
        "Link update finished: {} pages, {} links localized, {} failures",
        stats.pages_rewritten,
        stats.links_localized,
        stats.pages_failed
    );

    stats
}

async fn localize_saved_page(
    layout: &SiteLayout,
    visited: &VisitedSet,
    page: &Url,
) -> Result<usize, MirrorError> {
    let path = layout.page_path(page);
    let html = layout.load_page(page).await?;

    let (localized, links) =
        localize_page(&html, page, visited).map_err(|source| MirrorError::Markup {
            url: page.to_string(),
            source,
        })?;

    tokio::fs::write(&path, localized)
        .await
        .map_err(|source| MirrorError::Save {
            path: path.display().to_string(),
            source,
        })?;

    Ok(links)
}
