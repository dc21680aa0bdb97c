//! Crawler coordinator - main mirror orchestration logic
//!
//! A mirror runs in two phases:
//! 1. Crawl: pages are fetched depth first from an explicit work list,
//!    rewritten, saved, and their in-domain links scheduled one level deeper
//! 2. Localize: once the work list has drained, links between saved pages
//!    are rewritten to relative paths
//!
//! The seed page is the only one whose failure fails the run. Any other page
//! that cannot be fetched or saved is logged and its branch dropped.

use crate::config::{validate, Config};
use crate::crawler::downloader::ResourceDownloader;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::localizer::{localize_saved_pages, LocalizeStats};
use crate::markup::{collect_resources, decode_reference, extract_page, ResourceMap};
use crate::state::VisitedSet;
use crate::storage::SiteLayout;
use crate::url::{parse_seed, resolve_reference, without_fragment};
use crate::{MarkupError, MirrorError};
use reqwest::Client;
use std::collections::HashSet;
use std::path::PathBuf;
use url::Url;

/// A page waiting to be visited
#[derive(Debug, Clone)]
struct QueuedPage {
    url: Url,
    depth: u32,
}

/// Outcome of the crawl phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched and saved
    pub pages_saved: usize,
    /// Pages that could not be fetched, rewritten or saved
    pub pages_failed: usize,
}

/// Summary of a complete mirror run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorReport {
    /// Storage root the site was saved under
    pub root: PathBuf,
    pub crawl: CrawlStats,
    pub localize: LocalizeStats,
}

/// Main mirror structure
///
/// Owns everything one mirror run needs: the HTTP client, the storage layout
/// and the crawl state. The state is plain data because pages are processed
/// one at a time.
pub struct Mirror {
    config: Config,
    client: Client,
    layout: SiteLayout,
    visited: VisitedSet,
    failed: HashSet<String>,
}

impl Mirror {
    /// Creates a new mirror instance
    ///
    /// # Arguments
    ///
    /// * `config` - The mirror configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Mirror)` - Ready to run
    /// * `Err(MirrorError)` - The configuration is invalid or the HTTP client
    ///   could not be built
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        validate(&config)?;

        let client = build_http_client(config.request_timeout())?;
        let layout = SiteLayout::new(config.output.root_dir.clone());

        Ok(Self {
            config,
            client,
            layout,
            visited: VisitedSet::new(),
            failed: HashSet::new(),
        })
    }

    /// Pages saved so far
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn layout(&self) -> &SiteLayout {
        &self.layout
    }

    /// Mirrors the site starting at `seed`: crawl, then localize
    ///
    /// # Returns
    ///
    /// * `Ok(MirrorReport)` - The seed page was saved; other failures, if
    ///   any, are counted in the report
    /// * `Err(MirrorError)` - The seed URL is invalid or the seed page could
    ///   not be fetched, rewritten or saved
    pub async fn run(&mut self, seed: &str) -> Result<MirrorReport, MirrorError> {
        let seed = parse_seed(seed)?;

        tracing::info!(
            "Mirroring {} (max depth {}) into {}",
            seed,
            self.config.crawler.max_depth,
            self.layout.root().display()
        );

        let crawl = self.crawl(&seed).await?;
        let localize = self.localize().await;

        tracing::info!(
            "Mirror complete: {} pages saved, {} skipped, {} links localized",
            crawl.pages_saved,
            crawl.pages_failed,
            localize.links_localized
        );

        Ok(MirrorReport {
            root: self.layout.root().to_path_buf(),
            crawl,
            localize,
        })
    }

    /// Crawl phase: visits pages until the work list is empty
    ///
    /// Children are pushed in reverse so they pop in document order, giving
    /// the same pre-order as a recursive depth-first walk.
    pub async fn crawl(&mut self, seed: &Url) -> Result<CrawlStats, MirrorError> {
        let max_depth = self.config.crawler.max_depth;
        let mut stats = CrawlStats::default();
        let mut work = vec![QueuedPage {
            url: without_fragment(seed),
            depth: 0,
        }];

        while let Some(page) = work.pop() {
            if page.depth > max_depth || self.is_settled(&page.url) {
                continue;
            }

            tracing::info!("Processing URL (depth {}): {}", page.depth, page.url);

            match self.visit(&page.url).await {
                Ok(links) => {
                    stats.pages_saved += 1;

                    let child_depth = page.depth + 1;
                    if child_depth > max_depth {
                        continue;
                    }

                    for link in links.into_iter().rev() {
                        if !self.is_settled(&link) {
                            work.push(QueuedPage {
                                url: link,
                                depth: child_depth,
                            });
                        }
                    }
                }
                Err(e) => {
                    stats.pages_failed += 1;
                    self.failed.insert(page.url.to_string());

                    if page.depth == 0 {
                        tracing::error!("Failed to mirror seed page {}: {}", page.url, e);
                        return Err(e);
                    }

                    tracing::warn!("Skipping {}: {}", page.url, e);
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} pages saved, {} failed",
            stats.pages_saved,
            stats.pages_failed
        );

        Ok(stats)
    }

    /// Localize phase: rewrites links between every page saved by [`crawl`]
    ///
    /// [`crawl`]: Mirror::crawl
    pub async fn localize(&self) -> LocalizeStats {
        localize_saved_pages(&self.layout, &self.visited).await
    }

    /// True once a page has been saved or has failed in this run
    fn is_settled(&self, url: &Url) -> bool {
        self.visited.contains(url) || self.failed.contains(url.as_str())
    }

    /// Fetches, rewrites and saves one page, returning its in-domain links
    ///
    /// The page is marked visited only after its file is written.
    async fn visit(&mut self, url: &Url) -> Result<Vec<Url>, MirrorError> {
        let body = fetch_page(&self.client, url).await?;

        let markup_error = |source| MirrorError::Markup {
            url: url.to_string(),
            source,
        };

        let resources = self
            .download_resources(&body, url)
            .await
            .map_err(markup_error)?;

        let page = extract_page(&body, url, &resources).map_err(markup_error)?;

        let path = self
            .layout
            .save_page(url, &page.html)
            .await
            .map_err(|source| MirrorError::Save {
                path: self.layout.page_path(url).display().to_string(),
                source,
            })?;

        self.visited.mark(url);
        tracing::info!("Saved: {}", path.display());

        Ok(page.links)
    }

    /// Downloads the images and stylesheets of a page
    ///
    /// Each raw reference maps to its local link, or to its absolute URL when
    /// the download failed. Unresolvable references get no entry and stay as
    /// written.
    async fn download_resources(&self, html: &str, page: &Url) -> Result<ResourceMap, MarkupError> {
        let downloader = ResourceDownloader::new(&self.client, &self.layout);
        let mut resources = ResourceMap::new();

        for resource in collect_resources(html)? {
            let reference = decode_reference(&resource.reference);
            let absolute = match resolve_reference(page, &reference) {
                Some(url) => url,
                None => continue,
            };

            let replacement = downloader
                .download(&absolute, page, resource.kind)
                .await
                .unwrap_or_else(|| absolute.to_string());

            resources.insert(resource.kind, &resource.reference, replacement);
        }

        Ok(resources)
    }
}
