//! Crawler module for mirroring a site
//!
//! This module contains the mirroring logic, including:
//! - HTTP fetching of pages
//! - Idempotent downloads of images and stylesheets
//! - The depth-bounded crawl over same-host links
//! - The final pass making links between saved pages relative

mod coordinator;
mod downloader;
mod fetcher;
mod localizer;

pub use coordinator::{CrawlStats, Mirror, MirrorReport};
pub use downloader::ResourceDownloader;
pub use fetcher::{build_http_client, fetch_page};
pub use localizer::{localize_saved_pages, LocalizeStats};

use crate::config::Config;
use crate::MirrorError;

/// Runs a complete mirror operation
///
/// This is the main entry point for mirroring a site. It will:
/// 1. Build the HTTP client and storage layout
/// 2. Crawl from the seed, saving pages, images and stylesheets
/// 3. Rewrite links between saved pages to relative paths
///
/// # Arguments
///
/// * `config` - The mirror configuration
/// * `seed` - URL of the first page
///
/// # Returns
///
/// * `Ok(MirrorReport)` - Mirror completed
/// * `Err(MirrorError)` - The seed page could not be mirrored
///
/// # Example
///
/// ```no_run
/// use sumi_mirror::config::Config;
/// use sumi_mirror::crawler::mirror_site;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = mirror_site(Config::new("pages", 2), "https://example.com/").await?;
/// println!("Saved {} pages", report.crawl.pages_saved);
/// # Ok(())
/// # }
/// ```
pub async fn mirror_site(config: Config, seed: &str) -> Result<MirrorReport, MirrorError> {
    let mut mirror = Mirror::new(config)?;
    mirror.run(seed).await
}
