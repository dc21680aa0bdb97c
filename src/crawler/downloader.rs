//! Resource downloader for images and stylesheets
//!
//! Resources are saved once per local path. A file already on disk is reused
//! without a request, so every page referencing the same image shares one
//! download. Failures never fail the page: the caller keeps the absolute URL.

use crate::markup::rewrite_css_urls;
use crate::storage::{resource_file_name, resource_link, ResourceKind, SiteLayout};
use crate::MirrorError;
use reqwest::Client;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Downloads resources into the site folder of the page referencing them
#[derive(Debug, Clone, Copy)]
pub struct ResourceDownloader<'a> {
    client: &'a Client,
    layout: &'a SiteLayout,
}

impl<'a> ResourceDownloader<'a> {
    pub fn new(client: &'a Client, layout: &'a SiteLayout) -> Self {
        Self { client, layout }
    }

    /// Saves `resource` for `page` and returns the page-relative link to it
    ///
    /// Returns `None` when the download fails; the reason is logged.
    pub async fn download(&self, resource: &Url, page: &Url, kind: ResourceKind) -> Option<String> {
        let dir = self.layout.resource_dir(page, kind);
        let file_name = resource_file_name(resource, kind);
        let path = dir.join(&file_name);
        let link = resource_link(kind, &file_name);

        if tokio::fs::metadata(&path).await.is_ok() {
            tracing::debug!("Already downloaded {}: {}", resource, path.display());
            return Some(link);
        }

        match self.fetch_to(resource, kind, &dir, &path).await {
            Ok(bytes) => {
                tracing::info!(
                    "Downloaded {} {} ({} bytes): {}",
                    kind.dir_name(),
                    resource,
                    bytes,
                    path.display()
                );
                Some(link)
            }
            Err(e) => {
                tracing::warn!("Could not download {} {}: {}", kind.dir_name(), resource, e);
                None
            }
        }
    }

    /// Streams the resource into a `.part` file, then renames it into place
    async fn fetch_to(
        &self,
        resource: &Url,
        kind: ResourceKind,
        dir: &Path,
        path: &Path,
    ) -> Result<u64, MirrorError> {
        tokio::fs::create_dir_all(dir).await?;

        let mut response = self
            .client
            .get(resource.as_str())
            .send()
            .await
            .map_err(|source| MirrorError::Http {
                url: resource.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Status {
                url: resource.to_string(),
                status: status.as_u16(),
            });
        }

        let partial = path.with_file_name(format!(
            "{}.part",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        ));

        let written = match kind {
            ResourceKind::Stylesheet => {
                let text = response.text().await.map_err(|source| MirrorError::Http {
                    url: resource.to_string(),
                    source,
                })?;
                let css = rewrite_css_urls(&text, resource);
                write_file(&partial, css.as_bytes()).await?;
                css.len() as u64
            }
            ResourceKind::Image => {
                let mut file = tokio::fs::File::create(&partial).await?;
                let mut written = 0u64;
                loop {
                    let chunk = match response.chunk().await {
                        Ok(Some(chunk)) => chunk,
                        Ok(None) => break,
                        Err(source) => {
                            drop(file);
                            discard(&partial).await;
                            return Err(MirrorError::Http {
                                url: resource.to_string(),
                                source,
                            });
                        }
                    };
                    if let Err(e) = file.write_all(&chunk).await {
                        drop(file);
                        discard(&partial).await;
                        return Err(e.into());
                    }
                    written += chunk.len() as u64;
                }
                file.flush().await?;
                written
            }
        };

        if let Err(e) = tokio::fs::rename(&partial, path).await {
            discard(&partial).await;
            return Err(e.into());
        }

        Ok(written)
    }
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), MirrorError> {
    if let Err(e) = tokio::fs::write(path, contents).await {
        discard(path).await;
        return Err(e.into());
    }
    Ok(())
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!("Could not remove partial file {}: {}", path.display(), e);
    }
}
