//! On-disk layout of a mirrored site
//!
//! ```text
//! <root>/<host>/<page>.html
//! <root>/<host>/images/<name>.<ext>
//! <root>/<host>/css/<name>.css
//! ```

use crate::storage::naming::{folder_name, page_file_name, ResourceKind};
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// Maps URLs onto files below a storage root
#[derive(Debug, Clone)]
pub struct SiteLayout {
    root: PathBuf,
}

impl SiteLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding all files saved for the URL's host
    pub fn site_dir(&self, url: &Url) -> PathBuf {
        self.root.join(folder_name(url))
    }

    /// File the page for `url` is saved to
    pub fn page_path(&self, url: &Url) -> PathBuf {
        self.site_dir(url).join(page_file_name(url))
    }

    /// Folder holding resources of `kind` referenced from `page`
    pub fn resource_dir(&self, page: &Url, kind: ResourceKind) -> PathBuf {
        self.site_dir(page).join(kind.dir_name())
    }

    /// Writes a page, creating its site folder if needed
    pub async fn save_page(&self, url: &Url, html: &str) -> io::Result<PathBuf> {
        let dir = self.site_dir(url);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(page_file_name(url));
        tokio::fs::write(&path, html).await?;

        Ok(path)
    }

    /// Reads a previously saved page
    pub async fn load_page(&self, url: &Url) -> io::Result<String> {
        tokio::fs::read_to_string(self.page_path(url)).await
    }
}

/// Link from the saved page of `from` to the saved page of `to`
///
/// Pages of the same site share a folder and link as `./name.html`; pages in
/// another site folder link as `../folder/name.html`.
///
/// ```
/// use url::Url;
/// use sumi_mirror::storage::relative_page_link;
///
/// let from = Url::parse("https://a.test/").unwrap();
/// let to = Url::parse("https://a.test/b").unwrap();
/// assert_eq!(relative_page_link(&from, &to), "./b.html");
/// ```
pub fn relative_page_link(from: &Url, to: &Url) -> String {
    let from_folder = folder_name(from);
    let to_folder = folder_name(to);
    let file = link_component(&page_file_name(to));

    if from_folder == to_folder {
        format!("./{}", file)
    } else {
        format!("../{}/{}", link_component(&to_folder), file)
    }
}

/// Link from a page to a resource saved in its site folder
pub fn resource_link(kind: ResourceKind, file_name: &str) -> String {
    format!("./{}/{}", kind.dir_name(), link_component(file_name))
}

/// Escapes `%` so a browser resolving the link finds the literal file name
fn link_component(name: &str) -> String {
    name.replace('%', "%25")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_page_path_layout() {
        let layout = SiteLayout::new("/tmp/root");
        assert_eq!(
            layout.page_path(&parse("https://a.test/b")),
            PathBuf::from("/tmp/root/a.test/b.html")
        );
        assert_eq!(
            layout.page_path(&parse("https://a.test/")),
            PathBuf::from("/tmp/root/a.test/index.html")
        );
    }

    #[test]
    fn test_resource_dir_uses_page_host() {
        let layout = SiteLayout::new("/tmp/root");
        assert_eq!(
            layout.resource_dir(&parse("https://a.test/b"), ResourceKind::Image),
            PathBuf::from("/tmp/root/a.test/images")
        );
        assert_eq!(
            layout.resource_dir(&parse("https://a.test/b"), ResourceKind::Stylesheet),
            PathBuf::from("/tmp/root/a.test/css")
        );
    }

    #[test]
    fn test_relative_link_same_folder() {
        assert_eq!(
            relative_page_link(&parse("https://a.test/x/y"), &parse("https://a.test/docs/intro")),
            "./docs_intro.html"
        );
    }

    #[test]
    fn test_relative_link_other_folder() {
        assert_eq!(
            relative_page_link(&parse("https://a.test/"), &parse("https://b.test/c")),
            "../b.test/c.html"
        );
    }

    #[test]
    fn test_relative_link_escapes_percent() {
        assert_eq!(
            relative_page_link(&parse("https://a.test/"), &parse("https://a.test/a%20b")),
            "./a%2520b.html"
        );
    }

    #[test]
    fn test_resource_link() {
        assert_eq!(
            resource_link(ResourceKind::Image, "logo.png"),
            "./images/logo.png"
        );
        assert_eq!(
            resource_link(ResourceKind::Stylesheet, "site.css"),
            "./css/site.css"
        );
    }

    #[tokio::test]
    async fn test_save_and_load_page() {
        let dir = TempDir::new().unwrap();
        let layout = SiteLayout::new(dir.path());
        let url = parse("https://a.test/b");

        let path = layout.save_page(&url, "<p>hi</p>").await.unwrap();
        assert_eq!(path, dir.path().join("a.test").join("b.html"));
        assert_eq!(layout.load_page(&url).await.unwrap(), "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_load_missing_page_fails() {
        let dir = TempDir::new().unwrap();
        let layout = SiteLayout::new(dir.path());
        assert!(layout.load_page(&parse("https://a.test/none")).await.is_err());
    }
}
