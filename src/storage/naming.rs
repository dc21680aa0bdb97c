//! Deterministic file and folder names derived from URLs
//!
//! Every function here is pure: the same URL always yields the same name, and
//! the result is always safe to use as a single path component.

use crate::url::authority;
use url::Url;

/// Characters that are replaced with `_` in file and folder names
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\\', '/'];

/// Returned by [`sanitize`] when nothing usable is left of the input
const FALLBACK_NAME: &str = "page";

/// Folder used for URLs without a host
const UNKNOWN_HOST: &str = "unknown_host";

/// Page name used for the site root
const INDEX_NAME: &str = "index";

/// Kind of a non-HTML resource saved next to the pages of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Stylesheet,
}

impl ResourceKind {
    /// Subfolder of the site folder holding resources of this kind
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Stylesheet => "css",
        }
    }

    /// File stem used when the URL path has no last segment
    pub fn default_stem(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Stylesheet => "style",
        }
    }

    /// Extension appended to names that have none
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Image => "jpg",
            Self::Stylesheet => "css",
        }
    }
}

/// Turns an arbitrary string into a safe file or folder name
///
/// - each of `< > : " | ? * \ /` becomes `_`
/// - runs of `_` collapse into one
/// - leading and trailing `_` are trimmed
/// - an empty or dot-only result becomes `page`
///
/// # Examples
///
/// ```
/// use sumi_mirror::storage::sanitize;
///
/// assert_eq!(sanitize("a:b//c"), "a_b_c");
/// assert_eq!(sanitize("__"), "page");
/// ```
pub fn sanitize(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());

    for c in name.chars() {
        let c = if INVALID_CHARS.contains(&c) { '_' } else { c };
        if c == '_' && cleaned.ends_with('_') {
            continue;
        }
        cleaned.push(c);
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return FALLBACK_NAME.to_string();
    }

    trimmed.to_string()
}

/// Folder holding everything saved for the URL's site
///
/// ```
/// use url::Url;
/// use sumi_mirror::storage::folder_name;
///
/// let url = Url::parse("http://127.0.0.1:8080/a").unwrap();
/// assert_eq!(folder_name(&url), "127.0.0.1_8080");
/// ```
pub fn folder_name(url: &Url) -> String {
    match authority(url) {
        Some(host) if !host.is_empty() => sanitize(&host),
        _ => UNKNOWN_HOST.to_string(),
    }
}

/// File name of the saved page for a URL
///
/// The path (without its leading slash) becomes the name, with internal
/// slashes replaced by `_`. Query and fragment are ignored.
///
/// ```
/// use url::Url;
/// use sumi_mirror::storage::page_file_name;
///
/// let url = Url::parse("https://a.test/docs/intro").unwrap();
/// assert_eq!(page_file_name(&url), "docs_intro.html");
/// ```
pub fn page_file_name(url: &Url) -> String {
    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);

    let stem = if path.is_empty() {
        INDEX_NAME.to_string()
    } else {
        sanitize(&path.replace('/', "_"))
    };

    format!("{}.html", stem)
}

/// File name of a downloaded resource
///
/// Uses the last path segment, falling back to the kind's default stem, and
/// appends the kind's default extension when the name has none. Stylesheets
/// always end in `.css`.
pub fn resource_file_name(url: &Url, kind: ResourceKind) -> String {
    let basename = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .unwrap_or(kind.default_stem());

    let mut name = sanitize(basename);

    if !name.contains('.') {
        name.push('.');
        name.push_str(kind.default_extension());
    }

    if kind == ResourceKind::Stylesheet && !name.ends_with(".css") {
        name.push_str(".css");
    }

    name
}
