use crate::UrlError;
use url::Url;

/// Schemes whose references are never rewritten or followed
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a reference found in a page against the page's URL
///
/// Returns `None` for references that should be left exactly as written:
/// - empty or whitespace-only references
/// - fragment-only references (`#section`)
/// - `javascript:`, `mailto:`, `tel:` and `data:` references
/// - references that fail to parse
/// - anything that does not resolve to an HTTP(S) URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_mirror::url::resolve_reference;
///
/// let base = Url::parse("https://a.test/docs/page").unwrap();
/// let resolved = resolve_reference(&base, "../img/logo.png").unwrap();
/// assert_eq!(resolved.as_str(), "https://a.test/img/logo.png");
/// assert!(resolve_reference(&base, "#top").is_none());
/// ```
pub fn resolve_reference(base: &Url, reference: &str) -> Option<Url> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    let lowered = reference.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    match base.join(reference) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Unresolvable reference {:?} on {}: {}", reference, base, e);
            None
        }
    }
}

/// Returns true for references already rewritten to a local relative path
pub fn looks_local(reference: &str) -> bool {
    reference.starts_with("./") || reference.starts_with("../")
}

/// Returns a copy of the URL with its fragment removed
///
/// Page identity ignores fragments: `/guide#intro` and `/guide` are the
/// same saved page.
pub fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

/// Parses and validates a seed URL
///
/// The seed must be an absolute HTTP(S) URL with a host.
pub fn parse_seed(seed: &str) -> Result<Url, UrlError> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}
