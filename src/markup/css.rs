//! Rewriting of `url(...)` references inside stylesheet text

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;

/// Matches `url(...)` with optional quotes and surrounding whitespace
static CSS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"url\s*\(\s*['"]?([^'")]+)['"]?\s*\)"#).expect("CSS url() pattern is valid")
});

/// Rewrites every relative `url(...)` reference to absolute form
///
/// References are resolved against `stylesheet_url`, the URL the stylesheet
/// was loaded from (or the page URL for inline `<style>` blocks). Data URIs
/// and references that are already absolute are left as written. Referenced
/// resources are not downloaded.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_mirror::markup::rewrite_css_urls;
///
/// let base = Url::parse("https://a.test/static/css/site.css").unwrap();
/// let css = "body { background: url(../img/bg.png); }";
/// assert_eq!(
///     rewrite_css_urls(css, &base),
///     "body { background: url('https://a.test/static/img/bg.png'); }"
/// );
/// ```
pub fn rewrite_css_urls(css: &str, stylesheet_url: &Url) -> String {
    CSS_URL
        .replace_all(css, |caps: &Captures| {
            let whole = &caps[0];
            let reference = caps[1].trim();

            if is_passthrough(reference) {
                return whole.to_string();
            }

            match stylesheet_url.join(reference) {
                Ok(absolute) => format!("url('{}')", absolute),
                Err(e) => {
                    tracing::debug!("Leaving unresolvable CSS reference {:?}: {}", reference, e);
                    whole.to_string()
                }
            }
        })
        .into_owned()
}

fn is_passthrough(reference: &str) -> bool {
    let lowered = reference.to_ascii_lowercase();
    reference.is_empty()
        || lowered.starts_with("data:")
        || lowered.starts_with("http://")
        || lowered.starts_with("https://")
}
