//! The page walk shared by both rewrite passes
//!
//! Both the read-only scan for embedded resources and the rewrite run on
//! lol_html, which streams the document through untouched except for the
//! attributes and `<style>` texts a strategy replaces. Sharing the parser
//! keeps the references seen by both passes identical.

use crate::markup::strategy::RewriteStrategy;
use crate::storage::ResourceKind;
use crate::MarkupError;
use lol_html::html_content::ContentType;
use lol_html::{element, text, HtmlRewriter, Settings};
use std::borrow::Cow;
use std::cell::RefCell;

/// A resource reference as written in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// Raw attribute value
    pub reference: String,
    pub kind: ResourceKind,
}

/// Returns true for `<link>` elements that load a stylesheet
pub fn is_stylesheet_link(rel: Option<&str>, content_type: Option<&str>) -> bool {
    let rel_matches = rel
        .map(|rel| rel.to_ascii_lowercase().contains("stylesheet"))
        .unwrap_or(false);
    let type_matches = content_type
        .map(|t| t.trim().eq_ignore_ascii_case("text/css"))
        .unwrap_or(false);

    rel_matches || type_matches
}

/// Decodes character references in a raw attribute value
///
/// The rewriter hands attribute values over exactly as written, so
/// `/p?a=1&amp;b=2` must be decoded before it is treated as a URL.
pub fn decode_reference(raw: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(raw)
}

/// Lists the images and stylesheets a page embeds, in document order
///
/// Uses the same selectors as [`rewrite_page`], so each reference is exactly
/// the raw attribute value the rewrite pass will look up later. Each distinct
/// (kind, reference) pair appears once.
pub fn collect_resources(html: &str) -> Result<Vec<ResourceRef>, MarkupError> {
    let found = RefCell::new(Vec::<ResourceRef>::new());
    let push = |reference: String, kind: ResourceKind| {
        let resource = ResourceRef { reference, kind };
        let mut found = found.borrow_mut();
        if !found.contains(&resource) {
            found.push(resource);
        }
    };

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("img[src]", |el| {
                    if let Some(src) = el.get_attribute("src") {
                        push(src, ResourceKind::Image);
                    }
                    Ok(())
                }),
                element!("link[href]", |el| {
                    let rel = el.get_attribute("rel");
                    let content_type = el.get_attribute("type");
                    if !is_stylesheet_link(rel.as_deref(), content_type.as_deref()) {
                        return Ok(());
                    }

                    if let Some(href) = el.get_attribute("href") {
                        push(href, ResourceKind::Stylesheet);
                    }
                    Ok(())
                }),
            ],
            ..Settings::default()
        },
        |_: &[u8]| {},
    );

    rewriter.write(html.as_bytes())?;
    rewriter.end()?;

    Ok(found.into_inner())
}

/// Streams `html` through the rewriter, asking `strategy` about every
/// hyperlink, image, stylesheet link and `<style>` block
///
/// Everything the strategy leaves alone is emitted byte for byte.
pub fn rewrite_page<S: RewriteStrategy>(html: &str, strategy: &mut S) -> Result<String, MarkupError> {
    let strategy = RefCell::new(strategy);
    let mut style_text = String::new();
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("a[href]", |el| {
                    if let Some(href) = el.get_attribute("href") {
                        if let Some(new_href) = strategy.borrow_mut().hyperlink(&href) {
                            el.set_attribute("href", &new_href)?;
                        }
                    }
                    Ok(())
                }),
                element!("img[src]", |el| {
                    if let Some(src) = el.get_attribute("src") {
                        if let Some(new_src) =
                            strategy.borrow_mut().resource(&src, ResourceKind::Image)
                        {
                            el.set_attribute("src", &new_src)?;
                        }
                    }
                    Ok(())
                }),
                element!("link[href]", |el| {
                    let rel = el.get_attribute("rel");
                    let content_type = el.get_attribute("type");
                    if !is_stylesheet_link(rel.as_deref(), content_type.as_deref()) {
                        return Ok(());
                    }

                    if let Some(href) = el.get_attribute("href") {
                        if let Some(new_href) =
                            strategy.borrow_mut().resource(&href, ResourceKind::Stylesheet)
                        {
                            el.set_attribute("href", &new_href)?;
                        }
                    }
                    Ok(())
                }),
                // Style text can arrive in several chunks; buffer until the last
                text!("style", |chunk| {
                    style_text.push_str(chunk.as_str());

                    if chunk.last_in_text_node() {
                        let css = std::mem::take(&mut style_text);
                        let rewritten = strategy.borrow_mut().inline_style(&css).unwrap_or(css);
                        chunk.replace(&rewritten, ContentType::Html);
                    } else {
                        chunk.remove();
                    }
                    Ok(())
                }),
            ],
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter.write(html.as_bytes())?;
    rewriter.end()?;

    Ok(String::from_utf8(output)?)
}
