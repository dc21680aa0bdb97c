//! Rewrite strategies for the page walk
//!
//! The walk in [`rewrite_page`](super::rewrite_page) is the same for both
//! passes of a mirror; what changes is how each reference is rewritten.

use crate::markup::css::rewrite_css_urls;
use crate::markup::page::decode_reference;
use crate::state::VisitedSet;
use crate::storage::{relative_page_link, ResourceKind};
use crate::url::{looks_local, resolve_reference, same_host, without_fragment};
use std::collections::HashMap;
use url::Url;

/// Decides the new value of every reference the page walk visits
///
/// Returning `None` leaves the attribute or text exactly as written.
pub trait RewriteStrategy {
    /// `href` of an `<a>` element
    fn hyperlink(&mut self, href: &str) -> Option<String>;

    /// `src` of an `<img>` or `href` of a stylesheet `<link>`
    fn resource(&mut self, _reference: &str, _kind: ResourceKind) -> Option<String> {
        None
    }

    /// Text of a `<style>` block
    fn inline_style(&mut self, _css: &str) -> Option<String> {
        None
    }
}

/// Replacement values for resource references, keyed by the raw reference
#[derive(Debug, Clone, Default)]
pub struct ResourceMap {
    entries: HashMap<(ResourceKind, String), String>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ResourceKind, reference: &str, replacement: String) {
        self.entries
            .insert((kind, reference.to_string()), replacement);
    }

    pub fn get(&self, kind: ResourceKind, reference: &str) -> Option<&str> {
        self.entries
            .get(&(kind, reference.to_string()))
            .map(String::as_str)
    }
}

/// First pass: absolutize links and collect the in-domain ones
///
/// Every followable hyperlink is rewritten to its absolute form. Links whose
/// host matches the page's are collected, in document order and without
/// fragment, for the crawler to follow. Resources are replaced from a
/// prepared [`ResourceMap`] and inline styles get absolute `url(...)`s.
#[derive(Debug)]
pub struct ExtractStrategy<'a> {
    base: &'a Url,
    resources: &'a ResourceMap,
    links: Vec<Url>,
}

impl<'a> ExtractStrategy<'a> {
    pub fn new(base: &'a Url, resources: &'a ResourceMap) -> Self {
        Self {
            base,
            resources,
            links: Vec::new(),
        }
    }

    /// In-domain links found so far
    pub fn into_links(self) -> Vec<Url> {
        self.links
    }
}

impl RewriteStrategy for ExtractStrategy<'_> {
    fn hyperlink(&mut self, href: &str) -> Option<String> {
        let absolute = resolve_reference(self.base, &decode_reference(href))?;

        if same_host(&absolute, self.base) {
            self.links.push(without_fragment(&absolute));
        }

        Some(absolute.into())
    }

    fn resource(&mut self, reference: &str, kind: ResourceKind) -> Option<String> {
        self.resources.get(kind, reference).map(str::to_string)
    }

    fn inline_style(&mut self, css: &str) -> Option<String> {
        Some(rewrite_css_urls(css, self.base))
    }
}

/// Second pass: point links at other saved pages
///
/// Links already in local form (`./…`, `../…`) are kept. Links to a visited
/// page of the same host become relative paths to its saved file, keeping
/// any fragment; everything else stays absolute. Resources and styles were
/// settled by the first pass and are left alone.
#[derive(Debug)]
pub struct LocalizeStrategy<'a> {
    base: &'a Url,
    visited: &'a VisitedSet,
    localized: usize,
}

impl<'a> LocalizeStrategy<'a> {
    pub fn new(base: &'a Url, visited: &'a VisitedSet) -> Self {
        Self {
            base,
            visited,
            localized: 0,
        }
    }

    /// Number of links rewritten to local paths
    pub fn localized(&self) -> usize {
        self.localized
    }
}

impl RewriteStrategy for LocalizeStrategy<'_> {
    fn hyperlink(&mut self, href: &str) -> Option<String> {
        let href = decode_reference(href);
        if looks_local(&href) {
            return None;
        }

        let absolute = resolve_reference(self.base, &href)?;

        if !same_host(&absolute, self.base) || !self.visited.contains(&absolute) {
            return Some(absolute.into());
        }

        let mut local = relative_page_link(self.base, &absolute);
        if let Some(fragment) = absolute.fragment() {
            local.push('#');
            local.push_str(fragment);
        }

        self.localized += 1;
        Some(local)
    }
}
