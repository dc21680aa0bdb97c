use crate::url::without_fragment;
use std::collections::HashSet;
use url::Url;

/// Pages saved during one crawl
///
/// Keys are URLs with their fragment removed, so `/guide#intro` and `/guide`
/// count as one page. A URL is inserted only after its page file has been
/// written, which makes membership a promise that the file exists.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    pages: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the page for `url` has been saved
    pub fn contains(&self, url: &Url) -> bool {
        self.pages.contains(without_fragment(url).as_str())
    }

    /// Records `url` as saved; returns false if it already was
    pub fn mark(&mut self, url: &Url) -> bool {
        self.pages.insert(without_fragment(url).into())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Visited URLs, in no particular order
    pub fn urls(&self) -> impl Iterator<Item = Url> + '_ {
        self.pages.iter().filter_map(|page| Url::parse(page).ok())
    }
}
