//! Slide navigator: the active slide index, mirrored into a `slide=` query parameter.
//!
//! The parameter is 1-based; the index is 0-based. Every method that can
//! change the index rewrites the location, keeping other query parameters.

#[cfg(test)]
#[path = "navigator_test.rs"]
mod tests;

use url::Url;

pub const SLIDE_PARAM: &str = "slide";

#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    index: usize,
    location: Url,
}

impl Navigator {
    /// Seed from `location`'s `slide` parameter for a deck of `len` slides.
    ///
    /// A missing, non-numeric or zero parameter starts at the first slide; a
    /// value past the end starts at the last one.
    #[must_use]
    pub fn new(location: Url, len: usize) -> Self {
        let requested = location
            .query_pairs()
            .find(|(k, _)| k == SLIDE_PARAM)
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .unwrap_or(0);
        let mut nav = Self { index: requested, location };
        nav.clamp(len);
        nav
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn location(&self) -> &Url {
        &self.location
    }

    #[must_use]
    pub fn can_previous(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_next(&self, len: usize) -> bool {
        self.index + 1 < len
    }

    /// Returns false at the last slide.
    pub fn next(&mut self, len: usize) -> bool {
        if !self.can_next(len) {
            return false;
        }
        self.set(self.index + 1);
        true
    }

    /// Returns false at the first slide.
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.set(self.index - 1);
        true
    }

    pub fn goto(&mut self, index: usize, len: usize) {
        self.set(index);
        self.clamp(len);
    }

    /// A slide was appended; move to it.
    pub fn on_append(&mut self, len: usize) {
        self.set(len.saturating_sub(1));
    }

    /// The slide at `removed` was deleted, leaving `len` slides.
    pub fn on_delete(&mut self, removed: usize, len: usize) {
        if removed <= self.index {
            self.set(self.index.saturating_sub(1));
        }
        self.clamp(len);
    }

    /// Keep the index inside `0..len`, or 0 for an empty deck.
    pub fn clamp(&mut self, len: usize) {
        self.set(self.index.min(len.saturating_sub(1)));
    }

    fn set(&mut self, index: usize) {
        self.index = index;
        let kept: Vec<(String, String)> = self
            .location
            .query_pairs()
            .filter(|(k, _)| k != SLIDE_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        self.location
            .query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(SLIDE_PARAM, &(index + 1).to_string());
    }
}
