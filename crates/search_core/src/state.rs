use crate::fragment::is_search_fragment;
use crate::view_model::SearchViewModel;
use crate::StatusLine;

/// Monotonic token identifying one search run.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
    Searching,
    Results,
}

/// One matched message, ready to be listed in the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub page_file: String,
    /// `page-NNN.html` or `page-NNN.html#<message id>`.
    pub link: String,
    /// Highlighted, link-rewritten copy of the message markup.
    pub snippet_html: String,
    /// Flattened text of the message, for plain-text listings.
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    available: bool,
    total_pages: u32,
    overlay: OverlayState,
    inline_query: String,
    modal_query: String,
    active_query: Option<String>,
    status: StatusLine,
    results: Vec<ResultEntry>,
    pages_searched: u32,
    generation: Generation,
    fragment: Option<String>,
    dirty: bool,
}

impl SearchState {
    /// Build the controller state. `available` is the result of the one-off
    /// transport check; when false every message is ignored.
    pub fn new(available: bool, total_pages: u32) -> Self {
        Self {
            available,
            total_pages,
            ..Self::default()
        }
    }

    pub fn view(&self) -> SearchViewModel {
        SearchViewModel {
            entry_point_visible: self.available,
            overlay: self.overlay,
            inline_query: self.inline_query.clone(),
            modal_query: self.modal_query.clone(),
            active_query: self.active_query.clone(),
            status: self.status.to_string(),
            results: self.results.clone(),
            results_found: self.results.len(),
            pages_searched: self.pages_searched,
            total_pages: self.total_pages,
            generation: self.generation,
            fragment: self.fragment.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub(crate) fn inline_query(&self) -> &str {
        &self.inline_query
    }

    pub(crate) fn modal_query(&self) -> &str {
        &self.modal_query
    }

    pub(crate) fn set_inline_query(&mut self, text: String) {
        self.inline_query = text;
        self.dirty = true;
    }

    pub(crate) fn set_modal_query(&mut self, text: String) {
        self.modal_query = text;
        self.dirty = true;
    }

    pub(crate) fn set_fragment(&mut self, fragment: Option<String>) {
        self.fragment = fragment.filter(|f| !f.is_empty());
    }

    pub(crate) fn has_search_fragment(&self) -> bool {
        self.fragment.as_deref().is_some_and(is_search_fragment)
    }

    pub(crate) fn set_status(&mut self, status: StatusLine) {
        self.status = status;
        self.dirty = true;
    }

    /// Show the overlay with `query` in its field and an empty result list.
    pub(crate) fn open(&mut self, query: String) {
        self.overlay = OverlayState::Open;
        self.modal_query = query;
        self.results.clear();
        self.pages_searched = 0;
        self.status = StatusLine::Empty;
        self.dirty = true;
    }

    /// Reset per-search counters and hand out the next generation.
    pub(crate) fn begin_search(&mut self, query: String, fragment: String) -> Generation {
        self.generation += 1;
        self.overlay = OverlayState::Searching;
        self.active_query = Some(query);
        self.results.clear();
        self.pages_searched = 0;
        self.status = StatusLine::Searching;
        self.fragment = Some(fragment);
        self.dirty = true;
        self.generation
    }

    /// Hide the overlay and retire the running search. Returns whether the
    /// fragment had to be cleared.
    pub(crate) fn close(&mut self) -> bool {
        self.overlay = OverlayState::Closed;
        self.active_query = None;
        self.generation += 1;
        self.dirty = true;
        if self.has_search_fragment() {
            self.fragment = None;
            true
        } else {
            false
        }
    }

    /// Events only count while their search is the live one.
    pub(crate) fn accepts(&self, generation: Generation) -> bool {
        generation == self.generation && self.overlay == OverlayState::Searching
    }

    pub(crate) fn push_result(&mut self, entry: ResultEntry) {
        self.results.push(entry);
        self.dirty = true;
    }

    pub(crate) fn apply_batch(&mut self, pages_searched: u32) {
        self.pages_searched = pages_searched.min(self.total_pages);
        self.status = StatusLine::Progress {
            found: self.results.len(),
            searched: self.pages_searched,
            total: self.total_pages,
        };
        self.dirty = true;
    }

    pub(crate) fn finish_search(&mut self) {
        self.overlay = OverlayState::Results;
        self.pages_searched = self.total_pages;
        self.status = StatusLine::Done {
            found: self.results.len(),
            total: self.total_pages,
        };
        self.dirty = true;
    }
}
