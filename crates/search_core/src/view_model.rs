use crate::{Generation, OverlayState, ResultEntry};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchViewModel {
    /// False when the transport cannot fetch sibling pages.
    pub entry_point_visible: bool,
    pub overlay: OverlayState,
    pub inline_query: String,
    pub modal_query: String,
    pub active_query: Option<String>,
    pub status: String,
    pub results: Vec<ResultEntry>,
    pub results_found: usize,
    pub pages_searched: u32,
    pub total_pages: u32,
    pub generation: Generation,
    /// Current address fragment including the leading `#`.
    pub fragment: Option<String>,
    pub dirty: bool,
}
