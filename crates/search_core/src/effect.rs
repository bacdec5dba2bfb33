use crate::Generation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move keyboard focus into the overlay's query field.
    FocusModalInput,
    /// Replace the address fragment without adding a history entry.
    ReplaceFragment { fragment: String },
    /// Drop the fragment, keeping path and query string, without a reload.
    ClearFragment,
    /// Fetch and scan every page for `query`.
    StartScan {
        generation: Generation,
        query: String,
        total_pages: u32,
    },
    /// Any scan older than `generation` is stale and may stop early.
    /// `StartScan` implies this for its own generation.
    InvalidateScans { generation: Generation },
}
