use crate::{Generation, ResultEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host page finished loading; carries the address fragment if any (with `#`).
    PageLoaded { fragment: Option<String> },
    /// User edited the inline search box.
    InlineInputChanged(String),
    /// Inline search button clicked or Enter pressed in the inline box.
    InlineSearchActivated,
    /// User edited the overlay's query field.
    ModalInputChanged(String),
    /// Overlay search button clicked or Enter pressed in the overlay field.
    ModalSearchSubmitted,
    /// Overlay close control clicked.
    CloseClicked,
    /// Escape pressed while the overlay is open.
    EscapePressed,
    /// Click landed outside the overlay's content area.
    BackdropClicked,
    /// Engine matched a message element.
    ResultFound {
        generation: Generation,
        entry: ResultEntry,
    },
    /// Engine finished one batch of page fetches.
    BatchSettled {
        generation: Generation,
        pages_searched: u32,
    },
    /// Engine finished every batch.
    ScanFinished { generation: Generation },
    /// Fallback for placeholder wiring.
    NoOp,
}
