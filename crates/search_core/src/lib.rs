//! Search core: pure overlay state machine and view-model helpers.
mod effect;
mod fragment;
mod msg;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use fragment::{
    decode_search_fragment, encode_search_fragment, is_search_fragment, SEARCH_FRAGMENT_PREFIX,
};
pub use msg::Msg;
pub use state::{Generation, OverlayState, ResultEntry, SearchState};
pub use status::StatusLine;
pub use update::update;
pub use view_model::SearchViewModel;
