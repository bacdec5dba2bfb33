use crate::{decode_search_fragment, encode_search_fragment};
use crate::{Effect, Msg, OverlayState, SearchState, StatusLine};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SearchState, msg: Msg) -> (SearchState, Vec<Effect>) {
    // Without sibling fetches the feature does not exist at all.
    if !state.is_available() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::PageLoaded { fragment } => {
            let query = fragment.as_deref().and_then(decode_search_fragment);
            state.set_fragment(fragment);
            match query {
                Some(query) if !query.is_empty() => {
                    state.set_inline_query(query.clone());
                    open_overlay(&mut state, query)
                }
                _ => Vec::new(),
            }
        }
        Msg::InlineInputChanged(text) => {
            state.set_inline_query(text);
            Vec::new()
        }
        Msg::InlineSearchActivated => {
            let query = state.inline_query().trim().to_string();
            open_overlay(&mut state, query)
        }
        Msg::ModalInputChanged(text) => {
            state.set_modal_query(text);
            Vec::new()
        }
        Msg::ModalSearchSubmitted => {
            if state.overlay() == OverlayState::Closed {
                Vec::new()
            } else {
                let query = state.modal_query().to_string();
                execute_search(&mut state, &query)
            }
        }
        Msg::CloseClicked | Msg::EscapePressed | Msg::BackdropClicked => {
            close_overlay(&mut state)
        }
        Msg::ResultFound { generation, entry } => {
            if state.accepts(generation) {
                state.push_result(entry);
            }
            Vec::new()
        }
        Msg::BatchSettled {
            generation,
            pages_searched,
        } => {
            if state.accepts(generation) {
                state.apply_batch(pages_searched);
            }
            Vec::new()
        }
        Msg::ScanFinished { generation } => {
            if state.accepts(generation) {
                state.finish_search();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn open_overlay(state: &mut SearchState, query: String) -> Vec<Effect> {
    let run_now = !query.is_empty();
    state.open(query.clone());
    let mut effects = vec![Effect::FocusModalInput];
    if run_now {
        effects.extend(execute_search(state, &query));
    }
    effects
}

fn execute_search(state: &mut SearchState, raw: &str) -> Vec<Effect> {
    let query = raw.trim();
    if query.is_empty() {
        state.set_status(StatusLine::EnterSearchTerm);
        return Vec::new();
    }

    let fragment = encode_search_fragment(query);
    let generation = state.begin_search(query.to_string(), fragment.clone());
    vec![
        Effect::ReplaceFragment { fragment },
        Effect::StartScan {
            generation,
            query: query.to_string(),
            total_pages: state.total_pages(),
        },
    ]
}

fn close_overlay(state: &mut SearchState) -> Vec<Effect> {
    if state.overlay() == OverlayState::Closed {
        return Vec::new();
    }
    let was_searching = state.overlay() == OverlayState::Searching;
    let clear_fragment = state.close();

    let mut effects = Vec::new();
    if was_searching {
        effects.push(Effect::InvalidateScans {
            generation: state.generation(),
        });
    }
    if clear_fragment {
        effects.push(Effect::ClearFragment);
    }
    effects
}
