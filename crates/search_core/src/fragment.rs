use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Fragment prefix that marks a shareable search.
pub const SEARCH_FRAGMENT_PREFIX: &str = "#search=";

/// Characters left alone by `encodeURIComponent`; everything else is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build `#search=<escaped query>`.
pub fn encode_search_fragment(query: &str) -> String {
    format!(
        "{SEARCH_FRAGMENT_PREFIX}{}",
        utf8_percent_encode(query, URI_COMPONENT)
    )
}

pub fn is_search_fragment(fragment: &str) -> bool {
    fragment.starts_with(SEARCH_FRAGMENT_PREFIX)
}

/// Decode the query carried by a `#search=` fragment.
///
/// Returns `None` when the fragment is not a search fragment. `+` is kept
/// literally and invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_search_fragment(fragment: &str) -> Option<String> {
    let encoded = fragment.strip_prefix(SEARCH_FRAGMENT_PREFIX)?;
    Some(percent_decode_str(encoded).decode_utf8_lossy().into_owned())
}
