use url::Url;

use crate::links::GistPreview;

/// How the transcript page reached the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Http,
    /// Served over HTTPS, but only as a client-rendered gist preview.
    GistPreview,
    LocalFile,
    Other,
}

pub fn detect_transport(page_url: &Url) -> Transport {
    if GistPreview::detect(page_url).is_some() {
        return Transport::GistPreview;
    }
    match page_url.scheme() {
        "http" | "https" => Transport::Http,
        "file" => Transport::LocalFile,
        _ => Transport::Other,
    }
}

/// Whether sibling pages can be fetched from where this page was loaded.
/// Checked once at startup; `false` means the search entry point is never shown.
pub fn search_available(page_url: &Url) -> bool {
    detect_transport(page_url) == Transport::Http
}
