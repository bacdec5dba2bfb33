use url::Url;

/// Prefix an in-page jump (`#msg-3`) with the page it came from, so the link
/// still resolves once the message is shown on another page.
///
/// Returns `None` for anything that is not a bare fragment.
pub fn qualify_in_page_href(page_file: &str, href: &str) -> Option<String> {
    href.starts_with('#').then(|| format!("{page_file}{href}"))
}

/// A transcript viewed through gistpreview.github.io, where every file lives
/// behind `?<gist id>/<filename>` and is rendered client-side. Sibling pages
/// cannot be fetched from there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GistPreview {
    gist_id: String,
}

impl GistPreview {
    pub const HOST: &'static str = "gistpreview.github.io";

    /// Recognise `https://gistpreview.github.io/?<id>/<file>`.
    pub fn detect(page_url: &Url) -> Option<Self> {
        if page_url.host_str() != Some(Self::HOST) {
            return None;
        }
        let gist_id = page_url.query()?.split('/').next()?;
        if gist_id.is_empty() {
            return None;
        }
        Some(Self {
            gist_id: gist_id.to_string(),
        })
    }

    pub fn gist_id(&self) -> &str {
        &self.gist_id
    }
}
