use std::fmt;

use anyhow::Context;
use url::Url;

/// The viewer's current address. Fragment changes never touch path or query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(address: &str) -> anyhow::Result<Self> {
        let url = Url::parse(address).with_context(|| format!("invalid page URL {address:?}"))?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fragment including the leading `#`.
    pub fn fragment(&self) -> Option<String> {
        self.url.fragment().map(|fragment| format!("#{fragment}"))
    }

    /// Replace the fragment in place; accepts it with or without `#`.
    pub fn replace_fragment(&mut self, fragment: &str) {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        self.url.set_fragment(Some(fragment));
    }

    pub fn clear_fragment(&mut self) {
        self.url.set_fragment(None);
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.url, f)
    }
}
