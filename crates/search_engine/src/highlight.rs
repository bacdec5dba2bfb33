use regex::{Regex, RegexBuilder};

use crate::render::escape_text;

/// A run of text that either matched the query or did not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
    Plain(&'t str),
    Marked(&'t str),
}

impl<'t> Segment<'t> {
    pub fn as_str(&self) -> &'t str {
        match self {
            Segment::Plain(text) | Segment::Marked(text) => text,
        }
    }
}

/// Literal, case-insensitive matcher for one query.
///
/// The query is escaped before compiling so metacharacters match themselves.
#[derive(Debug, Clone)]
pub struct Highlighter {
    needle: String,
    pattern: Regex,
}

impl Highlighter {
    pub fn new(query: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            needle: query.to_lowercase(),
            pattern,
        })
    }

    /// Cheap pre-filter: lowercase substring test.
    pub fn is_candidate(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.needle)
    }

    /// Split `text` into alternating plain and marked runs, original casing kept.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let mut segments = Vec::new();
        let mut last = 0;
        for found in self.pattern.find_iter(text).filter(|m| !m.is_empty()) {
            if found.start() > last {
                segments.push(Segment::Plain(&text[last..found.start()]));
            }
            segments.push(Segment::Marked(found.as_str()));
            last = found.end();
        }
        if last < text.len() {
            segments.push(Segment::Plain(&text[last..]));
        }
        segments
    }

    /// Append `text` as escaped HTML with every match wrapped in `<mark>`.
    pub fn write_html(&self, text: &str, out: &mut String) {
        if !self.is_candidate(text) {
            out.push_str(&escape_text(text));
            return;
        }
        for segment in self.segments(text) {
            match segment {
                Segment::Plain(plain) => out.push_str(&escape_text(plain)),
                Segment::Marked(marked) => {
                    out.push_str("<mark>");
                    out.push_str(&escape_text(marked));
                    out.push_str("</mark>");
                }
            }
        }
    }
}
