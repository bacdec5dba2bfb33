use std::fmt;

/// Token distinguishing one scan from the ones that superseded it.
pub type Generation = u64;

/// A message element that matched the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub page_file: String,
    pub message_id: Option<String>,
    /// `page_file` plus `#message_id` when the element has one.
    pub link: String,
    pub snippet_html: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub total_pages: u32,
    pub pages_searched: u32,
    pub failed_pages: u32,
    pub results_found: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ResultFound {
        generation: Generation,
        hit: SearchHit,
    },
    BatchSettled {
        generation: Generation,
        pages_searched: u32,
        results_found: usize,
    },
    ScanCompleted {
        generation: Generation,
        summary: ScanSummary,
    },
    /// The scan could not start; nothing was fetched.
    ScanAborted {
        generation: Generation,
        error: ScanError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("search query is empty")]
    EmptyQuery,
    #[error("invalid page url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },
    #[error("invalid message selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("could not build match pattern: {0}")]
    Pattern(String),
}

/// Raw body of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    /// Address after redirects.
    pub final_url: String,
    pub content_type: Option<String>,
}

/// Why a page could not be fetched. The scan counts the page and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub detail: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    /// Too many hops, or a hop that left the transcript's origin.
    RedirectRefused,
    TooLarge { max_bytes: u64, actual: u64 },
    NotHtml { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => f.write_str("not a fetchable url"),
            Self::HttpStatus(code) => write!(f, "server answered {code}"),
            Self::Timeout => f.write_str("timed out"),
            Self::RedirectRefused => f.write_str("redirect refused"),
            Self::TooLarge { max_bytes, actual } => {
                write!(f, "page is {actual} bytes, limit {max_bytes}")
            }
            Self::NotHtml { content_type } => write!(f, "not an HTML page ({content_type})"),
            Self::Network => f.write_str("network error"),
        }
    }
}
