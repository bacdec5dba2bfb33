use std::fmt;

/// Text shown in the overlay's status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLine {
    #[default]
    Empty,
    EnterSearchTerm,
    Searching,
    Progress {
        found: usize,
        searched: u32,
        total: u32,
    },
    Done {
        found: usize,
        total: u32,
    },
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::Empty => Ok(()),
            StatusLine::EnterSearchTerm => write!(f, "Enter a search term"),
            StatusLine::Searching => write!(f, "Searching..."),
            StatusLine::Progress {
                found,
                searched,
                total,
            } => write!(f, "Found {found} result(s) in {searched}/{total} pages..."),
            StatusLine::Done { found, total } => {
                write!(f, "Found {found} result(s) in {total} pages.")
            }
        }
    }
}
