//! Search engine: page fetching, detached scanning and result rendering.
mod availability;
mod decode;
mod engine;
mod fetch;
mod highlight;
mod links;
mod page;
mod pages;
mod render;
mod scan;
mod types;

pub use availability::{detect_transport, search_available, Transport};
pub use decode::{decode_page, DecodeError, DecodedPage};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use highlight::{Highlighter, Segment};
pub use links::{qualify_in_page_href, GistPreview};
pub use page::scan_page;
pub use pages::{page_batches, page_filename, DEFAULT_BATCH_SIZE};
pub use render::{escape_attr, escape_text, render_result_entry, render_results_page};
pub use scan::{
    run_scan, ChannelEventSink, EventSink, GenerationGate, ScanRequest, ScanSettings,
};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchOutput, Generation, ScanError, ScanSummary,
    SearchHit,
};
