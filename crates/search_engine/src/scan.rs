use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use scraper::Selector;
use search_logging::{search_debug, search_info, search_warn};
use url::Url;

use crate::decode::decode_page;
use crate::fetch::{FetchSettings, Fetcher};
use crate::highlight::Highlighter;
use crate::page::scan_page;
use crate::pages::{page_batches, DEFAULT_BATCH_SIZE};
use crate::{EngineEvent, FailureKind, FetchError, Generation, ScanError, ScanSummary};

#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Upper bound on in-flight page fetches.
    pub batch_size: usize,
    /// CSS selector for searchable message elements.
    pub message_selector: String,
    pub fetch: FetchSettings,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            message_selector: ".message".to_string(),
            fetch: FetchSettings::default(),
        }
    }
}

/// Receives scan events as they happen.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Shared record of the newest search generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationGate {
    latest: Arc<AtomicU64>,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never moves backwards.
    pub fn advance(&self, generation: Generation) {
        self.latest.fetch_max(generation, Ordering::SeqCst);
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation
    }
}

/// A validated search over `page-001.html ..` next to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub generation: Generation,
    pub base_url: Url,
    pub query: String,
    pub total_pages: u32,
}

impl ScanRequest {
    pub fn new(
        generation: Generation,
        base_url: &str,
        query: &str,
        total_pages: u32,
    ) -> Result<Self, ScanError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ScanError::EmptyQuery);
        }
        let base_url = Url::parse(base_url).map_err(|err| ScanError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            generation,
            base_url,
            query: query.to_string(),
            total_pages,
        })
    }

    /// Sibling URL for a page filename.
    pub fn page_url(&self, page_file: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(page_file)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

/// Everything one scan owns while it runs; threaded through each batch.
struct ScanSession {
    generation: Generation,
    total_pages: u32,
    selector: Selector,
    highlighter: Highlighter,
    pages_searched: u32,
    failed_pages: u32,
    results_found: usize,
}

impl ScanSession {
    fn start(request: &ScanRequest, settings: &ScanSettings) -> Result<Self, ScanError> {
        let selector = Selector::parse(&settings.message_selector).map_err(|err| {
            ScanError::InvalidSelector {
                selector: settings.message_selector.clone(),
                message: format!("{err:?}"),
            }
        })?;
        let highlighter =
            Highlighter::new(&request.query).map_err(|err| ScanError::Pattern(err.to_string()))?;
        Ok(Self {
            generation: request.generation,
            total_pages: request.total_pages,
            selector,
            highlighter,
            pages_searched: 0,
            failed_pages: 0,
            results_found: 0,
        })
    }

    fn summary(&self) -> ScanSummary {
        ScanSummary {
            total_pages: self.total_pages,
            pages_searched: self.pages_searched,
            failed_pages: self.failed_pages,
            results_found: self.results_found,
        }
    }

    /// Tag this thread's log lines with the scan's generation. Tasks hop
    /// between runtime workers at every `.await`, so call this after the
    /// last await and before logging.
    fn tag_logs(&self) {
        search_logging::set_search_generation(self.generation);
    }

    /// Count a settled page and emit its hits, unless the scan went stale.
    fn settle_page(
        &mut self,
        page_file: &str,
        fetched: Result<String, String>,
        gate: &GenerationGate,
        sink: &dyn EventSink,
    ) {
        self.tag_logs();
        self.pages_searched += 1;
        let html = match fetched {
            Ok(html) => html,
            Err(reason) => {
                self.failed_pages += 1;
                search_warn!("skipping {page_file}: {reason}");
                return;
            }
        };

        let hits = scan_page(&html, page_file, &self.selector, &self.highlighter);
        search_debug!("{page_file}: {} match(es)", hits.len());
        if !gate.is_current(self.generation) {
            return;
        }
        for hit in hits {
            self.results_found += 1;
            sink.emit(EngineEvent::ResultFound {
                generation: self.generation,
                hit,
            });
        }
    }
}

async fn fetch_page_text(
    fetcher: &dyn Fetcher,
    request: &ScanRequest,
    page_file: &str,
) -> Result<String, String> {
    let url = request.page_url(page_file).map_err(|err| err.to_string())?;
    let output = fetcher
        .fetch(url.as_str())
        .await
        .map_err(|err| err.to_string())?;
    decode_page(&output.bytes, output.content_type.as_deref())
        .map(|decoded| decoded.html)
        .map_err(|err| err.to_string())
}

/// Fetch and scan every page in batches, emitting events as work settles.
///
/// Pages inside a batch are fetched concurrently and their hits are emitted in
/// completion order; the next batch starts only once the current one settled.
/// Failed pages count as searched. Returns `Ok(None)` when a newer generation
/// took over before the scan finished; nothing further is emitted then.
pub async fn run_scan(
    fetcher: &dyn Fetcher,
    request: &ScanRequest,
    settings: &ScanSettings,
    gate: &GenerationGate,
    sink: &dyn EventSink,
) -> Result<Option<ScanSummary>, ScanError> {
    search_logging::set_search_generation(request.generation);
    let mut session = ScanSession::start(request, settings)?;
    search_info!(
        "searching {} page(s) for {:?}",
        request.total_pages,
        request.query
    );

    for batch in page_batches(request.total_pages, settings.batch_size) {
        session.tag_logs();
        if !gate.is_current(session.generation) {
            search_info!("superseded after {} page(s)", session.pages_searched);
            return Ok(None);
        }

        let mut pending: FuturesUnordered<_> = batch
            .iter()
            .map(|page_file| async move {
                (
                    page_file.as_str(),
                    fetch_page_text(fetcher, request, page_file).await,
                )
            })
            .collect();
        while let Some((page_file, fetched)) = pending.next().await {
            session.settle_page(page_file, fetched, gate, sink);
        }
        session.tag_logs();

        if !gate.is_current(session.generation) {
            search_info!("superseded after {} page(s)", session.pages_searched);
            return Ok(None);
        }
        search_debug!(
            "batch settled: {}/{} pages, {} result(s)",
            session.pages_searched,
            session.total_pages,
            session.results_found
        );
        sink.emit(EngineEvent::BatchSettled {
            generation: session.generation,
            pages_searched: session.pages_searched,
            results_found: session.results_found,
        });
    }

    session.tag_logs();
    let summary = session.summary();
    search_info!(
        "done: {} result(s) in {} page(s), {} failed",
        summary.results_found,
        summary.total_pages,
        summary.failed_pages
    );
    sink.emit(EngineEvent::ScanCompleted {
        generation: session.generation,
        summary: summary.clone(),
    });
    Ok(Some(summary))
}
