use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use pretty_assertions::assert_eq;
use search_engine::{
    run_scan, EngineEvent, EventSink, FailureKind, FetchError, FetchOutput,
    Fetcher, GenerationGate, ScanError, ScanRequest, ScanSettings,
};

const BASE: &str = "http://transcripts.test/session/index.html";

/// Serves canned pages and records how many fetches overlap.
#[derive(Default)]
struct MapFetcher {
    pages: HashMap<String, String>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MapFetcher {
    fn with_pages(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(name, html)| {
                    (
                        format!("http://transcripts.test/session/{name}"),
                        html.to_string(),
                    )
                })
                .collect(),
            ..Self::default()
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for MapFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.pages.get(url) {
            Some(html) => Ok(FetchOutput {
                bytes: html.as_bytes().to_vec(),
                final_url: url.to_string(),
                content_type: Some("text/html; charset=utf-8".to_string()),
            }),
            None => Err(FetchError::new(FailureKind::HttpStatus(404), "404 Not Found")),
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn message(id: &str, text: &str) -> String {
    format!(r#"<html><body><div class="message" id="{id}"><p>{text}</p></div></body></html>"#)
}

fn five_pages() -> Vec<(String, String)> {
    vec![
        ("page-001.html".into(), message("msg-1", "nothing to see")),
        ("page-002.html".into(), message("msg-2", "the Needle is here")),
        ("page-003.html".into(), message("msg-3", "hay")),
        ("page-004.html".into(), message("msg-4", "another NEEDLE")),
        ("page-005.html".into(), message("msg-5", "more hay")),
    ]
}

fn fetcher_for(pages: &[(String, String)]) -> MapFetcher {
    let borrowed: Vec<(&str, &str)> = pages
        .iter()
        .map(|(name, html)| (name.as_str(), html.as_str()))
        .collect();
    MapFetcher::with_pages(&borrowed)
}

async fn scan(
    fetcher: &MapFetcher,
    query: &str,
    total_pages: u32,
) -> (Option<search_engine::ScanSummary>, Vec<EngineEvent>) {
    let request = ScanRequest::new(1, BASE, query, total_pages).unwrap();
    let gate = GenerationGate::new();
    gate.advance(1);
    let sink = RecordingSink::default();
    let summary = run_scan(fetcher, &request, &ScanSettings::default(), &gate, &sink)
        .await
        .unwrap();
    (summary, sink.take())
}

fn hit_links(events: &[EngineEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::ResultFound { hit, .. } => Some(hit.link.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn matches_on_two_pages_are_reported_with_links() {
    search_logging::initialize_for_tests();
    let fetcher = fetcher_for(&five_pages());
    let (summary, events) = scan(&fetcher, "needle", 5).await;

    let summary = summary.unwrap();
    assert_eq!(summary.results_found, 2);
    assert_eq!(summary.pages_searched, 5);
    assert_eq!(summary.failed_pages, 0);
    assert_eq!(
        hit_links(&events),
        vec!["page-002.html#msg-2", "page-004.html#msg-4"]
    );
}

#[tokio::test]
async fn batches_settle_in_order_with_running_counts() {
    let fetcher = fetcher_for(&five_pages());
    let (_, events) = scan(&fetcher, "needle", 5).await;

    let settled: Vec<(u32, usize)> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::BatchSettled {
                pages_searched,
                results_found,
                ..
            } => Some((*pages_searched, *results_found)),
            _ => None,
        })
        .collect();
    assert_eq!(settled, vec![(3, 1), (5, 2)]);
    assert!(matches!(
        events.last(),
        Some(EngineEvent::ScanCompleted { generation: 1, .. })
    ));
}

#[tokio::test]
async fn at_most_three_fetches_are_in_flight() {
    let pages: Vec<(String, String)> = (1..=10)
        .map(|n| (format!("page-{n:03}.html"), message(&format!("m{n}"), "x")))
        .collect();
    let fetcher = fetcher_for(&pages);
    let (summary, _) = scan(&fetcher, "x", 10).await;

    assert_eq!(summary.unwrap().results_found, 10);
    assert!(fetcher.peak_in_flight.load(Ordering::SeqCst) <= 3);
    assert_eq!(fetcher.requested().len(), 10);
}

#[tokio::test]
async fn missing_page_counts_as_searched_without_results() {
    let mut pages = five_pages();
    pages.retain(|(name, _)| name != "page-003.html");
    let fetcher = fetcher_for(&pages);

    let (summary, events) = scan(&fetcher, "needle", 5).await;
    let summary = summary.unwrap();

    assert_eq!(summary.pages_searched, 5);
    assert_eq!(summary.failed_pages, 1);
    assert_eq!(summary.results_found, 2);
    assert_eq!(
        hit_links(&events),
        vec!["page-002.html#msg-2", "page-004.html#msg-4"]
    );
}

#[tokio::test]
async fn zero_pages_complete_immediately() {
    let fetcher = MapFetcher::default();
    let (summary, events) = scan(&fetcher, "needle", 0).await;

    assert_eq!(summary.unwrap().results_found, 0);
    assert_eq!(events.len(), 1);
    assert!(fetcher.requested().is_empty());
}

#[tokio::test]
async fn superseded_scan_stops_and_stays_silent() {
    let fetcher = fetcher_for(&five_pages());
    let request = ScanRequest::new(1, BASE, "needle", 5).unwrap();
    let gate = GenerationGate::new();
    gate.advance(2);
    let sink = RecordingSink::default();

    let summary = run_scan(&fetcher, &request, &ScanSettings::default(), &gate, &sink)
        .await
        .unwrap();

    assert_eq!(summary, None);
    assert!(sink.take().is_empty());
    assert!(fetcher.requested().is_empty());
}

#[test]
fn blank_queries_are_rejected_before_fetching() {
    assert_eq!(
        ScanRequest::new(1, BASE, "   ", 5).unwrap_err(),
        ScanError::EmptyQuery
    );
}

#[tokio::test]
async fn invalid_selector_aborts_before_fetching() {
    let fetcher = fetcher_for(&five_pages());
    let request = ScanRequest::new(1, BASE, "needle", 5).unwrap();
    let gate = GenerationGate::new();
    gate.advance(1);
    let settings = ScanSettings {
        message_selector: "div[".to_string(),
        ..ScanSettings::default()
    };

    let err = run_scan(&fetcher, &request, &settings, &gate, &RecordingSink::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::InvalidSelector { .. }));
    assert!(fetcher.requested().is_empty());
}

#[test]
fn page_urls_are_siblings_of_the_base() {
    let request = ScanRequest::new(
        1,
        "http://transcripts.test/session/page-002.html#search=x",
        "x",
        3,
    )
    .unwrap();
    assert_eq!(
        request.page_url("page-003.html").unwrap().as_str(),
        "http://transcripts.test/session/page-003.html"
    );
}

/// Records which generation the thread's log lines carried at each emit.
#[derive(Default)]
struct LogTagSink {
    tags: Mutex<Vec<(u64, u64)>>,
}

impl EventSink for LogTagSink {
    fn emit(&self, event: EngineEvent) {
        let generation = match &event {
            EngineEvent::ResultFound { generation, .. }
            | EngineEvent::BatchSettled { generation, .. }
            | EngineEvent::ScanCompleted { generation, .. }
            | EngineEvent::ScanAborted { generation, .. } => *generation,
        };
        let tag = search_logging::current_search_generation();
        self.tags.lock().unwrap().push((generation, tag));
    }
}

#[tokio::test]
async fn interleaved_scans_keep_their_own_log_tag() {
    let fetcher = fetcher_for(&five_pages());
    let settings = ScanSettings::default();
    let first = ScanRequest::new(7, BASE, "needle", 5).unwrap();
    let second = ScanRequest::new(8, BASE, "hay", 5).unwrap();
    let (first_gate, second_gate) = (GenerationGate::new(), GenerationGate::new());
    first_gate.advance(7);
    second_gate.advance(8);
    let sink = LogTagSink::default();

    let (a, b) = tokio::join!(
        run_scan(&fetcher, &first, &settings, &first_gate, &sink),
        run_scan(&fetcher, &second, &settings, &second_gate, &sink),
    );
    assert!(a.unwrap().is_some());
    assert!(b.unwrap().is_some());

    let tags = sink.tags.lock().unwrap().clone();
    assert!(tags.iter().any(|(generation, _)| *generation == 7));
    assert!(tags.iter().any(|(generation, _)| *generation == 8));
    for (generation, tag) in tags {
        assert_eq!(generation, tag);
    }
}
