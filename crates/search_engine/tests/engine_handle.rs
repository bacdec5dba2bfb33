use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use search_engine::{EngineEvent, EngineHandle, ScanRequest, ScanSettings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve_page(server: &MockServer, name: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/t/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// Poll without blocking the test runtime until the scan for `generation` ends.
async fn collect_until_done(engine: &EngineHandle, generation: u64) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    while Instant::now() < deadline {
        match engine.try_recv() {
            Some(event) => {
                let done = matches!(
                    &event,
                    EngineEvent::ScanCompleted { generation: g, .. }
                        | EngineEvent::ScanAborted { generation: g, .. } if *g == generation
                );
                events.push(event);
                if done {
                    return events;
                }
            }
            None => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("scan {generation} did not finish; got {events:?}");
}

#[tokio::test]
async fn failed_page_is_tolerated_over_http() {
    search_logging::initialize_for_tests();
    let server = MockServer::start().await;
    serve_page(&server, "page-001.html", r#"<div class="message" id="a">alpha</div>"#).await;
    serve_page(&server, "page-002.html", r#"<div class="message" id="b">Target one</div>"#).await;
    Mock::given(method("GET"))
        .and(path("/t/page-003.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    serve_page(&server, "page-004.html", r#"<div class="message">target two</div>"#).await;
    serve_page(&server, "page-005.html", r#"<div class="message" id="e">omega</div>"#).await;

    let engine = EngineHandle::new(ScanSettings::default()).unwrap();
    let base = format!("{}/t/index.html", server.uri());
    engine.start_scan(ScanRequest::new(1, &base, "target", 5).unwrap());

    let events = collect_until_done(&engine, 1).await;
    let mut links: Vec<String> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::ResultFound { hit, .. } => Some(hit.link.clone()),
            _ => None,
        })
        .collect();
    links.sort();
    assert_eq!(links, vec!["page-002.html#b", "page-004.html"]);

    match events.last() {
        Some(EngineEvent::ScanCompleted { summary, .. }) => {
            assert_eq!(summary.results_found, 2);
            assert_eq!(summary.pages_searched, 5);
            assert_eq!(summary.failed_pages, 1);
        }
        other => panic!("unexpected final event {other:?}"),
    }
}

#[tokio::test]
async fn newer_scan_silences_the_older_one() {
    let server = MockServer::start().await;
    for n in 1..=6 {
        Mock::given(method("GET"))
            .and(path(format!("/t/page-{n:03}.html")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(50))
                    .set_body_raw(
                        format!(r#"<div class="message" id="m{n}">old new</div>"#),
                        "text/html",
                    ),
            )
            .mount(&server)
            .await;
    }

    let engine = EngineHandle::new(ScanSettings::default()).unwrap();
    let base = format!("{}/t/index.html", server.uri());
    engine.start_scan(ScanRequest::new(1, &base, "old", 6).unwrap());
    engine.start_scan(ScanRequest::new(2, &base, "new", 6).unwrap());

    let events = collect_until_done(&engine, 2).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    let mut stragglers = Vec::new();
    while let Some(event) = engine.try_recv() {
        stragglers.push(event);
    }

    let generations: Vec<u64> = events
        .iter()
        .chain(stragglers.iter())
        .map(|event| match event {
            EngineEvent::ResultFound { generation, .. }
            | EngineEvent::BatchSettled { generation, .. }
            | EngineEvent::ScanCompleted { generation, .. }
            | EngineEvent::ScanAborted { generation, .. } => *generation,
        })
        .collect();
    assert!(generations.iter().all(|g| *g == 2), "{generations:?}");
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, EngineEvent::ResultFound { .. }))
            .count(),
        6
    );
}
