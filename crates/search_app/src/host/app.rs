use std::fs;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use search_core::{update, Msg, OverlayState, SearchState, SearchViewModel};
use search_engine::{
    detect_transport, render_result_entry, render_results_page, search_available, EngineHandle,
    ScanSettings, Transport,
};
use search_logging::{search_debug, search_info};

use super::effects::EffectRunner;
use super::location::Location;
use super::settings::load_settings;
use crate::Args;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the controller state and feeds it messages one at a time.
struct Controller {
    state: SearchState,
    runner: EffectRunner,
}

impl Controller {
    fn dispatch(&mut self, msg: Msg) {
        let mut pending = vec![msg];
        while let Some(msg) = pending.pop() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            if state.consume_dirty() {
                search_debug!("view changed: {:?}", state.overlay());
            }
            self.state = state;
            pending.extend(self.runner.run(effects));
        }
    }

    fn view(&self) -> SearchViewModel {
        self.state.view()
    }

    /// Feed engine events into the core until the running search settles.
    /// Without a deadline this waits as long as the engine keeps working.
    fn wait_for_results(&mut self, deadline: Option<Instant>) -> anyhow::Result<()> {
        while self.state.overlay() == OverlayState::Searching {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                bail!(
                    "search did not finish in time ({} pages searched)",
                    self.view().pages_searched
                );
            }
            if let Some(event) = self.runner.engine().recv_timeout(POLL_INTERVAL) {
                let msg = self.runner.map_event(event);
                self.dispatch(msg);
            }
        }
        Ok(())
    }
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let location = Location::parse(&args.url)?;
    if !search_available(location.url()) {
        match detect_transport(location.url()) {
            Transport::GistPreview => println!(
                "Search is unavailable on gist previews; serve the transcript over HTTP."
            ),
            _ => println!(
                "Search is unavailable for {} pages; serve the transcript over HTTP.",
                location.url().scheme()
            ),
        }
        return Ok(());
    }

    let settings = load_settings(args.config.as_deref())?;
    let deadline =
        scan_budget(&settings, args.pages).and_then(|budget| Instant::now().checked_add(budget));
    let engine = EngineHandle::new(settings).context("building the page fetcher")?;

    let mut controller = Controller {
        state: SearchState::new(true, args.pages),
        runner: EffectRunner::new(engine, location.clone()),
    };

    controller.dispatch(Msg::PageLoaded {
        fragment: location.fragment(),
    });
    if let Some(query) = args.query {
        controller.dispatch(Msg::InlineInputChanged(query));
        controller.dispatch(Msg::InlineSearchActivated);
    }
    if controller.view().overlay != OverlayState::Searching {
        // Nothing ran yet: behave like pressing search in the overlay.
        if controller.view().overlay == OverlayState::Closed {
            controller.dispatch(Msg::InlineSearchActivated);
        }
        controller.dispatch(Msg::ModalSearchSubmitted);
    }

    controller.wait_for_results(deadline)?;
    if let Some(err) = controller.runner.take_failure() {
        return Err(err).context("search could not run");
    }
    let view = controller.view();
    print_results(&view);

    if let Some(path) = &args.html {
        fs::write(path, results_html(&view))
            .with_context(|| format!("writing results to {}", path.display()))?;
        search_info!("wrote {} result(s) to {:?}", view.results.len(), path);
    }

    if args.close {
        controller.dispatch(Msg::CloseClicked);
        println!("{}", controller.runner.location());
    }
    Ok(())
}

/// Worst case for a full scan: every batch waits out the request timeout.
/// `None` when that does not fit in a `Duration`.
fn scan_budget(settings: &ScanSettings, total_pages: u32) -> Option<Duration> {
    let batch_size = u32::try_from(settings.batch_size.max(1)).unwrap_or(u32::MAX);
    let batches = total_pages.div_ceil(batch_size);
    settings
        .fetch
        .request_timeout
        .checked_mul(batches.checked_add(1)?)
}

fn print_results(view: &SearchViewModel) {
    for entry in &view.results {
        println!("{}\t{}", entry.link, entry.excerpt);
    }
    println!("{}", view.status);
}

fn results_html(view: &SearchViewModel) -> String {
    let entries: Vec<String> = view
        .results
        .iter()
        .map(|entry| render_result_entry(&entry.link, &entry.page_file, &entry.snippet_html))
        .collect();
    render_results_page(
        view.active_query.as_deref().unwrap_or_default(),
        &view.status,
        &entries,
    )
}
