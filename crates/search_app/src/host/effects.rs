use search_core::{Effect, Generation, Msg, ResultEntry};
use search_engine::{EngineEvent, EngineHandle, ScanError, ScanRequest, SearchHit};
use search_logging::{search_debug, search_error, search_warn};

use super::location::Location;

/// Carries out core effects against the engine and the viewer's address.
pub struct EffectRunner {
    engine: EngineHandle,
    location: Location,
    latest_scan: Generation,
    /// Why the latest scan could not run, if it could not.
    failure: Option<ScanError>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, location: Location) -> Self {
        Self {
            engine,
            location,
            latest_scan: 0,
            failure: None,
        }
    }

    /// The error that stopped the latest scan before it fetched anything.
    pub fn take_failure(&mut self) -> Option<ScanError> {
        self.failure.take()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    /// Run effects in order. Returns messages to feed back into `update`
    /// when an effect could not be carried out.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::FocusModalInput => {
                    search_debug!("focus moved to the overlay query field");
                }
                Effect::ReplaceFragment { fragment } => {
                    self.location.replace_fragment(&fragment);
                    search_debug!("address is now {}", self.location);
                }
                Effect::ClearFragment => {
                    self.location.clear_fragment();
                    search_debug!("address is now {}", self.location);
                }
                Effect::StartScan {
                    generation,
                    query,
                    total_pages,
                } => {
                    self.latest_scan = generation;
                    self.failure = None;
                    match ScanRequest::new(
                        generation,
                        self.location.url().as_str(),
                        &query,
                        total_pages,
                    ) {
                        Ok(request) => self.engine.start_scan(request),
                        Err(err) => {
                            search_error!("scan {generation} not started: {err}");
                            self.failure = Some(err);
                            follow_up.push(Msg::ScanFinished { generation });
                        }
                    }
                }
                Effect::InvalidateScans { generation } => {
                    self.engine.invalidate(generation);
                }
            }
        }
        follow_up
    }

    /// Translate an engine event into the message the core expects.
    pub fn map_event(&mut self, event: EngineEvent) -> Msg {
        match event {
            EngineEvent::ResultFound { generation, hit } => Msg::ResultFound {
                generation,
                entry: to_entry(hit),
            },
            EngineEvent::BatchSettled {
                generation,
                pages_searched,
                ..
            } => Msg::BatchSettled {
                generation,
                pages_searched,
            },
            EngineEvent::ScanCompleted { generation, .. } => Msg::ScanFinished { generation },
            EngineEvent::ScanAborted { generation, error } => {
                search_warn!("scan {generation} aborted: {error}");
                if generation == self.latest_scan {
                    self.failure = Some(error);
                }
                Msg::ScanFinished { generation }
            }
        }
    }
}

fn to_entry(hit: SearchHit) -> ResultEntry {
    ResultEntry {
        page_file: hit.page_file,
        link: hit.link,
        snippet_html: hit.snippet_html,
        excerpt: hit.excerpt,
    }
}
