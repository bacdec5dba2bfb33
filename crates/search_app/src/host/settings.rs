use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use search_engine::{FetchSettings, ScanSettings};
use search_logging::search_info;
use serde::{Deserialize, Serialize};

/// On-disk form of [`ScanSettings`]. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct SettingsFile {
    batch_size: usize,
    message_selector: String,
    connect_timeout_secs: u64,
    request_timeout_secs: u64,
    redirect_limit: usize,
    max_bytes: u64,
    allowed_content_types: Vec<String>,
}

impl Default for SettingsFile {
    fn default() -> Self {
        let scan = ScanSettings::default();
        Self {
            batch_size: scan.batch_size,
            message_selector: scan.message_selector,
            connect_timeout_secs: scan.fetch.connect_timeout.as_secs(),
            request_timeout_secs: scan.fetch.request_timeout.as_secs(),
            redirect_limit: scan.fetch.redirect_limit,
            max_bytes: scan.fetch.max_bytes,
            allowed_content_types: scan.fetch.allowed_content_types,
        }
    }
}

impl From<SettingsFile> for ScanSettings {
    fn from(file: SettingsFile) -> Self {
        ScanSettings {
            batch_size: file.batch_size.max(1),
            message_selector: file.message_selector,
            fetch: FetchSettings {
                connect_timeout: Duration::from_secs(file.connect_timeout_secs),
                request_timeout: Duration::from_secs(file.request_timeout_secs),
                redirect_limit: file.redirect_limit,
                max_bytes: file.max_bytes,
                allowed_content_types: file.allowed_content_types,
            },
        }
    }
}

/// Settings from `path`, or the built-in defaults when no file was given.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<ScanSettings> {
    let Some(path) = path else {
        return Ok(ScanSettings::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let settings = parse_settings(&content)
        .with_context(|| format!("parsing settings in {}", path.display()))?;
    search_info!("Loaded settings from {:?}", path);
    Ok(settings)
}

pub fn parse_settings(content: &str) -> anyhow::Result<ScanSettings> {
    let file: SettingsFile = ron::from_str(content)?;
    Ok(file.into())
}
