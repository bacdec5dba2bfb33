use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::{Attempt, Policy};
use reqwest::Response;

use crate::{FailureKind, FetchError, FetchOutput};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Hops followed before a page counts as failed.
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types accepted as transcript pages; parameters are ignored.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 20 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

/// Retrieves one transcript page as raw bytes.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

/// Plain GET over HTTP(S). Non-2xx answers and redirects that leave the
/// page's origin are failures.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let limit = settings.redirect_limit;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(Policy::custom(move |attempt| same_origin_hop(attempt, limit)))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn accepts_media_type(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }

    fn check_size(&self, actual: u64) -> Result<(), FetchError> {
        let max_bytes = self.settings.max_bytes;
        if actual > max_bytes {
            return Err(FetchError::new(
                FailureKind::TooLarge { max_bytes, actual },
                "page body over the size cap",
            ));
        }
        Ok(())
    }

    /// Status, declared length and media type, before any body is read.
    fn check_headers(&self, response: &Response) -> Result<Option<String>, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        if let Some(declared) = response.content_length() {
            self.check_size(declared)?;
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        match content_type.as_deref() {
            Some(ct) if !self.accepts_media_type(ct) => Err(FetchError::new(
                FailureKind::NotHtml {
                    content_type: ct.to_string(),
                },
                "refusing to scan a non-HTML page",
            )),
            _ => Ok(content_type),
        }
    }

    /// Stream the body, stopping as soon as it outgrows the cap.
    async fn read_body(&self, response: Response) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(classify)?;
            self.check_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let url = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self.client.get(url).send().await.map_err(classify)?;

        let content_type = self.check_headers(&response)?;
        let final_url = response.url().to_string();
        let bytes = self.read_body(response).await?;
        Ok(FetchOutput {
            bytes,
            final_url,
            content_type,
        })
    }
}

fn same_origin_hop(attempt: Attempt<'_>, limit: usize) -> reqwest::redirect::Action {
    let Some(first) = attempt.previous().first() else {
        return attempt.follow();
    };
    if attempt.previous().len() > limit {
        let hops = attempt.previous().len();
        return attempt.error(format!("more than {limit} redirects ({hops})"));
    }
    if attempt.url().origin() != first.origin() {
        let target = attempt.url().to_string();
        return attempt.error(format!("redirect leaves the transcript origin: {target}"));
    }
    attempt.follow()
}

fn classify(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectRefused
    } else {
        FailureKind::Network
    };
    FetchError::new(kind, err.to_string())
}
