//! Content loading for `Iframe` and `Async` steps.
//!
//! Async fetches are fire-and-forget: the request runs on the ambient tokio
//! runtime and its result is queued on a channel. The wizard applies queued
//! results on its own thread, so the view is only ever touched from one place.
//! Fetch failures are logged and queued without a body; the loading
//! placeholder stays in the panel.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::surface::{PanelContent, RenderSurface};
use crate::wizard::{ContentMode, Step, StepKey};

/// Errors a fetcher may report. They never reach the wizard's callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("no content registered for {0}")]
    NotFound(String),
}

/// Fetch-by-URL collaborator for `Async` steps.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Fetches step content over HTTP.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Fetches from a fixed url → body table. Handy for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    bodies: std::collections::HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

/// A finished fetch waiting to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEvent {
    pub key: StepKey,
    /// Fetched markup, or `None` when the fetch failed
    pub body: Option<String>,
}

/// Resolves a step's body according to its content mode.
///
/// At most one fetch per step is in flight; a step shown again before its
/// fetch finishes keeps waiting on the first one.
pub struct ContentLoader {
    fetcher: Option<Arc<dyn ContentFetcher>>,
    /// Rendered loading template shown while a fetch is pending
    placeholder: String,
    in_flight: HashSet<StepKey>,
    tx: mpsc::UnboundedSender<ContentEvent>,
    rx: mpsc::UnboundedReceiver<ContentEvent>,
}

impl ContentLoader {
    pub fn new(fetcher: Option<Arc<dyn ContentFetcher>>, placeholder: String) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            placeholder,
            in_flight: HashSet::new(),
            tx,
            rx,
        }
    }

    /// Load the body of `step` (at `index`, identified by `key`) into the surface.
    ///
    /// No-op for inline steps, and for already loaded steps unless
    /// `force_reload` is set.
    pub fn load<S: RenderSurface>(
        &mut self,
        index: usize,
        key: StepKey,
        step: &mut Step,
        force_reload: bool,
        surface: &mut S,
    ) {
        if step.content_mode == ContentMode::Html || (!force_reload && step.content_loaded) {
            return;
        }

        match step.content_mode {
            ContentMode::Iframe => {
                surface.set_panel_content(
                    index,
                    PanelContent::Frame {
                        src: step.content_url.clone(),
                    },
                );
                step.content_loaded = true;
            }
            ContentMode::Async => {
                surface.set_panel_busy(index, true);
                surface.set_panel_content(index, PanelContent::Html(self.placeholder.clone()));
                self.request(key, step.content_url.clone());
            }
            ContentMode::Html => {}
        }
    }

    fn request(&mut self, key: StepKey, url: String) {
        if self.in_flight.contains(&key) {
            tracing::debug!(url = %url, "Fetch already in flight");
            return;
        }
        let Some(fetcher) = self.fetcher.clone() else {
            tracing::warn!(url = %url, "No content fetcher configured; async step stays loading");
            return;
        };
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(url = %url, "No async runtime; async step stays loading");
                return;
            }
        };

        self.in_flight.insert(key);
        let tx = self.tx.clone();
        tracing::debug!(url = %url, "Fetching async step content");
        handle.spawn(async move {
            let body = match fetcher.fetch(&url).await {
                Ok(body) => Some(body),
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "Async step content fetch failed");
                    None
                }
            };
            // Receiver gone means the wizard was destroyed.
            let _ = tx.send(ContentEvent { key, body });
        });
    }

    /// Whether a fetch for `key` has been started and not yet received.
    pub fn is_in_flight(&self, key: StepKey) -> bool {
        self.in_flight.contains(&key)
    }

    /// Next finished fetch, if one is queued.
    pub fn try_next(&mut self) -> Option<ContentEvent> {
        let event = self.rx.try_recv().ok()?;
        self.in_flight.remove(&event.key);
        Some(event)
    }

    /// Wait for the next finished fetch.
    pub async fn next(&mut self) -> Option<ContentEvent> {
        let event = self.rx.recv().await?;
        self.in_flight.remove(&event.key);
        Some(event)
    }

    /// Drop every queued result and forget pending fetches.
    pub fn clear(&mut self) {
        while self.rx.try_recv().is_ok() {}
        self.in_flight.clear();
    }
}
