//! Summarization session
//!
//! `SummarySession` owns one article reference, one summary accumulator and
//! one request state. It validates input, drives a single streamed request
//! at a time, and publishes the accumulated text after every chunk. All side
//! effects go through the injected ports.

pub mod ports;
pub mod state;

pub use ports::{
    Clipboard, DisplaySurface, MemoryClipboard, MemoryNavigator, MemoryNotifier, Navigator,
    Notification, NotificationLevel, Notifier, RecordingDisplay,
};
pub use state::{FailurePolicy, RequestEvent, RequestState};

use crate::article::{ArticleReference, Slug, SourceRules};
use crate::errors::{Result, SummaryError};
use crate::streaming::{ChunkDecoder, SummaryBackend};
use crate::summary::SummaryText;
use crate::telemetry::{TelemetryCollector, TelemetryEvent};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Notification text for rejected references
pub const INVALID_ARTICLE_MESSAGE: &str = "Please enter a valid TechCrunch article";

/// Side-effect ports for one session
pub struct SessionPorts {
    pub navigator: Box<dyn Navigator>,
    pub notifier: Box<dyn Notifier>,
    pub clipboard: Box<dyn Clipboard>,
    pub display: Box<dyn DisplaySurface>,
}

impl SessionPorts {
    pub fn new(
        navigator: impl Navigator + 'static,
        notifier: impl Notifier + 'static,
        clipboard: impl Clipboard + 'static,
        display: impl DisplaySurface + 'static,
    ) -> Self {
        Self {
            navigator: Box::new(navigator),
            notifier: Box::new(notifier),
            clipboard: Box::new(clipboard),
            display: Box::new(display),
        }
    }
}

/// Behavior knobs for a session
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub rules: SourceRules,
    pub failure_policy: FailurePolicy,
}

/// Result of a completed stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub article: ArticleReference,
    pub chunks: usize,
    pub bytes: usize,
    pub duration: Duration,
}

/// Streaming summary client for one user session
pub struct SummarySession {
    id: Uuid,
    backend: Arc<dyn SummaryBackend>,
    ports: SessionPorts,
    options: SessionOptions,
    state: RequestState,
    summary: SummaryText,
    current: Option<ArticleReference>,
    telemetry: TelemetryCollector,
}

impl SummarySession {
    pub fn new(backend: Arc<dyn SummaryBackend>, ports: SessionPorts, options: SessionOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            backend,
            ports,
            options,
            state: RequestState::Idle,
            summary: SummaryText::new(),
            current: None,
            telemetry: TelemetryCollector::new(),
        }
    }

    /// Share a telemetry collector with the caller
    pub fn with_telemetry(mut self, telemetry: TelemetryCollector) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Validate a candidate reference, notifying the user on rejection
    pub fn validate(&self, input: &str) -> Result<ArticleReference> {
        ArticleReference::validate(input, &self.options.rules).map_err(|e| {
            tracing::warn!(session = %self.id, input, "rejected article reference");
            self.ports
                .notifier
                .notify(Notification::error(INVALID_ARTICLE_MESSAGE));
            e
        })
    }

    /// Typed-URL submission: validate, record the location, summarize
    pub async fn submit(&mut self, input: &str) -> Result<SummaryOutcome> {
        self.ensure_idle()?;
        let reference = self.validate(input)?;

        self.record_location(&reference);
        self.summarize(reference).await
    }

    /// Deep-link load: record the slug as the location, then summarize
    pub async fn open_slug<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<SummaryOutcome> {
        self.ensure_idle()?;
        let reference = match ArticleReference::from_slug(segments, &self.options.rules) {
            Ok(r) => r,
            Err(e) => {
                self.ports.notifier.notify(Notification::error(e.to_string()));
                return Err(e);
            }
        };
        self.record_location(&reference);
        self.summarize(reference).await
    }

    /// Re-trigger summarization for the navigator's current location
    pub async fn resume(&mut self) -> Result<SummaryOutcome> {
        let slug = match self.current_slug() {
            Ok(slug) => slug,
            Err(e) => {
                self.ports.notifier.notify(Notification::error(e.to_string()));
                return Err(e);
            }
        };
        self.open_slug(slug.segments()).await
    }

    /// Stream a summary for an already validated reference
    ///
    /// Rejected with `AlreadyInFlight` while another request runs.
    pub async fn summarize(&mut self, reference: ArticleReference) -> Result<SummaryOutcome> {
        self.apply(RequestEvent::Submit)?;

        let started = Instant::now();
        self.summary.clear();
        self.current = Some(reference.clone());
        self.ports.display.publish(self.summary.as_str());

        tracing::info!(session = %self.id, article = %reference, "summarization started");
        self.telemetry.record(TelemetryEvent::RequestStarted {
            article: reference.to_string(),
            timestamp: started,
        });

        let mut stream = match self.backend.open_stream(&reference).await {
            Ok(stream) => stream,
            Err(e) => return Err(self.fail(e)),
        };

        let mut decoder = ChunkDecoder::new();
        let mut bytes = 0usize;

        while let Some(next) = stream.next().await {
            let chunk = match next {
                Ok(chunk) => chunk,
                Err(e) => return Err(self.fail(e)),
            };
            let text = decoder.decode(&chunk);

            bytes += chunk.len();
            self.summary.push_chunk(&text);
            self.ports.display.publish(self.summary.as_str());
            self.telemetry.record(TelemetryEvent::ChunkReceived {
                bytes: chunk.len(),
                timestamp: Instant::now(),
            });
            tracing::trace!(session = %self.id, bytes = chunk.len(), "chunk received");
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            self.summary.push_chunk(&tail);
            self.ports.display.publish(self.summary.as_str());
        }

        self.apply(RequestEvent::Complete)?;

        let duration = started.elapsed();
        let chunks = self.summary.chunk_count();
        self.telemetry.record(TelemetryEvent::RequestCompleted {
            chunks,
            duration_ms: duration.as_millis() as u64,
            timestamp: Instant::now(),
        });
        tracing::info!(
            session = %self.id,
            chunks,
            bytes,
            duration_ms = duration.as_millis() as u64,
            "summarization complete"
        );

        Ok(SummaryOutcome {
            article: reference,
            chunks,
            bytes,
            duration,
        })
    }

    /// Shareable link for the current location
    pub fn share_link(&self) -> Result<String> {
        Ok(self.current_slug()?.share_link(&self.options.rules))
    }

    /// Copy the shareable link to the clipboard
    pub fn copy_share_link(&self) -> Result<String> {
        let link = match self.share_link() {
            Ok(link) => link,
            Err(e) => {
                self.ports.notifier.notify(Notification::error(e.to_string()));
                return Err(e);
            }
        };
        self.ports.clipboard.copy(&link)?;
        self.ports
            .notifier
            .notify(Notification::info("Link copied to clipboard").with_icon("🔗"));
        Ok(link)
    }

    /// Copy the raw accumulated summary; false when there is nothing yet
    pub fn copy_summary(&self) -> Result<bool> {
        if self.summary.is_empty() {
            self.ports
                .notifier
                .notify(Notification::info("No summary to copy yet"));
            return Ok(false);
        }
        self.ports.clipboard.copy(self.summary.as_str())?;
        self.ports
            .notifier
            .notify(Notification::info("Summary copied to clipboard").with_icon("✂️"));
        Ok(true)
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn summary(&self) -> &SummaryText {
        &self.summary
    }

    /// Bullet lines for the current summary
    pub fn rendered(&self) -> Vec<String> {
        self.summary.render()
    }

    pub fn current_article(&self) -> Option<&ArticleReference> {
        self.current.as_ref()
    }

    pub fn telemetry(&self) -> &TelemetryCollector {
        &self.telemetry
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn current_slug(&self) -> Result<Slug> {
        let location = self
            .ports
            .navigator
            .current()?
            .ok_or_else(|| SummaryError::MalformedSlug("no location recorded".to_string()))?;
        Slug::parse(&location)
    }

    /// Point the navigator at `reference` so share and resume follow it
    ///
    /// A reference with no path clears the location. Storage failures are
    /// logged and never stop the summary.
    fn record_location(&self, reference: &ArticleReference) {
        let result = match reference.path(&self.options.rules) {
            Some(path) => self.ports.navigator.replace(path).map(|()| {
                tracing::debug!(session = %self.id, path, "location replaced");
            }),
            None => self.ports.navigator.clear().map(|()| {
                tracing::debug!(session = %self.id, "location cleared");
            }),
        };
        if let Err(error) = result {
            tracing::warn!(session = %self.id, %error, "could not record location");
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.state.is_in_flight() {
            tracing::warn!(session = %self.id, "submission ignored, request already in flight");
            return Err(SummaryError::AlreadyInFlight);
        }
        Ok(())
    }

    fn apply(&mut self, event: RequestEvent) -> Result<()> {
        let next = self.state.transition(event)?;
        self.set_state(next);
        Ok(())
    }

    fn set_state(&mut self, next: RequestState) {
        if next == self.state {
            return;
        }
        tracing::debug!(session = %self.id, from = %self.state, to = %next, "state transition");
        self.telemetry.record(TelemetryEvent::StateTransition {
            from: self.state.to_string(),
            to: next.to_string(),
            timestamp: Instant::now(),
        });
        self.state = next;
        self.ports.display.state_changed(next);
    }

    /// Settle state after a failure and surface it; returns the error
    fn fail(&mut self, error: SummaryError) -> SummaryError {
        self.telemetry.record(TelemetryEvent::RequestFailed {
            error: error.to_string(),
            status: error.status(),
            timestamp: Instant::now(),
        });

        if error.is_user_facing() {
            tracing::error!(session = %self.id, %error, "summarization failed");
            self.ports.notifier.notify(Notification::error(error.to_string()));
        } else {
            tracing::debug!(session = %self.id, %error, "summarization aborted");
        }

        match self.options.failure_policy.settle(self.state) {
            Ok(next) => self.set_state(next),
            Err(e) => tracing::error!(session = %self.id, error = %e, "could not settle state"),
        }
        error
    }
}
