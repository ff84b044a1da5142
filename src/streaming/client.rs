//! Summarization endpoint streaming client
//!
//! Provides the backend seam used by summarization sessions:
//! - HTTP/1.1 streaming via reqwest
//! - Endpoint: POST {base_url}/api/summarize with `{"url": ...}`
//! - Response: raw text chunks, no framing

use crate::article::ArticleReference;
use crate::errors::{Result, SummaryError};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, Stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

/// Default summarization endpoint
pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:3000";

/// Fixed relative path of the summarize route
pub const DEFAULT_SUMMARIZE_PATH: &str = "/api/summarize";

/// Connect timeout (10 seconds). Reads are never timed out.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Stream of raw body chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Anything that can turn an article into a stream of summary bytes
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Issue exactly one summarization request for `reference`
    ///
    /// Fails with `RequestFailed` on a non-OK status and with
    /// `EmptyResponseBody` when the response has nothing to read.
    async fn open_stream(&self, reference: &ArticleReference) -> Result<ChunkStream>;
}

/// Request body sent to the summarize route
#[derive(Debug, Clone, Serialize)]
struct SummarizeRequest<'a> {
    url: &'a str,
}

/// HTTP streaming client for the summarize route
#[derive(Debug, Clone)]
pub struct HttpSummaryClient {
    client: Client,
    base_url: String,
    summarize_path: String,
}

impl HttpSummaryClient {
    /// Create client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_ENDPOINT_URL, DEFAULT_SUMMARIZE_PATH, CONNECT_TIMEOUT)
    }

    /// Create client with custom configuration
    pub fn with_config(base_url: &str, summarize_path: &str, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(SummaryError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            summarize_path: summarize_path.to_string(),
        })
    }

    /// Full URL of the summarize route
    pub fn summarize_url(&self) -> String {
        format!("{}{}", self.base_url, self.summarize_path)
    }

    /// Check if the endpoint host answers at all
    pub async fn health_check(&self) -> Result<bool> {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => Ok(!response.status().is_server_error()),
            Err(_) => Ok(false),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SummaryBackend for HttpSummaryClient {
    async fn open_stream(&self, reference: &ArticleReference) -> Result<ChunkStream> {
        let url = self.summarize_url();
        tracing::debug!(%url, article = %reference, "posting summarize request");

        let response = self
            .client
            .post(&url)
            .json(&SummarizeRequest {
                url: reference.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string();
            return Err(SummaryError::RequestFailed {
                status: status.as_u16(),
                reason,
            });
        }

        if status == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Err(SummaryError::EmptyResponseBody);
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(|e| SummaryError::StreamingError(e.to_string())));

        Ok(Box::pin(stream))
    }
}

/// Canned backend response
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Stream these chunks, in order
    Chunks(Vec<Vec<u8>>),
    /// Fail with this HTTP status
    Status(u16),
    /// Succeed with no body
    Empty,
}

/// In-memory backend that replays scripted responses
///
/// Responses are consumed front to back; the last one repeats.
#[derive(Debug)]
pub struct ScriptedBackend {
    responses: Mutex<Vec<ScriptedResponse>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Backend that streams the given text chunks
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks = chunks
            .into_iter()
            .map(|c| c.into().into_bytes())
            .collect();
        Self::new(vec![ScriptedResponse::Chunks(chunks)])
    }

    /// Article URLs requested so far
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn next_response(&self) -> Result<ScriptedResponse> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|e| SummaryError::Generic(format!("scripted backend poisoned: {}", e)))?;
        match responses.len() {
            0 => Err(SummaryError::Generic("no scripted response".to_string())),
            1 => Ok(responses[0].clone()),
            _ => Ok(responses.remove(0)),
        }
    }
}

#[async_trait]
impl SummaryBackend for ScriptedBackend {
    async fn open_stream(&self, reference: &ArticleReference) -> Result<ChunkStream> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(reference.as_str().to_string());
        }

        match self.next_response()? {
            ScriptedResponse::Chunks(chunks) => {
                let items: Vec<Result<Bytes>> = chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();
                Ok(Box::pin(stream::iter(items)))
            }
            ScriptedResponse::Status(code) => {
                let reason = StatusCode::from_u16(code)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown error")
                    .to_string();
                Err(SummaryError::RequestFailed {
                    status: code,
                    reason,
                })
            }
            ScriptedResponse::Empty => Err(SummaryError::EmptyResponseBody),
        }
    }
}
