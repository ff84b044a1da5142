//! Streaming client module
//!
//! Provides the summarization endpoint client and the incremental text decoder.

pub mod client;
pub mod decoder;

// Re-export commonly used types
pub use client::{
    ChunkStream, HttpSummaryClient, ScriptedBackend, ScriptedResponse, SummaryBackend,
    DEFAULT_ENDPOINT_URL, DEFAULT_SUMMARIZE_PATH,
};
pub use decoder::ChunkDecoder;
