//! crunchdigest - TechCrunch article summaries in the terminal
//!
//! Validates an article URL, posts it to a summarization endpoint and
//! renders the streamed answer as bullet points while it arrives.
//!
//! # Architecture
//!
//! - **session**: the streaming summary client, its request state machine and ports
//! - **streaming**: endpoint client and incremental text decoding
//! - **adapters**: terminal, clipboard and filesystem implementations of the ports

pub mod errors;
pub mod article;
pub mod summary;
pub mod streaming;
pub mod session;
pub mod adapters;
pub mod telemetry;
pub mod doctor;
pub mod cli;

// Re-export commonly used types
pub use errors::{Result, SummaryError};
pub use article::{ArticleReference, Slug, SourceRules};
pub use session::{RequestState, SessionOptions, SessionPorts, SummaryOutcome, SummarySession};
pub use summary::{render, SummaryText};
