use async_trait::async_trait;
use std::fmt::Debug;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

use super::TranslationRequest;

/// Errors a single provider call can end with. None of them leave the
/// backend chain; they only decide whether the next provider is tried.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to connect to API endpoint {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("stream error: {0}")]
    Stream(String),

    #[error("provider returned an empty translation")]
    Empty,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("translation limiter closed")]
    Closed,
}

/// A translation backend.
///
/// Providers are black boxes that either return text or fail. Deadlines,
/// fallback and caching are handled by the chain around them.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short identifier used in logs, reports and cache keys.
    fn name(&self) -> &str;

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;
}
