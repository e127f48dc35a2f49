pub mod gemini;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use gemini::GeminiClient;

/// A generative-language backend that turns one prompt into text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `prompt` and returns the first candidate's text, or `None`
    /// when the reply was well formed but carried no text.
    async fn complete(&self, prompt: &str) -> Result<Option<String>, UpstreamError>;
}

#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("upstream returned status {status}")]
    Status { status: u16, details: Value },
    #[error("upstream request failed: {0}")]
    Transport(String),
    #[error("upstream response could not be decoded: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// The detail relayed to callers: the upstream error body when there was one.
    pub fn details(&self) -> Value {
        match self {
            UpstreamError::Status { details, .. } => details.clone(),
            UpstreamError::Transport(msg) | UpstreamError::Decode(msg) => {
                Value::String(msg.clone())
            }
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        // relayed to callers, so drop the URL
        UpstreamError::Transport(err.without_url().to_string())
    }
}
