use async_trait::async_trait;

use super::{CompletionProvider, UpstreamError};

/// Canned provider for handler tests.
pub(crate) enum StubProvider {
    Reply(String),
    Empty,
    Fail(UpstreamError),
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, _prompt: &str) -> Result<Option<String>, UpstreamError> {
        match self {
            StubProvider::Reply(text) => Ok(Some(text.clone())),
            StubProvider::Empty => Ok(None),
            StubProvider::Fail(err) => Err(err.clone()),
        }
    }
}
