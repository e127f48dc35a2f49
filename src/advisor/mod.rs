use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    model::{DietQuery, ExerciseQuery},
    prompts,
    upstream::{CompletionProvider, UpstreamError},
};

/// Returned in place of the upstream text when a reply carries no candidate text.
pub const FALLBACK_MESSAGE: &str = "No recommendation could be generated. Please try again later.";

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("failed to build prompt: {0}")]
    Prompt(#[from] minijinja::Error),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AdvisorError {
    pub fn details(&self) -> Value {
        match self {
            AdvisorError::Upstream(err) => err.details(),
            AdvisorError::Prompt(err) => Value::String(err.to_string()),
        }
    }
}

/// Builds prompts and asks the provider for a diet or exercise text.
#[derive(Clone)]
pub struct Advisor {
    provider: Arc<dyn CompletionProvider>,
}

impl Advisor {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub async fn diet_recommendation(&self, query: &DietQuery) -> Result<String, AdvisorError> {
        let prompt = prompts::diet_prompt(query)?;
        self.ask("diet", &prompt).await
    }

    pub async fn exercise_plan(&self, query: &ExerciseQuery) -> Result<String, AdvisorError> {
        let prompt = prompts::exercise_prompt(query)?;
        self.ask("exercise", &prompt).await
    }

    async fn ask(&self, kind: &'static str, prompt: &str) -> Result<String, AdvisorError> {
        info!(kind, prompt_len = prompt.len(), "requesting completion");
        match self.provider.complete(prompt).await? {
            Some(text) => Ok(text),
            None => {
                warn!(kind, "upstream reply had no candidate text; using fallback");
                Ok(FALLBACK_MESSAGE.to_string())
            }
        }
    }
}
