use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    model::{
        Bmi, ExercisePlanRequest, ExercisePlanResponse, FormError, FormInput, PlanKind, RawForm,
        RecommendationRequest, RecommendationResponse,
    },
    render::PlanReport,
};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Request(#[from] ClientError),
}

/// Talks to a running recommendation proxy.
#[derive(Clone)]
pub struct PlanClient {
    http: Client,
    base_url: String,
}

impl PlanClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Validates the raw fields, computes BMI and issues exactly one request.
    pub async fn submit(&self, raw: &RawForm, kind: PlanKind) -> Result<PlanReport, SubmitError> {
        let input = FormInput::parse(raw, kind)?;
        let bmi = Bmi::from_metric(input.weight_kg, input.height_cm);

        let text = match kind {
            PlanKind::Diet => {
                self.fetch_recommendations(&RecommendationRequest::from_form(&input, bmi))
                    .await?
                    .recommendation
            }
            PlanKind::Exercise => {
                self.fetch_exercise_plan(&ExercisePlanRequest::from_form(&input, bmi))
                    .await?
                    .exercise_plan
            }
        };

        Ok(PlanReport {
            kind,
            name: input.name,
            bmi,
            text,
        })
    }

    pub async fn fetch_recommendations(
        &self,
        body: &RecommendationRequest,
    ) -> Result<RecommendationResponse, ClientError> {
        self.post("/fetch-recommendations", body).await
    }

    pub async fn fetch_exercise_plan(
        &self,
        body: &ExercisePlanRequest,
    ) -> Result<ExercisePlanResponse, ClientError> {
        self.post("/fetch-exercise-plan", body).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = url.as_str(), "posting to proxy");

        let response = self.http.post(&url).json(body).send().await.map_err(|err| {
            error!(url = url.as_str(), %err, "proxy request failed");
            ClientError::Transport(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(
                url = url.as_str(),
                status = status.as_u16(),
                body = text.as_str(),
                "proxy returned an error"
            );
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.json::<R>().await?)
    }
}
