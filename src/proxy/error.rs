use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::{advisor::AdvisorError, model::ErrorBody};

#[derive(Debug)]
pub enum ApiError {
    MissingFields(Vec<&'static str>),
    InvalidBody(String),
    Upstream {
        message: &'static str,
        source: AdvisorError,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(self) -> ErrorBody {
        match self {
            ApiError::MissingFields(fields) => ErrorBody {
                error: "Missing required fields".into(),
                details: Some(Value::from(fields)),
            },
            ApiError::InvalidBody(reason) => ErrorBody {
                error: "Invalid request body".into(),
                details: Some(Value::String(reason)),
            },
            ApiError::Upstream { message, source } => ErrorBody {
                error: message.into(),
                details: Some(source.details()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}
