use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{error, info, warn};

use crate::{
    app::AppState,
    model::{Bmi, DietQuery, ExerciseQuery, FormInput, PlanKind, RawForm},
    render::{self, PlanReport},
};

/// Server-rendered form: `GET /` shows it, `POST /plan` answers with the result page.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show_form))
        .route("/plan", post(submit_plan))
}

async fn show_form() -> Response {
    match render::form_page(&RawForm::default(), None) {
        Ok(html) => Html(html).into_response(),
        Err(err) => render_failure(err),
    }
}

async fn submit_plan(State(state): State<AppState>, Form(raw): Form<RawForm>) -> Response {
    let kind = PlanKind::from_field(&raw.plan);

    let input = match FormInput::parse(&raw, kind) {
        Ok(input) => input,
        Err(err) => {
            warn!(%err, ?kind, "form submission rejected");
            return form_with_message(StatusCode::BAD_REQUEST, &raw, &err.to_string());
        }
    };
    let bmi = Bmi::from_metric(input.weight_kg, input.height_cm);
    info!(?kind, %bmi, category = %bmi.category(), "form submission accepted");

    let outcome = match kind {
        PlanKind::Diet => {
            let query = DietQuery::from_form(&input, bmi);
            state.advisor.diet_recommendation(&query).await
        }
        PlanKind::Exercise => {
            let query = ExerciseQuery::from_form(&input, bmi);
            state.advisor.exercise_plan(&query).await
        }
    };

    let text = match outcome {
        Ok(text) => text,
        Err(err) => {
            error!(%err, details = %err.details(), ?kind, "plan generation failed");
            return form_with_message(
                StatusCode::INTERNAL_SERVER_ERROR,
                &raw,
                kind.failure_message(),
            );
        }
    };

    let report = PlanReport {
        kind,
        name: input.name,
        bmi,
        text: Some(text),
    };
    match render::plan_page(&report) {
        Ok(html) => Html(html).into_response(),
        Err(err) => render_failure(err),
    }
}

fn form_with_message(status: StatusCode, raw: &RawForm, message: &str) -> Response {
    match render::form_page(raw, Some(message)) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => render_failure(err),
    }
}

fn render_failure(err: minijinja::Error) -> Response {
    error!(?err, "failed to render page");
    (StatusCode::INTERNAL_SERVER_ERROR, "template error".to_string()).into_response()
}
