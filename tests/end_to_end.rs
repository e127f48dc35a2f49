use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use healthman::{
    advisor::{Advisor, FALLBACK_MESSAGE},
    app::{build_router, AppState},
    client::{ClientError, PlanClient, SubmitError},
    config::GeminiConfig,
    model::{PlanKind, RawForm, RecommendationRequest},
    upstream::{CompletionProvider, GeminiClient, UpstreamError},
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const TEST_KEY: &str = "test-key";

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn echo_generate(
    headers: HeaderMap,
    Path(call): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(TEST_KEY) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            })),
        );
    }
    if call != "gemini-pro:generateContent" {
        return (StatusCode::NOT_FOUND, Json(json!({"error": {"message": call}})));
    }
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": format!("1. Focus: {prompt}\n2. Cardio: run 2.5 km")}]
                },
                "finishReason": "STOP"
            }]
        })),
    )
}

async fn failing_generate() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": {"code": 500, "message": "backend unavailable"}})),
    )
}

async fn empty_generate() -> Json<Value> {
    Json(json!({"promptFeedback": {"blockReason": "SAFETY"}}))
}

async fn spawn_upstream(router: Router) -> SocketAddr {
    spawn(Router::new().nest("/v1beta", router)).await
}

fn gemini_for(addr: SocketAddr, key: &str) -> GeminiClient {
    GeminiClient::new(&GeminiConfig {
        api_key: key.into(),
        model: "gemini-pro".into(),
        api_base: format!("http://{addr}/v1beta"),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

async fn spawn_proxy(gemini: GeminiClient) -> PlanClient {
    let app = build_router(AppState {
        advisor: Advisor::new(Arc::new(gemini)),
    });
    let addr = spawn(app).await;
    PlanClient::new(format!("http://{addr}"))
}

fn kim() -> RawForm {
    RawForm {
        name: "Kim".into(),
        weight: "70".into(),
        height: "175".into(),
        age: "30".into(),
        gender: "female".into(),
        fitness_goal: "Endurance".into(),
        fitness_level: "Beginner".into(),
        plan: String::new(),
    }
}

fn echo_router() -> Router {
    Router::new().route("/models/{call}", post(echo_generate))
}

#[tokio::test]
async fn gemini_client_returns_first_candidate_text() {
    let upstream = spawn_upstream(echo_router()).await;
    let text = gemini_for(upstream, TEST_KEY)
        .complete("hello there")
        .await
        .unwrap()
        .unwrap();
    assert!(text.starts_with("1. Focus: hello there"));
}

#[tokio::test]
async fn gemini_client_relays_error_body() {
    let upstream = spawn_upstream(echo_router()).await;
    let err = gemini_for(upstream, "wrong-key")
        .complete("hello")
        .await
        .unwrap_err();
    match err {
        UpstreamError::Status { status, details } => {
            assert_eq!(status, 400);
            assert_eq!(details["error"]["status"], "INVALID_ARGUMENT");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn exercise_plan_round_trip_through_proxy() {
    let upstream = spawn_upstream(echo_router()).await;
    let client = spawn_proxy(gemini_for(upstream, TEST_KEY)).await;

    let report = client.submit(&kim(), PlanKind::Exercise).await.unwrap();
    assert_eq!(report.bmi.to_string(), "22.86");

    let sections = report.sections().unwrap();
    assert_eq!(sections.len(), 2);
    let text = report.to_text();
    assert!(text.contains("Personalized Exercise Plan for Kim"));
    assert!(text.contains("Create a personalized exercise plan for Kim, a 30-year-old female"));
    assert!(text.contains("run 2.5 km"));
}

#[tokio::test]
async fn diet_round_trip_through_proxy() {
    let upstream = spawn_upstream(echo_router()).await;
    let client = spawn_proxy(gemini_for(upstream, TEST_KEY)).await;

    let response = client
        .fetch_recommendations(&RecommendationRequest {
            age: Some(30.0),
            gender: Some("male".into()),
            bmi: Some(22.86),
        })
        .await
        .unwrap();
    let text = response.recommendation.unwrap();
    assert!(text.contains("Suggest a healthy diet for a 30-year-old male with a BMI of 22.86."));
}

#[tokio::test]
async fn upstream_500_becomes_proxy_500() {
    let upstream =
        spawn_upstream(Router::new().route("/models/{call}", post(failing_generate))).await;
    let client = spawn_proxy(gemini_for(upstream, TEST_KEY)).await;

    let err = client.submit(&kim(), PlanKind::Exercise).await.unwrap_err();
    assert!(matches!(err, SubmitError::Request(ClientError::Status(500))));
}

#[tokio::test]
async fn proxy_error_body_carries_upstream_details() {
    let upstream =
        spawn_upstream(Router::new().route("/models/{call}", post(failing_generate))).await;
    let app = build_router(AppState {
        advisor: Advisor::new(Arc::new(gemini_for(upstream, TEST_KEY))),
    });
    let proxy = spawn(app).await;

    let response = reqwest::Client::new()
        .post(format!("http://{proxy}/fetch-recommendations"))
        .json(&json!({"age": 30, "gender": "male", "bmi": "22.86"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch recommendations");
    assert_eq!(body["details"]["error"]["message"], "backend unavailable");
}

#[tokio::test]
async fn unreachable_upstream_becomes_proxy_500() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    let client = spawn_proxy(gemini_for(dead, TEST_KEY)).await;
    let err = client.submit(&kim(), PlanKind::Diet).await.unwrap_err();
    assert!(matches!(err, SubmitError::Request(ClientError::Status(500))));
}

#[tokio::test]
async fn reply_without_candidates_uses_fallback() {
    let upstream =
        spawn_upstream(Router::new().route("/models/{call}", post(empty_generate))).await;
    let client = spawn_proxy(gemini_for(upstream, TEST_KEY)).await;

    let report = client.submit(&kim(), PlanKind::Diet).await.unwrap();
    assert_eq!(report.text.as_deref(), Some(FALLBACK_MESSAGE));
}
