use crate::errors::{ErrorKind, SummarizeError, UnavailableReason};
use crate::health::{health_report, HealthResponse};
use crate::service::{SummarizerService, SummaryReport};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

const INDEX_HTML: &str = include_str!("../static/index.html");
const MAIN_JS: &str = include_str!("../static/main.js");

pub const DEFAULT_RATIO: f64 = 0.25;
pub const MIN_RATIO: f64 = 0.05;
pub const MAX_RATIO: f64 = 0.8;

static YOUTUBE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{11})(?:[&#?].*)?$",
    )
    .expect("youtube url regex")
});

#[derive(Clone)]
pub struct AppState {
    service: Arc<SummarizerService>,
}

pub fn router(service: Arc<SummarizerService>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/main.js", get(main_js))
        .route("/health", get(health))
        .route("/api/summarize", post(summarize))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received shutdown signal"),
        Err(e) => {
            tracing::warn!(error = ?e, "cannot listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn main_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], MAIN_JS)
}

async fn health() -> Json<HealthResponse> {
    Json(health_report())
}

async fn summarize(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SummarizeOk>, ApiError> {
    let request_id = Uuid::new_v4();
    let req = parse_request(&body).map_err(|e| ApiError::new(request_id, e))?;
    let span = tracing::info_span!("summarize", %request_id, ratio = req.ratio);
    let service = state.service.clone();
    let report = tokio::task::spawn_blocking(move || {
        let _enter = span.enter();
        service.fetch_and_summarize(&req.url, req.ratio)
    })
    .await
    .map_err(|e| SummarizeError::internal(format!("summarize task failed: {e}")))
    .and_then(|res| res)
    .map_err(|e| ApiError::new(request_id, e))?;
    Ok(Json(SummarizeOk {
        status: "ok",
        report,
    }))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummarizeRequest {
    pub url: String,
    pub ratio: f64,
}

/// Lenient parse: a body that is not a JSON object is treated as `{}`.
pub fn parse_request(body: &[u8]) -> Result<SummarizeRequest, SummarizeError> {
    let data: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    let url = data
        .get("url")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();
    let ratio = match data.get("ratio") {
        None => Some(DEFAULT_RATIO),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(_) => None,
    }
    .ok_or_else(|| {
        SummarizeError::validation("Invalid ratio. Provide a number between 0.05 and 0.8.")
    })?;
    if url.is_empty() || !YOUTUBE_URL_RE.is_match(&url) {
        return Err(SummarizeError::validation("Please provide a valid YouTube URL."));
    }
    if !(MIN_RATIO..=MAX_RATIO).contains(&ratio) {
        return Err(SummarizeError::validation("Ratio must be between 0.05 and 0.8."));
    }
    Ok(SummarizeRequest { url, ratio })
}

#[derive(Debug, Serialize)]
struct SummarizeOk {
    status: &'static str,
    #[serde(flatten)]
    report: SummaryReport,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    kind: ErrorKind,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<UnavailableReason>,
}

pub struct ApiError {
    request_id: Uuid,
    error: SummarizeError,
}

impl ApiError {
    fn new(request_id: Uuid, error: SummarizeError) -> Self {
        Self { request_id, error }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.error.kind();
        let status = match kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::TranscriptUnavailable => StatusCode::BAD_GATEWAY,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let reason = match &self.error {
            SummarizeError::Transcript(t) => Some(t.reason()),
            _ => None,
        };
        // Internal details stay in the logs.
        let error = match &self.error {
            SummarizeError::Internal(detail) => {
                tracing::error!(request_id = %self.request_id, %detail, "summarize failed");
                "Unexpected server error.".to_string()
            }
            other => {
                tracing::debug!(request_id = %self.request_id, kind = ?kind, error = %other, "summarize rejected");
                other.to_string()
            }
        };
        let body = ErrorBody {
            status: "error",
            kind,
            error,
            reason,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::summarize::{SummarizeResult, Summarizer, TextRankSummarizer};
    use crate::transcript::testing::{track, StaticProvider};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    const TRANSCRIPT: &[(u64, &str)] = &[
        (0, "Compilers translate source code into machine code."),
        (1500, "A good compiler catches mistakes in source code early."),
        (3000, "I had pancakes for breakfast."),
        (4500, "Machine code runs directly on the processor."),
    ];

    struct PanickingSummarizer;
    impl Summarizer for PanickingSummarizer {
        fn summarize(&self, _text: &str, _ratio: f64) -> Result<SummarizeResult, SummarizeError> {
            panic!("rank matrix exploded");
        }
    }

    fn app_with(provider: StaticProvider, summarizer: Arc<dyn Summarizer>) -> Router {
        let service = SummarizerService::new(Arc::new(provider), summarizer, Vec::new());
        router(Arc::new(service), 16 * 1024)
    }

    fn app() -> Router {
        let provider =
            StaticProvider::new(vec![track("en", false)]).with_chunks("en-manual", TRANSCRIPT);
        app_with(provider, Arc::new(TextRankSummarizer))
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/summarize")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn parse_request_applies_defaults_and_coercions() {
        let req = parse_request(br#"{"url":" https://youtu.be/abcdefghijk "}"#).unwrap();
        assert_eq!(req.url, "https://youtu.be/abcdefghijk");
        assert_eq!(req.ratio, DEFAULT_RATIO);

        let req =
            parse_request(br#"{"url":"youtube.com/watch?v=abcdefghijk&t=1","ratio":"0.5"}"#)
                .unwrap();
        assert_eq!(req.ratio, 0.5);

        let req = parse_request(br#"{"url":"HTTPS://WWW.YOUTUBE.COM/watch?v=abcdefghijk","ratio":0.8}"#)
            .unwrap();
        assert_eq!(req.ratio, 0.8);
    }

    #[test]
    fn parse_request_rejections() {
        fn msg(body: &[u8]) -> String {
            parse_request(body).unwrap_err().to_string()
        }
        assert_eq!(msg(b"not json"), "Please provide a valid YouTube URL.");
        assert_eq!(msg(b"[1,2]"), "Please provide a valid YouTube URL.");
        assert_eq!(
            msg(br#"{"url":"https://vimeo.com/123"}"#),
            "Please provide a valid YouTube URL."
        );
        assert_eq!(
            msg(br#"{"url":"https://youtu.be/abcdefghijk","ratio":"lots"}"#),
            "Invalid ratio. Provide a number between 0.05 and 0.8."
        );
        assert_eq!(
            msg(br#"{"url":"https://youtu.be/abcdefghijk","ratio":null}"#),
            "Invalid ratio. Provide a number between 0.05 and 0.8."
        );
        assert_eq!(
            msg(br#"{"url":"https://youtu.be/abcdefghijk","ratio":0.9}"#),
            "Ratio must be between 0.05 and 0.8."
        );
        assert_eq!(
            msg(br#"{"url":"https://youtu.be/abcdefghijk","ratio":"NaN"}"#),
            "Ratio must be between 0.05 and 0.8."
        );
        // Booleans coerce to 1.0 and 0.0, both out of range.
        assert_eq!(
            msg(br#"{"url":"https://youtu.be/abcdefghijk","ratio":true}"#),
            "Ratio must be between 0.05 and 0.8."
        );
        assert_eq!(
            msg(br#"{"url":"https://youtu.be/abcdefghijk","ratio":false}"#),
            "Ratio must be between 0.05 and 0.8."
        );
        // Ratio parsing is checked before the URL.
        assert_eq!(
            msg(br#"{"url":"bad","ratio":[]}"#),
            "Invalid ratio. Provide a number between 0.05 and 0.8."
        );
    }

    #[tokio::test]
    async fn summarize_returns_report() {
        let (status, body) = post_json(
            app(),
            r#"{"url":"https://www.youtube.com/watch?v=abcdefghijk","ratio":0.5}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["video_id"], "abcdefghijk");
        assert_eq!(body["ratio"], 0.5);
        assert_eq!(body["sentence_count"], 3);
        assert_eq!(body["word_count"], 28);
        let sentences: Vec<&str> = body["sentences"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_str().unwrap())
            .collect();
        assert_eq!(sentences.len(), 3);
        assert!(!sentences.iter().any(|s| s.contains("pancakes")));
        assert_eq!(body["summary"], sentences.join(" "));
    }

    #[tokio::test]
    async fn validation_errors_are_400() {
        let (status, body) = post_json(app(), r#"{"url":"https://example.com/video"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "validation");
        assert_eq!(body["error"], "Please provide a valid YouTube URL.");
        assert!(body.get("reason").is_none());
    }

    #[tokio::test]
    async fn disabled_captions_are_502() {
        let app = app_with(
            StaticProvider::failing(ProviderError::CaptionsDisabled),
            Arc::new(TextRankSummarizer),
        );
        let (status, body) = post_json(app, r#"{"url":"https://youtu.be/abcdefghijk"}"#).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["kind"], "transcript_unavailable");
        assert_eq!(body["reason"], "disabled");
        assert_eq!(body["error"], "Transcripts are disabled for this video.");
    }

    #[tokio::test]
    async fn fetch_failures_hide_provider_details() {
        let app = app_with(
            StaticProvider::failing(ProviderError::Http("connect 10.0.0.7:443 refused".into())),
            Arc::new(TextRankSummarizer),
        );
        let (status, body) = post_json(app, r#"{"url":"https://youtu.be/abcdefghijk"}"#).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["reason"], "fetch_failed");
        assert_eq!(body["error"], "Failed to fetch transcript.");
    }

    #[tokio::test]
    async fn unexpected_failures_are_opaque_500() {
        let provider =
            StaticProvider::new(vec![track("en", false)]).with_chunks("en-manual", TRANSCRIPT);
        let app = app_with(provider, Arc::new(PanickingSummarizer));
        let (status, body) = post_json(app, r#"{"url":"https://youtu.be/abcdefghijk"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["kind"], "internal");
        assert_eq!(body["error"], "Unexpected server error.");
        assert!(!body.to_string().contains("exploded"));
    }

    #[tokio::test]
    async fn health_and_static_pages_are_served() {
        let resp = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["status"], "healthy");

        let resp = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("summarize-form"));

        let resp = app()
            .oneshot(Request::builder().uri("/static/main.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/javascript"
        );
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() {
        let big = format!(r#"{{"url":"https://youtu.be/abcdefghijk","pad":"{}"}}"#, "x".repeat(20_000));
        let req = Request::builder()
            .method("POST")
            .uri("/api/summarize")
            .body(Body::from(big))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
