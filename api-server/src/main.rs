use axum::{
    Router,
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use url::Url;

use suilens::{Explanation, InputError, NarrativeMode, NarrativeView, parse_input, share_link};
use suilens_rpc::{Explainer, ExplainerConfig, FetchError};

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ExplainRequest {
    /// Digest, explorer URL or shared link
    pub input: String,

    /// Also ask the narrative service (default: false)
    #[serde(default)]
    pub ai: bool,
}

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub tx: String,
    #[serde(default)]
    pub ai: bool,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub digest: String,
    pub narrative: NarrativeView,

    #[serde(flatten)]
    pub explanation: Explanation,

    /// Narrative service failure; the rest of the response is still valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,

    pub share_link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ai_available: bool,
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            ApiError::InvalidInput(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Fetch(err) => (StatusCode::BAD_GATEWAY, err.user_message().to_string()),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
struct AppState {
    explainer: Explainer,
    share_base: Url,
}

// ============================================================================
// API Handlers
// ============================================================================

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ai_available: state.explainer.ai_available(),
    })
}

async fn explain(state: &AppState, input: &str, ai: bool) -> Result<ExplainResponse, ApiError> {
    let digest = parse_input(input)?;
    info!(%digest, ai, "explaining transaction");

    let mode = if ai { NarrativeMode::Ai } else { NarrativeMode::Heuristic };
    let outcome = state.explainer.explain(&digest, mode).await?;
    if let Some(error) = &outcome.narrative.error {
        warn!(%digest, %error, "returning explanation without AI narrative");
    }

    Ok(ExplainResponse {
        share_link: share_link(&state.share_base, &digest).to_string(),
        digest,
        ai_error: outcome.narrative.error.clone(),
        narrative: outcome.narrative,
        explanation: outcome.explanation,
    })
}

/// Explain endpoint, JSON body
async fn explain_post(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    explain(&state, &request.input, request.ai).await.map(Json)
}

/// Explain endpoint, `?tx=` deep link form
async fn explain_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExplainQuery>,
) -> Result<Json<ExplainResponse>, ApiError> {
    explain(&state, &query.tx, query.ai).await.map(Json)
}

fn app(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/explain", get(explain_get).post(explain_post))
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

// ============================================================================
// Main Application
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Starting suilens API server");

    let config = ExplainerConfig::load(None)?;
    let state = Arc::new(AppState {
        explainer: Explainer::from_config(&config)?,
        share_base: config.share_base()?,
    });
    info!(rpc_url = %config.rpc_url, ai_available = state.explainer.ai_available(), "clients ready");

    // Get port from environment or use default
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = format!("0.0.0.0:{}", port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("  - Health check: http://localhost:{}/health", port);
    info!("  - Explain endpoint: POST http://localhost:{}/api/v1/explain", port);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use suilens::test_utils::{CETUS_PACKAGE, DIGEST, RecordBuilder};
    use suilens::{AiNarrative, CondensedSummary, TransactionRecord};
    use suilens_rpc::{LedgerClient, NarrativeError, NarrativeProvider};
    use tower::ServiceExt;

    struct StubLedger;

    #[async_trait]
    impl LedgerClient for StubLedger {
        async fn get_transaction(&self, digest: &str) -> Result<TransactionRecord, FetchError> {
            if digest == DIGEST {
                Ok(RecordBuilder::new()
                    .move_call(CETUS_PACKAGE, "pool_script", "swap_a2b")
                    .build())
            } else {
                Err(FetchError::NotFound(digest.to_string()))
            }
        }
    }

    struct RateLimitedNarrator;

    #[async_trait]
    impl NarrativeProvider for RateLimitedNarrator {
        fn is_available(&self) -> bool {
            true
        }

        async fn request_narrative(
            &self,
            _summary: &CondensedSummary,
        ) -> Result<AiNarrative, NarrativeError> {
            Err(NarrativeError::Api("rate limited".into()))
        }
    }

    fn test_app() -> Router {
        app(Arc::new(AppState {
            explainer: Explainer::new(Arc::new(StubLedger), Arc::new(RateLimitedNarrator)),
            share_base: Url::parse("https://suilens.app/").unwrap(),
        }))
    }

    async fn call(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["ai_available"], true);
    }

    #[tokio::test]
    async fn test_explain_post() {
        let request = Request::post("/api/v1/explain")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({ "input": format!("https://suiscan.xyz/mainnet/tx/{DIGEST}") })
                    .to_string(),
            ))
            .unwrap();
        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["digest"], DIGEST);
        assert_eq!(
            body["narrative"]["text"],
            "Sender interacted with Cetus CLMM (pool_script::swap_a2b)."
        );
        assert_eq!(body["share_link"], format!("https://suilens.app/?tx={DIGEST}"));
        assert!(body.get("ai_error").is_none());
    }

    #[tokio::test]
    async fn test_ai_failure_does_not_fail_request() {
        let uri = format!("/api/v1/explain?tx={DIGEST}&ai=true");
        let (status, body) = call(Request::get(uri).body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ai_error"], "Groq API Error: rate limited");
        assert_eq!(body["narrative"]["text"], "Groq API Error: rate limited");
        assert_eq!(body["steps"][0]["label"], "Cetus CLMM");
    }

    #[tokio::test]
    async fn test_invalid_digest_is_bad_request() {
        let (status, body) = call(
            Request::get("/api/v1/explain?tx=not-a-digest")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid transaction digest format.");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_generic() {
        let unknown = "A".repeat(44);
        let (status, body) = call(
            Request::get(format!("/api/v1/explain?tx={unknown}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            body["error"],
            "Failed to fetch transaction details. Check the digest and try again."
        );
    }
}
