//! REST endpoints for the marketing workflows.

use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::model::{
    AgentWorkflowRequest, AgentWorkflowResponse, CreatePostRequest, CreatePostResponse,
    GenerateIdeasRequest, GenerateIdeasResponse,
};
use super::workflow::MarketingService;
use crate::error::{ApiError, Result};
use crate::origin::{OriginPolicy, allow_headers_layer, cors_layer, require_allowed_origin};

/// Shared state for marketing routes.
#[derive(Clone)]
pub struct MarketingRouteState {
    pub service: Arc<MarketingService>,
}

/// Malformed bodies are validation errors with a JSON body.
fn body_or_400<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

/// POST /functions/v1/agent-workflow
async fn agent_workflow(
    State(state): State<MarketingRouteState>,
    payload: std::result::Result<Json<AgentWorkflowRequest>, JsonRejection>,
) -> Result<Json<AgentWorkflowResponse>> {
    let request = body_or_400(payload)?;
    Ok(Json(state.service.run_agent_workflow(request).await?))
}

/// POST /functions/v1/create-post
async fn create_post(
    State(state): State<MarketingRouteState>,
    payload: std::result::Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Json<CreatePostResponse>> {
    let request = body_or_400(payload)?;
    Ok(Json(state.service.create_post(request).await?))
}

/// POST /functions/v1/generate-ideas
async fn generate_ideas(
    State(state): State<MarketingRouteState>,
    payload: std::result::Result<Json<GenerateIdeasRequest>, JsonRejection>,
) -> Result<Json<GenerateIdeasResponse>> {
    let request = body_or_400(payload)?;
    Ok(Json(state.service.generate_ideas(request).await?))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tactix"
    }))
}

/// Build the origin-guarded marketing routes.
///
/// CORS is the outermost layer: origin rejections and panics inside it still
/// carry the CORS headers.
pub fn marketing_routes(service: Arc<MarketingService>, origins: Arc<OriginPolicy>) -> Router {
    let state = MarketingRouteState { service };

    Router::new()
        .route("/functions/v1/agent-workflow", post(agent_workflow))
        .route("/functions/v1/create-post", post(create_post))
        .route("/functions/v1/generate-ideas", post(generate_ideas))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&origins),
            require_allowed_origin,
        ))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(allow_headers_layer())
        .layer(cors_layer(origins))
        .with_state(state)
}

/// The full application: marketing routes, health check and request tracing.
pub fn app(service: Arc<MarketingService>, origins: Arc<OriginPolicy>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(marketing_routes(service, origins))
        .layer(TraceLayer::new_for_http())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": detail })),
    )
        .into_response()
}
