use axum::{
    routing::{get, post},
    Router,
    body::Bytes,
    extract::{Json, State},
    http::{HeaderMap, header::CONTENT_TYPE},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{Result, AppError};
use crate::api::models::{HealthResponse, NewsRequest, NewsResponse};
use crate::query::DigestQuery;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/news", post(news_handler))
        .route("/api/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn news_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<NewsResponse>> {
    let req = parse_news_request(&headers, &body)?;
    let query = DigestQuery::from_request(req)?;

    let Some(digest) = state.digest.as_ref() else {
        error!("News or Gemini API key is not configured");
        return Err(AppError::Config("Missing API keys".to_string()));
    };

    info!(topic = %query.topic, date_range = ?query.date_range, "Processing news request");
    let start_time = std::time::Instant::now();

    let response = digest.digest(query).await.inspect_err(|err| {
        error!(error = %err, "News request failed");
    })?;

    info!(
        items = response.news.len(),
        elapsed = ?start_time.elapsed(),
        "News request completed"
    );
    Ok(Json(response))
}

/// A body that is not JSON-typed, or is empty, reads as a request with no
/// fields, so it fails topic validation instead of body parsing.
fn parse_news_request(headers: &HeaderMap, body: &[u8]) -> Result<NewsRequest> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            let mime = value.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        });

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NewsRequest::default());
    }

    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}
