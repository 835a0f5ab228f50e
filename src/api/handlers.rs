// src/api/handlers.rs

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::api::{types::*, ApiState};
use crate::core::protocol::PageRequest;
use crate::infra::errors::CardpressError;

/// POST /generate — One step of the multi-page protocol.
pub async fn generate(
    State(state): State<ApiState>,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<ErrorResponse>)> {
    if body.topic.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Topic cannot be empty".into(),
            }),
        ));
    }

    let page_index = body.page_index.0;
    tracing::info!(
        "generate request: topic='{}' style='{}' request_id='{}' page={page_index}",
        body.topic,
        body.style,
        body.request_id
    );

    let req = PageRequest {
        topic: body.topic,
        style: body.style,
        prompt_override: (!body.system_prompt.trim().is_empty()).then_some(body.system_prompt),
        request_id: (!body.request_id.is_empty()).then_some(body.request_id),
        page_index,
    };

    let outcome = state.generator.generate_page(req).await.map_err(|e| {
        tracing::error!("page {page_index} failed: {e}");
        (
            status_for(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(GenerateResponse {
        status: "success".into(),
        request_id: outcome.request_id,
        page_index: outcome.page_index,
        total_pages: outcome.total_pages,
        is_first: outcome.page_index == 0,
        title: outcome.title,
        content: outcome.content,
        hashtags: outcome.hashtags,
        html_path: outcome.artifact.markup_path.display().to_string(),
        image_path: outcome.artifact.image_path.display().to_string(),
    }))
}

/// GET /health — Simple health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn status_for(e: &CardpressError) -> StatusCode {
    match e {
        CardpressError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CardpressError::GenerationTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
