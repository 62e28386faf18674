// Text generation handlers
// Summaries, title suggestions, and SEO descriptions via OpenAI

use crate::error::ServiceError;
use crate::handlers::youtube::{resolve_reference, youtube_client_from};
use crate::middleware::auth::editor_auth_middleware;
use crate::openai_client::OpenAiClient;
use crate::youtube_client::VideoData;
use crate::AppState;
use axum::{extract::Extension, response::Json, routing::post, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub fn openai_routes() -> Router {
    Router::new()
        .route("/api/openai/summarize", post(summarize))
        .route("/api/openai/titles", post(titles))
        .route("/api/openai/description", post(description))
        .layer(axum::middleware::from_fn(editor_auth_middleware))
}

#[derive(Deserialize)]
pub struct SummarizeRequest {
    pub text: Option<String>,
    pub video_url: Option<String>,
    pub video_id: Option<String>,
}

#[derive(Deserialize)]
pub struct TitlesRequest {
    pub text: Option<String>,
    pub count: Option<i64>,
}

#[derive(Deserialize)]
pub struct DescriptionRequest {
    pub text: Option<String>,
}

pub(crate) fn openai_client_from(state: &AppState) -> OpenAiClient {
    OpenAiClient::new(
        state.settings.openai_api_key.clone(),
        state.settings.openai_model.clone(),
    )
}

/// Resolve the text to summarize: raw text wins; otherwise the referenced
/// video's description, obtained through the given fetch function. A fetch
/// failure propagates as-is so the caller never reaches OpenAI.
async fn resolve_summary_text<F, Fut>(
    text: Option<String>,
    video_url: Option<&str>,
    video_id: Option<&str>,
    fetch: F,
) -> Result<String, ServiceError>
where
    F: FnOnce(String) -> Fut,
    Fut: std::future::Future<Output = Result<VideoData, ServiceError>>,
{
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        return Ok(text);
    }

    let target =
        resolve_reference(video_url, video_id).map_err(|_| ServiceError::MissingText)?;

    tracing::debug!("Summarize: no text given, fetching video description");
    let video = fetch(target).await?;
    Ok(video.description)
}

/// POST /api/openai/summarize
///
/// Accepts raw text or a video reference; with only a reference, the video's
/// own description is fetched first and summarized. A fetch failure is
/// returned as-is and OpenAI is never called.
async fn summarize(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SummarizeRequest>,
) -> Result<Json<Value>, ServiceError> {
    let youtube = youtube_client_from(&state);
    let text = resolve_summary_text(
        payload.text,
        payload.video_url.as_deref(),
        payload.video_id.as_deref(),
        |target| async move { youtube.fetch_video_data(&target).await },
    )
    .await?;

    let summary = openai_client_from(&state)
        .generate_summary_from_text(&text)
        .await?;

    Ok(Json(json!({ "summary": summary })))
}

/// POST /api/openai/titles
async fn titles(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<TitlesRequest>,
) -> Result<Json<Value>, ServiceError> {
    let text = payload.text.unwrap_or_default();

    let titles = openai_client_from(&state)
        .generate_titles(&text, payload.count)
        .await?;

    Ok(Json(json!({ "titles": titles })))
}

/// POST /api/openai/description
async fn description(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<DescriptionRequest>,
) -> Result<Json<Value>, ServiceError> {
    let text = payload.text.unwrap_or_default();

    let description = openai_client_from(&state)
        .generate_description(&text)
        .await?;

    Ok(Json(json!({ "description": description })))
}
