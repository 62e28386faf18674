// YouTube metadata handlers
// Fetches video snippets and pushes edited metadata back to YouTube

use crate::error::ServiceError;
use crate::middleware::auth::editor_auth_middleware;
use crate::youtube_client::{CategoryId, TagsInput, VideoData, YouTubeClient};
use crate::AppState;
use axum::{extract::Extension, response::Json, routing::post, Router};
use serde::Deserialize;
use std::sync::Arc;

pub fn youtube_routes() -> Router {
    Router::new()
        .route("/api/youtube/fetch", post(fetch_video))
        .route("/api/youtube/update-meta", post(update_video_meta))
        .layer(axum::middleware::from_fn(editor_auth_middleware))
}

#[derive(Deserialize)]
pub struct FetchRequest {
    pub video_url: Option<String>,
    pub video_id: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateMetaRequest {
    pub video_url: Option<String>,
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<TagsInput>,
    pub category_id: Option<CategoryId>,
}

/// Pick the raw video reference from the request, URL first.
pub(crate) fn resolve_reference(
    video_url: Option<&str>,
    video_id: Option<&str>,
) -> Result<String, ServiceError> {
    let target = match video_url {
        Some(url) if !url.is_empty() => url,
        _ => match video_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(ServiceError::MissingVideo),
        },
    };
    Ok(target.to_string())
}

pub(crate) fn youtube_client_from(state: &AppState) -> YouTubeClient {
    YouTubeClient::new(
        state.settings.youtube_api_key.clone(),
        state.settings.youtube_access_token.clone(),
    )
}

/// POST /api/youtube/fetch
async fn fetch_video(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<FetchRequest>,
) -> Result<Json<VideoData>, ServiceError> {
    let target = resolve_reference(payload.video_url.as_deref(), payload.video_id.as_deref())?;

    let client = youtube_client_from(&state);
    let video = client.fetch_video_data(&target).await?;

    Ok(Json(video))
}

/// POST /api/youtube/update-meta
async fn update_video_meta(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<UpdateMetaRequest>,
) -> Result<Json<VideoData>, ServiceError> {
    let target = resolve_reference(payload.video_url.as_deref(), payload.video_id.as_deref())?;

    let client = youtube_client_from(&state);
    let video = client
        .update_video_metadata(
            &target,
            payload.title.as_deref().unwrap_or_default(),
            payload.description.as_deref().unwrap_or_default(),
            payload.tags.as_ref(),
            payload.category_id.as_ref(),
        )
        .await?;

    Ok(Json(video))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_reference_prefers_url() {
        let target = resolve_reference(Some("https://youtu.be/dQw4w9WgXcQ"), Some("ignored")).unwrap();
        assert_eq!(target, "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn test_resolve_reference_falls_back_to_id() {
        let target = resolve_reference(None, Some("dQw4w9WgXcQ")).unwrap();
        assert_eq!(target, "dQw4w9WgXcQ");

        let target = resolve_reference(Some(""), Some("dQw4w9WgXcQ")).unwrap();
        assert_eq!(target, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_resolve_reference_requires_something() {
        let err = resolve_reference(None, None).unwrap_err();
        assert!(matches!(err, ServiceError::MissingVideo));
        assert_eq!(err.status().as_u16(), 400);

        let err = resolve_reference(Some(""), Some("")).unwrap_err();
        assert!(matches!(err, ServiceError::MissingVideo));
    }
}
