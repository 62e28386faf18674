// Editor capability gate. The hosting CMS's "can edit content" check is
// modeled as a shared editor token every API caller must present.

use crate::error::ServiceError;
use crate::AppState;
use axum::{
    extract::{Extension, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

pub async fn editor_auth_middleware(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    // Extract the Authorization header
    let auth_header = headers
        .get("Authorization")
        .ok_or(ServiceError::Unauthorized)?;

    let auth_str = auth_header.to_str().map_err(|_| ServiceError::Unauthorized)?;

    // Extract token from "Bearer <token>" format
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(ServiceError::Unauthorized)?;

    // A blank configured token rejects everything rather than opening the API
    if state.settings.editor_token.is_empty() || token != state.settings.editor_token {
        tracing::warn!("Rejected request with invalid editor token");
        return Err(ServiceError::Forbidden);
    }

    Ok(next.run(request).await)
}
