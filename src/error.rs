// Typed errors shared by the service clients and the HTTP layer.
// Every failure travels as a value carrying a symbolic code, a human
// message, and the HTTP status the router should answer with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("YouTube API key is not configured.")]
    MissingApiKey,

    #[error("YouTube access token is not configured.")]
    MissingToken,

    #[error("OpenAI API key is not configured.")]
    MissingOpenAiKey,

    #[error("Provide a YouTube video URL or ID.")]
    MissingVideo,

    #[error("Unable to determine the YouTube video ID.")]
    InvalidVideo,

    #[error("Text is required for this operation.")]
    MissingText,

    #[error("Video not found on YouTube.")]
    NotFound,

    #[error("{message}")]
    RequestFailed {
        service: Service,
        status: u16,
        message: String,
    },

    #[error("OpenAI response did not include any content.")]
    EmptyResponse,

    #[error("Failed to reach {service}: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("Missing or malformed Authorization header.")]
    Unauthorized,

    #[error("You are not allowed to edit content.")]
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    YouTube,
    OpenAi,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::YouTube => write!(f, "YouTube"),
            Service::OpenAi => write!(f, "OpenAI"),
        }
    }
}

impl ServiceError {
    /// Stable symbolic code exposed on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::MissingApiKey => "missing_api_key",
            ServiceError::MissingToken => "missing_token",
            ServiceError::MissingOpenAiKey => "missing_openai_key",
            ServiceError::MissingVideo => "missing_video",
            ServiceError::InvalidVideo => "invalid_video",
            ServiceError::MissingText => "missing_text",
            ServiceError::NotFound => "video_not_found",
            ServiceError::RequestFailed { service, .. } => match service {
                Service::YouTube => "youtube_request_failed",
                Service::OpenAi => "openai_request_failed",
            },
            ServiceError::EmptyResponse => "openai_empty_response",
            ServiceError::Transport { .. } => "upstream_unreachable",
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::Forbidden => "forbidden",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::MissingApiKey
            | ServiceError::MissingOpenAiKey
            | ServiceError::MissingVideo
            | ServiceError::InvalidVideo
            | ServiceError::MissingText => StatusCode::BAD_REQUEST,
            ServiceError::MissingToken | ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::RequestFailed { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ServiceError::EmptyResponse => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Transport { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Wrap a reqwest transport failure against the given upstream.
    pub fn transport(service: Service, source: reqwest::Error) -> Self {
        ServiceError::Transport { service, source }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
