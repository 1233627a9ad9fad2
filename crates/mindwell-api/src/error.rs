//! API error types and JSON error response formatting.
//!
//! ApiError gives every endpoint the same JSON error shape and maps
//! conversation, speech and rendering failures to HTTP status codes.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use mindwell_chat::ChatError;
use mindwell_core::error::MindError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "bad_gateway").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid form fields.
    BadRequest(String),
    /// 404 Not Found - unknown session.
    NotFound(String),
    /// 413 Payload Too Large - audio upload over the configured limit.
    PayloadTooLarge(String),
    /// 415 Unsupported Media Type - upload is not WAV or MP3.
    UnsupportedMedia(String),
    /// 500 Internal Server Error - unexpected server error.
    Internal(String),
    /// 502 Bad Gateway - chat or speech provider failed.
    BadGateway(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "not_found",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::UnsupportedMedia(_) => "unsupported_media_type",
            ApiError::Internal(_) => "internal_error",
            ApiError::BadGateway(_) => "bad_gateway",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.code().to_string();
        let message = match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::UnsupportedMedia(msg)
            | ApiError::Internal(msg)
            | ApiError::BadGateway(msg) => msg,
        };

        if status.is_server_error() {
            tracing::warn!(status = %status, message = %message, "Request failed");
        }

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage
            | ChatError::MessageTooLong(_)
            | ChatError::UnsupportedLanguage(_) => ApiError::BadRequest(err.to_string()),
            ChatError::SessionNotFound(_) => ApiError::NotFound(err.to_string()),
            ChatError::Provider(_) => ApiError::BadGateway(err.to_string()),
            ChatError::Internal(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<MindError> for ApiError {
    fn from(err: MindError) -> Self {
        match &err {
            MindError::Provider(_) | MindError::Transcription(_) | MindError::Synthesis(_) => {
                ApiError::BadGateway(err.to_string())
            }
            MindError::InvalidInput(_) => ApiError::BadRequest(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(err.body_text())
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        ApiError::Internal(format!("Failed to render page: {}", err))
    }
}
