//! services/api/src/web/error.rs
//!
//! The error type returned by every HTTP handler and how each variant is
//! rendered to the client.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use text_summarizer_core::ports::PortError;
use tracing::error;
use utoipa::ToSchema;

pub const NOT_FOUND_DETAIL: &str = "Summary not found; please try another ID";

/// One failing input, located by `loc` (e.g. `["body", "url"]`).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ValidationIssue {
    #[serde(rename = "type")]
    pub kind: String,
    #[schema(value_type = Vec<String>)]
    pub loc: Vec<Value>,
    pub msg: String,
    #[schema(value_type = Object)]
    pub input: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object, required = false)]
    pub ctx: Option<Value>,
}

impl ValidationIssue {
    pub fn new(kind: &str, loc: Vec<Value>, msg: impl Into<String>, input: Value) -> Self {
        Self {
            kind: kind.to_string(),
            loc,
            msg: msg.into(),
            input,
            ctx: None,
        }
    }

    pub fn with_ctx(mut self, ctx: Value) -> Self {
        self.ctx = Some(ctx);
        self
    }
}

/// Body of a 422 response.
#[derive(Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub detail: Vec<ValidationIssue>,
}

/// Body of every other error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug)]
pub enum HttpError {
    Validation(Vec<ValidationIssue>),
    NotFound,
    TooManyRequests { retry_after_secs: u64 },
    Internal,
}

impl From<Vec<ValidationIssue>> for HttpError {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        HttpError::Validation(issues)
    }
}

impl From<PortError> for HttpError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::NotFound(_) => HttpError::NotFound,
            PortError::Unexpected(message) => {
                error!("Store operation failed: {}", message);
                HttpError::Internal
            }
        }
    }
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { detail: message.to_string() })).into_response()
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::Validation(issues) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorResponse { detail: issues }),
            )
                .into_response(),
            HttpError::NotFound => detail(StatusCode::NOT_FOUND, NOT_FOUND_DETAIL),
            HttpError::TooManyRequests { retry_after_secs } => {
                let mut response = detail(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests");
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, retry_after_secs.into());
                response
            }
            HttpError::Internal => detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        }
    }
}
