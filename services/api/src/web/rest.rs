//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the summary endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    error::{ErrorResponse, HttpError, ValidationErrorResponse, ValidationIssue},
    ping::PingResponse,
    state::AppState,
    summary_task::spawn_summary_task,
    validation,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use text_summarizer_core::domain::{
    NewSummary, SummarizationMethod, SummaryId, SummaryJob, SummaryRecord, SummaryUpdate,
    DEFAULT_SENTENCE_COUNT,
};
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::ping::ping_handler,
        create_summary_handler,
        read_summary_handler,
        list_summaries_handler,
        update_summary_handler,
        delete_summary_handler,
    ),
    components(
        schemas(
            PingResponse,
            SummaryResponse,
            CreateSummaryPayload,
            UpdateSummaryPayload,
            ErrorResponse,
            ValidationErrorResponse,
            ValidationIssue,
        )
    ),
    tags(
        (name = "summaries", description = "Store URLs and summarize the pages behind them.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A stored summary as returned by every summary endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub id: SummaryId,
    pub url: String,
    /// Empty until the background summarization has finished.
    pub summary: String,
    #[schema(example = "lsa")]
    pub summarization_method: Option<String>,
    pub sentence_count: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<SummaryRecord> for SummaryResponse {
    fn from(record: SummaryRecord) -> Self {
        Self {
            id: record.id,
            url: record.url,
            summary: record.summary,
            summarization_method: record.summarization_method.map(|m| m.as_str().to_string()),
            sentence_count: record.sentence_count,
            created_at: record.created_at,
        }
    }
}

/// The request body for creating a summary.
///
/// Bodies are checked field by field in `validation` first; the checked,
/// normalized fields are then read through this serde shape.
#[derive(Debug, PartialEq, Deserialize, ToSchema)]
pub struct CreateSummaryPayload {
    #[schema(example = "https://example.com/article")]
    pub url: String,
    /// One of `lsa`, `lex_rank`, `text_rank`, `edmundson`.
    #[serde(default, deserialize_with = "method_from_name")]
    #[schema(value_type = String, example = "lsa")]
    pub summarization_method: SummarizationMethod,
    #[serde(default = "default_sentence_count")]
    #[schema(minimum = 5, maximum = 30, example = 10)]
    pub sentence_count: i32,
}

fn default_sentence_count() -> i32 {
    DEFAULT_SENTENCE_COUNT
}

fn method_from_name<'de, D>(deserializer: D) -> Result<SummarizationMethod, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer)?
        .parse()
        .map_err(serde::de::Error::custom)
}

impl From<CreateSummaryPayload> for NewSummary {
    fn from(payload: CreateSummaryPayload) -> Self {
        Self {
            url: payload.url,
            summarization_method: payload.summarization_method,
            sentence_count: payload.sentence_count,
        }
    }
}

/// The request body for overwriting a summary.
#[derive(Debug, PartialEq, Deserialize, ToSchema)]
pub struct UpdateSummaryPayload {
    pub url: String,
    pub update_summary: String,
}

impl From<UpdateSummaryPayload> for SummaryUpdate {
    fn from(payload: UpdateSummaryPayload) -> Self {
        Self {
            url: payload.url,
            summary: payload.update_summary,
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a summary record and start summarizing its URL in the background.
///
/// The record is returned immediately with an empty `summary`.
#[utoipa::path(
    post,
    path = "/summaries/",
    tag = "summaries",
    request_body = CreateSummaryPayload,
    responses(
        (status = 201, description = "Record created", body = SummaryResponse),
        (status = 422, description = "Invalid payload", body = ValidationErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_summary_handler(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let payload = validation::create_payload(&body)?;
    let new_summary = NewSummary::from(payload);

    let id = app_state.db.create(new_summary.clone()).await?;
    let record = app_state.db.get_by_id(id).await?.ok_or_else(|| {
        error!("Record {} vanished right after it was created", id);
        HttpError::Internal
    })?;
    info!("Created summary record {} for {}", id, record.url);

    spawn_summary_task(
        app_state.clone(),
        SummaryJob {
            id,
            url: new_summary.url,
            summarization_method: new_summary.summarization_method,
            sentence_count: new_summary.sentence_count,
        },
    );

    Ok((StatusCode::CREATED, Json(SummaryResponse::from(record))))
}

/// Fetch one summary record.
#[utoipa::path(
    get,
    path = "/summaries/{id}/",
    tag = "summaries",
    params(("id" = i64, Path, description = "Record id, greater than 0")),
    responses(
        (status = 200, description = "The record", body = SummaryResponse),
        (status = 404, description = "No record with this id", body = ErrorResponse),
        (status = 422, description = "Invalid id", body = ValidationErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse)
    )
)]
pub async fn read_summary_handler(
    State(app_state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<SummaryResponse>, HttpError> {
    let id = validation::summary_id(&raw_id)?;
    let record = app_state.db.get_by_id(id).await?.ok_or(HttpError::NotFound)?;
    Ok(Json(record.into()))
}

/// List every summary record.
#[utoipa::path(
    get,
    path = "/summaries/",
    tag = "summaries",
    responses(
        (status = 200, description = "All records", body = Vec<SummaryResponse>),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse)
    )
)]
pub async fn list_summaries_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<SummaryResponse>>, HttpError> {
    let records = app_state.db.get_all().await?;
    Ok(Json(records.into_iter().map(SummaryResponse::from).collect()))
}

/// Overwrite a record's URL and summary text.
#[utoipa::path(
    put,
    path = "/summaries/{id}/",
    tag = "summaries",
    params(("id" = i64, Path, description = "Record id, greater than 0")),
    request_body = UpdateSummaryPayload,
    responses(
        (status = 200, description = "The updated record", body = SummaryResponse),
        (status = 404, description = "No record with this id", body = ErrorResponse),
        (status = 422, description = "Invalid id or payload", body = ValidationErrorResponse)
    )
)]
pub async fn update_summary_handler(
    State(app_state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<SummaryResponse>, HttpError> {
    let (id, payload) = validation::both(
        validation::summary_id(&raw_id),
        validation::update_payload(&body),
    )?;
    let record = app_state
        .db
        .update(id, payload.into())
        .await?
        .ok_or(HttpError::NotFound)?;
    info!("Updated summary record {}", id);
    Ok(Json(record.into()))
}

/// Delete a record and return what it held.
#[utoipa::path(
    delete,
    path = "/summaries/{id}/",
    tag = "summaries",
    params(("id" = i64, Path, description = "Record id, greater than 0")),
    responses(
        (status = 200, description = "The deleted record", body = SummaryResponse),
        (status = 404, description = "No record with this id", body = ErrorResponse),
        (status = 422, description = "Invalid id", body = ValidationErrorResponse)
    )
)]
pub async fn delete_summary_handler(
    State(app_state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<SummaryResponse>, HttpError> {
    let id = validation::summary_id(&raw_id)?;
    let record = app_state.db.get_by_id(id).await?.ok_or(HttpError::NotFound)?;
    app_state.db.delete(id).await?;
    info!("Deleted summary record {}", id);
    Ok(Json(record.into()))
}
