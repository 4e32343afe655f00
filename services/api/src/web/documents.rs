//! services/api/src/web/documents.rs
//!
//! Axum handlers for the document catalog endpoints.

use crate::web::rest::{port_error, CreateDocumentRequest, DocumentResponse, ValidationErrorResponse};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use docufix_core::domain::DocumentRecord;
use docufix_core::{normalize, validate};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// List the document catalog.
#[utoipa::path(
    get,
    path = "/documents",
    responses(
        (status = 200, description = "All catalog documents", body = [DocumentResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_documents_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let documents = app_state.store.list_documents().await.map_err(port_error)?;
    let payload: Vec<DocumentResponse> = documents.into_iter().map(Into::into).collect();
    Ok(Json(payload))
}

/// Fetch one catalog document.
#[utoipa::path(
    get,
    path = "/documents/{id}",
    responses(
        (status = 200, description = "The requested document", body = DocumentResponse),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The document's unique ID.")
    )
)]
pub async fn get_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let document = app_state.store.get_document(id).await.map_err(port_error)?;
    Ok(Json(DocumentResponse::from(document)))
}

/// Create a catalog document directly (admin action).
///
/// The payload's loosely-typed fields run through the same normalizer and
/// validation gate as an approved fix, so a half-formed document can never
/// land in the catalog.
#[utoipa::path(
    post,
    path = "/admin/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = DocumentResponse),
        (status = 422, description = "Required fields missing", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_document_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<CreateDocumentRequest>,
) -> Result<Response, (StatusCode, String)> {
    let steps = normalize::steps(&request.steps);
    let price = request.price.as_ref().map(normalize::price).unwrap_or(0);
    let duration_days = request
        .duration_days
        .as_ref()
        .map(normalize::duration_days)
        .unwrap_or(0);
    let related_document_ids = request
        .related_document_ids
        .as_ref()
        .map(|raw| normalize::filter_related_ids(&normalize::related_ids(raw)))
        .unwrap_or_default();
    let image_ref = request
        .image_ref
        .map(Value::String)
        .and_then(|raw| normalize::image(&raw, &None));

    let document = DocumentRecord {
        id: Uuid::new_v4(),
        name: request.name.trim().to_string(),
        category: request.category.trim().to_string(),
        price,
        duration_days,
        steps,
        related_document_ids,
        image_ref,
    };

    if let Err(failed) = validate(&document) {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse::from(failed)),
        )
            .into_response());
    }

    app_state
        .store
        .create_document(&document)
        .await
        .map_err(port_error)?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))).into_response())
}
