//! services/api/src/web/fixes.rs
//!
//! Axum handlers for the fix-proposal workflow: submission, the admin
//! review list, live merge preview, apply, and discard.
//!
//! A proposal is Pending until an admin decision consumes it: a successful
//! apply overwrites the target document and deletes the proposal; a discard
//! deletes the proposal and leaves the document untouched; a failed
//! validation leaves the proposal Pending for the reviewer to adjust.

use crate::web::rest::{
    port_error, DocumentResponse, FixProposalResponse, SelectionPayload, SubmitFixRequest,
    ValidationErrorResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use docufix_core::domain::{FixProposal, ProblemFlags, ProposedDetails};
use docufix_core::{commit_fix, compute_merged_document, duration};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Submission-time unit conversion for a proposed duration.
///
/// When a unit token accompanies a numeric detail, the detail is replaced by
/// the equivalent whole-day count. An unrecognized unit or a non-numeric
/// detail is a no-op and the raw detail is retained as submitted.
fn convert_duration_detail(detail: Option<Value>, unit: Option<&str>) -> Option<Value> {
    let Some(unit) = unit else { return detail };
    let detail = detail?;
    let value = match &detail {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value.and_then(|v| duration::to_days(v, unit)) {
        Some(days) => Some(Value::from(days)),
        None => Some(detail),
    }
}

/// Submit a fix proposal against an existing document.
#[utoipa::path(
    post,
    path = "/fixes",
    request_body = SubmitFixRequest,
    responses(
        (status = 201, description = "Proposal submitted", body = FixProposalResponse),
        (status = 404, description = "Target document not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_fix_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<SubmitFixRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // The target must exist; proposals against deleted documents are
    // unreviewable.
    app_state
        .store
        .get_document(request.target_document_id)
        .await
        .map_err(port_error)?;

    let duration_detail =
        convert_duration_detail(request.duration_detail, request.duration_unit.as_deref());

    let proposal = FixProposal {
        id: Uuid::new_v4(),
        target_document_id: request.target_document_id,
        submitted_by: request.submitted_by,
        description: request.description,
        flags: ProblemFlags {
            steps: request.steps_problem,
            price: request.price_problem,
            duration: request.duration_problem,
            related_docs: request.related_docs_problem,
            image: request.image_problem,
        },
        details: ProposedDetails {
            steps: request.steps_detail,
            price: request.price_detail,
            duration: duration_detail,
            related_docs: request.related_docs_detail,
            image: request.image_detail,
        },
        created_at: Utc::now(),
    };

    app_state
        .store
        .create_fix_proposal(&proposal)
        .await
        .map_err(port_error)?;
    info!("Fix proposal {} submitted against document {}", proposal.id, proposal.target_document_id);
    Ok((StatusCode::CREATED, Json(FixProposalResponse::from(proposal))))
}

/// List all pending fix proposals for the admin dashboard.
#[utoipa::path(
    get,
    path = "/admin/fixes",
    responses(
        (status = 200, description = "All pending proposals", body = [FixProposalResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_fixes_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let proposals = app_state
        .store
        .list_fix_proposals()
        .await
        .map_err(port_error)?;
    let payload: Vec<FixProposalResponse> = proposals.into_iter().map(Into::into).collect();
    Ok(Json(payload))
}

/// Fetch one pending fix proposal.
#[utoipa::path(
    get,
    path = "/admin/fixes/{id}",
    responses(
        (status = 200, description = "The requested proposal", body = FixProposalResponse),
        (status = 404, description = "Proposal not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The proposal's unique ID.")
    )
)]
pub async fn get_fix_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let proposal = app_state
        .store
        .get_fix_proposal(id)
        .await
        .map_err(port_error)?;
    Ok(Json(FixProposalResponse::from(proposal)))
}

/// Preview the merged document under the reviewer's current selections.
///
/// Pure recomputation with no persistence, called on every selection toggle
/// to refresh the live "proposed result" panel.
#[utoipa::path(
    post,
    path = "/admin/fixes/{id}/preview",
    request_body = SelectionPayload,
    responses(
        (status = 200, description = "The merged candidate document", body = DocumentResponse),
        (status = 404, description = "Proposal or target document not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The proposal's unique ID.")
    )
)]
pub async fn preview_fix_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(selection): Json<SelectionPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let proposal = app_state
        .store
        .get_fix_proposal(id)
        .await
        .map_err(port_error)?;
    let original = app_state
        .store
        .get_document(proposal.target_document_id)
        .await
        .map_err(port_error)?;

    let merged = compute_merged_document(&original, &proposal, &selection.into_selection());
    Ok(Json(DocumentResponse::from(merged)))
}

/// Apply a fix proposal under the reviewer's selections.
///
/// On success the committed document overwrites the original in a single
/// write and the proposal is deleted. A validation failure returns 422 with
/// the missing required fields and persists nothing; the proposal stays
/// pending. A store failure after a successful merge is retryable: the
/// merge is a pure computation and re-running it yields the same record.
#[utoipa::path(
    post,
    path = "/admin/fixes/{id}/apply",
    request_body = SelectionPayload,
    responses(
        (status = 200, description = "Fix applied; the committed document", body = DocumentResponse),
        (status = 404, description = "Proposal or target document not found"),
        (status = 422, description = "Candidate failed validation", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The proposal's unique ID.")
    )
)]
pub async fn apply_fix_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(selection): Json<SelectionPayload>,
) -> Result<Response, (StatusCode, String)> {
    let proposal = app_state
        .store
        .get_fix_proposal(id)
        .await
        .map_err(port_error)?;
    let original = app_state
        .store
        .get_document(proposal.target_document_id)
        .await
        .map_err(port_error)?;

    match commit_fix(&original, &proposal, &selection.into_selection()) {
        Ok(committed) => {
            app_state
                .store
                .put_document(committed.id, &committed)
                .await
                .map_err(port_error)?;
            app_state
                .store
                .delete_fix_proposal(proposal.id)
                .await
                .map_err(port_error)?;
            info!("Fix proposal {} applied to document {}", proposal.id, committed.id);
            Ok((StatusCode::OK, Json(DocumentResponse::from(committed))).into_response())
        }
        Err(failed) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse::from(failed)),
        )
            .into_response()),
    }
}

/// Discard a fix proposal without touching the target document.
#[utoipa::path(
    delete,
    path = "/admin/fixes/{id}",
    responses(
        (status = 204, description = "Proposal discarded"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The proposal's unique ID.")
    )
)]
pub async fn discard_fix_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .store
        .delete_fix_proposal(id)
        .await
        .map_err(port_error)?;
    info!("Fix proposal {} discarded", id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duration_conversion_applies_known_units() {
        assert_eq!(
            convert_duration_detail(Some(json!(2)), Some("weeks")),
            Some(json!(14))
        );
        assert_eq!(
            convert_duration_detail(Some(json!("3")), Some("month")),
            Some(json!(90))
        );
        assert_eq!(
            convert_duration_detail(Some(json!(36)), Some("hours")),
            Some(json!(2))
        );
    }

    #[test]
    fn duration_conversion_keeps_raw_detail_on_unrecognized_input() {
        assert_eq!(
            convert_duration_detail(Some(json!(5)), Some("fortnights")),
            Some(json!(5))
        );
        assert_eq!(
            convert_duration_detail(Some(json!("soonish")), Some("days")),
            Some(json!("soonish"))
        );
    }

    #[test]
    fn duration_conversion_without_unit_is_a_passthrough() {
        assert_eq!(
            convert_duration_detail(Some(json!("10 days")), None),
            Some(json!("10 days"))
        );
        assert_eq!(convert_duration_detail(None, Some("days")), None);
    }
}
