//! services/api/src/web/rest.rs
//!
//! Shared REST payload types, error mapping, and the master definition for
//! the OpenAPI specification. The handlers themselves live in
//! `web::documents` and `web::fixes`.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use docufix_core::domain::{DocumentRecord, FixProposal, SelectionState};
use docufix_core::ports::PortError;
use docufix_core::{duration, ValidationFailed};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::{documents, fixes};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        documents::list_documents_handler,
        documents::get_document_handler,
        documents::create_document_handler,
        fixes::submit_fix_handler,
        fixes::list_fixes_handler,
        fixes::get_fix_handler,
        fixes::preview_fix_handler,
        fixes::apply_fix_handler,
        fixes::discard_fix_handler,
    ),
    components(
        schemas(
            DocumentResponse,
            CreateDocumentRequest,
            FixProposalResponse,
            SubmitFixRequest,
            SelectionPayload,
            ValidationErrorResponse,
        )
    ),
    tags(
        (name = "Docufix API", description = "Community-moderated document-procedure catalog: proposals, review, and reconciliation.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A catalog document as served to clients. `durationDisplay` is derived
/// from the day count at response time.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: i64,
    pub duration_days: i64,
    pub duration_display: String,
    pub steps: Vec<String>,
    pub related_document_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl From<DocumentRecord> for DocumentResponse {
    fn from(doc: DocumentRecord) -> Self {
        let duration_display = duration::render_days(doc.duration_days);
        Self {
            id: doc.id,
            name: doc.name,
            category: doc.category,
            price: doc.price,
            duration_days: doc.duration_days,
            duration_display,
            steps: doc.steps,
            related_document_ids: doc.related_document_ids,
            image_ref: doc.image_ref,
        }
    }
}

/// Direct admin creation payload. The loosely-typed fields accept the same
/// encodings a fix proposal may carry and run through the normalizer.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub duration_days: Option<Value>,
    pub steps: Value,
    #[serde(default)]
    pub related_document_ids: Option<Value>,
    #[serde(default)]
    pub image_ref: Option<String>,
}

/// A pending fix proposal as served to the admin dashboard.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixProposalResponse {
    pub id: Uuid,
    pub target_document_id: Uuid,
    pub submitted_by: Uuid,
    pub description: String,
    pub steps_problem: bool,
    pub price_problem: bool,
    pub duration_problem: bool,
    pub related_docs_problem: bool,
    pub image_problem: bool,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

impl From<FixProposal> for FixProposalResponse {
    fn from(p: FixProposal) -> Self {
        let details = serde_json::to_value(&p.details).unwrap_or(Value::Null);
        Self {
            id: p.id,
            target_document_id: p.target_document_id,
            submitted_by: p.submitted_by,
            description: p.description,
            steps_problem: p.flags.steps,
            price_problem: p.flags.price,
            duration_problem: p.flags.duration,
            related_docs_problem: p.flags.related_docs,
            image_problem: p.flags.image,
            details,
            created_at: p.created_at,
        }
    }
}

/// The submission payload for a new fix proposal. Details are raw and
/// loosely typed; they are decoded only during review. A duration detail
/// accompanied by a unit token is converted to days at submission time.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFixRequest {
    pub target_document_id: Uuid,
    pub submitted_by: Uuid,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps_problem: bool,
    #[serde(default)]
    pub price_problem: bool,
    #[serde(default)]
    pub duration_problem: bool,
    #[serde(default)]
    pub related_docs_problem: bool,
    #[serde(default)]
    pub image_problem: bool,
    #[serde(default)]
    pub steps_detail: Option<Value>,
    #[serde(default)]
    pub price_detail: Option<Value>,
    #[serde(default)]
    pub duration_detail: Option<Value>,
    #[serde(default)]
    pub duration_unit: Option<String>,
    #[serde(default)]
    pub related_docs_detail: Option<Value>,
    #[serde(default)]
    pub image_detail: Option<Value>,
}

/// The reviewer's per-field accept/reject choices. Every field defaults to
/// `true`, matching the engine's accept-all default; fields without a
/// problem flag are ignored by the merge.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectionPayload {
    pub steps: bool,
    pub price: bool,
    pub duration: bool,
    pub related_docs: bool,
    pub image: bool,
}

impl Default for SelectionPayload {
    fn default() -> Self {
        Self {
            steps: true,
            price: true,
            duration: true,
            related_docs: true,
            image: true,
        }
    }
}

impl SelectionPayload {
    pub fn into_selection(self) -> SelectionState {
        SelectionState {
            steps: self.steps,
            price: self.price,
            duration: self.duration,
            related_docs: self.related_docs,
            image: self.image,
        }
    }
}

/// Returned with a 422 when a candidate document fails the validation gate.
#[derive(Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    pub missing: Vec<String>,
}

impl From<ValidationFailed> for ValidationErrorResponse {
    fn from(failed: ValidationFailed) -> Self {
        Self {
            missing: failed.missing.iter().map(|f| f.to_string()).collect(),
        }
    }
}

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Maps a port error onto an HTTP status for handler responses.
pub fn port_error(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        PortError::Unexpected(msg) => {
            error!("Store operation failed: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_payload_defaults_every_field_to_accept() {
        let payload: SelectionPayload = serde_json::from_str("{}").unwrap();
        let selection = payload.into_selection();
        assert_eq!(selection, SelectionState::accept_all());
    }

    #[test]
    fn selection_payload_allows_partial_decline() {
        let payload: SelectionPayload =
            serde_json::from_str(r#"{"steps": false, "relatedDocs": false}"#).unwrap();
        let selection = payload.into_selection();
        assert!(!selection.steps);
        assert!(!selection.related_docs);
        assert!(selection.price);
        assert!(selection.duration);
        assert!(selection.image);
    }
}
