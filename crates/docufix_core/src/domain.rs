//! crates/docufix_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The canonical, persisted catalog entity describing a document procedure.
///
/// Mutated only through an approved fix or a direct admin edit; writes are
/// always all-or-nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    /// Non-negative, currency-minor-unit-free.
    pub price: i64,
    /// Non-negative day count.
    pub duration_days: i64,
    /// Ordered list of non-empty instructions.
    pub steps: Vec<String>,
    /// Raw identifier tokens; the commit path filters these against the
    /// fixed identifier format, preserving order and duplicates.
    pub related_document_ids: Vec<String>,
    /// Absolute URL or embedded data URI, when present.
    pub image_ref: Option<String>,
}

/// Per-field booleans marking which parts of a document a fix claims are wrong.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemFlags {
    pub steps: bool,
    pub price: bool,
    pub duration: bool,
    pub related_docs: bool,
    pub image: bool,
}

/// Raw replacement payloads supplied by a submitter, one per flagged field.
///
/// Values arrive in heterogeneous encodings (string, array, number, or a
/// JSON-encoded string); decoding is the normalizer's job, never the store's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedDetails {
    pub steps: Option<Value>,
    pub price: Option<Value>,
    pub duration: Option<Value>,
    pub related_docs: Option<Value>,
    pub image: Option<Value>,
}

/// A pending, field-tagged correction submitted against one `DocumentRecord`.
///
/// Consumed (and then deleted) by an admin decision; it has no lifecycle
/// beyond pending review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixProposal {
    pub id: Uuid,
    pub target_document_id: Uuid,
    pub submitted_by: Uuid,
    pub description: String,
    pub flags: ProblemFlags,
    pub details: ProposedDetails,
    pub created_at: DateTime<Utc>,
}

/// The reviewer's ephemeral per-field accept/reject choices for one review
/// session. Never persisted; a selection only has effect where the matching
/// problem flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    pub steps: bool,
    pub price: bool,
    pub duration: bool,
    pub related_docs: bool,
    pub image: bool,
}

impl SelectionState {
    /// The default selection: every flagged field's proposed value is applied.
    pub fn accept_all() -> Self {
        Self {
            steps: true,
            price: true,
            duration: true,
            related_docs: true,
            image: true,
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::accept_all()
    }
}
