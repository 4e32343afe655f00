//! crates/docufix_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to stay independent of the concrete persistent store.

use crate::domain::{DocumentRecord, FixProposal};
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the external store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The persistent store behind the catalog and its pending fixes.
///
/// The reconciliation engine itself never touches this trait; the review
/// workflow fetches through it before merging and writes through it after a
/// successful commit. `put_document` is a single all-or-nothing write with
/// last-write-wins semantics between concurrent reviewers.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // --- Document Management ---
    async fn get_document(&self, document_id: Uuid) -> PortResult<DocumentRecord>;

    async fn list_documents(&self) -> PortResult<Vec<DocumentRecord>>;

    async fn create_document(&self, document: &DocumentRecord) -> PortResult<()>;

    async fn put_document(&self, document_id: Uuid, document: &DocumentRecord) -> PortResult<()>;

    // --- Fix Proposal Management ---
    async fn get_fix_proposal(&self, proposal_id: Uuid) -> PortResult<FixProposal>;

    async fn list_fix_proposals(&self) -> PortResult<Vec<FixProposal>>;

    async fn create_fix_proposal(&self, proposal: &FixProposal) -> PortResult<()>;

    async fn delete_fix_proposal(&self, proposal_id: Uuid) -> PortResult<()>;
}
