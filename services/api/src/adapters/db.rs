//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `CatalogStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docufix_core::domain::{DocumentRecord, FixProposal, ProblemFlags, ProposedDetails};
use docufix_core::ports::{CatalogStore, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `CatalogStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn map_fetch_err(e: sqlx::Error, what: &str, id: Uuid) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("{} {} not found", what, id)),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DocumentRow {
    id: Uuid,
    name: String,
    category: String,
    price: i64,
    duration_days: i64,
    steps: Vec<String>,
    related_document_ids: Vec<String>,
    image_ref: Option<String>,
}
impl DocumentRow {
    fn to_domain(self) -> DocumentRecord {
        DocumentRecord {
            id: self.id,
            name: self.name,
            category: self.category,
            price: self.price,
            duration_days: self.duration_days,
            steps: self.steps,
            related_document_ids: self.related_document_ids,
            image_ref: self.image_ref,
        }
    }
}

#[derive(FromRow)]
struct FixProposalRow {
    id: Uuid,
    target_document_id: Uuid,
    submitted_by: Uuid,
    description: String,
    steps_problem: bool,
    price_problem: bool,
    duration_problem: bool,
    related_docs_problem: bool,
    image_problem: bool,
    details: serde_json::Value,
    created_at: DateTime<Utc>,
}
impl FixProposalRow {
    fn to_domain(self) -> PortResult<FixProposal> {
        let details: ProposedDetails = serde_json::from_value(self.details)
            .map_err(|e| PortError::Unexpected(format!("Corrupt proposal details: {}", e)))?;
        Ok(FixProposal {
            id: self.id,
            target_document_id: self.target_document_id,
            submitted_by: self.submitted_by,
            description: self.description,
            flags: ProblemFlags {
                steps: self.steps_problem,
                price: self.price_problem,
                duration: self.duration_problem,
                related_docs: self.related_docs_problem,
                image: self.image_problem,
            },
            details,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// `CatalogStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CatalogStore for DbAdapter {
    async fn get_document(&self, document_id: Uuid) -> PortResult<DocumentRecord> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, name, category, price, duration_days, steps, related_document_ids, image_ref \
             FROM documents WHERE id = $1",
        )
        .bind(document_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_fetch_err(e, "Document", document_id))?;
        Ok(row.to_domain())
    }

    async fn list_documents(&self) -> PortResult<Vec<DocumentRecord>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, name, category, price, duration_days, steps, related_document_ids, image_ref \
             FROM documents ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(rows.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_document(&self, document: &DocumentRecord) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO documents (id, name, category, price, duration_days, steps, related_document_ids, image_ref) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(document.id)
        .bind(&document.name)
        .bind(&document.category)
        .bind(document.price)
        .bind(document.duration_days)
        .bind(&document.steps)
        .bind(&document.related_document_ids)
        .bind(&document.image_ref)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn put_document(&self, document_id: Uuid, document: &DocumentRecord) -> PortResult<()> {
        // A single all-or-nothing overwrite; last write wins between
        // concurrent reviewers.
        let result = sqlx::query(
            "UPDATE documents SET name = $2, category = $3, price = $4, duration_days = $5, \
             steps = $6, related_document_ids = $7, image_ref = $8 WHERE id = $1",
        )
        .bind(document_id)
        .bind(&document.name)
        .bind(&document.category)
        .bind(document.price)
        .bind(document.duration_days)
        .bind(&document.steps)
        .bind(&document.related_document_ids)
        .bind(&document.image_ref)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Document {} not found",
                document_id
            )));
        }
        Ok(())
    }

    async fn get_fix_proposal(&self, proposal_id: Uuid) -> PortResult<FixProposal> {
        let row = sqlx::query_as::<_, FixProposalRow>(
            "SELECT id, target_document_id, submitted_by, description, steps_problem, price_problem, \
             duration_problem, related_docs_problem, image_problem, details, created_at \
             FROM fix_proposals WHERE id = $1",
        )
        .bind(proposal_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_fetch_err(e, "Fix proposal", proposal_id))?;
        row.to_domain()
    }

    async fn list_fix_proposals(&self) -> PortResult<Vec<FixProposal>> {
        let rows = sqlx::query_as::<_, FixProposalRow>(
            "SELECT id, target_document_id, submitted_by, description, steps_problem, price_problem, \
             duration_problem, related_docs_problem, image_problem, details, created_at \
             FROM fix_proposals ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        rows.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn create_fix_proposal(&self, proposal: &FixProposal) -> PortResult<()> {
        let details = serde_json::to_value(&proposal.details)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        sqlx::query(
            "INSERT INTO fix_proposals (id, target_document_id, submitted_by, description, \
             steps_problem, price_problem, duration_problem, related_docs_problem, image_problem, \
             details, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(proposal.id)
        .bind(proposal.target_document_id)
        .bind(proposal.submitted_by)
        .bind(&proposal.description)
        .bind(proposal.flags.steps)
        .bind(proposal.flags.price)
        .bind(proposal.flags.duration)
        .bind(proposal.flags.related_docs)
        .bind(proposal.flags.image)
        .bind(details)
        .bind(proposal.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn delete_fix_proposal(&self, proposal_id: Uuid) -> PortResult<()> {
        sqlx::query("DELETE FROM fix_proposals WHERE id = $1")
            .bind(proposal_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}
