//! crates/docufix_core/src/validate.rs
//!
//! Minimum-completeness gate a candidate document must pass before it may
//! overwrite the original.

use crate::domain::DocumentRecord;

/// Returned when a candidate document fails the gate. Carries every missing
/// required field, in a stable order, so the reviewer sees the full picture
/// at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("document is missing required fields: {}", .missing.join(", "))]
pub struct ValidationFailed {
    pub missing: Vec<&'static str>,
}

/// Checks the candidate satisfies the completeness invariants: non-empty
/// `name` and `category`, and at least one step after normalization.
/// `price`, `durationDays`, `relatedDocumentIds`, and `imageRef` may be
/// zero, empty, or absent.
pub fn validate(candidate: &DocumentRecord) -> Result<(), ValidationFailed> {
    let mut missing = Vec::new();
    if candidate.name.trim().is_empty() {
        missing.push("name");
    }
    if candidate.category.trim().is_empty() {
        missing.push("category");
    }
    if candidate.steps.is_empty() {
        missing.push("steps");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailed { missing })
    }
}
