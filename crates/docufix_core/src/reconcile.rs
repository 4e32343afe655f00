//! crates/docufix_core/src/reconcile.rs
//!
//! The reconciliation orchestrator: resolves each reconcilable field,
//! normalizes it, assembles the candidate document, and gates commits
//! behind validation. Both entry points are pure functions over their
//! inputs, so `compute_merged_document` can back a live preview that is
//! recomputed on every reviewer toggle, and `commit_fix` is idempotent
//! given the same inputs.

use crate::domain::{DocumentRecord, FixProposal, SelectionState};
use crate::normalize;
use crate::resolve::{resolve, RawField};
use crate::validate::{validate, ValidationFailed};

/// The five normalized reconcilable fields, ready for assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFields {
    pub price: i64,
    pub duration_days: i64,
    pub steps: Vec<String>,
    pub related_document_ids: Vec<String>,
    pub image_ref: Option<String>,
}

/// Overlays the resolved reconcilable fields onto the original document.
/// Non-reconcilable fields (`id`, `name`, `category`) are copied verbatim.
/// Assembly always succeeds structurally; validation is a separate gate.
pub fn assemble(original: &DocumentRecord, fields: ResolvedFields) -> DocumentRecord {
    DocumentRecord {
        id: original.id,
        name: original.name.clone(),
        category: original.category.clone(),
        price: fields.price,
        duration_days: fields.duration_days,
        steps: fields.steps,
        related_document_ids: fields.related_document_ids,
        image_ref: fields.image_ref,
    }
}

/// Computes the merged document for a proposal under the reviewer's current
/// selections. Safe to call repeatedly; no persistence, no side effects.
///
/// Related-document tokens are not format-filtered here, so the preview
/// shows exactly what the submitter proposed; filtering happens in
/// [`commit_fix`].
pub fn compute_merged_document(
    original: &DocumentRecord,
    proposal: &FixProposal,
    selection: &SelectionState,
) -> DocumentRecord {
    let flags = &proposal.flags;
    let details = &proposal.details;

    let steps = match resolve(
        flags.steps,
        selection.steps,
        &original.steps,
        details.steps.as_ref(),
    ) {
        RawField::Original(v) => v.clone(),
        RawField::Proposed(raw) => normalize::steps(raw),
    };

    let price = match resolve(
        flags.price,
        selection.price,
        &original.price,
        details.price.as_ref(),
    ) {
        RawField::Original(v) => *v,
        RawField::Proposed(raw) => normalize::price(raw),
    };

    let duration_days = match resolve(
        flags.duration,
        selection.duration,
        &original.duration_days,
        details.duration.as_ref(),
    ) {
        RawField::Original(v) => *v,
        RawField::Proposed(raw) => normalize::duration_days(raw),
    };

    let related_document_ids = match resolve(
        flags.related_docs,
        selection.related_docs,
        &original.related_document_ids,
        details.related_docs.as_ref(),
    ) {
        RawField::Original(v) => v.clone(),
        RawField::Proposed(raw) => normalize::related_ids(raw),
    };

    let image_ref = match resolve(
        flags.image,
        selection.image,
        &original.image_ref,
        details.image.as_ref(),
    ) {
        RawField::Original(v) => v.clone(),
        RawField::Proposed(raw) => normalize::image(raw, &original.image_ref),
    };

    assemble(
        original,
        ResolvedFields {
            price,
            duration_days,
            steps,
            related_document_ids,
            image_ref,
        },
    )
}

/// Produces the committed document for an approved fix, or the list of
/// missing required fields if the candidate fails the gate.
///
/// On `Ok` the caller persists the returned record in a single write and
/// deletes the proposal; on `Err` nothing may be persisted and the proposal
/// stays pending. Related-document tokens that do not match the identifier
/// format are dropped here, never rejected outright.
pub fn commit_fix(
    original: &DocumentRecord,
    proposal: &FixProposal,
    selection: &SelectionState,
) -> Result<DocumentRecord, ValidationFailed> {
    let mut candidate = compute_merged_document(original, proposal, selection);
    candidate.related_document_ids = normalize::filter_related_ids(&candidate.related_document_ids);
    validate(&candidate)?;
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProblemFlags, ProposedDetails};
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn original() -> DocumentRecord {
        DocumentRecord {
            id: Uuid::new_v4(),
            name: "Trade license".to_string(),
            category: "Business".to_string(),
            price: 500,
            duration_days: 10,
            steps: vec!["Fill application".to_string(), "Submit at desk".to_string()],
            related_document_ids: vec![VALID_ID.to_string()],
            image_ref: Some("https://cdn.example/license.png".to_string()),
        }
    }

    fn proposal_against(doc: &DocumentRecord, flags: ProblemFlags, details: ProposedDetails) -> FixProposal {
        FixProposal {
            id: Uuid::new_v4(),
            target_document_id: doc.id,
            submitted_by: Uuid::new_v4(),
            description: "corrections".to_string(),
            flags,
            details,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn unflagged_fields_pass_through_untouched() {
        let doc = original();
        let proposal = proposal_against(
            &doc,
            ProblemFlags {
                price: true,
                ..Default::default()
            },
            ProposedDetails {
                price: Some(json!("750")),
                // Stray details without a flag must be ignored.
                steps: Some(json!("bogus\nsteps")),
                ..Default::default()
            },
        );

        let merged = compute_merged_document(&doc, &proposal, &SelectionState::accept_all());
        assert_eq!(merged.price, 750);
        assert_eq!(merged.steps, doc.steps);
        assert_eq!(merged.duration_days, doc.duration_days);
        assert_eq!(merged.related_document_ids, doc.related_document_ids);
        assert_eq!(merged.image_ref, doc.image_ref);
        assert_eq!(merged.id, doc.id);
        assert_eq!(merged.name, doc.name);
        assert_eq!(merged.category, doc.category);
    }

    #[test]
    fn selected_flagged_fields_take_the_normalized_proposal() {
        let doc = original();
        let proposal = proposal_against(
            &doc,
            ProblemFlags {
                steps: true,
                duration: true,
                ..Default::default()
            },
            ProposedDetails {
                steps: Some(json!("collect form, pay fee; wait")),
                duration: Some(json!("21 days")),
                ..Default::default()
            },
        );

        let merged = compute_merged_document(&doc, &proposal, &SelectionState::accept_all());
        assert_eq!(merged.steps, vec!["collect form", "pay fee", "wait"]);
        assert_eq!(merged.duration_days, 21);
    }

    #[test]
    fn partial_acceptance_mixes_proposed_and_original() {
        let doc = original();
        let proposal = proposal_against(
            &doc,
            ProblemFlags {
                price: true,
                steps: true,
                ..Default::default()
            },
            ProposedDetails {
                price: Some(json!(650)),
                steps: Some(json!(["different", "steps"])),
                ..Default::default()
            },
        );

        let selection = SelectionState {
            steps: false,
            ..SelectionState::accept_all()
        };
        let merged = compute_merged_document(&doc, &proposal, &selection);
        assert_eq!(merged.price, 650);
        assert_eq!(merged.steps, doc.steps);
    }

    #[test]
    fn preview_keeps_non_conforming_related_tokens_but_commit_drops_them() {
        let doc = original();
        let proposal = proposal_against(
            &doc,
            ProblemFlags {
                related_docs: true,
                ..Default::default()
            },
            ProposedDetails {
                related_docs: Some(json!(["not-an-id", VALID_ID])),
                ..Default::default()
            },
        );

        let selection = SelectionState::accept_all();
        let preview = compute_merged_document(&doc, &proposal, &selection);
        assert_eq!(preview.related_document_ids, vec!["not-an-id", VALID_ID]);

        let committed = commit_fix(&doc, &proposal, &selection).unwrap();
        assert_eq!(committed.related_document_ids, vec![VALID_ID]);
    }

    #[test]
    fn commit_blocks_when_steps_normalize_to_empty() {
        let doc = original();
        let proposal = proposal_against(
            &doc,
            ProblemFlags {
                steps: true,
                ..Default::default()
            },
            ProposedDetails {
                steps: Some(json!("  \n , ; ")),
                ..Default::default()
            },
        );

        let selection = SelectionState::accept_all();
        let err = commit_fix(&doc, &proposal, &selection).unwrap_err();
        assert_eq!(err.missing, vec!["steps"]);
        // The original is untouched; declining the bad field unblocks commit.
        assert_eq!(doc.steps.len(), 2);
        let declined = SelectionState {
            steps: false,
            ..selection
        };
        let committed = commit_fix(&doc, &proposal, &declined).unwrap();
        assert_eq!(committed.steps, doc.steps);
    }

    #[test]
    fn commit_is_idempotent_for_the_same_inputs() {
        let doc = original();
        let proposal = proposal_against(
            &doc,
            ProblemFlags {
                price: true,
                image: true,
                ..Default::default()
            },
            ProposedDetails {
                price: Some(json!("1200 rupees")),
                image: Some(json!("not-a-url")),
                ..Default::default()
            },
        );

        let selection = SelectionState::accept_all();
        let first = commit_fix(&doc, &proposal, &selection).unwrap();
        let second = commit_fix(&doc, &proposal, &selection).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.price, 1200);
        // A malformed image proposal means "no new image".
        assert_eq!(first.image_ref, doc.image_ref);
    }

    #[test]
    fn merging_a_committed_document_again_changes_nothing() {
        let doc = original();
        let proposal = proposal_against(
            &doc,
            ProblemFlags {
                steps: true,
                price: true,
                ..Default::default()
            },
            ProposedDetails {
                steps: Some(json!("a\nb\n\nc")),
                price: Some(json!(99.6)),
                ..Default::default()
            },
        );

        let selection = SelectionState::accept_all();
        let committed = commit_fix(&doc, &proposal, &selection).unwrap();
        assert_eq!(committed.steps, vec!["a", "b", "c"]);
        assert_eq!(committed.price, 100);

        let recommitted = commit_fix(&committed, &proposal, &selection).unwrap();
        assert_eq!(recommitted, committed);
    }
}
