//! crates/docufix_core/src/resolve.rs
//!
//! Per-field choice between the original document's value and a proposal's
//! raw replacement payload, driven by the problem flag and the reviewer's
//! selection.

use serde_json::Value;

/// The effective raw value for one reconcilable field.
#[derive(Debug, PartialEq)]
pub enum RawField<'a, T> {
    /// The original document's typed value stands.
    Original(&'a T),
    /// The proposal's raw payload applies and still needs normalization.
    Proposed(&'a Value),
}

/// Chooses between original and proposed for one field.
///
/// The proposed payload applies only when the field is flagged as a problem,
/// the reviewer kept it selected, and the proposal actually carries a detail
/// for it. Every other combination resolves to the original; an absent flag
/// or missing detail is never an error.
pub fn resolve<'a, T>(
    flagged: bool,
    selected: bool,
    original: &'a T,
    proposed: Option<&'a Value>,
) -> RawField<'a, T> {
    match proposed {
        Some(detail) if flagged && selected => RawField::Proposed(detail),
        _ => RawField::Original(original),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unflagged_field_always_resolves_to_original() {
        let original = 42;
        let detail = json!(99);
        // Selection has no effect without a flag.
        for selected in [true, false] {
            assert_eq!(
                resolve(false, selected, &original, Some(&detail)),
                RawField::Original(&original)
            );
        }
    }

    #[test]
    fn flagged_and_selected_resolves_to_proposed() {
        let original = 42;
        let detail = json!(99);
        assert_eq!(
            resolve(true, true, &original, Some(&detail)),
            RawField::Proposed(&detail)
        );
    }

    #[test]
    fn declined_selection_keeps_original() {
        let original = 42;
        let detail = json!(99);
        assert_eq!(
            resolve(true, false, &original, Some(&detail)),
            RawField::Original(&original)
        );
    }

    #[test]
    fn missing_detail_keeps_original() {
        let original = 42;
        assert_eq!(
            resolve::<i32>(true, true, &original, None),
            RawField::Original(&original)
        );
    }
}
