//! crates/docufix_core/src/normalize.rs
//!
//! Pure per-type conversion of loosely-typed proposal payloads into canonical
//! typed values. Submitters send the same logical field as a string, an
//! array, a number, or a JSON-encoded string, so every function here is
//! total: malformed input never errors, it falls back to a permissive
//! interpretation (wrap as a single element, default to zero, keep the
//! original). Each function is idempotent.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// The fixed identifier format for related-document references.
fn related_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-5][0-9a-f]{3}-[089ab][0-9a-f]{3}-[0-9a-f]{12}$",
        )
        .unwrap()
    })
}

fn digit_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+").unwrap())
}

/// Normalizes a proposed `steps` payload into an ordered list of non-empty,
/// trimmed strings.
///
/// Three-tier fallback: an array is taken as-is (string items trimmed,
/// empties dropped); a string that looks like JSON (`[` or `{` prefix) is
/// decoded and, on failure or a non-array result, wrapped as a single
/// element; a plain string is split on newline, comma, or semicolon.
pub fn steps(raw: &Value) -> Vec<String> {
    string_list(raw)
}

/// Normalizes a proposed related-documents payload into raw identifier
/// tokens. Same loose decoding as [`steps`]; format filtering happens only
/// at commit time via [`filter_related_ids`], so the preview shows exactly
/// what was proposed.
pub fn related_ids(raw: &Value) -> Vec<String> {
    string_list(raw)
}

/// Commit-time filter: keeps only tokens matching the fixed identifier
/// format. Non-conforming tokens are silently dropped; order and duplicates
/// are preserved.
pub fn filter_related_ids(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| related_id_pattern().is_match(t))
        .cloned()
        .collect()
}

/// Coerces a proposed price into a non-negative integer.
///
/// Numbers round to the nearest integer; strings yield their first
/// contiguous digit run; anything else, including empty or absent input,
/// yields 0. Negative numeric input clamps to 0 (the non-negativity
/// invariant wins over rounding).
pub fn price(raw: &Value) -> i64 {
    coerce_non_negative_int(raw)
}

/// Coerces a proposed duration into a non-negative day count. Same coercion
/// rules as [`price`]; unit conversion for submissions that carry a unit
/// token lives in [`crate::duration::to_days`].
pub fn duration_days(raw: &Value) -> i64 {
    coerce_non_negative_int(raw)
}

/// Accepts a proposed image reference only if it is an absolute URL
/// (`scheme://...`) or an embedded data URI (`data:...`). Any other shape
/// means "no new image" and the original reference is kept.
pub fn image(raw: &Value, original: &Option<String>) -> Option<String> {
    match raw {
        Value::String(s) => {
            let s = s.trim();
            if is_image_ref(s) {
                Some(s.to_string())
            } else {
                original.clone()
            }
        }
        _ => original.clone(),
    }
}

fn is_image_ref(s: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let absolute_url = PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").unwrap());
    s.starts_with("data:") || absolute_url.is_match(s)
}

fn string_list(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => collect_items(items),
        Value::String(s) => list_from_str(s),
        _ => Vec::new(),
    }
}

fn list_from_str(s: &str) -> Vec<String> {
    let head = s.trim_start();
    if head.starts_with('[') || head.starts_with('{') {
        return match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => collect_items(&items),
            // Not decodable, or decoded to something that is not a list:
            // keep the submitter's text as a single entry.
            _ => wrap_single(s),
        };
    }
    s.split(['\n', ',', ';'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

fn collect_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

fn wrap_single(s: &str) -> Vec<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}

fn coerce_non_negative_int(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .map(|v| v.round().max(0.0) as i64)
            .unwrap_or(0),
        Value::String(s) => digit_run_pattern()
            .find(s)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn steps_splits_plain_string_on_delimiters() {
        assert_eq!(steps(&json!("a\nb\n\nc")), vec!["a", "b", "c"]);
        assert_eq!(steps(&json!("one, two; three")), vec!["one", "two", "three"]);
    }

    #[test]
    fn steps_takes_arrays_as_is() {
        assert_eq!(
            steps(&json!(["  first ", "", "second"])),
            vec!["first", "second"]
        );
    }

    #[test]
    fn steps_decodes_json_encoded_arrays() {
        assert_eq!(steps(&json!(r#"["a","b"]"#)), vec!["a", "b"]);
    }

    #[test]
    fn steps_wraps_undecodable_json_lookalikes() {
        assert_eq!(steps(&json!("[not json")), vec!["[not json"]);
        assert_eq!(steps(&json!(r#"{"k":"v"}"#)), vec![r#"{"k":"v"}"#]);
    }

    #[test]
    fn steps_drops_non_string_array_items() {
        assert_eq!(steps(&json!(["a", 2, null, "b"])), vec!["a", "b"]);
    }

    #[test]
    fn steps_is_idempotent() {
        for raw in [
            json!("a\nb\n\nc"),
            json!(r#"["x", " y "]"#),
            json!("[broken"),
            json!(["kept", "  padded  "]),
        ] {
            let once = steps(&raw);
            let twice = steps(&json!(once.clone()));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn related_ids_filter_drops_non_conforming_tokens() {
        let tokens = vec![
            "not-an-id".to_string(),
            "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string(),
        ];
        assert_eq!(
            filter_related_ids(&tokens),
            vec!["3fa85f64-5717-4562-b3fc-2c963f66afa6"]
        );
    }

    #[test]
    fn related_ids_filter_is_case_insensitive_and_keeps_duplicates() {
        let id = "3FA85F64-5717-4562-B3FC-2C963F66AFA6".to_string();
        let tokens = vec![id.clone(), id.clone(), "junk".to_string()];
        assert_eq!(filter_related_ids(&tokens), vec![id.clone(), id]);
    }

    #[test]
    fn related_ids_filter_rejects_bad_version_or_variant_nibbles() {
        // Version nibble above 5 and variant nibble outside 8/9/a/b.
        let tokens = vec![
            "3fa85f64-5717-6562-b3fc-2c963f66afa6".to_string(),
            "3fa85f64-5717-4562-c3fc-2c963f66afa6".to_string(),
        ];
        assert!(filter_related_ids(&tokens).is_empty());
    }

    #[test]
    fn price_extracts_first_digit_run_from_strings() {
        assert_eq!(price(&json!("120abc")), 120);
        assert_eq!(price(&json!("fee: 45 usd, then 60")), 45);
        assert_eq!(price(&json!("")), 0);
        assert_eq!(price(&json!("no digits here")), 0);
    }

    #[test]
    fn price_rounds_numbers_to_nearest_integer() {
        assert_eq!(price(&json!(99.6)), 100);
        assert_eq!(price(&json!(99.4)), 99);
        assert_eq!(price(&json!(250)), 250);
    }

    #[test]
    fn price_clamps_negative_input_to_zero() {
        assert_eq!(price(&json!(-12.3)), 0);
    }

    #[test]
    fn price_defaults_to_zero_for_other_shapes() {
        assert_eq!(price(&json!(null)), 0);
        assert_eq!(price(&json!(["50"])), 0);
    }

    #[test]
    fn numeric_coercion_is_idempotent() {
        for raw in [json!("120abc"), json!(99.6), json!(""), json!(-3)] {
            let once = price(&raw);
            assert_eq!(price(&json!(once)), once);
            let once = duration_days(&raw);
            assert_eq!(duration_days(&json!(once)), once);
        }
    }

    #[test]
    fn image_accepts_absolute_urls_and_data_uris() {
        let original = Some("https://cdn.example/old.png".to_string());
        assert_eq!(
            image(&json!("https://cdn.example/new.png"), &original),
            Some("https://cdn.example/new.png".to_string())
        );
        assert_eq!(
            image(&json!("data:image/png;base64,AAAA"), &None),
            Some("data:image/png;base64,AAAA".to_string())
        );
    }

    #[test]
    fn image_keeps_original_for_other_shapes() {
        let original = Some("https://cdn.example/old.png".to_string());
        assert_eq!(image(&json!("old.png"), &original), original);
        assert_eq!(image(&json!("/relative/path.png"), &original), original);
        assert_eq!(image(&json!(42), &original), original);
        assert_eq!(image(&json!("not a url"), &None), None);
    }
}
