//! crates/docufix_core/src/duration.rs
//!
//! Duration handling around the canonical day count: submission-time
//! conversion from a value-plus-unit pair into days, and display-time
//! rendering of a day count (or a "N-M days" range) to the largest clean
//! unit.

use regex::Regex;
use std::sync::OnceLock;

const MINUTES_PER_DAY: f64 = 1440.0;
const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_WEEK: i64 = 7;
const DAYS_PER_MONTH: i64 = 30;
const DAYS_PER_YEAR: i64 = 365;

/// Converts a submitted duration value with a unit token into whole days.
///
/// Unit tokens are matched case-insensitively with an optional plural `s`.
/// Sub-day units round up to a full day; an unrecognized token yields `None`
/// and the caller keeps the original value untouched.
pub fn to_days(value: f64, unit: &str) -> Option<i64> {
    let lowered = unit.trim().to_ascii_lowercase();
    let token = lowered.strip_suffix('s').unwrap_or(&lowered);
    let days = match token {
        "minute" => (value / MINUTES_PER_DAY).ceil(),
        "hour" => (value / HOURS_PER_DAY).ceil(),
        "day" => value.round(),
        "week" => (value * DAYS_PER_WEEK as f64).round(),
        "month" => (value * DAYS_PER_MONTH as f64).round(),
        "year" => (value * DAYS_PER_YEAR as f64).round(),
        _ => return None,
    };
    Some(days.max(0.0) as i64)
}

/// Renders a day count as the largest unit that divides it cleanly:
/// months, then weeks, then days.
pub fn render_days(days: i64) -> String {
    let (count, label) = scaled(days, unit_for(days));
    format!("{} {}", count, label)
}

/// Renders a duration field for display. Accepts a plain day count
/// (`"10"`), a `"N-M days"` range, or anything else, which is returned
/// unchanged. Range bounds share a single unit label, the largest unit
/// clean for both bounds.
pub fn render(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(days) = trimmed.parse::<i64>() {
        return render_days(days);
    }
    if let Some(caps) = range_pattern().captures(trimmed) {
        // Bounds are bare digit runs, so the parses cannot fail.
        let lo: i64 = caps[1].parse().unwrap_or(0);
        let hi: i64 = caps[2].parse().unwrap_or(0);
        let divisor = shared_unit(lo, hi);
        let (lo_count, _) = scaled(lo, divisor);
        let (hi_count, label) = scaled(hi, divisor);
        return format!("{}-{} {}", lo_count, hi_count, label);
    }
    raw.to_string()
}

fn range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9]+)\s*-\s*([0-9]+)(?:\s*days?)?$").unwrap())
}

/// Largest unit that divides both bounds of a range cleanly.
fn shared_unit(lo: i64, hi: i64) -> i64 {
    if hi > 0 && lo % DAYS_PER_MONTH == 0 && hi % DAYS_PER_MONTH == 0 {
        DAYS_PER_MONTH
    } else if hi > 0 && lo % DAYS_PER_WEEK == 0 && hi % DAYS_PER_WEEK == 0 {
        DAYS_PER_WEEK
    } else {
        1
    }
}

fn unit_for(days: i64) -> i64 {
    if days > 0 && days % DAYS_PER_MONTH == 0 {
        DAYS_PER_MONTH
    } else if days > 0 && days % DAYS_PER_WEEK == 0 {
        DAYS_PER_WEEK
    } else {
        1
    }
}

fn scaled(days: i64, divisor: i64) -> (i64, String) {
    let count = days / divisor;
    let label = match divisor {
        DAYS_PER_MONTH => "month",
        DAYS_PER_WEEK => "week",
        _ => "day",
    };
    let label = if count == 1 {
        label.to_string()
    } else {
        format!("{}s", label)
    };
    (count, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_units_to_days() {
        assert_eq!(to_days(90.0, "minutes"), Some(1));
        assert_eq!(to_days(3000.0, "minute"), Some(3));
        assert_eq!(to_days(30.0, "hours"), Some(2));
        assert_eq!(to_days(5.0, "Days"), Some(5));
        assert_eq!(to_days(2.0, "weeks"), Some(14));
        assert_eq!(to_days(3.0, "months"), Some(90));
        assert_eq!(to_days(1.0, "year"), Some(365));
    }

    #[test]
    fn unrecognized_unit_is_a_no_op() {
        assert_eq!(to_days(5.0, "fortnights"), None);
        assert_eq!(to_days(5.0, ""), None);
    }

    #[test]
    fn renders_largest_clean_unit() {
        assert_eq!(render_days(60), "2 months");
        assert_eq!(render_days(30), "1 month");
        assert_eq!(render_days(14), "2 weeks");
        assert_eq!(render_days(7), "1 week");
        assert_eq!(render_days(10), "10 days");
        assert_eq!(render_days(1), "1 day");
        assert_eq!(render_days(0), "0 days");
    }

    #[test]
    fn renders_numeric_strings_and_ranges() {
        assert_eq!(render("60"), "2 months");
        assert_eq!(render(" 14 "), "2 weeks");
        assert_eq!(render("30-60 days"), "1-2 months");
        assert_eq!(render("7-14"), "1-2 weeks");
        assert_eq!(render("7-30 days"), "7-30 days");
    }

    #[test]
    fn leaves_unparseable_text_unchanged() {
        assert_eq!(render("about a week"), "about a week");
        assert_eq!(render("2 months"), "2 months");
    }
}
