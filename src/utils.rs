// Utility functions
use regex::Regex;
use std::sync::LazyLock;

static CAPACITY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+|\d+").expect("capacity regex"));

/// Returns true when `needle` occurs in `haystack` and the character right after
/// its first occurrence is not alphanumeric (or there is none).
///
/// `"I5-9500"` does not match `"I5-9500T"`, but `"N100"` matches `"INTEL N100"`.
pub fn precise_substring_match(needle: &str, haystack: &str) -> bool {
    let Some(start) = haystack.find(needle) else {
        return false;
    };
    match haystack[start + needle.len()..].chars().next() {
        None => true,
        Some(c) => !c.is_alphanumeric(),
    }
}

/// Converts a capacity string such as `"8GB"`, `"1TB"` or `"1.5TB"` to whole gigabytes.
/// The sentinel and anything without a number yield 0.
pub fn capacity_to_gb(capacity: &str) -> u32 {
    let upper = capacity.trim().to_uppercase();
    if upper.is_empty() || upper == crate::model::NOT_DETECTED {
        return 0;
    }
    let Some(number) = CAPACITY_NUMBER.find(&upper) else {
        return 0;
    };
    let Ok(value) = number.as_str().parse::<f64>() else {
        return 0;
    };
    if upper.contains("TB") {
        (value * 1024.0) as u32
    } else {
        value as u32
    }
}

/// Converts a string to kebab-case.
pub fn to_kebab_case(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
