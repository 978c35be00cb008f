//! Field checks shared by services and request DTOs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::UNP_PATTERN;

static UNP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(UNP_PATTERN).expect("UNP pattern is a valid regex"));

/// `None`, empty and whitespace-only values are all blank.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Exactly nine ASCII digits.
pub fn is_valid_unp_format(value: &str) -> bool {
    UNP_REGEX.is_match(value)
}
