//! Small helpers shared by the resource modules.

use chrono::{Datelike, Utc};

/// Calendar year used by the year-range validation rules.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Case-insensitive substring test; `needle` must already be lowercase.
pub fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// `true` when a required text field is absent or only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
