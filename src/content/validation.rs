//! Form validation for posts
//!
//! Validation never fails with an error: it produces a map from field name to
//! human-readable messages, and an empty map means the input is valid.

use serde::Serialize;
use std::collections::BTreeMap;

/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 200;

/// Minimum content length in characters
pub const CONTENT_MIN_CHARS: usize = 10;

/// Field name -> messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// "Title can't be blank" style sentences, one per message
    pub fn full_messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |m| format!("{} {}", capitalize(field), m))
            })
            .collect()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Validate title and content; `None` skips a field that is not being set
pub fn validate_fields(title: Option<&str>, content: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if let Some(title) = title {
        if title.trim().is_empty() {
            errors.add("title", "can't be blank");
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.add(
                "title",
                format!("is too long (maximum {} characters)", TITLE_MAX_CHARS),
            );
        }
    }

    if let Some(content) = content {
        if content.trim().is_empty() {
            errors.add("content", "can't be blank");
        }
        if content.chars().count() < CONTENT_MIN_CHARS {
            errors.add(
                "content",
                format!("is too short (minimum {} characters)", CONTENT_MIN_CHARS),
            );
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_fields() {
        assert!(validate_fields(Some("Hello"), Some("1234567890")).is_empty());
        assert!(validate_fields(None, None).is_empty());
    }

    #[test]
    fn test_blank_fields() {
        let errors = validate_fields(Some("  "), Some(""));
        assert_eq!(errors.get("title"), ["can't be blank"]);
        assert_eq!(
            errors.get("content"),
            ["can't be blank", "is too short (minimum 10 characters)"]
        );
    }

    #[test]
    fn test_length_limits() {
        let long_title = "t".repeat(TITLE_MAX_CHARS + 1);
        let errors = validate_fields(Some(&long_title), Some("short"));
        assert_eq!(errors.get("title"), ["is too long (maximum 200 characters)"]);
        assert_eq!(errors.get("content"), ["is too short (minimum 10 characters)"]);

        let max_title = "가".repeat(TITLE_MAX_CHARS);
        assert!(validate_fields(Some(&max_title), None).is_empty());
    }

    #[test]
    fn test_full_messages() {
        let errors = validate_fields(Some(""), None);
        assert_eq!(errors.full_messages(), vec!["Title can't be blank"]);
        assert!(errors.get("content").is_empty());
    }
}
