use std::borrow::Cow;

use keyprobe_core::{ErrorHandling, SuccessCriteria, ValidationResult, SECRET_VALID_MESSAGE};
use serde_json::Value as JsonValue;
use serde_json_path::JsonPath;

pub const INVALID_JSON_ERROR: &str = "Invalid JSON response";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub result: ValidationResult,
    pub failed_field: Option<String>,
    /// Required fields actually evaluated, in order, up to and including the failing one.
    pub fields_checked: Vec<String>,
}

impl MatchOutcome {
    fn plain(result: ValidationResult) -> Self {
        Self {
            result,
            failed_field: None,
            fields_checked: Vec::new(),
        }
    }
}

/// Decides validity from the final response. Status first, then required fields in order.
pub fn match_response(
    status: u16,
    body: &[u8],
    criteria: &SuccessCriteria,
    error_handling: &ErrorHandling,
) -> MatchOutcome {
    if !criteria.status_codes.contains(&status) {
        let error = error_handling
            .error_messages
            .get(&status)
            .cloned()
            .unwrap_or_else(|| format!("HTTP {status}"));
        return MatchOutcome::plain(ValidationResult::invalid(error));
    }

    if criteria.required_fields.is_empty() {
        return MatchOutcome::plain(ValidationResult::valid(SECRET_VALID_MESSAGE));
    }

    let document: JsonValue = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) => return MatchOutcome::plain(ValidationResult::invalid(INVALID_JSON_ERROR)),
    };

    let mut fields_checked = Vec::with_capacity(criteria.required_fields.len());
    for path in &criteria.required_fields {
        fields_checked.push(path.clone());
        if !field_present(&document, path) {
            return MatchOutcome {
                result: ValidationResult::invalid(format!("Required field '{path}' not found")),
                failed_field: Some(path.clone()),
                fields_checked,
            };
        }
    }

    MatchOutcome {
        result: ValidationResult::valid(SECRET_VALID_MESSAGE),
        failed_field: None,
        fields_checked,
    }
}

/// True when `path` selects at least one non-null node. Unparseable paths select nothing.
pub fn field_present(document: &JsonValue, path: &str) -> bool {
    let jsonpath = match JsonPath::parse(&normalize_path(path)) {
        Ok(p) => p,
        Err(_) => return false,
    };
    jsonpath
        .query(document)
        .all()
        .into_iter()
        .any(|node| !node.is_null())
}

// Bare member names (`login`, `data.id`) are accepted as shorthand for `$.login`.
fn normalize_path(path: &str) -> Cow<'_, str> {
    let trimmed = path.trim();
    if trimmed.starts_with('$') {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("$.{trimmed}"))
    }
}
