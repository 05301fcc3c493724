//! `${NAME}` substitution and masking.
//!
//! Substitution produces the values that go on the wire. Masking produces the values that go
//! anywhere else (logs, diagnostics, reports) and never looks at a variable's value.

mod args;
mod set;

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

pub use args::{cli_var_name, parse_var_args, VarArgError};
pub use set::{missing_variables, VariableSet};

/// Placeholder bound to the caller's secret in single-mode templates.
pub const SECRET_VARIABLE: &str = "SECRET";

const MASK_PREFIX: &str = "***";
const MASK_SUFFIX: &str = "***";

pub(crate) static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid"));

/// Distinct names referenced as `${NAME}` in `text`.
pub fn extract_names(text: &str) -> BTreeSet<String> {
    VARIABLE_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Replaces each `${NAME}` with its value. Names without a value stay as written.
pub fn substitute(text: &str, vars: &VariableSet) -> String {
    replace_placeholders(text, |caps| match vars.expose(&caps[1]) {
        Some(v) => v.to_string(),
        None => caps[0].to_string(),
    })
}

/// Replaces each `${NAME}` with `***NAME***`.
pub fn mask(text: &str) -> String {
    replace_placeholders(text, |caps| masked_placeholder(&caps[1]))
}

/// `***NAME***`, the only form a variable may take on a display path.
pub fn masked_placeholder(name: &str) -> String {
    format!("{MASK_PREFIX}{name}{MASK_SUFFIX}")
}

fn replace_placeholders(text: &str, f: impl Fn(&Captures<'_>) -> String) -> String {
    match VARIABLE_RE.replace_all(text, |caps: &Captures<'_>| f(caps)) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

/// Applies `leaf` to every string in a JSON tree. Keys and non-string leaves are untouched.
pub fn transform_strings(value: &JsonValue, leaf: &dyn Fn(&str) -> String) -> JsonValue {
    match value {
        JsonValue::String(s) => JsonValue::String(leaf(s)),
        JsonValue::Array(arr) => {
            JsonValue::Array(arr.iter().map(|v| transform_strings(v, leaf)).collect())
        }
        JsonValue::Object(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), transform_strings(v, leaf)))
                .collect(),
        ),
        other => other.clone(),
    }
}

pub fn substitute_value(value: &JsonValue, vars: &VariableSet) -> JsonValue {
    transform_strings(value, &|s| substitute(s, vars))
}

pub fn mask_value(value: &JsonValue) -> JsonValue {
    transform_strings(value, &mask)
}

/// (wire, masked) pair for one templated string.
pub fn process_string(text: &str, vars: &VariableSet) -> (String, String) {
    (substitute(text, vars), mask(text))
}

/// (wire, masked) pair for a header or query-parameter map.
pub fn process_map(
    map: &BTreeMap<String, String>,
    vars: &VariableSet,
) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let mut wire = BTreeMap::new();
    let mut masked = BTreeMap::new();
    for (k, v) in map {
        wire.insert(k.clone(), substitute(v, vars));
        masked.insert(k.clone(), mask(v));
    }
    (wire, masked)
}

/// Masked copy of a map, for display paths that never see the variable values.
pub fn mask_map(map: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    map.iter().map(|(k, v)| (k.clone(), mask(v))).collect()
}
