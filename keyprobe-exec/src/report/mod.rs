//! Machine-readable record of one `validate` invocation.
//!
//! Everything here is built from masked request parts, variable names and the outcome. No
//! variable value is ever reachable from a report.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use keyprobe_core::SecretTemplate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::executor::{mask_request, ValidationOutcome};

pub const VALIDATE_COMMAND: &str = "validate";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSource {
    Builtin,
    File,
}

/// What the caller knows about the invocation before anything is executed.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub template: String,
    pub source: TemplateSource,
    pub variables_provided: Vec<String>,
    pub started_at: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(template: impl Into<String>, source: TemplateSource) -> Self {
        Self {
            template: template.into(),
            source,
            variables_provided: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn with_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        self.variables_provided = names;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub command: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub request: RequestMeta,
    pub response: ResponseMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMeta {
    /// Identifier as the user gave it (name or path).
    pub template: String,
    pub resolved_template_name: Option<String>,
    pub mode: Option<String>,
    pub source: Option<TemplateSource>,
    pub method: Option<String>,
    pub api_url_masked: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers_masked: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_params_masked: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables_provided: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_fields_checked: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_required_field: Option<String>,
    /// Low-level error, set when no response was evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationReport {
    pub fn from_outcome(
        ctx: &ReportContext,
        template: &SecretTemplate,
        outcome: &ValidationOutcome,
    ) -> Self {
        let result = &outcome.result;
        let response = ResponseMeta {
            status_code: outcome.status_code,
            required_fields_checked: outcome.fields_checked.clone(),
            failed_required_field: outcome.failed_field.clone(),
            error: match outcome.status_code {
                None => result.error().map(str::to_string),
                Some(_) => None,
            },
        };

        Self {
            command: VALIDATE_COMMAND.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: Some(outcome.run_id),
            valid: result.is_valid(),
            message: result.message().map(str::to_string),
            error: result.error().map(str::to_string),
            request: request_meta(ctx, Some(template)),
            response,
        }
    }

    /// Report for an invocation that never produced an outcome (template or usage error).
    pub fn from_error(ctx: &ReportContext, template: Option<&SecretTemplate>, error: &str) -> Self {
        Self {
            command: VALIDATE_COMMAND.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: None,
            valid: false,
            message: None,
            error: Some(error.to_string()),
            request: request_meta(ctx, template),
            response: ResponseMeta {
                error: Some(error.to_string()),
                ..Default::default()
            },
        }
    }
}

fn request_meta(ctx: &ReportContext, template: Option<&SecretTemplate>) -> RequestMeta {
    let finished_at = Utc::now();
    let duration_ms = (finished_at - ctx.started_at)
        .num_microseconds()
        .map(|us| us as f64 / 1000.0)
        .unwrap_or_default();

    let mut meta = RequestMeta {
        template: ctx.template.clone(),
        resolved_template_name: None,
        mode: None,
        source: None,
        method: None,
        api_url_masked: None,
        headers_masked: BTreeMap::new(),
        query_params_masked: BTreeMap::new(),
        variables_provided: ctx.variables_provided.clone(),
        started_at: ctx.started_at,
        finished_at,
        duration_ms,
    };

    if let Some(template) = template {
        let masked = mask_request(template);
        meta.resolved_template_name = Some(template.name.clone());
        meta.mode = Some(template.mode.to_string());
        meta.source = Some(ctx.source);
        meta.method = Some(masked.method);
        meta.api_url_masked = Some(masked.url);
        meta.headers_masked = masked.headers;
        meta.query_params_masked = masked.query_params;
    }
    meta
}

/// Writes `report` as pretty-printed JSON.
pub fn write_report(path: &Path, report: &ValidationReport) -> Result<(), ReportError> {
    let data = serde_json::to_string_pretty(report)?;
    std::fs::write(path, data).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyprobe_core::{TemplateMode, ValidationResult};

    fn template() -> SecretTemplate {
        let mut t = SecretTemplate {
            name: "github".to_string(),
            api_url: "https://api.github.com/user".to_string(),
            method: "GET".to_string(),
            mode: TemplateMode::Single,
            ..Default::default()
        };
        t.request
            .headers
            .insert("Authorization".to_string(), "Bearer ${SECRET}".to_string());
        t.success_criteria.status_codes = vec![200];
        t.success_criteria.required_fields = vec!["$.login".to_string()];
        t
    }

    fn ctx() -> ReportContext {
        ReportContext::new("github", TemplateSource::Builtin).with_variables(["SECRET"])
    }

    #[test]
    fn outcome_report_carries_masked_request() {
        let outcome = ValidationOutcome {
            run_id: Uuid::new_v4(),
            result: ValidationResult::valid("Secret is valid"),
            status_code: Some(200),
            attempts: 1,
            failed_field: None,
            fields_checked: vec!["$.login".to_string()],
        };
        let report = ValidationReport::from_outcome(&ctx(), &template(), &outcome);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["command"], "validate");
        assert_eq!(json["valid"], true);
        assert_eq!(json["request"]["source"], "builtin");
        assert_eq!(json["request"]["mode"], "single");
        assert_eq!(
            json["request"]["headers_masked"]["Authorization"],
            "Bearer ***SECRET***"
        );
        assert_eq!(json["request"]["variables_provided"], serde_json::json!(["SECRET"]));
        assert_eq!(json["response"]["required_fields_checked"], serde_json::json!(["$.login"]));
        assert!(json["response"].get("error").is_none());
    }

    #[test]
    fn transport_failure_lands_in_response_error() {
        let outcome = ValidationOutcome {
            run_id: Uuid::new_v4(),
            result: ValidationResult::invalid("Request timeout"),
            status_code: None,
            attempts: 1,
            failed_field: None,
            fields_checked: Vec::new(),
        };
        let report = ValidationReport::from_outcome(&ctx(), &template(), &outcome);
        assert_eq!(report.response.error.as_deref(), Some("Request timeout"));
        assert!(report.response.required_fields_checked.is_empty());
    }

    #[test]
    fn error_report_without_template() {
        let report = ValidationReport::from_error(&ctx(), None, "Template 'nope' not found");
        assert!(!report.valid);
        assert_eq!(report.request.resolved_template_name, None);
        assert_eq!(report.request.source, None);
        assert_eq!(report.response.error.as_deref(), Some("Template 'nope' not found"));
    }
}
