use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Loader-side failures, surfaced before any validation run starts.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {identifier}")]
    NotFound { identifier: String },
    #[error("templates directory not found: {}", dir.display())]
    DirectoryNotFound { dir: PathBuf },
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load template '{identifier}': {source}")]
    Parse {
        identifier: String,
        #[source]
        source: ParseError,
    },
    #[error("template validation failed for '{identifier}': {source}")]
    Validation {
        identifier: String,
        #[source]
        source: TemplateRuleError,
    },
}

impl TemplateError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::DirectoryNotFound { .. })
    }
}

/// A broken template invariant. Name lists are always sorted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateRuleError {
    #[error("mode must be either 'single' or 'multipart'")]
    InvalidMode,
    #[error("Variable '{0}' must be in UPPER_SNAKE_CASE format")]
    VariableNameFormat(String),
    #[error("Variable '{0}' is declared more than once in required_variables")]
    DuplicateVariable(String),
    #[error("required_variables is mandatory when mode is 'multipart'")]
    MultipartRequiresVariables,
    #[error("required_variables should not be specified when mode is 'single'")]
    SingleModeDeclaresVariables,
    #[error("Cannot specify both 'data' and 'json_data'")]
    DataAndJsonData,
    #[error("In single mode, only ${{SECRET}} is allowed. Found: {}", .0.join(", "))]
    UnexpectedSingleVariables(Vec<String>),
    #[error("${{SECRET}} is not allowed in multipart mode. Use custom variables instead.")]
    SecretInMultipart,
    #[error("Template uses undefined variables: {}. Add them to required_variables.", .0.join(", "))]
    UndefinedVariables(Vec<String>),
    #[error("Required variables not used in template: {}", .0.join(", "))]
    UnusedVariables(Vec<String>),
}
