use keyprobe_core::TemplateMode;

/// Caller mistakes caught before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("Template '{template}' is not in {expected} mode")]
    ModeMismatch {
        template: String,
        expected: TemplateMode,
        actual: TemplateMode,
    },
    #[error("Missing required variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
}
