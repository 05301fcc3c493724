use serde::Serialize;

pub const SECRET_VALID_MESSAGE: &str = "Secret is valid";

/// Outcome of one validation run. Exactly one of `message` / `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ValidationResult {
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: None,
            error: Some(error.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The populated side: the message when valid, the error otherwise.
    pub fn detail(&self) -> &str {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or_default()
    }
}
