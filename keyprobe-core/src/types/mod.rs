mod result;
mod template;

pub use result::{ValidationResult, SECRET_VALID_MESSAGE};
pub use template::{
    ErrorHandling, RequestConfig, SecretTemplate, SuccessCriteria, TemplateMode, DEFAULT_MAX_RETRIES,
    DEFAULT_METHOD, DEFAULT_RETRY_DELAY_SECONDS, DEFAULT_TIMEOUT_SECONDS,
};
