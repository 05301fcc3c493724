#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod parser;
pub mod types;
pub mod validate;
pub mod variables;

pub use crate::error::{ParseError, TemplateError, TemplateRuleError};
pub use crate::loader::{discover_templates, display_name, is_file_path, TemplateLoader};
pub use crate::parser::{parse_template_str, DocumentFormat, ParsedTemplate};
pub use crate::types::{
    ErrorHandling, RequestConfig, SecretTemplate, SuccessCriteria, TemplateMode, ValidationResult,
    SECRET_VALID_MESSAGE,
};
pub use crate::validate::{validate_template, Validate};
pub use crate::variables::{VariableSet, SECRET_VARIABLE};
