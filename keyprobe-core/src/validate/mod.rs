mod validator;

use crate::error::TemplateRuleError;
use crate::types::SecretTemplate;

pub use validator::used_variables;

pub trait Validate {
    fn validate(&self) -> Result<(), TemplateRuleError>;
}

impl Validate for SecretTemplate {
    fn validate(&self) -> Result<(), TemplateRuleError> {
        validate_template(self)
    }
}

/// Checks the template invariants in a fixed order; the first broken one is returned.
pub fn validate_template(template: &SecretTemplate) -> Result<(), TemplateRuleError> {
    validator::check_mode(template)?;
    validator::check_declared_names(template)?;
    validator::check_mode_declarations(template)?;
    validator::check_body_exclusive(template)?;

    let used = used_variables(template);
    validator::check_usage(template, &used)
}
