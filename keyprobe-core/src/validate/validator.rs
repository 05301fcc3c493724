use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::TemplateRuleError;
use crate::types::{SecretTemplate, TemplateMode};
use crate::variables::{extract_names, SECRET_VARIABLE};

pub(crate) static UPPER_SNAKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid"));

/// Names referenced anywhere in the request: URL, header values, query values, and the body.
pub fn used_variables(template: &SecretTemplate) -> BTreeSet<String> {
    template
        .templated_strings()
        .iter()
        .flat_map(|s| extract_names(s))
        .collect()
}

pub(crate) fn check_mode(template: &SecretTemplate) -> Result<(), TemplateRuleError> {
    if template.mode.is_known() {
        Ok(())
    } else {
        Err(TemplateRuleError::InvalidMode)
    }
}

pub(crate) fn check_declared_names(template: &SecretTemplate) -> Result<(), TemplateRuleError> {
    let mut seen = BTreeSet::new();
    for name in &template.required_variables {
        if !UPPER_SNAKE_RE.is_match(name) {
            return Err(TemplateRuleError::VariableNameFormat(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(TemplateRuleError::DuplicateVariable(name.clone()));
        }
    }
    Ok(())
}

pub(crate) fn check_mode_declarations(template: &SecretTemplate) -> Result<(), TemplateRuleError> {
    match template.mode {
        TemplateMode::Multipart if template.required_variables.is_empty() => {
            Err(TemplateRuleError::MultipartRequiresVariables)
        }
        TemplateMode::Single if !template.required_variables.is_empty() => {
            Err(TemplateRuleError::SingleModeDeclaresVariables)
        }
        _ => Ok(()),
    }
}

pub(crate) fn check_body_exclusive(template: &SecretTemplate) -> Result<(), TemplateRuleError> {
    if template.request.data.is_some() && template.request.json_data.is_some() {
        return Err(TemplateRuleError::DataAndJsonData);
    }
    Ok(())
}

pub(crate) fn check_usage(
    template: &SecretTemplate,
    used: &BTreeSet<String>,
) -> Result<(), TemplateRuleError> {
    match template.mode {
        TemplateMode::Single => {
            let offenders: Vec<String> = used
                .iter()
                .filter(|n| n.as_str() != SECRET_VARIABLE)
                .cloned()
                .collect();
            if !offenders.is_empty() {
                return Err(TemplateRuleError::UnexpectedSingleVariables(offenders));
            }
        }
        TemplateMode::Multipart => {
            if used.contains(SECRET_VARIABLE) {
                return Err(TemplateRuleError::SecretInMultipart);
            }
            let declared: BTreeSet<String> = template.required_variables.iter().cloned().collect();

            let undefined: Vec<String> = used.difference(&declared).cloned().collect();
            if !undefined.is_empty() {
                return Err(TemplateRuleError::UndefinedVariables(undefined));
            }

            let unused: Vec<String> = declared.difference(used).cloned().collect();
            if !unused.is_empty() {
                return Err(TemplateRuleError::UnusedVariables(unused));
            }
        }
        // Rejected by check_mode.
        TemplateMode::Unset | TemplateMode::Other(_) => {}
    }
    Ok(())
}
