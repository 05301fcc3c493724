use std::sync::LazyLock;

use regex::Regex;

use super::VariableSet;

static KEBAB_CASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VarArgError {
    #[error("Invalid variable format: '{0}'. Use --var key=value")]
    MissingSeparator(String),
    #[error("Variable name '{0}' must be in kebab-case format (e.g., 'api-token', 'base-url')")]
    NotKebabCase(String),
}

/// Parses `key=value` pairs with kebab-case keys into UPPER_SNAKE_CASE names.
/// Only the first `=` splits, so values may contain `=`.
pub fn parse_var_args<S: AsRef<str>>(args: &[S]) -> Result<VariableSet, VarArgError> {
    let mut vars = VariableSet::new();
    for arg in args {
        let arg = arg.as_ref();
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| VarArgError::MissingSeparator(arg.to_string()))?;
        if !KEBAB_CASE_RE.is_match(key) {
            return Err(VarArgError::NotKebabCase(key.to_string()));
        }
        vars.insert(key.replace('-', "_").to_uppercase(), value);
    }
    Ok(vars)
}

/// `API_TOKEN` -> `api-token`.
pub fn cli_var_name(name: &str) -> String {
    name.replace('_', "-").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_keys_into_snake_names() {
        let vars = parse_var_args(&["base-url=https://a.example/?q=1", "api-token=abc"]).unwrap();
        assert_eq!(vars.expose("BASE_URL"), Some("https://a.example/?q=1"));
        assert_eq!(vars.expose("API_TOKEN"), Some("abc"));
    }

    #[test]
    fn rejects_bad_keys() {
        assert_eq!(
            parse_var_args(&["API_TOKEN=abc"]).unwrap_err(),
            VarArgError::NotKebabCase("API_TOKEN".to_string())
        );
        assert!(matches!(
            parse_var_args(&["token"]).unwrap_err(),
            VarArgError::MissingSeparator(_)
        ));
    }

    #[test]
    fn cli_name_is_kebab() {
        assert_eq!(cli_var_name("ADMIN_API_KEY"), "admin-api-key");
    }
}
