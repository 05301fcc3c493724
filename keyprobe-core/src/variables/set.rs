use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Variable name to value. Names are case-sensitive; values are never printed by `Debug`.
#[derive(Default)]
pub struct VariableSet {
    values: BTreeMap<String, SecretString>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a single-mode secret to `SECRET`.
    pub fn single(secret: impl Into<String>) -> Self {
        let mut vars = Self::new();
        vars.insert(super::SECRET_VARIABLE, secret);
        vars
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(name.into(), SecretString::from(value.into()));
    }

    pub fn expose(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.expose_secret())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Absent, empty, or whitespace-only.
    pub fn is_blank(&self, name: &str) -> bool {
        self.expose(name).map_or(true, |v| v.trim().is_empty())
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// (name, value) pairs with non-empty values, for scrubbing diagnostic text.
    pub fn exposed_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str(), v.expose_secret()))
            .filter(|(_, v)| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for VariableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}

/// Required names that are absent or blank in `provided`, in declaration order.
pub fn missing_variables(required: &[String], provided: &VariableSet) -> Vec<String> {
    required
        .iter()
        .filter(|name| provided.is_blank(name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_missing() {
        let vars: VariableSet = [("BASE_URL", "https://x"), ("API_TOKEN", "   ")]
            .into_iter()
            .collect();
        let required = vec![
            "BASE_URL".to_string(),
            "API_TOKEN".to_string(),
            "ADMIN_KEY".to_string(),
        ];
        assert_eq!(missing_variables(&required, &vars), vec!["API_TOKEN", "ADMIN_KEY"]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let vars = VariableSet::single("s3cr3t");
        assert!(vars.contains("SECRET"));
        assert!(!vars.contains("secret"));
    }

    #[test]
    fn debug_hides_values() {
        let vars = VariableSet::single("s3cr3t");
        let dbg = format!("{vars:?}");
        assert!(dbg.contains("SECRET"));
        assert!(!dbg.contains("s3cr3t"));
    }
}
