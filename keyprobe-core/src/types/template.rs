use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 0;
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 0;

/// Declarative description of one validation HTTP probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretTemplate {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub api_url: String,

    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub mode: TemplateMode,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_variables: Vec<String>,

    #[serde(default)]
    pub request: RequestConfig,

    #[serde(default)]
    pub success_criteria: SuccessCriteria,

    #[serde(default)]
    pub error_handling: ErrorHandling,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Per-attempt deadline in seconds.
    #[serde(default)]
    pub timeout: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_data: Option<serde_json::Map<String, serde_json::Value>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuccessCriteria {
    #[serde(default, rename = "status_code")]
    pub status_codes: Vec<u16>,

    /// JSONPath queries, checked in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorHandling {
    #[serde(default)]
    pub max_retries: u32,

    /// Seconds to wait between attempts.
    #[serde(default)]
    pub retry_delay: u64,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub error_messages: BTreeMap<u16, String>,
}

/// `Unset` is the zero value filled in by [`SecretTemplate::set_defaults`]; `Other` keeps an
/// unrecognised mode around so validation can reject it instead of the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemplateMode {
    #[default]
    Unset,
    Single,
    Multipart,
    Other(String),
}

impl TemplateMode {
    pub fn as_str(&self) -> &str {
        match self {
            TemplateMode::Unset => "",
            TemplateMode::Single => "single",
            TemplateMode::Multipart => "multipart",
            TemplateMode::Other(s) => s.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, TemplateMode::Single | TemplateMode::Multipart)
    }
}

impl From<String> for TemplateMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => TemplateMode::Unset,
            "single" => TemplateMode::Single,
            "multipart" => TemplateMode::Multipart,
            _ => TemplateMode::Other(s),
        }
    }
}

impl From<TemplateMode> for String {
    fn from(mode: TemplateMode) -> Self {
        match mode {
            TemplateMode::Other(s) => s,
            m => m.as_str().to_string(),
        }
    }
}

impl fmt::Display for TemplateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SecretTemplate {
    /// Fills method, mode, timeout, retry count and retry delay, each only when it still
    /// holds its zero value. An explicit `timeout: 0` is indistinguishable from an absent one.
    pub fn set_defaults(&mut self) {
        if self.method.is_empty() {
            self.method = DEFAULT_METHOD.to_string();
        }
        if self.mode == TemplateMode::Unset {
            self.mode = TemplateMode::Single;
        }
        if self.request.timeout == 0 {
            self.request.timeout = DEFAULT_TIMEOUT_SECONDS;
        }
        if self.error_handling.max_retries == 0 {
            self.error_handling.max_retries = DEFAULT_MAX_RETRIES;
        }
        if self.error_handling.retry_delay == 0 {
            self.error_handling.retry_delay = DEFAULT_RETRY_DELAY_SECONDS;
        }
    }

    /// Every templated string, in the order the validator scans them.
    pub fn templated_strings(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(2 + self.request.headers.len());
        out.push(self.api_url.clone());
        out.extend(self.request.headers.values().cloned());
        out.extend(self.request.query_params.values().cloned());
        if let Some(data) = &self.request.data {
            out.push(data.clone());
        }
        if let Some(json) = &self.request.json_data {
            // A map of JSON values always serializes.
            out.push(serde_json::Value::Object(json.clone()).to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_zero_values_only() {
        let mut t = SecretTemplate {
            method: "POST".to_string(),
            ..Default::default()
        };
        t.request.timeout = 5;
        t.error_handling.max_retries = 2;
        t.set_defaults();

        assert_eq!(t.method, "POST");
        assert_eq!(t.mode, TemplateMode::Single);
        assert_eq!(t.request.timeout, 5);
        assert_eq!(t.error_handling.max_retries, 2);
        assert_eq!(t.error_handling.retry_delay, 0);
    }

    #[test]
    fn defaults_on_empty_template() {
        let mut t = SecretTemplate::default();
        t.set_defaults();
        assert_eq!(t.method, DEFAULT_METHOD);
        assert_eq!(t.request.timeout, DEFAULT_TIMEOUT_SECONDS);
    }

    #[test]
    fn mode_round_trips_through_strings() {
        assert_eq!(TemplateMode::from("multipart".to_string()), TemplateMode::Multipart);
        assert_eq!(
            TemplateMode::from("batch".to_string()),
            TemplateMode::Other("batch".to_string())
        );
        assert_eq!(String::from(TemplateMode::Single), "single");
        assert!(!TemplateMode::Unset.is_known());
    }
}
