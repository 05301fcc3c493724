use std::collections::BTreeMap;
use std::fmt;

use keyprobe_core::ValidationResult;
use serde::Serialize;
use uuid::Uuid;
use zeroize::Zeroizing;

/// The request as it goes on the wire, with secrets substituted.
pub struct HttpRequestParts {
    pub method: String,
    pub url: url::Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Zeroizing<Vec<u8>>>,
}

// URL, header values and body may all carry secrets.
impl fmt::Debug for HttpRequestParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequestParts")
            .field("method", &self.method)
            .field("url", &"<redacted>")
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("body_len", &self.body.as_ref().map(|b| b.len()))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponseParts {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

/// The same request with every `${NAME}` masked; safe for logs and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub query_params: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A finished validation run: the result plus what the reporter needs about the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub run_id: Uuid,
    pub result: ValidationResult,
    /// Status of the last completed exchange, if any attempt got that far.
    pub status_code: Option<u16>,
    pub attempts: u32,
    /// First required field that was missing or null.
    pub failed_field: Option<String>,
    /// Required fields evaluated against the final response body.
    pub fields_checked: Vec<String>,
}

impl ValidationOutcome {
    pub(crate) fn without_response(run_id: Uuid, result: ValidationResult, attempts: u32) -> Self {
        Self {
            run_id,
            result,
            status_code: None,
            attempts,
            failed_field: None,
            fields_checked: Vec::new(),
        }
    }
}
