use std::collections::BTreeMap;

use keyprobe_core::variables::{mask, mask_map, mask_value, process_map, substitute, substitute_value};
use keyprobe_core::{SecretTemplate, VariableSet};
use serde_json::Value as JsonValue;
use zeroize::Zeroizing;

use crate::executor::types::{HttpRequestParts, MaskedRequest};

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug)]
pub struct PreparedRequest {
    pub parts: HttpRequestParts,
    pub masked: MaskedRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum RequestBuildError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid HTTP method '{0}'")]
    Method(String),
    #[error("failed to serialize request body: {0}")]
    Body(#[from] serde_json::Error),
}

/// Substitutes `vars` into URL, headers, query parameters and body.
pub fn build_request(
    template: &SecretTemplate,
    vars: &VariableSet,
) -> Result<PreparedRequest, RequestBuildError> {
    let method = template.method.to_ascii_uppercase();
    if reqwest::Method::from_bytes(method.as_bytes()).is_err() {
        return Err(RequestBuildError::Method(template.method.clone()));
    }

    let mut url = url::Url::parse(&substitute(&template.api_url, vars))?;
    let (query, _) = process_map(&template.request.query_params, vars);
    if !query.is_empty() {
        let mut qp = url.query_pairs_mut();
        for (k, v) in &query {
            qp.append_pair(k, v);
        }
    }

    let (mut headers, _) = process_map(&template.request.headers, vars);

    let body = if let Some(data) = &template.request.data {
        set_default_header(&mut headers, "Content-Type", TEXT_CONTENT_TYPE);
        Some(Zeroizing::new(substitute(data, vars).into_bytes()))
    } else if let Some(json) = &template.request.json_data {
        set_default_header(&mut headers, "Content-Type", JSON_CONTENT_TYPE);
        let resolved = substitute_value(&JsonValue::Object(json.clone()), vars);
        Some(Zeroizing::new(serde_json::to_vec(&resolved)?))
    } else {
        None
    };

    Ok(PreparedRequest {
        parts: HttpRequestParts {
            method,
            url,
            headers,
            body,
        },
        masked: mask_request(template),
    })
}

/// Display form of the request. Needs no variable values, so it is safe to build anywhere.
pub fn mask_request(template: &SecretTemplate) -> MaskedRequest {
    let body = match (&template.request.data, &template.request.json_data) {
        (Some(data), _) => Some(mask(data)),
        (None, Some(json)) => Some(mask_value(&JsonValue::Object(json.clone())).to_string()),
        (None, None) => None,
    };

    MaskedRequest {
        method: template.method.to_ascii_uppercase(),
        url: mask(&template.api_url),
        headers: mask_map(&template.request.headers),
        query_params: mask_map(&template.request.query_params),
        body,
    }
}

fn set_default_header(headers: &mut BTreeMap<String, String>, name: &str, value: &str) {
    if !headers.keys().any(|k| k.eq_ignore_ascii_case(name)) {
        headers.insert(name.to_string(), value.to_string());
    }
}
