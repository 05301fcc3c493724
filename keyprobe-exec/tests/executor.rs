use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use keyprobe_core::{parse_template_str, DocumentFormat, SecretTemplate, Validate, VariableSet};
use keyprobe_exec::executor::{HttpRequestParts, HttpResponseParts};
use keyprobe_exec::{Event, EventSink, Executor, HttpClient, HttpError};
use uuid::Uuid;

// Replays scripted results in order; the last one repeats once the script runs out.
struct ScriptedHttpClient {
    script: Mutex<VecDeque<Result<HttpResponseParts, HttpError>>>,
    calls: AtomicU32,
    seen: Mutex<Vec<SeenRequest>>,
}

#[derive(Debug, Clone)]
struct SeenRequest {
    url: String,
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
    timeout: Duration,
}

impl ScriptedHttpClient {
    fn new(script: Vec<Result<HttpResponseParts, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn send(
        &self,
        req: &HttpRequestParts,
        timeout: Duration,
    ) -> Result<HttpResponseParts, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(SeenRequest {
            url: req.url.to_string(),
            headers: req.headers.clone(),
            body: req.body.as_ref().map(|b| b.to_vec()),
            timeout,
        });
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl RecordingSink {
    fn rendered(&self) -> String {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| format!("{} {:?} {}", e.event_type(), e, e.payload()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(Event::event_type).collect()
    }
}

fn response(status: u16, body: &str) -> Result<HttpResponseParts, HttpError> {
    Ok(HttpResponseParts {
        status,
        headers: BTreeMap::new(),
        body: body.as_bytes().to_vec(),
    })
}

fn template(yaml: &str) -> SecretTemplate {
    let mut t = parse_template_str(yaml, DocumentFormat::Yaml).unwrap().template;
    t.set_defaults();
    t.validate().unwrap();
    t
}

const SINGLE: &str = r#"
name: example
api_url: https://api.example.com/user
mode: single
request:
  headers:
    Authorization: "Bearer ${SECRET}"
  timeout: 5
success_criteria:
  status_code: [200]
  required_fields: ["$.id"]
error_handling:
  max_retries: 2
  retry_delay: 1
  error_messages:
    401: bad token
"#;

#[tokio::test(start_paused = true)]
async fn server_errors_are_retried_until_exhausted() {
    let client = ScriptedHttpClient::new(vec![response(503, "")]);
    let executor = Executor::new(client.clone());

    let started = tokio::time::Instant::now();
    let outcome = executor
        .execute(Uuid::new_v4(), &template(SINGLE), &VariableSet::single("tok"))
        .await;
    let elapsed = started.elapsed();

    assert_eq!(client.calls(), 3);
    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.status_code, Some(503));
    assert_eq!(outcome.result.error(), Some("HTTP 503"));
    // One 1s delay between each pair of attempts, none after the last.
    assert!(elapsed >= Duration::from_secs(2), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn retry_stops_at_first_non_retryable_status() {
    let client = ScriptedHttpClient::new(vec![
        response(429, ""),
        Err(HttpError::Network("connection reset".to_string())),
        response(200, r#"{"id": 1}"#),
    ]);
    let executor = Executor::new(client.clone());

    let outcome = executor
        .execute(Uuid::new_v4(), &template(SINGLE), &VariableSet::single("tok"))
        .await;

    assert_eq!(client.calls(), 3);
    assert!(outcome.result.is_valid());
    assert_eq!(outcome.result.message(), Some("Secret is valid"));
}

#[tokio::test(start_paused = true)]
async fn failed_criteria_never_trigger_retry() {
    let client = ScriptedHttpClient::new(vec![response(200, r#"{"name": "x"}"#)]);
    let outcome = Executor::new(client.clone())
        .execute(Uuid::new_v4(), &template(SINGLE), &VariableSet::single("tok"))
        .await;

    assert_eq!(client.calls(), 1);
    assert_eq!(outcome.result.error(), Some("Required field '$.id' not found"));
    assert_eq!(outcome.failed_field.as_deref(), Some("$.id"));
    assert_eq!(outcome.fields_checked, vec!["$.id"]);
}

#[tokio::test]
async fn non_json_body_checks_no_fields() {
    let client = ScriptedHttpClient::new(vec![response(200, "<html>ok</html>")]);
    let outcome = Executor::new(client.clone())
        .execute(Uuid::new_v4(), &template(SINGLE), &VariableSet::single("tok"))
        .await;

    assert_eq!(outcome.result.error(), Some("Invalid JSON response"));
    assert_eq!(outcome.status_code, Some(200));
    assert!(outcome.fields_checked.is_empty());
    assert_eq!(outcome.failed_field, None);
}

#[tokio::test]
async fn custom_error_message_for_status() {
    let client = ScriptedHttpClient::new(vec![response(401, "{}")]);
    let outcome = Executor::new(client.clone())
        .execute(Uuid::new_v4(), &template(SINGLE), &VariableSet::single("tok"))
        .await;

    assert_eq!(client.calls(), 1);
    assert_eq!(outcome.result.error(), Some("bad token"));
    assert_eq!(outcome.status_code, Some(401));
}

#[tokio::test]
async fn timeout_without_retries_is_a_single_attempt() {
    let yaml = SINGLE.replace("max_retries: 2", "max_retries: 0");
    let client = ScriptedHttpClient::new(vec![Err(HttpError::Timeout)]);
    let outcome = Executor::new(client.clone())
        .execute(Uuid::new_v4(), &template(&yaml), &VariableSet::single("tok"))
        .await;

    assert_eq!(client.calls(), 1);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.status_code, None);
    assert_eq!(outcome.result.error(), Some("Request timeout"));
}

#[tokio::test(start_paused = true)]
async fn transport_failure_text_is_scrubbed() {
    let client = ScriptedHttpClient::new(vec![Err(HttpError::Network(
        "tls handshake failed for tok-secret-value".to_string(),
    ))]);
    let sink = Arc::new(RecordingSink::default());
    let outcome = Executor::new(client.clone())
        .with_events(sink.clone())
        .execute(
            Uuid::new_v4(),
            &template(SINGLE),
            &VariableSet::single("tok-secret-value"),
        )
        .await;

    assert_eq!(client.calls(), 3);
    assert_eq!(
        outcome.result.error(),
        Some("Request failed: tls handshake failed for ***SECRET***")
    );
    assert!(!sink.rendered().contains("tok-secret-value"));
}

#[tokio::test]
async fn secrets_reach_the_wire_but_not_the_events() {
    let yaml = r#"
name: ghost
api_url: "${BASE_URL}/ghost/api/admin/site/"
method: POST
mode: multipart
required_variables: [BASE_URL, API_TOKEN]
request:
  headers:
    Authorization: "Ghost ${API_TOKEN}"
  timeout: 7
  json_data:
    token: "${API_TOKEN}"
success_criteria:
  status_code: [200]
"#;
    let vars: VariableSet = [("BASE_URL", "https://blog.example"), ("API_TOKEN", "k3y-v4lue")]
        .into_iter()
        .collect();
    let client = ScriptedHttpClient::new(vec![response(200, r#"{"echo": "k3y-v4lue"}"#)]);
    let sink = Arc::new(RecordingSink::default());

    let outcome = Executor::new(client.clone())
        .with_events(sink.clone())
        .execute(Uuid::new_v4(), &template(yaml), &vars)
        .await;
    assert!(outcome.result.is_valid());

    let seen = client.seen.lock().unwrap()[0].clone();
    assert_eq!(seen.url, "https://blog.example/ghost/api/admin/site/");
    assert_eq!(seen.headers["Authorization"], "Ghost k3y-v4lue");
    assert_eq!(seen.timeout, Duration::from_secs(7));
    let body: serde_json::Value = serde_json::from_slice(&seen.body.unwrap()).unwrap();
    assert_eq!(body["token"], "k3y-v4lue");

    let rendered = sink.rendered();
    assert!(!rendered.contains("k3y-v4lue"));
    assert!(!rendered.contains("blog.example"));
    assert!(rendered.contains("***API_TOKEN***"));
    assert_eq!(
        sink.types(),
        vec![
            "request.prepared",
            "attempt.started",
            "attempt.finished",
            "response.received",
            "validation.finished",
        ]
    );
}

#[tokio::test]
async fn unparseable_url_fails_before_any_attempt() {
    let yaml = r#"
name: broken
api_url: "${BASE_URL}/v1"
mode: multipart
required_variables: [BASE_URL]
success_criteria:
  status_code: [200]
"#;
    let vars: VariableSet = [("BASE_URL", "not a url")].into_iter().collect();
    let client = ScriptedHttpClient::new(vec![response(200, "")]);
    let outcome = Executor::new(client.clone())
        .execute(Uuid::new_v4(), &template(yaml), &vars)
        .await;

    assert_eq!(client.calls(), 0);
    assert_eq!(outcome.attempts, 0);
    assert!(outcome
        .result
        .error()
        .unwrap()
        .starts_with("Request failed: invalid URL"));
}
