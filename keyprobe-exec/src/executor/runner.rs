use std::sync::Arc;
use std::time::Duration;

use keyprobe_core::{SecretTemplate, ValidationResult, VariableSet};
use uuid::Uuid;

use crate::executor::events::{Event, EventSink, NoOpEventSink};
use crate::executor::http::{HttpClient, HttpError, ReqwestHttpClient};
use crate::executor::matcher::match_response;
use crate::executor::request::build_request;
use crate::executor::types::{HttpResponseParts, ValidationOutcome};
use crate::retry::{decide_retry, AttemptOutcome, RetryConfig, RetryDecision};
use crate::secrets::{scrub_secrets, truncate_preview, BODY_PREVIEW_CHARS};

pub const TIMEOUT_ERROR: &str = "Request timeout";

/// Sends a template's probe request and turns whatever comes back into a result.
///
/// Every network-level outcome ends in a [`ValidationOutcome`]; nothing is propagated as an
/// error. Attempts run one at a time.
pub struct Executor {
    http: Arc<dyn HttpClient>,
    event_sink: Arc<dyn EventSink>,
}

impl Executor {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    pub fn with_default_client() -> Result<Self, HttpError> {
        Ok(Self::new(Arc::new(ReqwestHttpClient::try_new()?)))
    }

    pub fn with_events(mut self, event_sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub(crate) fn event_sink(&self) -> &Arc<dyn EventSink> {
        &self.event_sink
    }

    pub async fn execute(
        &self,
        run_id: Uuid,
        template: &SecretTemplate,
        vars: &VariableSet,
    ) -> ValidationOutcome {
        let prepared = match build_request(template, vars) {
            Ok(p) => p,
            Err(e) => {
                let error = format!("Request failed: {}", scrub_secrets(&e.to_string(), vars));
                let outcome =
                    ValidationOutcome::without_response(run_id, ValidationResult::invalid(error), 0);
                return self.finish(outcome).await;
            }
        };

        self.event_sink
            .emit(Event::RequestPrepared {
                run_id,
                request: prepared.masked.clone(),
            })
            .await;

        let retry = RetryConfig::from_error_handling(&template.error_handling);
        let timeout = Duration::from_secs(template.request.timeout);

        let mut attempt_no = 0;
        loop {
            attempt_no += 1;
            self.event_sink
                .emit(Event::AttemptStarted { run_id, attempt_no })
                .await;

            let sent = self.http.send(&prepared.parts, timeout).await;
            let outcome = match &sent {
                Ok(resp) => {
                    self.emit_attempt_finished(run_id, attempt_no, Some(resp.status), None)
                        .await;
                    AttemptOutcome::Status(resp.status)
                }
                Err(e) => {
                    let error = scrub_secrets(&e.to_string(), vars);
                    self.emit_attempt_finished(run_id, attempt_no, None, Some(error))
                        .await;
                    AttemptOutcome::TransportFailure
                }
            };

            match decide_retry(&retry, attempt_no, outcome) {
                RetryDecision::RetryAfter { delay, reason } => {
                    tracing::debug!(attempt_no, %reason, "retrying probe request");
                    self.event_sink
                        .emit(Event::RetryScheduled {
                            run_id,
                            attempt_no,
                            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            reason: reason.to_string(),
                        })
                        .await;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                RetryDecision::Stop { .. } => {
                    let outcome = match sent {
                        Ok(resp) => self.evaluate(run_id, template, vars, resp, attempt_no).await,
                        Err(e) => ValidationOutcome::without_response(
                            run_id,
                            classify_transport_error(&e, vars),
                            attempt_no,
                        ),
                    };
                    return self.finish(outcome).await;
                }
            }
        }
    }

    async fn evaluate(
        &self,
        run_id: Uuid,
        template: &SecretTemplate,
        vars: &VariableSet,
        resp: HttpResponseParts,
        attempts: u32,
    ) -> ValidationOutcome {
        let preview = truncate_preview(&String::from_utf8_lossy(&resp.body), BODY_PREVIEW_CHARS);
        self.event_sink
            .emit(Event::ResponseReceived {
                run_id,
                status: resp.status,
                body_preview: scrub_secrets(&preview, vars),
            })
            .await;

        let matched = match_response(
            resp.status,
            &resp.body,
            &template.success_criteria,
            &template.error_handling,
        );
        ValidationOutcome {
            run_id,
            result: matched.result,
            status_code: Some(resp.status),
            attempts,
            failed_field: matched.failed_field,
            fields_checked: matched.fields_checked,
        }
    }

    async fn emit_attempt_finished(
        &self,
        run_id: Uuid,
        attempt_no: u32,
        status: Option<u16>,
        error: Option<String>,
    ) {
        self.event_sink
            .emit(Event::AttemptFinished {
                run_id,
                attempt_no,
                status,
                error,
            })
            .await;
    }

    async fn finish(&self, outcome: ValidationOutcome) -> ValidationOutcome {
        self.event_sink
            .emit(Event::ValidationFinished {
                run_id: outcome.run_id,
                valid: outcome.result.is_valid(),
                attempts: outcome.attempts,
            })
            .await;
        outcome
    }
}

fn classify_transport_error(err: &HttpError, vars: &VariableSet) -> ValidationResult {
    match err {
        HttpError::Timeout => ValidationResult::invalid(TIMEOUT_ERROR),
        other => ValidationResult::invalid(format!(
            "Request failed: {}",
            scrub_secrets(&other.to_string(), vars)
        )),
    }
}
