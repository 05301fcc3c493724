use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::executor::types::MaskedRequest;

/// Progress of one validation run. Carries masked or scrubbed text only.
#[derive(Debug, Clone)]
pub enum Event {
    ValidationStarted {
        run_id: Uuid,
        template: String,
        mode: String,
    },
    UsageRejected {
        run_id: Uuid,
        template: String,
        reason: String,
    },
    RequestPrepared {
        run_id: Uuid,
        request: MaskedRequest,
    },
    AttemptStarted {
        run_id: Uuid,
        attempt_no: u32,
    },
    AttemptFinished {
        run_id: Uuid,
        attempt_no: u32,
        status: Option<u16>,
        error: Option<String>,
    },
    RetryScheduled {
        run_id: Uuid,
        attempt_no: u32,
        delay_ms: u64,
        reason: String,
    },
    ResponseReceived {
        run_id: Uuid,
        status: u16,
        body_preview: String,
    },
    ValidationFinished {
        run_id: Uuid,
        valid: bool,
        attempts: u32,
    },
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ValidationStarted { .. } => "validation.started",
            Event::UsageRejected { .. } => "validation.rejected",
            Event::RequestPrepared { .. } => "request.prepared",
            Event::AttemptStarted { .. } => "attempt.started",
            Event::AttemptFinished { .. } => "attempt.finished",
            Event::RetryScheduled { .. } => "attempt.retry_scheduled",
            Event::ResponseReceived { .. } => "response.received",
            Event::ValidationFinished { .. } => "validation.finished",
        }
    }

    pub fn run_id(&self) -> Uuid {
        match self {
            Event::ValidationStarted { run_id, .. }
            | Event::UsageRejected { run_id, .. }
            | Event::RequestPrepared { run_id, .. }
            | Event::AttemptStarted { run_id, .. }
            | Event::AttemptFinished { run_id, .. }
            | Event::RetryScheduled { run_id, .. }
            | Event::ResponseReceived { run_id, .. }
            | Event::ValidationFinished { run_id, .. } => *run_id,
        }
    }

    /// Event payload without the run id and type.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Event::ValidationStarted { template, mode, .. } => {
                json!({ "template": template, "mode": mode })
            }
            Event::UsageRejected {
                template, reason, ..
            } => json!({ "template": template, "reason": reason }),
            Event::RequestPrepared { request, .. } => json!({ "request": request }),
            Event::AttemptStarted { attempt_no, .. } => json!({ "attempt_no": attempt_no }),
            Event::AttemptFinished {
                attempt_no,
                status,
                error,
                ..
            } => json!({ "attempt_no": attempt_no, "status": status, "error": error }),
            Event::RetryScheduled {
                attempt_no,
                delay_ms,
                reason,
                ..
            } => json!({ "attempt_no": attempt_no, "delay_ms": delay_ms, "reason": reason }),
            Event::ResponseReceived {
                status,
                body_preview,
                ..
            } => json!({ "status": status, "body_preview": body_preview }),
            Event::ValidationFinished {
                valid, attempts, ..
            } => json!({ "valid": valid, "attempts": attempts }),
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Forwards events to `tracing`. Milestones at INFO, per-attempt detail at DEBUG.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        let run_id = event.run_id().to_string();
        let event_type = event.event_type();
        let payload = event.payload().to_string();
        match event {
            Event::ValidationStarted { .. }
            | Event::ValidationFinished { .. }
            | Event::RetryScheduled { .. } => {
                tracing::info!(run_id = %run_id, event = event_type, %payload);
            }
            Event::UsageRejected { .. } => {
                tracing::warn!(run_id = %run_id, event = event_type, %payload);
            }
            _ => {
                tracing::debug!(run_id = %run_id, event = event_type, %payload);
            }
        }
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<&'static str>>>);

    #[async_trait]
    impl EventSink for Recorder {
        async fn emit(&self, event: Event) {
            self.0.lock().unwrap().push(event.event_type());
        }
    }

    #[tokio::test]
    async fn composite_fans_out_to_every_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut sink = CompositeEventSink::new();
        sink.add(Box::new(Recorder(seen.clone())));
        sink.add(Box::new(NoOpEventSink));
        sink.add(Box::new(Recorder(seen.clone())));

        sink.emit(Event::AttemptStarted {
            run_id: Uuid::new_v4(),
            attempt_no: 1,
        })
        .await;

        assert_eq!(*seen.lock().unwrap(), vec!["attempt.started", "attempt.started"]);
    }

    #[test]
    fn payload_omits_run_id() {
        let event = Event::RetryScheduled {
            run_id: Uuid::new_v4(),
            attempt_no: 2,
            delay_ms: 1000,
            reason: "HTTP 503".to_string(),
        };
        let payload = event.payload();
        assert_eq!(payload["delay_ms"], 1000);
        assert!(payload.get("run_id").is_none());
    }
}
