#![forbid(unsafe_code)]

//! Runtime side of secret validation: builds the probe request, sends it with retries, and
//! matches the response against the template's success criteria.
//!
//! Template parsing and validation live in `keyprobe-core`.

pub mod error;
pub mod executor;
pub mod report;
pub mod retry;
pub mod secrets;
mod validator;

pub use crate::error::UsageError;
pub use crate::executor::{
    CompositeEventSink, Event, EventSink, Executor, HttpClient, HttpError, NoOpEventSink,
    ReqwestHttpClient, TracingEventSink, ValidationOutcome,
};
pub use crate::report::{
    write_report, ReportContext, ReportError, TemplateSource, ValidationReport,
};
pub use crate::validator::SecretValidator;
