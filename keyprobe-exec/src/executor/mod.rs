pub mod events;
pub mod http;
pub mod matcher;
pub mod request;
mod runner;
mod types;

pub use events::{CompositeEventSink, Event, EventSink, NoOpEventSink, TracingEventSink};
pub use http::{HttpClient, HttpError, ReqwestHttpClient};
pub use matcher::{field_present, match_response, MatchOutcome};
pub use request::{build_request, mask_request, PreparedRequest, RequestBuildError};
pub use runner::{Executor, TIMEOUT_ERROR};
pub use types::{HttpRequestParts, HttpResponseParts, MaskedRequest, ValidationOutcome};
