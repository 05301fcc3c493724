mod redact;

pub use redact::{scrub_secrets, truncate_preview, BODY_PREVIEW_CHARS};
