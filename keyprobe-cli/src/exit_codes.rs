/// Exit codes for CI/automation.
pub const SUCCESS: i32 = 0;
pub const SECRET_INVALID: i32 = 1;
pub const USAGE_ERROR: i32 = 2;
pub const RUNTIME_ERROR: i32 = 4;
