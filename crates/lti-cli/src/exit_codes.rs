//! Exit codes of the `lti` binary.
//! Scripts and host integrations rely on these values.

pub const SUCCESS: i32 = 0;
pub const BAD_REQUEST: i32 = 1; // Launch rejected
pub const CONFIG_ERROR: i32 = 2; // Unreadable input, missing secret or bad arguments
