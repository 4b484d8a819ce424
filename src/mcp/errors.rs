pub const INVALID_INPUT: &str = "invalid_input";
pub const NOT_FOUND: &str = "not_found";
pub const FETCH_FAILED: &str = "fetch_failed";
pub const TIMEOUT: &str = "timeout";
pub const TRANSPORT_FAILED: &str = "transport_failed";
pub const INTERNAL_ERROR: &str = "internal_error";
