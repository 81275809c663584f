//! Canonical schema constants for structured logging and events
//!
//! These constants keep store boundary logs and test assertions in sync.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// What an operation touched
pub const FIELD_TABLE: &str = "table";
pub const FIELD_ENTITY_KIND: &str = "kind";
pub const FIELD_ENTITY_ID: &str = "id";

// Statement echo (debug toggle)
pub const FIELD_SQL: &str = "sql";
pub const FIELD_PARAM_COUNT: &str = "param_count";

// Result sizes
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_ROWS_AFFECTED: &str = "rows_affected";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_MESSAGE: &str = "err_message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_SQL: &str = "sql";
