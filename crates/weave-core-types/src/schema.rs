//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_ASSEMBLY_ID: &str = "assembly_id";

// Entity identifiers
pub const FIELD_EXTENSION_POINT: &str = "extension_point";
pub const FIELD_ACTION: &str = "action";
pub const FIELD_INTERRUPT: &str = "interrupt";
pub const FIELD_EXPORTER: &str = "exporter";

// Collection sizes
pub const FIELD_NODE_COUNT: &str = "node_count";
pub const FIELD_EDGE_COUNT: &str = "edge_count";
pub const FIELD_CONTRIBUTION_COUNT: &str = "contribution_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Tracing target used for per-action execution events
pub const TARGET_ACTION: &str = "weave::action";
