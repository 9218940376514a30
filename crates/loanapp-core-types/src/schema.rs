//! Log field keys, event names and operation names
//!
//! Every engine event carries `component`, `op` and `event`; the keys below
//! are the ones the `log_op_*` macros and the engine actually emit.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Correlation
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_CALLER: &str = "caller";

// Aggregate identity
pub const FIELD_APPLICATION_ID: &str = "application_id";
pub const FIELD_FILE_NO: &str = "file_no";

pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// Engine operations, as they appear in the `op` field
pub mod ops {
    pub const CREATE_AGGREGATE: &str = "create_aggregate";
    pub const UPDATE_AGGREGATE: &str = "update_aggregate";
    pub const READ_AGGREGATE: &str = "read_aggregate";
    pub const READ_FOR_OWNER: &str = "read_for_owner";
    pub const DELETE_AGGREGATE: &str = "delete_aggregate";
    pub const SUBMIT_AGGREGATE: &str = "submit_aggregate";
    pub const LIST_BY_OWNER: &str = "list_by_owner";
    pub const COUNT_BY_STATUS: &str = "count_by_status";

    pub const ALL: [&str; 8] = [
        CREATE_AGGREGATE,
        UPDATE_AGGREGATE,
        READ_AGGREGATE,
        READ_FOR_OWNER,
        DELETE_AGGREGATE,
        SUBMIT_AGGREGATE,
        LIST_BY_OWNER,
        COUNT_BY_STATUS,
    ];
}
