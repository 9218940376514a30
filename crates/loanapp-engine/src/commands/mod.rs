//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and persistence layer.

pub mod aggregate;
pub mod engine_command;
pub mod engine_query;
mod sync;

use loanapp_core::errors::ExError;
use loanapp_core::{log_op_end, log_op_error, log_op_start};
use loanapp_core_types::RequestContext;
use loanapp_store::errors::Result;

/// Run one operation between a start and an end (or end_error) event
///
/// Errors leaving the operation carry its name (unless a lower layer named
/// one already) and the request id.
pub(crate) fn logged<T>(
    op: &'static str,
    ctx: &RequestContext,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    log_op_start!(op, request_id = ctx.request_id.as_str(), caller = ctx.caller.as_str());
    let start = std::time::Instant::now();

    let result = f().map_err(|e| with_context(e, op, ctx));

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => log_op_end!(op, duration_ms = elapsed, request_id = ctx.request_id.as_str()),
        Err(e) => {
            let e_clone = e.clone();
            log_op_error!(
                op,
                e_clone,
                duration_ms = elapsed,
                request_id = ctx.request_id.as_str()
            );
        }
    }
    result
}

fn with_context(err: ExError, op: &str, ctx: &RequestContext) -> ExError {
    let err = if err.op().is_none() {
        err.with_op(op)
    } else {
        err
    };
    err.with_request_id(ctx.request_id.clone())
}
