//! Operation logging macros
//!
//! Mutations emit a `start` event, then an `end` event with the elapsed time,
//! or a `rejected` event carrying the stable error code when the input was
//! refused. Collaborator failures use `end_error`. Extra fields follow the
//! usual `tracing` syntax.

/// Emit the `start` event of an operation
///
/// ```
/// # use dataroom_core::log_op_start;
/// log_op_start!("create_folder");
/// log_op_start!("create_folder", folder_id = "f-1", name = "Legal");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = dataroom_core_types::schema::EVENT_START,
            $($($field)+)?
        )
    };
}

/// Emit the `end` event of an operation that committed
///
/// ```
/// # use dataroom_core::log_op_end;
/// log_op_end!("delete_folder_cascade", duration_ms = 3);
/// log_op_end!("delete_folder_cascade", duration_ms = 3, deleted_files = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = dataroom_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        )
    };
}

/// Log a validation rejection (the operation became a no-op)
///
/// # Example
///
/// ```
/// # use dataroom_core::{log_op_rejected, errors::DataRoomError, rules::naming::NameRejection};
/// let err = DataRoomError::InvalidName { reason: NameRejection::Empty };
/// log_op_rejected!("create_folder", &err);
/// ```
#[macro_export]
macro_rules! log_op_rejected {
    ($op:expr, $err:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = dataroom_core_types::schema::EVENT_REJECTED,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            entity_id = ex_err.entity_id().unwrap_or_default(),
        );
    }};
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use dataroom_core::{log_op_error, errors::{ExError, ExErrorKind}};
/// let err = ExError::new(ExErrorKind::Io).with_message("disk full");
/// log_op_error!("save_state", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = dataroom_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message(),
        );
    }};
}
