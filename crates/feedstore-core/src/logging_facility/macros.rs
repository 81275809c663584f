//! Boundary logging for store operations
//!
//! Every store operation is logged against the table it touches. All three
//! macros emit `component`, `op`, `event` and `table`; the closing events add
//! `duration_ms` measured from the `Instant` taken when the operation began.
//! Extra `key = value` fields may follow the required arguments.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_boundary {
    ($level:expr, $event:expr, $op:expr, $table:expr; $($field:tt)*) => {
        tracing::event!(
            target: module_path!(),
            $level,
            {
                { $crate::feedstore_core_types::schema::FIELD_COMPONENT } = module_path!(),
                { $crate::feedstore_core_types::schema::FIELD_OP } = $op,
                { $crate::feedstore_core_types::schema::FIELD_EVENT } = $event,
                { $crate::feedstore_core_types::schema::FIELD_TABLE } = $table,
                $($field)*
            }
        )
    };
}

/// Log that `op` started against `table`
///
/// ```
/// # use feedstore_core::log_op_start;
/// log_op_start!("feed_create", "feeds");
/// log_op_start!("feed_find_by_id", "feeds", id = "f1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr, $table:expr $(, $($field:tt)*)?) => {
        $crate::__log_boundary!(
            tracing::Level::INFO,
            $crate::feedstore_core_types::schema::EVENT_START,
            $op,
            $table;
            $($($field)*)?
        )
    };
}

/// Log that `op` against `table` finished
///
/// ```
/// # use feedstore_core::log_op_end;
/// let started = std::time::Instant::now();
/// log_op_end!("feed_list", "feeds", started, row_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, $table:expr, $started:expr $(, $($field:tt)*)?) => {
        $crate::__log_boundary!(
            tracing::Level::INFO,
            $crate::feedstore_core_types::schema::EVENT_END,
            $op,
            $table;
            { $crate::feedstore_core_types::schema::FIELD_DURATION_MS } =
                $crate::logging_facility::elapsed_ms($started),
            $($($field)*)?
        )
    };
}

/// Log that `op` against `table` failed with `err`
///
/// `err` is anything convertible into `ExError`; its kind, code and message
/// are attached to the event.
///
/// ```
/// # use feedstore_core::log_op_error;
/// # use feedstore_core::errors::{ExError, ExErrorKind};
/// let started = std::time::Instant::now();
/// let err = ExError::new(ExErrorKind::NotFound).with_message("feed not found");
/// log_op_error!("feed_soft_delete_by_id", "feeds", started, err);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $table:expr, $started:expr, $err:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_boundary!(
            tracing::Level::ERROR,
            $crate::feedstore_core_types::schema::EVENT_END_ERROR,
            $op,
            $table;
            { $crate::feedstore_core_types::schema::FIELD_DURATION_MS } =
                $crate::logging_facility::elapsed_ms($started),
            { $crate::feedstore_core_types::schema::FIELD_ERR_KIND } = ?ex_err.kind(),
            { $crate::feedstore_core_types::schema::FIELD_ERR_CODE } = ex_err.code(),
            { $crate::feedstore_core_types::schema::FIELD_ERR_MESSAGE } = ex_err.message(),
            $($($field)*)?
        )
    }};
}
