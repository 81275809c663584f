use thiserror::Error;

/// Result type alias using ExError
pub type Result<T, E = ExError> = std::result::Result<T, E>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error leaving a feedstore crate carries one of these kinds. Each kind
/// maps to a stable code usable for programmatic handling and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller input, detected before any I/O
    InvalidInput,
    /// A query filter failed validation
    Validation,
    /// The statement builder rejected the statement
    SqlBuild,
    NotFound,

    // Integration/IO
    Persistence,
    Config,
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::SqlBuild => "ERR_SQL_BUILD",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus free-form context
/// for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    table: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            table: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Query validation failures
///
/// Raised by `validate()` on the feed and link queries, before any SQL is
/// compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A filter that must be non-empty was set to an empty value
    #[error("{query} query: {filter} cannot be empty")]
    EmptyFilter {
        query: &'static str,
        filter: &'static str,
    },

    /// An in-set filter was set with zero elements
    #[error("{query} query: {filter} cannot be empty array")]
    EmptyInSet {
        query: &'static str,
        filter: &'static str,
    },

    /// Limit or offset was set to a negative number
    #[error("{query} query: {filter} cannot be negative")]
    Negative {
        query: &'static str,
        filter: &'static str,
    },

    /// A range bound that does not parse as a timestamp
    #[error("{query} query: {filter} is not a valid timestamp: {value:?}")]
    InvalidTimestamp {
        query: &'static str,
        filter: &'static str,
        value: String,
    },

    /// Ordering on a column the table does not have
    #[error("{query} query: {filter} names unknown column {column:?}")]
    UnknownColumn {
        query: &'static str,
        filter: &'static str,
        column: String,
    },
}

impl QueryError {
    /// Name of the offending filter
    pub fn filter(&self) -> &'static str {
        match self {
            QueryError::EmptyFilter { filter, .. }
            | QueryError::EmptyInSet { filter, .. }
            | QueryError::Negative { filter, .. }
            | QueryError::InvalidTimestamp { filter, .. }
            | QueryError::UnknownColumn { filter, .. } => *filter,
        }
    }
}

/// Statement builder failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlBuildError {
    #[error("table name cannot be empty")]
    EmptyTable,

    #[error("identifier cannot be empty")]
    EmptyIdentifier,

    #[error("IN list for column {column} cannot be empty")]
    EmptyInList { column: String },

    #[error("insert into {table} has no columns")]
    EmptyInsert { table: String },

    #[error("update of {table} has no columns to set")]
    EmptyUpdate { table: String },

    #[error("unsupported driver: {driver}")]
    UnsupportedDriver { driver: String },
}

impl From<QueryError> for ExError {
    fn from(err: QueryError) -> Self {
        ExError::new(ExErrorKind::Validation)
            .with_op("validate")
            .with_message(err.to_string())
    }
}

impl From<SqlBuildError> for ExError {
    fn from(err: SqlBuildError) -> Self {
        let kind = match err {
            SqlBuildError::UnsupportedDriver { .. } => ExErrorKind::Config,
            _ => ExErrorKind::SqlBuild,
        };
        ExError::new(kind)
            .with_op("build_sql")
            .with_message(err.to_string())
    }
}
