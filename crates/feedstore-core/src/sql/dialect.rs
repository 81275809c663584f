//! SQL dialects: identifier quoting, placeholders and column types

use crate::errors::SqlBuildError;

/// Row count used by MySQL to express "no limit" when only an offset is set
pub const MYSQL_MAX_LIMIT: &str = "18446744073709551615";

/// Target database flavour for generated statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
    Mysql,
}

impl Dialect {
    /// Resolve a driver name such as `sqlite` or `postgres`
    ///
    /// # Errors
    ///
    /// Returns [`SqlBuildError::UnsupportedDriver`] for unknown names.
    pub fn from_driver_name(name: &str) -> Result<Self, SqlBuildError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" | "pgx" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::Mysql),
            _ => Err(SqlBuildError::UnsupportedDriver {
                driver: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "sqlite",
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
        }
    }

    /// Quote an identifier, doubling any embedded quote character
    ///
    /// # Errors
    ///
    /// Returns [`SqlBuildError::EmptyIdentifier`] for an empty identifier.
    pub fn quote_ident(&self, ident: &str) -> Result<String, SqlBuildError> {
        if ident.is_empty() {
            return Err(SqlBuildError::EmptyIdentifier);
        }
        let quoted = match self {
            Dialect::Sqlite | Dialect::Postgres => format!("\"{}\"", ident.replace('"', "\"\"")),
            Dialect::Mysql => format!("`{}`", ident.replace('`', "``")),
        };
        Ok(quoted)
    }

    /// Placeholder for the 1-based parameter `index`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", index),
            Dialect::Sqlite | Dialect::Mysql => "?".to_string(),
        }
    }

    /// Render a string literal (used for column defaults in DDL)
    pub fn string_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}
