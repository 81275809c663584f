//! `CREATE TABLE IF NOT EXISTS` generation

use super::dialect::Dialect;
use crate::errors::SqlBuildError;

/// Portable column types, mapped per dialect at render time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Bounded string of at most `n` characters
    String(u32),
    Text,
    Integer,
    DateTime,
}

impl ColumnType {
    pub fn to_sql(&self, dialect: Dialect) -> String {
        match (self, dialect) {
            (ColumnType::String(_), Dialect::Sqlite) => "TEXT".to_string(),
            (ColumnType::String(n), _) => format!("VARCHAR({})", n),
            (ColumnType::Text, Dialect::Mysql) => "LONGTEXT".to_string(),
            (ColumnType::Text, _) => "TEXT".to_string(),
            (ColumnType::Integer, Dialect::Mysql) => "BIGINT".to_string(),
            (ColumnType::Integer, _) => "INTEGER".to_string(),
            (ColumnType::DateTime, Dialect::Postgres) => "TIMESTAMP".to_string(),
            (ColumnType::DateTime, _) => "DATETIME".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub primary_key: bool,
    pub nullable: bool,
    pub default: Option<String>,
}

impl ColumnDef {
    /// A non-null column without default
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key: false,
            nullable: false,
            default: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// String literal default
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    fn to_sql(&self, dialect: Dialect) -> Result<String, SqlBuildError> {
        let mut sql = format!(
            "{} {}",
            dialect.quote_ident(&self.name)?,
            self.column_type.to_sql(dialect)
        );
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&dialect.string_literal(default));
        }
        Ok(sql)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    table: String,
    columns: Vec<ColumnDef>,
}

impl CreateTable {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// # Errors
    ///
    /// Fails on an empty table name, an empty column name or a table without
    /// columns.
    pub fn to_sql(&self, dialect: Dialect) -> Result<String, SqlBuildError> {
        if self.table.is_empty() {
            return Err(SqlBuildError::EmptyTable);
        }
        if self.columns.is_empty() {
            return Err(SqlBuildError::EmptyIdentifier);
        }
        let columns = self
            .columns
            .iter()
            .map(|c| c.to_sql(dialect))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            dialect.quote_ident(&self.table)?,
            columns.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CreateTable {
        CreateTable::new("feeds")
            .column(ColumnDef::new("id", ColumnType::String(40)).primary_key())
            .column(ColumnDef::new("memo", ColumnType::Text).nullable())
            .column(ColumnDef::new("fetch_interval", ColumnType::Integer))
            .column(
                ColumnDef::new("soft_deleted_at", ColumnType::DateTime)
                    .default_value("9999-12-31 23:59:59"),
            )
    }

    #[test]
    fn test_sqlite_ddl() {
        assert_eq!(
            sample().to_sql(Dialect::Sqlite).unwrap(),
            "CREATE TABLE IF NOT EXISTS \"feeds\" (\"id\" TEXT PRIMARY KEY, \"memo\" TEXT, \
             \"fetch_interval\" INTEGER NOT NULL, \
             \"soft_deleted_at\" DATETIME NOT NULL DEFAULT '9999-12-31 23:59:59')"
        );
    }

    #[test]
    fn test_mysql_and_postgres_types() {
        let mysql = sample().to_sql(Dialect::Mysql).unwrap();
        assert!(mysql.contains("`id` VARCHAR(40) PRIMARY KEY"));
        assert!(mysql.contains("`memo` LONGTEXT"));
        assert!(mysql.contains("`fetch_interval` BIGINT NOT NULL"));

        let pg = sample().to_sql(Dialect::Postgres).unwrap();
        assert!(pg.contains("\"soft_deleted_at\" TIMESTAMP NOT NULL"));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let ddl = CreateTable::new("").column(ColumnDef::new("id", ColumnType::Integer));
        assert_eq!(ddl.to_sql(Dialect::Sqlite), Err(SqlBuildError::EmptyTable));
    }
}
