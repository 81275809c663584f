//! Parameterised SELECT / INSERT / UPDATE / DELETE builders
//!
//! Builders collect structure only; rendering against a [`Dialect`] happens in
//! `to_sql`, which is where every [`SqlBuildError`] is raised.

use super::dialect::{Dialect, MYSQL_MAX_LIMIT};
use crate::errors::SqlBuildError;

/// A rendered statement and its positional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Gte,
    Lte,
}

impl CompareOp {
    fn as_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
        }
    }
}

/// A single WHERE condition; conditions are joined with AND
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Compare {
        column: String,
        op: CompareOp,
        value: String,
    },
    In {
        column: String,
        values: Vec<String>,
    },
}

impl Predicate {
    fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<String>) -> Self {
        Predicate::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Gt, value)
    }

    pub fn gte(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Gte, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::compare(column, CompareOp::Lte, value)
    }

    pub fn in_list<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn render(&self, dialect: Dialect, params: &mut Vec<String>) -> Result<String, SqlBuildError> {
        match self {
            Predicate::Compare { column, op, value } => {
                params.push(value.clone());
                Ok(format!(
                    "{} {} {}",
                    dialect.quote_ident(column)?,
                    op.as_sql(),
                    dialect.placeholder(params.len())
                ))
            }
            Predicate::In { column, values } => {
                if values.is_empty() {
                    return Err(SqlBuildError::EmptyInList {
                        column: column.clone(),
                    });
                }
                let mut holders = Vec::with_capacity(values.len());
                for value in values {
                    params.push(value.clone());
                    holders.push(dialect.placeholder(params.len()));
                }
                Ok(format!(
                    "{} IN ({})",
                    dialect.quote_ident(column)?,
                    holders.join(", ")
                ))
            }
        }
    }
}

fn render_where(
    dialect: Dialect,
    predicates: &[Predicate],
    params: &mut Vec<String>,
) -> Result<String, SqlBuildError> {
    if predicates.is_empty() {
        return Ok(String::new());
    }
    let rendered = predicates
        .iter()
        .map(|p| p.render(dialect, params))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!(" WHERE {}", rendered.join(" AND ")))
}

fn quoted_table(dialect: Dialect, table: &str) -> Result<String, SqlBuildError> {
    if table.is_empty() {
        return Err(SqlBuildError::EmptyTable);
    }
    dialect.quote_ident(table)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    /// `asc` in any case is ascending; anything else is descending
    pub fn parse_lenient(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("asc") {
            OrderDirection::Asc
        } else {
            OrderDirection::Desc
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// SELECT builder with AND-ed predicates, one ORDER BY column and pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    table: String,
    predicates: Vec<Predicate>,
    order_by: Option<(String, OrderDirection)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SelectStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    pub fn order_by(&mut self, column: impl Into<String>, direction: OrderDirection) -> &mut Self {
        self.order_by = Some((column.into(), direction));
        self
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order(&self) -> Option<(&str, OrderDirection)> {
        self.order_by.as_ref().map(|(c, d)| (c.as_str(), *d))
    }

    pub fn limit_value(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<i64> {
        self.offset
    }

    /// Render the full statement
    ///
    /// # Errors
    ///
    /// Fails on an empty table name, an empty identifier or an empty IN list.
    pub fn to_sql(&self, dialect: Dialect) -> Result<Statement, SqlBuildError> {
        let table = quoted_table(dialect, &self.table)?;
        let mut params = Vec::new();
        let mut sql = format!("SELECT * FROM {}", table);
        sql.push_str(&render_where(dialect, &self.predicates, &mut params)?);

        if let Some((column, direction)) = &self.order_by {
            sql.push_str(&format!(
                " ORDER BY {} {}",
                dialect.quote_ident(column)?,
                direction.as_sql()
            ));
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset))
            }
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(offset)) => match dialect {
                Dialect::Sqlite => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
                Dialect::Mysql => {
                    sql.push_str(&format!(" LIMIT {} OFFSET {}", MYSQL_MAX_LIMIT, offset))
                }
                Dialect::Postgres => sql.push_str(&format!(" OFFSET {}", offset)),
            },
            (None, None) => {}
        }

        Ok(Statement { sql, params })
    }

    /// Render `SELECT COUNT(*) AS count` over the same filters
    ///
    /// Ordering and pagination are dropped.
    ///
    /// # Errors
    ///
    /// Same as [`SelectStatement::to_sql`].
    pub fn to_count_sql(&self, dialect: Dialect) -> Result<Statement, SqlBuildError> {
        let table = quoted_table(dialect, &self.table)?;
        let mut params = Vec::new();
        let mut sql = format!("SELECT COUNT(*) AS count FROM {}", table);
        sql.push_str(&render_where(dialect, &self.predicates, &mut params)?);
        Ok(Statement { sql, params })
    }
}

/// Single-row INSERT builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    table: String,
    values: Vec<(String, String)>,
}

impl InsertStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: Vec::new(),
        }
    }

    pub fn value(&mut self, column: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.push((column.into(), value.into()));
        self
    }

    /// # Errors
    ///
    /// Fails on an empty table name, an empty identifier or an empty row.
    pub fn to_sql(&self, dialect: Dialect) -> Result<Statement, SqlBuildError> {
        let table = quoted_table(dialect, &self.table)?;
        if self.values.is_empty() {
            return Err(SqlBuildError::EmptyInsert {
                table: self.table.clone(),
            });
        }

        let mut columns = Vec::with_capacity(self.values.len());
        let mut holders = Vec::with_capacity(self.values.len());
        let mut params = Vec::with_capacity(self.values.len());
        for (column, value) in &self.values {
            columns.push(dialect.quote_ident(column)?);
            params.push(value.clone());
            holders.push(dialect.placeholder(params.len()));
        }

        Ok(Statement {
            sql: format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                columns.join(", "),
                holders.join(", ")
            ),
            params,
        })
    }
}

/// UPDATE builder: SET list plus AND-ed predicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    table: String,
    assignments: Vec<(String, String)>,
    predicates: Vec<Predicate>,
}

impl UpdateStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            predicates: Vec::new(),
        }
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    /// # Errors
    ///
    /// Fails on an empty table name, an empty identifier or an empty SET list.
    pub fn to_sql(&self, dialect: Dialect) -> Result<Statement, SqlBuildError> {
        let table = quoted_table(dialect, &self.table)?;
        if self.assignments.is_empty() {
            return Err(SqlBuildError::EmptyUpdate {
                table: self.table.clone(),
            });
        }

        let mut params = Vec::new();
        let mut sets = Vec::with_capacity(self.assignments.len());
        for (column, value) in &self.assignments {
            params.push(value.clone());
            sets.push(format!(
                "{} = {}",
                dialect.quote_ident(column)?,
                dialect.placeholder(params.len())
            ));
        }

        let mut sql = format!("UPDATE {} SET {}", table, sets.join(", "));
        sql.push_str(&render_where(dialect, &self.predicates, &mut params)?);
        Ok(Statement { sql, params })
    }
}

/// DELETE builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatement {
    table: String,
    predicates: Vec<Predicate>,
}

impl DeleteStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
        }
    }

    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    /// # Errors
    ///
    /// Fails on an empty table name, an empty identifier or an empty IN list.
    pub fn to_sql(&self, dialect: Dialect) -> Result<Statement, SqlBuildError> {
        let table = quoted_table(dialect, &self.table)?;
        let mut params = Vec::new();
        let mut sql = format!("DELETE FROM {}", table);
        sql.push_str(&render_where(dialect, &self.predicates, &mut params)?);
        Ok(Statement { sql, params })
    }
}
