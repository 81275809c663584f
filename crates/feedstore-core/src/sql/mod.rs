//! Hand-written SQL generation
//!
//! Statements are rendered with positional placeholders; values never appear
//! in the SQL text. Only LIMIT/OFFSET integers are inlined.

pub mod ddl;
pub mod dialect;
pub mod statement;

pub use ddl::{ColumnDef, ColumnType, CreateTable};
pub use dialect::Dialect;
pub use statement::{
    CompareOp, DeleteStatement, InsertStatement, OrderDirection, Predicate, SelectStatement,
    Statement, UpdateStatement,
};
