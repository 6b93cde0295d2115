//! Type-safe positional parameters for dynamically composed queries.

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;
use uuid::Uuid;

/// Type-safe parameter binding for SQL queries.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    /// Single UUID parameter.
    Uuid(Uuid),
    /// Array of UUIDs (for `= ANY(...)`).
    UuidArray(Vec<Uuid>),
    /// 64-bit integer parameter.
    Int(i64),
    /// Double precision parameter.
    Float(f64),
    /// Boolean parameter.
    Bool(bool),
    /// String parameter.
    String(String),
    /// Array of strings (for `= ANY(...)`).
    StringArray(Vec<String>),
}

/// Bind every parameter, in order, to a query.
pub fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [QueryParam],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            QueryParam::Uuid(id) => query.bind(id),
            QueryParam::UuidArray(ids) => query.bind(ids),
            QueryParam::Int(val) => query.bind(val),
            QueryParam::Float(val) => query.bind(val),
            QueryParam::Bool(b) => query.bind(b),
            QueryParam::String(s) => query.bind(s),
            QueryParam::StringArray(arr) => query.bind(arr),
        };
    }
    query
}
