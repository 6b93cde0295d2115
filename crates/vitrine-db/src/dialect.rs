//! Store-specific SQL text used by the predicate composer.
//!
//! The composer decides *what* to compare; a [`SqlDialect`] decides how the
//! comparison is spelled. Every method receives placeholder indexes, never
//! values.

use vitrine_core::SortDirection;

/// Element type of an array parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayType {
    Uuid,
    Text,
}

/// SQL spelling of the constructs the composer needs.
pub trait SqlDialect: Send + Sync {
    /// Positional placeholder for the 1-based parameter `index`.
    fn placeholder(&self, index: usize) -> String;

    /// `expr` is a member of the array parameter at `index`.
    fn in_array(&self, expr: &str, index: usize, element: ArrayType) -> String;

    /// `expr` is not a member of the array parameter at `index`.
    fn not_in_array(&self, expr: &str, index: usize, element: ArrayType) -> String;

    /// Numeric view of a text expression; NULL when the text is not a number.
    fn to_number(&self, expr: &str) -> String;

    /// Case-insensitive LIKE against an already-escaped pattern parameter.
    fn ilike(&self, expr: &str, index: usize) -> String;

    /// Case-insensitive equality against a parameter.
    fn equals_ci(&self, expr: &str, index: usize) -> String;

    /// Ordering term that always places NULLs last.
    fn order_nulls_last(&self, expr: &str, direction: SortDirection) -> String;
}

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn in_array(&self, expr: &str, index: usize, element: ArrayType) -> String {
        format!("{expr} = ANY(${index}::{})", array_cast(element))
    }

    fn not_in_array(&self, expr: &str, index: usize, element: ArrayType) -> String {
        format!("NOT ({expr} = ANY(${index}::{}))", array_cast(element))
    }

    fn to_number(&self, expr: &str) -> String {
        format!(
            "(CASE WHEN btrim({expr}) ~ '^-?[0-9]+(\\.[0-9]+)?$' THEN btrim({expr})::float8 END)"
        )
    }

    fn ilike(&self, expr: &str, index: usize) -> String {
        format!("{expr} ILIKE ${index}")
    }

    fn equals_ci(&self, expr: &str, index: usize) -> String {
        format!("LOWER({expr}) = LOWER(${index})")
    }

    fn order_nulls_last(&self, expr: &str, direction: SortDirection) -> String {
        format!("{expr} {} NULLS LAST", direction.as_sql())
    }
}

fn array_cast(element: ArrayType) -> &'static str {
    match element {
        ArrayType::Uuid => "uuid[]",
        ArrayType::Text => "text[]",
    }
}
