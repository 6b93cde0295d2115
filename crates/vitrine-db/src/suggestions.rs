//! Suggestion provider: prefix autocomplete over product names.

use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument};

use vitrine_core::Result;

use crate::escape_like;
use crate::rows::STOREFRONT_ELIGIBLE;

/// Name autocomplete over PostgreSQL.
#[derive(Clone)]
pub struct PgSuggestionProvider {
    pool: Pool<Postgres>,
}

impl PgSuggestionProvider {
    /// Create a new PgSuggestionProvider with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Distinct names of searchable products starting with `prefix`,
    /// case-insensitively, in alphabetical order.
    ///
    /// A blank prefix suggests nothing and does not touch the store.
    #[instrument(skip(self), fields(subsystem = "database", component = "suggestions", op = "get_suggestions"))]
    pub async fn suggest(&self, prefix: &str, limit: i64) -> Result<Vec<String>> {
        let prefix = prefix.trim();
        if prefix.is_empty() || limit < 1 {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT DISTINCT p.name
             FROM products p
             WHERE {STOREFRONT_ELIGIBLE}
               AND lower(p.name) LIKE lower($1)
             ORDER BY p.name ASC
             LIMIT $2"
        );
        let rows = sqlx::query(&sql)
            .bind(format!("{}%", escape_like(prefix)))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let names = rows
            .iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(result_count = names.len(), "Suggestions resolved");
        Ok(names)
    }
}
