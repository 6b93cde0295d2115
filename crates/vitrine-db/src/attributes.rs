//! Attribute lookup: products carrying an exact attribute value.

use std::time::Instant;

use sqlx::{Pool, Postgres};
use tracing::{info, instrument};

use vitrine_core::{Product, Result};

use crate::rows::{products_from_rows, PRODUCT_COLUMNS, STOREFRONT_ELIGIBLE};

/// Exact attribute-value lookup over PostgreSQL.
#[derive(Clone)]
pub struct PgAttributeLookup {
    pool: Pool<Postgres>,
}

impl PgAttributeLookup {
    /// Create a new PgAttributeLookup with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Searchable products whose attribute `attribute_code` has exactly
    /// `value`, best rated first.
    ///
    /// An unknown attribute code matches nothing.
    #[instrument(skip(self), fields(subsystem = "database", component = "attributes", op = "find_by_attribute"))]
    pub async fn find_by_attribute(&self, attribute_code: &str, value: &str) -> Result<Vec<Product>> {
        let start = Instant::now();
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             JOIN attribute_value_map pav ON pav.product_id = p.id
             JOIN attributes a ON a.id = pav.attribute_id
             WHERE a.code = $1
               AND pav.value = $2
               AND {STOREFRONT_ELIGIBLE}
             ORDER BY p.rating DESC NULLS LAST, p.name ASC, p.id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(attribute_code)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        let products = products_from_rows(&rows)?;

        info!(
            attribute_code,
            result_count = products.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Attribute lookup complete"
        );
        Ok(products)
    }
}
