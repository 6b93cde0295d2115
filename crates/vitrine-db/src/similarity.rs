//! Similarity matcher: products that overlap with a source product.
//!
//! Both rankings are fully deterministic; ties fall back to product id.

use std::time::Instant;

use sqlx::{Pool, Postgres, Row};
use tracing::{info, instrument, trace};
use uuid::Uuid;

use vitrine_core::{Product, Result};

use crate::rows::{product_from_row, PRODUCT_COLUMNS, STOREFRONT_ELIGIBLE};

/// Attribute- and category-overlap matcher over PostgreSQL.
#[derive(Clone)]
pub struct PgSimilarityMatcher {
    pool: Pool<Postgres>,
}

impl PgSimilarityMatcher {
    /// Create a new PgSimilarityMatcher with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Products sharing the most (attribute, value) pairs with `product_id`.
    ///
    /// Ranked by shared pair count, then rating (nulls last), then id. The
    /// source product is never included. A product without attribute values
    /// has no similar products.
    #[instrument(skip(self), fields(subsystem = "database", component = "similarity", op = "find_similar"))]
    pub async fn find_similar(&self, product_id: Uuid, limit: i64) -> Result<Vec<Product>> {
        let start = Instant::now();
        let sql = format!(
            "WITH source AS (
                 SELECT attribute_id, value FROM attribute_value_map WHERE product_id = $1
             )
             SELECT {PRODUCT_COLUMNS}, COUNT(*) AS shared
             FROM attribute_value_map pav
             JOIN source s ON s.attribute_id = pav.attribute_id AND s.value = pav.value
             JOIN products p ON p.id = pav.product_id
             WHERE pav.product_id <> $1
               AND p.deleted_at IS NULL
               AND p.status = 'active'
             GROUP BY p.id
             ORDER BY shared DESC, p.rating DESC NULLS LAST, p.id ASC
             LIMIT $2"
        );

        let products: Vec<Product> = self
            .ranked(&sql, product_id, limit)
            .await?
            .into_iter()
            .map(|(mut product, shared)| {
                product.shared_attributes = Some(shared);
                product
            })
            .collect();

        info!(
            result_count = products.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Similar products found"
        );
        Ok(products)
    }

    /// Searchable products sharing the most categories with `product_id`.
    ///
    /// Ranked by shared category count, then rating (nulls last), then id.
    #[instrument(skip(self), fields(subsystem = "database", component = "similarity", op = "find_related_by_category"))]
    pub async fn find_related_by_category(
        &self,
        product_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Product>> {
        let start = Instant::now();
        let sql = format!(
            "WITH source AS (
                 SELECT category_id FROM product_category_map WHERE product_id = $1
             )
             SELECT {PRODUCT_COLUMNS}, COUNT(*) AS shared
             FROM product_category_map pcm
             JOIN source s ON s.category_id = pcm.category_id
             JOIN products p ON p.id = pcm.product_id
             WHERE pcm.product_id <> $1
               AND {STOREFRONT_ELIGIBLE}
             GROUP BY p.id
             ORDER BY shared DESC, p.rating DESC NULLS LAST, p.id ASC
             LIMIT $2"
        );

        let products: Vec<Product> = self
            .ranked(&sql, product_id, limit)
            .await?
            .into_iter()
            .map(|(product, _)| product)
            .collect();

        info!(
            result_count = products.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Related products found"
        );
        Ok(products)
    }

    /// Run a ranking query, pairing each product with its `shared` count.
    async fn ranked(&self, sql: &str, product_id: Uuid, limit: i64) -> Result<Vec<(Product, i64)>> {
        let rows = sqlx::query(sql)
            .bind(product_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        let mut ranked = Vec::with_capacity(rows.len());
        for row in &rows {
            let product = product_from_row(row)?;
            let shared: i64 = row.try_get("shared")?;
            trace!(product_id = %product.id, shared, "Candidate ranked");
            ranked.push((product, shared));
        }
        Ok(ranked)
    }
}
