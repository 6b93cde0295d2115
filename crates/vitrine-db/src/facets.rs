//! Facet computer: aggregate counts that describe the eligible catalog.
//!
//! Every family is computed over active, searchable, non-deleted products.
//! The applied search filters do not narrow facets; they show the full
//! breadth of refinements available.

use std::time::Instant;

use futures::future::try_join_all;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use vitrine_core::defaults::PRICE_BUCKET_COUNT;
use vitrine_core::{
    AttributeFacet, AttributeFacetValue, FacetBucket, Facets, PriceRangeBucket, Result,
};

use crate::rows::STOREFRONT_ELIGIBLE as ELIGIBLE;

/// Facet computer over PostgreSQL.
#[derive(Clone)]
pub struct PgFacetComputer {
    pool: Pool<Postgres>,
}

impl PgFacetComputer {
    /// Create a new PgFacetComputer with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Compute all four facet families concurrently.
    #[instrument(skip(self), fields(subsystem = "database", component = "facets", op = "compute"))]
    pub async fn compute(&self, top_n: i64) -> Result<Facets> {
        let start = Instant::now();
        let (categories, brands, price_ranges, attributes) = tokio::try_join!(
            self.categories(top_n),
            self.brands(top_n),
            self.price_ranges(),
            self.attributes(),
        )?;

        info!(
            categories = categories.len(),
            brands = brands.len(),
            price_ranges = price_ranges.len(),
            attributes = attributes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Facets computed"
        );

        Ok(Facets {
            categories,
            brands,
            price_ranges,
            attributes,
        })
    }

    /// Top categories by eligible product count.
    pub async fn categories(&self, top_n: i64) -> Result<Vec<FacetBucket>> {
        let sql = format!(
            "SELECT c.id, c.name, COUNT(DISTINCT p.id) AS count
             FROM categories c
             JOIN product_category_map pcm ON pcm.category_id = c.id
             JOIN products p ON p.id = pcm.product_id
             WHERE {ELIGIBLE}
             GROUP BY c.id, c.name
             ORDER BY count DESC, c.name ASC, c.id ASC
             LIMIT $1"
        );
        let buckets = self.named_buckets(&sql, top_n).await?;
        debug!(facet_family = "categories", result_count = buckets.len(), "Facet family done");
        Ok(buckets)
    }

    /// Top brands by eligible product count.
    pub async fn brands(&self, top_n: i64) -> Result<Vec<FacetBucket>> {
        let sql = format!(
            "SELECT b.id, b.name, COUNT(DISTINCT p.id) AS count
             FROM brands b
             JOIN products p ON p.brand_id = b.id
             WHERE {ELIGIBLE}
             GROUP BY b.id, b.name
             ORDER BY count DESC, b.name ASC, b.id ASC
             LIMIT $1"
        );
        let buckets = self.named_buckets(&sql, top_n).await?;
        debug!(facet_family = "brands", result_count = buckets.len(), "Facet family done");
        Ok(buckets)
    }

    async fn named_buckets(&self, sql: &str, top_n: i64) -> Result<Vec<FacetBucket>> {
        let rows = sqlx::query(sql).bind(top_n).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<FacetBucket> {
                Ok(FacetBucket {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    count: row.try_get("count")?,
                })
            })
            .collect()
    }

    /// Equal-width price buckets over the live price range.
    ///
    /// One count query per bucket, issued concurrently. Empty buckets are
    /// dropped.
    pub async fn price_ranges(&self) -> Result<Vec<PriceRangeBucket>> {
        let row = sqlx::query(&format!(
            "SELECT MIN(p.price)::float8 AS min_price, MAX(p.price)::float8 AS max_price
             FROM products p WHERE {ELIGIBLE}"
        ))
        .fetch_one(&self.pool)
        .await?;

        let min: Option<f64> = row.try_get("min_price")?;
        let max: Option<f64> = row.try_get("max_price")?;
        let (Some(min), Some(max)) = (min, max) else {
            debug!(facet_family = "price_ranges", "No eligible products, no price buckets");
            return Ok(Vec::new());
        };

        let ranges = price_bucket_ranges(min, max, PRICE_BUCKET_COUNT);
        let counts = try_join_all(ranges.iter().map(|range| self.count_in_range(range))).await?;

        let buckets: Vec<PriceRangeBucket> = ranges
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(range, count)| PriceRangeBucket {
                min: range.min,
                max: range.max,
                count,
            })
            .collect();

        debug!(
            facet_family = "price_ranges",
            min_price = min,
            max_price = max,
            result_count = buckets.len(),
            "Facet family done"
        );
        Ok(buckets)
    }

    async fn count_in_range(&self, range: &PriceRange) -> Result<i64> {
        let upper = if range.inclusive_max { "<=" } else { "<" };
        let sql = format!(
            "SELECT COUNT(*) FROM products p
             WHERE {ELIGIBLE} AND p.price >= $1 AND p.price {upper} $2"
        );
        let row = sqlx::query(&sql)
            .bind(range.min)
            .bind(range.max)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get(0)?)
    }

    /// Value counts for every filterable attribute.
    pub async fn attributes(&self) -> Result<Vec<AttributeFacet>> {
        let sql = format!(
            "SELECT a.id AS attribute_id, a.code, a.name, a.position, pav.value,
                    COALESCE(av.display_value, pav.value) AS label,
                    COUNT(DISTINCT p.id) AS count
             FROM attributes a
             JOIN attribute_value_map pav ON pav.attribute_id = a.id
             JOIN products p ON p.id = pav.product_id
             LEFT JOIN attribute_values av ON av.attribute_id = a.id AND av.value = pav.value
             WHERE a.is_filterable AND {ELIGIBLE}
             GROUP BY a.id, a.code, a.name, a.position, pav.value, av.display_value
             ORDER BY a.position ASC, a.code ASC, count DESC, pav.value ASC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut flat = Vec::with_capacity(rows.len());
        for row in &rows {
            flat.push(AttributeFacetRow {
                attribute_id: row.try_get("attribute_id")?,
                code: row.try_get("code")?,
                name: row.try_get("name")?,
                position: row.try_get("position")?,
                value: AttributeFacetValue {
                    value: row.try_get("value")?,
                    label: row.try_get("label")?,
                    count: row.try_get("count")?,
                },
            });
        }

        let facets = group_attribute_rows(flat);
        debug!(facet_family = "attributes", result_count = facets.len(), "Facet family done");
        Ok(facets)
    }
}

/// A half-open price interval; the highest one is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub inclusive_max: bool,
}

/// Split `[min, max]` into `count` equal-width ranges.
///
/// Boundaries are rounded to cents and shared between neighbours, so every
/// price falls in exactly one range. A degenerate range (`min == max`) yields
/// a single closed range.
pub fn price_bucket_ranges(min: f64, max: f64, count: usize) -> Vec<PriceRange> {
    if count == 0 || max < min {
        return Vec::new();
    }
    if max == min || count == 1 {
        return vec![PriceRange {
            min,
            max,
            inclusive_max: true,
        }];
    }

    let width = (max - min) / count as f64;
    let boundary = |i: usize| match i {
        0 => min,
        i if i == count => max,
        i => round_cents(min + width * i as f64),
    };

    (0..count)
        .map(|i| PriceRange {
            min: boundary(i),
            max: boundary(i + 1),
            inclusive_max: i + 1 == count,
        })
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One (attribute, value) count row, before grouping.
#[derive(Debug, Clone)]
struct AttributeFacetRow {
    attribute_id: Uuid,
    code: String,
    name: String,
    position: i32,
    value: AttributeFacetValue,
}

/// Group rows already ordered by attribute into one facet per attribute.
fn group_attribute_rows(rows: Vec<AttributeFacetRow>) -> Vec<AttributeFacet> {
    let mut facets: Vec<AttributeFacet> = Vec::new();
    for row in rows {
        match facets.last_mut() {
            Some(facet) if facet.attribute_id == row.attribute_id => facet.values.push(row.value),
            _ => facets.push(AttributeFacet {
                attribute_id: row.attribute_id,
                code: row.code,
                name: row.name,
                position: row.position,
                values: vec![row.value],
            }),
        }
    }
    facets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_equal_buckets() {
        let ranges = price_bucket_ranges(0.0, 100.0, 5);
        assert_eq!(ranges.len(), 5);
        assert_eq!(ranges[0].min, 0.0);
        assert_eq!(ranges[0].max, 20.0);
        assert_eq!(ranges[4].min, 80.0);
        assert_eq!(ranges[4].max, 100.0);
        assert!(ranges[4].inclusive_max);
        assert!(ranges[..4].iter().all(|r| !r.inclusive_max));
    }

    #[test]
    fn test_buckets_are_contiguous() {
        let ranges = price_bucket_ranges(9.99, 1234.57, 5);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].max, pair[1].min);
        }
        assert_eq!(ranges.first().unwrap().min, 9.99);
        assert_eq!(ranges.last().unwrap().max, 1234.57);
    }

    #[test]
    fn test_boundaries_rounded_to_cents() {
        let ranges = price_bucket_ranges(0.0, 10.0, 3);
        assert_eq!(ranges[0].max, 3.33);
        assert_eq!(ranges[1].max, 6.67);
    }

    #[test]
    fn test_degenerate_range_is_single_closed_bucket() {
        let ranges = price_bucket_ranges(42.0, 42.0, 5);
        assert_eq!(
            ranges,
            vec![PriceRange {
                min: 42.0,
                max: 42.0,
                inclusive_max: true
            }]
        );
    }

    #[test]
    fn test_inverted_or_empty_range() {
        assert!(price_bucket_ranges(10.0, 5.0, 5).is_empty());
        assert!(price_bucket_ranges(0.0, 10.0, 0).is_empty());
    }

    fn row(attribute_id: Uuid, code: &str, value: &str, count: i64) -> AttributeFacetRow {
        AttributeFacetRow {
            attribute_id,
            code: code.to_string(),
            name: code.to_uppercase(),
            position: 0,
            value: AttributeFacetValue {
                value: value.to_string(),
                label: value.to_string(),
                count,
            },
        }
    }

    #[test]
    fn test_group_attribute_rows_preserves_order() {
        let color = Uuid::new_v4();
        let size = Uuid::new_v4();
        let facets = group_attribute_rows(vec![
            row(color, "color", "black", 5),
            row(color, "color", "white", 2),
            row(size, "size", "m", 3),
        ]);

        assert_eq!(facets.len(), 2);
        assert_eq!(facets[0].code, "color");
        assert_eq!(
            facets[0]
                .values
                .iter()
                .map(|v| v.count)
                .collect::<Vec<_>>(),
            vec![5, 2]
        );
        assert_eq!(facets[1].values.len(), 1);
    }

    #[test]
    fn test_group_attribute_rows_empty() {
        assert!(group_attribute_rows(Vec::new()).is_empty());
    }
}
