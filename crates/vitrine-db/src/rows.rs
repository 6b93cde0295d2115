//! Row mapping for product queries.

use sqlx::postgres::PgRow;
use sqlx::Row;

use vitrine_core::{Product, ProductStatus, ProductVisibility};

/// Product columns selected by every product-returning query.
///
/// Monetary and rating columns are NUMERIC in the store and read as `f64`.
pub const PRODUCT_COLUMNS: &str = "p.id, p.name, p.sku, p.slug, p.short_description, \
     p.price::float8 AS price, p.status, p.visibility, p.brand_id, p.product_type_id, \
     p.is_featured, p.is_new, p.is_bestseller, p.has_variants, p.stock_quantity, \
     p.rating::float8 AS rating, p.review_count, p.created_at, p.updated_at";

/// Customer-facing eligibility over `products p`: not deleted, active, and
/// visible to search.
pub const STOREFRONT_ELIGIBLE: &str = "p.deleted_at IS NULL AND p.status = 'active' \
     AND p.visibility IN ('visible', 'search_only')";

/// Map a row selected with [`PRODUCT_COLUMNS`] to a [`Product`].
pub fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let visibility: String = row.try_get("visibility")?;

    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        sku: row.try_get("sku")?,
        slug: row.try_get("slug")?,
        short_description: row.try_get("short_description")?,
        price: row.try_get("price")?,
        status: decode_enum::<ProductStatus>("status", &status)?,
        visibility: decode_enum::<ProductVisibility>("visibility", &visibility)?,
        brand_id: row.try_get("brand_id")?,
        product_type_id: row.try_get("product_type_id")?,
        is_featured: row.try_get("is_featured")?,
        is_new: row.try_get("is_new")?,
        is_bestseller: row.try_get("is_bestseller")?,
        has_variants: row.try_get("has_variants")?,
        stock_quantity: row.try_get("stock_quantity")?,
        rating: row.try_get("rating")?,
        review_count: row.try_get("review_count")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        attributes: None,
        shared_attributes: None,
    })
}

/// Map every row, failing on the first undecodable one.
pub fn products_from_rows(rows: &[PgRow]) -> Result<Vec<Product>, sqlx::Error> {
    rows.iter().map(product_from_row).collect()
}

/// Parse a TEXT enum column, reporting bad values as a column decode error.
fn decode_enum<T>(column: &str, raw: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr<Err = vitrine_core::Error>,
{
    raw.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
