//! Core traits for the catalog search engine.
//!
//! `CatalogRepository` is the store-facing seam: the database crate
//! implements it against PostgreSQL. `CatalogSearch` is the caller-facing
//! seam: the search crate implements it on top of any repository, adding
//! validation, limit clamping, and the facet decision.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::filter::{PageWindow, ProductSearchFilter, SortSpec};
use crate::models::*;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// One page of matches plus the total before pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    pub products: Vec<Product>,
    pub total: i64,
}

/// Read-side access to the product catalog.
///
/// Implementations never mutate the catalog. Store failures surface as
/// [`crate::Error::StoreUnavailable`] without retries.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Run the count and data queries for an already-validated filter.
    async fn search_page(
        &self,
        filter: &ProductSearchFilter,
        sort: SortSpec,
        window: PageWindow,
    ) -> Result<SearchPage>;

    /// Compute all facet families over the eligible catalog.
    async fn facets(&self, top_n: i64) -> Result<Facets>;

    /// Distinct product names starting with `prefix` (case-insensitive).
    async fn suggestions(&self, prefix: &str, limit: i64) -> Result<Vec<String>>;

    /// Products sharing the most (attribute, value) pairs with `product_id`.
    async fn similar(&self, product_id: Uuid, limit: i64) -> Result<Vec<Product>>;

    /// Products sharing the most categories with `product_id`.
    async fn related_by_category(&self, product_id: Uuid, limit: i64) -> Result<Vec<Product>>;

    /// Eligible products whose attribute `attribute_code` equals `value`.
    async fn by_attribute(&self, attribute_code: &str, value: &str) -> Result<Vec<Product>>;
}

// =============================================================================
// SEARCH TRAITS
// =============================================================================

/// The exposed catalog search operations.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Filtered, sorted, paginated search with optional facets.
    async fn search(&self, filter: ProductSearchFilter) -> Result<ProductSearchResponse>;

    /// Autocomplete product names.
    async fn get_suggestions(&self, prefix: &str, limit: Option<i64>) -> Result<Vec<String>>;

    /// Products similar to `product_id` by shared attribute values.
    async fn find_similar(&self, product_id: Uuid, limit: Option<i64>) -> Result<Vec<Product>>;

    /// Products with the given attribute value.
    async fn find_by_attribute(&self, attribute_code: &str, value: &str) -> Result<Vec<Product>>;

    /// Products related to `product_id` through shared categories.
    async fn find_related_by_category(
        &self,
        product_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Product>>;
}
