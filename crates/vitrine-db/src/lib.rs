//! # vitrine-db
//!
//! PostgreSQL query layer for the vitrine catalog search engine.
//!
//! This crate provides:
//! - Connection pool management
//! - The predicate composer (filter model to parameterized SQL)
//! - The search executor (count and page queries, attribute hydration)
//! - Facet aggregates (categories, brands, price ranges, attributes)
//! - Attribute- and category-overlap similarity
//! - Name autocomplete and exact attribute lookup
//!
//! ## Example
//!
//! ```rust,ignore
//! use vitrine_db::{Catalog, CatalogRepository, ProductSearchFilter, PageWindow};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = Catalog::connect("postgres://localhost/vitrine").await?;
//!
//!     let filter = ProductSearchFilter::new().with_query("wireless mouse");
//!     let page = catalog
//!         .search_page(&filter, filter.sort()?, filter.page_window(20))
//!         .await?;
//!
//!     println!("{} matches", page.total);
//!     Ok(())
//! }
//! ```
pub mod attributes;
pub mod composer;
pub mod dialect;
pub mod facets;
pub mod pool;
pub mod query_param;
pub mod rows;
pub mod search;
pub mod similarity;
pub mod suggestions;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use them
pub mod test_fixtures;

use async_trait::async_trait;
use uuid::Uuid;

// Re-export core types
pub use vitrine_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// Re-export implementations
pub use attributes::PgAttributeLookup;
pub use composer::{PredicateComposer, QueryFragments};
pub use dialect::{ArrayType, Postgres, SqlDialect};
pub use facets::{price_bucket_ranges, PgFacetComputer, PriceRange};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use query_param::{bind_params, QueryParam};
pub use search::PgProductSearch;
pub use similarity::PgSimilarityMatcher;
pub use suggestions::PgSuggestionProvider;

/// Combined catalog context with every read-side component.
#[derive(Clone)]
pub struct Catalog {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Filtered, paginated product search.
    pub search: PgProductSearch,
    /// Facet aggregates.
    pub facets: PgFacetComputer,
    /// Attribute and category overlap.
    pub similarity: PgSimilarityMatcher,
    /// Name autocomplete.
    pub suggestions: PgSuggestionProvider,
    /// Exact attribute lookup.
    pub attributes: PgAttributeLookup,
}

impl Catalog {
    /// Create a new Catalog from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            search: PgProductSearch::new(pool.clone()),
            facets: PgFacetComputer::new(pool.clone()),
            similarity: PgSimilarityMatcher::new(pool.clone()),
            suggestions: PgSuggestionProvider::new(pool.clone()),
            attributes: PgAttributeLookup::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Catalog by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::StoreUnavailable(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

#[async_trait]
impl CatalogRepository for Catalog {
    async fn search_page(
        &self,
        filter: &ProductSearchFilter,
        sort: SortSpec,
        window: PageWindow,
    ) -> Result<SearchPage> {
        log_pool_metrics(&self.pool);
        self.search.search(filter, sort, window).await
    }

    async fn facets(&self, top_n: i64) -> Result<Facets> {
        self.facets.compute(top_n).await
    }

    async fn suggestions(&self, prefix: &str, limit: i64) -> Result<Vec<String>> {
        self.suggestions.suggest(prefix, limit).await
    }

    async fn similar(&self, product_id: Uuid, limit: i64) -> Result<Vec<Product>> {
        self.similarity.find_similar(product_id, limit).await
    }

    async fn related_by_category(&self, product_id: Uuid, limit: i64) -> Result<Vec<Product>> {
        self.similarity
            .find_related_by_category(product_id, limit)
            .await
    }

    async fn by_attribute(&self, attribute_code: &str, value: &str) -> Result<Vec<Product>> {
        self.attributes.find_by_attribute(attribute_code, value).await
    }
}
