//! Catalog search engine.
//!
//! Wraps a [`CatalogRepository`] with request validation, limit handling,
//! and the decision of whether a search response carries facets.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use vitrine_core::{
    total_pages, CatalogRepository, CatalogSearch, Error, Product, ProductSearchFilter,
    ProductSearchResponse, Result,
};
use vitrine_db::Catalog;

use crate::config::{FacetMode, SearchConfig};

/// Search engine over any catalog repository.
///
/// The PostgreSQL-backed engine is `CatalogSearchEngine<Catalog>`; tests
/// substitute an in-memory repository.
#[derive(Clone)]
pub struct CatalogSearchEngine<R = Catalog> {
    repository: R,
    config: SearchConfig,
}

impl<R: CatalogRepository> CatalogSearchEngine<R> {
    /// Create an engine with default configuration.
    pub fn new(repository: R) -> Self {
        Self::with_config(repository, SearchConfig::default())
    }

    pub fn with_config(repository: R, config: SearchConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Whether a search with this filter should carry facets.
    ///
    /// An explicit `include_facets` on the request wins over the configured
    /// mode. In `Auto` mode facets accompany any narrowed search and are
    /// skipped for a bare catalog listing.
    pub fn wants_facets(&self, filter: &ProductSearchFilter) -> bool {
        let mode = match filter.include_facets {
            Some(true) => FacetMode::Always,
            Some(false) => FacetMode::Never,
            None => self.config.facet_mode,
        };
        match mode {
            FacetMode::Always => true,
            FacetMode::Never => false,
            FacetMode::Auto => filter.has_refinements(),
        }
    }

    /// Resolve a suggestion or similarity limit.
    ///
    /// Missing limits take `default`; limits above the configured maximum are
    /// clamped. Non-positive limits are rejected.
    fn auxiliary_limit(&self, requested: Option<i64>, default: i64) -> Result<i64> {
        let max = self.config.auxiliary_max_limit;
        match requested {
            None => Ok(default.min(max)),
            Some(limit) if limit < 1 => Err(Error::invalid(format!(
                "limit must be positive, got {limit}"
            ))),
            Some(limit) if limit > max => {
                warn!(requested = limit, max, "Limit clamped");
                Ok(max)
            }
            Some(limit) => Ok(limit),
        }
    }
}

#[async_trait]
impl<R: CatalogRepository> CatalogSearch for CatalogSearchEngine<R> {
    #[instrument(
        skip(self, filter),
        fields(subsystem = "search", component = "engine", op = "search", query = filter.text_query().unwrap_or(""))
    )]
    async fn search(&self, filter: ProductSearchFilter) -> Result<ProductSearchResponse> {
        let start = Instant::now();
        filter.validate(self.config.max_limit)?;
        let sort = filter.sort()?;
        let window = filter.page_window(self.config.default_limit);
        let with_facets = self.wants_facets(&filter);

        debug!(
            sort_field = %sort.field,
            sort_direction = sort.direction.as_sql(),
            page = window.page,
            limit = window.limit,
            offset = window.offset,
            facets_computed = with_facets,
            "Search resolved"
        );

        let fetched = if with_facets {
            tokio::try_join!(
                self.repository.search_page(&filter, sort, window),
                self.repository.facets(self.config.facet_top_n),
            )
            .map(|(page, facets)| (page, Some(facets)))
        } else {
            self.repository
                .search_page(&filter, sort, window)
                .await
                .map(|page| (page, None))
        };
        let (page, facets) = fetched.inspect_err(|e| {
            error!(
                error = %e,
                duration_ms = start.elapsed().as_millis() as u64,
                "Search failed"
            )
        })?;

        info!(
            result_count = page.products.len(),
            total = page.total,
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );

        Ok(ProductSearchResponse {
            total_pages: total_pages(page.total, window.limit),
            products: page.products,
            total: page.total,
            page: window.page,
            limit: window.limit,
            facets,
        })
    }

    #[instrument(skip(self), fields(subsystem = "search", component = "engine", op = "get_suggestions"))]
    async fn get_suggestions(&self, prefix: &str, limit: Option<i64>) -> Result<Vec<String>> {
        let limit = self.auxiliary_limit(limit, self.config.suggestion_limit)?;
        if prefix.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.suggestions(prefix, limit).await
    }

    #[instrument(skip(self), fields(subsystem = "search", component = "engine", op = "find_similar"))]
    async fn find_similar(&self, product_id: Uuid, limit: Option<i64>) -> Result<Vec<Product>> {
        let limit = self.auxiliary_limit(limit, self.config.similar_limit)?;
        self.repository.similar(product_id, limit).await
    }

    #[instrument(skip(self), fields(subsystem = "search", component = "engine", op = "find_by_attribute"))]
    async fn find_by_attribute(&self, attribute_code: &str, value: &str) -> Result<Vec<Product>> {
        let code = attribute_code.trim();
        if code.is_empty() {
            return Err(Error::invalid("attribute code must not be blank"));
        }
        self.repository.by_attribute(code, value).await
    }

    #[instrument(skip(self), fields(subsystem = "search", component = "engine", op = "find_related_by_category"))]
    async fn find_related_by_category(
        &self,
        product_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Product>> {
        let limit = self.auxiliary_limit(limit, self.config.similar_limit)?;
        self.repository.related_by_category(product_id, limit).await
    }
}
