//! Fluent request builder for library callers.

use uuid::Uuid;

use vitrine_core::{
    AttributeFilter, AttributeOperator, CatalogSearch, Operand, ProductSearchFilter,
    ProductSearchResponse, Result, SearchScope, SortDirection, SortField,
};

/// Builder for a product search.
///
/// ```ignore
/// let response = SearchRequest::new("wireless mouse")
///     .in_category(electronics)
///     .price_between(10.0, 50.0)
///     .attribute_eq("color", "black")
///     .sort(SortField::Price, SortDirection::Asc)
///     .page(2, 24)
///     .execute(&engine)
///     .await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    filter: ProductSearchFilter,
}

impl SearchRequest {
    /// Start a text search.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            filter: ProductSearchFilter::new().with_query(query),
        }
    }

    /// Start a plain catalog listing.
    pub fn listing() -> Self {
        Self::default()
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.filter = self.filter.with_category(category_id);
        self
    }

    pub fn in_categories(mut self, category_ids: Vec<Uuid>) -> Self {
        self.filter = self.filter.with_categories(category_ids);
        self
    }

    pub fn brand(mut self, brand_id: Uuid) -> Self {
        self.filter = self.filter.with_brand(brand_id);
        self
    }

    pub fn brands(mut self, brand_ids: Vec<Uuid>) -> Self {
        self.filter = self.filter.with_brands(brand_ids);
        self
    }

    pub fn min_price(mut self, min: f64) -> Self {
        let max = self.filter.max_price;
        self.filter = self.filter.with_price_range(Some(min), max);
        self
    }

    pub fn max_price(mut self, max: f64) -> Self {
        let min = self.filter.min_price;
        self.filter = self.filter.with_price_range(min, Some(max));
        self
    }

    pub fn price_between(mut self, min: f64, max: f64) -> Self {
        self.filter = self.filter.with_price_range(Some(min), Some(max));
        self
    }

    pub fn in_stock(mut self) -> Self {
        self.filter = self.filter.in_stock(true);
        self
    }

    pub fn featured(mut self) -> Self {
        self.filter = self.filter.featured(true);
        self
    }

    /// Add an arbitrary attribute filter.
    pub fn attribute(mut self, filter: AttributeFilter) -> Self {
        self.filter = self.filter.with_attribute(filter);
        self
    }

    /// Require attribute `code` to equal `value`.
    pub fn attribute_eq(self, code: &str, value: impl Into<Operand>) -> Self {
        self.attribute(AttributeFilter::by_code(code, AttributeOperator::Eq).value(value))
    }

    /// Require attribute `code` to fall within `min..=max` numerically.
    pub fn attribute_between(self, code: &str, min: f64, max: f64) -> Self {
        self.attribute(
            AttributeFilter::by_code(code, AttributeOperator::Between)
                .min_value(min)
                .max_value(max),
        )
    }

    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.filter = self.filter.with_sort(field, direction);
        self
    }

    /// Request a 1-based page of `limit` products.
    pub fn page(mut self, page: i64, limit: i64) -> Self {
        self.filter = self.filter.with_page(page, limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.filter = self.filter.with_offset(offset);
        self
    }

    /// Search the unrestricted catalog (back-office callers).
    pub fn admin(mut self) -> Self {
        self.filter = self.filter.with_scope(SearchScope::Admin);
        self
    }

    pub fn with_facets(mut self, include: bool) -> Self {
        self.filter = self.filter.with_facets(include);
        self
    }

    /// Hydrate each product's attribute map.
    pub fn with_attributes(mut self) -> Self {
        self.filter = self.filter.with_attributes(true);
        self
    }

    /// The filter this request has built so far.
    pub fn filter(&self) -> &ProductSearchFilter {
        &self.filter
    }

    pub fn into_filter(self) -> ProductSearchFilter {
        self.filter
    }

    /// Run the search.
    pub async fn execute<S: CatalogSearch + ?Sized>(
        self,
        engine: &S,
    ) -> Result<ProductSearchResponse> {
        engine.search(self.filter).await
    }
}

impl From<SearchRequest> for ProductSearchFilter {
    fn from(request: SearchRequest) -> Self {
        request.filter
    }
}
