//! Product search filter model.
//!
//! `ProductSearchFilter` is the typed description of a search request. Every
//! field is optional; an absent field places no constraint on its dimension.
//!
//! Attribute filters are deliberately forgiving: an operator whose operand is
//! missing (for example `between` with only `minValue`) resolves to no
//! predicate at all, exactly as if the filter had not been supplied. Only
//! structural problems with the request itself (negative limit, unknown sort
//! key) are reported, as [`Error::InvalidArgument`].
//!
//! # Example
//!
//! ```
//! use vitrine_core::{AttributeFilter, AttributeOperator, ProductSearchFilter};
//!
//! let filter = ProductSearchFilter::new()
//!     .with_query("wireless mouse")
//!     .with_price_range(Some(10.0), Some(80.0))
//!     .with_attribute(AttributeFilter::by_code("color", AttributeOperator::Eq).value("black"));
//!
//! assert!(filter.has_refinements());
//! assert!(filter.validate(100).is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::{MAX_ATTRIBUTE_FILTERS, MAX_FILTER_ELEMENTS, PAGE_FIRST};
use crate::error::{Error, Result};
use crate::models::{ProductStatus, ProductVisibility};

// =============================================================================
// SEARCH SCOPE
// =============================================================================

/// Who is searching.
///
/// Storefront searches only see active, searchable products unless the
/// filter names a status or visibility explicitly. Admin searches apply
/// status and visibility only when given. Soft-deleted products are never
/// returned in either scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    Storefront,
    Admin,
}

// =============================================================================
// SORTING
// =============================================================================

/// Sort key for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
    CreatedAt,
    /// Review count, then rating.
    Popularity,
    /// Rating, nulls last regardless of direction.
    Rating,
    /// Exact name, substring name, exact sku, then everything else.
    Relevance,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::CreatedAt => "createdAt",
            Self::Popularity => "popularity",
            Self::Rating => "rating",
            Self::Relevance => "relevance",
        }
    }

    /// Direction used when the request names a field but no direction.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            Self::Name | Self::Price | Self::Relevance => SortDirection::Asc,
            Self::CreatedAt | Self::Popularity | Self::Rating => SortDirection::Desc,
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "createdAt" | "created_at" | "newest" => Ok(Self::CreatedAt),
            "popularity" => Ok(Self::Popularity),
            "rating" => Ok(Self::Rating),
            "relevance" => Ok(Self::Relevance),
            other => Err(Error::invalid(format!("unknown sort key: {other}"))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::invalid(format!("unknown sort direction: {other}"))),
        }
    }
}

/// A resolved sort: field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

// =============================================================================
// ATTRIBUTE FILTERS
// =============================================================================

/// Comparison operator of an attribute filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeOperator {
    #[default]
    Eq,
    Neq,
    In,
    Nin,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    Like,
}

/// An attribute filter operand as it arrives from JSON: string, number, or
/// boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Operand {
    /// Stored-text form, used for exact and substring matching.
    pub fn as_text(&self) -> String {
        match self {
            Operand::Text(s) => s.clone(),
            Operand::Bool(b) => b.to_string(),
            Operand::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Operand::Number(n) => n.to_string(),
        }
    }

    /// Numeric form, used for range comparisons.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Number(n) if n.is_finite() => Some(*n),
            Operand::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Text(s.to_string())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::Text(s)
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Operand::Number(n)
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Number(n as f64)
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

/// How an attribute filter names its attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeRef {
    Id(Uuid),
    Code(String),
}

/// A store-independent comparison against an attribute's stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Equals(String),
    NotEquals(String),
    In(Vec<String>),
    NotIn(Vec<String>),
    GreaterThan(f64),
    GreaterOrEqual(f64),
    LessThan(f64),
    LessOrEqual(f64),
    /// Inclusive on both ends.
    Between(f64, f64),
    /// Case-insensitive substring match.
    Contains(String),
}

impl Comparison {
    /// Whether the stored value must be coerced to a number.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Comparison::GreaterThan(_)
                | Comparison::GreaterOrEqual(_)
                | Comparison::LessThan(_)
                | Comparison::LessOrEqual(_)
                | Comparison::Between(_, _)
        )
    }
}

/// A fully-resolved attribute predicate, ready for SQL generation.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePredicate {
    pub attribute: AttributeRef,
    pub comparison: Comparison,
}

/// One attribute filter of a search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_id: Option<Uuid>,
    #[serde(
        default,
        alias = "code",
        alias = "attributeCode",
        rename = "attributeCode",
        skip_serializing_if = "Option::is_none"
    )]
    pub attribute_code: Option<String>,
    #[serde(default)]
    pub operator: AttributeOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Operand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Operand>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Operand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Operand>,
}

impl AttributeFilter {
    /// Filter on the attribute with the given id.
    pub fn by_id(attribute_id: Uuid, operator: AttributeOperator) -> Self {
        Self {
            attribute_id: Some(attribute_id),
            operator,
            ..Default::default()
        }
    }

    /// Filter on the attribute with the given code.
    pub fn by_code(code: impl Into<String>, operator: AttributeOperator) -> Self {
        Self {
            attribute_code: Some(code.into()),
            operator,
            ..Default::default()
        }
    }

    /// Set the single-value operand.
    pub fn value(mut self, value: impl Into<Operand>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the list operand.
    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the lower bound.
    pub fn min_value(mut self, value: impl Into<Operand>) -> Self {
        self.min_value = Some(value.into());
        self
    }

    /// Set the upper bound.
    pub fn max_value(mut self, value: impl Into<Operand>) -> Self {
        self.max_value = Some(value.into());
        self
    }

    /// The attribute this filter targets. An id wins over a code.
    pub fn attribute_ref(&self) -> Option<AttributeRef> {
        if let Some(id) = self.attribute_id {
            return Some(AttributeRef::Id(id));
        }
        self.attribute_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| AttributeRef::Code(c.to_string()))
    }

    /// Resolve this filter into a predicate.
    ///
    /// Returns `None` when the operand the operator needs is missing, empty,
    /// or (for range operators) not numeric. A `None` filter constrains
    /// nothing.
    pub fn predicate(&self) -> Option<AttributePredicate> {
        let attribute = self.attribute_ref()?;
        let text = |op: &Option<Operand>| op.as_ref().map(Operand::as_text);
        let number = |op: &Option<Operand>| op.as_ref().and_then(Operand::as_number);
        let list = || {
            self.values
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(|v| v.iter().map(Operand::as_text).collect::<Vec<_>>())
        };

        let comparison = match self.operator {
            AttributeOperator::Eq => Comparison::Equals(text(&self.value)?),
            AttributeOperator::Neq => Comparison::NotEquals(text(&self.value)?),
            AttributeOperator::In => Comparison::In(list()?),
            AttributeOperator::Nin => Comparison::NotIn(list()?),
            AttributeOperator::Gt => Comparison::GreaterThan(number(&self.value)?),
            AttributeOperator::Gte => Comparison::GreaterOrEqual(number(&self.value)?),
            AttributeOperator::Lt => Comparison::LessThan(number(&self.value)?),
            AttributeOperator::Lte => Comparison::LessOrEqual(number(&self.value)?),
            AttributeOperator::Between => {
                Comparison::Between(number(&self.min_value)?, number(&self.max_value)?)
            }
            AttributeOperator::Like => {
                Comparison::Contains(text(&self.value).filter(|s| !s.is_empty())?)
            }
        };

        Some(AttributePredicate {
            attribute,
            comparison,
        })
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number reported back to the caller.
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

// =============================================================================
// PRODUCT SEARCH FILTER
// =============================================================================

/// Structured product search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSearchFilter {
    /// Free-text query matched against name, descriptions, sku, and slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<ProductVisibility>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bestseller: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_variants: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribute_filters: Vec<AttributeFilter>,

    /// Sort field: "name", "price", "createdAt", "popularity", "rating",
    /// "relevance".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort order: "asc" or "desc".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// Explicit row offset; takes precedence over `page`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    pub scope: SearchScope,

    /// Force facets on or off; `None` lets the engine decide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_facets: Option<bool>,

    /// Attach each product's typed attribute map to the results.
    pub include_attributes: bool,
}

impl ProductSearchFilter {
    /// Create an empty filter (matches every eligible product).
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // BUILDER METHODS
    // =========================================================================

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_categories(mut self, category_ids: Vec<Uuid>) -> Self {
        self.category_ids = Some(category_ids);
        self
    }

    pub fn with_brand(mut self, brand_id: Uuid) -> Self {
        self.brand_id = Some(brand_id);
        self
    }

    pub fn with_brands(mut self, brand_ids: Vec<Uuid>) -> Self {
        self.brand_ids = Some(brand_ids);
        self
    }

    pub fn with_product_type(mut self, product_type_id: Uuid) -> Self {
        self.product_type_id = Some(product_type_id);
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_visibility(mut self, visibility: ProductVisibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn featured(mut self, flag: bool) -> Self {
        self.is_featured = Some(flag);
        self
    }

    pub fn new_arrivals(mut self, flag: bool) -> Self {
        self.is_new = Some(flag);
        self
    }

    pub fn bestsellers(mut self, flag: bool) -> Self {
        self.is_bestseller = Some(flag);
        self
    }

    pub fn with_variants(mut self, flag: bool) -> Self {
        self.has_variants = Some(flag);
        self
    }

    pub fn in_stock(mut self, flag: bool) -> Self {
        self.in_stock = Some(flag);
        self
    }

    pub fn with_attribute(mut self, filter: AttributeFilter) -> Self {
        self.attribute_filters.push(filter);
        self
    }

    pub fn with_sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_by = Some(field.as_str().to_string());
        self.sort_order = Some(
            match direction {
                SortDirection::Asc => "asc",
                SortDirection::Desc => "desc",
            }
            .to_string(),
        );
        self
    }

    pub fn with_page(mut self, page: i64, limit: i64) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_facets(mut self, include: bool) -> Self {
        self.include_facets = Some(include);
        self
    }

    pub fn with_attributes(mut self, include: bool) -> Self {
        self.include_attributes = include;
        self
    }

    // =========================================================================
    // DERIVED VIEWS
    // =========================================================================

    /// The trimmed free-text query, if any.
    pub fn text_query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    /// Resolved attribute predicates, skipping no-op filters.
    pub fn attribute_predicates(&self) -> Vec<AttributePredicate> {
        self.attribute_filters
            .iter()
            .filter_map(AttributeFilter::predicate)
            .collect()
    }

    /// Whether any category constraint is present.
    pub fn has_category_constraint(&self) -> bool {
        self.category_id.is_some() || self.category_ids.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Whether the filter narrows the catalog beyond scope defaults.
    pub fn has_refinements(&self) -> bool {
        self.text_query().is_some()
            || self.has_category_constraint()
            || self.brand_id.is_some()
            || self.brand_ids.as_ref().is_some_and(|b| !b.is_empty())
            || self.product_type_id.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.is_featured.is_some()
            || self.is_new.is_some()
            || self.is_bestseller.is_some()
            || self.has_variants.is_some()
            || self.in_stock.is_some()
            || self.attribute_filters.iter().any(|f| f.predicate().is_some())
    }

    /// Resolve the requested sort.
    ///
    /// Without an explicit field, a text query sorts by relevance and a plain
    /// listing sorts by newest first.
    pub fn sort(&self) -> Result<SortSpec> {
        let field = match self.sort_by.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<SortField>()?,
            _ if self.text_query().is_some() => SortField::Relevance,
            _ => SortField::CreatedAt,
        };
        let direction = match self.sort_order.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<SortDirection>()?,
            _ => field.default_direction(),
        };
        Ok(SortSpec { field, direction })
    }

    /// Resolve the page window.
    ///
    /// An explicit `offset` takes precedence over `page`; the reported page is
    /// then the page that offset falls on.
    pub fn page_window(&self, default_limit: i64) -> PageWindow {
        let limit = self.limit.unwrap_or(default_limit);
        match self.offset {
            Some(offset) => PageWindow {
                page: if limit > 0 { offset / limit + 1 } else { PAGE_FIRST },
                limit,
                offset,
            },
            None => {
                let page = self.page.unwrap_or(PAGE_FIRST);
                PageWindow {
                    page,
                    limit,
                    offset: (page - 1).saturating_mul(limit),
                }
            }
        }
    }

    /// Check the request for structural problems.
    ///
    /// Individual attribute filters are never rejected here; incomplete ones
    /// are no-ops.
    pub fn validate(&self, max_limit: i64) -> Result<()> {
        if let Some(limit) = self.limit {
            if limit < 1 {
                return Err(Error::invalid(format!("limit must be positive, got {limit}")));
            }
            if limit > max_limit {
                return Err(Error::invalid(format!(
                    "limit must not exceed {max_limit}, got {limit}"
                )));
            }
        }
        if let Some(page) = self.page {
            if page < 1 {
                return Err(Error::invalid(format!("page must be at least 1, got {page}")));
            }
        }
        if let Some(offset) = self.offset {
            if offset < 0 {
                return Err(Error::invalid(format!(
                    "offset must not be negative, got {offset}"
                )));
            }
        }
        for (name, price) in [("minPrice", self.min_price), ("maxPrice", self.max_price)] {
            if let Some(p) = price {
                if !p.is_finite() || p < 0.0 {
                    return Err(Error::invalid(format!(
                        "{name} must be a non-negative number, got {p}"
                    )));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(Error::invalid(format!(
                    "minPrice ({min}) must not exceed maxPrice ({max})"
                )));
            }
        }
        if self.attribute_filters.len() > MAX_ATTRIBUTE_FILTERS {
            return Err(Error::invalid(format!(
                "at most {MAX_ATTRIBUTE_FILTERS} attribute filters are allowed"
            )));
        }
        let id_elements = self.category_ids.as_ref().map_or(0, Vec::len)
            + self.brand_ids.as_ref().map_or(0, Vec::len);
        if id_elements > MAX_FILTER_ELEMENTS {
            return Err(Error::invalid(format!(
                "at most {MAX_FILTER_ELEMENTS} category/brand ids are allowed"
            )));
        }
        self.sort()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_refinements() {
        let filter = ProductSearchFilter::new();
        assert!(!filter.has_refinements());
        assert!(filter.attribute_predicates().is_empty());
        assert!(filter.validate(100).is_ok());
    }

    #[test]
    fn test_blank_query_is_not_a_refinement() {
        let filter = ProductSearchFilter::new().with_query("   ");
        assert_eq!(filter.text_query(), None);
        assert!(!filter.has_refinements());
    }

    #[test]
    fn test_between_with_one_bound_is_noop() {
        let filter = AttributeFilter::by_code("weight", AttributeOperator::Between).min_value(2.0);
        assert_eq!(filter.predicate(), None);

        let search = ProductSearchFilter::new().with_attribute(filter);
        assert!(search.attribute_predicates().is_empty());
        assert!(!search.has_refinements());
        assert!(search.validate(100).is_ok());
    }

    #[test]
    fn test_between_with_both_bounds() {
        let filter = AttributeFilter::by_code("weight", AttributeOperator::Between)
            .min_value(2.0)
            .max_value("5");
        let predicate = filter.predicate().unwrap();
        assert_eq!(predicate.attribute, AttributeRef::Code("weight".into()));
        assert_eq!(predicate.comparison, Comparison::Between(2.0, 5.0));
        assert!(predicate.comparison.is_numeric());
    }

    #[test]
    fn test_missing_operand_variants_are_noops() {
        let id = Uuid::new_v4();
        for op in [
            AttributeOperator::Eq,
            AttributeOperator::Neq,
            AttributeOperator::In,
            AttributeOperator::Nin,
            AttributeOperator::Gt,
            AttributeOperator::Gte,
            AttributeOperator::Lt,
            AttributeOperator::Lte,
            AttributeOperator::Between,
            AttributeOperator::Like,
        ] {
            assert_eq!(AttributeFilter::by_id(id, op).predicate(), None, "{op:?}");
        }
    }

    #[test]
    fn test_numeric_operator_with_non_numeric_operand_is_noop() {
        let filter = AttributeFilter::by_code("size", AttributeOperator::Gt).value("large");
        assert_eq!(filter.predicate(), None);
    }

    #[test]
    fn test_empty_in_list_is_noop() {
        let filter = AttributeFilter::by_code("color", AttributeOperator::In).values(Vec::<String>::new());
        assert_eq!(filter.predicate(), None);
    }

    #[test]
    fn test_filter_without_attribute_is_noop() {
        let filter = AttributeFilter {
            operator: AttributeOperator::Eq,
            value: Some("red".into()),
            ..Default::default()
        };
        assert_eq!(filter.predicate(), None);
    }

    #[test]
    fn test_attribute_id_wins_over_code() {
        let id = Uuid::new_v4();
        let filter = AttributeFilter {
            attribute_id: Some(id),
            attribute_code: Some("color".into()),
            operator: AttributeOperator::Eq,
            value: Some("red".into()),
            ..Default::default()
        };
        assert_eq!(filter.attribute_ref(), Some(AttributeRef::Id(id)));
    }

    #[test]
    fn test_operand_text_forms() {
        assert_eq!(Operand::Number(10.0).as_text(), "10");
        assert_eq!(Operand::Number(2.5).as_text(), "2.5");
        assert_eq!(Operand::Bool(true).as_text(), "true");
        assert_eq!(Operand::Text("x".into()).as_number(), None);
        assert_eq!(Operand::Text(" 7 ".into()).as_number(), Some(7.0));
    }

    #[test]
    fn test_in_values_are_textualized() {
        let filter = AttributeFilter::by_code("size", AttributeOperator::Nin).values([38_i64, 40]);
        assert_eq!(
            filter.predicate().unwrap().comparison,
            Comparison::NotIn(vec!["38".into(), "40".into()])
        );
    }

    #[test]
    fn test_sort_defaults() {
        let plain = ProductSearchFilter::new();
        assert_eq!(
            plain.sort().unwrap(),
            SortSpec {
                field: SortField::CreatedAt,
                direction: SortDirection::Desc
            }
        );

        let text = ProductSearchFilter::new().with_query("mouse");
        assert_eq!(text.sort().unwrap().field, SortField::Relevance);
    }

    #[test]
    fn test_sort_explicit() {
        let filter = ProductSearchFilter::new().with_sort(SortField::Price, SortDirection::Desc);
        assert_eq!(
            filter.sort().unwrap(),
            SortSpec {
                field: SortField::Price,
                direction: SortDirection::Desc
            }
        );
    }

    #[test]
    fn test_unknown_sort_key_is_invalid_argument() {
        let filter = ProductSearchFilter {
            sort_by: Some("colour".into()),
            ..Default::default()
        };
        assert!(matches!(filter.sort(), Err(Error::InvalidArgument(_))));
        assert!(matches!(filter.validate(100), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_unknown_sort_direction_is_invalid_argument() {
        let filter = ProductSearchFilter {
            sort_by: Some("price".into()),
            sort_order: Some("sideways".into()),
            ..Default::default()
        };
        assert!(matches!(filter.validate(100), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_negative_limit_is_invalid_argument() {
        let filter = ProductSearchFilter {
            limit: Some(-1),
            ..Default::default()
        };
        assert!(matches!(filter.validate(100), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_limit_above_max_is_invalid_argument() {
        let filter = ProductSearchFilter::new().with_page(1, 500);
        assert!(matches!(filter.validate(100), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_inverted_price_range_is_invalid_argument() {
        let filter = ProductSearchFilter::new().with_price_range(Some(50.0), Some(10.0));
        assert!(matches!(filter.validate(100), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_page_window_from_page() {
        let filter = ProductSearchFilter::new().with_page(3, 20);
        assert_eq!(
            filter.page_window(10),
            PageWindow {
                page: 3,
                limit: 20,
                offset: 40
            }
        );
    }

    #[test]
    fn test_page_window_offset_takes_precedence() {
        let filter = ProductSearchFilter::new().with_page(3, 20).with_offset(25);
        assert_eq!(
            filter.page_window(10),
            PageWindow {
                page: 2,
                limit: 20,
                offset: 25
            }
        );
    }

    #[test]
    fn test_page_window_defaults() {
        let filter = ProductSearchFilter::new();
        assert_eq!(
            filter.page_window(20),
            PageWindow {
                page: 1,
                limit: 20,
                offset: 0
            }
        );
    }

    #[test]
    fn test_deserialize_camel_case_request() {
        let json = r#"{
            "query": "mouse",
            "categoryIds": ["00000000-0000-0000-0000-000000000001"],
            "minPrice": 10,
            "isFeatured": true,
            "attributeFilters": [
                {"code": "color", "operator": "in", "values": ["black", "white"]},
                {"attributeCode": "dpi", "operator": "gte", "value": 1600},
                {"code": "weight", "operator": "between", "minValue": 50}
            ],
            "sortBy": "price",
            "sortOrder": "asc",
            "page": 2,
            "limit": 10
        }"#;
        let filter: ProductSearchFilter = serde_json::from_str(json).unwrap();
        assert_eq!(filter.min_price, Some(10.0));
        assert_eq!(filter.is_featured, Some(true));
        assert_eq!(filter.attribute_filters.len(), 3);
        assert_eq!(filter.scope, SearchScope::Storefront);

        let predicates = filter.attribute_predicates();
        assert_eq!(predicates.len(), 2);
        assert_eq!(
            predicates[0].comparison,
            Comparison::In(vec!["black".into(), "white".into()])
        );
        assert_eq!(predicates[1].comparison, Comparison::GreaterOrEqual(1600.0));
    }

    #[test]
    fn test_unknown_operator_fails_deserialization() {
        let json = r#"{"attributeFilters": [{"code": "color", "operator": "regex", "value": "r.*"}]}"#;
        assert!(serde_json::from_str::<ProductSearchFilter>(json).is_err());
    }
}
