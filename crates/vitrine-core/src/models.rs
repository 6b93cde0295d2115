//! Core data models for the catalog.
//!
//! These types are shared across all vitrine crates. The catalog is read-only
//! from the point of view of this engine: none of these entities are created
//! or mutated here.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// PRODUCT LIFECYCLE ENUMS
// =============================================================================

/// Publication status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    Active,
    Inactive,
    Archived,
}

impl ProductStatus {
    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for ProductStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            other => Err(Error::invalid(format!("unknown product status: {other}"))),
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a product may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductVisibility {
    /// Listed in the catalog and in search.
    Visible,
    /// Not shown anywhere customer-facing.
    Hidden,
    /// Only reachable through search.
    SearchOnly,
    /// Only reachable through catalog browsing.
    CatalogOnly,
}

impl ProductVisibility {
    /// Visibilities that customer-facing search returns by default.
    pub const SEARCHABLE: [ProductVisibility; 2] =
        [ProductVisibility::Visible, ProductVisibility::SearchOnly];

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::SearchOnly => "search_only",
            Self::CatalogOnly => "catalog_only",
        }
    }

    /// Whether customer-facing search may return this product.
    pub fn is_searchable(&self) -> bool {
        Self::SEARCHABLE.contains(self)
    }
}

impl FromStr for ProductVisibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visible" => Ok(Self::Visible),
            "hidden" => Ok(Self::Hidden),
            "search_only" => Ok(Self::SearchOnly),
            "catalog_only" => Ok(Self::CatalogOnly),
            other => Err(Error::invalid(format!("unknown product visibility: {other}"))),
        }
    }
}

impl fmt::Display for ProductVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PRODUCT
// =============================================================================

/// A product as returned by search, similarity, and attribute lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub price: f64,
    pub status: ProductStatus,
    pub visibility: ProductVisibility,
    pub brand_id: Option<Uuid>,
    pub product_type_id: Option<Uuid>,
    pub is_featured: bool,
    pub is_new: bool,
    pub is_bestseller: bool,
    pub has_variants: bool,
    pub stock_quantity: i32,
    pub rating: Option<f64>,
    pub review_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Typed attribute map keyed by attribute code, present only when the
    /// caller asked for attribute hydration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, AttributeValue>>,
    /// Number of (attribute, value) pairs shared with the source product,
    /// set by the similarity matcher only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_attributes: Option<i64>,
}

impl Product {
    /// Whether customer-facing search may return this product.
    pub fn is_storefront_eligible(&self) -> bool {
        self.status == ProductStatus::Active && self.visibility.is_searchable()
    }
}

// =============================================================================
// ATTRIBUTES (EAV)
// =============================================================================

/// Declared type of a dynamic attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    Text,
    Number,
    Boolean,
    Enum,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
        }
    }
}

impl FromStr for AttributeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "enum" => Ok(Self::Enum),
            other => Err(Error::invalid(format!("unknown attribute type: {other}"))),
        }
    }
}

/// A typed attribute value decoded from its stored text form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    Enum(String),
}

impl AttributeValue {
    /// Decode a stored value according to the attribute's declared type.
    ///
    /// Values that do not parse as their declared type are kept as text.
    pub fn parse(attribute_type: AttributeType, raw: &str) -> Self {
        match attribute_type {
            AttributeType::Number => raw
                .trim()
                .parse::<f64>()
                .map(AttributeValue::Number)
                .unwrap_or_else(|_| AttributeValue::Text(raw.to_string())),
            AttributeType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => AttributeValue::Boolean(true),
                "false" | "0" | "no" => AttributeValue::Boolean(false),
                _ => AttributeValue::Text(raw.to_string()),
            },
            AttributeType::Enum => AttributeValue::Enum(raw.to_string()),
            AttributeType::Text => AttributeValue::Text(raw.to_string()),
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

// =============================================================================
// FACETS
// =============================================================================

/// Count of eligible products for one category or brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetBucket {
    pub id: Uuid,
    pub name: String,
    pub count: i64,
}

/// Count of eligible products within a price range.
///
/// `min` is inclusive; `max` is exclusive except for the highest bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeBucket {
    pub min: f64,
    pub max: f64,
    pub count: i64,
}

/// One value of a filterable attribute with its product count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFacetValue {
    /// Raw stored value (what a filter must match on).
    pub value: String,
    /// Display value when a lookup exists, otherwise the raw value.
    pub label: String,
    pub count: i64,
}

/// Value counts for a single filterable attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFacet {
    pub attribute_id: Uuid,
    pub code: String,
    pub name: String,
    pub position: i32,
    pub values: Vec<AttributeFacetValue>,
}

/// All facet families for a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub categories: Vec<FacetBucket>,
    pub brands: Vec<FacetBucket>,
    pub price_ranges: Vec<PriceRangeBucket>,
    pub attributes: Vec<AttributeFacet>,
}

// =============================================================================
// SEARCH RESPONSE
// =============================================================================

/// Paginated search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchResponse {
    pub products: Vec<Product>,
    /// Total matches before pagination.
    pub total: i64,
    /// 1-based page number.
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Facets>,
}

/// Number of pages needed for `total` items at `limit` per page.
///
/// Returns 0 when `limit` is not positive.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 || total <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            ProductStatus::Draft,
            ProductStatus::Active,
            ProductStatus::Inactive,
            ProductStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<ProductStatus>().unwrap(), status);
        }
        assert!("published".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_visibility_searchable() {
        assert!(ProductVisibility::Visible.is_searchable());
        assert!(ProductVisibility::SearchOnly.is_searchable());
        assert!(!ProductVisibility::Hidden.is_searchable());
        assert!(!ProductVisibility::CatalogOnly.is_searchable());
    }

    #[test]
    fn test_visibility_serde_snake_case() {
        let json = serde_json::to_string(&ProductVisibility::SearchOnly).unwrap();
        assert_eq!(json, "\"search_only\"");
    }

    #[test]
    fn test_attribute_value_parse_number() {
        assert_eq!(
            AttributeValue::parse(AttributeType::Number, " 12.5 "),
            AttributeValue::Number(12.5)
        );
        assert_eq!(
            AttributeValue::parse(AttributeType::Number, "twelve"),
            AttributeValue::Text("twelve".into())
        );
    }

    #[test]
    fn test_attribute_value_parse_boolean() {
        assert_eq!(
            AttributeValue::parse(AttributeType::Boolean, "Yes"),
            AttributeValue::Boolean(true)
        );
        assert_eq!(
            AttributeValue::parse(AttributeType::Boolean, "0"),
            AttributeValue::Boolean(false)
        );
    }

    #[test]
    fn test_attribute_value_enum_and_text() {
        assert_eq!(
            AttributeValue::parse(AttributeType::Enum, "red"),
            AttributeValue::Enum("red".into())
        );
        assert_eq!(AttributeValue::parse(AttributeType::Text, "red").as_f64(), None);
    }

    #[test]
    fn test_attribute_value_tagged_json() {
        let json = serde_json::to_value(AttributeValue::Number(3.0)).unwrap();
        assert_eq!(json["kind"], "number");
        assert_eq!(json["value"], 3.0);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(100, 7), 15);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_response_omits_absent_facets() {
        let response = ProductSearchResponse {
            products: vec![],
            total: 0,
            page: 1,
            limit: 20,
            total_pages: 0,
            facets: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("facets").is_none());
        assert_eq!(json["totalPages"], 0);
    }
}
