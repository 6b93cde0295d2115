//! Centralized default constants for the vitrine catalog search engine.
//!
//! **This module is the single source of truth** for shared default values.
//! Other crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for product search.
pub const PAGE_LIMIT_SEARCH: i64 = 20;

/// Hard upper bound on a search page.
pub const PAGE_LIMIT_SEARCH_MAX: i64 = 100;

/// Default first page (pages are 1-based).
pub const PAGE_FIRST: i64 = 1;

/// Default page size for autocomplete suggestions.
pub const PAGE_LIMIT_AUTOCOMPLETE: i64 = 10;

/// Default number of similar / related products.
pub const SIMILAR_LIMIT: i64 = 10;

/// Upper bound for suggestion and similarity limits.
pub const AUXILIARY_LIMIT_MAX: i64 = 50;

// =============================================================================
// FACETS
// =============================================================================

/// Number of categories / brands reported in their facets.
pub const FACET_TOP_N: i64 = 10;

/// Number of equal-width price buckets.
pub const PRICE_BUCKET_COUNT: usize = 5;

// =============================================================================
// FILTERS
// =============================================================================

/// Maximum number of attribute filters accepted in one request.
///
/// Each attribute filter adds a join; beyond this the request is rejected.
pub const MAX_ATTRIBUTE_FILTERS: usize = 16;

/// Maximum number of ids accepted in a set-membership filter.
pub const MAX_FILTER_ELEMENTS: usize = 1000;
