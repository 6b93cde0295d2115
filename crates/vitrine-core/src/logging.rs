//! Structured logging schema and field name constants for vitrine.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query every subsystem the same way.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue (pool pressure, clamped request) |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points (facet mode, sort resolution, composed SQL shape) |
//! | TRACE | Per-row detail |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "search", "database", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "executor", "facets", "similarity", "suggestions", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "find_similar", "get_suggestions", "price_ranges"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Product UUID being operated on.
pub const PRODUCT_ID: &str = "product_id";

/// Attribute code used in a lookup.
pub const ATTRIBUTE_CODE: &str = "attribute_code";

/// Free-text query or prefix.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned.
pub const RESULT_COUNT: &str = "result_count";

/// Total matches before pagination.
pub const TOTAL: &str = "total";

/// Number of attribute joins in a composed query.
pub const ATTRIBUTE_JOINS: &str = "attribute_joins";

/// Number of bound parameters in a composed query.
pub const PARAM_COUNT: &str = "param_count";

// ─── Facet fields ──────────────────────────────────────────────────────────

/// Facet family ("categories", "brands", "price_ranges", "attributes").
pub const FACET_FAMILY: &str = "facet_family";

/// Whether facets were computed for a request.
pub const FACETS_COMPUTED: &str = "facets_computed";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
