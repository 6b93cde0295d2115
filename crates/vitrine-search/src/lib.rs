//! # vitrine-search
//!
//! Catalog search engine for vitrine.
//!
//! This crate provides:
//! - [`CatalogSearchEngine`], implementing the [`CatalogSearch`] operations
//!   on top of any [`CatalogRepository`]
//! - The facet decision ([`FacetMode`]) and limit policy ([`SearchConfig`])
//! - A fluent [`SearchRequest`] builder
//! - The `vitrine-search` operator CLI
//!
//! ## Example
//!
//! ```ignore
//! use vitrine_search::{Catalog, CatalogSearchEngine, SearchRequest, SortDirection, SortField};
//!
//! let catalog = Catalog::connect("postgres://...").await?;
//! let engine = CatalogSearchEngine::new(catalog);
//!
//! let response = SearchRequest::new("wireless mouse")
//!     .max_price(50.0)
//!     .sort(SortField::Price, SortDirection::Asc)
//!     .execute(&engine)
//!     .await?;
//!
//! let names = engine.get_suggestions("wire", Some(5)).await?;
//! ```

pub mod config;
pub mod engine;
pub mod request;

// Re-export core and database types
pub use vitrine_core::*;
pub use vitrine_db::{Catalog, PoolConfig};

pub use config::{FacetMode, SearchConfig};
pub use engine::CatalogSearchEngine;
pub use request::SearchRequest;
