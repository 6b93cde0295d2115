//! # vitrine-core
//!
//! Core types, traits, and abstractions for the vitrine catalog search engine.
//!
//! This crate provides the catalog domain model, the product search filter
//! model, and the trait definitions that the database and search crates
//! implement. It contains no SQL.

pub mod config;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use filter::{
    AttributeFilter, AttributeOperator, AttributePredicate, AttributeRef, Comparison, Operand,
    PageWindow, ProductSearchFilter, SearchScope, SortDirection, SortField, SortSpec,
};
pub use models::*;
pub use traits::*;
