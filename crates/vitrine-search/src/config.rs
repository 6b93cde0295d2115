//! Engine configuration.
//!
//! Defaults come from [`vitrine_core::defaults`]; every value can be
//! overridden from the environment:
//!
//! - `VITRINE_SEARCH_DEFAULT_LIMIT` (default: 20)
//! - `VITRINE_SEARCH_MAX_LIMIT` (default: 100)
//! - `VITRINE_FACET_TOP_N` (default: 10)
//! - `VITRINE_FACET_MODE` (`auto`, `always`, `never`; default: `auto`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vitrine_core::config::env_or;
use vitrine_core::defaults::{
    AUXILIARY_LIMIT_MAX, FACET_TOP_N, PAGE_LIMIT_AUTOCOMPLETE, PAGE_LIMIT_SEARCH,
    PAGE_LIMIT_SEARCH_MAX, SIMILAR_LIMIT,
};
use vitrine_core::{Error, Result};

/// When a search response carries facets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetMode {
    /// Compute facets when the request has a text query or any refinement.
    #[default]
    Auto,
    /// Always compute facets.
    Always,
    /// Never compute facets.
    Never,
}

impl FacetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

impl FromStr for FacetMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" | "on" => Ok(Self::Always),
            "never" | "off" => Ok(Self::Never),
            other => Err(Error::Config(format!("unknown facet mode: {other}"))),
        }
    }
}

impl fmt::Display for FacetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limits and facet policy for [`crate::CatalogSearchEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Page size when the request gives none.
    pub default_limit: i64,
    /// Largest page size a request may ask for.
    pub max_limit: i64,
    /// Default number of suggestions.
    pub suggestion_limit: i64,
    /// Default number of similar / related products.
    pub similar_limit: i64,
    /// Upper bound for suggestion and similarity limits; larger requests
    /// are clamped.
    pub auxiliary_max_limit: i64,
    /// Categories and brands reported per facet family.
    pub facet_top_n: i64,
    pub facet_mode: FacetMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: PAGE_LIMIT_SEARCH,
            max_limit: PAGE_LIMIT_SEARCH_MAX,
            suggestion_limit: PAGE_LIMIT_AUTOCOMPLETE,
            similar_limit: SIMILAR_LIMIT,
            auxiliary_max_limit: AUXILIARY_LIMIT_MAX,
            facet_top_n: FACET_TOP_N,
            facet_mode: FacetMode::Auto,
        }
    }
}

impl SearchConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            default_limit: env_or("VITRINE_SEARCH_DEFAULT_LIMIT", defaults.default_limit)?,
            max_limit: env_or("VITRINE_SEARCH_MAX_LIMIT", defaults.max_limit)?,
            facet_top_n: env_or("VITRINE_FACET_TOP_N", defaults.facet_top_n)?,
            facet_mode: env_or("VITRINE_FACET_MODE", defaults.facet_mode)?,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the default and maximum page size.
    pub fn with_limits(mut self, default_limit: i64, max_limit: i64) -> Self {
        self.default_limit = default_limit;
        self.max_limit = max_limit;
        self
    }

    pub fn with_facet_top_n(mut self, top_n: i64) -> Self {
        self.facet_top_n = top_n;
        self
    }

    pub fn with_facet_mode(mut self, mode: FacetMode) -> Self {
        self.facet_mode = mode;
        self
    }

    /// Reject configurations no request could satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.max_limit < 1 {
            return Err(Error::Config(format!(
                "max search limit must be positive, got {}",
                self.max_limit
            )));
        }
        if self.default_limit < 1 || self.default_limit > self.max_limit {
            return Err(Error::Config(format!(
                "default search limit must be within 1..={}, got {}",
                self.max_limit, self.default_limit
            )));
        }
        if self.facet_top_n < 1 {
            return Err(Error::Config(format!(
                "facet top-n must be positive, got {}",
                self.facet_top_n
            )));
        }
        Ok(())
    }
}
