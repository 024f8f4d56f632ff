//! Limits on dependency graphs and catalogs
//!
//! Configuration graphs and catalog chains come from user-supplied manifests,
//! so their size and depth are bounded.

use crate::error::{Error, Result};
use serde::Deserialize;

/// Limits applied while resolving configurations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Limits {
    /// Maximum length of a dependency chain (root counts as depth 1)
    pub max_dependency_depth: usize,

    /// Maximum number of distinct configurations in one session
    pub max_configurations: usize,

    /// Maximum `nextCatalog` nesting
    pub max_catalog_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dependency_depth: 64,
            max_configurations: 1024,
            max_catalog_depth: 16,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_dependency_depth: 16,
            max_configurations: 128,
            max_catalog_depth: 4,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_dependency_depth: 1024,
            max_configurations: 100_000,
            max_catalog_depth: 128,
        }
    }

    /// Check if a dependency chain depth is within limits
    pub fn check_dependency_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_dependency_depth {
            Err(Error::LimitExceeded(format!(
                "dependency depth {} exceeds maximum {}",
                depth, self.max_dependency_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if the number of configurations is within limits
    pub fn check_configurations(&self, count: usize) -> Result<()> {
        if count > self.max_configurations {
            Err(Error::LimitExceeded(format!(
                "configuration count {} exceeds maximum {}",
                count, self.max_configurations
            )))
        } else {
            Ok(())
        }
    }

    /// Check if catalog nesting is within limits
    pub fn check_catalog_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_catalog_depth {
            Err(Error::LimitExceeded(format!(
                "catalog nesting {} exceeds maximum {}",
                depth, self.max_catalog_depth
            )))
        } else {
            Ok(())
        }
    }
}
