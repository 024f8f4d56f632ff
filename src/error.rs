//! Error types for xmlschema-config
//!
//! Construction and graph errors are fatal: no partially built configuration
//! is ever handed out. Resolution misses are represented as `None` by the
//! resolvers and only become [`Error::UnresolvedImport`] when a caller asks
//! for a definite answer.

use thiserror::Error;

/// Result type alias using the crate [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for configuration operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed construction arguments (empty namespace, empty location, bad manifest entry)
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A configuration is reachable from its own dependency set
    #[error("cyclic dependency: {}", format_chain(.chain))]
    CyclicDependency {
        /// Namespaces participating in the cycle, in traversal order
        chain: Vec<String>,
    },

    /// Mutation attempted on a frozen composition context
    #[error("composition context is frozen; cannot register '{key}'")]
    ContextFrozen {
        /// Capability key of the rejected registration
        key: String,
    },

    /// No configuration claims the namespace and no usable hint was given
    #[error("unresolved import for namespace '{namespace}'")]
    UnresolvedImport {
        /// Namespace of the import
        namespace: String,
    },

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Malformed XML catalog
    #[error("catalog error: {0}")]
    Catalog(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl Error {
    /// Create a cyclic dependency error from a namespace chain.
    ///
    /// The first namespace is appended again when the chain is not already
    /// closed, so the message reads `a -> b -> a`.
    pub fn cycle<I, S>(chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut chain: Vec<String> = chain.into_iter().map(Into::into).collect();
        if let (Some(first), Some(last)) = (chain.first(), chain.last()) {
            if chain.len() == 1 || first != last {
                let first = first.clone();
                chain.push(first);
            }
        }
        Error::CyclicDependency { chain }
    }

    /// Whether the error leaves nothing usable behind.
    ///
    /// Only an unresolved import is recoverable; the caller decides what to do with it.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::UnresolvedImport { .. })
    }
}

fn format_chain(chain: &[String]) -> String {
    chain.join(" -> ")
}
