//! # xmlschema-config
//!
//! Schema-aware binding configuration for XML Schema driven parsers.
//!
//! A parser that maps schema components to in-memory objects needs to know,
//! for every namespace it meets, which schema document to load, which other
//! schemas must be loaded first, and which shared services (geometry
//! factories, settings) the bindings expect. This crate provides that layer:
//!
//! - [`Configuration`] - one governed namespace, its schema location,
//!   dependencies, bindings and context contributions
//! - [`graph`] - dependency-first load order with cycle detection
//! - [`ResolverChain`] - namespace-aware resolution of imports and includes,
//!   with an optional OASIS XML catalog fallback
//! - [`CompositionContext`] - capability table populated in load order and
//!   frozen for the parse
//! - [`Session`] - all of the above assembled for one parsing session
//! - [`Manifest`] - JSON declaration of configurations
//!
//! ## Example
//!
//! ```rust
//! use xmlschema_config::{Configuration, LocationResolver, Session};
//!
//! let y = Configuration::builder("urn:y", "y.xsd").build()?;
//! let x = Configuration::builder("urn:x", "x.xsd").depends_on(y).build()?;
//!
//! let session = Session::for_root(x)?;
//! let order: Vec<_> = session.load_order().iter().map(|c| c.namespace_uri()).collect();
//! assert_eq!(order, ["urn:y", "urn:x"]);
//! assert_eq!(session.resolver().resolve("urn:y", "ignored").as_deref(), Some("y.xsd"));
//! assert_eq!(session.resolver().resolve("urn:z", "ignored"), None);
//! # Ok::<(), xmlschema_config::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Utilities
pub mod locations;
pub mod namespaces;

// Configuration model
pub mod bindings;
pub mod configuration;
pub mod context;
pub mod graph;
pub mod registry;

// Resolution
pub mod catalog;
pub mod resolver;

// Sessions and declarative setup
pub mod manifest;
pub mod session;

// Stock configurations
pub mod gml;

// Re-exports for convenience
pub use bindings::{Binding, BindingKind, BindingSet};
pub use catalog::XmlCatalog;
pub use configuration::{Configuration, ConfigurationBuilder, ContextContributor};
pub use context::CompositionContext;
pub use error::{Error, Result};
pub use limits::Limits;
pub use manifest::Manifest;
pub use registry::{ConfigurationRegistry, Declaration};
pub use resolver::{LocationResolver, ResolverChain};
pub use session::{Session, SessionBuilder};

/// Version of the xmlschema-config library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
