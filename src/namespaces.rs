//! XML namespace handling
//!
//! Well-known namespace URIs, qualified names used as binding keys, and the
//! prefix map that turns `prefix:local` declarations into [`QName`]s.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// XLink namespace
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// GML 2.x / 3.1 namespace
pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml";

/// GML 3.2 namespace
pub const GML_3_2_NAMESPACE: &str = "http://www.opengis.net/gml/3.2";

/// SMIL 2.0 namespace (imported by GML 3.1 for default styling)
pub const SMIL_20_NAMESPACE: &str = "http://www.w3.org/2001/SMIL20/";

/// Check that a string is usable as a governed namespace URI.
///
/// Namespace URIs are compared verbatim, so empty values and values carrying
/// whitespace are rejected instead of being silently normalized.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(Error::InvalidConfiguration(
            "namespace URI must not be empty".to_string(),
        ));
    }
    if namespace.chars().any(char::is_whitespace) {
        return Err(Error::InvalidConfiguration(format!(
            "namespace URI '{}' contains whitespace",
            namespace
        )));
    }
    Ok(())
}

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Parse Clark notation (`{ns}local`) or a bare local name
    pub fn from_clark(name: &str) -> Result<Self> {
        match name.strip_prefix('{') {
            Some(rest) => {
                let (ns, local) = rest.split_once('}').ok_or_else(|| {
                    Error::InvalidConfiguration(format!("unterminated namespace in '{}'", name))
                })?;
                if local.is_empty() {
                    return Err(Error::InvalidConfiguration(format!(
                        "missing local name in '{}'",
                        name
                    )));
                }
                Ok(QName::namespaced(ns, local))
            }
            None => Ok(QName::local(name)),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// Namespace context for resolving prefixes
#[derive(Debug, Clone, Default)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: HashMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Context pre-populated with the `xs`, `xlink` and `gml` prefixes
    pub fn with_well_known() -> Self {
        let mut ctx = Self::new();
        ctx.add_prefix("xs", XSD_NAMESPACE);
        ctx.add_prefix("xml", XML_NAMESPACE);
        ctx.add_prefix("xlink", XLINK_NAMESPACE);
        ctx.add_prefix("gml", GML_NAMESPACE);
        ctx
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Resolve a prefixed name (or Clark notation) to a QName
    pub fn resolve(&self, name: &str) -> Result<QName> {
        if name.starts_with('{') {
            return QName::from_clark(name);
        }
        if let Some((prefix, local)) = name.split_once(':') {
            let namespace = self.get_namespace(prefix).ok_or_else(|| {
                Error::InvalidConfiguration(format!("unknown prefix '{}' in '{}'", prefix, name))
            })?;
            Ok(QName::namespaced(namespace, local))
        } else {
            Ok(QName {
                namespace: self.default_namespace.clone(),
                local_name: name.to_string(),
            })
        }
    }
}
