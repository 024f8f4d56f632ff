//! Binding sets
//!
//! A binding set maps schema components (elements, attributes, types) to the
//! name of the construction strategy the binding engine should use for them.
//! The strategies themselves live in the binding engine; here they are opaque
//! identifiers.

use crate::namespaces::QName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of schema component a binding applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    /// Global or local element declaration
    Element,
    /// Attribute declaration
    Attribute,
    /// Simple or complex type definition
    Type,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BindingKind::Element => "element",
            BindingKind::Attribute => "attribute",
            BindingKind::Type => "type",
        };
        f.write_str(s)
    }
}

/// A single component-to-strategy mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Component kind
    pub kind: BindingKind,
    /// Strategy identifier understood by the binding engine
    pub strategy: String,
}

/// Ordered set of bindings contributed by one configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSet {
    bindings: IndexMap<(BindingKind, QName), Binding>,
}

impl BindingSet {
    /// Create an empty binding set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element binding
    pub fn with_element(mut self, name: QName, strategy: impl Into<String>) -> Self {
        self.insert(BindingKind::Element, name, strategy);
        self
    }

    /// Add an attribute binding
    pub fn with_attribute(mut self, name: QName, strategy: impl Into<String>) -> Self {
        self.insert(BindingKind::Attribute, name, strategy);
        self
    }

    /// Add a type binding
    pub fn with_type(mut self, name: QName, strategy: impl Into<String>) -> Self {
        self.insert(BindingKind::Type, name, strategy);
        self
    }

    /// Insert a binding, returning the one it replaced
    pub fn insert(
        &mut self,
        kind: BindingKind,
        name: QName,
        strategy: impl Into<String>,
    ) -> Option<Binding> {
        self.bindings.insert(
            (kind, name),
            Binding {
                kind,
                strategy: strategy.into(),
            },
        )
    }

    /// Look up the binding for a component
    pub fn get(&self, kind: BindingKind, name: &QName) -> Option<&Binding> {
        // IndexMap needs an owned key for tuple lookups
        self.bindings.get(&(kind, name.clone()))
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the set holds no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&QName, &Binding)> {
        self.bindings.iter().map(|((_, name), binding)| (name, binding))
    }

    /// Merge `other` into this set; entries from `other` override.
    ///
    /// Returns the components whose strategy changed.
    pub fn merge(&mut self, other: &BindingSet) -> Vec<(BindingKind, QName)> {
        let mut overridden = Vec::new();
        for ((kind, name), binding) in &other.bindings {
            if let Some(previous) = self.bindings.insert((*kind, name.clone()), binding.clone()) {
                if previous.strategy != binding.strategy {
                    overridden.push((*kind, name.clone()));
                }
            }
        }
        overridden
    }
}
