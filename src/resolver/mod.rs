//! Type Resolution Providers.
//!
//! The renderer asks two questions about a member: is it public, and what is
//! its declared type. How the answers are obtained is up to the provider: a
//! precomputed [`MetadataTable`], or the [`OpenResolver`] when no metadata
//! exists for a document.

mod table;

pub use table::*;

use serde::{Deserialize, Serialize};

use crate::parser::{MemberId, MemberKind};

/// A resolved type, as reported by a metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Simple name, possibly with a generic arity marker (`List`1`) or an
    /// array suffix (`Item[]`)
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Assembly that defines the type, when known
    #[serde(default)]
    pub assembly: Option<String>,
    /// Constructed generic arguments
    #[serde(default, rename = "arguments")]
    pub type_arguments: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            assembly: None,
            type_arguments: Vec::new(),
        }
    }

    pub fn in_assembly(mut self, assembly: impl Into<String>) -> Self {
        self.assembly = Some(assembly.into());
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<TypeDescriptor>) -> Self {
        self.type_arguments = arguments;
        self
    }

    /// Name without array suffix or generic arity marker.
    pub fn simple_name(&self) -> &str {
        let name = self.name.trim_end_matches("[]");
        match name.find('`') {
            Some(tick) => &name[..tick],
            None => name,
        }
    }

    pub fn is_array(&self) -> bool {
        self.name.ends_with("[]")
    }

    pub fn is_generic(&self) -> bool {
        !self.type_arguments.is_empty()
    }

    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.simple_name().to_string()
        } else {
            format!("{}.{}", self.namespace, self.simple_name())
        }
    }
}

/// Answers visibility and type questions about documented members.
///
/// Implementations must fail open: when visibility cannot be determined the
/// member is reported public, so missing metadata never hides documentation.
#[cfg_attr(test, mockall::automock)]
pub trait TypeResolver {
    fn is_public(&self, id: &MemberId) -> bool;

    /// Declared type of `member` (field/property type, method return type)
    /// inside `class_name`.
    fn resolve_type(
        &self,
        class_name: &str,
        kind: MemberKind,
        member: &str,
    ) -> Option<TypeDescriptor>;
}

/// Resolver for documents without metadata: everything is public and no
/// type can be resolved.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenResolver;

impl TypeResolver for OpenResolver {
    fn is_public(&self, _id: &MemberId) -> bool {
        true
    }

    fn resolve_type(&self, _class: &str, _kind: MemberKind, _member: &str) -> Option<TypeDescriptor> {
        None
    }
}
