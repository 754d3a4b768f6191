//! Type classifier - sorts a type reference into primitive, collection, wrapper or plain
//! object, driven entirely by the configured name tables.

use crate::config::GeneratorConfig;
use crate::type_ref::TypeRef;
use crate::type_resolver::{primitive_kind, PrimitiveKind};
use std::collections::HashSet;

/// Result of classifying one level of a type reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeClass {
    /// A well-known primitive
    Primitive(PrimitiveKind),
    /// Zero-or-more values of the inner type (`List<T>`, `T[]`, ...)
    Collection(TypeRef),
    /// A single-value carrier of the inner type (`ActionResult<T>`, `Task<T>`, ...)
    Wrapped(TypeRef),
    /// Anything else, to be resolved through the symbol index
    Plain(TypeRef),
}

pub struct TypeClassifier {
    collections: HashSet<String>,
    wrappers: HashSet<String>,
}

impl TypeClassifier {
    pub fn new<S: AsRef<str>>(collections: &[S], wrappers: &[S]) -> Self {
        Self {
            collections: collections.iter().map(|s| s.as_ref().to_string()).collect(),
            wrappers: wrappers.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.collection_types.as_slice(), config.wrapper_types.as_slice())
    }

    /// Classify a single level. Wrapper heads are checked before collection heads; heads
    /// without a type argument never match either table.
    pub fn classify(&self, type_ref: &TypeRef) -> TypeClass {
        if let Some(element) = type_ref.element() {
            return TypeClass::Collection(element);
        }

        let head = type_ref.simple_name();
        if let Some(inner) = type_ref.first_arg() {
            if self.wrappers.contains(head) {
                return TypeClass::Wrapped(inner.clone());
            }
            if self.collections.contains(head) {
                return TypeClass::Collection(inner.clone());
            }
        }

        if !type_ref.is_generic() {
            if let Some(kind) = primitive_kind(&type_ref.name) {
                return TypeClass::Primitive(kind);
            }
        }

        let mut plain = type_ref.clone();
        plain.nullable = false;
        TypeClass::Plain(plain)
    }

    /// Peel wrapper and collection layers until neither table matches
    pub fn terminal(&self, type_ref: &TypeRef) -> TypeClass {
        let mut current = self.classify(type_ref);
        while let TypeClass::Collection(inner) | TypeClass::Wrapped(inner) = current {
            current = self.classify(&inner);
        }
        current
    }
}
