use crate::config::NamePolicy;
use crate::error::{Error, Result};
use crate::symbols::{SymbolModel, TypeSymbol};
use crate::type_ref::TypeRef;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Symbol index - maps fully-qualified type names to their declarations across every
/// project of one application.
///
/// Keys are `namespace.Name` (or the bare name for types outside a namespace). The index
/// owns the symbol models it was built from; lookups hand out borrowed views.
pub struct SymbolIndex {
    models: Vec<SymbolModel>,
    entries: Vec<IndexEntry>,
    by_key: HashMap<String, usize>,
    policy: NamePolicy,
}

struct IndexEntry {
    key: String,
    model: usize,
    symbol: usize,
}

/// Well-known primitive categories, each with one fixed example
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Boolean,
    String,
    Integer,
    Decimal,
    Float,
    DateTime,
    /// Recognised but without a meaningful example (`object`, `IFormFile`, ...)
    Opaque,
}

/// A type name bound to what it refers to
#[derive(Debug, Clone)]
pub enum ResolvedType<'a> {
    Primitive(PrimitiveKind),
    Symbol(ResolvedSymbol<'a>),
    /// Several candidates matched under the strict name policy
    Ambiguous(Vec<String>),
    Unresolved,
}

/// A declaration found in the index, with the model (project) that declares it
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSymbol<'a> {
    pub key: &'a str,
    pub symbol: &'a TypeSymbol,
    pub model: &'a SymbolModel,
}

impl SymbolIndex {
    /// Build the index from the symbol models of one application, in project order.
    ///
    /// With [`NamePolicy::FirstWins`] a later declaration of an already indexed key is
    /// dropped. With [`NamePolicy::Strict`] it fails the build.
    pub fn build(models: Vec<SymbolModel>, policy: NamePolicy) -> Result<Self> {
        let mut entries: Vec<IndexEntry> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for (model_idx, model) in models.iter().enumerate() {
            for (symbol_idx, symbol) in model.types.iter().enumerate() {
                let key = symbol.qualified_name();
                if let Some(&existing) = by_key.get(&key) {
                    let first_project = &models[entries[existing].model].project;
                    if policy == NamePolicy::Strict {
                        return Err(Error::AmbiguousSymbol {
                            key,
                            projects: vec![first_project.clone(), model.project.clone()],
                        });
                    }
                    debug!(
                        "Dropping duplicate declaration of {} in {} (first declared in {})",
                        key, model.project, first_project
                    );
                    continue;
                }
                by_key.insert(key.clone(), entries.len());
                entries.push(IndexEntry {
                    key,
                    model: model_idx,
                    symbol: symbol_idx,
                });
            }
        }

        debug!("Indexed {} types from {} projects", entries.len(), models.len());
        Ok(Self {
            models,
            entries,
            by_key,
            policy,
        })
    }

    /// Look up a simple or partially qualified type name.
    ///
    /// Declared types are matched on `"." + name` suffix first, then on the exact key.
    /// Names that match no declaration fall back to the primitive table.
    pub fn lookup(&self, name: &str) -> ResolvedType<'_> {
        let suffix = format!(".{}", name);
        let mut candidates = self.entries.iter().filter(|e| e.key.ends_with(&suffix));

        if let Some(first) = candidates.next() {
            if self.policy == NamePolicy::Strict {
                let others: Vec<&IndexEntry> = candidates.collect();
                if !others.is_empty() {
                    let mut keys = vec![first.key.clone()];
                    keys.extend(others.iter().map(|e| e.key.clone()));
                    warn!("Ambiguous type name {}: {}", name, keys.join(", "));
                    return ResolvedType::Ambiguous(keys);
                }
            }
            return ResolvedType::Symbol(self.view(first));
        }

        if let Some(found) = self.get(name) {
            return ResolvedType::Symbol(found);
        }

        if let Some(kind) = primitive_kind(name) {
            return ResolvedType::Primitive(kind);
        }

        debug!("Type {} not found in any project", name);
        ResolvedType::Unresolved
    }

    /// Look up the head of a parsed type reference
    pub fn resolve(&self, type_ref: &TypeRef) -> ResolvedType<'_> {
        self.lookup(&type_ref.name)
    }

    /// Fetch a declaration by its exact key
    pub fn get(&self, key: &str) -> Option<ResolvedSymbol<'_>> {
        self.by_key.get(key).map(|&idx| self.view(&self.entries[idx]))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn view<'s>(&'s self, entry: &'s IndexEntry) -> ResolvedSymbol<'s> {
        let model = &self.models[entry.model];
        ResolvedSymbol {
            key: &entry.key,
            symbol: &model.types[entry.symbol],
            model,
        }
    }
}

/// Classify a well-known type name. A leading `System.` qualifier is ignored.
pub fn primitive_kind(name: &str) -> Option<PrimitiveKind> {
    let name = name.strip_prefix("System.").unwrap_or(name);
    match name {
        "bool" | "Boolean" => Some(PrimitiveKind::Boolean),
        "string" | "String" | "char" | "Char" | "Guid" => Some(PrimitiveKind::String),
        "int" | "Int32" | "long" | "Int64" | "short" | "Int16" | "uint" | "UInt32" | "ulong"
        | "UInt64" | "ushort" | "UInt16" | "byte" | "Byte" | "sbyte" | "SByte" => {
            Some(PrimitiveKind::Integer)
        }
        "decimal" | "Decimal" => Some(PrimitiveKind::Decimal),
        "double" | "Double" | "float" | "Single" => Some(PrimitiveKind::Float),
        "DateTime" | "DateTimeOffset" | "DateOnly" => Some(PrimitiveKind::DateTime),
        "object" | "Object" | "dynamic" | "IFormFile" | "Enum" => Some(PrimitiveKind::Opaque),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(project: &str, types: Vec<TypeSymbol>) -> SymbolModel {
        SymbolModel::new(project, types)
    }

    #[test]
    fn test_lookup_by_suffix_across_projects() {
        let index = SymbolIndex::build(
            vec![
                model("Api", vec![TypeSymbol::class("OrdersController", Some("Shop.Api"))]),
                model("Domain", vec![TypeSymbol::class("Order", Some("Shop.Domain.Models"))]),
            ],
            NamePolicy::FirstWins,
        )
        .unwrap();

        match index.lookup("Order") {
            ResolvedType::Symbol(found) => {
                assert_eq!(found.key, "Shop.Domain.Models.Order");
                assert_eq!(found.model.project, "Domain");
                assert_eq!(found.symbol.name, "Order");
            }
            other => panic!("Expected symbol, got {:?}", other),
        }

        assert!(matches!(index.lookup("Models.Order"), ResolvedType::Symbol(_)));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_suffix_requires_segment_boundary() {
        let index = SymbolIndex::build(
            vec![model("Api", vec![TypeSymbol::class("PurchaseOrder", Some("Shop"))])],
            NamePolicy::FirstWins,
        )
        .unwrap();
        assert!(matches!(index.lookup("Order"), ResolvedType::Unresolved));
    }

    #[test]
    fn test_bare_name_outside_namespace() {
        let index = SymbolIndex::build(
            vec![model("Api", vec![TypeSymbol::class("Order", None)])],
            NamePolicy::FirstWins,
        )
        .unwrap();
        assert!(matches!(index.lookup("Order"), ResolvedType::Symbol(_)));
        assert!(index.get("Order").is_some());
    }

    #[test]
    fn test_duplicate_key_first_wins() {
        let first = TypeSymbol::class("Order", Some("Shop")).with_property("Id", "int");
        let second = TypeSymbol::class("Order", Some("Shop")).with_property("Code", "string");
        let index = SymbolIndex::build(
            vec![model("Api", vec![first]), model("Legacy", vec![second])],
            NamePolicy::FirstWins,
        )
        .unwrap();

        assert_eq!(index.len(), 1);
        let found = index.get("Shop.Order").unwrap();
        assert_eq!(found.model.project, "Api");
        assert_eq!(found.symbol.properties[0].name, "Id");
    }

    #[test]
    fn test_duplicate_key_strict_fails() {
        let result = SymbolIndex::build(
            vec![
                model("Api", vec![TypeSymbol::class("Order", Some("Shop"))]),
                model("Legacy", vec![TypeSymbol::class("Order", Some("Shop"))]),
            ],
            NamePolicy::Strict,
        );
        match result {
            Err(Error::AmbiguousSymbol { key, projects }) => {
                assert_eq!(key, "Shop.Order");
                assert_eq!(projects, vec!["Api".to_string(), "Legacy".to_string()]);
            }
            _ => panic!("Expected AmbiguousSymbol error"),
        }
    }

    #[test]
    fn test_shadowing_is_deterministic() {
        let types = vec![
            TypeSymbol::class("Order", Some("Shop.Sales")),
            TypeSymbol::class("Order", Some("Shop.Billing")),
        ];
        let lenient = SymbolIndex::build(vec![model("Api", types.clone())], NamePolicy::FirstWins).unwrap();
        match lenient.lookup("Order") {
            ResolvedType::Symbol(found) => assert_eq!(found.key, "Shop.Sales.Order"),
            other => panic!("Expected symbol, got {:?}", other),
        }

        let strict = SymbolIndex::build(vec![model("Api", types)], NamePolicy::Strict).unwrap();
        match strict.lookup("Order") {
            ResolvedType::Ambiguous(keys) => assert_eq!(keys.len(), 2),
            other => panic!("Expected ambiguity, got {:?}", other),
        }
        assert!(matches!(strict.lookup("Billing.Order"), ResolvedType::Symbol(_)));
    }

    #[test]
    fn test_primitive_fallback() {
        let index = SymbolIndex::build(Vec::new(), NamePolicy::FirstWins).unwrap();
        assert!(index.is_empty());
        let cases = [
            ("int", PrimitiveKind::Integer),
            ("bool", PrimitiveKind::Boolean),
            ("string", PrimitiveKind::String),
            ("DateTime", PrimitiveKind::DateTime),
            ("decimal", PrimitiveKind::Decimal),
            ("double", PrimitiveKind::Float),
            ("System.Int64", PrimitiveKind::Integer),
            ("IFormFile", PrimitiveKind::Opaque),
        ];
        for (name, expected) in cases {
            match index.lookup(name) {
                ResolvedType::Primitive(kind) => assert_eq!(kind, expected, "for {}", name),
                other => panic!("Expected primitive for {}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_declared_type_shadows_primitive_name() {
        let index = SymbolIndex::build(
            vec![model("Api", vec![TypeSymbol::class("DateTime", Some("Shop.Custom"))])],
            NamePolicy::FirstWins,
        )
        .unwrap();
        assert!(matches!(index.lookup("DateTime"), ResolvedType::Symbol(_)));
    }

    #[test]
    fn test_unresolved() {
        let index = SymbolIndex::build(Vec::new(), NamePolicy::FirstWins).unwrap();
        assert!(matches!(index.lookup("Missing"), ResolvedType::Unresolved));
        assert!(matches!(
            index.resolve(&TypeRef::simple("Missing")),
            ResolvedType::Unresolved
        ));
    }
}
