use crate::config::GeneratorConfig;
use crate::symbols::TypeKind;
use crate::type_classifier::{TypeClass, TypeClassifier};
use crate::type_ref::TypeRef;
use crate::type_resolver::{PrimitiveKind, ResolvedSymbol, ResolvedType, SymbolIndex};
use log::{debug, warn};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A synthesized example value.
///
/// Objects keep their fields in member order and may repeat a key: a derived type that
/// redeclares a base property shows both, so this is not a `serde_json::Value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleValue {
    /// A JSON literal, already encoded (`true`, `0`, `"string"`)
    Literal(String),
    Object(Vec<(String, ExampleValue)>),
    /// A one-element array
    Array(Box<ExampleValue>),
}

impl ExampleValue {
    pub fn empty_object() -> Self {
        ExampleValue::Object(Vec::new())
    }

    pub fn string(value: &str) -> Self {
        ExampleValue::Literal(Value::String(value.to_string()).to_string())
    }

    /// Render as JSON text: `{"Id": 0, "Name": "string"}`, `[{...}]`, `{}`
    pub fn to_json(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ExampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExampleValue::Literal(raw) => write!(f, "{}", raw),
            ExampleValue::Object(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", Value::String(name.clone()), value)?;
                }
                write!(f, "}}")
            }
            ExampleValue::Array(inner) => write!(f, "[{}]", inner),
        }
    }
}

/// Schema generator - expands resolved types into canonical example values.
///
/// Expansion follows the inheritance chain of object types, binds generic parameters to
/// their arguments and cuts any branch that re-enters a type already being expanded on
/// the current path.
pub struct SchemaGenerator<'a> {
    index: &'a SymbolIndex,
    classifier: &'a TypeClassifier,
    config: &'a GeneratorConfig,
}

/// Member of an object type with its (bound) type, `None` when the declared type text
/// could not be parsed
type Member = (String, Option<TypeRef>);

impl<'a> SchemaGenerator<'a> {
    pub fn new(index: &'a SymbolIndex, classifier: &'a TypeClassifier, config: &'a GeneratorConfig) -> Self {
        Self {
            index,
            classifier,
            config,
        }
    }

    /// Synthesize an example from a type reference as written. Never fails: malformed and
    /// unresolved references give `{}`.
    pub fn synthesize_str(&self, type_ref: &str) -> ExampleValue {
        match TypeRef::parse(type_ref) {
            Ok(parsed) => self.synthesize(&parsed),
            Err(e) => {
                debug!("{}", e);
                ExampleValue::empty_object()
            }
        }
    }

    pub fn synthesize(&self, type_ref: &TypeRef) -> ExampleValue {
        self.try_synthesize(type_ref)
            .unwrap_or_else(ExampleValue::empty_object)
    }

    /// Like [`synthesize`](Self::synthesize) but reports unresolved types as `None`
    pub fn try_synthesize(&self, type_ref: &TypeRef) -> Option<ExampleValue> {
        let mut active = Vec::new();
        self.expand(type_ref, &mut active, 0)
    }

    /// The fixed example for a primitive kind
    pub fn primitive_example(&self, kind: PrimitiveKind) -> ExampleValue {
        match kind {
            PrimitiveKind::Boolean => ExampleValue::Literal("true".to_string()),
            PrimitiveKind::String => ExampleValue::string("string"),
            PrimitiveKind::Integer | PrimitiveKind::Decimal | PrimitiveKind::Float => {
                ExampleValue::Literal("0".to_string())
            }
            PrimitiveKind::DateTime => ExampleValue::string(&self.config.date_example),
            PrimitiveKind::Opaque => ExampleValue::empty_object(),
        }
    }

    fn expand(&self, type_ref: &TypeRef, active: &mut Vec<String>, depth: usize) -> Option<ExampleValue> {
        if depth >= self.config.max_depth {
            warn!("Maximum expansion depth reached at {}", type_ref);
            return Some(ExampleValue::empty_object());
        }

        match self.classifier.classify(type_ref) {
            TypeClass::Primitive(kind) => Some(self.primitive_example(kind)),
            TypeClass::Collection(inner) => {
                let item = self
                    .expand(&inner, active, depth + 1)
                    .unwrap_or_else(ExampleValue::empty_object);
                Some(ExampleValue::Array(Box::new(item)))
            }
            TypeClass::Wrapped(inner) => self.expand(&inner, active, depth + 1),
            TypeClass::Plain(plain) => self.expand_plain(&plain, active, depth),
        }
    }

    fn expand_plain(&self, type_ref: &TypeRef, active: &mut Vec<String>, depth: usize) -> Option<ExampleValue> {
        match self.index.resolve(type_ref) {
            ResolvedType::Primitive(kind) => Some(self.primitive_example(kind)),
            ResolvedType::Symbol(found) => Some(self.expand_symbol(&found, &type_ref.args, active, depth)),
            ResolvedType::Ambiguous(_) | ResolvedType::Unresolved => {
                // An unknown generic head carries its payload in the first argument
                let first = type_ref.first_arg()?;
                debug!("Unwrapping unknown generic {} to {}", type_ref.name, first);
                self.expand(first, active, depth + 1)
            }
        }
    }

    fn expand_symbol(
        &self,
        found: &ResolvedSymbol<'_>,
        args: &[TypeRef],
        active: &mut Vec<String>,
        depth: usize,
    ) -> ExampleValue {
        if found.symbol.kind == TypeKind::Enum {
            return ExampleValue::Literal("0".to_string());
        }

        // Any re-entry of a declaration on the current path is a cycle, whatever its
        // type arguments
        if active.iter().any(|key| key == found.key) {
            debug!("Cycle detected at {}, cutting branch", found.key);
            return ExampleValue::empty_object();
        }

        active.push(found.key.to_string());
        let fields = self
            .collect_members(found, args)
            .into_iter()
            .map(|(name, type_ref)| {
                let value = type_ref
                    .and_then(|t| self.expand(&t, active, depth + 1))
                    .unwrap_or_else(ExampleValue::empty_object);
                (name, value)
            })
            .collect();
        active.pop();

        ExampleValue::Object(fields)
    }

    /// Gather properties from the most-derived type up through its base classes. Names are
    /// not de-duplicated across levels.
    fn collect_members(&self, found: &ResolvedSymbol<'_>, args: &[TypeRef]) -> Vec<Member> {
        let mut members = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some((*found, bind_parameters(&found.symbol.type_parameters, args)));

        while let Some((level, bindings)) = current {
            if !visited.insert(level.key) {
                warn!("Inheritance cycle through {}", level.key);
                break;
            }

            for property in &level.symbol.properties {
                let type_ref = TypeRef::parse(&property.type_ref)
                    .map(|t| t.substitute(&bindings))
                    .map_err(|e| debug!("{}", e))
                    .ok();
                members.push((property.name.clone(), type_ref));
            }

            current = level
                .symbol
                .base_type
                .as_deref()
                .and_then(|base| TypeRef::parse(base).ok())
                .map(|base| base.substitute(&bindings))
                .and_then(|base| match self.index.resolve(&base) {
                    ResolvedType::Symbol(parent) => {
                        let bindings = bind_parameters(&parent.symbol.type_parameters, &base.args);
                        Some((parent, bindings))
                    }
                    _ => None,
                });
        }

        members
    }
}

fn bind_parameters(parameters: &[String], args: &[TypeRef]) -> HashMap<String, TypeRef> {
    parameters.iter().cloned().zip(args.iter().cloned()).collect()
}
