//! Symbol model - the declaration-level view of a project's source code.
//!
//! The resolution engine never looks at source text. It consumes the types in this module,
//! which the [`parser`](crate::parser) fills from C# files but which can equally be built by
//! hand (the unit tests do exactly that).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Record,
    Interface,
    Enum,
}

/// A named type declared in a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    /// Simple name without namespace or type parameters (e.g. "Order")
    pub name: String,
    /// Enclosing namespace, if the type is declared inside one
    pub namespace: Option<String>,
    /// What kind of declaration this is
    pub kind: TypeKind,
    /// Base class reference as written (e.g. "EntityBase<Guid>")
    pub base_type: Option<String>,
    /// Declared type parameters for generic types (e.g. ["T"])
    pub type_parameters: Vec<String>,
    /// Declared instance properties in declaration order
    pub properties: Vec<PropertySymbol>,
    /// Member names for enums
    pub enum_members: Vec<String>,
}

/// A declared instance property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySymbol {
    pub name: String,
    /// The property type as written in source
    pub type_ref: String,
}

impl TypeSymbol {
    /// Create an empty class symbol
    pub fn class(name: &str, namespace: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            kind: TypeKind::Class,
            base_type: None,
            type_parameters: Vec::new(),
            properties: Vec::new(),
            enum_members: Vec::new(),
        }
    }

    /// Builder-style helper appending a property
    pub fn with_property(mut self, name: &str, type_ref: &str) -> Self {
        self.properties.push(PropertySymbol {
            name: name.to_string(),
            type_ref: type_ref.to_string(),
        });
        self
    }

    /// Builder-style helper setting the base type
    pub fn with_base(mut self, base_type: &str) -> Self {
        self.base_type = Some(base_type.to_string());
        self
    }

    /// Builder-style helper setting the type parameters
    pub fn with_type_parameters(mut self, params: &[&str]) -> Self {
        self.type_parameters = params.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Index key: `namespace.name`, or the bare name outside any namespace
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }
}

/// An attribute applied to a declaration, e.g. `[HttpGet("{id}")]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    /// Attribute name normalised without namespace and `Attribute` suffix
    pub name: String,
    pub arguments: Vec<AttributeArgument>,
}

/// One attribute argument, raw text kept exactly as captured (quotes included)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeArgument {
    /// Set for named arguments (`Name = "x"` or `name: "x"`)
    pub name: Option<String>,
    pub value: String,
}

impl AttributeDecl {
    pub fn new(name: &str, positional: &[&str]) -> Self {
        Self {
            name: normalize_attribute_name(name),
            arguments: positional
                .iter()
                .map(|value| AttributeArgument {
                    name: None,
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    /// First positional argument, raw
    pub fn first_positional(&self) -> Option<&str> {
        self.arguments
            .iter()
            .find(|arg| arg.name.is_none())
            .map(|arg| arg.value.as_str())
    }
}

/// Drop any namespace qualifier and a trailing `Attribute` suffix
pub fn normalize_attribute_name(raw: &str) -> String {
    let name = raw.rsplit('.').next().unwrap_or(raw).trim();
    match name.strip_suffix("Attribute") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => name.to_string(),
    }
}

/// Strip one pair of surrounding double quotes (and a verbatim `@` prefix)
pub fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);
    trimmed.trim_matches('"').to_string()
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDecl {
    pub name: String,
    pub type_ref: String,
    pub attributes: Vec<AttributeDecl>,
}

/// A method declared on a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<ParameterDecl>,
    pub attributes: Vec<AttributeDecl>,
}

/// A controller class with its routing metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDecl {
    pub name: String,
    pub namespace: Option<String>,
    pub file_path: PathBuf,
    /// Class-level `[Route]` template, unquoted
    pub route_template: Option<String>,
    pub methods: Vec<MethodDecl>,
}

/// Declarations extracted from one source file
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub types: Vec<TypeSymbol>,
    pub controllers: Vec<ControllerDecl>,
}

/// All declared types of one project, merged across its files
#[derive(Debug, Clone, Default)]
pub struct SymbolModel {
    pub project: String,
    pub types: Vec<TypeSymbol>,
}

impl SymbolModel {
    pub fn new(project: &str, types: Vec<TypeSymbol>) -> Self {
        Self {
            project: project.to_string(),
            types,
        }
    }

    /// Merge parsed files of one project, keeping file and declaration order
    pub fn from_files(project: &str, files: &[ParsedFile]) -> Self {
        let types = files.iter().flat_map(|f| f.types.iter().cloned()).collect();
        Self::new(project, types)
    }
}

/// A project's symbol model together with the controllers declared in it
#[derive(Debug, Clone, Default)]
pub struct ProjectSources {
    pub model: SymbolModel,
    pub controllers: Vec<ControllerDecl>,
}

impl ProjectSources {
    pub fn from_files(project: &str, files: &[ParsedFile]) -> Self {
        Self {
            model: SymbolModel::from_files(project, files),
            controllers: files.iter().flat_map(|f| f.controllers.iter().cloned()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.model.project
    }
}
