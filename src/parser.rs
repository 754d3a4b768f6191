use crate::config::GeneratorConfig;
use crate::error::Error;
use crate::symbols::{
    normalize_attribute_name, unquote, AttributeArgument, AttributeDecl, ControllerDecl, MethodDecl,
    ParameterDecl, ParsedFile, PropertySymbol, TypeKind, TypeSymbol,
};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Declaration parser for C# source files.
///
/// The `CSharpParser` uses tree-sitter to build a syntax tree and walks it for the
/// declarations the generator needs: types with their properties and base classes, and
/// controllers with their routed methods. Method bodies are never inspected.
///
/// tree-sitter recovers from syntax errors, so a file with errors still yields every
/// declaration that could be recognised.
///
/// # Example
///
/// ```no_run
/// use apidoc_from_source::config::GeneratorConfig;
/// use apidoc_from_source::parser::CSharpParser;
/// use std::path::Path;
///
/// let mut parser = CSharpParser::new(&GeneratorConfig::default()).unwrap();
/// let parsed = parser.parse_file(Path::new("Api/Controllers/OrdersController.cs")).unwrap();
/// println!("Found {} types, {} controllers", parsed.types.len(), parsed.controllers.len());
/// ```
pub struct CSharpParser {
    parser: Parser,
    controller_bases: Vec<String>,
}

impl CSharpParser {
    /// Creates a parser; classes deriving from one of the configured controller base
    /// types are reported as controllers.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .context("Failed to load the C# grammar")?;
        Ok(Self {
            parser,
            controller_bases: config.controller_base_types.clone(),
        })
    }

    /// Parses a single C# source file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or no syntax tree can be produced.
    pub fn parse_file(&mut self, path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let parsed = self
            .parse_source(path, &content)
            .with_context(|| format!("Failed to parse C# file: {}", path.display()))?;

        debug!(
            "Parsed {}: {} types, {} controllers",
            path.display(),
            parsed.types.len(),
            parsed.controllers.len()
        );
        Ok(parsed)
    }

    /// Parses multiple files, continuing past failures.
    ///
    /// Files that fail are logged as warnings and returned as errors in their slot, so the
    /// caller can still work with every file that did parse.
    pub fn parse_files(&mut self, paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        let mut results = Vec::with_capacity(paths.len());
        let mut failures = 0;

        for path in paths {
            let result = self.parse_file(path);
            if let Err(e) = &result {
                warn!("Skipping {}: {:#}", path.display(), e);
                failures += 1;
            }
            results.push(result);
        }

        if failures > 0 {
            debug!("{} of {} files failed to parse", failures, paths.len());
        }
        results
    }

    /// Parses C# source text; `path` is recorded on the declarations it yields
    pub fn parse_source(&mut self, path: &Path, source: &str) -> crate::error::Result<ParsedFile> {
        let tree = self.parser.parse(source, None).ok_or_else(|| Error::ParseError {
            file: path.to_path_buf(),
            message: "parser produced no syntax tree".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            warn!(
                "Syntax errors in {}, keeping the declarations that could be recognised",
                path.display()
            );
        }

        let mut visitor = DeclarationVisitor {
            source,
            path,
            controller_bases: &self.controller_bases,
            output: ParsedFile {
                path: path.to_path_buf(),
                ..ParsedFile::default()
            },
        };
        visitor.visit_children(root, "");
        Ok(visitor.output)
    }
}

struct DeclarationVisitor<'a> {
    source: &'a str,
    path: &'a Path,
    controller_bases: &'a [String],
    output: ParsedFile,
}

impl DeclarationVisitor<'_> {
    fn visit_children(&mut self, node: Node<'_>, namespace: &str) {
        // A file-scoped namespace applies to every declaration after it
        let mut namespace = namespace.to_string();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "file_scoped_namespace_declaration" {
                namespace = join_namespace(&namespace, &self.field_text(child, "name"));
                self.visit_children(child, &namespace);
                continue;
            }
            self.visit(child, &namespace);
        }
    }

    fn visit(&mut self, node: Node<'_>, namespace: &str) {
        match node.kind() {
            "namespace_declaration" => {
                let namespace = join_namespace(namespace, &self.field_text(node, "name"));
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_children(body, &namespace);
                }
            }
            "class_declaration" => self.visit_type(node, namespace, TypeKind::Class),
            "struct_declaration" => self.visit_type(node, namespace, TypeKind::Struct),
            "record_declaration" => self.visit_type(node, namespace, TypeKind::Record),
            "interface_declaration" => self.visit_type(node, namespace, TypeKind::Interface),
            "enum_declaration" => self.visit_type(node, namespace, TypeKind::Enum),
            // Error recovery may wrap intact declarations
            "ERROR" => self.visit_children(node, namespace),
            _ => {}
        }
    }

    fn visit_type(&mut self, node: Node<'_>, namespace: &str, kind: TypeKind) {
        let name = self.field_text(node, "name");
        if name.is_empty() {
            return;
        }

        let is_enum = kind == TypeKind::Enum;
        let bases = if is_enum { Vec::new() } else { self.base_list(node) };
        let symbol = TypeSymbol {
            name,
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            kind,
            base_type: base_class(kind, &bases),
            type_parameters: self.type_parameters(node),
            properties: if is_enum { Vec::new() } else { self.properties(node, kind) },
            enum_members: if is_enum { self.enum_members(node) } else { Vec::new() },
        };

        if kind == TypeKind::Class && bases.iter().any(|b| self.is_controller_base(b)) {
            let controller = self.controller(node, &symbol);
            debug!(
                "Found controller {} with {} methods",
                controller.name,
                controller.methods.len()
            );
            self.output.controllers.push(controller);
        }
        self.output.types.push(symbol);

        // Nested types share the enclosing namespace
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                self.visit(child, namespace);
            }
        }
    }

    fn controller(&self, node: Node<'_>, symbol: &TypeSymbol) -> ControllerDecl {
        let route_template = self
            .attributes(node)
            .iter()
            .find(|a| a.name == "Route")
            .and_then(AttributeDecl::first_positional)
            .map(unquote);

        let mut methods = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                if child.kind() == "method_declaration" {
                    methods.extend(self.method(child));
                }
            }
        }

        ControllerDecl {
            name: symbol.name.clone(),
            namespace: symbol.namespace.clone(),
            file_path: self.path.to_path_buf(),
            route_template,
            methods,
        }
    }

    fn method(&self, node: Node<'_>) -> Option<MethodDecl> {
        let name = self.field_text(node, "name");
        if name.is_empty() {
            return None;
        }
        let return_type = node
            .child_by_field_name("returns")
            .or_else(|| node.child_by_field_name("type"))
            .map(|n| self.text(n))
            .unwrap_or_default();
        let parameters = node
            .child_by_field_name("parameters")
            .map(|list| self.parameters(list))
            .unwrap_or_default();

        Some(MethodDecl {
            name,
            return_type,
            parameters,
            attributes: self.attributes(node),
        })
    }

    fn parameters(&self, list: Node<'_>) -> Vec<ParameterDecl> {
        let mut parameters = Vec::new();
        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            if child.kind() != "parameter" {
                continue;
            }
            let name = self.field_text(child, "name");
            if name.is_empty() {
                continue;
            }
            parameters.push(ParameterDecl {
                name,
                type_ref: self.field_text(child, "type"),
                attributes: self.attributes(child),
            });
        }
        parameters
    }

    /// Declared non-static properties, preceded by the positional parameters of a record
    fn properties(&self, node: Node<'_>, kind: TypeKind) -> Vec<PropertySymbol> {
        let mut properties = Vec::new();

        let positional = match kind {
            TypeKind::Record => self.child_of_kind(node, "parameter_list"),
            _ => None,
        };
        if let Some(list) = positional {
            for parameter in self.parameters(list) {
                properties.push(PropertySymbol {
                    name: parameter.name,
                    type_ref: parameter.type_ref,
                });
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                if child.kind() != "property_declaration" || self.has_modifier(child, "static") {
                    continue;
                }
                let name = self.field_text(child, "name");
                if name.is_empty() {
                    continue;
                }
                properties.push(PropertySymbol {
                    name,
                    type_ref: self.field_text(child, "type"),
                });
            }
        }
        properties
    }

    fn enum_members(&self, node: Node<'_>) -> Vec<String> {
        let Some(body) = node.child_by_field_name("body") else {
            return Vec::new();
        };
        let mut members = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if child.kind() == "enum_member_declaration" {
                let name = self.field_text(child, "name");
                if !name.is_empty() {
                    members.push(name);
                }
            }
        }
        members
    }

    fn type_parameters(&self, node: Node<'_>) -> Vec<String> {
        let Some(list) = self.child_of_kind(node, "type_parameter_list") else {
            return Vec::new();
        };
        let mut params = Vec::new();
        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            if child.kind() != "type_parameter" {
                continue;
            }
            let name = match child.child_by_field_name("name") {
                Some(name) => self.text(name),
                None => self.text(child),
            };
            if !name.is_empty() {
                params.push(name);
            }
        }
        params
    }

    fn base_list(&self, node: Node<'_>) -> Vec<String> {
        let mut bases = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "base_list" {
                continue;
            }
            let mut base_cursor = child.walk();
            for base in child.named_children(&mut base_cursor) {
                let text = match base.kind() {
                    "argument_list" => continue,
                    "primary_constructor_base_type" => match base.child_by_field_name("type") {
                        Some(type_node) => self.text(type_node),
                        None => self.text(base),
                    },
                    _ => self.text(base),
                };
                if !text.is_empty() {
                    bases.push(text);
                }
            }
        }
        bases
    }

    fn attributes(&self, node: Node<'_>) -> Vec<AttributeDecl> {
        let mut attributes = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "attribute_list" {
                continue;
            }
            let mut list_cursor = child.walk();
            for attr in child.named_children(&mut list_cursor) {
                if attr.kind() != "attribute" {
                    continue;
                }
                let raw_name = self.field_text(attr, "name");
                if raw_name.is_empty() {
                    continue;
                }
                attributes.push(AttributeDecl {
                    name: normalize_attribute_name(&raw_name),
                    arguments: self.attribute_arguments(attr),
                });
            }
        }
        attributes
    }

    fn attribute_arguments(&self, attr: Node<'_>) -> Vec<AttributeArgument> {
        let Some(list) = self.child_of_kind(attr, "attribute_argument_list") else {
            return Vec::new();
        };
        let mut arguments = Vec::new();
        let mut cursor = list.walk();
        for arg in list.named_children(&mut cursor) {
            if arg.kind() != "attribute_argument" {
                continue;
            }
            let mut arg_cursor = arg.walk();
            let parts: Vec<Node<'_>> = arg.named_children(&mut arg_cursor).collect();
            let argument = match parts.as_slice() {
                // `name: value` keeps the name as a separate identifier
                [name, value] => AttributeArgument {
                    name: Some(self.text(*name)),
                    value: self.text(*value),
                },
                // `Name = value` parses as an assignment
                [expr] if expr.kind() == "assignment_expression" => AttributeArgument {
                    name: Some(self.field_text(*expr, "left")),
                    value: self.field_text(*expr, "right"),
                },
                [expr] => AttributeArgument {
                    name: None,
                    value: self.text(*expr),
                },
                _ => continue,
            };
            arguments.push(argument);
        }
        arguments
    }

    fn has_modifier(&self, node: Node<'_>, modifier: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .any(|child| child.kind() == "modifier" && self.text(child) == modifier);
        found
    }

    fn is_controller_base(&self, base: &str) -> bool {
        let simple = simple_type_name(base);
        self.controller_bases.iter().any(|b| b == simple)
    }

    fn child_of_kind<'t>(&self, node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        let found = node.named_children(&mut cursor).find(|child| child.kind() == kind);
        found
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.text(n))
            .unwrap_or_default()
    }

    fn text(&self, node: Node<'_>) -> String {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
            .trim()
            .to_string()
    }
}

fn join_namespace(outer: &str, inner: &str) -> String {
    let inner = inner.replace("::", ".");
    match (outer.is_empty(), inner.is_empty()) {
        (_, true) => outer.to_string(),
        (true, false) => inner,
        (false, false) => format!("{}.{}", outer, inner),
    }
}

/// Name without namespace qualifier or type arguments
fn simple_type_name(type_text: &str) -> &str {
    let head = type_text.split('<').next().unwrap_or(type_text).trim();
    head.rsplit('.').next().unwrap_or(head)
}

/// Interfaces follow the `I` + uppercase naming convention
fn looks_like_interface(type_text: &str) -> bool {
    let mut chars = simple_type_name(type_text).chars();
    matches!((chars.next(), chars.next()), (Some('I'), Some(c)) if c.is_ascii_uppercase())
}

/// The base class of a class or record: the first base-list entry that is not an interface
fn base_class(kind: TypeKind, bases: &[String]) -> Option<String> {
    match kind {
        TypeKind::Class | TypeKind::Record => bases.iter().find(|b| !looks_like_interface(b)).cloned(),
        _ => None,
    }
}
