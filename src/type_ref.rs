//! Textual type references.
//!
//! A [`TypeRef`] is a type as written in source (`List<Order>`, `int?`, `Order[]`,
//! `System.Collections.Generic.IEnumerable<Customer>`), parsed into a small tree so the
//! classifier and synthesizer can work on heads and arguments instead of on raw strings.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// A parsed type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Head name as written, possibly qualified (`Models.Order`)
    pub name: String,
    /// Generic arguments in order
    pub args: Vec<TypeRef>,
    /// Trailing `?`
    pub nullable: bool,
    /// Number of `[]` suffixes
    pub array_rank: usize,
}

impl TypeRef {
    /// A non-generic, non-array reference
    pub fn simple(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
            nullable: false,
            array_rank: 0,
        }
    }

    /// A generic reference `name<args>`
    pub fn generic(name: &str, args: Vec<TypeRef>) -> Self {
        Self {
            args,
            ..Self::simple(name)
        }
    }

    /// Parse a type reference. Tuples, pointers and unbalanced brackets are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let mut cursor = Cursor::new(input);
        let parsed = cursor.parse_type()?;
        cursor.skip_whitespace();
        if !cursor.at_end() {
            return Err(cursor.error("unexpected trailing input"));
        }
        Ok(parsed)
    }

    /// Last segment of the head name (`Order` for `Shop.Models.Order`)
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn is_array(&self) -> bool {
        self.array_rank > 0
    }

    /// Element type of an array reference
    pub fn element(&self) -> Option<TypeRef> {
        if self.array_rank == 0 {
            return None;
        }
        let mut element = self.clone();
        element.array_rank -= 1;
        element.nullable = false;
        Some(element)
    }

    pub fn first_arg(&self) -> Option<&TypeRef> {
        self.args.first()
    }

    /// Replace type parameters by their bound arguments
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeRef {
        if bindings.is_empty() {
            return self.clone();
        }
        if self.args.is_empty() {
            if let Some(bound) = bindings.get(&self.name) {
                let mut result = bound.clone();
                result.array_rank += self.array_rank;
                result.nullable |= self.nullable;
                return result;
            }
        }
        TypeRef {
            name: self.name.clone(),
            args: self.args.iter().map(|arg| arg.substitute(bindings)).collect(),
            nullable: self.nullable,
            array_rank: self.array_rank,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        for _ in 0..self.array_rank {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

struct Cursor<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::MalformedTypeRef {
            input: self.input.to_string(),
            message: format!("{} at offset {}", message, self.pos),
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef> {
        let name = self.parse_name()?;
        let mut type_ref = TypeRef::simple(&name);

        if self.eat('<') {
            loop {
                type_ref.args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(self.error("expected `,` or `>`"));
            }
        }

        loop {
            if self.eat('?') {
                type_ref.nullable = true;
            } else if self.eat('[') {
                while self.eat(',') {}
                if !self.eat(']') {
                    return Err(self.error("expected `]`"));
                }
                type_ref.array_rank += 1;
            } else {
                break;
            }
        }

        Ok(type_ref)
    }

    fn parse_name(&mut self) -> Result<String> {
        let mut name = self.parse_identifier()?;
        loop {
            self.skip_whitespace();
            if self.peek() == Some('.') {
                self.pos += 1;
            } else if self.peek() == Some(':') && self.chars.get(self.pos + 1) == Some(&':') {
                self.pos += 2;
                // `global::` carries no information for name matching
                if name == "global" {
                    name = self.parse_identifier()?;
                    continue;
                }
            } else {
                break;
            }
            let segment = self.parse_identifier()?;
            name.push('.');
            name.push_str(&segment);
        }
        Ok(name)
    }

    fn parse_identifier(&mut self) -> Result<String> {
        self.skip_whitespace();
        if self.peek() == Some('@') {
            self.pos += 1;
        }
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        if start == self.pos || self.chars[start].is_ascii_digit() {
            return Err(self.error("expected identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let parsed = TypeRef::parse("int").unwrap();
        assert_eq!(parsed, TypeRef::simple("int"));
    }

    #[test]
    fn test_parse_nested_generics() {
        let parsed = TypeRef::parse("Task<ActionResult<List<Customer>>>").unwrap();
        assert_eq!(parsed.name, "Task");
        let action = parsed.first_arg().unwrap();
        assert_eq!(action.name, "ActionResult");
        let list = action.first_arg().unwrap();
        assert_eq!(list.name, "List");
        assert_eq!(list.first_arg().unwrap().name, "Customer");
    }

    #[test]
    fn test_parse_multiple_arguments_and_whitespace() {
        let parsed = TypeRef::parse(" Dictionary < string , List<Order> > ").unwrap();
        assert_eq!(parsed.args.len(), 2);
        assert_eq!(parsed.to_string(), "Dictionary<string, List<Order>>");
    }

    #[test]
    fn test_parse_qualified_and_global() {
        let parsed = TypeRef::parse("global::System.Collections.Generic.List<Shop.Order>").unwrap();
        assert_eq!(parsed.name, "System.Collections.Generic.List");
        assert_eq!(parsed.simple_name(), "List");
        assert_eq!(parsed.first_arg().unwrap().simple_name(), "Order");
    }

    #[test]
    fn test_parse_nullable_and_arrays() {
        let parsed = TypeRef::parse("int?").unwrap();
        assert!(parsed.nullable);

        let parsed = TypeRef::parse("Order[][]").unwrap();
        assert_eq!(parsed.array_rank, 2);
        let element = parsed.element().unwrap();
        assert_eq!(element.array_rank, 1);

        let parsed = TypeRef::parse("int[,]").unwrap();
        assert_eq!(parsed.array_rank, 1);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(TypeRef::parse("").is_err());
        assert!(TypeRef::parse("List<Order").is_err());
        assert!(TypeRef::parse("(int, string)").is_err());
        assert!(TypeRef::parse("List<Order>>").is_err());
        assert!(matches!(
            TypeRef::parse("Order*"),
            Err(Error::MalformedTypeRef { .. })
        ));
    }

    #[test]
    fn test_substitute_type_parameters() {
        let mut bindings = HashMap::new();
        bindings.insert("T".to_string(), TypeRef::simple("Order"));

        let items = TypeRef::parse("List<T>").unwrap().substitute(&bindings);
        assert_eq!(items.to_string(), "List<Order>");

        let array = TypeRef::parse("T[]").unwrap().substitute(&bindings);
        assert_eq!(array.to_string(), "Order[]");

        let untouched = TypeRef::parse("Tag").unwrap().substitute(&bindings);
        assert_eq!(untouched.to_string(), "Tag");
    }
}
