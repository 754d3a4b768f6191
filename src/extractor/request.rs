//! Request side of an endpoint: parameter descriptions and the request example.

use crate::config::RequestMode;
use crate::report::{EndpointParameter, Resolution};
use crate::schema_generator::{ExampleValue, SchemaGenerator};
use crate::symbols::ParameterDecl;
use crate::type_classifier::{TypeClass, TypeClassifier};
use crate::type_ref::TypeRef;
use crate::type_resolver::SymbolIndex;
use log::debug;

/// Where a parameter is bound from, as declared by its binding attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSource {
    Body,
    Route,
    Query,
    Header,
    Services,
    Form,
    /// No binding attribute
    Inferred,
}

impl BindingSource {
    pub fn of(parameter: &ParameterDecl) -> Self {
        parameter
            .attributes
            .iter()
            .find_map(|a| match a.name.as_str() {
                "FromBody" => Some(BindingSource::Body),
                "FromRoute" => Some(BindingSource::Route),
                "FromQuery" => Some(BindingSource::Query),
                "FromHeader" => Some(BindingSource::Header),
                "FromServices" => Some(BindingSource::Services),
                "FromForm" => Some(BindingSource::Form),
                _ => None,
            })
            .unwrap_or(BindingSource::Inferred)
    }
}

/// Whether a parameter carries the request payload.
///
/// `FromBody` always does and the other binding attributes never do. An unattributed
/// parameter does unless its type is primitive.
pub fn is_payload(parameter: &ParameterDecl, classifier: &TypeClassifier) -> bool {
    match BindingSource::of(parameter) {
        BindingSource::Body => true,
        BindingSource::Inferred => match TypeRef::parse(&parameter.type_ref) {
            Ok(type_ref) => !matches!(classifier.classify(&type_ref), TypeClass::Primitive(_)),
            Err(_) => false,
        },
        _ => false,
    }
}

/// Describe every parameter with what its type resolves to. Collection and wrapper layers
/// are looked through.
pub fn describe_parameters(
    index: &SymbolIndex,
    classifier: &TypeClassifier,
    parameters: &[ParameterDecl],
) -> Vec<EndpointParameter> {
    parameters
        .iter()
        .map(|parameter| EndpointParameter {
            name: parameter.name.clone(),
            type_ref: parameter.type_ref.clone(),
            resolution: resolve_parameter(index, classifier, &parameter.type_ref),
        })
        .collect()
}

fn resolve_parameter(index: &SymbolIndex, classifier: &TypeClassifier, type_ref: &str) -> Resolution {
    let type_ref = match TypeRef::parse(type_ref) {
        Ok(type_ref) => type_ref,
        Err(e) => {
            debug!("{}", e);
            return Resolution::Unresolved;
        }
    };
    match classifier.terminal(&type_ref) {
        TypeClass::Primitive(kind) => Resolution::Primitive { primitive: kind },
        TypeClass::Plain(plain) => Resolution::from(&index.resolve(&plain)),
        TypeClass::Collection(_) | TypeClass::Wrapped(_) => Resolution::Unresolved,
    }
}

/// Build the request example from the payload parameters.
///
/// Only payload parameters whose type resolves contribute. With [`RequestMode::LastWins`]
/// the last of them is the example; with [`RequestMode::Merge`] they form one object keyed
/// by parameter name. Without any, the example is `{}`.
pub fn request_example(
    generator: &SchemaGenerator<'_>,
    classifier: &TypeClassifier,
    parameters: &[ParameterDecl],
    mode: RequestMode,
) -> ExampleValue {
    let mut payloads: Vec<(String, ExampleValue)> = parameters
        .iter()
        .filter(|p| is_payload(p, classifier))
        .filter_map(|p| {
            let type_ref = TypeRef::parse(&p.type_ref).ok()?;
            let example = generator.try_synthesize(&type_ref);
            if example.is_none() {
                debug!("Skipping unresolved payload parameter {}: {}", p.name, p.type_ref);
            }
            example.map(|e| (p.name.clone(), e))
        })
        .collect();

    match mode {
        RequestMode::LastWins => payloads
            .pop()
            .map(|(_, example)| example)
            .unwrap_or_else(ExampleValue::empty_object),
        RequestMode::Merge => ExampleValue::Object(payloads),
    }
}
