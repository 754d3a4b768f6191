//! Report model - the documented endpoints of one application, grouped by project and
//! controller in discovery order.

use crate::type_resolver::{PrimitiveKind, ResolvedType};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A documented HTTP endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Name of the controller method
    pub method_name: String,
    /// Verb attribute name as written (e.g. "HttpGet")
    pub http_method: String,
    /// Fully composed route, empty when nothing could be composed
    pub route: String,
    pub parameters: Vec<EndpointParameter>,
    /// JSON example of the request payload, `{}` when there is none
    pub request_example: String,
    /// JSON example of the response payload, `{}` when it cannot be determined
    pub response_example: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointParameter {
    pub name: String,
    /// Declared type as written
    pub type_ref: String,
    pub resolution: Resolution,
}

/// What a parameter's type resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Primitive { primitive: PrimitiveKind },
    Symbol { qualified_name: String, project: String },
    Unresolved,
}

impl From<&ResolvedType<'_>> for Resolution {
    fn from(resolved: &ResolvedType<'_>) -> Self {
        match resolved {
            ResolvedType::Primitive(kind) => Resolution::Primitive { primitive: *kind },
            ResolvedType::Symbol(found) => Resolution::Symbol {
                qualified_name: found.key.to_string(),
                project: found.model.project.clone(),
            },
            ResolvedType::Ambiguous(_) | ResolvedType::Unresolved => Resolution::Unresolved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerReport {
    pub controller_name: String,
    pub file_path: PathBuf,
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub project_name: String,
    pub controllers: Vec<ControllerReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationReport {
    pub application_name: String,
    pub projects: Vec<ProjectReport>,
}

/// One row of the tabular report: route, HTTP method, request and response examples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub route: String,
    pub http_method: String,
    pub request_example: String,
    pub response_example: String,
}

impl From<&Endpoint> for ReportRow {
    fn from(endpoint: &Endpoint) -> Self {
        Self {
            route: endpoint.route.clone(),
            http_method: endpoint.http_method.clone(),
            request_example: endpoint.request_example.clone(),
            response_example: endpoint.response_example.clone(),
        }
    }
}

impl ApplicationReport {
    pub fn new(application_name: &str) -> Self {
        Self {
            application_name: application_name.to_string(),
            projects: Vec::new(),
        }
    }

    pub fn controllers(&self) -> impl Iterator<Item = &ControllerReport> {
        self.projects.iter().flat_map(|p| p.controllers.iter())
    }

    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.controllers().flat_map(|c| c.endpoints.iter())
    }

    /// Writer rows in discovery order
    pub fn rows(&self) -> Vec<ReportRow> {
        self.endpoints().map(ReportRow::from).collect()
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints().count()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoint_count() == 0
    }
}
