//! Endpoint extraction - turns controller declarations into documented endpoints.
//!
//! Extraction runs per application. All project models are indexed first, then every
//! controller of every project is extracted against that shared index, so a controller may
//! reference types declared in any sibling project.
//!
//! # Example
//!
//! ```no_run
//! use apidoc_from_source::config::GeneratorConfig;
//! use apidoc_from_source::extractor::extract_application;
//! use apidoc_from_source::parser::CSharpParser;
//! use apidoc_from_source::symbols::ProjectSources;
//! use std::path::PathBuf;
//!
//! let config = GeneratorConfig::default();
//! let mut parser = CSharpParser::new(&config).unwrap();
//! let files: Vec<_> = parser
//!     .parse_files(&[PathBuf::from("Shop/Api/CustomersController.cs")])
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//! let project = ProjectSources::from_files("Api", &files);
//! let report = extract_application("Shop", vec![project], &config).unwrap();
//! for row in report.rows() {
//!     println!("{} {}", row.http_method, row.route);
//! }
//! ```

pub mod request;
pub mod response;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::report::{ApplicationReport, ControllerReport, Endpoint, ProjectReport};
use crate::route_resolver::resolve_route;
use crate::schema_generator::SchemaGenerator;
use crate::symbols::{AttributeDecl, ControllerDecl, MethodDecl, ProjectSources};
use crate::type_classifier::TypeClassifier;
use crate::type_resolver::SymbolIndex;
use log::{debug, info};

const ROUTE_ATTRIBUTE: &str = "Route";

/// Extracts endpoints against one application's symbol index
pub struct EndpointExtractor<'a> {
    index: &'a SymbolIndex,
    config: &'a GeneratorConfig,
    classifier: TypeClassifier,
}

impl<'a> EndpointExtractor<'a> {
    pub fn new(index: &'a SymbolIndex, config: &'a GeneratorConfig) -> Self {
        Self {
            index,
            config,
            classifier: TypeClassifier::from_config(config),
        }
    }

    /// Extract every HTTP-verb-attributed method of a controller, in declaration order.
    /// Methods without a verb attribute are not endpoints and are skipped.
    pub fn extract_controller(&self, controller: &ControllerDecl) -> ControllerReport {
        debug!("Extracting controller {}", controller.name);
        let endpoints = controller
            .methods
            .iter()
            .filter_map(|method| self.extract_endpoint(controller, method))
            .collect();

        ControllerReport {
            controller_name: controller.name.clone(),
            file_path: controller.file_path.clone(),
            endpoints,
        }
    }

    pub fn extract_endpoint(&self, controller: &ControllerDecl, method: &MethodDecl) -> Option<Endpoint> {
        let verb = self.http_verb(&method.attributes)?;

        let route = resolve_route(
            controller.route_template.as_deref().unwrap_or_default(),
            find_attribute(&method.attributes, ROUTE_ATTRIBUTE).and_then(AttributeDecl::first_positional),
            verb.first_positional(),
            &controller.name,
            &method.name,
        );

        let generator = self.generator();
        let parameters = request::describe_parameters(self.index, &self.classifier, &method.parameters);
        let request_example = request::request_example(
            &generator,
            &self.classifier,
            &method.parameters,
            self.config.request_mode,
        );
        let response_example = response::response_example(&generator, &method.return_type);

        debug!("{} {} -> {}", verb.name, route, method.name);
        Some(Endpoint {
            method_name: method.name.clone(),
            http_method: verb.name.clone(),
            route,
            parameters,
            request_example: request_example.to_json(),
            response_example: response_example.to_json(),
        })
    }

    fn http_verb<'m>(&self, attributes: &'m [AttributeDecl]) -> Option<&'m AttributeDecl> {
        attributes.iter().find(|a| self.config.is_http_verb(&a.name))
    }

    fn generator(&self) -> SchemaGenerator<'_> {
        SchemaGenerator::new(self.index, &self.classifier, self.config)
    }
}

fn find_attribute<'m>(attributes: &'m [AttributeDecl], name: &str) -> Option<&'m AttributeDecl> {
    attributes.iter().find(|a| a.name == name)
}

/// Build the report of one application.
///
/// Fails only when the symbol index cannot be built, which happens for duplicate type
/// keys under the strict name policy.
pub fn extract_application(
    application_name: &str,
    projects: Vec<ProjectSources>,
    config: &GeneratorConfig,
) -> Result<ApplicationReport> {
    let mut models = Vec::with_capacity(projects.len());
    let mut controllers_by_project = Vec::with_capacity(projects.len());
    for project in projects {
        controllers_by_project.push((project.model.project.clone(), project.controllers));
        models.push(project.model);
    }

    let index = SymbolIndex::build(models, config.name_policy)?;
    info!("Indexed {} types for application {}", index.len(), application_name);

    let extractor = EndpointExtractor::new(&index, config);
    let mut report = ApplicationReport::new(application_name);
    for (project_name, controllers) in controllers_by_project {
        let controllers = controllers
            .iter()
            .map(|c| extractor.extract_controller(c))
            .collect();
        report.projects.push(ProjectReport {
            project_name,
            controllers,
        });
    }

    info!(
        "Extracted {} endpoints for application {}",
        report.endpoint_count(),
        application_name
    );
    Ok(report)
}
