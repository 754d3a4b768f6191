//! API documentation generator - endpoint reports from ASP.NET controller sources.
//!
//! This library statically analyses C# source trees. For every controller endpoint it
//! composes the route, resolves parameter and return types across all projects of an
//! application and synthesizes example request and response payloads.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Discovers applications, their projects and C# files
//! 2. [`parser`] - Parses C# files into declaration-level [`symbols`]
//! 3. [`type_resolver`] - Indexes declared types across an application's projects
//! 4. [`type_classifier`] - Sorts type references into primitives, collections, wrappers
//! 5. [`route_resolver`] - Composes endpoint routes from controller templates
//! 6. [`schema_generator`] - Synthesizes example payloads from resolved types
//! 7. [`extractor`] - Builds documented endpoints from controllers
//! 8. [`report`] - The output model, one report per application
//! 9. [`serializer`] - Writes reports as Markdown tables, JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use apidoc_from_source::{
//!     config::GeneratorConfig,
//!     extractor::extract_application,
//!     parser::CSharpParser,
//!     scanner::FileScanner,
//!     serializer::render_markdown_table,
//!     symbols::ProjectSources,
//! };
//! use std::path::PathBuf;
//!
//! let config = GeneratorConfig::default();
//! let scan_result = FileScanner::new(PathBuf::from("./services")).scan().unwrap();
//! let mut parser = CSharpParser::new(&config).unwrap();
//!
//! for app in &scan_result.applications {
//!     let projects: Vec<ProjectSources> = app
//!         .projects
//!         .iter()
//!         .map(|project| {
//!             let files: Vec<_> = parser
//!                 .parse_files(&project.files)
//!                 .into_iter()
//!                 .filter_map(Result::ok)
//!                 .collect();
//!             ProjectSources::from_files(&project.name, &files)
//!         })
//!         .collect();
//!     let report = extract_application(&app.name, projects, &config).unwrap();
//!     println!("{}", render_markdown_table(&report));
//! }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod report;
pub mod route_resolver;
pub mod scanner;
pub mod schema_generator;
pub mod serializer;
pub mod symbols;
pub mod type_classifier;
pub mod type_ref;
pub mod type_resolver;
