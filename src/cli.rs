use crate::config::{GeneratorConfig, NamePolicy, RequestMode};
use crate::extractor::extract_application;
use crate::parser::CSharpParser;
use crate::report::ApplicationReport;
use crate::scanner::{ApplicationSources, FileScanner};
use crate::serializer::{render_markdown_table, serialize_json, serialize_yaml, write_to_file};
use crate::symbols::{ParsedFile, ProjectSources};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// API documentation generator - builds endpoint reports from ASP.NET controller sources
#[derive(Parser, Debug)]
#[command(name = "apidoc-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory holding one sub-directory per application
    #[arg(value_name = "ROOT_PATH")]
    pub root_path: PathBuf,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "markdown")]
    pub output_format: OutputFormat,

    /// Directory receiving one report per application (defaults to ROOT_PATH)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Fail on duplicate type names instead of keeping the first declaration
    #[arg(long = "strict-names")]
    pub strict_names: bool,

    /// Merge all payload parameters into the request example
    #[arg(long = "merge-request-params")]
    pub merge_request_params: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown table, one row per endpoint
    Markdown,
    /// Full report as JSON
    Json,
    /// Full report as YAML
    Yaml,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.root_path.exists() {
        anyhow::bail!("Root path does not exist: {}", args.root_path.display());
    }

    if !args.root_path.is_dir() {
        anyhow::bail!("Root path is not a directory: {}", args.root_path.display());
    }

    info!("Root path: {}", args.root_path.display());
    info!("Output format: {:?}", args.output_format);
    info!("Output directory: {}", output_dir(&args).display());
    if let Some(ref config) = args.config_path {
        info!("Configuration: {}", config.display());
    }

    Ok(args)
}

fn output_dir(args: &CliArgs) -> PathBuf {
    args.output_dir.clone().unwrap_or_else(|| args.root_path.clone())
}

/// Load the configuration file, if any, and apply the command line overrides
pub fn load_config(args: &CliArgs) -> Result<GeneratorConfig> {
    let mut config = match &args.config_path {
        Some(path) => GeneratorConfig::from_yaml_file(path)?,
        None => GeneratorConfig::default(),
    };
    if args.strict_names {
        config.name_policy = NamePolicy::Strict;
    }
    if args.merge_request_params {
        config.request_mode = RequestMode::Merge;
    }
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let config = load_config(&args)?;
    let output_dir = output_dir(&args);

    // Step 1: Discover applications, projects and source files
    info!("Scanning {}...", args.root_path.display());
    let scan_result = FileScanner::new(args.root_path.clone()).scan()?;
    info!(
        "Found {} applications with {} C# files",
        scan_result.applications.len(),
        scan_result.file_count()
    );
    if scan_result.applications.is_empty() {
        warn!("No application directories found in {}", args.root_path.display());
    }

    // Step 2: One report per application; a failing application does not stop the run
    let mut parser = CSharpParser::new(&config)?;
    let mut written = 0;
    let mut failed = 0;
    let mut endpoints = 0;

    for application in &scan_result.applications {
        info!("Processing application {}", application.name);
        let outcome = generate_application(&mut parser, application, &config).and_then(|report| {
            if report.is_empty() {
                info!("No endpoints in {}, no report written", application.name);
                return Ok(0);
            }
            let path = output_path(&output_dir, &report.application_name, args.output_format);
            write_to_file(&render(&report, args.output_format)?, &path)?;
            info!("Wrote {}", path.display());
            Ok(report.endpoint_count())
        });

        match outcome {
            Ok(0) => {}
            Ok(count) => {
                written += 1;
                endpoints += count;
            }
            Err(e) => {
                error!("Skipping application {}: {:#}", application.name, e);
                failed += 1;
            }
        }
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Applications: {}", scan_result.applications.len());
    info!("  - Files scanned: {}", scan_result.file_count());
    info!("  - Endpoints documented: {}", endpoints);
    info!("  - Reports written: {}", written);
    if failed > 0 {
        warn!("  - Applications failed: {}", failed);
    }

    Ok(())
}

/// Parse every project of an application, then extract its endpoints against one index
/// built over all of them.
pub fn generate_application(
    parser: &mut CSharpParser,
    application: &ApplicationSources,
    config: &GeneratorConfig,
) -> Result<ApplicationReport> {
    let mut projects = Vec::with_capacity(application.projects.len());
    for project in &application.projects {
        let files: Vec<ParsedFile> = parser
            .parse_files(&project.files)
            .into_iter()
            .filter_map(Result::ok)
            .collect();
        debug!(
            "Project {}: parsed {} of {} files",
            project.name,
            files.len(),
            project.files.len()
        );
        projects.push(ProjectSources::from_files(&project.name, &files));
    }

    extract_application(&application.name, projects, config)
        .with_context(|| format!("Failed to index application {}", application.name))
}

/// Render a report in the requested format
pub fn render(report: &ApplicationReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown_table(report)),
        OutputFormat::Json => serialize_json(report),
        OutputFormat::Yaml => serialize_yaml(report),
    }
}

pub fn output_file_name(application_name: &str, format: OutputFormat) -> String {
    format!("{}.{}", application_name, format.extension())
}

/// Path of the report file for an application
pub fn output_path(dir: &Path, application_name: &str, format: OutputFormat) -> PathBuf {
    dir.join(output_file_name(application_name, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(root: &Path) -> CliArgs {
        CliArgs::parse_from(["apidoc-from-source", root.to_str().unwrap()])
    }

    #[test]
    fn test_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let args = args(temp_dir.path());
        assert_eq!(args.output_format, OutputFormat::Markdown);
        assert!(args.output_dir.is_none());
        assert!(!args.strict_names);
        assert_eq!(output_dir(&args), temp_dir.path());
    }

    #[test]
    fn test_flags_override_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("apidoc.yaml");
        fs::write(&config_path, "max_depth: 8\n").unwrap();

        let args = CliArgs::parse_from([
            "apidoc-from-source",
            temp_dir.path().to_str().unwrap(),
            "-c",
            config_path.to_str().unwrap(),
            "--strict-names",
            "--merge-request-params",
            "-f",
            "json",
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.name_policy, NamePolicy::Strict);
        assert_eq!(config.request_mode, RequestMode::Merge);
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let args = args(&temp_dir.path().join("missing"));
        assert!(parse_args_from_parsed(args).is_err());
    }

    #[test]
    fn test_output_names() {
        assert_eq!(output_file_name("Shop", OutputFormat::Markdown), "Shop.md");
        assert_eq!(
            output_path(Path::new("/tmp/out"), "Shop", OutputFormat::Yaml),
            PathBuf::from("/tmp/out/Shop.yaml")
        );
    }
}
