//! API documentation generator - command-line tool.
//!
//! Scans a directory of ASP.NET applications, resolves every controller endpoint against
//! the types declared across the application's projects and writes one report per
//! application.
//!
//! # Usage
//!
//! ```bash
//! apidoc-from-source [OPTIONS] <ROOT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate Markdown tables next to the sources:
//! ```bash
//! apidoc-from-source ./services
//! ```
//!
//! Generate JSON reports into a separate directory:
//! ```bash
//! apidoc-from-source ./services -f json -o ./docs
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! apidoc-from-source ./services -v
//! ```

use anyhow::Result;
use apidoc_from_source::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("API documentation generator starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("Report generation completed successfully");

    Ok(())
}
