//! Series Catalog CLI
//!
//! Commands: validate, build
//! Diagnostics go to stderr, JSON to stdout
//! Returns 2 on validation failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use seriescatalog_core::{CatalogConfig, CatalogPipeline, OutputFormat, PipelineError};

#[derive(Parser)]
#[command(name = "seriescatalog-cli")]
#[command(about = "Series Catalog CLI - validate and render a message catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (or set SERIESCATALOG_LOG)
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check both sheets and report problems
    Validate {
        /// Message log (CSV)
        #[arg(short, long)]
        messages: PathBuf,

        /// Series sheet (CSV)
        #[arg(short, long)]
        series: PathBuf,
    },

    /// Validate, then render the series index and series pages
    Build {
        /// Message log (CSV)
        #[arg(short, long)]
        messages: PathBuf,

        /// Series sheet (CSV)
        #[arg(short, long)]
        series: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Page format: html or json
        #[arg(long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Index page title
        #[arg(long)]
        title: Option<String>,

        /// Abort if any record is invalid
        #[arg(long)]
        strict: bool,
    },
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    match value.to_lowercase().as_str() {
        "html" => Ok(OutputFormat::Html),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("unknown format '{}'", other)),
    }
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("SERIESCATALOG_LOG").unwrap_or_else(|_| {
        if verbose { "seriescatalog_core=debug".to_string() } else { "seriescatalog_core=info".to_string() }
    });
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => match CatalogConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                println!("{}", serde_json::json!({ "success": false, "error": e.to_string() }));
                return ExitCode::FAILURE;
            }
        },
        None => CatalogConfig::default(),
    };

    match cli.command {
        Commands::Validate { messages, series } => {
            let pipeline = CatalogPipeline::new(config);
            let catalog = match pipeline.load(&messages, &series) {
                Ok(c) => c,
                Err(e) => {
                    println!("{}", serde_json::json!({ "valid": false, "error": e.to_string() }));
                    return ExitCode::FAILURE;
                }
            };

            let mut stderr = std::io::stderr();
            let summary = pipeline.validate(&catalog, Some(&mut stderr));
            let output = serde_json::json!({
                "valid": summary.is_valid(),
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());

            if summary.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Build { messages, series, output, format, title, strict } => {
            let config = CatalogConfig {
                output_dir: output.unwrap_or(config.output_dir),
                format: format.unwrap_or(config.format),
                index_title: title.unwrap_or(config.index_title),
                strict: strict || config.strict,
                ..config
            };
            let pipeline = CatalogPipeline::new(config);

            let mut stderr = std::io::stderr();
            let result = pipeline
                .load(&messages, &series)
                .and_then(|catalog| pipeline.build(catalog, Some(&mut stderr)));

            match result {
                Ok(build) => {
                    let output = serde_json::json!({
                        "success": true,
                        "build": build,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", output);
                    match e {
                        PipelineError::ValidationFailed(_) => ExitCode::from(2),
                        _ => ExitCode::FAILURE,
                    }
                }
            }
        }
    }
}
