//! Blueprint Paths CLI
//!
//! Usage:
//!   blueprint-paths [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>        Analyzer configuration (TOML format)
//!   -b, --base-url <URL>       Prefix of every root url path
//!       --system-id <ID>       Value for `:systemId` when no param supplies one
//!   -p, --param <KEY=VALUE>    Bind a parameter and print resolved routes
//!       --json                 Print the route listing as JSON
//!   -v, --verbose              Log analyzer progress to stderr
//!   -h, --help                 Print help

use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use blueprint_paths::model::parse_definitions;
use blueprint_paths::{analyze, format_routes, summarize, AnalyzerConfig, Match};

#[derive(Parser)]
#[command(name = "blueprint-paths")]
#[command(about = "Derive relationship routes from blueprint definitions")]
struct Cli {
    /// Blueprint definitions as JSON (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Analyzer configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Prefix of every root url path
    #[arg(short, long)]
    base_url: Option<String>,

    /// Value for `:systemId` segments when no parameter supplies one
    #[arg(long)]
    system_id: Option<String>,

    /// Parameter to resolve routes with, as key=value (repeatable)
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Print the route listing as JSON
    #[arg(long)]
    json: bool,

    /// Log analyzer progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration, then let flags override it
    let mut config = match &cli.config {
        Some(path) => match AnalyzerConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => AnalyzerConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(system_id) = cli.system_id {
        config = config.with_system_id(system_id);
    }

    // Read input
    let source = match &cli.input {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let defs = match parse_definitions(&source) {
        Ok(defs) => defs,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let analysis = match analyze(defs, &config) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let matched = (!cli.params.is_empty()).then(|| Match::from_pairs(cli.params));
    let summaries = summarize(&analysis.routes, matched.as_ref());

    if cli.json {
        match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", format_routes(&summaries));
    }
}
