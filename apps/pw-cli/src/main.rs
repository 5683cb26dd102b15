//! # pw-cli
//!
//! Command-line interface for the acceptable use policy generator.
//!
//! - `pw generate` - compose, render and record a policy document
//! - `pw validate` - check answers and show which clause each topic gets
//! - `pw catalog` - list sections, topics, variants and consistency rules
//! - `pw history` - show or verify the generation ledger
//! - `pw locate` - resolve a download filename to a file on disk

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{PwConfig, OUTPUT_DIR_ENV};

/// Generate acceptable use policies from a questionnaire.
#[derive(Parser)]
#[command(name = "pw", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Config file (defaults to .pw/config.toml under the project root).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a policy document and record it in the ledger.
    Generate {
        /// Organization profile (JSON).
        #[arg(long)]
        profile: PathBuf,
        /// Questionnaire answers (JSON object keyed by question id).
        #[arg(long)]
        answers: PathBuf,
        /// Write the document here instead of the configured directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check answers without writing anything.
    Validate {
        #[arg(long)]
        profile: PathBuf,
        #[arg(long)]
        answers: PathBuf,
    },
    /// Show the clause catalog and consistency rules.
    Catalog,
    /// Show recent generations.
    History {
        /// Number of records to show.
        #[arg(short, default_value = "10")]
        n: usize,
        /// Verify the ledger hash chain instead of listing.
        #[arg(long)]
        verify: bool,
    },
    /// Resolve a download filename to a generated document.
    Locate { filename: String },
}

const LOG_TARGETS: [&str; 4] = ["pw_policy", "pw_render", "pw_ledger", "pw_cli"];

fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// A non-empty, parseable `RUST_LOG` replaces the defaults outright.
fn log_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(verbose)))
}

fn init_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let config = PwConfig::load(&project_root, cli.config.as_deref())?
        .with_env_output_dir(std::env::var(OUTPUT_DIR_ENV).ok());

    match cli.command {
        Commands::Generate {
            profile,
            answers,
            output_dir,
            json,
        } => commands::generate::execute(&config.with_output_dir(output_dir), &profile, &answers, json),
        Commands::Validate { profile, answers } => commands::validate::execute(&profile, &answers),
        Commands::Catalog => commands::catalog::execute(),
        Commands::History { n, verify } => commands::history::execute(&config, n, verify),
        Commands::Locate { filename } => commands::locate::execute(&config, &filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_crate() {
        assert_eq!(
            default_directives(false),
            "pw_policy=info,pw_render=info,pw_ledger=info,pw_cli=info"
        );
        assert!(default_directives(true).contains("pw_render=debug"));
    }

    #[test]
    fn rust_log_replaces_defaults() {
        let filter = log_filter(Some("pw_policy=error"), false).to_string();
        assert!(filter.contains("pw_policy=error"));
        assert!(!filter.contains("pw_policy=info"));
        assert!(!filter.contains("pw_cli"));

        // --verbose does not override an explicit RUST_LOG either.
        let filter = log_filter(Some("warn"), true).to_string();
        assert!(!filter.contains("debug"));
    }

    #[test]
    fn blank_or_invalid_rust_log_falls_back() {
        for rust_log in [None, Some(""), Some("  "), Some("pw_policy=loudest")] {
            let filter = log_filter(rust_log, false).to_string();
            assert!(filter.contains("pw_cli=info"), "{:?} gave {}", rust_log, filter);
        }
    }
}
