//! CLI module for stubdex
//!
//! This module provides the command-line interface over a declaration corpus.
//!
//! ## Commands
//!
//! - `modules` - List modules and their versions
//! - `lookup <module> <name>` - Show one symbol
//! - `complete <module> [prefix]` - Completion candidates
//! - `events <module> <type>` - Event table of a constructor
//! - `dump <module>` - JSON export of a resolved table
//! - `check` - Build every module at every version
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::config::CorpusConfig;
use crate::version::STUBDEX_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The request itself was unusable (unknown module, bad version, missing corpus).
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Versioned symbol tables for declaration-stub corpora
#[derive(Parser, Debug)]
#[command(name = "stubdex")]
#[command(version = STUBDEX_VERSION)]
#[command(about = "Versioned symbol tables for declaration-stub corpora", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Corpus directory (default: ./corpus, next to the executable, or $STUBDEX_CORPUS)
    #[arg(long, global = true, value_name = "DIR")]
    pub corpus: Option<PathBuf>,

    /// Strip HTML markup from doc text
    #[arg(long = "strip-html", global = true)]
    pub strip_html: bool,

    // Debug/development flags
    /// Tokenize a stub file only (debug)
    #[arg(long = "lex", value_name = "FILE")]
    pub lex_file: Option<PathBuf>,

    /// Parse a stub file only (debug)
    #[arg(long = "parse", value_name = "FILE", conflicts_with = "lex_file")]
    pub parse_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List modules and their versions
    Modules {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one symbol
    Lookup {
        #[arg(value_name = "MODULE")]
        module: String,
        /// Module-relative qualified name (e.g. Socket.write)
        #[arg(value_name = "NAME")]
        name: String,
        /// Platform version (default: latest)
        #[arg(long, value_name = "V")]
        version: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List completion candidates
    Complete {
        #[arg(value_name = "MODULE")]
        module: String,
        /// `Socket.` lists Socket's members; `Socket.wr` narrows them; empty lists module-level symbols
        #[arg(value_name = "PREFIX", default_value = "")]
        prefix: String,
        /// Platform version (default: latest)
        #[arg(long, value_name = "V")]
        version: Option<String>,
        /// Match every qualified name starting with PREFIX instead of direct members
        #[arg(long)]
        deep: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the event table of a constructor
    Events {
        #[arg(value_name = "MODULE")]
        module: String,
        #[arg(value_name = "TYPE")]
        type_name: String,
        /// Platform version (default: latest)
        #[arg(long, value_name = "V")]
        version: Option<String>,
    },

    /// Export a resolved table as JSON
    Dump {
        #[arg(value_name = "MODULE")]
        module: String,
        /// Platform version (default: latest)
        #[arg(long, value_name = "V")]
        version: Option<String>,
    },

    /// Build every module at every version and report failures
    Check,
}

impl Cli {
    /// Corpus configuration from the global flags.
    pub fn corpus_config(&self) -> CorpusConfig {
        let config = CorpusConfig::new().with_strip_html(self.strip_html);
        match &self.corpus {
            Some(root) => config.with_root(root),
            None => config,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = &cli.lex_file {
        return commands::lex_file(&file.to_string_lossy());
    }
    if let Some(file) = &cli.parse_file {
        return commands::parse_file(&file.to_string_lossy());
    }

    let config = cli.corpus_config();
    match cli.command {
        Some(Command::Modules { json }) => commands::list_modules(config, json),
        Some(Command::Lookup {
            module,
            name,
            version,
            json,
        }) => commands::lookup(config, &module, &name, version.as_deref(), json),
        Some(Command::Complete {
            module,
            prefix,
            version,
            deep,
            json,
        }) => commands::complete(config, &module, &prefix, version.as_deref(), deep, json),
        Some(Command::Events {
            module,
            type_name,
            version,
        }) => commands::events(config, &module, &type_name, version.as_deref()),
        Some(Command::Dump { module, version }) => commands::dump(config, &module, version.as_deref()),
        Some(Command::Check) => commands::check(config),
        // No command - show help
        None => Err(CliError::new("", ExitCode::FAILURE)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lookup() {
        let cli = Cli::try_parse_from(["stubdex", "lookup", "net", "Socket.write", "--version", "0.8"]).unwrap();
        if let Some(Command::Lookup {
            module,
            name,
            version,
            json,
        }) = cli.command
        {
            assert_eq!(module, "net");
            assert_eq!(name, "Socket.write");
            assert_eq!(version.as_deref(), Some("0.8"));
            assert!(!json);
        } else {
            panic!("Expected Lookup command");
        }
    }

    #[test]
    fn test_cli_parse_complete_defaults() {
        let cli = Cli::try_parse_from(["stubdex", "complete", "net"]).unwrap();
        if let Some(Command::Complete { prefix, deep, .. }) = cli.command {
            assert_eq!(prefix, "");
            assert!(!deep);
        } else {
            panic!("Expected Complete command");
        }
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::try_parse_from(["stubdex", "check", "--corpus", "stubs", "--strip-html"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Check)));
        let config = cli.corpus_config();
        assert_eq!(config.root, Some(PathBuf::from("stubs")));
        assert!(config.strip_html);
    }

    #[test]
    fn test_cli_parse_debug_flags() {
        let cli = Cli::try_parse_from(["stubdex", "--lex", "net.js"]).unwrap();
        assert!(cli.lex_file.is_some());

        let cli = Cli::try_parse_from(["stubdex", "--parse", "net.js"]).unwrap();
        assert!(cli.parse_file.is_some());

        assert!(Cli::try_parse_from(["stubdex", "--lex", "a.js", "--parse", "b.js"]).is_err());
    }

    #[test]
    fn test_cli_requires_module_for_events() {
        assert!(Cli::try_parse_from(["stubdex", "events", "net"]).is_err());
    }
}
