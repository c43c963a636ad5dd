//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::sync::Arc;

use miette::Diagnostic;
use serde::Serialize;
use stubdex_syntax::{diagnostics, lexer, parser};

use crate::config::CorpusConfig;
use crate::corpus::store::MAX_SOURCE_SIZE;
use crate::corpus::{Corpus, TypeResolution};
use crate::error::CorpusError;
use crate::model::{Symbol, TypeRef};
use crate::render;
use crate::table::{Lookup, Table};

use super::{CliError, CliResult, ExitCode};

/// Read a source file, rejecting files over [`MAX_SOURCE_SIZE`].
pub fn read_source(file_path: &str) -> CliResult<String> {
    // Check file size before reading
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Tokenize and display tokens.
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&source).map_err(|errs| render_syntax_errors(file_path, &source, &errs))?;

    for tok in &tokens {
        println!("{:?}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display AST.
pub fn parse_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&source).map_err(|errs| render_syntax_errors(file_path, &source, &errs))?;
    let ast = parser::parse(&tokens).map_err(|errs| render_syntax_errors(file_path, &source, &errs))?;
    println!("{:#?}", ast);
    Ok(ExitCode::SUCCESS)
}

fn render_syntax_errors(file_path: &str, source: &str, errs: &[diagnostics::CompileError]) -> CliError {
    let mut msg = String::new();
    for err in errs {
        msg.push_str(&diagnostics::format_error(file_path, source, err));
    }
    CliError::failure(msg.trim_end())
}

// ============================================================================
// Corpus access
// ============================================================================

/// User-facing text for a corpus error, with rendered parse diagnostics and help.
pub fn describe(err: &CorpusError) -> String {
    let mut msg = format!("Error: {err}");
    if let CorpusError::Parse { diagnostics, .. } = err {
        for diag in diagnostics {
            msg.push('\n');
            msg.push_str(diag.trim_end());
        }
    }
    if let Some(help) = err.help() {
        msg.push_str(&format!("\n  help: {help}"));
    }
    msg
}

fn corpus_error(err: CorpusError) -> CliError {
    let code = match &err {
        CorpusError::NoVersionAvailable { .. } | CorpusError::InvalidVersion(_) | CorpusError::Io { .. } => {
            ExitCode::USAGE
        }
        CorpusError::Parse { .. } | CorpusError::CompositionCycle { .. } => ExitCode::FAILURE,
    };
    CliError::new(describe(&err), code)
}

fn open_corpus(config: CorpusConfig) -> CliResult<Corpus> {
    Corpus::open(config).map_err(corpus_error)
}

fn resolve(corpus: &Corpus, module: &str, version: Option<&str>) -> CliResult<Arc<Table>> {
    corpus.resolve(module, version).map_err(corpus_error)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CliError::failure(format!("Error serializing output: {}", e)))
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Serialize)]
struct ModuleListing {
    module: String,
    versions: Vec<String>,
}

/// List modules and their versions.
pub fn list_modules(config: CorpusConfig, json: bool) -> CliResult<ExitCode> {
    let corpus = open_corpus(config)?;
    let listing: Vec<ModuleListing> = corpus
        .modules()
        .map(|module| ModuleListing {
            module: module.to_string(),
            versions: corpus.versions(module).iter().map(ToString::to_string).collect(),
        })
        .collect();

    if json {
        println!("{}", to_json(&listing)?);
    } else {
        let width = listing.iter().map(|m| m.module.len()).max().unwrap_or(0);
        for entry in &listing {
            println!("{:<width$}  {}", entry.module, entry.versions.join(", "));
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    symbol: &'a Symbol,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    types: Vec<TypeResolution>,
}

/// Documented types of a symbol, resolved against the corpus.
fn symbol_types(corpus: &Corpus, table: &Table, symbol: &Symbol) -> Vec<(TypeRef, TypeResolution)> {
    symbol
        .returns()
        .into_iter()
        .chain(symbol.value_type.as_ref())
        .map(|ty| (ty.clone(), corpus.resolve_type(table, ty)))
        .collect()
}

/// Show one symbol.
pub fn lookup(config: CorpusConfig, module: &str, name: &str, version: Option<&str>, json: bool) -> CliResult<ExitCode> {
    let corpus = open_corpus(config)?;
    let table = resolve(&corpus, module, version)?;
    let Lookup::Found(symbol) = table.lookup(name) else {
        return Err(CliError::failure(format!(
            "'{}' not found in {}@{}",
            name,
            table.module(),
            table.version()
        )));
    };
    let types = symbol_types(&corpus, &table, symbol);

    if json {
        let output = LookupOutput {
            symbol,
            types: types.into_iter().map(|(_, resolution)| resolution).collect(),
        };
        println!("{}", to_json(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    print!("{}", render::details(symbol));
    for (ty, resolution) in types {
        match resolution {
            TypeResolution::Builtin { .. } => println!("{ty}: builtin"),
            TypeResolution::Symbol { module, symbol } => {
                println!("{ty}: {} {}.{}", symbol.kind, module, symbol.qualified_name)
            }
            TypeResolution::Unresolved { .. } => println!("{ty}: unresolved"),
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Completion candidates for `prefix`.
///
/// Without `deep`, `Socket.wr` means members of `Socket` whose name starts with `wr`, and a prefix without a dot
/// narrows the module-level symbols. With `deep`, every qualified name starting with `prefix` matches.
pub fn completions<'a>(table: &'a Table, prefix: &'a str, deep: bool) -> Vec<&'a Symbol> {
    if deep {
        return table.prefix_search(prefix).collect();
    }
    let (owner, partial) = prefix.rsplit_once('.').unwrap_or(("", prefix));
    table.members(owner).filter(|s| s.name().starts_with(partial)).collect()
}

/// List completion candidates.
pub fn complete(
    config: CorpusConfig,
    module: &str,
    prefix: &str,
    version: Option<&str>,
    deep: bool,
    json: bool,
) -> CliResult<ExitCode> {
    let corpus = open_corpus(config)?;
    let table = resolve(&corpus, module, version)?;
    let matches = completions(&table, prefix, deep);

    if json {
        let out = render::completions_json(matches.iter().copied())
            .map_err(|e| CliError::failure(format!("Error serializing output: {}", e)))?;
        println!("{out}");
    } else {
        print!("{}", render::completion_listing(matches.iter().copied()));
    }
    Ok(ExitCode::SUCCESS)
}

/// Show the event table of a constructor.
pub fn events(config: CorpusConfig, module: &str, type_name: &str, version: Option<&str>) -> CliResult<ExitCode> {
    let corpus = open_corpus(config)?;
    let table = resolve(&corpus, module, version)?;
    if !table.lookup(type_name).is_found() {
        return Err(CliError::failure(format!(
            "'{}' not found in {}@{}",
            type_name,
            table.module(),
            table.version()
        )));
    }
    for event in table.events(type_name) {
        if let Some(tip) = render::call_tip(event) {
            println!("{tip}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Export a resolved table as JSON.
pub fn dump(config: CorpusConfig, module: &str, version: Option<&str>) -> CliResult<ExitCode> {
    let corpus = open_corpus(config)?;
    let table = resolve(&corpus, module, version)?;
    println!("{}", to_json(&*table)?);
    Ok(ExitCode::SUCCESS)
}

/// Build every module at every version; exit 1 on any failure.
pub fn check(config: CorpusConfig) -> CliResult<ExitCode> {
    let corpus = open_corpus(config)?;
    let report = corpus.check();

    for failure in &report.failures {
        eprintln!("{}", describe(&failure.error));
    }
    println!(
        "{} table(s) built, {} failed",
        report.built,
        report.failures.len()
    );
    if report.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::corpus::MemoryStore;
    use stubdex_core::version::VersionTag;

    fn table() -> Arc<Table> {
        let store = MemoryStore::new().with_file(
            "net.js",
            r#"
var net = {};
net.Socket = function() {}
net.Socket.prototype.write = function(data) {}
net.Socket.prototype.pause = function() {}
net.Socket.__events__.close = function(had_error) {}
net.Server = function() {}
net.isIP = function(input) {}
"#,
        );
        let corpus = Corpus::with_store(store, CorpusConfig::default()).unwrap();
        corpus.resolve("net", None).unwrap()
    }

    fn names(symbols: Vec<&Symbol>) -> Vec<&str> {
        symbols.into_iter().map(|s| s.qualified_name.as_str()).collect()
    }

    #[test]
    fn test_completions_members_and_partial() {
        let t = table();
        assert_eq!(names(completions(&t, "Socket.", false)), ["Socket.pause", "Socket.write"]);
        assert_eq!(names(completions(&t, "Socket.wr", false)), ["Socket.write"]);
        assert_eq!(names(completions(&t, "S", false)), ["Server", "Socket"]);
    }

    #[test]
    fn test_completions_deep_includes_events() {
        let t = table();
        assert_eq!(
            names(completions(&t, "Socket", true)),
            ["Socket", "Socket.__events__.close", "Socket.pause", "Socket.write"]
        );
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source("no/such/stub.js").unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.starts_with("Cannot access file 'no/such/stub.js'"));
    }

    #[test]
    fn test_corpus_error_exit_codes() {
        let missing = corpus_error(CorpusError::NoVersionAvailable { module: "x".into() });
        assert_eq!(missing.exit_code, ExitCode::USAGE);
        assert!(missing.message.contains("stubdex modules"));

        let parse = corpus_error(CorpusError::Parse {
            module: "x".into(),
            version: VersionTag::Base,
            file: "x.js".into(),
            diagnostics: vec!["x.js:1:9: Expected expression".into()],
        });
        assert_eq!(parse.exit_code, ExitCode::FAILURE);
        assert!(parse.message.ends_with("Expected expression"));
    }
}
