//! Errors surfaced by corpus loading, composition and version resolution.
//!
//! A [`CorpusError::Parse`] or [`CorpusError::CompositionCycle`] makes one (module, version) unusable and nothing
//! else; callers that iterate a corpus keep going. Lookup misses are not errors (see [`crate::table::Lookup`]).

use stubdex_core::version::{ParseVersionError, VersionTag};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum CorpusError {
    /// The declaration source could not be lexed/parsed, or a JSON source is missing required fields.
    #[error("failed to parse {module}@{version} ({file}): {} error(s)", .diagnostics.len())]
    #[diagnostic(code(stubdex::parse))]
    Parse {
        module: String,
        version: VersionTag,
        file: String,
        /// Rendered diagnostics, one per error.
        diagnostics: Vec<String>,
    },

    #[error("capability relations of {module}@{version} form a cycle: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(stubdex::composition_cycle),
        help("a type may not compose itself, directly or through its bases")
    )]
    CompositionCycle {
        module: String,
        version: VersionTag,
        /// `module:Type` entries, first and last equal.
        cycle: Vec<String>,
    },

    #[error("no version of module '{module}' is available")]
    #[diagnostic(code(stubdex::no_version), help("run `stubdex modules` to list the corpus"))]
    NoVersionAvailable { module: String },

    #[error("{0}")]
    #[diagnostic(code(stubdex::invalid_version))]
    InvalidVersion(#[from] ParseVersionError),

    #[error("cannot read '{path}': {message}")]
    #[diagnostic(code(stubdex::io))]
    Io { path: String, message: String },
}

impl CorpusError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, err: &std::io::Error) -> Self {
        CorpusError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

pub type CorpusResult<T> = Result<T, CorpusError>;
