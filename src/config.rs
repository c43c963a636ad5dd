//! Corpus configuration and corpus directory discovery.

use std::env;
use std::path::{Path, PathBuf};

use stubdex_core::version::VersionTag;

/// Environment variable naming the corpus directory.
pub const CORPUS_ENV: &str = "STUBDEX_CORPUS";

/// Directory name probed next to the working directory and the executable.
pub const CORPUS_DIR_NAME: &str = "corpus";

/// Configuration for loading a corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusConfig {
    /// Root directory of the corpus; `None` means discover it (see [`find_corpus_dir`]).
    pub root: Option<PathBuf>,
    /// Version used when a query names none; `None` means the newest available.
    pub default_version: Option<VersionTag>,
    /// Remove HTML markup from doc text.
    pub strip_html: bool,
    /// File extensions (without the dot) read as stub-dialect sources.
    pub stub_extensions: Vec<String>,
    /// Read `<module>.json` sources as well.
    pub json_sources: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: None,
            default_version: None,
            strip_html: false,
            stub_extensions: vec!["js".to_string()],
            json_sources: true,
        }
    }
}

impl CorpusConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the corpus root directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the version used when none is requested
    pub fn with_default_version(mut self, version: VersionTag) -> Self {
        self.default_version = Some(version);
        self
    }

    pub fn with_strip_html(mut self, strip: bool) -> Self {
        self.strip_html = strip;
        self
    }

    /// Replace the stub source extensions
    pub fn with_stub_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stub_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_json_sources(mut self, enabled: bool) -> Self {
        self.json_sources = enabled;
        self
    }

    /// The configured root, or a discovered one.
    pub fn resolve_root(&self) -> Option<PathBuf> {
        self.root.clone().or_else(find_corpus_dir)
    }

    pub(crate) fn is_stub_extension(&self, ext: &str) -> bool {
        self.stub_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Find the corpus directory relative to the working directory, the executable, or `STUBDEX_CORPUS`.
pub fn find_corpus_dir() -> Option<PathBuf> {
    // Development mode: ./corpus
    let dev = Path::new(CORPUS_DIR_NAME);
    if dev.is_dir() {
        return Some(dev.to_path_buf());
    }

    // Next to the executable, or up to two levels above it (target/debug -> project root)
    if let Ok(exe_path) = env::current_exe() {
        let mut dir = exe_path.parent();
        for _ in 0..3 {
            let Some(current) = dir else { break };
            let candidate = current.join(CORPUS_DIR_NAME);
            if candidate.is_dir() {
                return Some(candidate);
            }
            dir = current.parent();
        }
    }

    if let Ok(path) = env::var(CORPUS_ENV) {
        let path = PathBuf::from(path);
        if path.is_dir() {
            return Some(path);
        }
    }

    None
}
