//! The corpus: declaration sources, their versions, and the tables built from them.
//!
//! A [`Corpus`] owns its [`SourceStore`], a [`Catalog`] of what the store holds, and caches of assembled
//! declarations and built tables keyed by (module, version). Failures are cached too: a module that does not
//! parse fails the same way on every request without being re-read.

pub mod catalog;
pub mod store;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::Serialize;
use stubdex_core::version::{MatchKind, VersionTag};
use stubdex_syntax::jsdoc::DocOptions;

use crate::builder::{self, Assembled, CollaboratorSource};
use crate::config::{CORPUS_DIR_NAME, CORPUS_ENV, CorpusConfig};
use crate::error::{CorpusError, CorpusResult};
use crate::frontend;
use crate::model::{Symbol, TypeRef};
use crate::table::Table;
use crate::version;

pub use catalog::{Catalog, CatalogEntry};
pub use store::{FsStore, MemoryStore, SourceFile, SourceStore};

type Key = (String, VersionTag);

/// What a documented type reference points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum TypeResolution {
    /// A builtin type (`Boolean`, `String`, ...).
    Builtin { name: String },
    /// A declared symbol, possibly in another module.
    Symbol { module: String, symbol: Symbol },
    /// Nothing by that name at this version.
    Unresolved { module: String, name: String },
}

/// One failed (module, version) found by [`Corpus::check`].
#[derive(Debug, Clone, PartialEq)]
pub struct CheckFailure {
    pub module: String,
    pub version: VersionTag,
    pub error: CorpusError,
}

/// Outcome of building every module at every version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckReport {
    /// Tables built without error.
    pub built: usize,
    pub failures: Vec<CheckFailure>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A loaded corpus.
pub struct Corpus {
    store: Box<dyn SourceStore>,
    config: CorpusConfig,
    catalog: Catalog,
    assembled: RwLock<HashMap<Key, CorpusResult<Arc<Assembled>>>>,
    tables: RwLock<HashMap<Key, CorpusResult<Arc<Table>>>>,
}

impl std::fmt::Debug for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Corpus")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl Corpus {
    /// Open the corpus directory named by `config` (or discovered, see [`crate::config::find_corpus_dir`]).
    ///
    /// ## Errors
    /// [`CorpusError::Io`] if no corpus directory is found or it cannot be listed.
    pub fn open(config: CorpusConfig) -> CorpusResult<Self> {
        let root = config.resolve_root().ok_or_else(|| CorpusError::Io {
            path: CORPUS_DIR_NAME.to_string(),
            message: format!("corpus directory not found; pass --corpus or set {CORPUS_ENV}"),
        })?;
        tracing::debug!(root = %root.display(), "opening corpus");
        Self::with_store(FsStore::new(root), config)
    }

    /// Build a corpus over any store.
    ///
    /// ## Errors
    /// Propagates listing errors from the store.
    pub fn with_store(store: impl SourceStore + 'static, config: CorpusConfig) -> CorpusResult<Self> {
        let catalog = Catalog::scan(&store, &config)?;
        Ok(Self {
            store: Box::new(store),
            config,
            catalog,
            assembled: RwLock::new(HashMap::new()),
            tables: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Module names, sorted.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.catalog.modules()
    }

    /// Versions of `module`, oldest first.
    pub fn versions(&self, module: &str) -> Vec<VersionTag> {
        self.catalog.versions(module)
    }

    /// The version of `module` a request selects. No request falls back to the configured default version.
    ///
    /// ## Errors
    /// [`CorpusError::NoVersionAvailable`] for an unknown module.
    pub fn select_version(&self, module: &str, requested: Option<&VersionTag>) -> CorpusResult<(VersionTag, MatchKind)> {
        let requested = requested.or(self.config.default_version.as_ref());
        version::resolve(module, &self.catalog.versions(module), requested)
    }

    /// The table of `module` at the requested version (`None` or blank means the default, else latest).
    ///
    /// ## Errors
    /// - [`CorpusError::InvalidVersion`] for an unparsable version string.
    /// - [`CorpusError::NoVersionAvailable`] for an unknown module.
    /// - [`CorpusError::Parse`] or [`CorpusError::CompositionCycle`] when the selected version cannot be built.
    pub fn resolve(&self, module: &str, requested: Option<&str>) -> CorpusResult<Arc<Table>> {
        let requested = version::parse_request(requested)?;
        self.resolve_at(module, requested.as_ref())
    }

    /// Like [`Corpus::resolve`], with an already parsed version.
    ///
    /// ## Errors
    /// See [`Corpus::resolve`].
    pub fn resolve_at(&self, module: &str, requested: Option<&VersionTag>) -> CorpusResult<Arc<Table>> {
        let (selected, _) = self.select_version(module, requested)?;
        self.table(module, &selected)
    }

    /// Every module at the requested version, built in parallel. Results are sorted by module name.
    ///
    /// ## Errors
    /// [`CorpusError::InvalidVersion`] for an unparsable version string. Per-module failures are returned in
    /// place of their tables.
    pub fn resolve_all(&self, requested: Option<&str>) -> CorpusResult<Vec<(String, CorpusResult<Arc<Table>>)>> {
        let requested = version::parse_request(requested)?;
        let modules: Vec<&str> = self.catalog.modules().collect();
        Ok(modules
            .par_iter()
            .map(|module| (module.to_string(), self.resolve_at(module, requested.as_ref())))
            .collect())
    }

    /// Build every module at every version it is available in and collect the failures.
    #[tracing::instrument(skip_all)]
    pub fn check(&self) -> CheckReport {
        let jobs: Vec<Key> = self
            .catalog
            .modules()
            .flat_map(|m| self.catalog.versions(m).into_iter().map(move |v| (m.to_string(), v)))
            .collect();
        let results: Vec<(Key, CorpusResult<Arc<Table>>)> = jobs
            .into_par_iter()
            .map(|(module, version)| {
                let result = self.table(&module, &version);
                ((module, version), result)
            })
            .collect();

        let mut report = CheckReport::default();
        for ((module, version), result) in results {
            match result {
                Ok(_) => report.built += 1,
                Err(error) => report.failures.push(CheckFailure { module, version, error }),
            }
        }
        tracing::debug!(built = report.built, failed = report.failures.len(), "corpus checked");
        report
    }

    /// Resolve a documented type against `table`'s module and the corpus at the same version.
    pub fn resolve_type(&self, table: &Table, ty: &TypeRef) -> TypeResolution {
        if ty.builtin().is_some() {
            return TypeResolution::Builtin {
                name: ty.as_str().to_string(),
            };
        }
        let target = table.scope().locate(ty.as_str());
        let found = if target.module == table.module() {
            table.lookup_internal(&target.name).cloned()
        } else {
            match self.resolve_at(&target.module, Some(table.version())) {
                Ok(other) => other.lookup_internal(&target.name).cloned(),
                Err(e) => {
                    tracing::debug!(ty = %ty, module = %target.module, error = %e, "type reference into unavailable module");
                    None
                }
            }
        };
        match found {
            Some(symbol) => TypeResolution::Symbol {
                module: target.module,
                symbol,
            },
            None => TypeResolution::Unresolved {
                module: target.module,
                name: target.name,
            },
        }
    }

    /// The built table of `module` at exactly `version`.
    fn table(&self, module: &str, version: &VersionTag) -> CorpusResult<Arc<Table>> {
        let key = (module.to_string(), version.clone());
        if let Some(cached) = self.tables.read().get(&key) {
            return cached.clone();
        }
        // Built outside the lock: building re-enters the corpus for collaborators.
        let built = self
            .assembled(module, version)
            .and_then(|primary| builder::build_table(primary, self))
            .map(Arc::new);
        if let Err(e) = &built {
            tracing::warn!(module, version = %version, error = %e, "module unavailable at this version");
        }
        self.tables.write().entry(key).or_insert(built).clone()
    }

    /// Assembled declarations of `module` at exactly `version`.
    fn assembled(&self, module: &str, version: &VersionTag) -> CorpusResult<Arc<Assembled>> {
        let key = (module.to_string(), version.clone());
        if let Some(cached) = self.assembled.read().get(&key) {
            return cached.clone();
        }
        let loaded = self.load(module, version).map(Arc::new);
        self.assembled.write().entry(key).or_insert(loaded).clone()
    }

    fn load(&self, module: &str, version: &VersionTag) -> CorpusResult<Assembled> {
        let entry = self
            .catalog
            .entry(module, version)
            .ok_or_else(|| CorpusError::NoVersionAvailable {
                module: module.to_string(),
            })?;
        let source = self.store.read(&entry.file)?;
        let options = DocOptions {
            strip_html: self.config.strip_html,
        };
        let file = entry.file.to_string();
        let raw = frontend::load_source(module, &file, &source, entry.format, &options).map_err(|diagnostics| {
            CorpusError::Parse {
                module: module.to_string(),
                version: version.clone(),
                file,
                diagnostics,
            }
        })?;
        Ok(builder::assemble(module, version, raw))
    }
}

impl CollaboratorSource for Corpus {
    fn collaborator(&self, module: &str, version: &VersionTag) -> Result<Arc<Assembled>, CorpusError> {
        let (selected, _) = version::resolve(module, &self.catalog.versions(module), Some(version))?;
        self.assembled(module, &selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SymbolKind;

    const EVENTS: &str = r#"
var events = {};
/** @constructor */
events.EventEmitter = function() {}
events.EventEmitter.prototype.on = function(event, listener) {}
events.EventEmitter.prototype.emit = function(event) {}
"#;

    const NET_06: &str = r#"
var net = {};
net.Socket = function() {}
net.Socket.prototype = new events.EventEmitter();
net.Socket.prototype.write = function(data) {}
"#;

    const NET_08: &str = r#"
var net = {};
net.Socket = function() {}
net.Socket.prototype = new events.EventEmitter();
/** @returns {Boolean} */
net.Socket.prototype.write = function(data, encoding) {}
/** @returns {events.EventEmitter} */
net.Socket.prototype.ref = function() {}
net.isIP = function(input) {}
"#;

    fn corpus() -> Corpus {
        let store = MemoryStore::new()
            .with_file("events.js", EVENTS)
            .with_file("0.6/net.js", NET_06)
            .with_file("0.8/net.js", NET_08)
            .with_file("0.8/broken.js", "var broken = ;");
        Corpus::with_store(store, CorpusConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_selects_nearest_version() {
        let c = corpus();
        let t = c.resolve("net", Some("0.7")).unwrap();
        assert_eq!(t.version().to_string(), "0.6");
        assert!(t.lookup("isIP").found().is_none());
        let latest = c.resolve("net", None).unwrap();
        assert_eq!(latest.version().to_string(), "0.8");
        assert!(latest.lookup("isIP").is_found());
    }

    #[test]
    fn test_collaborator_composed_at_nearest_version() {
        let c = corpus();
        let t = c.resolve("net", Some("0.8")).unwrap();
        let on = t.lookup("Socket.on").found().unwrap();
        assert_eq!(on.kind, SymbolKind::Function);
        assert_eq!(on.origin.as_ref().map(|o| o.module.as_str()), Some("events"));
    }

    #[test]
    fn test_tables_are_cached() {
        let c = corpus();
        let a = c.resolve("net", None).unwrap();
        let b = c.resolve("net", Some("0.8")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_errors_are_localized() {
        let c = corpus();
        assert!(matches!(c.resolve("broken", None), Err(CorpusError::Parse { .. })));
        assert!(matches!(c.resolve("nosuch", None), Err(CorpusError::NoVersionAvailable { .. })));
        assert!(matches!(c.resolve("net", Some("x..y")), Err(CorpusError::InvalidVersion(_))));
        assert!(c.resolve("net", None).is_ok());
    }

    #[test]
    fn test_check_reports_every_failure() {
        let report = corpus().check();
        assert_eq!(report.built, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].module, "broken");
    }

    #[test]
    fn test_resolve_all_in_module_order() {
        let c = corpus();
        let all = c.resolve_all(Some("0.8")).unwrap();
        let names: Vec<_> = all.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(names, ["broken", "events", "net"]);
        assert!(all[0].1.is_err());
        assert!(all[2].1.is_ok());
    }

    #[test]
    fn test_resolve_type_across_modules() {
        let c = corpus();
        let t = c.resolve("net", None).unwrap();
        let ref_ty = t.lookup("Socket.ref").found().and_then(|s| s.returns()).unwrap().clone();
        match c.resolve_type(&t, &ref_ty) {
            TypeResolution::Symbol { module, symbol } => {
                assert_eq!(module, "events");
                assert_eq!(symbol.qualified_name, "EventEmitter");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            c.resolve_type(&t, &TypeRef::new("Boolean")),
            TypeResolution::Builtin { .. }
        ));
        assert!(matches!(
            c.resolve_type(&t, &TypeRef::new("Missing")),
            TypeResolution::Unresolved { .. }
        ));
    }

    #[test]
    fn test_default_version_from_config() {
        let store = MemoryStore::new()
            .with_file("events.js", EVENTS)
            .with_file("0.6/net.js", NET_06)
            .with_file("0.8/net.js", NET_08);
        let config = CorpusConfig::new().with_default_version("0.6".parse().unwrap());
        let c = Corpus::with_store(store, config).unwrap();
        assert_eq!(c.resolve("net", None).unwrap().version().to_string(), "0.6");
    }
}
