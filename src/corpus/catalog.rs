//! Which modules exist, at which versions, in which files.

use std::collections::{BTreeMap, BTreeSet};

use stubdex_core::version::{Version, VersionTag};

use super::store::{SourceFile, SourceStore};
use crate::config::CorpusConfig;
use crate::error::CorpusResult;
use crate::frontend::SourceFormat;

/// The source file for one (module, version).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub file: SourceFile,
    pub format: SourceFormat,
}

/// Index of a corpus: module name to its versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    modules: BTreeMap<String, BTreeMap<VersionTag, CatalogEntry>>,
}

impl Catalog {
    /// Index every source the store lists.
    ///
    /// Files with other extensions and directories that are not version numbers are skipped. When a module has
    /// both a stub and a JSON source for one version, the stub source is used.
    ///
    /// ## Errors
    /// Propagates listing errors from the store.
    #[tracing::instrument(skip_all)]
    pub fn scan(store: &dyn SourceStore, config: &CorpusConfig) -> CorpusResult<Self> {
        let mut catalog = Catalog::default();
        for file in store.list()? {
            let Some((stem, ext)) = file.stem_and_extension() else {
                continue;
            };
            let format = if config.is_stub_extension(ext) {
                SourceFormat::Stub
            } else if config.json_sources && ext.eq_ignore_ascii_case("json") {
                SourceFormat::Json
            } else {
                tracing::trace!(file = %file, "skipping non-source file");
                continue;
            };
            let version = match &file.dir {
                None => VersionTag::Base,
                Some(dir) => match Version::parse_release(dir) {
                    Ok(v) => VersionTag::Release(v),
                    Err(e) => {
                        tracing::debug!(file = %file, error = %e, "skipping file outside a version directory");
                        continue;
                    }
                },
            };

            let module = stem.to_string();
            let versions = catalog.modules.entry(module.clone()).or_default();
            match versions.get(&version) {
                Some(existing) if existing.format <= format => {
                    tracing::warn!(module, version = %version, kept = %existing.file, ignored = %file, "duplicate source");
                }
                _ => {
                    versions.insert(version, CatalogEntry { file, format });
                }
            }
        }
        tracing::debug!(modules = catalog.modules.len(), "catalog scanned");
        Ok(catalog)
    }

    /// Module names, sorted.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// Versions of `module`, oldest first; empty for an unknown module.
    pub fn versions(&self, module: &str) -> Vec<VersionTag> {
        self.modules
            .get(module)
            .map(|v| v.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Every version any module is available in.
    pub fn all_versions(&self) -> BTreeSet<VersionTag> {
        self.modules.values().flat_map(|v| v.keys().cloned()).collect()
    }

    pub fn entry(&self, module: &str, version: &VersionTag) -> Option<&CatalogEntry> {
        self.modules.get(module)?.get(version)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, MemoryStore};

    fn scan(store: &MemoryStore) -> Catalog {
        Catalog::scan(store, &CorpusConfig::default()).unwrap()
    }

    #[test]
    fn test_scan_versions_and_formats() {
        let store = MemoryStore::new()
            .with_file("net.js", "")
            .with_file("0.8/net.js", "")
            .with_file("0.10/net.js", "")
            .with_file("0.6/dns.json", "")
            .with_file("README.md", "")
            .with_file("drafts/net.js", "");
        let catalog = scan(&store);
        assert_eq!(catalog.modules().collect::<Vec<_>>(), ["dns", "net"]);
        let versions: Vec<String> = catalog.versions("net").iter().map(ToString::to_string).collect();
        assert_eq!(versions, ["base", "0.8", "0.10"]);
        assert_eq!(
            catalog.entry("dns", &"0.6".parse().unwrap()).map(|e| e.format),
            Some(SourceFormat::Json)
        );
        assert!(catalog.versions("nosuch").is_empty());
        assert_eq!(catalog.all_versions().len(), 4);
    }

    #[test]
    fn test_non_release_directories_never_become_latest() {
        let store = MemoryStore::new()
            .with_file("0.8/net.js", "var net = {};\nnet.isIP = function(input) {}\n")
            .with_file("drafts/net.js", "var net = {};\nnet.wip = function() {}\n")
            .with_file("old.2/net.js", "");
        let catalog = scan(&store);
        let versions: Vec<String> = catalog.versions("net").iter().map(ToString::to_string).collect();
        assert_eq!(versions, ["0.8"]);

        let corpus = Corpus::with_store(store, CorpusConfig::default()).unwrap();
        let table = corpus.resolve("net", None).unwrap();
        assert_eq!(table.version().to_string(), "0.8");
        assert!(!table.lookup("wip").is_found());
    }

    #[test]
    fn test_stub_source_preferred_over_json() {
        let store = MemoryStore::new().with_file("a.json", "").with_file("a.js", "");
        let catalog = scan(&store);
        assert_eq!(catalog.entry("a", &VersionTag::Base).map(|e| e.format), Some(SourceFormat::Stub));
    }

    #[test]
    fn test_json_sources_can_be_disabled() {
        let store = MemoryStore::new().with_file("a.json", "");
        let catalog = Catalog::scan(&store, &CorpusConfig::new().with_json_sources(false)).unwrap();
        assert!(catalog.is_empty());
    }
}
