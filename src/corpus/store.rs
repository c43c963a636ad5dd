//! Read-only declaration source storage.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CorpusError, CorpusResult};

/// Maximum source file size (100 MB).
pub const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// A source file, addressed by its optional version directory and file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceFile {
    /// Version directory under the corpus root; `None` for files at the root (the base tier).
    pub dir: Option<String>,
    pub file_name: String,
}

impl SourceFile {
    pub fn new(dir: Option<&str>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.map(str::to_string),
            file_name: file_name.into(),
        }
    }

    /// Parse `net.js` or `0.8/net.js`.
    pub fn from_path(path: &str) -> Self {
        match path.rsplit_once('/') {
            Some((dir, file)) => Self::new(Some(dir), file),
            None => Self::new(None, path),
        }
    }

    /// `(stem, extension)` of the file name.
    pub fn stem_and_extension(&self) -> Option<(&str, &str)> {
        self.file_name.rsplit_once('.').filter(|(stem, _)| !stem.is_empty())
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dir {
            Some(dir) => write!(f, "{dir}/{}", self.file_name),
            None => f.write_str(&self.file_name),
        }
    }
}

/// Where declaration sources come from.
pub trait SourceStore: Send + Sync {
    /// Every file at the root and one directory level below it.
    ///
    /// ## Errors
    /// [`CorpusError::Io`] if the store cannot be listed.
    fn list(&self) -> CorpusResult<Vec<SourceFile>>;

    /// Contents of one listed file.
    ///
    /// ## Errors
    /// [`CorpusError::Io`] if the file cannot be read or is too large.
    fn read(&self, file: &SourceFile) -> CorpusResult<String>;
}

/// A corpus directory on disk: `<root>/<module>.js` and `<root>/<version>/<module>.js`.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, file: &SourceFile) -> PathBuf {
        match &file.dir {
            Some(dir) => self.root.join(dir).join(&file.file_name),
            None => self.root.join(&file.file_name),
        }
    }
}

/// Visible (non-dot) entries of a directory as (name, is_dir).
fn read_dir_entries(dir: &Path) -> CorpusResult<Vec<(String, bool)>> {
    let entries = fs::read_dir(dir).map_err(|e| CorpusError::io(dir, &e))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CorpusError::io(dir, &e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().map_err(|e| CorpusError::io(entry.path(), &e))?.is_dir();
        out.push((name, is_dir));
    }
    out.sort();
    Ok(out)
}

impl SourceStore for FsStore {
    fn list(&self) -> CorpusResult<Vec<SourceFile>> {
        let mut files = Vec::new();
        for (name, is_dir) in read_dir_entries(&self.root)? {
            if !is_dir {
                files.push(SourceFile::new(None, name));
                continue;
            }
            for (file, nested_dir) in read_dir_entries(&self.root.join(&name))? {
                if !nested_dir {
                    files.push(SourceFile::new(Some(&name), file));
                }
            }
        }
        Ok(files)
    }

    fn read(&self, file: &SourceFile) -> CorpusResult<String> {
        let path = self.path_of(file);
        let metadata = fs::metadata(&path).map_err(|e| CorpusError::io(&path, &e))?;
        if metadata.len() > MAX_SOURCE_SIZE {
            return Err(CorpusError::Io {
                path: path.display().to_string(),
                message: format!("file is too large ({} bytes, max {} bytes)", metadata.len(), MAX_SOURCE_SIZE),
            });
        }
        fs::read_to_string(&path).map_err(|e| CorpusError::io(&path, &e))
    }
}

/// An in-memory bundle of sources, keyed like a corpus directory.
///
/// ## Examples
/// ```rust
/// use stubdex::corpus::{MemoryStore, SourceStore};
///
/// let store = MemoryStore::new()
///     .with_file("events.js", "var events = {};")
///     .with_file("0.8/events.js", "var events = {};");
/// assert_eq!(store.list().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<SourceFile, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at `path` (`net.js` or `0.8/net.js`).
    pub fn insert(&mut self, path: &str, contents: impl Into<String>) {
        self.files.insert(SourceFile::from_path(path), contents.into());
    }

    pub fn with_file(mut self, path: &str, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl SourceStore for MemoryStore {
    fn list(&self) -> CorpusResult<Vec<SourceFile>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn read(&self, file: &SourceFile) -> CorpusResult<String> {
        self.files.get(file).cloned().ok_or_else(|| CorpusError::Io {
            path: file.to_string(),
            message: "no such file in memory store".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_paths() {
        let f = SourceFile::from_path("0.8/net.js");
        assert_eq!(f.dir.as_deref(), Some("0.8"));
        assert_eq!(f.stem_and_extension(), Some(("net", "js")));
        assert_eq!(f.to_string(), "0.8/net.js");
        assert_eq!(SourceFile::from_path("README").stem_and_extension(), None);
        assert_eq!(SourceFile::from_path(".hidden").stem_and_extension(), None);
    }

    #[test]
    fn test_memory_store_read() {
        let store = MemoryStore::new().with_file("net.js", "var net = {};");
        assert_eq!(store.read(&SourceFile::from_path("net.js")).unwrap(), "var net = {};");
        assert!(matches!(store.read(&SourceFile::from_path("x.js")), Err(CorpusError::Io { .. })));
    }

    #[test]
    fn test_fs_store_missing_root() {
        let store = FsStore::new("/definitely/not/a/corpus/dir");
        assert!(matches!(store.list(), Err(CorpusError::Io { .. })));
    }
}
