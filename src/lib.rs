#![forbid(unsafe_code)]
//! stubdex: versioned symbol tables for declaration-stub corpora
//!
//! A corpus describes the public surface of a standard library across versions: one stub file per module and
//! version, listing functions, constructors, prototype members, properties and events with doc comments. This
//! crate parses a corpus, builds one immutable symbol table per (module, version), flattens capability
//! relations into the composing types, resolves versions, and answers point and prefix queries.
//!
//! ## Examples
//! ```rust
//! use stubdex::config::CorpusConfig;
//! use stubdex::corpus::{Corpus, MemoryStore};
//!
//! let store = MemoryStore::new().with_file("dns.js", "var dns = {};\ndns.lookup = function(domain, callback) {}\n");
//! let corpus = Corpus::with_store(store, CorpusConfig::default()).unwrap();
//! let table = corpus.resolve("dns", None).unwrap();
//! assert!(table.lookup("lookup").is_found());
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`. Malformed corpus input is reported as a [`error::CorpusError`] for the
//!   affected (module, version), never as a panic.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod builder;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod frontend;
pub mod model;
pub mod render;
pub mod table;
pub mod version;

pub use config::CorpusConfig;
pub use corpus::{Corpus, TypeResolution};
pub use error::{CorpusError, CorpusResult};
pub use model::{Symbol, SymbolKind};
pub use table::{Lookup, Table};
