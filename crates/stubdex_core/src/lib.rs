//! Provide the canonical vocabulary and version ordering shared by the stubdex syntax frontend and the symbol-table
//! builder.
//!
//! This crate is intentionally small and dependency-free. It contains deterministic helpers that both:
//! - the lexer/parser can use to recognize reserved words, punctuation and doc-comment tags, and
//! - the builder/query layer can use to classify structural member names, builtin type names and versions.
//!
//! ## Notes
//!
//! - This is a “vocabulary core” crate: **no IO**, no global state, and no AST types.
//! - Current scope: stub-dialect keywords and punctuation, doc tags, structural markers (`prototype`,
//!   `__events__`, ...), builtin type names, and numeric-aware version ordering.

pub mod lang;
pub mod version;

pub use version::{Version, VersionPart, VersionTag};
