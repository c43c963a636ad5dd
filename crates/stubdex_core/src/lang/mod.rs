//! Stub-dialect vocabulary registries.
//!
//! This module is the “front door” for dialect-level vocabulary: reserved keywords, punctuation, doc-comment
//! tags, structural member markers and builtin type names.
//!
//! The design goal is to avoid stringly-typed checks scattered across the lexer, the lowering pass and the
//! builder. Instead, callers work with **stable IDs** (e.g. `KeywordId`, `DocTagId`) and look up spellings and
//! metadata via registry tables.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics,
//!   docs, rendering).
//!
//! ## Examples
//! ```rust
//! use stubdex_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("function"), Some(KeywordId::Function));
//! assert_eq!(keywords::as_str(KeywordId::Function), "function");
//! ```

pub mod builtin_types;
pub mod doc_tags;
pub mod keywords;
pub mod markers;
pub mod punctuation;
pub mod registry;
