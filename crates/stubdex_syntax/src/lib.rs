//! Syntax frontend for declaration stubs: lexer, parser, AST, doc comments, diagnostics.
//!
//! A stub file is a restricted JavaScript-like script: namespace objects, constructor functions with empty bodies,
//! prototype assignments and placeholder values, each annotated by a JSDoc-style comment. This crate turns such a
//! file into a [`ast::Program`] and parses the attached doc comments into [`jsdoc::DocBlock`]s.
//!
//! ## Notes
//! - This crate is “syntax-only”: it knows nothing about modules, versions or symbol tables.
//! - Vocabulary identity (keywords/punctuation/doc tags) comes from `stubdex_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use stubdex_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("var net = {};\nnet.isIP = function(input) {}\n").unwrap();
//! let program = parser::parse(&tokens).unwrap();
//! assert_eq!(program.statements.len(), 2);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod jsdoc;
pub mod lexer;
pub mod parser;
pub mod token_helpers;
