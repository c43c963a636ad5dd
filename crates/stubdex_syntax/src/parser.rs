//! Parser for declaration stubs
//!
//! Converts a token stream into a [`Program`]: a flat list of `var`, assignment and function statements, each
//! carrying the doc comment written in front of it.
//!
//! ## Examples
//!
//! ```rust
//! use stubdex_syntax::{lexer, parser};
//! use stubdex_syntax::ast::StatementKind;
//!
//! let source = "/** @constructor */\nnet.Socket = function() {}\n";
//! let tokens = lexer::lex(source).unwrap();
//! let ast = parser::parse(&tokens).unwrap();
//! assert!(matches!(ast.statements[0].node.kind, StatementKind::Assign(_)));
//! assert!(ast.statements[0].node.doc.is_some());
//! ```

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenKind};
use stubdex_core::lang::keywords::{self, KeywordId};
use stubdex_core::lang::punctuation::{self, PunctuationId};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
