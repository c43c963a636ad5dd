//! Token types for the stub lexer.
//!
//! The lexer uses **registry-backed IDs** for vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Ordinary comments are dropped by the lexer; `/** ... */` doc comments survive as [`TokenKind::DocComment`]
//!   so the parser can attach them to the next statement or object property.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use stubdex_core::lang::keywords::{self, KeywordId};
use stubdex_core::lang::punctuation::PunctuationId;

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Number(f64),
    String(String),

    // ========== Trivia kept for the parser ==========
    /// Body of a `/** ... */` comment, without the delimiters.
    DocComment(String),

    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
