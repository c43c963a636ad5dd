//! Define the reserved keyword vocabulary of the declaration-stub dialect.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, categories and descriptions.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - `require` and `exports` are *not* keywords; they are ordinary identifiers with structural meaning, see
//!   [`crate::lang::markers`].
//!
//! ## Examples
//! ```rust
//! use stubdex_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("var"), Some(KeywordId::Var));
//! assert_eq!(keywords::from_str("let"), Some(KeywordId::Var)); // alias
//! assert_eq!(keywords::as_str(KeywordId::Var), "var");
//! ```

use super::registry::Stability;

/// Stable identifier for every reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Declarations
    Var,
    Function,
    New,

    // Literals
    True,
    False,
    Null,
    Undefined,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Declaration,
    Literal,
}

/// Metadata for a keyword.
///
/// ## Notes
/// - `canonical` is the preferred spelling for docs and diagnostics.
/// - `aliases` are additional spellings accepted by the lexer.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub category: KeywordCategory,
    pub description: &'static str,
    pub stability: Stability,
}

/// Registry of all keywords.
pub const KEYWORDS: &[KeywordInfo] = &[
    info(
        KeywordId::Var,
        "var",
        &["let", "const"],
        KeywordCategory::Declaration,
        "Bind a top-level name (a namespace object, a module alias or a value).",
    ),
    info(
        KeywordId::Function,
        "function",
        &[],
        KeywordCategory::Declaration,
        "Introduce a function value or a bare function declaration.",
    ),
    info(
        KeywordId::New,
        "new",
        &[],
        KeywordCategory::Declaration,
        "Instantiate a constructor; on a prototype assignment this declares a composed shape.",
    ),
    info(KeywordId::True, "true", &[], KeywordCategory::Literal, "Boolean true literal."),
    info(KeywordId::False, "false", &[], KeywordCategory::Literal, "Boolean false literal."),
    info(KeywordId::Null, "null", &[], KeywordCategory::Literal, "Null placeholder value."),
    info(
        KeywordId::Undefined,
        "undefined",
        &[],
        KeywordCategory::Literal,
        "Undefined placeholder value.",
    ),
];

/// Return the canonical spelling for a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Return the accepted aliases for a keyword.
pub fn aliases(id: KeywordId) -> &'static [&'static str] {
    info_for(id).aliases
}

/// Return the full metadata entry for a keyword.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS
        .iter()
        .find(|k| k.id == id)
        .expect("keyword info missing")
}

/// Resolve a keyword spelling to its identifier.
pub fn from_str(s: &str) -> Option<KeywordId> {
    if let Some(k) = KEYWORDS.iter().find(|k| k.canonical == s) {
        return Some(k.id);
    }
    KEYWORDS
        .iter()
        .find(|k| {
            let aliases: &[&str] = k.aliases;
            aliases.contains(&s)
        })
        .map(|k| k.id)
}

const fn info(
    id: KeywordId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    category: KeywordCategory,
    description: &'static str,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        aliases,
        category,
        description,
        stability: Stability::Stable,
    }
}
