//! Shareable metadata for `stubdex_core::lang` registries.
//!
//! The `stubdex_core::lang` module is a set of **registry-first** vocabularies: keywords, punctuation, doc tags,
//! markers and builtin types. This submodule provides the small, dependency-free metadata types reused across all
//! registries.
//!
//! ## Notes
//! - These types are intentionally lightweight and `Copy`-friendly so registries can live in `const` tables.
//! - Metadata is meant for tooling/docs/diagnostics; enforcement of syntax rules still lives in the lexer/parser.

/// Describe the lifecycle status of a vocabulary item.
///
/// ## Notes
/// - Deprecated spellings are still accepted; tooling may warn about them.
///
/// ## Examples
/// ```rust
/// use stubdex_core::lang::registry::Stability;
///
/// let s = Stability::Stable;
/// assert_eq!(format!("{s:?}"), "Stable");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Deprecated,
}

/// Shared metadata shape for “registry-first” vocabulary items.
///
/// Every vocabulary shares the same core fields:
/// - stable identity (`id`)
/// - accepted spellings (`canonical` + `aliases`)
/// - documentation (`description`)
/// - lifecycle (`stability`)
///
/// Registries that need extra per-item data (e.g. doc-tag argument shape) wrap this struct in an extension type.
#[derive(Debug, Clone, Copy)]
pub struct LangItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub stability: Stability,
}

/// Resolve a spelling to a stable id for a registry table.
///
/// Canonical spellings are preferred over aliases when both could match.
pub fn from_str_impl<Id: Copy>(items: &[LangItemInfo<Id>], name: &str) -> Option<Id> {
    if let Some(m) = items.iter().find(|m| m.canonical == name) {
        return Some(m.id);
    }
    items
        .iter()
        .find(|m| {
            let aliases: &[&str] = m.aliases;
            aliases.contains(&name)
        })
        .map(|m| m.id)
}

/// Return the registry metadata entry for a stable id.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for_impl<Id: Copy + PartialEq>(
    items: &'static [LangItemInfo<Id>],
    id: Id,
    missing_msg: &'static str,
) -> &'static LangItemInfo<Id> {
    items
        .iter()
        .find(|m| m.id == id)
        .unwrap_or_else(|| panic!("{missing_msg}"))
}

/// Build a stable registry entry.
pub const fn item<Id>(
    id: Id,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
) -> LangItemInfo<Id> {
    LangItemInfo {
        id,
        canonical,
        aliases,
        description,
        stability: Stability::Stable,
    }
}
