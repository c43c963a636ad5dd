//! Doc-comment tag vocabulary.
//!
//! Declaration stubs carry their structure in JSDoc-style tags (`@param`, `@returns`, `@constructor`, ...).
//! This registry records every tag the doc parser understands, its accepted spellings and the shape of its
//! argument so the parser can stay table-driven.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** (`@memberOf` is not `@memberof`).
//! - Tags not in this registry are preserved verbatim by the doc parser; they are not errors.
//! - `@__local__` is the internal/local-only visibility marker.
//!
//! ## Examples
//! ```rust
//! use stubdex_core::lang::doc_tags::{self, DocTagId, TagArg};
//!
//! assert_eq!(doc_tags::from_str("returns"), Some(DocTagId::Returns));
//! assert_eq!(doc_tags::from_str("return"), Some(DocTagId::Returns));
//! assert_eq!(doc_tags::arg_shape(DocTagId::Param), TagArg::Param);
//! ```

use super::registry::{LangItemInfo, Stability};

/// Stable identifier for a recognized doc tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocTagId {
    // Signature
    Param,
    Returns,
    Type,

    // Shape
    Constructor,
    Class,
    Base,
    Event,

    // Visibility / attributes
    Local,
    Private,
    Static,
    Deprecated,
    Constant,

    // Prose
    Description,
    Since,
    See,
    Throws,
}

/// Shape of the text following a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagArg {
    /// The tag is a flag; trailing text is ignored.
    Flag,
    /// `name[=default] [{Type}] [doc]` or `{Type} name[=default] [doc]`.
    Param,
    /// `[{Type}] [doc]`, or a bare type word followed by doc.
    TypeAndText,
    /// A single (possibly dotted) name.
    Name,
    /// Free text.
    Text,
}

/// Metadata for a doc tag.
#[derive(Debug, Clone, Copy)]
pub struct DocTagInfo {
    pub item: LangItemInfo<DocTagId>,
    pub arg: TagArg,
}

/// Registry of all recognized doc tags.
pub const DOC_TAGS: &[DocTagInfo] = &[
    info(
        DocTagId::Param,
        "param",
        &["argument", "arg"],
        TagArg::Param,
        "Describe a function parameter: name, optional default, optional type and text.",
    ),
    info(
        DocTagId::Returns,
        "returns",
        &["return"],
        TagArg::TypeAndText,
        "Describe the return value of a function.",
    ),
    info(
        DocTagId::Type,
        "type",
        &["property"],
        TagArg::TypeAndText,
        "Declare the value type of a property.",
    ),
    info(
        DocTagId::Constructor,
        "constructor",
        &["constructs"],
        TagArg::Flag,
        "Mark a function as a constructor.",
    ),
    info(
        DocTagId::Class,
        "class",
        &[],
        TagArg::Text,
        "Mark a function as a constructor; the text is the class description.",
    ),
    info(
        DocTagId::Base,
        "base",
        &["extends", "augments"],
        TagArg::Name,
        "Declare that instances also expose the members of another constructor.",
    ),
    info(
        DocTagId::Event,
        "event",
        &[],
        TagArg::Flag,
        "Mark a function as an event handler signature.",
    ),
    info(
        DocTagId::Local,
        "__local__",
        &["inner", "ignore"],
        TagArg::Flag,
        "Hide the declaration from listings; it stays resolvable for composition.",
    ),
    info(
        DocTagId::Private,
        "private",
        &[],
        TagArg::Flag,
        "Member is private to its owner.",
    ),
    info(
        DocTagId::Static,
        "static",
        &[],
        TagArg::Flag,
        "Member belongs to the constructor, not its instances.",
    ),
    info(
        DocTagId::Deprecated,
        "deprecated",
        &[],
        TagArg::Text,
        "Member is no longer supported.",
    ),
    info(
        DocTagId::Constant,
        "constant",
        &["final", "const"],
        TagArg::Flag,
        "Value never changes.",
    ),
    info(
        DocTagId::Description,
        "description",
        &["desc"],
        TagArg::Text,
        "Continue the summary text.",
    ),
    info(
        DocTagId::Since,
        "since",
        &[],
        TagArg::Text,
        "Version in which the member was introduced.",
    ),
    info(DocTagId::See, "see", &["link"], TagArg::Text, "Reference to another symbol."),
    info(
        DocTagId::Throws,
        "throws",
        &["exception"],
        TagArg::TypeAndText,
        "Error type the call may raise.",
    ),
];

/// Return the canonical spelling for a doc tag (without the leading `@`).
pub fn as_str(id: DocTagId) -> &'static str {
    info_for(id).item.canonical
}

/// Return the accepted aliases for a doc tag.
pub fn aliases(id: DocTagId) -> &'static [&'static str] {
    info_for(id).item.aliases
}

/// Return the argument shape for a doc tag.
pub fn arg_shape(id: DocTagId) -> TagArg {
    info_for(id).arg
}

/// Return the full metadata entry for a doc tag.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: DocTagId) -> &'static DocTagInfo {
    DOC_TAGS
        .iter()
        .find(|t| t.item.id == id)
        .expect("doc tag info missing")
}

/// Resolve a tag spelling (without `@`) to its identifier.
pub fn from_str(s: &str) -> Option<DocTagId> {
    if let Some(t) = DOC_TAGS.iter().find(|t| t.item.canonical == s) {
        return Some(t.item.id);
    }
    DOC_TAGS
        .iter()
        .find(|t| {
            let aliases: &[&str] = t.item.aliases;
            aliases.contains(&s)
        })
        .map(|t| t.item.id)
}

const fn info(
    id: DocTagId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    arg: TagArg,
    description: &'static str,
) -> DocTagInfo {
    DocTagInfo {
        item: LangItemInfo {
            id,
            canonical,
            aliases,
            description,
            stability: Stability::Stable,
        },
        arg,
    }
}
