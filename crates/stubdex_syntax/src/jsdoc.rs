//! JSDoc-style doc comment parsing.
//!
//! A doc comment body is a free-text summary followed by `@tag` lines:
//!
//! ```text
//! /**
//!  * Sends data on the socket.
//!  * @param data
//!  * @param encoding='utf-8' {String} text encoding
//!  * @returns {Boolean}
//!  */
//! ```
//!
//! Tags are recognized at the start of a line, and also inline when the tag name is one the
//! [`stubdex_core::lang::doc_tags`] registry knows (`/** @__local__ @private */`). Lines that follow a tag without
//! starting a new one continue that tag's text. Tags outside the registry are kept verbatim.
//!
//! ## Examples
//! ```rust
//! use stubdex_syntax::jsdoc::DocBlock;
//! use stubdex_core::lang::doc_tags::DocTagId;
//!
//! let doc = DocBlock::parse("\n * Pauses reading.\n * @param ms=0 {Number} delay\n * @constructor\n ");
//! assert_eq!(doc.summary, "Pauses reading.");
//! assert!(doc.has(DocTagId::Constructor));
//! let p = doc.params().next().unwrap();
//! assert_eq!((p.name.as_str(), p.default.as_deref(), p.ty.as_deref()), ("ms", Some("0"), Some("Number")));
//! ```

use stubdex_core::lang::doc_tags::{self, DocTagId, TagArg};

/// Options for doc comment parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocOptions {
    /// Remove HTML tags and decode common entities in prose (summary and tag text).
    pub strip_html: bool,
}

/// A parsed doc comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocBlock {
    /// Summary text, lines joined with `\n`; `@description` text is appended here.
    pub summary: String,
    pub tags: Vec<DocTag>,
}

/// One `@tag` with its parsed argument.
#[derive(Debug, Clone, PartialEq)]
pub struct DocTag {
    /// Spelling as written, without `@`.
    pub name: String,
    /// Registry id, `None` for unknown tags.
    pub id: Option<DocTagId>,
    pub value: TagValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Flag,
    Param(ParamDoc),
    Typed(TypedText),
    Name(String),
    Text(String),
}

/// `@param` contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamDoc {
    pub name: String,
    pub default: Option<String>,
    pub ty: Option<String>,
    pub doc: String,
    /// Written as `[name]` or `[name=default]`.
    pub optional: bool,
}

/// `@returns` / `@type` / `@throws` contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedText {
    pub ty: Option<String>,
    pub doc: String,
}

impl DocBlock {
    /// Parse a doc comment body (the text between `/**` and `*/`).
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, &DocOptions::default())
    }

    /// Parse a doc comment body with explicit options.
    pub fn parse_with(raw: &str, options: &DocOptions) -> Self {
        let mut summary: Vec<String> = Vec::new();
        let mut raw_tags: Vec<(String, String)> = Vec::new();

        for line in raw.lines().map(clean_line) {
            for piece in split_inline_tags(line) {
                if let Some(tag) = piece.strip_prefix('@') {
                    let (name, text) = split_word(tag);
                    raw_tags.push((name.to_string(), text.to_string()));
                } else if let Some((_, text)) = raw_tags.last_mut() {
                    if !piece.is_empty() {
                        if !text.is_empty() {
                            text.push('\n');
                        }
                        text.push_str(piece);
                    }
                } else {
                    summary.push(piece.to_string());
                }
            }
        }

        let mut block = DocBlock::default();
        for (name, text) in raw_tags {
            let id = doc_tags::from_str(&name);
            if id == Some(DocTagId::Description) {
                summary.push(text);
                continue;
            }
            let value = match id.map(doc_tags::arg_shape) {
                Some(TagArg::Flag) => TagValue::Flag,
                Some(TagArg::Param) => match parse_param(&text) {
                    Some(param) => TagValue::Param(param),
                    None => continue,
                },
                Some(TagArg::TypeAndText) => TagValue::Typed(parse_typed_text(&text)),
                Some(TagArg::Name) => match parse_name(&text) {
                    Some(name) => TagValue::Name(name),
                    None => continue,
                },
                Some(TagArg::Text) | None => TagValue::Text(text.trim().to_string()),
            };
            block.tags.push(DocTag { name, id, value });
        }

        block.summary = summary.join("\n").trim().to_string();
        if options.strip_html {
            block.strip_html();
        }
        block
    }

    fn strip_html(&mut self) {
        self.summary = strip_html(&self.summary);
        for tag in &mut self.tags {
            match &mut tag.value {
                TagValue::Param(p) => p.doc = strip_html(&p.doc),
                TagValue::Typed(t) => t.doc = strip_html(&t.doc),
                TagValue::Text(t) => *t = strip_html(t),
                TagValue::Flag | TagValue::Name(_) => {}
            }
        }
    }

    /// Return `true` if a tag with this id is present.
    pub fn has(&self, id: DocTagId) -> bool {
        self.tags.iter().any(|t| t.id == Some(id))
    }

    /// `@param` entries in order.
    pub fn params(&self) -> impl Iterator<Item = &ParamDoc> {
        self.tags.iter().filter_map(|t| match &t.value {
            TagValue::Param(p) => Some(p),
            _ => None,
        })
    }

    /// The `@param` entry for `name`, if documented.
    pub fn param(&self, name: &str) -> Option<&ParamDoc> {
        self.params().find(|p| p.name == name)
    }

    /// The last `@returns` entry.
    pub fn returns(&self) -> Option<&TypedText> {
        self.typed(DocTagId::Returns)
    }

    /// Value type from the last `@type` entry.
    pub fn value_type(&self) -> Option<&str> {
        self.typed(DocTagId::Type).and_then(|t| t.ty.as_deref())
    }

    fn typed(&self, id: DocTagId) -> Option<&TypedText> {
        self.tags.iter().rev().find_map(|t| match &t.value {
            TagValue::Typed(typed) if t.id == Some(id) => Some(typed),
            _ => None,
        })
    }

    /// Names given by `@base` / `@extends` / `@augments`, in order.
    pub fn bases(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().filter_map(|t| match &t.value {
            TagValue::Name(name) if t.id == Some(DocTagId::Base) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Text of the first tag with this id, for text-shaped tags (`@deprecated`, `@since`, `@class`, ...).
    pub fn text(&self, id: DocTagId) -> Option<&str> {
        self.tags.iter().find_map(|t| match &t.value {
            TagValue::Text(text) if t.id == Some(id) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Tags not in the registry, as `(name, text)`.
    pub fn unknown_tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().filter_map(|t| match (&t.id, &t.value) {
            (None, TagValue::Text(text)) => Some((t.name.as_str(), text.as_str())),
            _ => None,
        })
    }

    /// First non-empty summary line.
    pub fn summary_line(&self) -> Option<&str> {
        self.summary.lines().map(str::trim).find(|l| !l.is_empty())
    }
}

// ============================================================================
// Line handling
// ============================================================================

/// Trim a raw comment line and drop its leading `*` decoration.
fn clean_line(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix('*').map(str::trim_start).unwrap_or(line);
    line.trim_end()
}

/// Split a line before every `@tag` that starts it or that names a registry tag after whitespace.
fn split_inline_tags(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let bytes = line.as_bytes();
    for (i, _) in line.match_indices('@') {
        if i == 0 || !bytes[i - 1].is_ascii_whitespace() {
            continue;
        }
        let (name, _) = split_word(&line[i + 1..]);
        if doc_tags::from_str(name).is_some() {
            pieces.push(line[start..i].trim_end());
            start = i;
        }
    }
    pieces.push(&line[start..]);
    pieces
}

/// Split off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

/// Split `{...}` off the front of `s`, balancing nested braces. `s` must start with `{`.
fn take_braced(s: &str) -> (&str, &str) {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return (&s[1..i], &s[i + 1..]);
                }
            }
            _ => {}
        }
    }
    (&s[1..], "")
}

// ============================================================================
// Tag arguments
// ============================================================================

/// Parse `name[=default] [{Type}] [doc]` or `{Type} name[=default] [doc]`.
///
/// Returns `None` when no parameter name is present.
fn parse_param(text: &str) -> Option<ParamDoc> {
    let mut rest = text.trim();
    let mut ty = None;

    if rest.starts_with('{') {
        let (raw_ty, after) = take_braced(rest);
        ty = normalize_type(raw_ty);
        rest = after.trim_start();
    }

    let (token, after) = take_param_token(rest);
    rest = after.trim_start();

    if ty.is_none() && rest.starts_with('{') {
        let (raw_ty, after) = take_braced(rest);
        ty = normalize_type(raw_ty);
        rest = after.trim_start();
    }

    let (token, optional) = match token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        Some(inner) => (inner, true),
        None => (token, false),
    };
    let (name, default) = match token.split_once('=') {
        Some((name, default)) => (name.trim(), Some(default.trim())),
        None => (token.trim(), None),
    };
    if name.is_empty() {
        return None;
    }

    Some(ParamDoc {
        name: name.to_string(),
        default: default.filter(|d| !d.is_empty()).map(str::to_string),
        ty,
        doc: rest.to_string(),
        optional,
    })
}

/// Split the `name[=default]` token off the front, honoring quotes and `[...]`.
fn take_param_token(s: &str) -> (&str, &str) {
    let mut quote: Option<char> = None;
    let mut brackets = 0usize;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '[') => brackets += 1,
            (None, ']') => brackets = brackets.saturating_sub(1),
            (None, '{') if brackets == 0 => return (&s[..i], &s[i..]),
            (None, c) if c.is_whitespace() && brackets == 0 => return (&s[..i], &s[i..]),
            _ => {}
        }
    }
    (s, "")
}

/// Parse `[{Type}] [doc]`. Without braces, a leading word is taken as the type only when it looks like a
/// type name: it starts with an uppercase letter or is a dotted path (`net.Socket`).
fn parse_typed_text(text: &str) -> TypedText {
    let text = text.trim();
    if text.starts_with('{') {
        let (raw_ty, after) = take_braced(text);
        return TypedText {
            ty: normalize_type(raw_ty),
            doc: after.trim().to_string(),
        };
    }

    let (word, rest) = split_word(text);
    let looks_like_type = word.starts_with(|c: char| c.is_ascii_uppercase())
        || (word.contains('.') && word.split('.').all(|s| !s.is_empty() && is_type_word(s)));
    if looks_like_type && word.chars().all(|c| is_type_word_char(c) || c == '.' || c == '|' || c == '[' || c == ']') {
        TypedText {
            ty: normalize_type(word),
            doc: rest.to_string(),
        }
    } else {
        TypedText {
            ty: None,
            doc: text.to_string(),
        }
    }
}

/// Parse a single (possibly braced, possibly dotted) name.
fn parse_name(text: &str) -> Option<String> {
    let text = text.trim();
    if text.starts_with('{') {
        return normalize_type(take_braced(text).0);
    }
    let (word, _) = split_word(text);
    (!word.is_empty()).then(|| word.to_string())
}

fn is_type_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_type_word(s: &str) -> bool {
    s.chars().all(is_type_word_char)
}

/// Normalize a documented type expression to a single type name.
///
/// - `<a href=...>Name</a>` keeps the link text.
/// - Only the first alternative of `A|B` is kept.
/// - `{name: Type}` record syntax keeps `Type`.
/// - Anything with `[]` collapses to `Array`; generic arguments (`Array.<String>`) are dropped.
/// - Nullability / optional markers (`?T`, `!T`, `T=`) are removed.
///
/// Returns `None` for an empty type or the wildcard `*`.
///
/// ## Examples
/// ```rust
/// use stubdex_syntax::jsdoc::normalize_type;
///
/// assert_eq!(normalize_type("Number|Array[]").as_deref(), Some("Number"));
/// assert_eq!(normalize_type("Array[](Number[])").as_deref(), Some("Array"));
/// assert_eq!(normalize_type("net.Socket").as_deref(), Some("net.Socket"));
/// assert_eq!(normalize_type("*"), None);
/// ```
pub fn normalize_type(raw: &str) -> Option<String> {
    let mut value = raw.trim();

    let link_text;
    if value.contains("<a ") {
        if let Some(end) = value.find("</a>") {
            let inner = &value[..end];
            link_text = inner.rsplit('>').next().unwrap_or(inner).trim().to_string();
            value = &link_text;
        }
    }

    if let Some(pos) = value.find('|') {
        if pos > 0 {
            value = value[..pos].trim();
        }
    }
    if let Some((_, after)) = value.split_once(':') {
        value = after.trim();
    }

    if value.contains('[') {
        return Some("Array".to_string());
    }
    if let Some(pos) = value.find(".<").or_else(|| value.find('<')) {
        value = &value[..pos];
    }
    let value = value.trim_start_matches(['?', '!']).trim_end_matches('=').trim();
    if value.is_empty() || value == "*" {
        None
    } else {
        Some(value.to_string())
    }
}

/// Remove HTML tags and decode the common entities.
///
/// ## Examples
/// ```rust
/// use stubdex_syntax::jsdoc::strip_html;
///
/// assert_eq!(strip_html("Use <code>fs.open()</code> &amp; friends"), "Use fs.open() & friends");
/// ```
pub fn strip_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match (in_tag, c) {
            (true, '>') => in_tag = false,
            (true, _) => {}
            (false, '<') => in_tag = true,
            (false, _) => out.push(c),
        }
    }
    const ENTITIES: &[(&str, &str)] = &[
        ("&lt;", "<"),
        ("&#60;", "<"),
        ("&gt;", ">"),
        ("&#62;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&nbsp;", " "),
        ("&amp;", "&"),
    ];
    ENTITIES
        .iter()
        .fold(out, |acc, (entity, text)| acc.replace(entity, text))
}
