//! Text rendering of symbols: call tips, completion listings and lookup details.
//!
//! A call tip is the signature line (`name(a, b='x', c)`, or `name(...)` when no parameter list is known),
//! one line per earlier overload, then the doc text. Doc text is prefixed with the symbol's attributes in
//! upper case (`DEPRECATED STATIC: ...`) when it has any.

use std::fmt::Write as _;

use serde::Serialize;

use crate::model::{Signature, Symbol, SymbolKind, Visibility};

/// `name(a, b='x', c)` for one signature.
pub fn signature_line(name: &str, signature: &Signature) -> String {
    let mut out = String::with_capacity(name.len() + 16);
    out.push_str(name);
    out.push('(');
    for (i, param) in signature.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&param.name);
        if let Some(default) = &param.default {
            out.push('=');
            out.push_str(default);
        }
    }
    out.push(')');
    if let Some(returns) = &signature.returns {
        let _ = write!(out, " -> {returns}");
    }
    out
}

/// Upper-case attribute words, in a fixed order.
pub fn attribute_words(symbol: &Symbol) -> Vec<&'static str> {
    let attrs = &symbol.attributes;
    let mut words = Vec::new();
    if attrs.deprecated.is_some() {
        words.push("DEPRECATED");
    }
    if attrs.private {
        words.push("PRIVATE");
    }
    if attrs.is_static {
        words.push("STATIC");
    }
    if attrs.constant {
        words.push("CONSTANT");
    }
    if symbol.kind == SymbolKind::Constructor {
        words.push("CONSTRUCTOR");
    }
    if symbol.visibility == Visibility::Local {
        words.push("__LOCAL__");
    }
    words
}

/// Doc text with the attribute prefix; empty when the symbol has no doc.
pub fn doc_text(symbol: &Symbol) -> String {
    if symbol.doc.is_empty() {
        return String::new();
    }
    let words = attribute_words(symbol);
    if words.is_empty() {
        symbol.doc.clone()
    } else {
        format!("{}: {}", words.join(" "), symbol.doc)
    }
}

/// Call tip of a callable symbol; `None` for properties.
pub fn call_tip(symbol: &Symbol) -> Option<String> {
    if !symbol.kind.is_callable() {
        return None;
    }
    let name = symbol.name();
    let mut lines = Vec::with_capacity(2 + symbol.overloads.len());
    match &symbol.signature {
        Some(sig) => lines.push(signature_line(name, sig)),
        None => lines.push(format!("{name}(...)")),
    }
    lines.extend(symbol.overloads.iter().map(|sig| signature_line(name, sig)));
    let doc = doc_text(symbol);
    lines.extend(doc.lines().map(str::to_string));
    Some(lines.join("\n"))
}

/// One completion line: the kind, padded, then the qualified name and a short type hint.
pub fn completion_line(symbol: &Symbol) -> String {
    let mut line = format!("{:<11} {}", symbol.kind.to_string(), symbol.qualified_name);
    if symbol.kind.is_callable() {
        line.push_str(if symbol.params().is_empty() { "()" } else { "(...)" });
    }
    if let Some(ty) = symbol.returns().or(symbol.value_type.as_ref()) {
        let _ = write!(line, ": {ty}");
    }
    line
}

/// A completion listing, one symbol per line.
pub fn completion_listing<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> String {
    let mut out = String::new();
    for symbol in symbols {
        out.push_str(&completion_line(symbol));
        out.push('\n');
    }
    out
}

/// Everything known about one symbol, for `stubdex lookup`.
pub fn details(symbol: &Symbol) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}.{}", symbol.kind, symbol.module, symbol.qualified_name);
    match call_tip(symbol) {
        Some(tip) => {
            let _ = writeln!(out, "{tip}");
        }
        None => {
            if let Some(ty) = &symbol.value_type {
                let _ = writeln!(out, "type: {ty}");
            }
            let doc = doc_text(symbol);
            if !doc.is_empty() {
                let _ = writeln!(out, "{doc}");
            }
        }
    }
    for param in symbol.params().iter().filter(|p| p.ty.is_some() || !p.doc.is_empty()) {
        let ty = param.ty.as_ref().map(|t| format!(" {{{t}}}")).unwrap_or_default();
        let _ = writeln!(out, "  @param {}{ty} {}", param.name, param.doc);
    }
    if !symbol.bases.is_empty() {
        let _ = writeln!(out, "composes: {}", symbol.bases.join(", "));
    }
    if let Some(origin) = &symbol.origin {
        let _ = writeln!(out, "(from {} in {})", origin.qualified_name, origin.module);
    }
    out
}

/// Completion entry as emitted by `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionItem<'a> {
    pub name: &'a str,
    pub qualified_name: &'a str,
    pub kind: SymbolKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_tip: Option<String>,
}

impl<'a> From<&'a Symbol> for CompletionItem<'a> {
    fn from(symbol: &'a Symbol) -> Self {
        CompletionItem {
            name: symbol.name(),
            qualified_name: &symbol.qualified_name,
            kind: symbol.kind,
            call_tip: call_tip(symbol),
        }
    }
}

/// Pretty JSON array of completion items.
///
/// ## Errors
/// Serialization errors from `serde_json`.
pub fn completions_json<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> serde_json::Result<String> {
    let items: Vec<CompletionItem<'a>> = symbols.into_iter().map(CompletionItem::from).collect();
    serde_json::to_string_pretty(&items)
}
