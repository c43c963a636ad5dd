//! JSON declaration sources.
//!
//! A `<module>.json` file is the serialized form of [`RawModule`]:
//!
//! ```json
//! {
//!   "doc": "Networking.",
//!   "declarations": [
//!     { "qualified_name": "Socket", "kind": "constructor" },
//!     { "qualified_name": "Socket.write", "kind": "function", "role": "instance",
//!       "signature": { "params": [{ "name": "data" }] } }
//!   ],
//!   "relations": [{ "owner": "Socket", "base": "events.EventEmitter" }]
//! }
//! ```
//!
//! `role` may be omitted: `Socket.__events__.close` is then an instance event, `Socket.create` a static member
//! and `isIP` module-level. Prototype members need an explicit `"role": "instance"`.

use stubdex_syntax::jsdoc;

use crate::model::RawModule;

/// Parse a JSON declaration source.
///
/// ## Errors
/// Returns a one-line `file:line:column: message` description when the document is not valid JSON, a required
/// field (`qualified_name`, `kind`) is missing, or a qualified name is empty.
pub fn parse_json(file_name: &str, source: &str, strip_html: bool) -> Result<RawModule, String> {
    let mut raw: RawModule = serde_json::from_str(source)
        .map_err(|e| format!("{}:{}:{}: {}", file_name, e.line(), e.column(), e))?;

    if let Some(i) = raw.declarations.iter().position(|d| d.qualified_name.trim().is_empty()) {
        return Err(format!("{file_name}: declaration #{i} has an empty qualified_name"));
    }

    if strip_html {
        raw.doc = jsdoc::strip_html(&raw.doc);
        for decl in &mut raw.declarations {
            decl.doc = jsdoc::strip_html(&decl.doc);
        }
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberRole, SymbolKind};

    #[test]
    fn test_parse_json_module() {
        let source = r#"{
            "doc": "Events.",
            "declarations": [
                { "qualified_name": "EventEmitter", "kind": "constructor" },
                { "qualified_name": "EventEmitter.on", "kind": "function", "role": "instance",
                  "signature": { "params": [{ "name": "event" }, { "name": "listener", "type": "Function" }] } },
                { "qualified_name": "EventEmitter.__events__.newListener", "kind": "event", "role": "instance",
                  "local": true }
            ],
            "relations": []
        }"#;
        let raw = parse_json("events.json", source, false).unwrap();
        assert_eq!(raw.doc, "Events.");
        assert_eq!(raw.declarations.len(), 3);
        assert_eq!(raw.declarations[1].role, MemberRole::Instance);
        assert_eq!(raw.declarations[2].kind, SymbolKind::Event);
        assert!(raw.declarations[2].local);
        let params = &raw.declarations[1].signature.as_ref().unwrap().params;
        assert_eq!(params[1].ty.as_ref().map(|t| t.as_str()), Some("Function"));
    }

    #[test]
    fn test_omitted_role_follows_the_name() {
        use crate::config::CorpusConfig;
        use crate::corpus::{Corpus, MemoryStore};

        let source = r#"{
            "declarations": [
                { "qualified_name": "Socket", "kind": "constructor" },
                { "qualified_name": "Socket.connect", "kind": "function" },
                { "qualified_name": "Socket.__events__.close", "kind": "event" }
            ]
        }"#;
        let raw = parse_json("net.json", source, false).unwrap();
        assert_eq!(raw.declarations[0].role, MemberRole::Module);
        assert_eq!(raw.declarations[1].role, MemberRole::Static);
        assert_eq!(raw.declarations[2].role, MemberRole::Instance);

        let corpus = Corpus::with_store(MemoryStore::new().with_file("net.json", source), CorpusConfig::default()).unwrap();
        let table = corpus.resolve("net", None).unwrap();
        let members: Vec<&str> = table.members("").map(|s| s.qualified_name.as_str()).collect();
        assert_eq!(members, ["Socket"]);
        let members: Vec<&str> = table.members("Socket").map(|s| s.qualified_name.as_str()).collect();
        assert_eq!(members, ["Socket.connect"]);
        let events: Vec<&str> = table.events("Socket").map(|s| s.qualified_name.as_str()).collect();
        assert_eq!(events, ["Socket.__events__.close"]);
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        let err = parse_json("bad.json", r#"{ "declarations": [ { "kind": "function" } ] }"#, false).unwrap_err();
        assert!(err.starts_with("bad.json:1:"), "{err}");
        assert!(err.contains("qualified_name"), "{err}");
    }

    #[test]
    fn test_empty_qualified_name_is_an_error() {
        let err = parse_json("bad.json", r#"{ "declarations": [ { "qualified_name": " ", "kind": "function" } ] }"#, false)
            .unwrap_err();
        assert!(err.contains("empty qualified_name"), "{err}");
    }

    #[test]
    fn test_strip_html_in_json_docs() {
        let raw = parse_json("a.json", r#"{ "doc": "<b>bold</b> &amp; plain" }"#, true).unwrap();
        assert_eq!(raw.doc, "bold & plain");
    }
}
