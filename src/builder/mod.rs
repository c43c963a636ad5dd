//! Symbol table builder.
//!
//! Building a table for one (module, version) happens in two steps:
//!
//! 1. [`assemble`] applies the raw declarations in source order. A later declaration of a qualified name
//!    replaces the earlier one; the earlier signature is kept as an overload.
//! 2. [`compose::build_table`] flattens capability relations into the composing types, pulling collaborator
//!    modules in through a [`compose::CollaboratorSource`].

pub mod compose;

use std::collections::BTreeMap;

use serde::Serialize;
use stubdex_core::version::VersionTag;

use crate::model::{MemberRole, RawModule, Symbol, SymbolKind, Visibility};

pub use compose::{CollaboratorSource, UnresolvedReason, UnresolvedRelation, build_table};

/// A module's declarations after last-wins merging, before composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    pub module: String,
    pub version: VersionTag,
    pub doc: String,
    pub namespace: Option<String>,
    pub aliases: BTreeMap<String, String>,
    pub symbols: BTreeMap<String, Symbol>,
    /// Owner (empty for the namespace object) to bases, in declaration order.
    pub relations: BTreeMap<String, Vec<String>>,
}

impl Assembled {
    pub fn scope(&self) -> Scope<'_> {
        Scope {
            module: &self.module,
            namespace: self.namespace.as_deref(),
            aliases: &self.aliases,
            symbols: &self.symbols,
        }
    }

    /// Instance members and events declared directly on `owner`.
    pub fn own_instance_members<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a Symbol> + 'a {
        owned_by(&self.symbols, owner).filter(|s| s.role == MemberRole::Instance)
    }

    /// `true` if `name` is declared here, or anything is declared under it.
    pub fn declares(&self, name: &str) -> bool {
        self.symbols.contains_key(name) || owned_by(&self.symbols, name).next().is_some()
    }
}

/// Symbols whose owner is `owner`, found by a range scan over `owner.`.
pub(crate) fn owned_by<'a>(symbols: &'a BTreeMap<String, Symbol>, owner: &'a str) -> impl Iterator<Item = &'a Symbol> + 'a {
    let prefix = if owner.is_empty() { String::new() } else { format!("{owner}.") };
    symbols
        .range(prefix.clone()..)
        .take_while(move |(name, _)| name.starts_with(&prefix))
        .map(|(_, s)| s)
        .filter(move |s| s.owner.as_deref().unwrap_or("") == owner)
}

/// Apply raw declarations in order and group relations by owner.
#[tracing::instrument(skip_all, fields(module = module, version = %version))]
pub fn assemble(module: &str, version: &VersionTag, raw: RawModule) -> Assembled {
    let mut symbols: BTreeMap<String, Symbol> = BTreeMap::new();

    for decl in raw.declarations {
        let owner = decl.owner().filter(|o| !o.is_empty()).map(str::to_string);
        let mut symbol = Symbol {
            qualified_name: decl.qualified_name,
            module: module.to_string(),
            kind: decl.kind,
            role: decl.role,
            owner,
            doc: decl.doc,
            signature: decl.signature,
            overloads: Vec::new(),
            value_type: decl.value_type,
            visibility: if decl.local { Visibility::Local } else { Visibility::Public },
            attributes: decl.attributes,
            bases: Vec::new(),
            origin: None,
        };
        if let Some(previous) = symbols.remove(&symbol.qualified_name) {
            tracing::debug!(name = %symbol.qualified_name, "redeclared; last declaration wins");
            symbol.overloads = previous.overloads;
            if let Some(sig) = previous.signature {
                if symbol.signature.as_ref() != Some(&sig) && !symbol.overloads.contains(&sig) {
                    symbol.overloads.push(sig);
                }
            }
        }
        symbols.insert(symbol.qualified_name.clone(), symbol);
    }

    let mut relations: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for rel in raw.relations {
        let bases = relations.entry(rel.owner).or_default();
        // A repeated relation moves to its latest position.
        bases.retain(|b| *b != rel.base);
        bases.push(rel.base);
    }
    for (owner, bases) in &relations {
        if let Some(symbol) = symbols.get_mut(owner) {
            symbol.bases = bases.clone();
            if symbol.kind == SymbolKind::Property {
                symbol.kind = SymbolKind::Constructor;
            }
        }
    }

    Assembled {
        module: module.to_string(),
        version: version.clone(),
        doc: raw.doc,
        namespace: raw.namespace,
        aliases: raw.aliases,
        symbols,
        relations,
    }
}

/// Name-resolution context of one module: where a written type or base name points.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub module: &'a str,
    pub namespace: Option<&'a str>,
    pub aliases: &'a BTreeMap<String, String>,
    pub symbols: &'a BTreeMap<String, Symbol>,
}

/// A written reference split into (module, module-relative name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Target {
    pub module: String,
    pub name: String,
}

impl Scope<'_> {
    /// Split a written name (`events.EventEmitter`, `Stats`, `net.Server`) into its module and local name.
    ///
    /// Single names are local. A first segment naming this module's namespace object or this module stays
    /// local; one naming a local symbol stays local; a `require` alias maps to its module; anything else is
    /// taken as a module name.
    pub fn locate(&self, written: &str) -> Target {
        let local = |name: &str| Target {
            module: self.module.to_string(),
            name: name.to_string(),
        };
        let Some((first, rest)) = written.split_once('.') else {
            return local(written);
        };
        if Some(first) == self.namespace || first == self.module {
            return local(rest);
        }
        if self.symbols.contains_key(first) {
            return local(written);
        }
        let module = self.aliases.get(first).map(String::as_str).unwrap_or(first);
        Target {
            module: module.to_string(),
            name: rest.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::{SourceFormat, load_source};
    use stubdex_syntax::jsdoc::DocOptions;

    pub(crate) fn assembled(module: &str, source: &str) -> Assembled {
        let raw = load_source(module, &format!("{module}.js"), source, SourceFormat::Stub, &DocOptions::default())
            .unwrap();
        assemble(module, &VersionTag::Base, raw)
    }

    #[test]
    fn test_last_declaration_wins_and_keeps_overloads() {
        let asm = assembled(
            "util",
            "var util = {};\n/** First. */\nutil.format = function(a) {}\n/** Second. */\nutil.format = function(a, b) {}\n",
        );
        let format = &asm.symbols["format"];
        assert_eq!(format.doc, "Second.");
        assert_eq!(format.params().len(), 2);
        assert_eq!(format.overloads.len(), 1);
        assert_eq!(format.overloads[0].params.len(), 1);
    }

    #[test]
    fn test_identical_redeclaration_adds_no_overload() {
        let asm = assembled("util", "var util = {};\nutil.f = function(a) {}\nutil.f = function(a) {}\n");
        assert!(asm.symbols["f"].overloads.is_empty());
    }

    #[test]
    fn test_relations_grouped_in_order_and_deduplicated() {
        let asm = assembled(
            "net",
            "var net = {};\nnet.Socket = function() {}\nnet.Socket.prototype = new a.A();\nnet.Socket.prototype = new b.B();\nnet.Socket.prototype = new a.A();\n",
        );
        assert_eq!(asm.relations["Socket"], vec!["b.B".to_string(), "a.A".to_string()]);
        assert_eq!(asm.symbols["Socket"].bases, asm.relations["Socket"]);
    }

    #[test]
    fn test_own_instance_members() {
        let asm = assembled(
            "net",
            "var net = {};\nnet.Socket = function() {}\nnet.Socket.prototype.write = function() {}\nnet.Socket.create = function() {}\nnet.SocketX = function() {}\nnet.SocketX.prototype.y = 0;\n",
        );
        let names: Vec<_> = asm.own_instance_members("Socket").map(|s| s.qualified_name.as_str()).collect();
        assert_eq!(names, ["Socket.write"]);
        assert!(asm.declares("Socket"));
        assert!(!asm.declares("Server"));
    }

    #[test]
    fn test_scope_locate() {
        let asm = assembled(
            "net",
            "var net = {};\nnet.Socket = function() {}\nvar ev = require('events');\n",
        );
        let scope = asm.scope();
        let t = |m: &str, n: &str| Target {
            module: m.to_string(),
            name: n.to_string(),
        };
        assert_eq!(scope.locate("Socket"), t("net", "Socket"));
        assert_eq!(scope.locate("net.Server"), t("net", "Server"));
        assert_eq!(scope.locate("ev.EventEmitter"), t("events", "EventEmitter"));
        assert_eq!(scope.locate("stream.Stream"), t("stream", "Stream"));
        assert_eq!(scope.locate("Socket.Inner"), t("net", "Socket.Inner"));
    }
}
