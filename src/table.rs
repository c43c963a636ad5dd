//! Resolved symbol tables and the queries they answer.
//!
//! A [`Table`] is immutable once built: one per (module, version), shared behind an `Arc`. Local-only symbols
//! are kept (composition and [`Table::lookup_internal`] see them) but every externally visible query skips them.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::Bound;

use serde::Serialize;
use stubdex_core::version::VersionTag;

use crate::builder::{Scope, UnresolvedRelation, owned_by};
use crate::model::{Symbol, SymbolKind};

/// Result of a point lookup. A miss is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a Symbol),
    NotFound,
}

impl<'a> Lookup<'a> {
    pub fn found(self) -> Option<&'a Symbol> {
        match self {
            Lookup::Found(symbol) => Some(symbol),
            Lookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// The resolved symbols of one module at one version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    module: String,
    #[serde(serialize_with = "serialize_display")]
    version: VersionTag,
    doc: String,
    #[serde(skip)]
    namespace: Option<String>,
    #[serde(skip)]
    aliases: BTreeMap<String, String>,
    #[serde(serialize_with = "serialize_visible")]
    symbols: BTreeMap<String, Symbol>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved: Vec<UnresolvedRelation>,
}

impl Table {
    pub(crate) fn new(
        module: String,
        version: VersionTag,
        doc: String,
        namespace: Option<String>,
        aliases: BTreeMap<String, String>,
        symbols: BTreeMap<String, Symbol>,
        unresolved: Vec<UnresolvedRelation>,
    ) -> Self {
        Self {
            module,
            version,
            doc,
            namespace,
            aliases,
            symbols,
            unresolved,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn version(&self) -> &VersionTag {
        &self.version
    }

    /// Module documentation (the doc comment of the namespace object).
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Relations whose base could not be found when the table was built.
    pub fn unresolved(&self) -> &[UnresolvedRelation] {
        &self.unresolved
    }

    /// Point lookup by module-relative qualified name. Local-only symbols are `NotFound`.
    pub fn lookup(&self, name: &str) -> Lookup<'_> {
        match self.symbols.get(name) {
            Some(symbol) if symbol.is_visible() => Lookup::Found(symbol),
            _ => Lookup::NotFound,
        }
    }

    /// Point lookup that also sees local-only symbols.
    pub fn lookup_internal(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Visible symbols whose qualified name starts with `prefix`, in name order.
    ///
    /// The returned iterator is lazy and can be cloned to restart from its current position.
    pub fn prefix_search<'a>(&'a self, prefix: &'a str) -> PrefixMatches<'a> {
        PrefixMatches {
            inner: self.symbols.range::<str, _>((Bound::Included(prefix), Bound::Unbounded)),
            prefix,
            done: false,
        }
    }

    /// Every visible symbol, in name order.
    pub fn visible(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values().filter(|s| s.is_visible())
    }

    /// Number of visible symbols.
    pub fn len(&self) -> usize {
        self.visible().count()
    }

    pub fn is_empty(&self) -> bool {
        self.visible().next().is_none()
    }

    /// Direct visible members of `owner` (functions, constructors and properties, not events).
    ///
    /// An empty owner lists the module-level symbols.
    pub fn members<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a Symbol> + 'a {
        owned_by(&self.symbols, owner).filter(|s| s.is_visible() && s.kind != SymbolKind::Event)
    }

    /// Visible events of `owner`, own and composed.
    pub fn events<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a Symbol> + 'a {
        owned_by(&self.symbols, owner).filter(|s| s.is_visible() && s.kind == SymbolKind::Event)
    }

    /// Name-resolution context for type references written in this module.
    pub fn scope(&self) -> Scope<'_> {
        Scope {
            module: &self.module,
            namespace: self.namespace.as_deref(),
            aliases: &self.aliases,
            symbols: &self.symbols,
        }
    }
}

/// Lazy, restartable prefix search over a [`Table`].
#[derive(Debug, Clone)]
pub struct PrefixMatches<'a> {
    inner: btree_map::Range<'a, String, Symbol>,
    prefix: &'a str,
    done: bool,
}

impl<'a> Iterator for PrefixMatches<'a> {
    type Item = &'a Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let Some((name, symbol)) = self.inner.next() else {
                self.done = true;
                break;
            };
            if !name.starts_with(self.prefix) {
                // Names are sorted: nothing after this can match.
                self.done = true;
            } else if symbol.is_visible() {
                return Some(symbol);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for PrefixMatches<'_> {}

pub(crate) fn serialize_display<T: std::fmt::Display, S: serde::Serializer>(value: &T, ser: S) -> Result<S::Ok, S::Error> {
    ser.collect_str(value)
}

fn serialize_visible<S: serde::Serializer>(symbols: &BTreeMap<String, Symbol>, ser: S) -> Result<S::Ok, S::Error> {
    ser.collect_seq(symbols.values().filter(|s| s.is_visible()))
}
