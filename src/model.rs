//! Symbols and the declarations they are built from.
//!
//! Qualified names are module-relative: in module `net`, the constructor `net.Socket` is `Socket`, its instance
//! method is `Socket.write` and its `close` event is `Socket.__events__.close`. Module-level functions and
//! properties have single-segment names (`isIP`).
//!
//! [`RawDecl`] and [`RawModule`] are what the frontend produces (and what a JSON source deserializes into);
//! [`Symbol`] is the resolved entry of a [`crate::table::Table`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use stubdex_core::lang::builtin_types::{self, BuiltinTypeId};
use stubdex_core::lang::markers::{self, MarkerId};

// ============================================================================
// Classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Constructor,
    Property,
    Event,
}

impl SymbolKind {
    /// `true` for kinds that are called (and so get a signature).
    pub fn is_callable(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Constructor | SymbolKind::Event)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Function => "function",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Property => "property",
            SymbolKind::Event => "event",
        })
    }
}

/// Where a symbol lives relative to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Top-level symbol of the module.
    #[default]
    Module,
    /// Prototype member (or event) of a constructor.
    Instance,
    /// Member hanging directly off another symbol (`Socket.create`, `process.stdout`).
    Static,
}

impl MemberRole {
    /// Role implied by a qualified name alone.
    ///
    /// `Socket.__events__.close` is an instance event, other dotted names hang off their owner, and a single
    /// segment is module-level. Prototype members cannot be told apart from statics by name, so sources that
    /// declare them must say `instance`.
    pub fn infer(qualified_name: &str) -> Self {
        let segments: Vec<&str> = qualified_name.split('.').collect();
        let n = segments.len();
        if n >= 3 && markers::is(segments[n - 2], MarkerId::Events) {
            MemberRole::Instance
        } else if n >= 2 {
            MemberRole::Static
        } else {
            MemberRole::Module
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    /// Marked `@__local__`: resolvable internally, hidden from lookups and listings.
    Local,
}

// ============================================================================
// Types
// ============================================================================

/// A symbolic reference to a type, resolved lazily at query time.
///
/// Holds the normalized spelling from the doc comment (`net.Server`, `Stats`, `Boolean`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The builtin this reference names, if any (`Boolean`, `string`, ...).
    pub fn builtin(&self) -> Option<BuiltinTypeId> {
        builtin_types::from_str(&self.0)
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One documented parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub doc: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl Param {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A parameter list and return type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeRef>,
}

/// Flags carried over from doc tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    /// `@deprecated`, with its (possibly empty) note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub private: bool,
    #[serde(rename = "static", skip_serializing_if = "std::ops::Not::not")]
    pub is_static: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub constant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        *self == Attributes::default()
    }
}

/// Where a composed member was copied from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Origin {
    pub module: String,
    pub qualified_name: String,
}

// ============================================================================
// Symbols
// ============================================================================

/// A resolved table entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub qualified_name: String,
    /// Module the entry belongs to (the composing module for flattened members).
    pub module: String,
    pub kind: SymbolKind,
    pub role: MemberRole,
    /// Qualified name of the owner, `None` for module-level symbols.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub doc: String,
    /// Parameters and return type; `None` for properties and for callables declared without a function value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    /// Earlier signatures of a redeclared callable, oldest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overloads: Vec<Signature>,
    /// `@type` of a property.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<TypeRef>,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    /// Declared capability relations of a constructor, as written.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl Symbol {
    /// Last segment of the qualified name.
    pub fn name(&self) -> &str {
        short_name(&self.qualified_name)
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn params(&self) -> &[Param] {
        self.signature.as_ref().map(|s| s.params.as_slice()).unwrap_or_default()
    }

    pub fn returns(&self) -> Option<&TypeRef> {
        self.signature.as_ref().and_then(|s| s.returns.as_ref())
    }
}

/// Last dot-separated segment of a qualified name.
pub fn short_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

// ============================================================================
// Raw declarations
// ============================================================================

/// One declaration as read from a source, before merging and composition.
///
/// When a JSON source omits `role`, it is inferred from the qualified name (see [`MemberRole::infer`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDeclRepr")]
pub struct RawDecl {
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub role: MemberRole,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub signature: Option<Signature>,
    #[serde(default, rename = "type")]
    pub value_type: Option<TypeRef>,
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub attributes: Attributes,
}

impl RawDecl {
    pub fn new(qualified_name: impl Into<String>, kind: SymbolKind, role: MemberRole) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
            role,
            doc: String::new(),
            signature: None,
            value_type: None,
            local: false,
            attributes: Attributes::default(),
        }
    }

    /// Qualified name of the owner implied by the name and role.
    ///
    /// `Socket.__events__.close` is owned by `Socket`; `Socket.write` by `Socket`; `isIP` by nobody.
    pub fn owner(&self) -> Option<&str> {
        if self.role == MemberRole::Module {
            return None;
        }
        let (owner, _) = self.qualified_name.rsplit_once('.')?;
        if self.kind == SymbolKind::Event {
            let events = markers::as_str(MarkerId::Events);
            let base = owner.strip_suffix(events)?;
            return Some(base.strip_suffix('.').unwrap_or(base));
        }
        Some(owner)
    }
}

#[derive(Deserialize)]
struct RawDeclRepr {
    qualified_name: String,
    kind: SymbolKind,
    #[serde(default)]
    role: Option<MemberRole>,
    #[serde(default)]
    doc: String,
    #[serde(default)]
    signature: Option<Signature>,
    #[serde(default, rename = "type")]
    value_type: Option<TypeRef>,
    #[serde(default)]
    local: bool,
    #[serde(default)]
    attributes: Attributes,
}

impl From<RawDeclRepr> for RawDecl {
    fn from(repr: RawDeclRepr) -> Self {
        let role = repr.role.unwrap_or_else(|| MemberRole::infer(&repr.qualified_name));
        Self {
            qualified_name: repr.qualified_name,
            kind: repr.kind,
            role,
            doc: repr.doc,
            signature: repr.signature,
            value_type: repr.value_type,
            local: repr.local,
            attributes: repr.attributes,
        }
    }
}

/// A declared capability relation: instances of `owner` also expose the instance members of `base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRelation {
    /// Module-relative owner; empty for the namespace object itself.
    pub owner: String,
    /// Base as written (`events.EventEmitter`, `Stream`).
    pub base: String,
}

/// Everything one source declares, in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawModule {
    #[serde(default)]
    pub doc: String,
    /// Name of the namespace object variable (`net` in `var net = {}`), if the module has one.
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub declarations: Vec<RawDecl>,
    #[serde(default)]
    pub relations: Vec<RawRelation>,
    /// `var a = require('m')` bindings: alias to module name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_of_members_and_events() {
        let method = RawDecl::new("Socket.write", SymbolKind::Function, MemberRole::Instance);
        assert_eq!(method.owner(), Some("Socket"));
        let event = RawDecl::new("Socket.__events__.close", SymbolKind::Event, MemberRole::Instance);
        assert_eq!(event.owner(), Some("Socket"));
        let nested = RawDecl::new("http.Agent.create", SymbolKind::Function, MemberRole::Static);
        assert_eq!(nested.owner(), Some("http.Agent"));
        let top = RawDecl::new("isIP", SymbolKind::Function, MemberRole::Module);
        assert_eq!(top.owner(), None);
    }

    #[test]
    fn test_type_ref_builtin() {
        assert!(TypeRef::new("Boolean").builtin().is_some());
        assert!(TypeRef::new("net.Server").builtin().is_none());
        assert_eq!(TypeRef::new("net.Server").segments().collect::<Vec<_>>(), ["net", "Server"]);
    }

    #[test]
    fn test_raw_decl_json_defaults() {
        let decl: RawDecl = serde_json::from_str(r#"{"qualified_name": "isIP", "kind": "function"}"#).unwrap();
        assert_eq!(decl.role, MemberRole::Module);
        assert!(!decl.local);
        assert!(decl.signature.is_none());
    }

    #[test]
    fn test_raw_decl_role_inferred_from_name() {
        let parse = |json: &str| serde_json::from_str::<RawDecl>(json).unwrap();
        let event = parse(r#"{"qualified_name": "Socket.__events__.close", "kind": "event"}"#);
        assert_eq!(event.role, MemberRole::Instance);
        assert_eq!(event.owner(), Some("Socket"));
        let create = parse(r#"{"qualified_name": "Socket.create", "kind": "function"}"#);
        assert_eq!(create.role, MemberRole::Static);
        assert_eq!(create.owner(), Some("Socket"));
        let explicit = parse(r#"{"qualified_name": "Socket.write", "kind": "function", "role": "instance"}"#);
        assert_eq!(explicit.role, MemberRole::Instance);
    }
}
