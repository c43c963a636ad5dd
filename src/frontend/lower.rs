//! Stub AST to raw declaration lowering.
//!
//! The lowering runs in three passes over the program:
//!
//! 1. Collect `require` aliases, the `exports = name` statement and top-level variable names, then pick the
//!    namespace object of the module.
//! 2. Find every owner that has prototype members or capability relations (those are constructors even without
//!    a `@constructor` tag).
//! 3. Emit one [`RawDecl`] per declaring statement, in source order, plus the capability relations.
//!
//! Statements the dialect does not describe (assignments to literals, `new` on a member, ...) are skipped with a
//! debug log; lowering itself never fails.

use std::collections::{BTreeMap, HashSet};

use stubdex_core::lang::doc_tags::DocTagId;
use stubdex_core::lang::markers::{self, MarkerId};
use stubdex_syntax::ast::{self, Expr, Path, Program, Spanned, StatementKind};
use stubdex_syntax::jsdoc::{DocBlock, DocOptions};

use crate::model::{Attributes, MemberRole, Param, RawDecl, RawModule, RawRelation, Signature, SymbolKind, TypeRef};

/// Lowering context for one stub file.
pub struct StubLowering<'a> {
    /// Module name (file stem), used to find the namespace object when there is no `exports = name`.
    module: &'a str,
    options: DocOptions,
    namespace: Option<String>,
    aliases: BTreeMap<String, String>,
    /// Module-relative owners known to be constructors.
    constructors: HashSet<String>,
}

impl<'a> StubLowering<'a> {
    pub fn new(module: &'a str, options: DocOptions) -> Self {
        Self {
            module,
            options,
            namespace: None,
            aliases: BTreeMap::new(),
            constructors: HashSet::new(),
        }
    }

    /// Lower a parsed program into its raw declarations.
    #[tracing::instrument(skip_all, fields(module = self.module))]
    pub fn lower_program(mut self, program: &Program) -> RawModule {
        self.collect_bindings(program);
        self.collect_constructors(program);

        let mut out = RawModule {
            namespace: self.namespace.clone(),
            ..RawModule::default()
        };

        for stmt in &program.statements {
            let doc = stmt.node.doc.as_ref().map(|d| DocBlock::parse_with(&d.node, &self.options));
            match &stmt.node.kind {
                StatementKind::Var(var) => self.lower_var(var, doc, &mut out),
                StatementKind::Function(func) => {
                    let params = func.params.iter().map(|p| p.node.clone()).collect::<Vec<_>>();
                    let decl = self.callable(func.name.node.clone(), MemberRole::Module, &params, doc.as_ref());
                    self.push_doc_bases(&decl.qualified_name, doc.as_ref(), &mut out);
                    out.declarations.push(decl);
                }
                StatementKind::Assign(assign) => self.lower_assign(assign, doc, &mut out),
                StatementKind::Empty => {}
            }
        }

        out.aliases = self.aliases;
        out
    }

    // ========================================================================
    // Pass 1: bindings
    // ========================================================================

    fn collect_bindings(&mut self, program: &Program) {
        let mut exported: Option<String> = None;
        let mut vars: HashSet<&str> = HashSet::new();

        for stmt in &program.statements {
            match &stmt.node.kind {
                StatementKind::Var(var) => {
                    if let Some(module) = var.value.as_ref().and_then(|v| required_module(&v.node)) {
                        self.aliases.insert(var.name.node.clone(), module);
                    } else {
                        vars.insert(var.name.node.as_str());
                    }
                }
                StatementKind::Assign(assign) if assign.target.node.len() == 1 => {
                    let name = assign.target.node.root();
                    if let Some(module) = required_module(&assign.value.node) {
                        self.aliases.insert(name.to_string(), module);
                    } else if markers::is(name, MarkerId::Exports) {
                        if let Expr::Path(path) = &assign.value.node {
                            exported = Some(path.to_string());
                        }
                    }
                }
                _ => {}
            }
        }

        self.namespace = match exported {
            Some(name) if vars.contains(name.as_str()) => Some(name),
            _ if vars.contains(self.module) => Some(self.module.to_string()),
            _ => None,
        };
        tracing::debug!(namespace = ?self.namespace, aliases = self.aliases.len(), "collected bindings");
    }

    // ========================================================================
    // Pass 2: constructor inference
    // ========================================================================

    fn collect_constructors(&mut self, program: &Program) {
        for stmt in &program.statements {
            let StatementKind::Assign(assign) = &stmt.node.kind else {
                continue;
            };
            let segments = self.relative(&assign.target.node);
            let prototype = segments.iter().position(|s| markers::is(s, MarkerId::Prototype));
            let owner = match prototype {
                Some(i) => Some(&segments[..i]),
                None if segments.last().is_some_and(|s| markers::is(s, MarkerId::Proto)) => {
                    Some(&segments[..segments.len() - 1])
                }
                None => None,
            };
            if let Some(owner) = owner.filter(|o| !o.is_empty()) {
                self.constructors.insert(owner.join("."));
            }
        }
    }

    // ========================================================================
    // Pass 3: declarations
    // ========================================================================

    fn lower_var(&self, var: &ast::VarDecl, doc: Option<DocBlock>, out: &mut RawModule) {
        let name = &var.name.node;
        if self.aliases.contains_key(name) {
            return;
        }
        if self.namespace.as_deref() == Some(name.as_str()) {
            if let Some(doc) = doc {
                out.doc = doc.summary;
            }
            return;
        }
        let decl = self.from_value(name.clone(), MemberRole::Module, var.value.as_ref(), doc.as_ref());
        self.push_doc_bases(&decl.qualified_name, doc.as_ref(), out);
        out.declarations.push(decl);
    }

    fn lower_assign(&self, assign: &ast::AssignStmt, doc: Option<DocBlock>, out: &mut RawModule) {
        let target = &assign.target.node;
        if target.len() == 1 {
            let name = target.root();
            let skip = markers::is(name, MarkerId::Exports)
                || self.aliases.contains_key(name)
                || self.namespace.as_deref() == Some(name);
            if skip {
                return;
            }
        }

        let segments = self.relative(target);
        let Some(last) = segments.last() else {
            return;
        };
        let value = &assign.value;

        // X.__proto__ = B
        if markers::is(last, MarkerId::Proto) {
            let owner = segments[..segments.len() - 1].join(".");
            match base_path(&value.node) {
                Some(base) => out.relations.push(RawRelation { owner, base }),
                None => tracing::debug!(path = %target, value = value.node.describe(), "ignoring __proto__ value"),
            }
            return;
        }

        // X.prototype = new B() | B | { ... }
        if markers::is(last, MarkerId::Prototype) {
            let owner = segments[..segments.len() - 1].join(".");
            self.lower_prototype(&owner, value, out);
            return;
        }

        let (qualified_name, role, kind_override) = self.classify_member(&segments);
        let mut decl = self.from_value(qualified_name, role, Some(value), doc.as_ref());
        if let Some(kind) = kind_override {
            decl.kind = kind;
            if kind == SymbolKind::Event && decl.signature.is_none() {
                decl.signature = Some(Signature::default());
            }
        }
        self.push_doc_bases(&decl.qualified_name, doc.as_ref(), out);
        out.declarations.push(decl);
    }

    fn lower_prototype(&self, owner: &str, value: &Spanned<Expr>, out: &mut RawModule) {
        match &value.node {
            Expr::Object(props) => {
                for prop in props {
                    let doc = prop.doc.as_ref().map(|d| DocBlock::parse_with(&d.node, &self.options));
                    let name = format!("{owner}.{}", prop.key.node);
                    let decl = self.from_value(name, MemberRole::Instance, Some(&prop.value), doc.as_ref());
                    out.declarations.push(decl);
                }
            }
            other => match base_path(other) {
                Some(base) => out.relations.push(RawRelation {
                    owner: owner.to_string(),
                    base,
                }),
                None => tracing::debug!(owner, value = other.describe(), "ignoring prototype value"),
            },
        }
    }

    /// Qualified name, role and forced kind of an assignment target (already module-relative).
    fn classify_member(&self, segments: &[String]) -> (String, MemberRole, Option<SymbolKind>) {
        let qualified = segments.join(".");
        if let Some(i) = segments.iter().position(|s| markers::is(s, MarkerId::Prototype)) {
            let owner = segments[..i].join(".");
            let member = segments[i + 1..].join(".");
            let name = if owner.is_empty() { member } else { format!("{owner}.{member}") };
            return (name, MemberRole::Instance, None);
        }
        let n = segments.len();
        if n >= 2 && markers::is(&segments[n - 2], MarkerId::Events) {
            return (qualified, MemberRole::Instance, Some(SymbolKind::Event));
        }
        let role = if n == 1 { MemberRole::Module } else { MemberRole::Static };
        (qualified, role, None)
    }

    /// Build a declaration from the assigned value and its doc comment.
    fn from_value(&self, name: String, role: MemberRole, value: Option<&Spanned<Expr>>, doc: Option<&DocBlock>) -> RawDecl {
        match value.map(|v| &v.node) {
            Some(Expr::Function(func)) => {
                let params = func.params.iter().map(|p| p.node.clone()).collect::<Vec<_>>();
                self.callable(name, role, &params, doc)
            }
            _ => {
                let is_ctor = doc.is_some_and(|d| d.has(DocTagId::Constructor) || d.has(DocTagId::Class))
                    || self.constructors.contains(&name);
                let kind = if is_ctor { SymbolKind::Constructor } else { SymbolKind::Property };
                let mut decl = RawDecl::new(name, kind, role);
                if let Some(doc) = doc {
                    apply_doc(&mut decl, doc);
                    decl.value_type = doc.value_type().map(TypeRef::new);
                }
                decl
            }
        }
    }

    fn callable(&self, name: String, role: MemberRole, params: &[String], doc: Option<&DocBlock>) -> RawDecl {
        let tagged = doc.is_some_and(|d| d.has(DocTagId::Constructor) || d.has(DocTagId::Class));
        let kind = if tagged || self.constructors.contains(&name) {
            SymbolKind::Constructor
        } else {
            SymbolKind::Function
        };
        let mut decl = RawDecl::new(name, kind, role);
        decl.signature = Some(signature(params, doc));
        if let Some(doc) = doc {
            apply_doc(&mut decl, doc);
        }
        decl
    }

    /// `@base` / `@extends` / `@augments` on a declaration add relations for it.
    fn push_doc_bases(&self, owner: &str, doc: Option<&DocBlock>, out: &mut RawModule) {
        let Some(doc) = doc else { return };
        for base in doc.bases() {
            out.relations.push(RawRelation {
                owner: owner.to_string(),
                base: base.to_string(),
            });
        }
    }

    /// Strip the namespace object from the front of a path.
    fn relative(&self, path: &Path) -> Vec<String> {
        match self.namespace.as_deref() {
            Some(ns) if path.root() == ns => path.segments[1..].to_vec(),
            _ => path.segments.clone(),
        }
    }
}

/// Module named by `require('name')`.
fn required_module(expr: &Expr) -> Option<String> {
    let Expr::Call(call) = expr else {
        return None;
    };
    if call.callee.node.len() != 1 || !markers::is(call.callee.node.root(), MarkerId::Require) {
        return None;
    }
    match call.args.first().map(|a| &a.node) {
        Some(Expr::String(module)) => Some(module.clone()),
        _ => None,
    }
}

/// Base named by a relation value: `new B()`, `new B`, `B`, or `B.prototype`.
fn base_path(expr: &Expr) -> Option<String> {
    let path = match expr {
        Expr::New(new) => &new.callee.node,
        Expr::Path(path) => path,
        _ => return None,
    };
    let mut segments: &[String] = &path.segments;
    if segments.last().is_some_and(|s| markers::is(s, MarkerId::Prototype)) {
        segments = &segments[..segments.len() - 1];
    }
    (!segments.is_empty()).then(|| segments.join("."))
}

/// Merge written parameter names with `@param` docs.
///
/// Written parameters keep their order; documented parameters that the function does not name are appended.
fn signature(params: &[String], doc: Option<&DocBlock>) -> Signature {
    let mut out: Vec<Param> = params
        .iter()
        .map(|name| match doc.and_then(|d| d.param(name)) {
            Some(documented) => param_from_doc(documented),
            None => Param::named(name.clone()),
        })
        .collect();
    if let Some(doc) = doc {
        for documented in doc.params() {
            if !out.iter().any(|p| p.name == documented.name) {
                out.push(param_from_doc(documented));
            }
        }
    }
    Signature {
        params: out,
        returns: doc.and_then(|d| d.returns()).and_then(|r| r.ty.as_deref()).map(TypeRef::new),
    }
}

fn param_from_doc(doc: &stubdex_syntax::jsdoc::ParamDoc) -> Param {
    Param {
        name: doc.name.clone(),
        default: doc.default.clone(),
        ty: doc.ty.as_deref().map(TypeRef::new),
        doc: doc.doc.clone(),
        optional: doc.optional,
    }
}

fn apply_doc(decl: &mut RawDecl, doc: &DocBlock) {
    decl.doc = doc.summary.clone();
    decl.local = doc.has(DocTagId::Local);
    decl.attributes = Attributes {
        deprecated: doc
            .has(DocTagId::Deprecated)
            .then(|| doc.text(DocTagId::Deprecated).unwrap_or_default().to_string()),
        private: doc.has(DocTagId::Private),
        is_static: doc.has(DocTagId::Static),
        constant: doc.has(DocTagId::Constant),
        since: doc.text(DocTagId::Since).map(str::to_string),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use stubdex_syntax::parser;

    fn lower(module: &str, source: &str) -> RawModule {
        let program = parser::parse_source(source).unwrap();
        StubLowering::new(module, DocOptions::default()).lower_program(&program)
    }

    fn decl<'m>(raw: &'m RawModule, name: &str) -> &'m RawDecl {
        raw.declarations
            .iter()
            .rev()
            .find(|d| d.qualified_name == name)
            .unwrap_or_else(|| panic!("no declaration {name}"))
    }

    #[test]
    fn test_namespace_from_file_stem() {
        let raw = lower("net", "/** Networking. */\nvar net = {};\nnet.isIP = function(input) {}\n");
        assert_eq!(raw.namespace.as_deref(), Some("net"));
        assert_eq!(raw.doc, "Networking.");
        let is_ip = decl(&raw, "isIP");
        assert_eq!(is_ip.kind, SymbolKind::Function);
        assert_eq!(is_ip.role, MemberRole::Module);
        assert_eq!(is_ip.signature.as_ref().unwrap().params[0].name, "input");
    }

    #[test]
    fn test_namespace_from_exports() {
        let raw = lower("tty", "var tty = {};\nvar stub = {};\nstub.isatty = function(fd) {}\nexports = stub;\n");
        assert_eq!(raw.namespace.as_deref(), Some("stub"));
        assert!(raw.declarations.iter().any(|d| d.qualified_name == "isatty"));
        assert_eq!(decl(&raw, "tty").kind, SymbolKind::Property);
    }

    #[test]
    fn test_exports_of_undeclared_name_means_no_namespace() {
        let raw = lower(
            "global_objects",
            "var global = {};\nrequire = function() {}\nrequire.resolve = function() {}\nexports = global_objects;\n",
        );
        assert_eq!(raw.namespace, None);
        assert_eq!(decl(&raw, "global").role, MemberRole::Module);
        assert_eq!(decl(&raw, "require").kind, SymbolKind::Function);
        let resolve = decl(&raw, "require.resolve");
        assert_eq!(resolve.role, MemberRole::Static);
        assert_eq!(resolve.owner(), Some("require"));
    }

    #[test]
    fn test_constructor_members_and_relations() {
        let source = r#"
var net = {};
net.Socket = function() {}
net.Socket.prototype = new stream.ReadableStream();
net.Socket.prototype = new events.EventEmitter;
/**
 * Sends data on the socket.
 * @param data
 * @param encoding='utf-8' {String}
 * @returns {Boolean}
 */
net.Socket.prototype.write = function(data, encoding, callback) {}
/** @type {String} */
net.Socket.prototype.remoteAddress = 0;
var stream = require('stream');
var events = require('events');
exports = net;
"#;
        let raw = lower("net", source);
        assert_eq!(decl(&raw, "Socket").kind, SymbolKind::Constructor);
        assert_eq!(
            raw.relations,
            vec![
                RawRelation {
                    owner: "Socket".into(),
                    base: "stream.ReadableStream".into()
                },
                RawRelation {
                    owner: "Socket".into(),
                    base: "events.EventEmitter".into()
                },
            ]
        );
        let write = decl(&raw, "Socket.write");
        assert_eq!(write.role, MemberRole::Instance);
        assert_eq!(write.doc, "Sends data on the socket.");
        let sig = write.signature.as_ref().unwrap();
        assert_eq!(sig.params.len(), 3);
        assert_eq!(sig.params[1].default.as_deref(), Some("'utf-8'"));
        assert_eq!(sig.params[1].ty, Some(TypeRef::new("String")));
        assert_eq!(sig.returns, Some(TypeRef::new("Boolean")));
        let addr = decl(&raw, "Socket.remoteAddress");
        assert_eq!(addr.kind, SymbolKind::Property);
        assert_eq!(addr.value_type, Some(TypeRef::new("String")));
        assert_eq!(raw.aliases.get("events").map(String::as_str), Some("events"));
        assert_eq!(raw.aliases.get("stream").map(String::as_str), Some("stream"));
    }

    #[test]
    fn test_events_and_local_marker() {
        let source = r#"
var net = {};
net.Server = function() {}
/** @__local__ */ net.Server.__events__ = {};
/** @param had_error {Boolean} */
net.Server.__events__.close = function(had_error) {};
net.Server.__events__.listening = 0;
"#;
        let raw = lower("net", source);
        let table = decl(&raw, "Server.__events__");
        assert!(table.local);
        assert_eq!(table.role, MemberRole::Static);
        let close = decl(&raw, "Server.__events__.close");
        assert_eq!(close.kind, SymbolKind::Event);
        assert_eq!(close.owner(), Some("Server"));
        assert_eq!(close.signature.as_ref().unwrap().params[0].ty, Some(TypeRef::new("Boolean")));
        let listening = decl(&raw, "Server.__events__.listening");
        assert_eq!(listening.kind, SymbolKind::Event);
        assert_eq!(listening.signature, Some(Signature::default()));
    }

    #[test]
    fn test_proto_relation_on_namespace() {
        let raw = lower("process", "var process = {};\nprocess.__proto__ = events.EventEmitter;\n");
        assert_eq!(
            raw.relations,
            vec![RawRelation {
                owner: String::new(),
                base: "events.EventEmitter".into()
            }]
        );
    }

    #[test]
    fn test_prototype_object_literal() {
        let source = r#"
var fs = {};
fs.Stats = function() {}
fs.Stats.prototype = {
    /** Is this a file? @returns {Boolean} */
    isFile: function() {},
    "size": 0,
};
fs.Empty = function() {}
fs.Empty.prototype = {}
"#;
        let raw = lower("fs", source);
        assert_eq!(decl(&raw, "Stats.isFile").role, MemberRole::Instance);
        assert_eq!(decl(&raw, "Stats.size").kind, SymbolKind::Property);
        assert_eq!(decl(&raw, "Empty").kind, SymbolKind::Constructor);
        assert!(raw.relations.is_empty());
        assert!(!raw.declarations.iter().any(|d| d.qualified_name.starts_with("Empty.")));
    }

    #[test]
    fn test_bare_function_and_doc_bases() {
        let source = "/**\n * @constructor\n * @base {events.EventEmitter}\n */\nfunction URL(href) {}\n";
        let raw = lower("url", source);
        assert_eq!(decl(&raw, "URL").kind, SymbolKind::Constructor);
        assert_eq!(raw.relations[0].owner, "URL");
        assert_eq!(raw.relations[0].base, "events.EventEmitter");
    }

    #[test]
    fn test_alias_without_var_and_stray_block() {
        let raw = lower("tty", "{}\nnet = require('net');\nvar tty = {};\ntty.isatty = function(fd) {}\n");
        assert_eq!(raw.aliases.get("net").map(String::as_str), Some("net"));
        assert_eq!(raw.declarations.len(), 1);
    }

    #[test]
    fn test_doc_params_without_written_params_are_appended() {
        let raw = lower("events", "var events = {};\n/** @param event @param listener */\nevents.on = function() {}\n");
        let names: Vec<_> = decl(&raw, "on").signature.as_ref().unwrap().params.iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, ["event", "listener"]);
    }

    #[test]
    fn test_attributes_from_tags() {
        let raw = lower(
            "util",
            "var util = {};\n/**\n * Old.\n * @deprecated use inspect\n * @since 0.6\n * @private\n */\nutil.p = function() {}\n",
        );
        let p = decl(&raw, "p");
        assert_eq!(p.attributes.deprecated.as_deref(), Some("use inspect"));
        assert_eq!(p.attributes.since.as_deref(), Some("0.6"));
        assert!(p.attributes.private);
    }
}
