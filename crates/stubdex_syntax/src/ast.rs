//! Abstract syntax tree for declaration stubs.
//!
//! The tree only keeps what a declaration can carry: binding targets, the shape of the assigned value and the
//! doc comment in front of it. Function bodies are skipped by the parser and never materialized.

use std::fmt;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A stub file is a sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Spanned<Statement>>,
}

/// One top-level statement together with the doc comment written in front of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Raw doc comment body (between `/**` and `*/`), if any.
    pub doc: Option<Spanned<String>>,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `var name = value;` (`let`/`const` are accepted too)
    Var(VarDecl),
    /// `a.b.c = value;`
    Assign(AssignStmt),
    /// `function name(params) { ... }`
    Function(FunctionDecl),
    /// A stray `;` or a top-level `{ ... }` block.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Spanned<Ident>,
    pub value: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Spanned<Path>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Spanned<Ident>,
    pub params: Vec<Spanned<Ident>>,
}

// ============================================================================
// Paths
// ============================================================================

/// A dotted access path such as `net.Socket.prototype.write`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    pub segments: Vec<Ident>,
}

impl Path {
    pub fn new(segments: Vec<Ident>) -> Self {
        Self { segments }
    }

    /// First segment of the path.
    pub fn root(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }

    /// Last segment of the path.
    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `function(params) { ... }`; the body is skipped.
    Function(FunctionExpr),
    /// `{ key: value, "key": value, }`
    Object(Vec<Property>),
    /// `[a, b]`
    Array(Vec<Spanned<Expr>>),
    /// `new Path(args)` or `new Path`
    New(NewExpr),
    /// `path(args)`, e.g. `require('events')`
    Call(CallExpr),
    Path(Path),
    Number(f64),
    String(String),
    Bool(bool),
    Null,
    Undefined,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub params: Vec<Spanned<Ident>>,
}

/// One entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub doc: Option<Spanned<String>>,
    pub key: Spanned<Ident>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub callee: Spanned<Path>,
    pub args: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Spanned<Path>,
    pub args: Vec<Spanned<Expr>>,
}

impl Expr {
    /// Short description of the expression form, for diagnostics and logs.
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Function(_) => "function",
            Expr::Object(_) => "object literal",
            Expr::Array(_) => "array literal",
            Expr::New(_) => "new expression",
            Expr::Call(_) => "call",
            Expr::Path(_) => "path",
            Expr::Number(_) => "number",
            Expr::String(_) => "string",
            Expr::Bool(_) => "boolean",
            Expr::Null => "null",
            Expr::Undefined => "undefined",
        }
    }
}
