//! Diagnostics for stub sources.
//!
//! Lexer and parser errors are plain [`CompileError`] values carrying a byte span. Rendering against the source text
//! goes through `miette`'s graphical handler so every front end (CLI, `check`, tests) shows the same report.

use std::fmt;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceCode};

use crate::ast::Span;

/// A syntax-level error with location information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Error,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            ..Self::new(message, span)
        }
    }

    pub fn lexical(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Lexical,
            ..Self::new(message, span)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Lexical,
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// A [`CompileError`] paired with the source it points into, ready for `miette` rendering.
#[derive(Debug, thiserror::Error)]
#[error("{}", .error.message)]
pub struct SourceDiagnostic {
    error: CompileError,
    source_code: NamedSource<String>,
    source_len: usize,
}

impl SourceDiagnostic {
    pub fn new(file_name: &str, source: &str, error: CompileError) -> Self {
        Self {
            error,
            source_code: NamedSource::new(file_name, source.to_string()),
            source_len: source.len(),
        }
    }

    fn clamped_range(&self) -> std::ops::Range<usize> {
        let start = self.error.span.start.min(self.source_len);
        let end = self.error.span.end.clamp(start, self.source_len);
        start..end
    }
}

impl Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error.kind))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let lines: Vec<String> = self
            .error
            .notes
            .iter()
            .map(|n| format!("note: {n}"))
            .chain(self.error.hints.iter().map(|h| format!("hint: {h}")))
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(Box::new(lines.join("\n")))
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source_code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::at(self.clamped_range(), self.error.kind.to_string());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Render an error with source context as plain text (no colors).
pub fn format_error(file_name: &str, source: &str, error: &CompileError) -> String {
    let diagnostic = SourceDiagnostic::new(file_name, source, error.clone());
    let mut out = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut out, &diagnostic).is_err() {
        // Fall back to a one-line location if the handler could not render.
        let (line, col) = line_col(source, error.span.start);
        return format!("{file_name}:{line}:{col}: {error}");
    }
    out
}

/// Print an error with source context to stderr.
pub fn print_error(file_name: &str, source: &str, error: &CompileError) {
    eprintln!("{}", format_error(file_name, source, error));
}

/// Return the 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut line_start = 0;
    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let src = "var a = {};\nvar b = ;\n";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 12), (2, 1));
        assert_eq!(line_col(src, 20), (2, 9));
        assert_eq!(line_col(src, 999), (3, 1));
    }

    #[test]
    fn test_format_error_mentions_message_and_hint() {
        let src = "var a = ;\n";
        let err = CompileError::syntax("Expected expression".to_string(), Span::new(8, 9))
            .with_hint("assign a placeholder value such as `0` or `{}`");
        let out = format_error("a.js", src, &err);
        assert!(out.contains("Expected expression"), "{out}");
        assert!(out.contains("a.js"), "{out}");
        assert!(out.contains("placeholder value"), "{out}");
    }

    #[test]
    fn test_format_error_clamps_out_of_range_span() {
        let err = CompileError::lexical("Unterminated comment".to_string(), Span::new(40, 80));
        let out = format_error("b.js", "/* open", &err);
        assert!(out.contains("Unterminated comment"), "{out}");
    }
}
