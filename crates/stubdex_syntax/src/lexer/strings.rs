//! String scanning for the stub lexer
//!
//! Handles single- and double-quoted strings with the usual escape sequences.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Span;
use crate::diagnostics::CompileError;

/// Result of processing an escape sequence
enum EscapeResult {
    /// Successfully parsed escape character
    Char(char),
    /// Backslash-newline: the string continues on the next line
    LineContinuation,
    /// Malformed `\x` / `\u` escape
    Invalid(String),
    /// End of input during escape
    Eof,
}

impl<'a> Lexer<'a> {
    /// Process an escape sequence. Called after consuming the backslash.
    fn scan_escape(&mut self) -> EscapeResult {
        match self.advance() {
            Some('n') => EscapeResult::Char('\n'),
            Some('t') => EscapeResult::Char('\t'),
            Some('r') => EscapeResult::Char('\r'),
            Some('b') => EscapeResult::Char('\u{8}'),
            Some('f') => EscapeResult::Char('\u{c}'),
            Some('v') => EscapeResult::Char('\u{b}'),
            Some('0') => EscapeResult::Char('\0'),
            Some('x') => self.scan_hex_escape(2),
            Some('u') => self.scan_hex_escape(4),
            Some('\n') => EscapeResult::LineContinuation,
            // Unknown escapes (including quotes and backslash) stand for the character itself.
            Some(c) => EscapeResult::Char(c),
            None => EscapeResult::Eof,
        }
    }

    fn scan_hex_escape(&mut self, digits: usize) -> EscapeResult {
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.advance();
                }
                _ => return EscapeResult::Invalid(hex),
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map_or(EscapeResult::Invalid(hex), EscapeResult::Char)
    }

    /// Scan a string literal. The opening quote has been consumed.
    pub(super) fn scan_string(&mut self, start: usize, quote: char) {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(c) if c == quote => break,
                Some('\\') => match self.scan_escape() {
                    EscapeResult::Char(c) => value.push(c),
                    EscapeResult::LineContinuation => {}
                    EscapeResult::Invalid(text) => {
                        self.errors.push(CompileError::lexical(
                            format!("Invalid escape sequence '\\{}'", text),
                            Span::new(start, self.current_pos),
                        ));
                    }
                    EscapeResult::Eof => {
                        self.unterminated_string(start);
                        return;
                    }
                },
                Some('\n') | None => {
                    self.unterminated_string(start);
                    return;
                }
                Some(c) => value.push(c),
            }
        }
        self.add_token(TokenKind::String(value), start);
    }

    fn unterminated_string(&mut self, start: usize) {
        self.errors.push(
            CompileError::lexical("Unterminated string".to_string(), Span::new(start, self.current_pos))
                .with_hint("strings cannot span lines without a trailing backslash"),
        );
    }
}
