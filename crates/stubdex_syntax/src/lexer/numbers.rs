//! Numeric literal scanning for the stub lexer.
//!
//! Numbers only ever appear as placeholder values (`x.prototype.size = 0;`), so all of them are kept as `f64`.
//! Decimal, fractional, exponent and `0x` hex forms are accepted, with an optional leading `-`.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Span;
use crate::diagnostics::CompileError;

impl<'a> Lexer<'a> {
    /// Scan a numeric literal. The first character (a digit or `-`) has been consumed.
    pub(super) fn scan_number(&mut self, start: usize) {
        let negative = self.source[start..].starts_with('-');
        if negative {
            self.advance();
        }
        let digits_start = self.current_pos - 1;

        if self.source[digits_start..].starts_with("0x") || self.source[digits_start..].starts_with("0X") {
            self.advance();
            let hex_start = self.current_pos;
            self.consume_while(|c| c.is_ascii_hexdigit());
            let text = &self.source[hex_start..self.current_pos];
            match u64::from_str_radix(text, 16) {
                Ok(n) => {
                    let value = n as f64;
                    self.add_token(TokenKind::Number(if negative { -value } else { value }), start);
                }
                Err(_) => self.invalid_number(start),
            }
            return;
        }

        self.consume_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.consume_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.consume_while(|c| c.is_ascii_digit());
        }

        match self.source[start..self.current_pos].parse::<f64>() {
            Ok(value) => self.add_token(TokenKind::Number(value), start),
            Err(_) => self.invalid_number(start),
        }
    }

    fn consume_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if pred(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn invalid_number(&mut self, start: usize) {
        self.errors.push(CompileError::lexical(
            format!("Invalid number literal '{}'", &self.source[start..self.current_pos]),
            Span::new(start, self.current_pos),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::super::lex;
    use super::*;

    fn numbers(source: &str) -> Vec<f64> {
        lex(source)
            .unwrap()
            .into_iter()
            .filter_map(|t| match t.kind {
                TokenKind::Number(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(numbers("0 42 3.5 -1 1e3 0x1F"), vec![0.0, 42.0, 3.5, -1.0, 1000.0, 31.0]);
    }

    #[test]
    fn test_dot_after_number_is_member_access() {
        let tokens = lex("1.toString").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number(1.0));
        assert!(matches!(tokens[1].kind, TokenKind::Punctuation(_)));
    }

    #[test]
    fn test_bad_exponent() {
        let err = lex("1e").unwrap_err();
        assert!(err[0].message.contains("Invalid number"));
    }

    #[test]
    fn test_empty_hex() {
        assert!(lex("0x").is_err());
    }
}
