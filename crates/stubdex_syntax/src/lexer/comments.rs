//! Comment scanning for the stub lexer.
//!
//! `//` and `/* */` comments are skipped. `/** */` comments are emitted as [`TokenKind::DocComment`] carrying the
//! text between the delimiters. `/**/` is an empty ordinary comment, not a doc comment.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Span;
use crate::diagnostics::CompileError;

impl<'a> Lexer<'a> {
    /// Scan after a `/`: a line comment, a block/doc comment, or an error.
    pub(super) fn scan_slash(&mut self, start: usize) {
        if self.match_char('/') {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
        } else if self.match_char('*') {
            let is_doc = self.peek() == Some('*') && self.peek_next() != Some('/');
            self.scan_block_comment(start, is_doc);
        } else {
            self.errors.push(
                CompileError::lexical(
                    "Unexpected character '/'".to_string(),
                    Span::new(start, self.current_pos),
                )
                .with_note("stub sources contain declarations only; operators and regular expressions are not supported"),
            );
        }
    }

    /// Scan the rest of a `/* ... */` comment. `start` is the offset of the opening `/`.
    fn scan_block_comment(&mut self, start: usize, is_doc: bool) {
        let body_start = if is_doc { start + 3 } else { start + 2 };
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    break;
                }
                Some(_) => {}
                None => {
                    self.errors.push(
                        CompileError::lexical(
                            "Unterminated block comment".to_string(),
                            Span::new(start, self.current_pos),
                        )
                        .with_hint("close the comment with `*/`"),
                    );
                    return;
                }
            }
        }

        if is_doc {
            let body_end = self.current_pos.saturating_sub(2).max(body_start);
            let body = self.source[body_start..body_end].to_string();
            self.add_token(TokenKind::DocComment(body), start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::lex;
    use super::*;

    #[test]
    fn test_comments_are_skipped() {
        let tokens = lex("// line\n/* block */ x /**/").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Ident("x".into()));
    }

    #[test]
    fn test_doc_comment_is_kept() {
        let tokens = lex("/**\n * Hello.\n * @constructor\n */\nfunction A() {}").unwrap();
        match &tokens[0].kind {
            TokenKind::DocComment(body) => {
                assert!(body.contains("Hello."));
                assert!(body.contains("@constructor"));
                assert!(!body.contains("*/"));
            }
            other => panic!("expected doc comment, got {other:?}"),
        }
        assert_eq!(tokens[0].span.start, 0);
    }

    #[test]
    fn test_one_line_doc_comment() {
        let tokens = lex("/** @__local__ */ a.__events__ = {};").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::DocComment(" @__local__ ".into()));
    }

    #[test]
    fn test_star_inside_doc_comment() {
        let tokens = lex("/** a * b **/").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::DocComment(" a * b *".into()));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = lex("/** never closed").unwrap_err();
        assert_eq!(err.len(), 1);
        assert!(err[0].message.contains("Unterminated"));
        assert_eq!(err[0].hints.len(), 1);
    }

    #[test]
    fn test_lone_slash_is_an_error() {
        let err = lex("a = 1 / 2").unwrap_err();
        assert!(err[0].message.contains("'/'"));
    }
}
