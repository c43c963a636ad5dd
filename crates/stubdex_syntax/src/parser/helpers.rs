/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords and punctuation
/// - Doc comment collection (`take_doc`)
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`] (or the stream is exhausted).
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.pos.min(last)]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos.saturating_sub(1)]
    }

    /// Span of the most recently consumed token.
    fn previous_span(&self) -> Span {
        if self.pos == 0 {
            self.current_span()
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<Span, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(msg))
        }
    }

    /// Consume an identifier and return its name.
    ///
    /// After a `.`, reserved words are valid member names (`x.new`), so `allow_keywords` lets them through.
    fn expect_name(&mut self, msg: &str, allow_keywords: bool) -> Result<Spanned<Ident>, CompileError> {
        let token = self.peek();
        let span = token.span;
        let name = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Keyword(id) if allow_keywords => keywords::as_str(*id).to_string(),
            _ => return Err(self.unexpected(msg)),
        };
        self.advance();
        Ok(Spanned::new(name, span))
    }

    /// Build a syntax error for the current token.
    fn unexpected(&self, msg: &str) -> CompileError {
        CompileError::syntax(
            format!("{}, found {}", msg, describe_token(&self.peek().kind)),
            self.current_span(),
        )
    }

    /// Consume consecutive doc comments and return the last one.
    ///
    /// A doc comment documents the declaration that follows it; earlier, detached ones are dropped.
    fn take_doc(&mut self) -> Option<Spanned<String>> {
        let mut doc = None;
        while let TokenKind::DocComment(body) = &self.peek().kind {
            doc = Some(Spanned::new(body.clone(), self.current_span()));
            self.advance();
        }
        doc
    }

    /// Skip tokens until the next statement boundary.
    ///
    /// Stops after a `;`, or before `var`/`function`/a doc comment, at brace depth zero. If the failed
    /// statement consumed nothing, one token is skipped first so the parser always makes progress.
    fn synchronize(&mut self, statement_start: usize) {
        let mut depth = 0usize;
        if self.pos == statement_start && self.advance().kind.is_punctuation(PunctuationId::Semicolon) {
            return;
        }
        while !self.is_at_end() {
            match self.peek().punctuation_id() {
                Some(PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RBrace) => depth = depth.saturating_sub(1),
                Some(PunctuationId::Semicolon) if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            let starts_statement = self.check_keyword(KeywordId::Var)
                || self.check_keyword(KeywordId::Function)
                || self.peek().kind.is_doc_comment();
            if depth == 0 && starts_statement {
                return;
            }
            self.advance();
        }
    }
}

/// Human-readable description of a token for error messages.
fn describe_token(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Keyword(id) => format!("keyword '{}'", keywords::as_str(*id)),
        TokenKind::Punctuation(id) => format!("'{}'", punctuation::as_str(*id)),
        TokenKind::Ident(name) => format!("identifier '{}'", name),
        TokenKind::Number(n) => format!("number {}", n),
        TokenKind::String(s) => format!("string {:?}", s),
        TokenKind::DocComment(_) => "doc comment".to_string(),
        TokenKind::Eof => "end of file".to_string(),
    }
}
