/// Expression parsing.
///
/// Expressions never nest operators: a stub value is a function, an object or array literal, a
/// `new` / call expression, a dotted path or a literal.
impl<'a> Parser<'a> {
    fn expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_span();
        let token = self.peek().clone();

        let expr = match token.kind {
            TokenKind::Keyword(KeywordId::Function) => {
                self.advance();
                // Named function expressions: the name is irrelevant.
                if matches!(self.peek().kind, TokenKind::Ident(_)) {
                    self.advance();
                }
                let params = self.params()?;
                self.skip_braced("Unterminated function body")?;
                Expr::Function(FunctionExpr { params })
            }
            TokenKind::Keyword(KeywordId::New) => {
                self.advance();
                let callee = self.path()?;
                let args = if self.check_punct(PunctuationId::LParen) {
                    self.arguments()?
                } else {
                    Vec::new()
                };
                Expr::New(NewExpr { callee, args })
            }
            TokenKind::Keyword(KeywordId::True) => {
                self.advance();
                Expr::Bool(true)
            }
            TokenKind::Keyword(KeywordId::False) => {
                self.advance();
                Expr::Bool(false)
            }
            TokenKind::Keyword(KeywordId::Null) => {
                self.advance();
                Expr::Null
            }
            TokenKind::Keyword(KeywordId::Undefined) => {
                self.advance();
                Expr::Undefined
            }
            TokenKind::Number(n) => {
                self.advance();
                Expr::Number(n)
            }
            TokenKind::String(s) => {
                self.advance();
                Expr::String(s)
            }
            TokenKind::Punctuation(PunctuationId::LBrace) => self.object_literal()?,
            TokenKind::Punctuation(PunctuationId::LBracket) => self.array_literal()?,
            TokenKind::Ident(_) => {
                let callee = self.path()?;
                if self.check_punct(PunctuationId::LParen) {
                    let args = self.arguments()?;
                    Expr::Call(CallExpr { callee, args })
                } else {
                    Expr::Path(callee.node)
                }
            }
            _ => {
                return Err(self
                    .unexpected("Expected expression")
                    .with_hint("assign a placeholder value such as `0`, `{}` or `function() {}`"));
            }
        };

        Ok(Spanned::new(expr, start.merge(self.previous_span())))
    }

    /// Parse `ident (. name)*`.
    fn path(&mut self) -> Result<Spanned<Path>, CompileError> {
        let first = self.expect_name("Expected identifier", false)?;
        let mut span = first.span;
        let mut segments = vec![first.node];
        while self.match_punct(PunctuationId::Dot) {
            let next = self.expect_name("Expected member name after '.'", true)?;
            span = span.merge(next.span);
            segments.push(next.node);
        }
        Ok(Spanned::new(Path::new(segments), span))
    }

    /// Parse a parenthesized parameter list of plain identifiers.
    fn params(&mut self) -> Result<Vec<Spanned<Ident>>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '(' before parameters")?;
        let mut params = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            params.push(self.expect_name("Expected parameter name", false)?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after parameters")?;
        Ok(params)
    }

    /// Parse a parenthesized argument list.
    fn arguments(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '('")?;
        let mut args = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            args.push(self.expression()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after arguments")?;
        Ok(args)
    }

    /// Parse `{ key: value, ... }`, allowing doc comments before each entry and a trailing comma.
    fn object_literal(&mut self) -> Result<Expr, CompileError> {
        self.expect_punct(PunctuationId::LBrace, "Expected '{'")?;
        let mut properties = Vec::new();
        loop {
            let doc = self.take_doc();
            if self.match_punct(PunctuationId::RBrace) {
                break;
            }
            let key = self.property_key()?;
            self.expect_punct(PunctuationId::Colon, "Expected ':' after property name")?;
            let value = self.expression()?;
            properties.push(Property { doc, key, value });
            if !self.match_punct(PunctuationId::Comma) {
                // Doc comments may trail the last entry.
                self.take_doc();
                self.expect_punct(PunctuationId::RBrace, "Expected ',' or '}' in object literal")?;
                break;
            }
        }
        Ok(Expr::Object(properties))
    }

    fn property_key(&mut self) -> Result<Spanned<Ident>, CompileError> {
        let span = self.current_span();
        match &self.peek().kind {
            TokenKind::String(s) => {
                let key = s.clone();
                self.advance();
                Ok(Spanned::new(key, span))
            }
            TokenKind::Number(n) => {
                let key = n.to_string();
                self.advance();
                Ok(Spanned::new(key, span))
            }
            _ => self.expect_name("Expected property name", true),
        }
    }

    fn array_literal(&mut self) -> Result<Expr, CompileError> {
        self.expect_punct(PunctuationId::LBracket, "Expected '['")?;
        let mut items = Vec::new();
        while !self.check_punct(PunctuationId::RBracket) {
            items.push(self.expression()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBracket, "Expected ']' after array items")?;
        Ok(Expr::Array(items))
    }

    /// Skip a `{ ... }` block, balancing nested braces. Its contents are never inspected.
    fn skip_braced(&mut self, unterminated: &str) -> Result<(), CompileError> {
        let open = self.expect_punct(PunctuationId::LBrace, "Expected '{'")?;
        let mut depth = 1usize;
        while depth > 0 {
            if self.is_at_end() {
                return Err(CompileError::syntax(unterminated.to_string(), open.merge(self.current_span()))
                    .with_hint("add the matching '}'"));
            }
            match self.advance().kind {
                TokenKind::Punctuation(PunctuationId::LBrace) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RBrace) => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }
}
