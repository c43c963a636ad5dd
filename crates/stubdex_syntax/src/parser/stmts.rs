/// Statement parsing.
///
/// Supported forms:
/// - `var name [= expr]` (also `let` / `const`)
/// - `function name(params) { ... }`
/// - `a.b.c = expr`
/// - `;` and top-level `{ ... }` blocks, both parsed as [`StatementKind::Empty`]
///
/// A trailing `;` is optional everywhere.
impl<'a> Parser<'a> {
    fn statement(&mut self, doc: Option<Spanned<String>>) -> Result<Spanned<Statement>, CompileError> {
        let start = self.current_span();

        if self.match_punct(PunctuationId::Semicolon) {
            return Ok(Spanned::new(
                Statement {
                    doc,
                    kind: StatementKind::Empty,
                },
                start,
            ));
        }

        let kind = if self.match_keyword(KeywordId::Var) {
            StatementKind::Var(self.var_decl()?)
        } else if self.check_keyword(KeywordId::Function) {
            StatementKind::Function(self.function_decl()?)
        } else if self.check_punct(PunctuationId::LBrace) {
            self.skip_braced("Unterminated block")?;
            StatementKind::Empty
        } else if matches!(self.peek().kind, TokenKind::Ident(_)) {
            StatementKind::Assign(self.assignment()?)
        } else {
            return Err(self
                .unexpected("Expected a declaration")
                .with_hint("stub statements are `var name = ...`, `path = ...` or `function name() {}`"));
        };

        self.match_punct(PunctuationId::Semicolon);
        let span = start.merge(self.previous_span());
        Ok(Spanned::new(Statement { doc, kind }, span))
    }

    /// Parse the rest of `var name [= expr]` after the keyword.
    fn var_decl(&mut self) -> Result<VarDecl, CompileError> {
        let name = self.expect_name("Expected variable name after 'var'", false)?;
        let value = if self.match_punct(PunctuationId::Assign) {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(VarDecl { name, value })
    }

    /// Parse `function name(params) { ... }`.
    fn function_decl(&mut self) -> Result<FunctionDecl, CompileError> {
        self.advance(); // `function`
        let name = self.expect_name("Expected function name", false)?;
        let params = self.params()?;
        self.skip_braced("Unterminated function body")?;
        Ok(FunctionDecl { name, params })
    }

    /// Parse `path = expr`.
    fn assignment(&mut self) -> Result<AssignStmt, CompileError> {
        let target = self.path()?;
        if !self.check_punct(PunctuationId::Assign) {
            return Err(self
                .unexpected(&format!("Expected '=' after '{}'", target.node))
                .with_note("only assignments are allowed at the top level of a stub"));
        }
        self.advance();
        let value = self.expression()?;
        Ok(AssignStmt { target, value })
    }
}
