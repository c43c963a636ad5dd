#[cfg(test)]
/// Parser unit tests.
///
/// These tests cover each statement form, doc comment attachment and the parser’s
/// error recovery behavior (one error per broken statement, no cascades).
mod tests {
    use super::*;

    fn parse_str(source: &str) -> Result<Program, Vec<CompileError>> {
        parse_source(source)
    }

    fn single(source: &str) -> Statement {
        let mut program = parse_str(source).unwrap();
        assert_eq!(program.statements.len(), 1, "expected one statement in {source:?}");
        program.statements.remove(0).node
    }

    #[test]
    fn test_parse_namespace_var() {
        let stmt = single("var net = {};");
        match stmt.kind {
            StatementKind::Var(v) => {
                assert_eq!(v.name.node, "net");
                assert_eq!(v.value.map(|e| e.node), Some(Expr::Object(vec![])));
            }
            other => panic!("Expected var, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_require_alias() {
        let stmt = single("var events = require('events');");
        let StatementKind::Var(v) = stmt.kind else {
            panic!("Expected var");
        };
        match v.value.map(|e| e.node) {
            Some(Expr::Call(call)) => {
                assert_eq!(call.callee.node.to_string(), "require");
                assert_eq!(call.args.len(), 1);
                assert_eq!(call.args[0].node, Expr::String("events".into()));
            }
            other => panic!("Expected call, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_prototype_method_with_doc() {
        let source = r#"
/**
 * Sends data on the socket.
 * @param data
 * @param encoding='utf-8' {String}
 */
net.Socket.prototype.write = function(data, encoding, callback) {}
"#;
        let stmt = single(source);
        assert!(stmt.doc.as_ref().is_some_and(|d| d.node.contains("Sends data")));
        let StatementKind::Assign(assign) = stmt.kind else {
            panic!("Expected assignment");
        };
        assert_eq!(assign.target.node.to_string(), "net.Socket.prototype.write");
        match assign.value.node {
            Expr::Function(f) => {
                let names: Vec<_> = f.params.iter().map(|p| p.node.as_str()).collect();
                assert_eq!(names, ["data", "encoding", "callback"]);
            }
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_new_with_and_without_arguments() {
        let program = parse_str(
            "net.Socket.prototype = new events.EventEmitter();\nnet.Server.prototype = new events.EventEmitter\n",
        )
        .unwrap();
        assert_eq!(program.statements.len(), 2);
        for stmt in &program.statements {
            let StatementKind::Assign(assign) = &stmt.node.kind else {
                panic!("Expected assignment");
            };
            match &assign.value.node {
                Expr::New(n) => assert_eq!(n.callee.node.to_string(), "events.EventEmitter"),
                other => panic!("Expected new, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_bare_function_declaration() {
        let stmt = single("function URL(href) {}");
        match stmt.kind {
            StatementKind::Function(f) => {
                assert_eq!(f.name.node, "URL");
                assert_eq!(f.params.len(), 1);
            }
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_object_literal_with_docs_and_trailing_comma() {
        let source = r#"
fs.Stats.prototype = {
    /** Is this a file? */
    isFile: function() {},
    /** @type {Number} */
    "size": 0,
};
"#;
        let stmt = single(source);
        let StatementKind::Assign(assign) = stmt.kind else {
            panic!("Expected assignment");
        };
        let Expr::Object(props) = assign.value.node else {
            panic!("Expected object literal");
        };
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].key.node, "isFile");
        assert!(props[0].doc.as_ref().is_some_and(|d| d.node.contains("Is this a file?")));
        assert_eq!(props[1].key.node, "size");
        assert_eq!(props[1].value.node, Expr::Number(0.0));
    }

    #[test]
    fn test_function_body_is_skipped() {
        let stmt = single("a.b = function() { if (x) { return { y: 1 }; } }");
        assert!(matches!(stmt.kind, StatementKind::Assign(_)));
    }

    #[test]
    fn test_semicolons_are_optional() {
        let program = parse_str("a.x = 0\na.y = 'z'\nexports = a").unwrap();
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_block_and_stray_semicolons_are_empty_statements() {
        let program = parse_str("{} // workaround\nnet = require('net');\n;").unwrap();
        assert_eq!(program.statements.len(), 3);
        assert_eq!(program.statements[0].node.kind, StatementKind::Empty);
        assert!(matches!(program.statements[1].node.kind, StatementKind::Assign(_)));
        assert_eq!(program.statements[2].node.kind, StatementKind::Empty);
    }

    #[test]
    fn test_only_last_doc_comment_attaches() {
        let stmt = single("/** detached */\n/** attached */\nvar x = 1;");
        assert_eq!(stmt.doc.map(|d| d.node), Some(" attached ".to_string()));
    }

    #[test]
    fn test_keyword_member_names() {
        let stmt = single("a.new = 1;");
        let StatementKind::Assign(assign) = stmt.kind else {
            panic!("Expected assignment");
        };
        assert_eq!(assign.target.node.segments, vec!["a".to_string(), "new".to_string()]);
    }

    #[test]
    fn test_missing_assignment_is_single_clear_error() {
        let err = parse_str("net.Socket\nvar x = 1;").expect_err("a bare path is not a statement");
        assert_eq!(err.len(), 1, "Parser should return exactly one error (no cascade)");
        assert!(err[0].message.contains("Expected '=' after 'net.Socket'"), "{}", err[0].message);
    }

    #[test]
    fn test_recovery_reports_each_broken_statement() {
        let source = "a.x = ;\na.y = 1;\na.z = ,;\n";
        let err = parse_str(source).unwrap_err();
        assert_eq!(err.len(), 2, "{err:?}");
        assert!(err[0].message.contains("Expected expression"));
    }

    #[test]
    fn test_unterminated_function_body() {
        let err = parse_str("a.b = function() {").unwrap_err();
        assert!(err[0].message.contains("Unterminated function body"));
    }

    #[test]
    fn test_empty_source() {
        assert!(parse_str("").unwrap().statements.is_empty());
        assert!(parse_str("// nothing\n/** dangling */").unwrap().statements.is_empty());
    }
}
