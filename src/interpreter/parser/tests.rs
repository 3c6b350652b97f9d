use pretty_assertions::assert_eq;
use super::*;

fn parse(source: &str) -> (Vec<Stmt>, Vec<StaticError>) {
    let mut parser = Parser::new(Lexer::new(source));
    let statements = parser.parse();

    (statements, parser.into_errors())
}

fn parse_ok(source: &str) -> Vec<String> {
    let (statements, errors) = parse(source);
    assert_eq!(errors, Vec::<StaticError>::new());

    statements.iter().map(Stmt::to_string).collect()
}

fn error_messages(source: &str) -> Vec<String> {
    let (_, errors) = parse(source);
    errors.iter().map(StaticError::to_string).collect()
}

mod expressions {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(parse_ok("1 + 2 * 3 - 4 / 5;"), vec!["(- (+ 1 (* 2 3)) (/ 4 5));"]);
        assert_eq!(parse_ok("-a * b;"), vec!["(* (- a) b);"]);
        assert_eq!(parse_ok("a < b == c >= d;"), vec!["(== (< a b) (>= c d));"]);
        assert_eq!(parse_ok("a or b and c == d;"), vec!["(or a (and b (== c d)));"]);
        assert_eq!(parse_ok("!!x;"), vec!["(! (! x));"]);
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(parse_ok("1 - 2 - 3;"), vec!["(- (- 1 2) 3);"]);
        assert_eq!(parse_ok("a / b * c;"), vec!["(* (/ a b) c);"]);
        assert_eq!(parse_ok("a or b or c;"), vec!["(or (or a b) c);"]);
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        assert_eq!(parse_ok("(1 + 2) * 3;"), vec!["(* (group (+ 1 2)) 3);"]);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(parse_ok("a = b = 3;"), vec!["(= a (= b 3));"]);
        assert_eq!(parse_ok("a = b or c;"), vec!["(= a (or b c));"]);
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_ok("nil; true; false; 1.5; \"str\";"), vec![
            "nil;", "true;", "false;", "1.5;", "\"str\";",
        ]);
    }

    #[test]
    fn test_chained_calls() {
        assert_eq!(parse_ok("f()(1)(2, g(3));"), vec!["(call (call (call f) 1) 2 (call g 3));"]);
    }

    #[test]
    fn test_call_keeps_closing_paren() {
        let (statements, _) = parse("f(\n1\n);");

        match &statements[0] {
            Stmt::Expression(Expr::Call { paren, args, .. }) => {
                assert_eq!(paren.token_type(), TokenType::ParenthesisRight);
                assert_eq!(paren.line(), 3);
                assert_eq!(args.len(), 1);
            },
            other => panic!("Expected call expression, got {}", other),
        }
    }
}

mod statements {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn test_var_declarations() {
        assert_eq!(parse_ok("var a; var b = 1 + 2;"), vec!["var a;", "var b = (+ 1 2);"]);
    }

    #[test]
    fn test_block_and_if() {
        assert_eq!(parse_ok("{ var a = 1; print a; }"), vec!["{ var a = 1; print a; }"]);
        assert_eq!(parse_ok("if (a) print 1; else print 2;"), vec!["if a print 1; else print 2;"]);
        assert_eq!(parse_ok("if (a) if (b) print 1; else print 2;"), vec!["if a if b print 1; else print 2;"]);
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let (statements, _) = parse("if (a) if (b) print 1; else print 2;");

        match &statements[0] {
            Stmt::If { otherwise: None, then, .. } => assert!(matches!(**then, Stmt::If { otherwise: Some(_), .. })),
            other => panic!("Expected outer if without else, got {}", other),
        }
    }

    #[test]
    fn test_while() {
        assert_eq!(parse_ok("while (i < 3) i = i + 1;"), vec!["while (< i 3) (= i (+ i 1));"]);
    }

    #[test]
    fn test_function_declaration() {
        assert_eq!(parse_ok("fun add(a, b) { return a + b; }"), vec!["fun add(a, b) { return (+ a b); }"]);
        assert_eq!(parse_ok("fun noop() { return; }"), vec!["fun noop() { return; }"]);
    }

    #[test]
    fn test_for_desugars_to_while() {
        assert_eq!(parse_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
                   vec!["{ var i = 0; while (< i 3) { print i; (= i (+ i 1)); } }"]);
    }

    #[test]
    fn test_for_without_clauses_loops_forever() {
        assert_eq!(parse_ok("for (;;) print 1;"), vec!["while true print 1;"]);
    }

    #[test]
    fn test_for_with_expression_initializer() {
        assert_eq!(parse_ok("for (i = 0; i < 1;) print i;"), vec!["{ (= i 0); while (< i 1) print i; }"]);
    }
}

mod errors {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn test_missing_expression() {
        assert_eq!(error_messages("print ;"), vec!["[line 1 column 7] Error at ';': Expect expression."]);
    }

    #[test]
    fn test_error_at_end() {
        assert_eq!(error_messages("print 1"), vec!["[line 1 column 8] Error at end: Expect ';' after value."]);
    }

    #[test]
    fn test_recovery_reports_later_errors() {
        let source = "var = 1;\nprint 2;\nprint (3;\nvar ok = 4;\n1 +;";
        let (statements, errors) = parse(source);

        assert_eq!(errors.iter().map(|error| error.pos.line).collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(errors.iter().map(|error| error.message.as_str()).collect::<Vec<_>>(), vec![
            "Expect variable name.",
            "Expect ')' after expression.",
            "Expect expression.",
        ]);
        // The independent statements in between still parse
        assert_eq!(statements.iter().map(Stmt::to_string).collect::<Vec<_>>(), vec!["print 2;", "var ok = 4;"]);
    }

    #[test]
    fn test_synchronize_stops_before_statement_keyword() {
        let (statements, errors) = parse("1 + + print 2;");

        assert_eq!(errors.len(), 1);
        assert_eq!(statements.iter().map(Stmt::to_string).collect::<Vec<_>>(), vec!["print 2;"]);
    }

    #[test]
    fn test_invalid_assignment_target() {
        let (statements, errors) = parse("a + b = c; print 1;");

        assert_eq!(errors.iter().map(StaticError::to_string).collect::<Vec<_>>(),
                   vec!["[line 1 column 7] Error at '=': Invalid assignment target."]);
        // Reported without throwing away the rest of the statement
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_lexer_errors_are_reported() {
        assert_eq!(error_messages("var a = \"oops;"), vec![
            "[line 1 column 9] Error: Unterminated string.",
            "[line 1 column 15] Error at end: Expect expression.",
        ]);
        assert_eq!(error_messages("var a = 1 @ 2;"), vec![
            "[line 1 column 11] Error: Unexpected character '@'.",
            "[line 1 column 13] Error at '2': Expect ';' after variable declaration.",
        ]);
        assert_eq!(error_messages("print 1; /* never closed"), vec![
            "[line 1 column 10] Error: Unterminated block comment.",
        ]);
    }

    #[test]
    fn test_return_at_top_level() {
        assert_eq!(error_messages("return 1;"), vec!["[line 1 column 1] Error at 'return': Can't return from top-level code."]);
        assert_eq!(error_messages("fun f() { { return 1; } }"), Vec::<String>::new());
    }

    fn call_with_arguments(count: usize) -> String {
        let arguments = (0..count).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
        format!("f({});", arguments)
    }

    fn function_with_parameters(count: usize) -> String {
        let parameters = (0..count).map(|i| format!("p{}", i)).collect::<Vec<_>>().join(", ");
        format!("fun f({}) {{}}", parameters)
    }

    #[test]
    fn test_argument_limit() {
        assert_eq!(parse(&call_with_arguments(255)).1, Vec::<StaticError>::new());

        let (statements, errors) = parse(&call_with_arguments(256));
        assert_eq!(errors.iter().map(|error| error.message.as_str()).collect::<Vec<_>>(),
                   vec!["Can't have more than 255 arguments."]);
        // Parsing carries on past the limit
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_parameter_limit_matches_argument_limit() {
        assert_eq!(parse(&function_with_parameters(255)).1, Vec::<StaticError>::new());

        let (statements, errors) = parse(&function_with_parameters(256));
        assert_eq!(errors.iter().map(|error| error.message.as_str()).collect::<Vec<_>>(),
                   vec!["Can't have more than 255 parameters."]);
        assert_eq!(statements.len(), 1);
    }
}
