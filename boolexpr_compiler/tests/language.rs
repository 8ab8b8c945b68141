use assert_matches::assert_matches;
use boolexpr_compiler::config::compile_time::syntax::MAX_PARSE_DEPTH;
use boolexpr_compiler::{
    compile_expression, evaluate_expression, BindingError, Bindings, EvaluationError,
    EvaluationResponse, Expr, ExpressionEvaluator, LexError, ParseError, PipelineError,
    RuntimeConfig,
};

const ASSIGNMENTS: [(bool, bool, bool); 8] = [
    (false, false, false),
    (false, false, true),
    (false, true, false),
    (false, true, true),
    (true, false, false),
    (true, false, true),
    (true, true, false),
    (true, true, true),
];

fn params(a: bool, b: bool, c: bool) -> String {
    format!("a={a},b={b},c={c}")
}

fn result(expression: &str, values: &str) -> bool {
    evaluate_expression(expression, values).unwrap().result
}

#[test]
fn and_binds_tighter_than_or() {
    for (a, b, c) in ASSIGNMENTS {
        assert_eq!(
            result("a or b and c", &params(a, b, c)),
            a || (b && c),
            "a={a} b={b} c={c}"
        );
    }
}

#[test]
fn parentheses_change_grouping() {
    let values = params(true, false, false);
    assert!(!result("(a or b) and c", &values));
    assert!(result("a or b and c", &values));

    // a=false, b=true, c=false gives false under both groupings
    let values = params(false, true, false);
    assert!(!result("(a or b) and c", &values));
    assert!(!result("a or b and c", &values));
}

#[test]
fn deepest_parsable_expression_evaluates() {
    let mut expression = String::from("x");
    for _ in 0..MAX_PARSE_DEPTH {
        expression = format!("a OR b AND ({expression})");
    }
    let response = evaluate_expression(&expression, "a=false,b=true,x=true").unwrap();
    assert!(response.result);

    let too_deep = format!("a OR b AND ({expression})");
    let error = evaluate_expression(&too_deep, "a=false,b=true,x=true").unwrap_err();
    assert_matches!(error, PipelineError::Parse(ParseError::MaxDepthExceeded { .. }));
    assert!(error.is_client_error());
}

#[test]
fn connective_casing_is_irrelevant() {
    let expected = compile_expression("x OR y").unwrap();
    for spelling in ["x or y", "x Or y", "x oR y"] {
        assert_eq!(compile_expression(spelling).unwrap(), expected);
    }
    assert_eq!(
        compile_expression("not a AND b").unwrap(),
        compile_expression("NOT a and b").unwrap()
    );
}

#[test]
fn keywords_inside_identifiers_are_untouched() {
    assert_eq!(
        compile_expression("orange and banana").unwrap(),
        Expr::and(Expr::variable("orange"), Expr::variable("banana"))
    );
    assert_eq!(
        compile_expression("android OR nothing").unwrap(),
        Expr::or(Expr::variable("android"), Expr::variable("nothing"))
    );
    let response = evaluate_expression("orange and banana", "orange=true,banana=1").unwrap();
    assert!(response.result);
}

#[test]
fn substituting_literals_preserves_result() {
    let expressions = [
        "a or b and c",
        "(a or b) and c",
        "not (a and not b) or c",
        "!a and (b or !c) or false",
    ];
    for expression in expressions {
        let tree = compile_expression(expression).unwrap();
        for (a, b, c) in ASSIGNMENTS {
            let bindings: Bindings = [("a", a), ("b", b), ("c", c)].into_iter().collect();
            let substituted = tree.substitute(&bindings);
            assert!(substituted.variables().is_empty());

            let direct = result(expression, &params(a, b, c));
            let via_literals = result(&substituted.to_string(), "");
            assert_eq!(direct, via_literals, "{expression} with a={a} b={b} c={c}");
        }
    }
}

#[test]
fn canonical_form_reparses_to_same_tree() {
    let tree = compile_expression("a and not (b or c) or d").unwrap();
    assert_eq!(compile_expression(&tree.to_string()).unwrap(), tree);
}

#[test]
fn end_to_end_response() {
    let response = evaluate_expression("x or y", "x=1,y=0").unwrap();
    assert_eq!(
        response,
        EvaluationResponse {
            definition: "x or y".to_string(),
            values: "x=1,y=0".to_string(),
            result: true,
        }
    );
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({"definition": "x or y", "values": "x=1,y=0", "result": true})
    );
}

#[test]
fn unbound_variable_is_reported_by_name() {
    assert_eq!(
        evaluate_expression("x or y", "x=true"),
        Err(PipelineError::Evaluation(EvaluationError::UnboundVariable {
            name: "y".to_string()
        }))
    );
}

#[test]
fn malformed_boolean_is_a_binding_error() {
    assert_matches!(
        evaluate_expression("x", "x=maybe"),
        Err(PipelineError::Binding(BindingError::InvalidBoolean { ref name, ref raw_value }))
            if name == "x" && raw_value == "maybe"
    );
}

#[test]
fn ampersand_fails_in_the_parser() {
    // The parameter string is broken too; parsing must fail first
    let error = evaluate_expression("&", "garbage").unwrap_err();
    assert_matches!(error, PipelineError::Parse(ParseError::UnexpectedToken { .. }));
    assert_eq!(error.position(), Some(0));
    assert!(error.is_client_error());
}

#[test]
fn unknown_character_fails_in_the_lexer() {
    assert_matches!(
        evaluate_expression("a # b", ""),
        Err(PipelineError::Lex(LexError::InvalidCharacter { character: '#', offset: 2, .. }))
    );
}

#[test]
fn empty_expression_is_rejected() {
    assert_matches!(
        evaluate_expression("", ""),
        Err(PipelineError::Parse(ParseError::EmptyExpression { .. }))
    );
}

#[test]
fn literals_are_case_insensitive() {
    assert!(result("TRUE and not False", ""));
}

#[test]
fn short_circuit_preference_does_not_change_results() {
    let mut config = RuntimeConfig::strict();
    config.evaluation.short_circuit = false;
    let eager = ExpressionEvaluator::new(config);

    for (a, b, c) in ASSIGNMENTS {
        let values = params(a, b, c);
        let expression = "a and b or not c and (a or b)";
        assert_eq!(
            eager.evaluate(expression, &values).unwrap().result,
            result(expression, &values)
        );
    }
}
