//! Operator precedence and associativity through the public parser API
use vn_script_compiler::parser::{BinaryOp, Expr, ExpressionParser, Param};

fn parse_single(source: &str) -> Expr {
    match ExpressionParser::default().parse(source).unwrap().as_slice() {
        [Param::Expr(expr)] => expr.clone(),
        other => panic!("Expected one expression, got {:?}", other),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expected = Expr::binary(
        BinaryOp::Add,
        Expr::Number(1),
        Expr::binary(BinaryOp::Multiply, Expr::Number(2), Expr::Number(3)),
    );
    assert_eq!(parse_single("1+2*3"), expected);
    assert_eq!(parse_single("  1 +  2 * 3  "), expected);
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(
        parse_single("1-2-3"),
        Expr::binary(
            BinaryOp::Subtract,
            Expr::binary(BinaryOp::Subtract, Expr::Number(1), Expr::Number(2)),
            Expr::Number(3)
        )
    );
}

#[test]
fn test_mixed_chain_renders_fully_parenthesised() {
    assert_eq!(
        parse_single("a * -b + c / 2 - (d - e)").to_string(),
        "(((a * -b) + (c / 2)) - (d - e))"
    );
}

#[test]
fn test_parse_is_deterministic() {
    let parser = ExpressionParser::default();
    let source = "x, \"a\\u0041\", 3 * (4 + y)";
    assert_eq!(parser.parse(source), parser.parse(source));

    let params = parser.parse(source).unwrap();
    assert_eq!(params[1], Param::Expr(Expr::Str("aA".into())));
}

#[test]
fn test_failure_reports_column_and_expectations() {
    let err = ExpressionParser::default().parse("10, * 2").unwrap_err();
    assert_eq!(err.column, 5);
    assert!(err.to_string().contains("Expected one of the following:"));
    assert!(err.expected.contains(&"number".to_string()));
}
