//! # Expression Tests

use super::*;
use crate::feature::{Geometry, SimpleFeature};
use glam::DVec3;

fn building() -> SimpleFeature {
    SimpleFeature::new(
        7,
        Geometry::polygon(vec![
            DVec3::new(0.0, 0.0, 12.0),
            DVec3::new(1.0, 0.0, 14.0),
            DVec3::new(1.0, 1.0, 13.0),
        ]),
    )
    .with_attribute("levels", 4.0)
    .with_attribute("height", "21.5")
    .with_attribute("kind", "office")
}

fn eval(source: &str) -> Result<f64, ExpressionError> {
    NumericExpression::parse(source)?.eval(&building())
}

// =============================================================================
// NUMERIC
// =============================================================================

#[test]
fn test_numbers_and_precedence() {
    assert_eq!(eval("42").unwrap(), 42.0);
    assert_eq!(eval("1 + 2 * 3").unwrap(), 7.0);
    assert_eq!(eval("(1 + 2) * 3").unwrap(), 9.0);
    assert_eq!(eval("10 - 4 - 3").unwrap(), 3.0);
    assert_eq!(eval("12 / 4 / 3").unwrap(), 1.0);
    assert_eq!(eval(".5 * 4").unwrap(), 2.0);
}

#[test]
fn test_unary_minus() {
    assert_eq!(eval("-3").unwrap(), -3.0);
    assert_eq!(eval("2 * -3").unwrap(), -6.0);
    assert_eq!(eval("--3").unwrap(), 3.0);
    assert_eq!(eval("-(1 + 1)").unwrap(), -2.0);
}

#[test]
fn test_attributes() {
    assert_eq!(eval("[levels] * 3").unwrap(), 12.0);
    assert_eq!(eval("[ height ]").unwrap(), 21.5);
    assert_eq!(eval("[__max_z]").unwrap(), 14.0);
    assert_eq!(NumericExpression::max_z().eval(&building()).unwrap(), 14.0);
}

#[test]
fn test_attribute_errors() {
    assert_eq!(
        eval("[floors]"),
        Err(ExpressionError::UnknownAttribute("floors".into()))
    );
    assert!(matches!(
        eval("[kind] + 1"),
        Err(ExpressionError::NotNumeric { .. })
    ));
    assert_eq!(eval("1 / 0"), Err(ExpressionError::DivisionByZero));
}

#[test]
fn test_parse_errors() {
    for bad in ["", "1 +", "(1 + 2", "[levels", "[]", "3 4", "1..2", "abc"] {
        assert!(
            matches!(NumericExpression::parse(bad), Err(ExpressionError::Parse { .. })),
            "expected parse error for {bad:?}"
        );
    }
}

#[test]
fn test_source_round_trips_through_serde() {
    let expr: NumericExpression = serde_json::from_str("\"[levels] * 3.5\"").unwrap();
    assert_eq!(expr.source(), "[levels] * 3.5");
    assert_eq!(serde_json::to_string(&expr).unwrap(), "\"[levels] * 3.5\"");
    assert!(serde_json::from_str::<NumericExpression>("\"1 +\"").is_err());
}

#[test]
fn test_feature_eval_delegates() {
    let feature = building();
    let expr = NumericExpression::parse("[levels] + 1").unwrap();
    assert_eq!(feature.eval(&expr).unwrap(), 5.0);
}

// =============================================================================
// STRING
// =============================================================================

#[test]
fn test_string_template() {
    let expr = StringExpression::parse("[kind] #[levels] ([missing])").unwrap();
    assert_eq!(expr.eval(&building()), "office #4 ()");
}

#[test]
fn test_string_literal_only() {
    let expr = StringExpression::parse("plain").unwrap();
    assert_eq!(expr.eval(&building()), "plain");
    assert_eq!(expr.source(), "plain");
}

#[test]
fn test_string_unclosed_placeholder() {
    assert!(StringExpression::parse("name [id").is_err());
}
