use serde_json::json;

use trustqa_spec::enable_when::{Comparator, Connective, parse_enable_when};

#[test]
fn blank_input_parses_to_none() {
    assert_eq!(parse_enable_when(""), None);
    assert_eq!(parse_enable_when("   "), None);
}

#[test]
fn single_condition_has_no_logic() {
    let expr = parse_enable_when("(patient_is_male=true)").unwrap();

    assert_eq!(expr.logic, None);
    assert_eq!(expr.conditions.len(), 1);
    let condition = &expr.conditions[0];
    assert_eq!(condition.characteristic, "patient_is_male");
    assert_eq!(condition.comparator, Comparator::Eq);
    assert_eq!(condition.value, "true");
}

#[test]
fn spaced_connective_is_recognised() {
    let expr = parse_enable_when("(patient_age>=5) AND (patient_age<=12)").unwrap();

    assert_eq!(expr.logic, Some(Connective::And));
    assert_eq!(expr.conditions.len(), 2);
    assert_eq!(expr.conditions[0].comparator, Comparator::Gte);
    assert_eq!(expr.conditions[1].comparator, Comparator::Lte);
}

#[test]
fn concatenated_connective_is_recognised() {
    let expr = parse_enable_when("(a=1)OR(b=2)").unwrap();

    assert_eq!(expr.logic, Some(Connective::Or));
    assert_eq!(expr.conditions.len(), 2);
}

#[test]
fn connective_is_case_insensitive() {
    let expr = parse_enable_when("(a=1) or (b=2)").unwrap();

    assert_eq!(expr.logic, Some(Connective::Or));
}

#[test]
fn operatorless_group_is_skipped_but_logic_is_kept() {
    let expr = parse_enable_when("(patient_age<16) AND(patient_ageexistsnull)").unwrap();

    assert_eq!(expr.logic, Some(Connective::And));
    assert_eq!(expr.conditions.len(), 1);
    assert_eq!(expr.conditions[0].characteristic, "patient_age");
    assert_eq!(expr.conditions[0].comparator, Comparator::Lt);
    assert_eq!(expr.conditions[0].value, "16");
}

#[test]
fn first_connective_wins_on_mixed_expressions() {
    let expr = parse_enable_when("(a=1) AND (b=2) OR (c=3)").unwrap();

    assert_eq!(expr.logic, Some(Connective::And));
    assert_eq!(expr.conditions.len(), 3);
}

#[test]
fn expression_with_no_parseable_group_is_none() {
    assert_eq!(parse_enable_when("(no operator here)"), None);
    assert_eq!(parse_enable_when("free text without parens"), None);
    assert_eq!(parse_enable_when("(=value)"), None);
}

#[test]
fn longest_operator_wins_inside_a_group() {
    let expr = parse_enable_when("(score<=10)").unwrap();

    assert_eq!(expr.conditions[0].comparator, Comparator::Lte);
    assert_eq!(expr.conditions[0].value, "10");
}

#[test]
fn evaluates_boolean_equality_with_coercion() {
    let expr = parse_enable_when("(patient_is_male=true)").unwrap();

    assert_eq!(expr.evaluate(&json!({"patient_is_male": true})), Some(true));
    assert_eq!(expr.evaluate(&json!({"patient_is_male": false})), Some(false));
}

#[test]
fn missing_characteristic_is_undecided() {
    let expr = parse_enable_when("(patient_is_male=true)").unwrap();

    assert_eq!(expr.evaluate(&json!({})), None);
}

#[test]
fn and_is_conjunctive_and_short_circuits_on_false() {
    let expr = parse_enable_when("(a=1) AND (b=2)").unwrap();

    assert_eq!(expr.evaluate(&json!({"a": 1, "b": 2})), Some(true));
    // b never needs to be present once a is false.
    assert_eq!(expr.evaluate(&json!({"a": 9})), Some(false));
    // a true, b missing: undecided.
    assert_eq!(expr.evaluate(&json!({"a": 1})), None);
}

#[test]
fn or_short_circuits_on_true() {
    let expr = parse_enable_when("(a=1) OR (b=2)").unwrap();

    assert_eq!(expr.evaluate(&json!({"b": 2})), Some(true));
    assert_eq!(expr.evaluate(&json!({"a": 0, "b": 0})), Some(false));
    assert_eq!(expr.evaluate(&json!({"a": 0})), None);
}

#[test]
fn numeric_comparison_works_on_string_facts() {
    let expr = parse_enable_when("(patient_age<16)").unwrap();

    assert_eq!(expr.evaluate(&json!({"patient_age": "9"})), Some(true));
    assert_eq!(expr.evaluate(&json!({"patient_age": "30"})), Some(false));
    assert_eq!(expr.evaluate(&json!({"patient_age": 15.5})), Some(true));
}

#[test]
fn incomparable_operands_are_undecided() {
    let expr = parse_enable_when("(patient_age<16)").unwrap();

    assert_eq!(expr.evaluate(&json!({"patient_age": true})), None);
}

#[test]
fn null_fact_equals_false() {
    let expr = parse_enable_when("(flag=false)").unwrap();

    assert_eq!(expr.evaluate(&json!({"flag": null})), Some(true));
}
