use trustqa_spec::characteristics::build_characteristic_map;
use trustqa_spec::enable_when::{Connective, parse_enable_when};
use trustqa_spec::rows::{RawRow, assemble_questions};
use trustqa_spec::translate::{TranslatedCondition, translate_enable_when};

fn row(id: &str, question: &str, option: &str, characteristic: &str) -> RawRow {
    RawRow {
        id: id.to_string(),
        section: "Demographics".to_string(),
        page: "Page 1".to_string(),
        item_type: "radio".to_string(),
        question: question.to_string(),
        option: option.to_string(),
        characteristic: characteristic.to_string(),
        ..RawRow::default()
    }
}

#[test]
fn unknown_token_falls_back_to_raw() {
    let map = build_characteristic_map(&[]);
    let expr = parse_enable_when("(ghost_token=true)").unwrap();

    let translated = translate_enable_when(&expr, &map);

    assert_eq!(translated.conditions.len(), 1);
    assert!(translated.conditions[0].is_raw());
    assert_eq!(translated.summary, "shown when 'ghost_token'");
}

#[test]
fn resolved_option_condition_reads_as_is_answered() {
    // Detailed upload end to end: rows, assembly, map, then translation.
    let rows = vec![
        row("Q001", "What is your sex?", "Male", "patient_is_male"),
        row("Q001", "", "Female", ""),
        {
            let mut r = row("Q002", "Are you pregnant?", "Yes", "");
            r.item_type = "radio".to_string();
            r.enable_when = "(patient_is_male=false)".to_string();
            r
        },
    ];
    let questions = assemble_questions(&rows);
    let map = build_characteristic_map(&questions);

    let expr = questions[1].enable_when.as_ref().unwrap();
    let translated = translate_enable_when(expr, &map);

    match &translated.conditions[0] {
        TranslatedCondition::Resolved {
            question_text,
            option_text,
            ..
        } => {
            assert_eq!(question_text, "What is your sex?");
            assert_eq!(option_text.as_deref(), Some("Male"));
        }
        TranslatedCondition::Raw { .. } => panic!("token should resolve"),
    }
    assert_eq!(
        translated.summary,
        "shown when 'What is your sex?' is not answered 'Male'"
    );
}

#[test]
fn eq_true_reads_as_is_answered() {
    let questions = assemble_questions(&[row(
        "Q001",
        "What is your sex?",
        "Male",
        "patient_is_male",
    )]);
    let map = build_characteristic_map(&questions);
    let expr = parse_enable_when("(patient_is_male=true)").unwrap();

    let translated = translate_enable_when(&expr, &map);

    assert_eq!(
        translated.summary,
        "shown when 'What is your sex?' is answered 'Male'"
    );
}

#[test]
fn non_equality_comparisons_render_symbolically() {
    let mut age = row("Q005", "What is your age?", "", "patient_age");
    age.item_type = "age".to_string();
    let questions = assemble_questions(&[age]);
    let map = build_characteristic_map(&questions);
    let expr = parse_enable_when("(patient_age<16)").unwrap();

    let translated = translate_enable_when(&expr, &map);

    assert_eq!(translated.summary, "shown when 'What is your age?' < 16");
}

#[test]
fn or_expressions_join_clauses_with_or() {
    let mut age = row("Q005", "What is your age?", "", "patient_age");
    age.item_type = "age".to_string();
    let questions = assemble_questions(&[age]);
    let map = build_characteristic_map(&questions);
    let expr = parse_enable_when("(patient_age<5) OR (patient_age>80)").unwrap();

    let translated = translate_enable_when(&expr, &map);

    assert_eq!(translated.logic, Some(Connective::Or));
    assert_eq!(
        translated.summary,
        "shown when 'What is your age?' < 5 or 'What is your age?' > 80"
    );
}
