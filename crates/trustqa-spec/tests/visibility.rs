use serde_json::json;

use trustqa_spec::enable_when::parse_enable_when;
use trustqa_spec::spec::question::{ItemType, Question, QuestionOption};
use trustqa_spec::visibility::{VisibilityMode, build_fact_context, resolve_visibility};

fn question(id: &str, enable_when: &str) -> Question {
    Question {
        id: id.to_string(),
        section: "General".to_string(),
        page: "Page 1".to_string(),
        item_type: Some(ItemType::TextField),
        question_text: format!("Question {id}"),
        options: Vec::new(),
        characteristic: None,
        required: false,
        enable_when: parse_enable_when(enable_when),
        has_helper: false,
        helper_type: None,
        helper_name: None,
        helper_value: None,
    }
}

#[test]
fn questions_without_an_expression_are_always_visible() {
    let questions = vec![question("Q1", "")];

    let map = resolve_visibility(&questions, &json!({}), VisibilityMode::Hidden);

    assert_eq!(map["Q1"], true);
}

#[test]
fn decided_expressions_ignore_the_fallback_mode() {
    let questions = vec![question("Q1", "(flag=true)")];
    let facts = json!({"flag": false});

    let visible = resolve_visibility(&questions, &facts, VisibilityMode::Visible);
    let hidden = resolve_visibility(&questions, &facts, VisibilityMode::Hidden);

    assert_eq!(visible["Q1"], false);
    assert_eq!(hidden["Q1"], false);
}

#[test]
fn undecided_expressions_fall_back_per_mode() {
    let questions = vec![question("Q1", "(flag=true)")];
    let facts = json!({});

    assert_eq!(
        resolve_visibility(&questions, &facts, VisibilityMode::Visible)["Q1"],
        true
    );
    assert_eq!(
        resolve_visibility(&questions, &facts, VisibilityMode::Hidden)["Q1"],
        false
    );
}

#[test]
fn fact_context_booleanises_option_characteristics() {
    let mut sex = question("Q001", "");
    sex.item_type = Some(ItemType::Radio);
    sex.options = vec![
        QuestionOption {
            value: "Male".to_string(),
            characteristic: Some("patient_is_male".to_string()),
        },
        QuestionOption {
            value: "Female".to_string(),
            characteristic: Some("patient_is_female".to_string()),
        },
    ];

    let facts = build_fact_context(&[sex], &json!({"Q001": "Male"}));

    assert_eq!(facts["patient_is_male"], json!(true));
    assert_eq!(facts["patient_is_female"], json!(false));
}

#[test]
fn checkbox_answers_match_any_selected_entry() {
    let mut allergies = question("Q002", "");
    allergies.item_type = Some(ItemType::Checkbox);
    allergies.options = vec![
        QuestionOption {
            value: "Nuts".to_string(),
            characteristic: Some("allergic_nuts".to_string()),
        },
        QuestionOption {
            value: "Latex".to_string(),
            characteristic: Some("allergic_latex".to_string()),
        },
    ];

    let facts = build_fact_context(&[allergies], &json!({"Q002": ["Latex"]}));

    assert_eq!(facts["allergic_nuts"], json!(false));
    assert_eq!(facts["allergic_latex"], json!(true));
}

#[test]
fn bare_characteristics_carry_the_answer_through() {
    let mut age = question("Q005", "");
    age.item_type = Some(ItemType::Age);
    age.characteristic = Some("patient_age".to_string());

    let facts = build_fact_context(&[age], &json!({"Q005": "34"}));

    assert_eq!(facts["patient_age"], json!("34"));
}

#[test]
fn unanswered_questions_contribute_no_facts() {
    let mut age = question("Q005", "");
    age.characteristic = Some("patient_age".to_string());

    let facts = build_fact_context(&[age], &json!({}));

    assert_eq!(facts, json!({}));
}

#[test]
fn context_and_visibility_compose_end_to_end() {
    let mut sex = question("Q001", "");
    sex.item_type = Some(ItemType::Radio);
    sex.options = vec![
        QuestionOption {
            value: "Male".to_string(),
            characteristic: Some("patient_is_male".to_string()),
        },
        QuestionOption {
            value: "Female".to_string(),
            characteristic: None,
        },
    ];
    let pregnancy = question("Q002", "(patient_is_male=false)");
    let questions = vec![sex, pregnancy];

    let facts = build_fact_context(&questions, &json!({"Q001": "Female"}));
    let map = resolve_visibility(&questions, &facts, VisibilityMode::Hidden);

    assert_eq!(map["Q002"], true);
}
