use serde_json::{Map, Value};

use crate::spec::question::Question;

pub type VisibilityMap = std::collections::BTreeMap<String, bool>;

/// Fallback applied when an expression cannot be decided against the
/// current fact context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityMode {
    Visible,
    Hidden,
}

/// Resolves per-question visibility for a questionnaire snapshot.
///
/// Questions without an `enable_when` expression are always visible;
/// undecidable expressions fall back per `mode` instead of failing.
pub fn resolve_visibility(
    questions: &[Question],
    facts: &Value,
    mode: VisibilityMode,
) -> VisibilityMap {
    let mut map = VisibilityMap::new();
    for question in questions {
        let visible = if let Some(expr) = &question.enable_when {
            match expr.evaluate(facts) {
                Some(value) => value,
                None => matches!(mode, VisibilityMode::Visible),
            }
        } else {
            true
        };
        map.insert(question.id.clone(), visible);
    }
    map
}

/// Derives the characteristic-fact context from per-question answers.
///
/// `answers` maps question id to the respondent's value: a string for radio
/// and text-like questions, an array of strings for checkbox questions.
/// Each defined characteristic becomes a fact: option characteristics become
/// booleans (selected or not), bare characteristics carry the raw answer
/// value through. Unanswered questions contribute no facts, so conditions on
/// them stay undecided rather than defaulting.
pub fn build_fact_context(questions: &[Question], answers: &Value) -> Value {
    let mut facts = Map::new();
    for question in questions {
        let Some(answer) = answers.get(&question.id) else {
            continue;
        };
        if question.options.is_empty() {
            if let Some(token) = &question.characteristic {
                facts.insert(token.clone(), answer.clone());
            }
            continue;
        }
        for option in &question.options {
            if let Some(token) = &option.characteristic {
                facts.insert(token.clone(), Value::Bool(option_selected(answer, &option.value)));
            }
        }
    }
    Value::Object(facts)
}

fn option_selected(answer: &Value, option_value: &str) -> bool {
    match answer {
        Value::String(text) => text == option_value,
        Value::Array(entries) => entries
            .iter()
            .any(|entry| entry.as_str() == Some(option_value)),
        _ => false,
    }
}
