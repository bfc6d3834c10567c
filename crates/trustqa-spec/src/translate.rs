use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::characteristics::CharacteristicMap;
use crate::enable_when::{Comparator, Condition, Connective, EnableWhenExpression};

/// One condition rendered for presentation: either resolved against the
/// characteristic map, or a raw fallback when the token is unknown to the
/// current snapshot (cross-import drift must still render something).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranslatedCondition {
    Resolved {
        question_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        option_text: Option<String>,
        comparator: Comparator,
        value: String,
    },
    Raw {
        readable: String,
    },
}

impl TranslatedCondition {
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw { .. })
    }
}

/// Presentation-ready derivation of an expression. Recomputed whenever the
/// characteristic map or the owning question's expression changes; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TranslatedEnableWhen {
    pub conditions: Vec<TranslatedCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<Connective>,
    pub summary: String,
}

/// Translates a parsed expression into UI-renderable form. Pure; resolution
/// misses degrade to raw fallbacks and never fail.
pub fn translate_enable_when(
    expr: &EnableWhenExpression,
    characteristics: &CharacteristicMap,
) -> TranslatedEnableWhen {
    let conditions: Vec<TranslatedCondition> = expr
        .conditions
        .iter()
        .map(|condition| translate_condition(condition, characteristics))
        .collect();

    let connective_word = match expr.logic {
        Some(Connective::Or) => " or ",
        _ => " and ",
    };
    let clauses: Vec<String> = conditions.iter().map(condition_clause).collect();
    let summary = format!("shown when {}", clauses.join(connective_word));

    TranslatedEnableWhen {
        conditions,
        logic: expr.logic,
        summary,
    }
}

fn translate_condition(
    condition: &Condition,
    characteristics: &CharacteristicMap,
) -> TranslatedCondition {
    match characteristics.get(&condition.characteristic) {
        Some(reference) => TranslatedCondition::Resolved {
            question_text: reference.question_text.clone(),
            option_text: reference.option_value.clone(),
            comparator: condition.comparator,
            value: condition.value.clone(),
        },
        None => TranslatedCondition::Raw {
            readable: condition.characteristic.clone(),
        },
    }
}

fn condition_clause(condition: &TranslatedCondition) -> String {
    match condition {
        TranslatedCondition::Raw { readable } => format!("'{}'", readable),
        TranslatedCondition::Resolved {
            question_text,
            option_text,
            comparator,
            value,
        } => {
            if *comparator == Comparator::Eq && value.eq_ignore_ascii_case("true") {
                match option_text {
                    Some(option) => format!("'{}' is answered '{}'", question_text, option),
                    None => format!("'{}' is answered", question_text),
                }
            } else if *comparator == Comparator::Eq && value.eq_ignore_ascii_case("false") {
                match option_text {
                    Some(option) => format!("'{}' is not answered '{}'", question_text, option),
                    None => format!("'{}' is not answered", question_text),
                }
            } else {
                match option_text {
                    Some(option) => format!(
                        "'{}' ('{}') {} {}",
                        question_text,
                        option,
                        comparator.as_symbol(),
                        value
                    ),
                    None => {
                        format!("'{}' {} {}", question_text, comparator.as_symbol(), value)
                    }
                }
            }
        }
    }
}
