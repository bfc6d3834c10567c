use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Question;

/// Where a characteristic token is defined: the owning question, and the
/// option value when the token belongs to one option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CharacteristicRef {
    pub question_id: String,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_value: Option<String>,
}

/// Characteristic token to defining question/option. A pure function of the
/// question list; rebuild it whenever the question set changes.
pub type CharacteristicMap = BTreeMap<String, CharacteristicRef>;

/// Builds the characteristic lookup for a questionnaire snapshot.
///
/// Options register one entry each (blank tokens skipped); option-less
/// questions register their single bare characteristic. On token collision
/// the first registration wins, so authoring mistakes degrade instead of
/// clobbering earlier definitions.
pub fn build_characteristic_map(questions: &[Question]) -> CharacteristicMap {
    let mut map = CharacteristicMap::new();
    for question in questions {
        if question.options.is_empty() {
            if let Some(token) = &question.characteristic {
                register(&mut map, token, question, None);
            }
        } else {
            for option in &question.options {
                if let Some(token) = &option.characteristic {
                    register(&mut map, token, question, Some(option.value.clone()));
                }
            }
        }
    }
    map
}

fn register(
    map: &mut CharacteristicMap,
    token: &str,
    question: &Question,
    option_value: Option<String>,
) {
    let token = token.trim();
    if token.is_empty() {
        return;
    }
    map.entry(token.to_string()).or_insert_with(|| CharacteristicRef {
        question_id: question.id.clone(),
        question_text: question.question_text.clone(),
        option_value,
    });
}
