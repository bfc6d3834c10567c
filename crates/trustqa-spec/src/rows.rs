use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enable_when::parse_enable_when;
use crate::spec::question::{ItemType, Question, QuestionOption};

/// One raw record from a detailed-shape upload. Field names mirror the CSV
/// headers so records deserialize straight out of the reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Section", default)]
    pub section: String,
    #[serde(rename = "Page", default)]
    pub page: String,
    #[serde(rename = "ItemType", default)]
    pub item_type: String,
    #[serde(rename = "Question", default)]
    pub question: String,
    #[serde(rename = "Option", default)]
    pub option: String,
    #[serde(rename = "Characteristic", default)]
    pub characteristic: String,
    #[serde(rename = "Required", default)]
    pub required: String,
    #[serde(rename = "EnableWhen", default)]
    pub enable_when: String,
    #[serde(rename = "HasHelper", default)]
    pub has_helper: String,
    #[serde(rename = "HelperType", default)]
    pub helper_type: String,
    #[serde(rename = "HelperName", default)]
    pub helper_name: String,
    #[serde(rename = "HelperValue", default)]
    pub helper_value: String,
}

/// Groups raw rows sharing an `Id` into logical questions.
///
/// Rows with a blank id are dropped silently. Distinct ids keep first-seen
/// order, options keep row order within a group, and question-level fields
/// come from the first row of each group. Malformed data never fails here;
/// it surfaces later in batch validation.
pub fn assemble_questions(rows: &[RawRow]) -> Vec<Question> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&RawRow>> = HashMap::new();

    for row in rows {
        let id = row.id.trim();
        if id.is_empty() {
            continue;
        }
        groups
            .entry(id)
            .or_insert_with(|| {
                order.push(id);
                Vec::new()
            })
            .push(row);
    }

    order
        .iter()
        .filter_map(|id| groups.get(id).map(|group| build_question(id, group)))
        .collect()
}

fn build_question(id: &str, rows: &[&RawRow]) -> Question {
    let first = rows[0];

    let options: Vec<QuestionOption> = rows
        .iter()
        .filter(|row| !row.option.trim().is_empty())
        .map(|row| QuestionOption {
            value: row.option.trim().to_string(),
            characteristic: non_empty(&row.characteristic),
        })
        .collect();

    // A group with exactly one option-less row is a single-characteristic,
    // non-option question; that row carries the question's characteristic.
    let blank_option_rows: Vec<&&RawRow> = rows
        .iter()
        .filter(|row| row.option.trim().is_empty())
        .collect();
    let characteristic = if blank_option_rows.len() == 1 {
        non_empty(&blank_option_rows[0].characteristic)
    } else {
        None
    };

    Question {
        id: id.to_string(),
        section: first.section.trim().to_string(),
        page: first.page.trim().to_string(),
        item_type: ItemType::parse(&first.item_type),
        question_text: first.question.trim().to_string(),
        options,
        characteristic,
        required: is_true(&first.required),
        enable_when: parse_enable_when(&first.enable_when),
        has_helper: is_true(&first.has_helper),
        helper_type: non_empty(&first.helper_type),
        helper_name: non_empty(&first.helper_name),
        helper_value: non_empty(&first.helper_value),
    }
}

fn is_true(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
