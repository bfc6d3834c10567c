use std::io::Read;

use serde::Deserialize;
use thiserror::Error;

use trustqa_spec::rows::RawRow;
use trustqa_spec::spec::question::{ItemType, Question, QuestionOption};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read csv input: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads a detailed-shape upload into raw rows for question assembly.
///
/// Unreadable records are logged and skipped; the tolerant row grouping and
/// the later batch validation decide what the data is worth.
pub fn read_detailed_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<RawRow>() {
        match record {
            Ok(row) => rows.push(row),
            Err(error) => {
                tracing::warn!(%error, "skipping unreadable csv record");
            }
        }
    }
    Ok(rows)
}

/// One record of the simple upload shape: one row per question, pipe-joined
/// options.
#[derive(Debug, Deserialize)]
struct SimpleRow {
    #[serde(rename = "Question_ID", default)]
    id: String,
    #[serde(rename = "Category", default)]
    category: String,
    #[serde(rename = "Question_Text", default)]
    question_text: String,
    #[serde(rename = "Answer_Type", default)]
    answer_type: String,
    #[serde(rename = "Answer_Options", default)]
    answer_options: String,
}

/// Reads a simple-shape upload directly into questions.
///
/// The category doubles as section and page. Rows with an unknown answer
/// type are logged and skipped.
pub fn read_simple_questions<R: Read>(reader: R) -> Result<Vec<Question>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut questions = Vec::new();
    for record in csv_reader.deserialize::<SimpleRow>() {
        let row = match record {
            Ok(row) => row,
            Err(error) => {
                tracing::warn!(%error, "skipping unreadable csv record");
                continue;
            }
        };
        let Some(item_type) = simple_item_type(&row.answer_type) else {
            tracing::warn!(
                question_id = %row.id,
                answer_type = %row.answer_type,
                "skipping question with unknown answer type"
            );
            continue;
        };

        let options: Vec<QuestionOption> = row
            .answer_options
            .split('|')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| QuestionOption {
                value: value.to_string(),
                characteristic: None,
            })
            .collect();

        questions.push(Question {
            id: row.id.trim().to_string(),
            section: row.category.trim().to_string(),
            page: row.category.trim().to_string(),
            item_type: Some(item_type),
            question_text: row.question_text.trim().to_string(),
            options,
            characteristic: None,
            required: false,
            enable_when: None,
            has_helper: false,
            helper_type: None,
            helper_name: None,
            helper_value: None,
        });
    }
    Ok(questions)
}

fn simple_item_type(raw: &str) -> Option<ItemType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "text" => Some(ItemType::TextField),
        "radio" => Some(ItemType::Radio),
        "multi_select" => Some(ItemType::Checkbox),
        _ => None,
    }
}
