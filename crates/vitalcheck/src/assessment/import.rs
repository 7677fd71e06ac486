use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::Answer;

/// Failure while reading a `question_id,answer` CSV export.
#[derive(Debug, thiserror::Error)]
pub enum AnswerImportError {
    #[error("failed to read answers file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid answers CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: question id is empty")]
    MissingQuestionId { row: usize },
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    #[serde(alias = "questionId")]
    question_id: String,
    answer: i32,
}

pub fn parse_answers<R: Read>(reader: R) -> Result<Vec<Answer>, AnswerImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut answers = Vec::new();

    for (index, record) in csv_reader.deserialize::<AnswerRow>().enumerate() {
        let row = record?;
        if row.question_id.is_empty() {
            // +2: one for the header, one for 1-based numbering.
            return Err(AnswerImportError::MissingQuestionId { row: index + 2 });
        }
        answers.push(Answer::new(row.question_id, row.answer));
    }

    Ok(answers)
}

pub fn answers_from_path(path: impl AsRef<Path>) -> Result<Vec<Answer>, AnswerImportError> {
    let file = File::open(path)?;
    parse_answers(file)
}
