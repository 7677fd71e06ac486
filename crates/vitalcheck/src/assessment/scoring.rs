use std::collections::{HashMap, HashSet};

use super::catalog::QuestionBank;
use super::domain::{
    Answer, AssessmentResult, PillarScore, StatusBand, MAX_ANSWER_SCORE, MIN_ANSWER_SCORE,
};

/// Multiplier lifting a 0..=3 answer average onto the 0..=100 scale.
const SCORE_SCALE: f64 = 25.0;

/// Validation and alignment failures raised while scoring a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("answer {value} for question '{question_id}' is outside 0..=3")]
    InvalidAnswerRange { question_id: String, value: i32 },
    #[error("question '{question_id}' was answered more than once")]
    DuplicateAnswer { question_id: String },
    #[error("received {found} pillar scores for a bank of {expected} pillars")]
    MismatchedPillarCount { expected: usize, found: usize },
    #[error("pillar '{0}' is not part of the question bank")]
    UnknownPillar(String),
    #[error("pillar '{0}' was scored more than once")]
    DuplicatePillarScore(String),
}

/// Score every pillar of `bank` from `answers` and derive the overall result.
///
/// Unanswered questions are left out of their pillar's average; a pillar with
/// no answers scores 0. Answers naming questions outside the bank are ignored
/// before any range or duplicate check.
pub fn calculate_scores(
    answers: &[Answer],
    bank: &QuestionBank,
) -> Result<AssessmentResult, ScoringError> {
    let by_question = index_answers(answers, bank)?;

    let mut pillar_scores = Vec::with_capacity(bank.pillars.len());
    let mut total: u32 = 0;

    for pillar in &bank.pillars {
        let mut pillar_total: i32 = 0;
        let mut question_count: u32 = 0;

        for question in &pillar.questions {
            if let Some(value) = by_question.get(question.id.as_str()) {
                pillar_total += *value;
                question_count += 1;
            }
        }

        let score = if question_count > 0 {
            scale_score(f64::from(pillar_total) / f64::from(question_count) * SCORE_SCALE)
        } else {
            0
        };
        total += u32::from(score);

        pillar_scores.push(PillarScore {
            pillar_id: pillar.id.clone(),
            pillar_name: pillar.name.clone(),
            score,
            status: StatusBand::from_score(score),
            recommendations: Vec::new(),
        });
    }

    let overall_score = if pillar_scores.is_empty() {
        0
    } else {
        scale_score(f64::from(total) / pillar_scores.len() as f64)
    };

    Ok(AssessmentResult {
        pillar_scores,
        overall_score,
        overall_status: StatusBand::from_score(overall_score),
    })
}

fn index_answers<'a>(
    answers: &'a [Answer],
    bank: &QuestionBank,
) -> Result<HashMap<&'a str, i32>, ScoringError> {
    let known: HashSet<&str> = bank
        .pillars
        .iter()
        .flat_map(|pillar| pillar.questions.iter())
        .map(|question| question.id.as_str())
        .collect();

    let mut by_question = HashMap::with_capacity(answers.len());
    let mut ignored = 0usize;
    for answer in answers {
        if !known.contains(answer.question_id.as_str()) {
            ignored += 1;
            continue;
        }
        if !(MIN_ANSWER_SCORE..=MAX_ANSWER_SCORE).contains(&answer.answer) {
            return Err(ScoringError::InvalidAnswerRange {
                question_id: answer.question_id.clone(),
                value: answer.answer,
            });
        }
        if by_question
            .insert(answer.question_id.as_str(), answer.answer)
            .is_some()
        {
            return Err(ScoringError::DuplicateAnswer {
                question_id: answer.question_id.clone(),
            });
        }
    }

    if ignored > 0 {
        tracing::debug!(ignored, "answers reference questions outside the bank");
    }
    Ok(by_question)
}

/// Round half up, then clamp onto the 0..=100 score scale.
pub(crate) fn scale_score(value: f64) -> u8 {
    (value + 0.5).floor().clamp(0.0, 100.0) as u8
}
