//! Enterprise health check: question banks, pillar scoring, recommendation
//! sampling, and the submission workflow built on top of them.
//!
//! Scoring itself is pure; randomness only enters through the recommendation
//! sampler, which takes its random source from the caller.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod import;
pub mod recommendations;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    AnswerOption, BandThresholds, CatalogError, Pillar, Question, QuestionBank, QuestionCatalog,
    RecommendationTiers, ScoringGuide,
};
pub use domain::{
    Answer, AssessmentId, AssessmentRecord, AssessmentResult, AssessmentSubmission,
    AssessmentSummaryView, Language, PillarScore, StatusBand, UserId,
};
pub use engine::AssessmentEngine;
pub use import::{answers_from_path, parse_answers, AnswerImportError};
pub use recommendations::{select_recommendations, DEFAULT_RECOMMENDATION_LIMIT};
pub use repository::{
    AdminNotification, AssessmentRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
pub use router::assessment_router;
pub use scoring::{calculate_scores, ScoringError};
pub use service::{AssessmentService, AssessmentServiceError, SubmissionError};
