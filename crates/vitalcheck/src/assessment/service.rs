use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::catalog::QuestionBank;
use super::domain::{AssessmentId, AssessmentRecord, AssessmentSubmission, Language, UserId};
use super::engine::AssessmentEngine;
use super::repository::{
    AdminNotification, AssessmentRepository, NotificationPublisher, RepositoryError,
};
use super::scoring::ScoringError;

/// Service composing the scoring engine, repository, and back-office notifications.
pub struct AssessmentService<R, N> {
    engine: Arc<AssessmentEngine>,
    repository: Arc<R>,
    notifications: Arc<N>,
    default_language: Language,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

impl<R, N> AssessmentService<R, N>
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(engine: Arc<AssessmentEngine>, repository: Arc<R>, notifications: Arc<N>) -> Self {
        Self {
            engine,
            repository,
            notifications,
            default_language: Language::default(),
        }
    }

    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    pub fn languages(&self) -> [Language; 2] {
        Language::supported()
    }

    pub fn questions(&self, language: Language) -> &QuestionBank {
        self.engine.bank(language)
    }

    /// Score a submission, persist it, and notify the back office.
    pub fn submit(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let AssessmentSubmission {
            user_id,
            answers,
            language,
        } = submission;

        if user_id.0.trim().is_empty() {
            return Err(SubmissionError::MissingUserId.into());
        }
        if answers.is_empty() {
            return Err(SubmissionError::NoAnswers.into());
        }

        let language = language.unwrap_or(self.default_language);
        let result = self.engine.evaluate(language, &answers)?;

        let record = AssessmentRecord {
            id: next_assessment_id(),
            user_id,
            language,
            answers,
            result,
            completed_at: Utc::now(),
        };

        let stored = self.repository.insert(record)?;
        info!(
            assessment_id = %stored.id,
            user_id = %stored.user_id,
            %language,
            overall_score = stored.result.overall_score,
            overall_status = %stored.result.overall_status,
            "assessment scored"
        );

        // Notification failures are logged, never returned.
        if let Err(err) = self
            .notifications
            .publish(AdminNotification::new_assessment(&stored))
        {
            warn!(assessment_id = %stored.id, error = %err, "failed to publish assessment notification");
        }

        Ok(stored)
    }

    pub fn get(&self, id: &AssessmentId) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AssessmentRecord>, AssessmentServiceError> {
        Ok(self.repository.for_user(user_id)?)
    }
}

/// Request-level problems detected before scoring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission is missing a user id")]
    MissingUserId,
    #[error("submission must contain at least one answer")]
    NoAnswers,
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
