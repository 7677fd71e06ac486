use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AssessmentId, AssessmentRecord, StatusBand, UserId};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    /// Records for one user, newest first.
    fn for_user(&self, user_id: &UserId) -> Result<Vec<AssessmentRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for back-office notifications (admin inbox, push, e-mail).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: AdminNotification) -> Result<(), NotificationError>;
}

/// Notice raised for the back office whenever an assessment is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotification {
    pub kind: String,
    pub title: String,
    pub message: String,
    pub user_id: UserId,
    pub assessment_id: AssessmentId,
    pub overall_score: u8,
    pub overall_status: StatusBand,
    pub completed_at: DateTime<Utc>,
}

impl AdminNotification {
    pub const NEW_ASSESSMENT: &'static str = "new_assessment";

    pub fn new_assessment(record: &AssessmentRecord) -> Self {
        Self {
            kind: Self::NEW_ASSESSMENT.to_string(),
            title: "New assessment completed".to_string(),
            message: format!(
                "User {} completed an assessment scoring {} ({})",
                record.user_id,
                record.result.overall_score,
                record.result.overall_status.label()
            ),
            user_id: record.user_id.clone(),
            assessment_id: record.id.clone(),
            overall_score: record.result.overall_score,
            overall_status: record.result.overall_status,
            completed_at: record.completed_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
