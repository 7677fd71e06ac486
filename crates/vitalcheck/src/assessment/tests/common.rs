use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

use crate::assessment::catalog::{
    AnswerOption, Pillar, Question, QuestionBank, QuestionCatalog, RecommendationTiers,
};
use crate::assessment::domain::{
    Answer, AssessmentId, AssessmentRecord, AssessmentSubmission, Language, UserId,
};
use crate::assessment::engine::AssessmentEngine;
use crate::assessment::repository::{
    AdminNotification, AssessmentRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
use crate::assessment::{assessment_router, AssessmentService};

pub(super) const SEED: u64 = 7;

pub(super) fn catalog() -> QuestionCatalog {
    QuestionCatalog::bundled().expect("bundled banks are valid")
}

pub(super) fn english_bank() -> QuestionBank {
    catalog().bank(Language::En).clone()
}

pub(super) fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

pub(super) fn engine() -> AssessmentEngine {
    AssessmentEngine::with_rng(catalog(), 3, seeded_rng())
}

fn question(id: &str) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Question {id}"),
        options: (0..=3)
            .map(|score| AnswerOption {
                label: format!("Option {score}"),
                score,
            })
            .collect(),
    }
}

fn tiers(prefix: &str, red: usize, amber: usize, green: usize) -> RecommendationTiers {
    let tier = |band: &str, count: usize| -> Vec<String> {
        (1..=count)
            .map(|index| format!("{prefix} {band} advice {index}"))
            .collect()
    };
    RecommendationTiers {
        red: tier("red", red),
        amber: tier("amber", amber),
        green: tier("green", green),
    }
}

/// Pillar `id` with `questions` questions named `<id>-1..=<id>-n`.
pub(super) fn pillar(id: &str, questions: usize) -> Pillar {
    Pillar {
        id: id.to_string(),
        name: format!("Pillar {id}"),
        questions: (1..=questions)
            .map(|index| question(&format!("{id}-{index}")))
            .collect(),
        recommendations: tiers(id, 3, 3, 3),
    }
}

pub(super) fn bank(pillars: Vec<Pillar>) -> QuestionBank {
    QuestionBank {
        pillars,
        scoring: None,
    }
}

/// Bank of `count` single-question pillars `p0..`, answered via `p<i>-1`.
pub(super) fn single_question_bank(count: usize) -> QuestionBank {
    bank((0..count).map(|index| pillar(&format!("p{index}"), 1)).collect())
}

/// Answers for `single_question_bank`, one value per pillar in order.
pub(super) fn single_question_answers(values: &[i32]) -> Vec<Answer> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Answer::new(format!("p{index}-1"), *value))
        .collect()
}

pub(super) fn pillar_answers(pillar_id: &str, values: &[i32]) -> Vec<Answer> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| Answer::new(format!("{pillar_id}-{}", index + 1), *value))
        .collect()
}

pub(super) fn bank_with_tier_sizes(red: usize, amber: usize, green: usize) -> QuestionBank {
    let mut pillar = pillar("finance", 2);
    pillar.recommendations = tiers("finance", red, amber, green);
    bank(vec![pillar])
}

pub(super) fn submission(user: &str) -> AssessmentSubmission {
    AssessmentSubmission {
        user_id: UserId(user.to_string()),
        answers: vec![
            Answer::new("f1", 3),
            Answer::new("f2", 3),
            Answer::new("o1", 1),
            Answer::new("o2", 2),
            Answer::new("t1", 2),
        ],
        language: Some(Language::En),
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = AssessmentService::new(
        Arc::new(engine()),
        repository.clone(),
        notifications.clone(),
    );
    (service, repository, notifications)
}

pub(super) fn service_with<R, N>(repository: R, notifications: N) -> AssessmentService<R, N>
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    AssessmentService::new(
        Arc::new(engine()),
        Arc::new(repository),
        Arc::new(notifications),
    )
}

pub(super) fn router_with_service(
    service: AssessmentService<MemoryRepository, MemoryNotifications>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_user(&self, user_id: &UserId) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<AssessmentRecord> = guard
            .values()
            .filter(|record| &record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<AdminNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<AdminNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: AdminNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifications;

impl NotificationPublisher for OfflineNotifications {
    fn publish(&self, _notification: AdminNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("push gateway offline".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl AssessmentRepository for ConflictRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Ok(None)
    }

    fn for_user(&self, _user_id: &UserId) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_user(&self, _user_id: &UserId) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
