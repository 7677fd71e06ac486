use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;
use vitalcheck::assessment::{
    AdminNotification, AssessmentId, AssessmentRecord, AssessmentRepository, CatalogError,
    Language, NotificationError, NotificationPublisher, QuestionCatalog, RepositoryError, UserId,
};
use vitalcheck::config::AssessmentConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
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

/// Keeps back-office notices in memory and mirrors them to the log.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<AdminNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: AdminNotification) -> Result<(), NotificationError> {
        info!(
            kind = %notification.kind,
            assessment_id = %notification.assessment_id,
            user_id = %notification.user_id,
            "{}",
            notification.title
        );
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<AdminNotification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

/// Bundled banks, with per-language overrides when a directory is configured.
pub(crate) fn load_catalog(config: &AssessmentConfig) -> Result<QuestionCatalog, CatalogError> {
    match &config.question_bank_dir {
        Some(dir) => QuestionCatalog::from_dir(dir),
        None => QuestionCatalog::bundled(),
    }
}

pub(crate) fn parse_language(raw: &str) -> Result<Language, String> {
    Language::from_code(raw).ok_or_else(|| {
        let supported: Vec<&str> = Language::supported()
            .iter()
            .map(|language| language.code())
            .collect();
        format!(
            "unsupported language '{raw}' (expected one of: {})",
            supported.join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_language_is_case_insensitive() {
        assert_eq!(parse_language(" FR "), Ok(Language::Fr));
        assert_eq!(parse_language("en"), Ok(Language::En));
    }

    #[test]
    fn load_catalog_defaults_to_bundled_banks() {
        let catalog = load_catalog(&AssessmentConfig::default()).expect("bundled banks load");
        assert_eq!(catalog.bank(Language::En).pillars.len(), 9);
        assert_eq!(catalog.bank(Language::Fr).pillars.len(), 6);
    }

    #[test]
    fn load_catalog_reports_missing_override_dir() {
        let config = AssessmentConfig {
            question_bank_dir: Some("/nonexistent/vitalcheck/questions".into()),
            ..AssessmentConfig::default()
        };
        assert!(matches!(
            load_catalog(&config),
            Err(CatalogError::MissingDirectory(_))
        ));
    }

    #[test]
    fn parse_language_lists_supported_codes() {
        let err = parse_language("de").expect_err("unsupported");
        assert!(err.contains("en, fr"));
    }
}
