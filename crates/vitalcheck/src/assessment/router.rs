use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::catalog::QuestionBank;
use super::domain::{AssessmentId, AssessmentSubmission, AssessmentSummaryView, Language, UserId};
use super::repository::{AssessmentRepository, NotificationPublisher, RepositoryError};
use super::service::{AssessmentService, AssessmentServiceError};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QuestionsQuery {
    #[serde(default)]
    pub(crate) lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LanguagesView {
    pub(crate) languages: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionsView<'a> {
    pub(crate) language: Language,
    pub(crate) data: &'a QuestionBank,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserAssessmentsView {
    pub(crate) user_id: UserId,
    pub(crate) assessments: Vec<AssessmentSummaryView>,
}

/// Router builder exposing the questionnaire and submission endpoints.
pub fn assessment_router<R, N>(service: Arc<AssessmentService<R, N>>) -> Router
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/assessments/languages", get(languages_handler::<R, N>))
        .route("/api/v1/assessments/questions", get(questions_handler::<R, N>))
        .route("/api/v1/assessments/submit", post(submit_handler::<R, N>))
        .route(
            "/api/v1/assessments/user/:user_id",
            get(user_assessments_handler::<R, N>),
        )
        .route(
            "/api/v1/assessments/:assessment_id",
            get(assessment_handler::<R, N>),
        )
        .with_state(service)
}

pub(crate) async fn languages_handler<R, N>(
    State(service): State<Arc<AssessmentService<R, N>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let languages = service
        .languages()
        .into_iter()
        .map(|language| (language.code(), language.display_name()))
        .collect();

    (StatusCode::OK, axum::Json(LanguagesView { languages })).into_response()
}

/// Unknown or missing `lang` values fall back to the service default.
pub(crate) async fn questions_handler<R, N>(
    State(service): State<Arc<AssessmentService<R, N>>>,
    Query(query): Query<QuestionsQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let language = query
        .lang
        .as_deref()
        .and_then(Language::from_code)
        .unwrap_or_else(|| service.default_language());

    let view = QuestionsView {
        language,
        data: service.questions(language),
    };
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<AssessmentService<R, N>>>,
    axum::Json(submission): axum::Json<AssessmentSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.summary_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn user_assessments_handler<R, N>(
    State(service): State<Arc<AssessmentService<R, N>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let user_id = UserId(user_id);
    match service.for_user(&user_id) {
        Ok(records) => {
            let view = UserAssessmentsView {
                user_id,
                assessments: records.iter().map(|record| record.summary_view()).collect(),
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn assessment_handler<R, N>(
    State(service): State<Arc<AssessmentService<R, N>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.get(&AssessmentId(assessment_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AssessmentServiceError) -> Response {
    let status = match &err {
        AssessmentServiceError::Submission(_) | AssessmentServiceError::Scoring(_) => {
            StatusCode::BAD_REQUEST
        }
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
