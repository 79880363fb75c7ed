use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{AssessorIdentity, Center, MentorDraft, MentorId};
use super::intake::SubmissionDraft;
use super::rubric::KpiType;
use super::service::{KpiService, KpiServiceError};
use super::store::{DocumentStore, StoreError};

pub const ASSESSOR_ID_HEADER: &str = "x-assessor-id";
pub const ASSESSOR_NAME_HEADER: &str = "x-assessor-name";

/// Router builder exposing mentor management, submission intake, and dashboard endpoints.
pub fn kpi_router<S>(service: Arc<KpiService<S>>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/mentors",
            get(list_mentors_handler::<S>).post(add_mentor_handler::<S>),
        )
        .route(
            "/api/v1/mentors/:mentor_id",
            get(mentor_profile_handler::<S>)
                .put(edit_mentor_handler::<S>)
                .delete(delete_mentor_handler::<S>),
        )
        .route(
            "/api/v1/mentors/:mentor_id/submissions",
            post(submit_handler::<S>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    pub(crate) kpi_type: Option<String>,
    #[serde(default)]
    pub(crate) center: Option<String>,
}

pub(crate) async fn list_mentors_handler<S>(State(service): State<Arc<KpiService<S>>>) -> Response
where
    S: DocumentStore + 'static,
{
    match service.mentors() {
        Ok(mentors) => (StatusCode::OK, axum::Json(mentors)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_mentor_handler<S>(
    State(service): State<Arc<KpiService<S>>>,
    axum::Json(draft): axum::Json<MentorDraft>,
) -> Response
where
    S: DocumentStore + 'static,
{
    match service.add_mentor(draft) {
        Ok(mentor) => (StatusCode::CREATED, axum::Json(mentor)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn edit_mentor_handler<S>(
    State(service): State<Arc<KpiService<S>>>,
    Path(mentor_id): Path<String>,
    axum::Json(draft): axum::Json<MentorDraft>,
) -> Response
where
    S: DocumentStore + 'static,
{
    match service.edit_mentor(&MentorId(mentor_id), draft) {
        Ok(mentor) => (StatusCode::OK, axum::Json(mentor)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_mentor_handler<S>(
    State(service): State<Arc<KpiService<S>>>,
    Path(mentor_id): Path<String>,
) -> Response
where
    S: DocumentStore + 'static,
{
    match service.delete_mentor(&MentorId(mentor_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn mentor_profile_handler<S>(
    State(service): State<Arc<KpiService<S>>>,
    Path(mentor_id): Path<String>,
) -> Response
where
    S: DocumentStore + 'static,
{
    match service.mentor_profile(&MentorId(mentor_id)) {
        Ok(profile) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<KpiService<S>>>,
    Path(mentor_id): Path<String>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<SubmissionDraft>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let Some(assessor) = assessor_from_headers(&headers) else {
        let payload = json!({ "error": "assessor identity headers are required" });
        return (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
    };

    match service.submit(&mentor_id, assessor, draft) {
        Ok(submission) => (StatusCode::CREATED, axum::Json(submission)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dashboard_handler<S>(
    State(service): State<Arc<KpiService<S>>>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let kpi_type = match query.kpi_type.as_deref() {
        Some(raw) => match raw.parse::<KpiType>() {
            Ok(kind) => kind,
            Err(message) => return bad_request(message),
        },
        None => KpiType::Intellect,
    };
    let center = match query.center.as_deref().filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => match raw.parse::<Center>() {
            Ok(center) => Some(center),
            Err(message) => return bad_request(message),
        },
        None => None,
    };

    match service.distribution(kpi_type, center) {
        Ok(report) => (StatusCode::OK, axum::Json(report.view())).into_response(),
        Err(err) => error_response(err),
    }
}

fn assessor_from_headers(headers: &HeaderMap) -> Option<AssessorIdentity> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let assessor_id = header(ASSESSOR_ID_HEADER)?;
    let assessor_name = header(ASSESSOR_NAME_HEADER).unwrap_or_default();
    Some(AssessorIdentity {
        assessor_id,
        assessor_name,
    })
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn error_response(err: KpiServiceError) -> Response {
    let status = match &err {
        KpiServiceError::Intake(_) | KpiServiceError::InvalidMentor(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        KpiServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        KpiServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        KpiServiceError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
