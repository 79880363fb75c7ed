use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::workflows::kpi::domain::{
    AssessorIdentity, Center, KpiForm, Mentor, MentorDraft, MentorId, NewSubmission, RatingField,
    ScoreValue, Submission, SubmissionId,
};
use crate::workflows::kpi::intake::SubmissionDraft;
use crate::workflows::kpi::rubric::{KpiType, Rubric};
use crate::workflows::kpi::store::{
    ChangeListener, Collection, DocumentStore, StoreError, Subscription,
};
use crate::workflows::kpi::{kpi_router, KpiService, MemoryStore};

pub(super) fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_759_276_800, 0).expect("valid timestamp")
}

pub(super) fn days_ago(days: i64) -> DateTime<Utc> {
    base_time() - Duration::days(days)
}

pub(super) fn mentor(id: &str, name: &str, center: Center) -> Mentor {
    Mentor {
        id: MentorId(id.to_string()),
        name: name.to_string(),
        center,
    }
}

pub(super) fn assessor() -> AssessorIdentity {
    AssessorIdentity {
        assessor_id: "uid-assessor".to_string(),
        assessor_name: "Priya Nair".to_string(),
    }
}

/// Form covering every rubric field, cycling through `scores`.
pub(super) fn form_with_scores(kind: KpiType, scores: &[u8]) -> KpiForm {
    Rubric::for_kind(kind)
        .keys()
        .zip(scores.iter().cycle())
        .map(|(key, score)| (key.to_string(), RatingField::scored(*score)))
        .collect()
}

pub(super) fn submission(
    id: &str,
    mentor_id: &str,
    kind: KpiType,
    created_at: DateTime<Utc>,
    form: KpiForm,
) -> Submission {
    Submission {
        id: SubmissionId(id.to_string()),
        mentor_id: MentorId(mentor_id.to_string()),
        kpi_type: kind,
        form,
        created_at,
        assessor_id: "uid-assessor".to_string(),
        assessor_name: "Priya Nair".to_string(),
    }
}

pub(super) fn scored_submission(
    id: &str,
    mentor_id: &str,
    kind: KpiType,
    days: i64,
    scores: &[u8],
) -> Submission {
    submission(
        id,
        mentor_id,
        kind,
        days_ago(days),
        form_with_scores(kind, scores),
    )
}

pub(super) fn draft(kind: KpiType, score: u8) -> SubmissionDraft {
    let form = Rubric::for_kind(kind)
        .keys()
        .map(|key| {
            (
                key.to_string(),
                RatingField {
                    score: Some(ScoreValue::Text(score.to_string())),
                    note: Some(String::new()),
                },
            )
        })
        .collect();
    SubmissionDraft {
        kpi_type: kind,
        form,
    }
}

pub(super) fn mentor_draft(name: &str, center: Center) -> MentorDraft {
    MentorDraft {
        name: name.to_string(),
        center,
    }
}

pub(super) fn build_service() -> (KpiService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::with_clock(base_time));
    let service = KpiService::new(store.clone());
    (service, store)
}

pub(super) fn router_with_store(store: Arc<MemoryStore>) -> axum::Router {
    kpi_router(Arc::new(KpiService::new(store)))
}

pub(super) struct UnavailableStore;

impl DocumentStore for UnavailableStore {
    fn list_mentors(&self) -> Result<Vec<Mentor>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn get_mentor(&self, _id: &MentorId) -> Result<Option<Mentor>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert_mentor(&self, _draft: MentorDraft) -> Result<Mentor, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_mentor(&self, _id: &MentorId, _draft: MentorDraft) -> Result<Mentor, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete_mentor(&self, _id: &MentorId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert_submission(&self, _submission: NewSubmission) -> Result<Submission, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn subscribe(
        &self,
        _collection: Collection,
        _listener: ChangeListener,
    ) -> Result<Subscription, StoreError> {
        Ok(Subscription::inert())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
