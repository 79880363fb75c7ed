use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::domain::{AssessorIdentity, Center, Mentor, MentorDraft, MentorId, Submission};
use super::intake::{IntakeViolation, SubmissionDraft, SubmissionIntake};
use super::report::views::MentorProfileView;
use super::report::{mentor_detail_summary, DistributionReport};
use super::rubric::KpiType;
use super::snapshot::StoreSnapshot;
use super::store::{ChangeListener, Collection, DocumentStore, StoreError, Subscription};

/// Service composing the intake boundary, document store, and aggregation pipeline.
pub struct KpiService<S> {
    store: Arc<S>,
    intake: SubmissionIntake,
}

impl<S> KpiService<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            intake: SubmissionIntake,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn mentors(&self) -> Result<Vec<Mentor>, KpiServiceError> {
        Ok(self.store.list_mentors()?)
    }

    pub fn mentor(&self, id: &MentorId) -> Result<Mentor, KpiServiceError> {
        let mentor = self.store.get_mentor(id)?.ok_or(StoreError::NotFound)?;
        Ok(mentor)
    }

    pub fn add_mentor(&self, draft: MentorDraft) -> Result<Mentor, KpiServiceError> {
        let draft = sanitize_mentor(draft)?;
        let mentor = self.store.insert_mentor(draft)?;
        info!(mentor_id = %mentor.id, center = %mentor.center, "mentor added");
        Ok(mentor)
    }

    pub fn edit_mentor(
        &self,
        id: &MentorId,
        draft: MentorDraft,
    ) -> Result<Mentor, KpiServiceError> {
        let draft = sanitize_mentor(draft)?;
        let mentor = self.store.update_mentor(id, draft)?;
        info!(mentor_id = %mentor.id, "mentor updated");
        Ok(mentor)
    }

    /// Irreversible. Existing submissions for the mentor are left in place.
    pub fn delete_mentor(&self, id: &MentorId) -> Result<(), KpiServiceError> {
        self.store.delete_mentor(id)?;
        info!(mentor_id = %id, "mentor deleted");
        Ok(())
    }

    /// Validate a draft form and persist it as a new submission.
    pub fn submit(
        &self,
        mentor_id: &str,
        assessor: AssessorIdentity,
        draft: SubmissionDraft,
    ) -> Result<Submission, KpiServiceError> {
        let submission = self.intake.accept(mentor_id, assessor, draft)?;

        if self.store.get_mentor(&submission.mentor_id)?.is_none() {
            warn!(mentor_id = %submission.mentor_id, "submission recorded for unknown mentor");
        }

        let stored = self.store.insert_submission(submission)?;
        info!(
            submission_id = %stored.id.0,
            mentor_id = %stored.mentor_id,
            kpi_type = %stored.kpi_type,
            "kpi submission stored"
        );
        Ok(stored)
    }

    /// Chart buckets for the selected rubric, recomputed from a fresh snapshot.
    pub fn distribution(
        &self,
        kpi_type: KpiType,
        center: Option<Center>,
    ) -> Result<DistributionReport, KpiServiceError> {
        let snapshot = StoreSnapshot::capture(self.store.as_ref())?;
        let report = DistributionReport::build(
            &snapshot.mentors,
            &snapshot.kpi_submissions,
            kpi_type,
            center,
        );
        debug!(
            %kpi_type,
            center = ?center,
            buckets = report.buckets.len(),
            charted = report.charted_mentors(),
            "distribution computed"
        );
        Ok(report)
    }

    /// Mentor plus detail summaries for both rubrics.
    pub fn mentor_profile(&self, id: &MentorId) -> Result<MentorProfileView, KpiServiceError> {
        profile_from_store(self.store.as_ref(), id)
    }

    /// Recompute the mentor's profile whenever mentors or submissions change.
    ///
    /// `on_update` receives the current profile immediately, then once per
    /// change. Both subscriptions are registered before the first profile is
    /// read, so a write racing the initial read still produces an update; the
    /// initial profile is dropped when such a change has already delivered a
    /// newer one. `on_update` runs under the watch's delivery lock and must
    /// not write to the store. Updates stop when the returned [`MentorWatch`]
    /// is dropped. A mentor deleted while watched stops producing updates.
    pub fn watch_mentor<F>(
        &self,
        id: MentorId,
        on_update: F,
    ) -> Result<MentorWatch, KpiServiceError>
    where
        F: Fn(MentorProfileView) + Send + Sync + 'static,
    {
        let on_update = Arc::new(on_update);
        let changes = Arc::new(Mutex::new(0_u64));
        let last_error = Arc::new(Mutex::new(None));

        let listener: ChangeListener = {
            let store = Arc::clone(&self.store);
            let id = id.clone();
            let on_update = Arc::clone(&on_update);
            let changes = Arc::clone(&changes);
            let error_slot = Arc::clone(&last_error);
            Arc::new(move |collection| {
                if let Ok(mut seen) = changes.lock() {
                    *seen += 1;
                }
                match profile_from_store(store.as_ref(), &id) {
                    Ok(profile) => {
                        if let Ok(_delivery) = changes.lock() {
                            on_update(profile);
                        }
                    }
                    Err(err) => {
                        debug!(
                            mentor_id = %id,
                            collection = collection.name(),
                            error = %err,
                            "mentor watch skipped update"
                        );
                        if let Ok(mut slot) = error_slot.lock() {
                            *slot = Some(err.to_string());
                        }
                    }
                }
            })
        };

        let submissions = self
            .store
            .subscribe(Collection::KpiSubmissions, Arc::clone(&listener))?;
        let mentors = self.store.subscribe(Collection::Mentors, listener)?;

        let seen_before = changes.lock().map(|seen| *seen).unwrap_or_default();
        let initial = profile_from_store(self.store.as_ref(), &id)?;
        if let Ok(seen) = changes.lock() {
            if *seen == seen_before {
                on_update(initial);
            }
        }

        Ok(MentorWatch {
            _subscriptions: [submissions, mentors],
            last_error,
        })
    }
}

fn profile_from_store<S: DocumentStore + ?Sized>(
    store: &S,
    id: &MentorId,
) -> Result<MentorProfileView, KpiServiceError> {
    let mentor = store.get_mentor(id)?.ok_or(StoreError::NotFound)?;
    let submissions = store.list_submissions()?;

    Ok(MentorProfileView {
        intellect: mentor_detail_summary(&mentor.id, &submissions, KpiType::Intellect),
        cultural: mentor_detail_summary(&mentor.id, &submissions, KpiType::Cultural),
        mentor,
    })
}

fn sanitize_mentor(draft: MentorDraft) -> Result<MentorDraft, KpiServiceError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(KpiServiceError::InvalidMentor(
            "mentor name must not be empty".to_string(),
        ));
    }
    Ok(MentorDraft {
        name: name.to_string(),
        center: draft.center,
    })
}

/// Live mentor detail registration returned by [`KpiService::watch_mentor`].
#[derive(Debug)]
pub struct MentorWatch {
    _subscriptions: [Subscription; 2],
    last_error: Arc<Mutex<Option<String>>>,
}

impl MentorWatch {
    /// Most recent recomputation failure, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|slot| slot.clone())
    }
}

/// Error raised by the KPI service.
#[derive(Debug, thiserror::Error)]
pub enum KpiServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error("invalid mentor: {0}")]
    InvalidMentor(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
