use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{Mentor, MentorDraft, MentorId, NewSubmission, Submission};

/// The two document collections the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    #[serde(rename = "mentors")]
    Mentors,
    #[serde(rename = "kpiSubmissions")]
    KpiSubmissions,
}

impl Collection {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mentors => "mentors",
            Self::KpiSubmissions => "kpiSubmissions",
        }
    }
}

/// Callback fired after a write lands in a watched collection.
pub type ChangeListener = Arc<dyn Fn(Collection) + Send + Sync>;

/// Storage abstraction so the service can run against any document store.
pub trait DocumentStore: Send + Sync {
    fn list_mentors(&self) -> Result<Vec<Mentor>, StoreError>;
    fn get_mentor(&self, id: &MentorId) -> Result<Option<Mentor>, StoreError>;
    fn insert_mentor(&self, draft: MentorDraft) -> Result<Mentor, StoreError>;
    fn update_mentor(&self, id: &MentorId, draft: MentorDraft) -> Result<Mentor, StoreError>;
    /// Removes the mentor only; submissions referencing it stay put.
    fn delete_mentor(&self, id: &MentorId) -> Result<(), StoreError>;
    fn list_submissions(&self) -> Result<Vec<Submission>, StoreError>;
    /// Persists a submission, stamping its id and `created_at` from the store clock.
    fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, StoreError>;
    fn subscribe(
        &self,
        collection: Collection,
        listener: ChangeListener,
    ) -> Result<Subscription, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("document already exists")]
    Conflict,
    #[error("document not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Live registration handle; dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle for stores that never push updates.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
