use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{Mentor, MentorDraft, MentorId, NewSubmission, Submission, SubmissionId};
use super::snapshot::StoreSnapshot;
use super::store::{ChangeListener, Collection, DocumentStore, StoreError, Subscription};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Default)]
struct Documents {
    mentors: Vec<Mentor>,
    submissions: Vec<Submission>,
    mentor_sequence: u64,
    submission_sequence: u64,
}

impl Documents {
    fn next_mentor_id(&mut self) -> MentorId {
        loop {
            self.mentor_sequence += 1;
            let candidate = MentorId(format!("mentor-{:04}", self.mentor_sequence));
            if !self.mentors.iter().any(|mentor| mentor.id == candidate) {
                return candidate;
            }
        }
    }

    fn next_submission_id(&mut self) -> SubmissionId {
        loop {
            self.submission_sequence += 1;
            let candidate = SubmissionId(format!("sub-{:06}", self.submission_sequence));
            if !self
                .submissions
                .iter()
                .any(|submission| submission.id == candidate)
            {
                return candidate;
            }
        }
    }
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Collection, ChangeListener)>,
}

/// Thread-safe in-process document store with synchronous change fan-out.
#[derive(Clone)]
pub struct MemoryStore {
    documents: Arc<Mutex<Documents>>,
    listeners: Arc<Mutex<Listeners>>,
    clock: Clock,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_clock(Utc::now)
    }
}

impl MemoryStore {
    /// Store whose `created_at` stamps come from `clock`.
    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            documents: Arc::default(),
            listeners: Arc::default(),
            clock: Arc::new(clock),
        }
    }

    /// Preloads both collections, keeping the snapshot's ids and timestamps.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::default();
        if let Ok(mut documents) = store.documents.lock() {
            documents.mentors = snapshot.mentors;
            documents.submissions = snapshot.kpi_submissions;
        }
        store
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .map(|listeners| listeners.entries.len())
            .unwrap_or(0)
    }

    fn documents(&self) -> Result<MutexGuard<'_, Documents>, StoreError> {
        self.documents
            .lock()
            .map_err(|_| StoreError::Unavailable("document mutex poisoned".to_string()))
    }

    fn notify(&self, collection: Collection) {
        let targets: Vec<ChangeListener> = match self.listeners.lock() {
            Ok(listeners) => listeners
                .entries
                .iter()
                .filter(|(_, watched, _)| *watched == collection)
                .map(|(_, _, listener)| listener.clone())
                .collect(),
            Err(_) => return,
        };

        for listener in targets {
            listener(collection);
        }
    }
}

impl DocumentStore for MemoryStore {
    fn list_mentors(&self) -> Result<Vec<Mentor>, StoreError> {
        Ok(self.documents()?.mentors.clone())
    }

    fn get_mentor(&self, id: &MentorId) -> Result<Option<Mentor>, StoreError> {
        Ok(self
            .documents()?
            .mentors
            .iter()
            .find(|mentor| &mentor.id == id)
            .cloned())
    }

    fn insert_mentor(&self, draft: MentorDraft) -> Result<Mentor, StoreError> {
        let mentor = {
            let mut documents = self.documents()?;
            let mentor = Mentor {
                id: documents.next_mentor_id(),
                name: draft.name,
                center: draft.center,
            };
            documents.mentors.push(mentor.clone());
            mentor
        };
        self.notify(Collection::Mentors);
        Ok(mentor)
    }

    fn update_mentor(&self, id: &MentorId, draft: MentorDraft) -> Result<Mentor, StoreError> {
        let mentor = {
            let mut documents = self.documents()?;
            let mentor = documents
                .mentors
                .iter_mut()
                .find(|mentor| &mentor.id == id)
                .ok_or(StoreError::NotFound)?;
            mentor.name = draft.name;
            mentor.center = draft.center;
            mentor.clone()
        };
        self.notify(Collection::Mentors);
        Ok(mentor)
    }

    fn delete_mentor(&self, id: &MentorId) -> Result<(), StoreError> {
        {
            let mut documents = self.documents()?;
            let before = documents.mentors.len();
            documents.mentors.retain(|mentor| &mentor.id != id);
            if documents.mentors.len() == before {
                return Err(StoreError::NotFound);
            }
        }
        self.notify(Collection::Mentors);
        Ok(())
    }

    fn list_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self.documents()?.submissions.clone())
    }

    fn insert_submission(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        let stored = {
            let mut documents = self.documents()?;
            let id = documents.next_submission_id();
            let stored = submission.into_submission(id, (self.clock)());
            documents.submissions.push(stored.clone());
            stored
        };
        self.notify(Collection::KpiSubmissions);
        Ok(stored)
    }

    fn subscribe(
        &self,
        collection: Collection,
        listener: ChangeListener,
    ) -> Result<Subscription, StoreError> {
        let id = {
            let mut listeners = self
                .listeners
                .lock()
                .map_err(|_| StoreError::Unavailable("listener mutex poisoned".to_string()))?;
            listeners.next_id += 1;
            let id = listeners.next_id;
            listeners.entries.push((id, collection, listener));
            id
        };

        let registry = Arc::downgrade(&self.listeners);
        Ok(Subscription::new(move || {
            if let Some(listeners) = registry.upgrade() {
                if let Ok(mut listeners) = listeners.lock() {
                    listeners.entries.retain(|(entry, _, _)| *entry != id);
                }
            }
        }))
    }
}
