//! Mentor KPI scoring: rubric registry, submission intake, document store
//! seam, and the aggregation pipeline behind the dashboard and detail views.

pub mod domain;
pub mod intake;
pub mod memory;
pub mod report;
pub mod router;
pub mod rubric;
pub mod scoring;
pub mod service;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessorIdentity, Center, KpiForm, Mentor, MentorDraft, MentorId, NewSubmission, RatingField,
    ScoreValue, Submission, SubmissionId,
};
pub use intake::{IntakeViolation, SubmissionDraft, SubmissionIntake};
pub use memory::MemoryStore;
pub use report::views::{
    DistributionBucket, DistributionView, MentorDetailSummary, MentorProfileView,
};
pub use report::{build_distribution, mentor_detail_summary, DistributionReport};
pub use router::kpi_router;
pub use rubric::{KpiType, Rubric, RubricField};
pub use scoring::{average_score, categorize, format_score, latest_submission, Category, ScoreBand};
pub use service::{KpiService, KpiServiceError, MentorWatch};
pub use snapshot::{SnapshotError, StoreSnapshot};
pub use store::{ChangeListener, Collection, DocumentStore, StoreError, Subscription};
