use super::super::domain::{MentorId, Submission};
use super::super::rubric::KpiType;
use super::super::scoring::{strict_average_score, ScoreBand};
use super::views::MentorDetailSummary;

/// Submissions (most recent first) whose notes are considered.
pub const RECENT_SUBMISSION_WINDOW: usize = 5;
/// Notes kept after flattening the window.
pub const RECENT_NOTE_LIMIT: usize = 5;

/// Detail view numbers for one mentor and rubric.
///
/// `avg_score` reads only the latest submission and counts strictly numeric
/// scores. Notes come from the most recent submissions, flattened in rubric
/// field order, then truncated.
pub fn mentor_detail_summary(
    mentor_id: &MentorId,
    submissions: &[Submission],
    kpi_type: KpiType,
) -> MentorDetailSummary {
    let mut history: Vec<&Submission> = submissions
        .iter()
        .filter(|submission| &submission.mentor_id == mentor_id && submission.kpi_type == kpi_type)
        .collect();

    if history.is_empty() {
        return MentorDetailSummary::empty(kpi_type);
    }

    history.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let avg_score = strict_average_score(&history[0].form);
    let scale_band = ScoreBand::nearest(avg_score);

    let notes = history
        .iter()
        .take(RECENT_SUBMISSION_WINDOW)
        .flat_map(|submission| {
            submission
                .form
                .fields_in_rubric_order(submission.kpi_type)
                .into_iter()
                .filter_map(|(_, field)| field.meaningful_note())
        })
        .take(RECENT_NOTE_LIMIT)
        .map(str::to_string)
        .collect();

    MentorDetailSummary {
        kpi_type,
        avg_score,
        scale_band,
        scale_label: scale_band.label(),
        notes,
        total_responses: history.len(),
    }
}
