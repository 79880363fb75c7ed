use serde::{Deserialize, Serialize};

use super::domain::{
    AssessorIdentity, KpiForm, MentorId, NewSubmission, RatingField, ScoreValue,
};
use super::rubric::{KpiType, Rubric};

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

/// Raw form payload as entered by an assessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDraft {
    pub kpi_type: KpiType,
    #[serde(default)]
    pub form: KpiForm,
}

/// Reasons a draft is refused before it reaches the store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("mentor id is required")]
    MissingMentorId,
    #[error("assessor identity is required")]
    MissingAssessor,
    #[error("{kpi_type} form is missing field '{field}'")]
    MissingField { kpi_type: KpiType, field: String },
    #[error("{kpi_type} form has no field '{field}'")]
    UnknownField { kpi_type: KpiType, field: String },
    #[error("score for '{field}' is not a whole number")]
    NonNumericScore { field: String },
    #[error("score for '{field}' must be between 1 and 5 (found {found})")]
    ScoreOutOfRange { field: String, found: i64 },
}

/// Boundary check that turns a draft into a persistable submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionIntake;

impl SubmissionIntake {
    pub fn accept(
        &self,
        mentor_id: &str,
        assessor: AssessorIdentity,
        draft: SubmissionDraft,
    ) -> Result<NewSubmission, IntakeViolation> {
        let mentor_id = mentor_id.trim();
        if mentor_id.is_empty() {
            return Err(IntakeViolation::MissingMentorId);
        }
        if assessor.assessor_id.trim().is_empty() {
            return Err(IntakeViolation::MissingAssessor);
        }

        let kpi_type = draft.kpi_type;
        let rubric = Rubric::for_kind(kpi_type);

        if let Some(unknown) = draft.form.0.keys().find(|key| !rubric.contains(key)) {
            return Err(IntakeViolation::UnknownField {
                kpi_type,
                field: unknown.clone(),
            });
        }

        let mut raw = draft.form.0;
        let mut form = KpiForm::new();
        for key in rubric.keys() {
            let entry = raw
                .remove(key)
                .ok_or_else(|| IntakeViolation::MissingField {
                    kpi_type,
                    field: key.to_string(),
                })?;
            let score = coerce_score(key, entry.score.as_ref())?;
            let note = entry.note.filter(|note| !note.is_empty());
            form.insert(
                key,
                RatingField {
                    score: Some(ScoreValue::from(score)),
                    note,
                },
            );
        }

        Ok(NewSubmission {
            mentor_id: MentorId(mentor_id.to_string()),
            kpi_type,
            form,
            assessor,
        })
    }
}

fn coerce_score(field: &str, score: Option<&ScoreValue>) -> Result<u8, IntakeViolation> {
    let non_numeric = || IntakeViolation::NonNumericScore {
        field: field.to_string(),
    };

    let whole = match score {
        Some(ScoreValue::Number(value)) if value.is_finite() => value.trunc() as i64,
        Some(ScoreValue::Text(raw)) => leading_integer(raw).ok_or_else(non_numeric)?,
        _ => return Err(non_numeric()),
    };

    if !(MIN_SCORE..=MAX_SCORE).contains(&whole) {
        return Err(IntakeViolation::ScoreOutOfRange {
            field: field.to_string(),
            found: whole,
        });
    }

    u8::try_from(whole).map_err(|_| non_numeric())
}

/// Integer prefix of `raw` after leading whitespace, e.g. `" 4 stars"` -> 4.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let digits_start = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[digits_start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..digits_start + digits_len].parse().ok()
}
