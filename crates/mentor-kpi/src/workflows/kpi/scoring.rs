//! Scoring primitives shared by the dashboard distribution and the mentor
//! detail view. Everything here is total: malformed input degrades to the
//! `0.0` "no usable score" sentinel instead of failing.

use serde::{Deserialize, Serialize};

use super::domain::{KpiForm, MentorId, Submission};
use super::rubric::KpiType;

/// Chart band derived from an averaged score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NotApplicable,
    Critical,
    NotUpToExpectation,
    AsExpected,
    ShowsIntention,
    ExceedsExpectations,
}

impl Category {
    /// Chartable categories in canonical display order. `NotApplicable` is
    /// never charted.
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Critical,
            Self::NotUpToExpectation,
            Self::AsExpected,
            Self::ShowsIntention,
            Self::ExceedsExpectations,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotApplicable => "N/A",
            Self::Critical => "Critical",
            Self::NotUpToExpectation => "Not Up to Expectation",
            Self::AsExpected => "As Expected",
            Self::ShowsIntention => "Shows Intention",
            Self::ExceedsExpectations => "Exceeds Expectations / Exceptional",
        }
    }
}

/// Bands are inclusive-lower, exclusive-upper. Zero, negative and non-finite
/// scores all mean "no data".
pub fn categorize(score: f64) -> Category {
    if !score.is_finite() || score <= 0.0 {
        Category::NotApplicable
    } else if score < 1.5 {
        Category::Critical
    } else if score < 2.5 {
        Category::NotUpToExpectation
    } else if score < 3.5 {
        Category::AsExpected
    } else if score < 4.5 {
        Category::ShowsIntention
    } else {
        Category::ExceedsExpectations
    }
}

/// Mean of every positive, finite score on the form, or `0.0` when none
/// qualify. Numeric text counts; anything else is skipped.
pub fn average_score(form: &KpiForm) -> f64 {
    mean(
        form.values()
            .filter_map(|field| field.score.as_ref())
            .filter_map(|score| score.coerced())
            .filter(|score| score.is_finite() && *score > 0.0),
    )
}

/// Mean of the strictly numeric scores on the form, or `0.0` when none.
pub(crate) fn strict_average_score(form: &KpiForm) -> f64 {
    mean(
        form.values()
            .filter_map(|field| field.score.as_ref())
            .filter_map(|score| score.strict()),
    )
}

fn mean(scores: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = scores.fold((0.0_f64, 0_usize), |(sum, count), score| {
        (sum + score, count + 1)
    });
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Most recent submission for the mentor and rubric. Ties on `created_at`
/// resolve arbitrarily.
pub fn latest_submission<'a>(
    submissions: &'a [Submission],
    mentor_id: &MentorId,
    kpi_type: KpiType,
) -> Option<&'a Submission> {
    submissions
        .iter()
        .filter(|submission| &submission.mentor_id == mentor_id && submission.kpi_type == kpi_type)
        .max_by_key(|submission| submission.created_at)
}

/// One-decimal rendering with halves rounded away from zero (`2.25` -> `2.3`).
pub fn format_score(score: f64) -> String {
    format!("{:.1}", (score * 10.0).round() / 10.0)
}

/// Nearest whole-number band for the detail view's scale marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    NotApplicable,
    Critical,
    NotUpToExpectation,
    AsExpected,
    ShowsIntention,
    ExceedsExpectations,
}

impl ScoreBand {
    pub fn nearest(score: f64) -> Self {
        if !score.is_finite() {
            return Self::NotApplicable;
        }
        match score.round() as i64 {
            1 => Self::Critical,
            2 => Self::NotUpToExpectation,
            3 => Self::AsExpected,
            4 => Self::ShowsIntention,
            5 => Self::ExceedsExpectations,
            _ => Self::NotApplicable,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotApplicable => "N/A",
            Self::Critical => "Critical",
            Self::NotUpToExpectation => "Not Up to Expectation",
            Self::AsExpected => "As Expected",
            Self::ShowsIntention => "Shows Intention",
            Self::ExceedsExpectations => "Exceeds Expectations",
        }
    }
}
