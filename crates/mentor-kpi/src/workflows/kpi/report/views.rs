use super::super::domain::{Center, Mentor};
use super::super::rubric::KpiType;
use super::super::scoring::{Category, ScoreBand};
use serde::Serialize;

/// One chart slice.
///
/// `category` serializes as a stable snake_case id (`"not_up_to_expectation"`)
/// for programmatic use; `category_label` carries the display name shown in
/// the chart legend (`"Not Up to Expectation"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBucket {
    pub category: Category,
    pub category_label: &'static str,
    pub count: usize,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionView {
    pub kpi_type: KpiType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<Center>,
    pub empty: bool,
    pub buckets: Vec<DistributionBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorDetailSummary {
    pub kpi_type: KpiType,
    pub avg_score: f64,
    pub scale_band: ScoreBand,
    pub scale_label: &'static str,
    pub notes: Vec<String>,
    pub total_responses: usize,
}

impl MentorDetailSummary {
    pub fn empty(kpi_type: KpiType) -> Self {
        Self {
            kpi_type,
            avg_score: 0.0,
            scale_band: ScoreBand::NotApplicable,
            scale_label: ScoreBand::NotApplicable.label(),
            notes: Vec::new(),
            total_responses: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorProfileView {
    pub mentor: Mentor,
    pub intellect: MentorDetailSummary,
    pub cultural: MentorDetailSummary,
}
