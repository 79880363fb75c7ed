use super::super::domain::{Center, Mentor, Submission};
use super::super::rubric::KpiType;
use super::super::scoring::{average_score, categorize, format_score, latest_submission, Category};
use super::views::{DistributionBucket, DistributionView};
use std::collections::HashMap;
use std::io::Write;

struct MentorStanding<'a> {
    mentor: &'a Mentor,
    category: Category,
    score: f64,
}

impl MentorStanding<'_> {
    fn member_label(&self) -> String {
        format!("{} ({})", self.mentor.name, format_score(self.score))
    }
}

fn standing<'a>(
    mentor: &'a Mentor,
    submissions: &[Submission],
    kpi_type: KpiType,
) -> MentorStanding<'a> {
    match latest_submission(submissions, &mentor.id, kpi_type) {
        Some(latest) => {
            let score = average_score(&latest.form);
            MentorStanding {
                mentor,
                category: categorize(score),
                score,
            }
        }
        None => MentorStanding {
            mentor,
            category: Category::NotApplicable,
            score: 0.0,
        },
    }
}

/// Groups mentors into chart buckets by the category of their latest
/// submission for `kpi_type`.
///
/// Mentors without a usable latest submission are left out entirely, and
/// empty categories produce no bucket. Buckets follow [`Category::ordered`];
/// members keep the order mentors were supplied in. Submissions that point
/// at mentors not in `mentors` are ignored.
pub fn build_distribution(
    mentors: &[Mentor],
    submissions: &[Submission],
    kpi_type: KpiType,
    center_filter: Option<Center>,
) -> Vec<DistributionBucket> {
    let mut grouped: HashMap<Category, Vec<String>> = HashMap::new();

    for mentor in mentors
        .iter()
        .filter(|mentor| center_filter.map_or(true, |center| mentor.center == center))
    {
        let standing = standing(mentor, submissions, kpi_type);
        if standing.category == Category::NotApplicable {
            continue;
        }
        grouped
            .entry(standing.category)
            .or_default()
            .push(standing.member_label());
    }

    Category::ordered()
        .into_iter()
        .filter_map(|category| {
            grouped
                .remove(&category)
                .filter(|members| !members.is_empty())
                .map(|members| DistributionBucket {
                    category,
                    category_label: category.label(),
                    count: members.len(),
                    members,
                })
        })
        .collect()
}

/// Distribution for one rubric and filter combination.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionReport {
    pub kpi_type: KpiType,
    pub center: Option<Center>,
    pub buckets: Vec<DistributionBucket>,
}

impl DistributionReport {
    pub fn build(
        mentors: &[Mentor],
        submissions: &[Submission],
        kpi_type: KpiType,
        center: Option<Center>,
    ) -> Self {
        Self {
            kpi_type,
            center,
            buckets: build_distribution(mentors, submissions, kpi_type, center),
        }
    }

    /// No mentor in scope has a usable score: "no data for current filters".
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn charted_mentors(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.count).sum()
    }

    /// Share of charted mentors per bucket, in bucket order.
    pub fn shares(&self) -> Vec<(Category, f32)> {
        let total = self.charted_mentors();
        self.buckets
            .iter()
            .map(|bucket| {
                let share = if total == 0 {
                    0.0
                } else {
                    bucket.count as f32 / total as f32
                };
                (bucket.category, share)
            })
            .collect()
    }

    pub fn view(&self) -> DistributionView {
        DistributionView {
            kpi_type: self.kpi_type,
            center: self.center,
            empty: self.is_empty(),
            buckets: self.buckets.clone(),
        }
    }

    /// One CSV row per bucket: category, count, members joined by `; `.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(["category", "count", "members"])?;
        for bucket in &self.buckets {
            writer.write_record([
                bucket.category_label.to_string(),
                bucket.count.to_string(),
                bucket.members.join("; "),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}
