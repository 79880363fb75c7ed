use super::common::*;
use crate::workflows::kpi::domain::{KpiForm, MentorId, RatingField, ScoreValue};
use crate::workflows::kpi::rubric::KpiType;
use crate::workflows::kpi::scoring::{
    average_score, categorize, format_score, latest_submission, strict_average_score, Category,
    ScoreBand,
};
use serde_json::json;

fn form_of(entries: &[(&str, Option<ScoreValue>)]) -> KpiForm {
    entries
        .iter()
        .map(|(key, score)| {
            (
                key.to_string(),
                RatingField {
                    score: score.clone(),
                    note: None,
                },
            )
        })
        .collect()
}

#[test]
fn average_is_mean_of_valid_scores() {
    let form = form_with_scores(KpiType::Intellect, &[1, 2, 3, 4]);
    assert!((average_score(&form) - 2.5).abs() < f64::EPSILON);
}

#[test]
fn average_of_empty_form_is_zero_sentinel() {
    assert_eq!(average_score(&KpiForm::new()), 0.0);
}

#[test]
fn average_skips_zero_negative_and_non_numeric_scores() {
    let form = form_of(&[
        ("subjectKnowledge", Some(ScoreValue::Number(4.0))),
        ("materialReadiness", Some(ScoreValue::Number(0.0))),
        ("childCentricTeaching", Some(ScoreValue::Number(-2.0))),
        ("differentialMethods", Some(ScoreValue::Text("n/a".to_string()))),
        ("reportQuality", Some(ScoreValue::Other(json!(true)))),
        ("learnersEngagement", None),
        ("percentageOfLearners", Some(ScoreValue::Number(f64::NAN))),
        ("lessonPlanImplementation", Some(ScoreValue::Text(" 2 ".to_string()))),
    ]);
    assert!((average_score(&form) - 3.0).abs() < f64::EPSILON);
}

#[test]
fn average_is_zero_when_every_score_is_unusable() {
    let form = form_of(&[
        ("teamWork", Some(ScoreValue::Number(0.0))),
        ("documentation", Some(ScoreValue::Text("".to_string()))),
        ("selfDevelopment", None),
    ]);
    assert_eq!(average_score(&form), 0.0);
}

#[test]
fn strict_average_ignores_numeric_text() {
    let form = form_of(&[
        ("teamWork", Some(ScoreValue::Number(4.0))),
        ("documentation", Some(ScoreValue::Text("2".to_string()))),
        ("selfDevelopment", Some(ScoreValue::Number(2.0))),
    ]);
    assert!((strict_average_score(&form) - 3.0).abs() < f64::EPSILON);
    assert!((average_score(&form) - (8.0 / 3.0)).abs() < 1e-12);
}

#[test]
fn categorize_respects_band_boundaries() {
    assert_eq!(categorize(0.0), Category::NotApplicable);
    assert_eq!(categorize(f64::NAN), Category::NotApplicable);
    assert_eq!(categorize(1.0), Category::Critical);
    assert_eq!(categorize(1.49), Category::Critical);
    assert_eq!(categorize(1.5), Category::NotUpToExpectation);
    assert_eq!(categorize(2.49), Category::NotUpToExpectation);
    assert_eq!(categorize(2.5), Category::AsExpected);
    assert_eq!(categorize(3.49), Category::AsExpected);
    assert_eq!(categorize(3.5), Category::ShowsIntention);
    assert_eq!(categorize(4.49), Category::ShowsIntention);
    assert_eq!(categorize(4.5), Category::ExceedsExpectations);
    assert_eq!(categorize(5.0), Category::ExceedsExpectations);
}

#[test]
fn category_labels_match_chart_legend() {
    assert_eq!(categorize(4.5).label(), "Exceeds Expectations / Exceptional");
    assert_eq!(categorize(1.5).label(), "Not Up to Expectation");
    assert_eq!(categorize(0.0).label(), "N/A");
    assert!(!Category::ordered().contains(&Category::NotApplicable));
}

#[test]
fn latest_submission_picks_most_recent_created_at() {
    let submissions = vec![
        scored_submission("day-10", "m-1", KpiType::Intellect, 10, &[1]),
        scored_submission("day-1", "m-1", KpiType::Intellect, 1, &[2]),
        scored_submission("day-5", "m-1", KpiType::Intellect, 5, &[3]),
        scored_submission("other-kind", "m-1", KpiType::Cultural, 0, &[4]),
        scored_submission("other-mentor", "m-2", KpiType::Intellect, 0, &[5]),
    ];

    let latest = latest_submission(&submissions, &MentorId("m-1".to_string()), KpiType::Intellect)
        .expect("latest present");
    assert_eq!(latest.id.0, "day-1");
}

#[test]
fn latest_submission_is_none_without_matches() {
    let submissions = vec![scored_submission("s-1", "m-1", KpiType::Cultural, 1, &[3])];
    assert!(
        latest_submission(&submissions, &MentorId("m-1".to_string()), KpiType::Intellect)
            .is_none()
    );
    assert!(latest_submission(&[], &MentorId("m-1".to_string()), KpiType::Cultural).is_none());
}

#[test]
fn format_score_rounds_halves_up() {
    assert_eq!(format_score(2.25), "2.3");
    assert_eq!(format_score(2.75), "2.8");
    assert_eq!(format_score(1.0), "1.0");
    assert_eq!(format_score(3.125), "3.1");
}

#[test]
fn score_band_uses_nearest_whole_score() {
    assert_eq!(ScoreBand::nearest(0.0), ScoreBand::NotApplicable);
    assert_eq!(ScoreBand::nearest(1.4), ScoreBand::Critical);
    assert_eq!(ScoreBand::nearest(2.5), ScoreBand::AsExpected);
    assert_eq!(ScoreBand::nearest(4.6), ScoreBand::ExceedsExpectations);
    assert_eq!(ScoreBand::nearest(5.6), ScoreBand::NotApplicable);
    assert_eq!(ScoreBand::ExceedsExpectations.label(), "Exceeds Expectations");
}
