use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rubric::{KpiType, Rubric};

/// Store-assigned mentor identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentorId(pub String);

impl MentorId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MentorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned submission identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

/// Physical location a mentor is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Center {
    #[serde(rename = "PHYSIS")]
    Physis,
    Whitehouse,
    Hephzi,
    Harlur,
}

impl Center {
    pub const fn ordered() -> [Self; 4] {
        [Self::Physis, Self::Whitehouse, Self::Hephzi, Self::Harlur]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Physis => "PHYSIS",
            Self::Whitehouse => "Whitehouse",
            Self::Hephzi => "Hephzi",
            Self::Harlur => "Harlur",
        }
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Center {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|center| center.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<_> = Self::ordered().iter().map(|c| c.label()).collect();
                format!("unknown center '{wanted}' (expected one of {})", known.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mentor {
    pub id: MentorId,
    pub name: String,
    pub center: Center,
}

/// Editable mentor attributes used for both add and edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorDraft {
    pub name: String,
    pub center: Center,
}

/// Score as it sits in a stored document.
///
/// Documents written by older clients may carry text or other JSON values in
/// the score slot; they must still load so the pipeline can skip them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ScoreValue {
    /// Loose numeric reading: numbers as-is, numeric text parsed.
    pub fn coerced(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(raw) => raw.trim().parse::<f64>().ok(),
            Self::Other(_) => None,
        }
    }

    /// Strict reading: only finite numbers count.
    pub fn strict(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }
}

impl From<u8> for ScoreValue {
    fn from(value: u8) -> Self {
        Self::Number(f64::from(value))
    }
}

/// One rated field on a submitted form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingField {
    #[serde(default)]
    pub score: Option<ScoreValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RatingField {
    pub fn scored(score: u8) -> Self {
        Self {
            score: Some(ScoreValue::from(score)),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Note text when it carries something other than whitespace.
    pub fn meaningful_note(&self) -> Option<&str> {
        self.note
            .as_deref()
            .filter(|note| !note.trim().is_empty())
    }
}

/// Field key to rating mapping for one submission.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiForm(pub BTreeMap<String, RatingField>);

impl KpiForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, field: RatingField) {
        self.0.insert(key.into(), field);
    }

    pub fn get(&self, key: &str) -> Option<&RatingField> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &RatingField> {
        self.0.values()
    }

    /// Fields in the rubric's question order, followed by any keys the
    /// rubric does not know about in key order.
    pub fn fields_in_rubric_order(&self, kind: KpiType) -> Vec<(&str, &RatingField)> {
        let rubric = Rubric::for_kind(kind);
        let mut ordered: Vec<(&str, &RatingField)> = rubric
            .keys()
            .filter_map(|key| self.0.get(key).map(|field| (key, field)))
            .collect();
        ordered.extend(
            self.0
                .iter()
                .filter(|(key, _)| !rubric.contains(key))
                .map(|(key, field)| (key.as_str(), field)),
        );
        ordered
    }
}

impl FromIterator<(String, RatingField)> for KpiForm {
    fn from_iter<I: IntoIterator<Item = (String, RatingField)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Identity of the person submitting a form, copied onto the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessorIdentity {
    pub assessor_id: String,
    pub assessor_name: String,
}

/// One assessor's rating of one mentor against one rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub mentor_id: MentorId,
    pub kpi_type: KpiType,
    #[serde(default)]
    pub form: KpiForm,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub assessor_id: String,
    #[serde(default)]
    pub assessor_name: String,
}

/// Validated submission awaiting a store-assigned id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub mentor_id: MentorId,
    pub kpi_type: KpiType,
    pub form: KpiForm,
    pub assessor: AssessorIdentity,
}

impl NewSubmission {
    pub fn into_submission(self, id: SubmissionId, created_at: DateTime<Utc>) -> Submission {
        Submission {
            id,
            mentor_id: self.mentor_id,
            kpi_type: self.kpi_type,
            form: self.form,
            created_at,
            assessor_id: self.assessor.assessor_id,
            assessor_name: self.assessor.assessor_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn center_round_trips_original_spelling() {
        let encoded = serde_json::to_value(Center::Physis).expect("serialize");
        assert_eq!(encoded, json!("PHYSIS"));
        assert_eq!("physis".parse::<Center>(), Ok(Center::Physis));
        assert_eq!("Harlur".parse::<Center>(), Ok(Center::Harlur));
        assert!("Koramangala".parse::<Center>().is_err());
    }

    #[test]
    fn malformed_scores_still_deserialize() {
        let form: KpiForm = serde_json::from_value(json!({
            "teamWork": { "score": "4", "note": "" },
            "documentation": { "score": true },
            "selfDevelopment": { "note": "no score recorded" },
            "ethicsAndConduct": { "score": 5 }
        }))
        .expect("tolerant form");

        let team = form.get("teamWork").and_then(|f| f.score.as_ref());
        assert_eq!(team.and_then(ScoreValue::coerced), Some(4.0));
        assert_eq!(team.and_then(ScoreValue::strict), None);

        let docs = form.get("documentation").and_then(|f| f.score.as_ref());
        assert_eq!(docs.and_then(ScoreValue::coerced), None);

        assert!(form
            .get("selfDevelopment")
            .map(|f| f.score.is_none())
            .unwrap_or(false));

        let ethics = form.get("ethicsAndConduct").and_then(|f| f.score.as_ref());
        assert_eq!(ethics.and_then(ScoreValue::strict), Some(5.0));
    }

    #[test]
    fn rubric_order_puts_unknown_keys_last() {
        let mut form = KpiForm::new();
        form.insert("zzExtra", RatingField::scored(3));
        form.insert("teamWork", RatingField::scored(2));
        form.insert("accountabilityGoals", RatingField::scored(4));
        form.insert("professionalismLogin", RatingField::scored(5));

        let keys: Vec<_> = form
            .fields_in_rubric_order(KpiType::Cultural)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(
            keys,
            vec!["teamWork", "professionalismLogin", "accountabilityGoals", "zzExtra"]
        );
    }

    #[test]
    fn submission_uses_camel_case_wire_names() {
        let submission = Submission {
            id: SubmissionId("sub-1".to_string()),
            mentor_id: MentorId("mentor-1".to_string()),
            kpi_type: KpiType::Intellect,
            form: KpiForm::new(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp"),
            assessor_id: "uid-9".to_string(),
            assessor_name: "Asha".to_string(),
        };

        let encoded = serde_json::to_value(&submission).expect("serialize");
        assert_eq!(encoded["mentorId"], json!("mentor-1"));
        assert_eq!(encoded["kpiType"], json!("Intellect"));
        assert_eq!(encoded["assessorName"], json!("Asha"));
        assert!(encoded.get("createdAt").is_some());
    }
}
