use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which rubric a submission was rated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KpiType {
    Intellect,
    Cultural,
}

impl KpiType {
    pub const fn ordered() -> [Self; 2] {
        [Self::Intellect, Self::Cultural]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Intellect => "Intellect",
            Self::Cultural => "Cultural",
        }
    }

    pub fn rubric(self) -> &'static Rubric {
        Rubric::for_kind(self)
    }
}

impl fmt::Display for KpiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for KpiType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "intellect" => Ok(Self::Intellect),
            "cultural" => Ok(Self::Cultural),
            other => Err(format!(
                "unknown KPI type '{other}' (expected Intellect or Cultural)"
            )),
        }
    }
}

/// One rated question on a KPI form. Option labels map to scores 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RubricField {
    pub key: &'static str,
    pub label: &'static str,
    pub options: [&'static str; 5],
}

/// Fixed, code-defined field set for one KPI type.
#[derive(Debug, Serialize)]
pub struct Rubric {
    pub kind: KpiType,
    pub fields: &'static [RubricField],
}

const STANDARD_SCALE: [&str; 5] = [
    "Critical",
    "Not Up to Expectation",
    "As Expected",
    "Shows Intention",
    "Exceeds Expectations",
];

const CULTURAL_SCALE: [&str; 5] = [
    "Critical",
    "Not Up to Expectation",
    "As Expected",
    "Shows Intention",
    "Exceptional",
];

const INTELLECT_FIELDS: [RubricField; 8] = [
    RubricField {
        key: "subjectKnowledge",
        label: "Subject knowledge",
        options: STANDARD_SCALE,
    },
    RubricField {
        key: "materialReadiness",
        label: "Material readiness",
        options: [
            "Never Prepares",
            "1-2 days prepared",
            "3 days prepared",
            "4 days prepared",
            "Ready Everyday",
        ],
    },
    RubricField {
        key: "childCentricTeaching",
        label: "Child-Centric Teaching",
        options: STANDARD_SCALE,
    },
    RubricField {
        key: "differentialMethods",
        label: "Differential Methods / Experiential Learning",
        options: STANDARD_SCALE,
    },
    RubricField {
        key: "lessonPlanImplementation",
        label: "Lesson Plan Implementation",
        options: ["Never", "Rarely", "Sometimes", "Often", "Always"],
    },
    RubricField {
        key: "reportQuality",
        label: "Report Quality",
        options: [
            "Defensive of feedback",
            "Takes Feedback, No Action",
            "Inconsistent",
            "Consistently integrates feedback",
            "Implements feedback",
        ],
    },
    RubricField {
        key: "learnersEngagement",
        label: "Learners Engagement",
        options: STANDARD_SCALE,
    },
    RubricField {
        key: "percentageOfLearners",
        label: "Percentage of learners engaged",
        options: ["< 50%", "50%", "60%", "80%", "> 80%"],
    },
];

const CULTURAL_FIELDS: [RubricField; 12] = [
    RubricField {
        key: "teamWork",
        label: "Team work - Handles disagreements respectfully",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "professionalismLogin",
        label: "Professionalism - Logs in before 8:10 AM consistently",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "professionalismGrooming",
        label: "Professionalism - Maintains appropriate and tidy grooming",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "childSafetyHazards",
        label: "Child Safety - Prevents hazards and addresses safety concerns",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "childSafetyEnvironment",
        label: "Child Safety - Maintains emotionally safe environment",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "childCentricityEngagement",
        label: "Child Centricity - Maintains meaningful engagement",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "childCentricityDevelopment",
        label: "Child Centricity - Plans for emotional, social, and intellectual development",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "selfDevelopment",
        label: "Self Development - Follows trends, stays updated, and adjusts",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "ethicsAndConduct",
        label: "Ethics & Conduct - Is accountable, reliable and has integrity",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "documentation",
        label: "Documentation - Timeliness in updating all child documentation",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "accountabilityIndependent",
        label: "Accountability - Completes tasks independently",
        options: CULTURAL_SCALE,
    },
    RubricField {
        key: "accountabilityGoals",
        label: "Accountability - Sees tasks through to completion",
        options: CULTURAL_SCALE,
    },
];

static INTELLECT: Rubric = Rubric {
    kind: KpiType::Intellect,
    fields: &INTELLECT_FIELDS,
};

static CULTURAL: Rubric = Rubric {
    kind: KpiType::Cultural,
    fields: &CULTURAL_FIELDS,
};

impl Rubric {
    pub fn for_kind(kind: KpiType) -> &'static Rubric {
        match kind {
            KpiType::Intellect => &INTELLECT,
            KpiType::Cultural => &CULTURAL,
        }
    }

    pub fn field(&self, key: &str) -> Option<&'static RubricField> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.key)
    }

    /// Option label an assessor picked for `score` on `key`, if both are valid.
    pub fn option_label(&self, key: &str, score: u8) -> Option<&'static str> {
        let field = self.field(key)?;
        let index = usize::from(score).checked_sub(1)?;
        field.options.get(index).copied()
    }
}
