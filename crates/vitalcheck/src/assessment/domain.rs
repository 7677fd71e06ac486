use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest score an answer option may carry.
pub const MIN_ANSWER_SCORE: i32 = 0;
/// Highest score an answer option may carry.
pub const MAX_ANSWER_SCORE: i32 = 3;

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to the account that submitted an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Languages with a maintained question bank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub const fn supported() -> [Self; 2] {
        [Self::En, Self::Fr]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fr => "Français",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Health band shared by pillar and overall scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBand {
    Red,
    Amber,
    Green,
}

impl StatusBand {
    pub const GREEN_THRESHOLD: u8 = 70;
    pub const AMBER_THRESHOLD: u8 = 40;

    pub const fn ordered() -> [Self; 3] {
        [Self::Red, Self::Amber, Self::Green]
    }

    /// Bands are contiguous and cover every score; anything above 100 stays green.
    pub const fn from_score(score: u8) -> Self {
        if score >= Self::GREEN_THRESHOLD {
            Self::Green
        } else if score >= Self::AMBER_THRESHOLD {
            Self::Amber
        } else {
            Self::Red
        }
    }

    /// Inclusive score range covered by the band.
    pub const fn range(self) -> [u8; 2] {
        match self {
            Self::Red => [0, Self::AMBER_THRESHOLD - 1],
            Self::Amber => [Self::AMBER_THRESHOLD, Self::GREEN_THRESHOLD - 1],
            Self::Green => [Self::GREEN_THRESHOLD, 100],
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Amber => "amber",
            Self::Green => "green",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Critical",
            Self::Amber => "Needs Improvement",
            Self::Green => "Healthy",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Red => "#EF4444",
            Self::Amber => "#F59E0B",
            Self::Green => "#10B981",
        }
    }
}

impl fmt::Display for StatusBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single response supplied by the end user.
///
/// `answer` is kept signed so out-of-range input reaches the scoring boundary
/// and is reported there instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub answer: i32,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, answer: i32) -> Self {
        Self {
            question_id: question_id.into(),
            answer,
        }
    }
}

/// Score and band derived for one pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarScore {
    pub pillar_id: String,
    pub pillar_name: String,
    pub score: u8,
    pub status: StatusBand,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Full scoring outcome for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub pillar_scores: Vec<PillarScore>,
    pub overall_score: u8,
    pub overall_status: StatusBand,
}

/// Incoming request to score and store an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSubmission {
    pub user_id: UserId,
    pub answers: Vec<Answer>,
    /// Unknown codes read as `None` and score against the default bank.
    #[serde(default, deserialize_with = "lenient_language")]
    pub language: Option<Language>,
}

fn lenient_language<'de, D>(deserializer: D) -> Result<Option<Language>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Language::from_code))
}

/// Stored assessment with its frozen scoring outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub user_id: UserId,
    pub language: Language,
    pub answers: Vec<Answer>,
    #[serde(flatten)]
    pub result: AssessmentResult,
    pub completed_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn summary_view(&self) -> AssessmentSummaryView {
        AssessmentSummaryView {
            id: self.id.clone(),
            overall_score: self.result.overall_score,
            overall_status: self.result.overall_status,
            overall_label: self.result.overall_status.label(),
            overall_color: self.result.overall_status.color(),
            pillar_scores: self.result.pillar_scores.clone(),
            completed_at: self.completed_at,
        }
    }
}

/// Response shape returned once an assessment has been scored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummaryView {
    pub id: AssessmentId,
    pub overall_score: u8,
    pub overall_status: StatusBand,
    pub overall_label: &'static str,
    pub overall_color: &'static str,
    pub pillar_scores: Vec<PillarScore>,
    pub completed_at: DateTime<Utc>,
}
