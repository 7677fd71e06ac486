//! Question banks: the static, per-language taxonomy of pillars, questions and
//! canned recommendations that scoring runs against.
//!
//! Banks are JSON documents. The English and French banks ship inside the
//! crate; a deployment may replace either one with a file on disk.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::{Language, StatusBand, MAX_ANSWER_SCORE, MIN_ANSWER_SCORE};

const BUNDLED_EN: &str = include_str!("../../../data/questions/en.json");
const BUNDLED_FR: &str = include_str!("../../../data/questions/fr.json");

/// One selectable answer for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<AnswerOption>,
}

/// Canned advice grouped by the band a pillar lands in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationTiers {
    #[serde(default)]
    pub red: Vec<String>,
    #[serde(default)]
    pub amber: Vec<String>,
    #[serde(default)]
    pub green: Vec<String>,
}

impl RecommendationTiers {
    pub fn for_status(&self, status: StatusBand) -> &[String] {
        match status {
            StatusBand::Red => &self.red,
            StatusBand::Amber => &self.amber,
            StatusBand::Green => &self.green,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pillar {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub recommendations: RecommendationTiers,
}

/// Inclusive score ranges a bank advertises for each band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandThresholds {
    pub red: [u8; 2],
    pub amber: [u8; 2],
    pub green: [u8; 2],
}

impl BandThresholds {
    fn for_status(&self, status: StatusBand) -> [u8; 2] {
        match status {
            StatusBand::Red => self.red,
            StatusBand::Amber => self.amber,
            StatusBand::Green => self.green,
        }
    }
}

/// Display metadata describing how the bank is scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringGuide {
    pub thresholds: BandThresholds,
    #[serde(default)]
    pub logic: String,
}

/// A complete, language-specific questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub pillars: Vec<Pillar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringGuide>,
}

impl QuestionBank {
    /// Parse and validate a bank document.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let bank: QuestionBank = serde_json::from_str(raw).map_err(CatalogError::Parse)?;
        bank.validate()?;
        Ok(bank)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn pillar(&self, pillar_id: &str) -> Option<&Pillar> {
        self.pillars.iter().find(|pillar| pillar.id == pillar_id)
    }

    pub fn question_count(&self) -> usize {
        self.pillars.iter().map(|pillar| pillar.questions.len()).sum()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.pillars.is_empty() {
            return Err(CatalogError::EmptyBank);
        }

        let mut pillar_ids = HashSet::new();
        let mut question_ids = HashSet::new();

        for pillar in &self.pillars {
            if !pillar_ids.insert(pillar.id.as_str()) {
                return Err(CatalogError::DuplicatePillar(pillar.id.clone()));
            }
            if pillar.questions.is_empty() {
                return Err(CatalogError::EmptyPillar(pillar.id.clone()));
            }

            for question in &pillar.questions {
                if !question_ids.insert(question.id.as_str()) {
                    return Err(CatalogError::DuplicateQuestion(question.id.clone()));
                }
                if let Some(option) = question
                    .options
                    .iter()
                    .find(|option| !(MIN_ANSWER_SCORE..=MAX_ANSWER_SCORE).contains(&option.score))
                {
                    return Err(CatalogError::OptionScoreOutOfRange {
                        question_id: question.id.clone(),
                        score: option.score,
                    });
                }
            }
        }

        if let Some(guide) = &self.scoring {
            for status in StatusBand::ordered() {
                let declared = guide.thresholds.for_status(status);
                if declared != status.range() {
                    return Err(CatalogError::ThresholdMismatch { status, declared });
                }
            }
        }

        Ok(())
    }
}

/// The set of banks served by the application, one per supported language.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    english: QuestionBank,
    french: QuestionBank,
}

impl QuestionCatalog {
    pub fn new(english: QuestionBank, french: QuestionBank) -> Self {
        Self { english, french }
    }

    /// Banks compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Ok(Self {
            english: QuestionBank::from_json(BUNDLED_EN)?,
            french: QuestionBank::from_json(BUNDLED_FR)?,
        })
    }

    /// Load `<code>.json` overrides from `dir`, keeping the bundled bank for
    /// any language without a file.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(CatalogError::MissingDirectory(dir.to_path_buf()));
        }

        let mut catalog = Self::bundled()?;
        for language in Language::supported() {
            let path = dir.join(format!("{}.json", language.code()));
            if path.is_file() {
                let bank = QuestionBank::from_path(&path)?;
                tracing::info!(%language, path = %path.display(), pillars = bank.pillars.len(), "loaded question bank override");
                catalog = catalog.with_bank(language, bank);
            }
        }

        Ok(catalog)
    }

    pub fn with_bank(mut self, language: Language, bank: QuestionBank) -> Self {
        match language {
            Language::En => self.english = bank,
            Language::Fr => self.french = bank,
        }
        self
    }

    pub fn bank(&self, language: Language) -> &QuestionBank {
        match language {
            Language::En => &self.english,
            Language::Fr => &self.french,
        }
    }
}

/// Failures raised while loading or validating a question bank.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("question bank directory {0} does not exist")]
    MissingDirectory(PathBuf),
    #[error("invalid question bank JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("question bank defines no pillars")]
    EmptyBank,
    #[error("pillar '{0}' defines no questions")]
    EmptyPillar(String),
    #[error("pillar id '{0}' is defined more than once")]
    DuplicatePillar(String),
    #[error("question id '{0}' is defined more than once")]
    DuplicateQuestion(String),
    #[error("question '{question_id}' has option score {score} outside 0..=3")]
    OptionScoreOutOfRange { question_id: String, score: i32 },
    #[error("declared {status} threshold {declared:?} disagrees with the scoring bands")]
    ThresholdMismatch {
        status: StatusBand,
        declared: [u8; 2],
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_bank() -> QuestionBank {
        QuestionBank::from_json(
            r#"{
                "pillars": [{
                    "id": "finance",
                    "name": "Finance",
                    "questions": [{
                        "id": "f1",
                        "text": "Books up to date?",
                        "options": [{ "label": "No", "score": 0 }, { "label": "Yes", "score": 3 }]
                    }],
                    "recommendations": { "red": ["Start bookkeeping."] }
                }]
            }"#,
        )
        .expect("minimal bank parses")
    }

    #[test]
    fn bundled_banks_match_published_shape() {
        let catalog = QuestionCatalog::bundled().expect("bundled banks are valid");

        let english = catalog.bank(Language::En);
        let ids: Vec<&str> = english.pillars.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "finance",
                "operations",
                "sales",
                "people",
                "strategy",
                "technology",
                "risks",
                "branding",
                "export"
            ]
        );
        assert_eq!(english.question_count(), 15);
        assert!(english.scoring.is_some());

        let french = catalog.bank(Language::Fr);
        assert_eq!(french.pillars.len(), 6);
        assert_eq!(
            french.pillar("finance").map(|p| p.name.as_str()),
            Some("Finance & Trésorerie")
        );
    }

    #[test]
    fn every_bundled_tier_offers_three_recommendations() {
        let catalog = QuestionCatalog::bundled().expect("bundled banks are valid");
        for language in Language::supported() {
            for pillar in &catalog.bank(language).pillars {
                for status in StatusBand::ordered() {
                    assert_eq!(
                        pillar.recommendations.for_status(status).len(),
                        3,
                        "{language} {} {status}",
                        pillar.id
                    );
                }
            }
        }
    }

    #[test]
    fn missing_tiers_default_to_empty() {
        let bank = minimal_bank();
        let tiers = &bank.pillars[0].recommendations;
        assert_eq!(tiers.for_status(StatusBand::Red).len(), 1);
        assert!(tiers.for_status(StatusBand::Green).is_empty());
        assert!(bank.scoring.is_none());
    }

    #[test]
    fn rejects_duplicate_question_ids_across_pillars() {
        let mut bank = minimal_bank();
        let mut copy = bank.pillars[0].clone();
        copy.id = "operations".to_string();
        bank.pillars.push(copy);

        match bank.validate() {
            Err(CatalogError::DuplicateQuestion(id)) => assert_eq!(id, "f1"),
            other => panic!("expected duplicate question, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_pillars_and_empty_pillars() {
        let mut bank = minimal_bank();
        bank.pillars.push(bank.pillars[0].clone());
        assert!(matches!(
            bank.validate(),
            Err(CatalogError::DuplicatePillar(id)) if id == "finance"
        ));

        let mut bank = minimal_bank();
        bank.pillars[0].questions.clear();
        assert!(matches!(
            bank.validate(),
            Err(CatalogError::EmptyPillar(id)) if id == "finance"
        ));

        let empty = QuestionBank {
            pillars: Vec::new(),
            scoring: None,
        };
        assert!(matches!(empty.validate(), Err(CatalogError::EmptyBank)));
    }

    #[test]
    fn rejects_option_scores_outside_answer_domain() {
        let mut bank = minimal_bank();
        bank.pillars[0].questions[0].options.push(AnswerOption {
            label: "Beyond".to_string(),
            score: 4,
        });

        match bank.validate() {
            Err(CatalogError::OptionScoreOutOfRange { question_id, score }) => {
                assert_eq!(question_id, "f1");
                assert_eq!(score, 4);
            }
            other => panic!("expected option score error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_thresholds_that_drift_from_bands() {
        let mut bank = minimal_bank();
        bank.scoring = Some(ScoringGuide {
            thresholds: BandThresholds {
                red: [0, 49],
                amber: [50, 69],
                green: [70, 100],
            },
            logic: String::new(),
        });

        match bank.validate() {
            Err(CatalogError::ThresholdMismatch { status, declared }) => {
                assert_eq!(status, StatusBand::Red);
                assert_eq!(declared, [0, 49]);
            }
            other => panic!("expected threshold mismatch, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            QuestionBank::from_json("{ \"pillars\": ["),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn from_dir_requires_an_existing_directory() {
        let missing = std::env::temp_dir().join("vitalcheck-no-such-question-dir");
        assert!(matches!(
            QuestionCatalog::from_dir(&missing),
            Err(CatalogError::MissingDirectory(path)) if path == missing
        ));
    }

    #[test]
    fn from_dir_overrides_only_present_languages() {
        let dir = std::env::temp_dir().join(format!("vitalcheck-catalog-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let override_bank = serde_json::to_string(&minimal_bank()).expect("serialize bank");
        fs::write(dir.join("fr.json"), override_bank).expect("write override");

        let catalog = QuestionCatalog::from_dir(&dir).expect("catalog loads");
        assert_eq!(catalog.bank(Language::Fr).pillars.len(), 1);
        assert_eq!(catalog.bank(Language::En).pillars.len(), 9);

        fs::remove_dir_all(&dir).ok();
    }
}
