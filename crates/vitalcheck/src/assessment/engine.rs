use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::catalog::{QuestionBank, QuestionCatalog};
use super::domain::{Answer, AssessmentResult, Language};
use super::recommendations::{select_recommendations, DEFAULT_RECOMMENDATION_LIMIT};
use super::scoring::{calculate_scores, ScoringError};
use crate::config::AssessmentConfig;

/// Scores submissions against the catalog and attaches sampled recommendations.
pub struct AssessmentEngine {
    catalog: QuestionCatalog,
    recommendation_limit: usize,
    rng: Mutex<StdRng>,
}

impl AssessmentEngine {
    pub fn new(catalog: QuestionCatalog, config: &AssessmentConfig) -> Self {
        let rng = match config.recommendation_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(catalog, config.recommendation_limit, rng)
    }

    pub fn with_rng(catalog: QuestionCatalog, recommendation_limit: usize, rng: StdRng) -> Self {
        let recommendation_limit = if recommendation_limit == 0 {
            DEFAULT_RECOMMENDATION_LIMIT
        } else {
            recommendation_limit
        };

        Self {
            catalog,
            recommendation_limit,
            rng: Mutex::new(rng),
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn bank(&self, language: Language) -> &QuestionBank {
        self.catalog.bank(language)
    }

    pub fn evaluate(
        &self,
        language: Language,
        answers: &[Answer],
    ) -> Result<AssessmentResult, ScoringError> {
        let bank = self.catalog.bank(language);
        let mut result = calculate_scores(answers, bank)?;

        let selections = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            select_recommendations(
                &result.pillar_scores,
                bank,
                self.recommendation_limit,
                &mut *rng,
            )?
        };

        for (pillar, recommendations) in result.pillar_scores.iter_mut().zip(selections) {
            pillar.recommendations = recommendations;
        }

        Ok(result)
    }
}
