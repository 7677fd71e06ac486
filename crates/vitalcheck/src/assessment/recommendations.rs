use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::catalog::QuestionBank;
use super::domain::PillarScore;
use super::scoring::ScoringError;

/// Number of recommendations surfaced per pillar in the freemium preview.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 3;

/// Sample up to `limit` recommendations for each pillar score.
///
/// Scores are matched to bank pillars by id, so the two lists may be ordered
/// differently, but every bank pillar needs exactly one score. The output
/// follows the order of `pillar_scores`. Entries are drawn without
/// replacement from the tier matching each pillar's status.
pub fn select_recommendations<R>(
    pillar_scores: &[PillarScore],
    bank: &QuestionBank,
    limit: usize,
    rng: &mut R,
) -> Result<Vec<Vec<String>>, ScoringError>
where
    R: Rng + ?Sized,
{
    if pillar_scores.len() != bank.pillars.len() {
        return Err(ScoringError::MismatchedPillarCount {
            expected: bank.pillars.len(),
            found: pillar_scores.len(),
        });
    }

    let mut seen = HashSet::with_capacity(pillar_scores.len());
    pillar_scores
        .iter()
        .map(|score| {
            let pillar = bank
                .pillar(&score.pillar_id)
                .ok_or_else(|| ScoringError::UnknownPillar(score.pillar_id.clone()))?;
            if !seen.insert(pillar.id.as_str()) {
                return Err(ScoringError::DuplicatePillarScore(pillar.id.clone()));
            }
            let tier = pillar.recommendations.for_status(score.status);
            let take = limit.min(tier.len());

            Ok(tier.choose_multiple(&mut *rng, take).cloned().collect())
        })
        .collect()
}
