//! Full-scan ranking of caller-supplied candidates against one requirement

use crate::processing::extractor::SkillSet;
use crate::processing::match_analyzer::{calculate_match_score, MatchAnalysis};
use crate::processing::semantic::SkillEquivalence;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One candidate to rank: an identifier and its extracted skills
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub skills: SkillSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub rank: usize,
    pub id: String,
    pub analysis: MatchAnalysis,
}

/// Score every candidate and keep the best `limit`.
///
/// Ordered by total score descending, then by id ascending so equal scores
/// come out in a stable order.
pub fn rank_candidates(
    requirement_skills: &SkillSet,
    candidates: &[Candidate],
    equivalence: &dyn SkillEquivalence,
    limit: usize,
) -> Vec<RankedCandidate> {
    log::info!(
        "Ranking {} candidates against {} requirement skills",
        candidates.len(),
        requirement_skills.len()
    );

    let mut scored: Vec<(&Candidate, MatchAnalysis)> = candidates
        .iter()
        .map(|candidate| {
            let analysis = calculate_match_score(&candidate.skills, requirement_skills, equivalence);
            (candidate, analysis)
        })
        .collect();

    scored.sort_by(|(a, analysis_a), (b, analysis_b)| {
        analysis_b
            .total_score
            .partial_cmp(&analysis_a.total_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, (candidate, analysis))| RankedCandidate {
            rank: index + 1,
            id: candidate.id.clone(),
            analysis,
        })
        .collect()
}
