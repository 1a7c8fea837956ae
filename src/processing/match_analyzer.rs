//! Multi-factor compatibility scoring between a candidate's and a
//! requirement's skill sets

use crate::processing::extractor::SkillSet;
use crate::processing::semantic::SkillEquivalence;
use crate::processing::thresholds::{
    is_critical, round1, CRITICAL_SKILL_PENALTY, EXTRA_BONUS_CAP, EXTRA_SKILL_BONUS,
};
use serde::{Deserialize, Serialize};

/// Result of comparing two skill sets. Percentages are rounded to one
/// decimal place; skill lists are sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub total_score: f64,
    pub skills_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub critical_missing: Vec<String>,
    pub extra_skills: Vec<String>,
    pub extra_bonus: f64,
    pub critical_penalty: f64,
}

/// A requirement skill paired with the candidate skill that satisfied it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillPairing {
    pub requirement: String,
    pub candidate: String,
}

/// Score `candidate_skills` against `requirement_skills`.
///
/// Pairing is greedy: each requirement skill, in sorted order, takes the
/// first unused candidate skill (also in sorted order) that is textually
/// identical or equivalent under `equivalence`. This is not a maximum
/// matching and must stay that way for scores to remain reproducible.
pub fn calculate_match_score(
    candidate_skills: &SkillSet,
    requirement_skills: &SkillSet,
    equivalence: &dyn SkillEquivalence,
) -> MatchAnalysis {
    let (pairings, missing) = pair_skills(candidate_skills, requirement_skills, equivalence);

    let mut matched_skills: Vec<String> =
        pairings.iter().map(|p| p.requirement.clone()).collect();
    matched_skills.sort();

    let extra_skills: Vec<String> = candidate_skills
        .iter()
        .filter(|skill| !pairings.iter().any(|p| &p.candidate == *skill))
        .cloned()
        .collect();

    let skills_score = if requirement_skills.is_empty() {
        0.0
    } else {
        matched_skills.len() as f64 / requirement_skills.len() as f64 * 100.0
    };

    let extra_bonus = (extra_skills.len() as f64 * EXTRA_SKILL_BONUS).min(EXTRA_BONUS_CAP);

    let critical_missing: Vec<String> = missing
        .iter()
        .filter(|skill| is_critical(skill))
        .cloned()
        .collect();
    let critical_penalty = critical_missing.len() as f64 * CRITICAL_SKILL_PENALTY;

    let total_score = (skills_score + extra_bonus - critical_penalty).clamp(0.0, 100.0);

    log::debug!(
        "Match score {:.1}: {} matched, {} missing ({} critical), {} extra",
        total_score,
        matched_skills.len(),
        missing.len(),
        critical_missing.len(),
        extra_skills.len()
    );

    MatchAnalysis {
        total_score: round1(total_score),
        skills_score: round1(skills_score),
        matched_skills,
        missing_skills: missing,
        critical_missing,
        extra_skills,
        extra_bonus: round1(extra_bonus),
        critical_penalty: round1(critical_penalty),
    }
}

/// Greedy first-match pairing. Returns the pairings and the requirement
/// skills left unmatched, both in requirement order.
pub fn pair_skills(
    candidate_skills: &SkillSet,
    requirement_skills: &SkillSet,
    equivalence: &dyn SkillEquivalence,
) -> (Vec<SkillPairing>, Vec<String>) {
    let candidates: Vec<&String> = candidate_skills.iter().collect();
    let mut used = vec![false; candidates.len()];
    let mut pairings = Vec::new();
    let mut missing = Vec::new();

    for requirement in requirement_skills {
        // Identical text takes precedence over any equivalent candidate
        let identical = candidates
            .binary_search(&requirement)
            .ok()
            .filter(|&index| !used[index]);
        let found = identical.or_else(|| {
            candidates
                .iter()
                .enumerate()
                .position(|(index, candidate)| {
                    !used[index] && equivalence.are_equivalent(requirement, candidate)
                })
        });

        match found {
            Some(index) => {
                used[index] = true;
                pairings.push(SkillPairing {
                    requirement: requirement.clone(),
                    candidate: candidates[index].clone(),
                });
            }
            None => missing.push(requirement.clone()),
        }
    }

    (pairings, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::semantic::ExactEquivalence;
    use std::cell::RefCell;

    fn set(items: &[&str]) -> SkillSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Treats listed pairs (in either order) as equivalent and records calls
    struct PairEquivalence {
        pairs: Vec<(&'static str, &'static str)>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl PairEquivalence {
        fn new(pairs: &[(&'static str, &'static str)]) -> Self {
            Self {
                pairs: pairs.to_vec(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SkillEquivalence for PairEquivalence {
        fn are_equivalent(&self, a: &str, b: &str) -> bool {
            self.calls.borrow_mut().push((a.to_string(), b.to_string()));
            a == b
                || self
                    .pairs
                    .iter()
                    .any(|(x, y)| (*x == a && *y == b) || (*x == b && *y == a))
        }
    }

    #[test]
    fn test_empty_requirements() {
        let analysis = calculate_match_score(&set(&["python"]), &SkillSet::new(), &ExactEquivalence);
        assert_eq!(analysis.skills_score, 0.0);
        assert!(analysis.matched_skills.is_empty());
        assert!(analysis.missing_skills.is_empty());
        assert_eq!(analysis.extra_skills, vec!["python"]);
        assert_eq!(analysis.extra_bonus, 2.0);
        assert_eq!(analysis.total_score, 2.0);
    }

    #[test]
    fn test_superset_candidate() {
        let candidate = set(&["docker", "git", "python", "redis"]);
        let requirement = set(&["docker", "python"]);
        let analysis = calculate_match_score(&candidate, &requirement, &ExactEquivalence);

        assert_eq!(analysis.skills_score, 100.0);
        assert!(analysis.missing_skills.is_empty());
        assert_eq!(analysis.extra_skills, vec!["git", "redis"]);
        assert_eq!(analysis.total_score, 100.0);
    }

    #[test]
    fn test_reference_scenario() {
        let candidate = set(&["django", "postgresql", "python"]);
        let requirement = set(&["docker", "fastapi", "postgresql", "python"]);
        let analysis = calculate_match_score(&candidate, &requirement, &ExactEquivalence);

        assert_eq!(analysis.matched_skills, vec!["postgresql", "python"]);
        assert_eq!(analysis.missing_skills, vec!["docker", "fastapi"]);
        assert_eq!(analysis.skills_score, 50.0);
        assert_eq!(analysis.extra_skills, vec!["django"]);
        assert_eq!(analysis.extra_bonus, 2.0);
        assert_eq!(analysis.critical_missing, vec!["docker"]);
        assert_eq!(analysis.critical_penalty, 10.0);
        assert_eq!(analysis.total_score, 42.0);
    }

    #[test]
    fn test_extra_bonus_is_capped_and_total_clamped_high() {
        let candidate = set(&[
            "aws", "azure", "django", "docker", "flask", "gcp", "git", "jira", "linux", "nginx",
            "python", "redis",
        ]);
        let requirement = set(&["python"]);
        let analysis = calculate_match_score(&candidate, &requirement, &ExactEquivalence);

        assert_eq!(analysis.extra_skills.len(), 11);
        assert_eq!(analysis.extra_bonus, 15.0);
        assert_eq!(analysis.total_score, 100.0);
    }

    #[test]
    fn test_total_clamped_at_zero() {
        let requirement = set(&["docker", "git", "java", "kubernetes", "python", "sql"]);
        let analysis = calculate_match_score(&SkillSet::new(), &requirement, &ExactEquivalence);

        assert_eq!(analysis.critical_penalty, 60.0);
        assert_eq!(analysis.critical_missing.len(), 6);
        assert_eq!(analysis.total_score, 0.0);
    }

    #[test]
    fn test_rounding_at_output() {
        let candidate = set(&["python"]);
        let requirement = set(&["fastapi", "python", "redis"]);
        let analysis = calculate_match_score(&candidate, &requirement, &ExactEquivalence);

        assert_eq!(analysis.skills_score, 33.3);
        assert_eq!(analysis.total_score, 33.3);
    }

    #[test]
    fn test_semantic_pairing_consumes_candidate() {
        let candidate = set(&["machine learning"]);
        let requirement = set(&["deep learning", "nlp"]);
        let equivalence = PairEquivalence::new(&[
            ("deep learning", "machine learning"),
            ("nlp", "machine learning"),
        ]);
        let analysis = calculate_match_score(&candidate, &requirement, &equivalence);

        // "deep learning" sorts first and takes the only candidate
        assert_eq!(analysis.matched_skills, vec!["deep learning"]);
        assert_eq!(analysis.missing_skills, vec!["nlp"]);
        assert!(analysis.extra_skills.is_empty());
    }

    #[test]
    fn test_greedy_first_match_is_not_optimal() {
        // "a-req" could take either candidate; it takes the first in sorted
        // order, leaving "b-req" without a partner.
        let candidate = set(&["x-cand", "y-cand"]);
        let requirement = set(&["a-req", "b-req"]);
        let equivalence =
            PairEquivalence::new(&[("a-req", "x-cand"), ("a-req", "y-cand"), ("b-req", "x-cand")]);

        let (pairings, missing) = pair_skills(&candidate, &requirement, &equivalence);
        assert_eq!(
            pairings,
            vec![SkillPairing {
                requirement: "a-req".to_string(),
                candidate: "x-cand".to_string(),
            }]
        );
        assert_eq!(missing, vec!["b-req"]);
    }

    #[test]
    fn test_identical_text_skips_oracle() {
        let candidate = set(&["tensorflow"]);
        let requirement = set(&["tensorflow"]);
        let equivalence = PairEquivalence::new(&[]);

        let (pairings, missing) = pair_skills(&candidate, &requirement, &equivalence);
        assert_eq!(pairings[0].candidate, "tensorflow");
        assert!(missing.is_empty());
        assert!(equivalence.calls.borrow().is_empty());
    }

    #[test]
    fn test_identical_candidate_wins_over_earlier_equivalent() {
        let candidate = set(&["keras", "tensorflow"]);
        let requirement = set(&["tensorflow"]);
        let equivalence = PairEquivalence::new(&[("tensorflow", "keras")]);

        let analysis = calculate_match_score(&candidate, &requirement, &equivalence);
        assert_eq!(analysis.matched_skills, vec!["tensorflow"]);
        assert_eq!(analysis.extra_skills, vec!["keras"]);
        assert!(equivalence.calls.borrow().is_empty());
    }

    #[test]
    fn test_superset_extras_are_set_difference() {
        let candidate = set(&["keras", "pytorch", "tensorflow", "python"]);
        let requirement = set(&["python", "tensorflow"]);
        let equivalence = PairEquivalence::new(&[("tensorflow", "keras"), ("python", "keras")]);

        let analysis = calculate_match_score(&candidate, &requirement, &equivalence);
        assert!(analysis.missing_skills.is_empty());
        assert_eq!(analysis.extra_skills, vec!["keras", "pytorch"]);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let candidate = set(&["go-x", "go-y", "go-z"]);
        let requirement = set(&["req-1", "req-2"]);
        let equivalence = PairEquivalence::new(&[
            ("req-1", "go-y"),
            ("req-1", "go-z"),
            ("req-2", "go-z"),
        ]);

        let first = calculate_match_score(&candidate, &requirement, &equivalence);
        for _ in 0..5 {
            assert_eq!(calculate_match_score(&candidate, &requirement, &equivalence), first);
        }
        assert_eq!(first.matched_skills, vec!["req-1", "req-2"]);
        assert_eq!(first.extra_skills, vec!["go-x"]);
    }
}
