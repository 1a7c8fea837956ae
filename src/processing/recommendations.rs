//! Tiered improvement narrative derived from a match analysis

use crate::processing::match_analyzer::MatchAnalysis;
use crate::processing::thresholds::{
    AVERAGE_SCORE, AVERAGE_TIER_LIMIT, EXCELLENT_SCORE, GOOD_SCORE, GOOD_TIER_LIMIT,
    LOW_TIER_LIMIT, PROJECTED_IMPROVEMENT, PROJECTED_SCORE_CAP,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Excellent,
    Good,
    Average,
    Low,
}

impl RecommendationTier {
    /// Tier for a total score. Lower bounds are inclusive.
    pub fn for_score(score: f64) -> Self {
        if score >= EXCELLENT_SCORE {
            RecommendationTier::Excellent
        } else if score >= GOOD_SCORE {
            RecommendationTier::Good
        } else if score >= AVERAGE_SCORE {
            RecommendationTier::Average
        } else {
            RecommendationTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecommendationTier::Excellent => "Excellent match",
            RecommendationTier::Good => "Good match",
            RecommendationTier::Average => "Average match",
            RecommendationTier::Low => "Low match",
        }
    }
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Render the improvement narrative for `analysis`. Pure and deterministic.
pub fn generate_recommendations(analysis: &MatchAnalysis) -> String {
    let score = analysis.total_score;

    match RecommendationTier::for_score(score) {
        RecommendationTier::Excellent => format!(
            "Excellent match ({:.1}%). The candidate covers {} of the required skills \
             and brings {} additional skills.",
            score,
            analysis.matched_skills.len(),
            analysis.extra_skills.len()
        ),
        RecommendationTier::Good => {
            let mut text = format!("Good match ({:.1}%).", score);
            if !analysis.missing_skills.is_empty() {
                text.push_str(&format!(
                    " To strengthen the profile, consider learning: {}.",
                    join_limited(&analysis.missing_skills, GOOD_TIER_LIMIT)
                ));
            }
            if !analysis.critical_missing.is_empty() {
                text.push_str(&format!(
                    " Critical skills to add: {}.",
                    analysis.critical_missing.join(", ")
                ));
            }
            text
        }
        RecommendationTier::Average => {
            if !analysis.critical_missing.is_empty() {
                format!(
                    "Average match ({:.1}%). Focus first on these critical skills: {}.",
                    score,
                    join_limited(&analysis.critical_missing, AVERAGE_TIER_LIMIT)
                )
            } else {
                let projected = (score + PROJECTED_IMPROVEMENT).min(PROJECTED_SCORE_CAP);
                format!(
                    "Average match ({:.1}%). Recommended skills to learn: {}. \
                     Acquiring them could raise the match to about {:.1}%.",
                    score,
                    join_limited(&analysis.missing_skills, AVERAGE_TIER_LIMIT),
                    projected
                )
            }
        }
        RecommendationTier::Low => {
            let gaps = if analysis.critical_missing.is_empty() {
                &analysis.missing_skills
            } else {
                &analysis.critical_missing
            };
            let mut text = format!("Low match ({:.1}%).", score);
            if !gaps.is_empty() {
                text.push_str(&format!(
                    " Key skills to develop: {}.",
                    join_limited(gaps, LOW_TIER_LIMIT)
                ));
            }
            text.push_str(
                " Consider whether this position fits the current profile, \
                 or look at roles closer to the existing skill set.",
            );
            text
        }
    }
}

fn join_limited(skills: &[String], limit: usize) -> String {
    skills
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::extractor::SkillSet;
    use crate::processing::match_analyzer::calculate_match_score;
    use crate::processing::semantic::ExactEquivalence;

    fn analysis(score: f64, missing: &[&str], critical: &[&str]) -> MatchAnalysis {
        MatchAnalysis {
            total_score: score,
            skills_score: score,
            matched_skills: vec!["python".to_string(), "sql".to_string()],
            missing_skills: missing.iter().map(|s| s.to_string()).collect(),
            critical_missing: critical.iter().map(|s| s.to_string()).collect(),
            extra_skills: vec!["redis".to_string()],
            extra_bonus: 2.0,
            critical_penalty: critical.len() as f64 * 10.0,
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RecommendationTier::for_score(100.0), RecommendationTier::Excellent);
        assert_eq!(RecommendationTier::for_score(90.0), RecommendationTier::Excellent);
        assert_eq!(RecommendationTier::for_score(89.9), RecommendationTier::Good);
        assert_eq!(RecommendationTier::for_score(70.0), RecommendationTier::Good);
        assert_eq!(RecommendationTier::for_score(69.9), RecommendationTier::Average);
        assert_eq!(RecommendationTier::for_score(50.0), RecommendationTier::Average);
        assert_eq!(RecommendationTier::for_score(49.9), RecommendationTier::Low);
        assert_eq!(RecommendationTier::for_score(0.0), RecommendationTier::Low);
    }

    #[test]
    fn test_excellent_cites_counts() {
        let text = generate_recommendations(&analysis(90.0, &[], &[]));
        assert_eq!(
            text,
            "Excellent match (90.0%). The candidate covers 2 of the required skills \
             and brings 1 additional skills."
        );
    }

    #[test]
    fn test_good_lists_three_missing_and_critical() {
        let text = generate_recommendations(&analysis(
            89.9,
            &["aws", "docker", "fastapi", "redis"],
            &["docker"],
        ));
        assert!(text.starts_with("Good match (89.9%)."));
        assert!(text.contains("consider learning: aws, docker, fastapi."));
        assert!(!text.contains("redis"));
        assert!(text.contains("Critical skills to add: docker."));
    }

    #[test]
    fn test_average_emphasises_critical() {
        let critical = ["docker", "git", "java", "javascript", "kubernetes", "python"];
        let text = generate_recommendations(&analysis(55.0, &critical, &critical));
        assert_eq!(
            text,
            "Average match (55.0%). Focus first on these critical skills: \
             docker, git, java, javascript, kubernetes."
        );
    }

    #[test]
    fn test_average_projects_improvement() {
        let missing = ["aws", "fastapi", "graphql", "nginx", "react", "redis"];
        let text = generate_recommendations(&analysis(60.0, &missing, &[]));
        assert!(text.contains("aws, fastapi, graphql, nginx, react."));
        assert!(!text.contains("redis"));
        assert!(text.contains("about 80.0%"));
    }

    #[test]
    fn test_projection_is_capped() {
        let text = generate_recommendations(&analysis(69.9, &["aws"], &[]));
        assert!(text.ends_with("about 89.9%."));

        // the cap applies to scores above 75
        let projected = (80.0_f64 + PROJECTED_IMPROVEMENT).min(PROJECTED_SCORE_CAP);
        assert_eq!(projected, 95.0);
    }

    #[test]
    fn test_low_prefers_critical_and_truncates() {
        let critical = ["docker", "git", "java", "javascript", "kubernetes", "python", "sql"];
        let mut missing: Vec<&str> = critical.to_vec();
        missing.push("aws");
        let text = generate_recommendations(&analysis(10.0, &missing, &critical));
        assert!(text.contains("docker, git, java, javascript, kubernetes, python, sql."));
        assert!(!text.contains("aws"));
        assert!(text.contains("Consider whether this position fits"));
    }

    #[test]
    fn test_low_falls_back_to_missing() {
        let missing = ["a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8"];
        let text = generate_recommendations(&analysis(20.0, &missing, &[]));
        assert!(text.contains("a1, a2, a3, a4, a5, a6, a7."));
        assert!(!text.contains("a8"));
    }

    #[test]
    fn test_low_without_requirements_skips_gap_list() {
        let analysis = calculate_match_score(&SkillSet::new(), &SkillSet::new(), &ExactEquivalence);
        assert_eq!(
            generate_recommendations(&analysis),
            "Low match (0.0%). Consider whether this position fits the current profile, \
             or look at roles closer to the existing skill set."
        );
    }

    #[test]
    fn test_deterministic() {
        let input = analysis(75.0, &["aws"], &[]);
        assert_eq!(generate_recommendations(&input), generate_recommendations(&input));
    }
}
