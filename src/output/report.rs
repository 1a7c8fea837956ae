//! Report structures rendered by the output formatters

use crate::input::SourceDocument;
use crate::processing::engine::{MatchEngine, MatchOutcome};
use crate::processing::extractor::SkillSet;
use crate::processing::knowledge_base::Category;
use crate::processing::match_analyzer::MatchAnalysis;
use crate::processing::ranking::RankedCandidate;
use crate::processing::recommendations::RecommendationTier;
use crate::processing::semantic::CacheStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest source preview kept in a report, in characters
pub const PREVIEW_LENGTH: usize = 200;

pub type CategorizedSkills = BTreeMap<Category, Vec<String>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    /// Model used for semantic equivalence, `None` for exact comparison
    pub semantic_model: Option<String>,
    pub knowledge_base_skills: usize,
    pub cache_stats: Option<CacheStats>,
}

impl ReportMetadata {
    fn from_engine(engine: &MatchEngine, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            processing_time_ms,
            semantic_model: engine
                .model_name()
                .map(str::to_string)
                .or_else(|| engine.is_semantic().then(|| "custom encoder".to_string())),
            knowledge_base_skills: engine.knowledge_base().skill_count(),
            cache_stats: engine.cache_stats(),
        }
    }
}

/// Where a report's text came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub label: String,
    pub format: String,
    pub preview: String,
}

impl From<&SourceDocument> for SourceInfo {
    fn from(document: &SourceDocument) -> Self {
        Self {
            label: document.label(),
            format: document.format.to_string(),
            preview: truncate_preview(&document.text, PREVIEW_LENGTH),
        }
    }
}

/// One resume compared against one vacancy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub metadata: ReportMetadata,
    pub resume: SourceInfo,
    pub vacancy: SourceInfo,
    pub tier: RecommendationTier,
    pub analysis: MatchAnalysis,
    pub recommendations: String,
    pub candidate_skills: CategorizedSkills,
    pub requirement_skills: CategorizedSkills,
}

impl MatchReport {
    pub fn new(
        engine: &MatchEngine,
        outcome: MatchOutcome,
        resume: &SourceDocument,
        vacancy: &SourceDocument,
    ) -> Self {
        Self {
            metadata: ReportMetadata::from_engine(engine, outcome.processing_time_ms),
            resume: resume.into(),
            vacancy: vacancy.into(),
            tier: RecommendationTier::for_score(outcome.analysis.total_score),
            candidate_skills: engine.categorize_skills(&outcome.candidate_skills),
            requirement_skills: engine.categorize_skills(&outcome.requirement_skills),
            analysis: outcome.analysis,
            recommendations: outcome.recommendations,
        }
    }
}

/// Skills found in a single document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillReport {
    pub generated_at: DateTime<Utc>,
    pub source: SourceInfo,
    pub skills: Vec<String>,
    pub categories: Option<CategorizedSkills>,
}

impl SkillReport {
    pub fn new(
        engine: &MatchEngine,
        document: &SourceDocument,
        skills: &SkillSet,
        categorize: bool,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            source: document.into(),
            skills: skills.iter().cloned().collect(),
            categories: categorize.then(|| engine.categorize_skills(skills)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub candidate: String,
    pub total_score: f64,
    pub tier: RecommendationTier,
    pub matched: usize,
    pub missing: usize,
    pub critical_missing: Vec<String>,
    pub extra: usize,
}

impl From<&RankedCandidate> for RankingEntry {
    fn from(ranked: &RankedCandidate) -> Self {
        Self {
            rank: ranked.rank,
            candidate: ranked.id.clone(),
            total_score: ranked.analysis.total_score,
            tier: RecommendationTier::for_score(ranked.analysis.total_score),
            matched: ranked.analysis.matched_skills.len(),
            missing: ranked.analysis.missing_skills.len(),
            critical_missing: ranked.analysis.critical_missing.clone(),
            extra: ranked.analysis.extra_skills.len(),
        }
    }
}

/// Candidates ranked against one vacancy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub metadata: ReportMetadata,
    pub vacancy: SourceInfo,
    pub requirement_skills: Vec<String>,
    pub total_candidates: usize,
    pub candidates: Vec<RankingEntry>,
}

impl RankingReport {
    pub fn new(
        engine: &MatchEngine,
        vacancy: &SourceDocument,
        requirement_skills: &SkillSet,
        ranked: &[RankedCandidate],
        total_candidates: usize,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            metadata: ReportMetadata::from_engine(engine, processing_time_ms),
            vacancy: vacancy.into(),
            requirement_skills: requirement_skills.iter().cloned().collect(),
            total_candidates,
            candidates: ranked.iter().map(RankingEntry::from).collect(),
        }
    }
}

/// Single-line preview of at most `limit` characters, with "..." appended
/// when the text was cut
pub fn truncate_preview(text: &str, limit: usize) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= limit {
        return flattened;
    }

    let mut preview: String = flattened.chars().take(limit).collect();
    preview.push_str("...");
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::file_detector::DocumentFormat;
    use crate::processing::knowledge_base::SkillKnowledgeBase;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn document(name: &str, text: &str) -> SourceDocument {
        SourceDocument {
            path: PathBuf::from("/tmp/docs").join(name),
            format: DocumentFormat::PlainText,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate_preview("short\ntext", 200), "short text");

        let long = "x".repeat(250);
        let preview = truncate_preview(&long, PREVIEW_LENGTH);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));

        // counts characters, not bytes
        let cyrillic = "я".repeat(201);
        assert_eq!(truncate_preview(&cyrillic, 200).chars().count(), 203);
        assert_eq!(truncate_preview(&"я".repeat(200), 200).chars().count(), 200);
    }

    #[test]
    fn test_match_report_from_outcome() {
        let engine = MatchEngine::exact(Arc::new(SkillKnowledgeBase::builtin().unwrap())).unwrap();
        let resume = document("resume.txt", "Python Django PostgreSQL");
        let vacancy = document("vacancy.txt", "Python, FastAPI, PostgreSQL, Docker");
        let outcome = engine.analyze(&resume.text, &vacancy.text);

        let report = MatchReport::new(&engine, outcome, &resume, &vacancy);
        assert_eq!(report.tier, RecommendationTier::Low);
        assert_eq!(report.resume.label, "resume.txt");
        assert_eq!(report.candidate_skills[&Category::Backend], vec!["django"]);
        assert!(report.metadata.semantic_model.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["analysis"]["total_score"], 42.0);
        assert_eq!(json["tier"], "low");
        assert!(json["requirement_skills"]["devops"].is_array());
    }
}
