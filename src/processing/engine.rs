//! Match engine wiring extraction, equivalence, scoring and narration together

use crate::config::Config;
use crate::error::Result;
use crate::processing::embeddings::{Encoder, Model2VecEncoder};
use crate::processing::extractor::{SkillExtractor, SkillSet};
use crate::processing::knowledge_base::{Category, SkillKnowledgeBase};
use crate::processing::match_analyzer::{calculate_match_score, MatchAnalysis};
use crate::processing::ranking::{rank_candidates, Candidate, RankedCandidate};
use crate::processing::recommendations::generate_recommendations;
use crate::processing::semantic::{
    CacheStats, ExactEquivalence, SemanticMatcher, SkillEquivalence,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// How requirement and candidate skills are compared when text differs
enum Equivalence {
    Exact(ExactEquivalence),
    Semantic(SemanticMatcher),
}

impl Equivalence {
    fn oracle(&self) -> &dyn SkillEquivalence {
        match self {
            Equivalence::Exact(exact) => exact,
            Equivalence::Semantic(matcher) => matcher,
        }
    }
}

/// Everything produced by one candidate/requirement comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub candidate_skills: SkillSet,
    pub requirement_skills: SkillSet,
    pub analysis: MatchAnalysis,
    pub recommendations: String,
    pub processing_time_ms: u64,
}

pub struct MatchEngine {
    extractor: SkillExtractor,
    equivalence: Equivalence,
    model_name: Option<String>,
}

impl MatchEngine {
    /// Build from configuration. The knowledge base must build or this
    /// fails; an embedding model that cannot be loaded downgrades to exact
    /// comparison with a warning.
    pub fn from_config(config: &Config, use_semantic: bool) -> Result<Self> {
        let knowledge_base = Arc::new(SkillKnowledgeBase::builtin()?);
        log::info!(
            "Skill knowledge base ready: {} skills, {} synonyms",
            knowledge_base.skill_count(),
            knowledge_base.synonym_count()
        );

        if !(use_semantic && config.semantic.enabled) {
            log::info!("Semantic skill equivalence disabled");
            return Self::exact(knowledge_base);
        }

        match Model2VecEncoder::load(&config.embedding_model_location()) {
            Ok(encoder) => {
                let model_name = encoder.model_name().to_string();
                let mut engine = Self::with_encoder(
                    knowledge_base,
                    Arc::new(encoder),
                    config.semantic.cache_capacity,
                    config.semantic.equivalence_threshold,
                )?;
                engine.model_name = Some(model_name);
                Ok(engine)
            }
            Err(e) => {
                log::warn!("Embedding model unavailable, using exact skill comparison: {}", e);
                Self::exact(knowledge_base)
            }
        }
    }

    /// Engine comparing skills by normalized text only
    pub fn exact(knowledge_base: Arc<SkillKnowledgeBase>) -> Result<Self> {
        Ok(Self {
            extractor: SkillExtractor::new(knowledge_base)?,
            equivalence: Equivalence::Exact(ExactEquivalence),
            model_name: None,
        })
    }

    /// Engine using `encoder` for semantic skill equivalence
    pub fn with_encoder(
        knowledge_base: Arc<SkillKnowledgeBase>,
        encoder: Arc<dyn Encoder>,
        cache_capacity: usize,
        threshold: f32,
    ) -> Result<Self> {
        Ok(Self {
            extractor: SkillExtractor::new(knowledge_base)?,
            equivalence: Equivalence::Semantic(SemanticMatcher::with_threshold(
                encoder,
                cache_capacity,
                threshold,
            )?),
            model_name: None,
        })
    }

    pub fn extract_skills(&self, text: &str) -> SkillSet {
        self.extractor.extract(text)
    }

    pub fn categorize_skills(&self, skills: &SkillSet) -> BTreeMap<Category, Vec<String>> {
        self.extractor.categorize(skills)
    }

    pub fn calculate_match_score(
        &self,
        candidate_skills: &SkillSet,
        requirement_skills: &SkillSet,
    ) -> MatchAnalysis {
        calculate_match_score(candidate_skills, requirement_skills, self.equivalence.oracle())
    }

    pub fn generate_recommendations(&self, analysis: &MatchAnalysis) -> String {
        generate_recommendations(analysis)
    }

    /// Full pipeline over raw candidate and requirement text
    pub fn analyze(&self, candidate_text: &str, requirement_text: &str) -> MatchOutcome {
        let start_time = Instant::now();

        let candidate_skills = self.extract_skills(candidate_text);
        let requirement_skills = self.extract_skills(requirement_text);
        log::info!(
            "Extracted {} candidate skills and {} requirement skills",
            candidate_skills.len(),
            requirement_skills.len()
        );

        let analysis = self.calculate_match_score(&candidate_skills, &requirement_skills);
        let recommendations = self.generate_recommendations(&analysis);

        MatchOutcome {
            candidate_skills,
            requirement_skills,
            analysis,
            recommendations,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    /// Rank `(id, text)` candidates against a requirement text
    pub fn rank(
        &self,
        requirement_text: &str,
        candidates: &[(String, String)],
        limit: usize,
    ) -> (SkillSet, Vec<RankedCandidate>) {
        let requirement_skills = self.extract_skills(requirement_text);
        let candidates: Vec<Candidate> = candidates
            .iter()
            .map(|(id, text)| Candidate {
                id: id.clone(),
                skills: self.extract_skills(text),
            })
            .collect();

        let ranked = rank_candidates(
            &requirement_skills,
            &candidates,
            self.equivalence.oracle(),
            limit,
        );
        (requirement_skills, ranked)
    }

    pub fn is_semantic(&self) -> bool {
        matches!(self.equivalence, Equivalence::Semantic(_))
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        match &self.equivalence {
            Equivalence::Semantic(matcher) => Some(matcher.cache().stats()),
            Equivalence::Exact(_) => None,
        }
    }

    pub fn knowledge_base(&self) -> &SkillKnowledgeBase {
        self.extractor.knowledge_base()
    }
}
