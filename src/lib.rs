//! Skill matcher library: skill extraction, semantic skill equivalence and
//! resume/vacancy match scoring

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{Result, SkillMatcherError};
pub use processing::engine::{MatchEngine, MatchOutcome};
pub use processing::extractor::{SkillExtractor, SkillSet};
pub use processing::knowledge_base::SkillKnowledgeBase;
pub use processing::match_analyzer::{calculate_match_score, MatchAnalysis};
pub use processing::recommendations::generate_recommendations;
