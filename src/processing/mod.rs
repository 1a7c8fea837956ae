//! Skill extraction, equivalence and match scoring

pub mod thresholds;
pub mod knowledge_base;
pub mod extractor;
pub mod embeddings;
pub mod semantic;
pub mod match_analyzer;
pub mod recommendations;
pub mod ranking;
pub mod engine;

