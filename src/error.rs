//! Error handling for the skill matcher
//!
//! Errors surface only while building components (knowledge base, encoder,
//! configuration) and during file I/O. Scoring itself is infallible.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillMatcherError {
    /// The skill catalog is inconsistent; the process cannot start
    #[error("Knowledge base error: {0}")]
    KnowledgeBase(String),

    /// The encoder could not be loaded or produced an unusable vector
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SkillMatcherError>;

impl From<anyhow::Error> for SkillMatcherError {
    fn from(err: anyhow::Error) -> Self {
        SkillMatcherError::Processing(err.to_string())
    }
}

impl From<toml::de::Error> for SkillMatcherError {
    fn from(err: toml::de::Error) -> Self {
        SkillMatcherError::Configuration(format!("Failed to parse config: {}", err))
    }
}

impl From<toml::ser::Error> for SkillMatcherError {
    fn from(err: toml::ser::Error) -> Self {
        SkillMatcherError::Configuration(format!("Failed to serialize config: {}", err))
    }
}
