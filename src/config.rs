//! Configuration management for the skill matcher
//!
//! Only operational settings live here. Scoring constants are fixed and
//! defined in [`crate::processing::thresholds`].

use crate::error::{Result, SkillMatcherError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub semantic: SemanticConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// HuggingFace repo id or local directory of a Model2Vec model
    pub embedding_model: String,
    pub models_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticConfig {
    pub enabled: bool,
    pub equivalence_threshold: f32,
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub enable_cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skill-matcher")
            .join("models");

        Self {
            models: ModelConfig {
                embedding_model: "minishlab/potion-multilingual-128M".to_string(),
                models_dir,
            },
            semantic: SemanticConfig {
                enabled: true,
                equivalence_threshold: 0.75,
                cache_capacity: 1024,
            },
            input: InputConfig { enable_cache: true },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load an explicitly named file, or defaults when it does not exist yet.
    /// Nothing is written; `config reset` creates the file.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let threshold = self.semantic.equivalence_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(SkillMatcherError::Configuration(format!(
                "semantic.equivalence_threshold must be in (0, 1], got {}",
                threshold
            )));
        }
        if self.semantic.cache_capacity == 0 {
            return Err(SkillMatcherError::Configuration(
                "semantic.cache_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-matcher")
            .join("config.toml")
    }

    /// Resolve the embedding model: a downloaded copy under `models_dir` wins
    /// over the hub id.
    pub fn embedding_model_location(&self) -> PathBuf {
        let local_path = self.models.models_dir.join(&self.models.embedding_model);
        if local_path.exists() {
            local_path
        } else {
            PathBuf::from(&self.models.embedding_model)
        }
    }
}
