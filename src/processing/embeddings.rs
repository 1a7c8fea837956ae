//! Text encoders used for skill-level semantic comparison

use crate::error::{Result, SkillMatcherError};
use model2vec_rs::model::StaticModel;
use std::path::Path;
use std::time::Instant;

/// Turns a piece of text into a fixed-dimension vector. Implementations must
/// be deterministic for identical input.
pub trait Encoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;
}

/// Encoder backed by a Model2Vec static model
pub struct Model2VecEncoder {
    model: StaticModel,
    model_name: String,
    dimension: usize,
}

impl Model2VecEncoder {
    /// Load from a local directory or a HuggingFace repo id
    pub fn load(repo_or_path: &Path) -> Result<Self> {
        let start_time = Instant::now();
        log::info!("Loading embedding model from: {}", repo_or_path.display());

        let model = StaticModel::from_pretrained(repo_or_path, None, None, None).map_err(|e| {
            SkillMatcherError::Embedding(format!(
                "Failed to load model '{}': {}",
                repo_or_path.display(),
                e
            ))
        })?;

        // Probe once to learn the output dimension
        let dimension = model.encode_single("probe").len();
        if dimension == 0 {
            return Err(SkillMatcherError::Embedding(format!(
                "Model '{}' produced empty embeddings",
                repo_or_path.display()
            )));
        }

        log::info!(
            "Embedding model loaded in {:.2?} ({} dimensions)",
            start_time.elapsed(),
            dimension
        );

        Ok(Self {
            model,
            model_name: repo_or_path.display().to_string(),
            dimension,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl Encoder for Model2VecEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.model.encode_single(text);
        if embedding.len() != self.dimension {
            return Err(SkillMatcherError::Embedding(format!(
                "Expected {} dimensions, got {} for '{}'",
                self.dimension,
                embedding.len(),
                text
            )));
        }
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(SkillMatcherError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}
