//! Loading resume and vacancy documents from disk

use crate::error::{Result, SkillMatcherError};
use crate::input::file_detector::DocumentFormat;
use crate::input::text_extractor::extract_text;
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Text of one input document and where it came from
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub text: String,
}

impl SourceDocument {
    /// File name for display, falling back to the full path
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

pub struct InputManager {
    cache: HashMap<PathBuf, SourceDocument>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn load(&mut self, path: &Path) -> Result<SourceDocument> {
        if self.enable_cache {
            if let Some(cached) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.is_file() {
            return Err(SkillMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let format = DocumentFormat::detect(path)?;
        info!("Reading {} document: {}", format, path.display());
        let text = extract_text(path, format).await?;
        if text.is_empty() {
            warn!("No text found in {}", path.display());
        }

        let document = SourceDocument {
            path: path.to_path_buf(),
            format,
            text,
        };

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), document.clone());
        }

        Ok(document)
    }

    /// Load several documents, stopping at the first failure
    pub async fn load_all(&mut self, paths: &[PathBuf]) -> Result<Vec<SourceDocument>> {
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(self.load(path).await?);
        }
        Ok(documents)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
