//! Document format detection by file extension

use crate::error::{Result, SkillMatcherError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    PlainText,
    Markdown,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "txt" | "text" => Some(DocumentFormat::PlainText),
            "md" | "markdown" => Some(DocumentFormat::Markdown),
            _ => None,
        }
    }

    /// Format of the file at `path`, judged by its extension only
    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                SkillMatcherError::UnsupportedFormat(format!(
                    "File has no extension: {}",
                    path.display()
                ))
            })?;

        Self::from_extension(extension).ok_or_else(|| {
            SkillMatcherError::UnsupportedFormat(format!(
                "'.{}' files are not supported ({}); use .txt, .md or .pdf",
                extension,
                path.display()
            ))
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::PlainText => "text",
            DocumentFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
