//! Plain-text extraction from supported document formats

use crate::error::{Result, SkillMatcherError};
use crate::input::file_detector::DocumentFormat;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

/// Read `path` as `format` and return its text content
pub async fn extract_text(path: &Path, format: DocumentFormat) -> Result<String> {
    let text = match format {
        DocumentFormat::PlainText => fs::read_to_string(path).await?,
        DocumentFormat::Markdown => markdown_to_text(&fs::read_to_string(path).await?),
        DocumentFormat::Pdf => {
            let bytes = fs::read(path).await?;
            let display = path.display().to_string();
            // pdf-extract is CPU-bound and synchronous
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| SkillMatcherError::Processing(format!("PDF task failed: {}", e)))?
                .map_err(|e| {
                    SkillMatcherError::PdfExtraction(format!(
                        "Failed to extract text from PDF '{}': {}",
                        display, e
                    ))
                })?
        }
    };

    Ok(tidy_whitespace(&text))
}

/// Render markdown to its visible text, one block per line
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());

    for event in Parser::new(markdown) {
        match event {
            Event::Text(content) | Event::Code(content) => text.push_str(&content),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push('\n'),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
            _ => {}
        }
    }

    text
}

/// Trim each line, collapse inner runs of spaces and drop blank lines
pub fn tidy_whitespace(text: &str) -> String {
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let spaces = SPACES.get_or_init(|| Regex::new(r"[ \t\u{00A0}]+").expect("valid regex"));

    text.lines()
        .map(|line| spaces.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
