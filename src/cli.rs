//! CLI interface for the skill matcher

use crate::config::OutputFormat;
use crate::processing::thresholds::DEFAULT_RANKING_LIMIT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skill-matcher")]
#[command(about = "Match resumes against vacancies by extracted skills")]
#[command(
    long_about = "Extract skills from resumes and vacancies (English and Russian), compare them \
                  with optional semantic equivalence, and score the match with tiered recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a vacancy
    Match {
        /// Path to resume file (TXT, MD, PDF)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to vacancy file (TXT, MD, PDF)
        #[arg(short = 'j', long)]
        vacancy: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,

        /// Save output to a file, or into a directory with a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Compare skills by text only, without the embedding model
        #[arg(long)]
        no_semantic: bool,

        /// Include per-category skills, source previews and engine details
        #[arg(short, long)]
        detailed: bool,
    },

    /// List the skills found in one document
    Extract {
        /// Path to the document (TXT, MD, PDF)
        file: PathBuf,

        /// Group skills by category
        #[arg(long)]
        categorize: bool,

        /// Output format: console, json, markdown
        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,
    },

    /// Rank several resumes against one vacancy
    Rank {
        /// Path to vacancy file
        #[arg(short = 'j', long)]
        vacancy: PathBuf,

        /// Resume files to rank
        #[arg(required = true)]
        candidates: Vec<PathBuf>,

        /// Maximum number of candidates to show
        #[arg(short, long, default_value_t = DEFAULT_RANKING_LIMIT)]
        limit: usize,

        /// Output format: console, json, markdown
        #[arg(short, long, value_parser = parse_output_format)]
        output: Option<OutputFormat>,

        /// Compare skills by text only, without the embedding model
        #[arg(long)]
        no_semantic: bool,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_match_command_parses() {
        let cli = Cli::try_parse_from([
            "skill-matcher",
            "match",
            "--resume",
            "cv.pdf",
            "--vacancy",
            "job.md",
            "--output",
            "json",
            "--no-semantic",
        ])
        .unwrap();

        match cli.command {
            Commands::Match {
                resume,
                output,
                no_semantic,
                ..
            } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert_eq!(output, Some(OutputFormat::Json));
                assert!(no_semantic);
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_rank_requires_candidates() {
        assert!(Cli::try_parse_from(["skill-matcher", "rank", "--vacancy", "job.txt"]).is_err());

        let cli = Cli::try_parse_from([
            "skill-matcher",
            "rank",
            "--vacancy",
            "job.txt",
            "a.txt",
            "b.md",
        ])
        .unwrap();
        match cli.command {
            Commands::Rank { candidates, limit, .. } => {
                assert_eq!(candidates.len(), 2);
                assert_eq!(limit, DEFAULT_RANKING_LIMIT);
            }
            _ => panic!("expected rank command"),
        }
    }
}
