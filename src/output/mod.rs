//! Report structures and their console, JSON and Markdown renderings

pub mod report;
pub mod formatter;

pub use formatter::{save_report_to_file, suggest_filename, ReportGenerator};
pub use report::{MatchReport, RankingReport, SkillReport};
