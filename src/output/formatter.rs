//! Console, JSON and Markdown rendering of reports

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Result, SkillMatcherError};
use crate::output::report::{CategorizedSkills, MatchReport, RankingReport, SkillReport};
use crate::processing::recommendations::RecommendationTier;
use colored::{Color, Colorize};
use std::fmt::Write as _;
use std::path::Path;

pub trait ReportFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String>;
    fn format_ranking(&self, report: &RankingReport) -> Result<String>;
    fn format_skills(&self, report: &SkillReport) -> Result<String>;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for a requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn write_err(e: std::fmt::Error) -> SkillMatcherError {
    SkillMatcherError::OutputFormatting(e.to_string())
}

fn joined(skills: &[String]) -> String {
    if skills.is_empty() {
        "none".to_string()
    } else {
        skills.join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, tier: RecommendationTier) -> String {
        let (badge, color) = match tier {
            RecommendationTier::Excellent => ("EXCELLENT", Color::Green),
            RecommendationTier::Good => ("GOOD", Color::BrightGreen),
            RecommendationTier::Average => ("AVERAGE", Color::Yellow),
            RecommendationTier::Low => ("LOW", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_categories(&self, out: &mut String, skills: &CategorizedSkills) -> Result<()> {
        if skills.is_empty() {
            writeln!(out, "  (no skills found)").map_err(write_err)?;
        }
        for (category, list) in skills {
            writeln!(out, "  {:<12} {}", format!("{}:", category), list.join(", "))
                .map_err(write_err)?;
        }
        Ok(())
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut out = String::new();

        out.push_str(&self.format_header("SKILL MATCH ANALYSIS", 1));
        writeln!(
            out,
            "Resume: {} | Vacancy: {}",
            report.resume.label, report.vacancy.label
        )
        .map_err(write_err)?;
        writeln!(
            out,
            "Generated: {} | Processing time: {}ms",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        )
        .map_err(write_err)?;

        out.push_str(&self.format_header("Summary", 2));
        writeln!(
            out,
            "Overall Score: {:.1}% {}",
            analysis.total_score,
            self.format_score_badge(report.tier)
        )
        .map_err(write_err)?;
        writeln!(
            out,
            "  Skills coverage: {:.1}% | Extra bonus: +{:.1} | Critical penalty: -{:.1}",
            analysis.skills_score, analysis.extra_bonus, analysis.critical_penalty
        )
        .map_err(write_err)?;

        out.push_str(&self.format_header("Skills", 2));
        writeln!(
            out,
            "{} {}",
            self.colorize("✓ Matched:", Color::Green),
            joined(&analysis.matched_skills)
        )
        .map_err(write_err)?;
        writeln!(
            out,
            "{} {}",
            self.colorize("✗ Missing:", Color::Red),
            joined(&analysis.missing_skills)
        )
        .map_err(write_err)?;
        if !analysis.critical_missing.is_empty() {
            writeln!(
                out,
                "{} {}",
                self.colorize("! Critical:", Color::BrightRed),
                analysis.critical_missing.join(", ")
            )
            .map_err(write_err)?;
        }
        writeln!(
            out,
            "{} {}",
            self.colorize("+ Extra:", Color::Cyan),
            joined(&analysis.extra_skills)
        )
        .map_err(write_err)?;

        out.push_str(&self.format_header("Recommendations", 2));
        writeln!(out, "{}", self.colorize(&report.recommendations, Color::Cyan))
            .map_err(write_err)?;

        if self.detailed {
            out.push_str(&self.format_header("Resume skills by category", 3));
            self.format_categories(&mut out, &report.candidate_skills)?;
            out.push_str(&self.format_header("Vacancy skills by category", 3));
            self.format_categories(&mut out, &report.requirement_skills)?;

            out.push_str(&self.format_header("Sources", 3));
            writeln!(out, "Resume ({}): {}", report.resume.format, report.resume.preview)
                .map_err(write_err)?;
            writeln!(out, "Vacancy ({}): {}", report.vacancy.format, report.vacancy.preview)
                .map_err(write_err)?;

            out.push_str(&self.format_header("Engine", 3));
            writeln!(
                out,
                "Semantic model: {}",
                report.metadata.semantic_model.as_deref().unwrap_or("disabled")
            )
            .map_err(write_err)?;
            writeln!(out, "Known skills: {}", report.metadata.knowledge_base_skills)
                .map_err(write_err)?;
            if let Some(stats) = &report.metadata.cache_stats {
                writeln!(
                    out,
                    "Embedding cache: {}/{} entries, {} hits, {} misses",
                    stats.cache_size, stats.capacity, stats.hits, stats.misses
                )
                .map_err(write_err)?;
            }
        }

        Ok(out)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut out = String::new();

        out.push_str(&self.format_header("CANDIDATE RANKING", 1));
        writeln!(
            out,
            "Vacancy: {} | Requirements: {}",
            report.vacancy.label,
            joined(&report.requirement_skills)
        )
        .map_err(write_err)?;
        writeln!(
            out,
            "Showing {} of {} candidates",
            report.candidates.len(),
            report.total_candidates
        )
        .map_err(write_err)?;
        out.push('\n');

        for entry in &report.candidates {
            writeln!(
                out,
                "{:>3}. {:<32} {:>5.1}% {}  matched {}, missing {}, extra {}",
                entry.rank,
                entry.candidate,
                entry.total_score,
                self.format_score_badge(entry.tier),
                entry.matched,
                entry.missing,
                entry.extra
            )
            .map_err(write_err)?;
            if self.detailed && !entry.critical_missing.is_empty() {
                writeln!(
                    out,
                    "       {} {}",
                    self.colorize("critical missing:", Color::Red),
                    entry.critical_missing.join(", ")
                )
                .map_err(write_err)?;
            }
        }

        Ok(out)
    }

    fn format_skills(&self, report: &SkillReport) -> Result<String> {
        let mut out = String::new();

        out.push_str(&self.format_header(&format!("SKILLS IN {}", report.source.label), 1));
        match &report.categories {
            Some(categories) => self.format_categories(&mut out, categories)?,
            None => {
                writeln!(out, "{}", joined(&report.skills)).map_err(write_err)?;
            }
        }
        writeln!(out, "\nTotal: {} skills", report.skills.len()).map_err(write_err)?;

        Ok(out)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String> {
        self.render(report)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        self.render(report)
    }

    fn format_skills(&self, report: &SkillReport) -> Result<String> {
        self.render(report)
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(tier: RecommendationTier) -> &'static str {
        match tier {
            RecommendationTier::Excellent => "🟢 Excellent",
            RecommendationTier::Good => "🟡 Good",
            RecommendationTier::Average => "🟠 Average",
            RecommendationTier::Low => "🔴 Low",
        }
    }

    fn category_table(out: &mut String, skills: &CategorizedSkills) -> Result<()> {
        out.push_str("| Category | Skills |\n|----------|--------|\n");
        for (category, list) in skills {
            writeln!(out, "| {} | {} |", category, list.join(", ")).map_err(write_err)?;
        }
        out.push('\n');
        Ok(())
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format_match(&self, report: &MatchReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut out = String::from("# Skill Match Report\n\n");

        if self.include_metadata {
            writeln!(
                out,
                "**Generated:** {} | **Processing Time:** {}ms",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            )
            .map_err(write_err)?;
            writeln!(
                out,
                "**Resume:** `{}` | **Vacancy:** `{}`\n",
                report.resume.label, report.vacancy.label
            )
            .map_err(write_err)?;
        }

        out.push_str("## Summary\n\n");
        writeln!(
            out,
            "**Overall Score:** {:.1}% {}\n",
            analysis.total_score,
            Self::markdown_score_badge(report.tier)
        )
        .map_err(write_err)?;
        out.push_str("| Component | Value |\n|-----------|-------|\n");
        writeln!(out, "| Skills coverage | {:.1}% |", analysis.skills_score).map_err(write_err)?;
        writeln!(out, "| Extra skill bonus | +{:.1} |", analysis.extra_bonus).map_err(write_err)?;
        writeln!(out, "| Critical penalty | -{:.1} |\n", analysis.critical_penalty)
            .map_err(write_err)?;

        out.push_str("## Skills\n\n");
        writeln!(out, "- **Matched:** {}", joined(&analysis.matched_skills)).map_err(write_err)?;
        writeln!(out, "- **Missing:** {}", joined(&analysis.missing_skills)).map_err(write_err)?;
        writeln!(
            out,
            "- **Critical missing:** {}",
            joined(&analysis.critical_missing)
        )
        .map_err(write_err)?;
        writeln!(out, "- **Extra:** {}\n", joined(&analysis.extra_skills)).map_err(write_err)?;

        out.push_str("## Recommendations\n\n");
        writeln!(out, "{}\n", report.recommendations).map_err(write_err)?;

        out.push_str("## Resume Skills by Category\n\n");
        Self::category_table(&mut out, &report.candidate_skills)?;
        out.push_str("## Vacancy Skills by Category\n\n");
        Self::category_table(&mut out, &report.requirement_skills)?;

        if self.include_metadata {
            out.push_str("---\n\n");
            writeln!(
                out,
                "*Semantic model: {} | Known skills: {}*",
                report.metadata.semantic_model.as_deref().unwrap_or("disabled"),
                report.metadata.knowledge_base_skills
            )
            .map_err(write_err)?;
        }

        Ok(out)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut out = String::from("# Candidate Ranking\n\n");

        writeln!(
            out,
            "**Vacancy:** `{}` | **Requirements:** {}\n",
            report.vacancy.label,
            joined(&report.requirement_skills)
        )
        .map_err(write_err)?;
        out.push_str("| Rank | Candidate | Score | Tier | Matched | Missing | Extra |\n");
        out.push_str("|------|-----------|-------|------|---------|---------|-------|\n");
        for entry in &report.candidates {
            writeln!(
                out,
                "| {} | {} | {:.1}% | {} | {} | {} | {} |",
                entry.rank,
                entry.candidate,
                entry.total_score,
                Self::markdown_score_badge(entry.tier),
                entry.matched,
                entry.missing,
                entry.extra
            )
            .map_err(write_err)?;
        }
        writeln!(
            out,
            "\n*{} of {} candidates shown*",
            report.candidates.len(),
            report.total_candidates
        )
        .map_err(write_err)?;

        Ok(out)
    }

    fn format_skills(&self, report: &SkillReport) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "# Skills in `{}`\n", report.source.label).map_err(write_err)?;

        match &report.categories {
            Some(categories) => Self::category_table(&mut out, categories)?,
            None => {
                for skill in &report.skills {
                    writeln!(out, "- {}", skill).map_err(write_err)?;
                }
            }
        }

        Ok(out)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, config.detailed, true, true)
    }

    fn formatter(&self, format: OutputFormat) -> &dyn ReportFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_match(&self, report: &MatchReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_match(report)
    }

    pub fn generate_ranking(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_ranking(report)
    }

    pub fn generate_skills(&self, report: &SkillReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_skills(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_match{}.{}", base_name, timestamp_suffix, extension)
}
