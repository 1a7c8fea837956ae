//! skill-matcher: resume and vacancy skill matching from the command line

use clap::Parser;
use log::{error, info};
use skill_matcher::cli::{Cli, Commands, ConfigAction};
use skill_matcher::config::{Config, OutputFormat};
use skill_matcher::error::Result;
use skill_matcher::input::InputManager;
use skill_matcher::output::{
    save_report_to_file, suggest_filename, MatchReport, RankingReport, ReportGenerator,
    SkillReport,
};
use skill_matcher::processing::engine::MatchEngine;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_or_default(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Match {
            resume,
            vacancy,
            output,
            save,
            no_semantic,
            detailed,
        } => {
            let format = output.unwrap_or(config.output.format);
            let mut input_manager = InputManager::new().with_cache(config.input.enable_cache);
            let resume_doc = input_manager.load(&resume).await?;
            let vacancy_doc = input_manager.load(&vacancy).await?;

            let engine = MatchEngine::from_config(&config, !no_semantic)?;
            info!("Scoring {} against {}", resume_doc.label(), vacancy_doc.label());
            let outcome = engine.analyze(&resume_doc.text, &vacancy_doc.text);
            let report = MatchReport::new(&engine, outcome, &resume_doc, &vacancy_doc);

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let content = generator.generate_match(&report, format)?;
            emit(&content, save.as_deref(), format, &resume_doc.label())?;
        }

        Commands::Extract {
            file,
            categorize,
            output,
        } => {
            let format = output.unwrap_or(config.output.format);
            let document = InputManager::new().load(&file).await?;

            // Extraction never consults the embedding model
            let engine = MatchEngine::from_config(&config, false)?;
            let skills = engine.extract_skills(&document.text);
            info!("Found {} skills in {}", skills.len(), document.label());

            let report = SkillReport::new(&engine, &document, &skills, categorize);
            let generator = ReportGenerator::from_config(&config.output);
            println!("{}", generator.generate_skills(&report, format)?);
        }

        Commands::Rank {
            vacancy,
            candidates,
            limit,
            output,
            no_semantic,
        } => {
            let format = output.unwrap_or(config.output.format);
            let mut input_manager = InputManager::new().with_cache(config.input.enable_cache);
            let vacancy_doc = input_manager.load(&vacancy).await?;
            let candidate_docs = input_manager.load_all(&candidates).await?;

            let engine = MatchEngine::from_config(&config, !no_semantic)?;
            let start_time = Instant::now();
            let texts: Vec<(String, String)> = candidate_docs
                .iter()
                .map(|doc| (doc.path.display().to_string(), doc.text.clone()))
                .collect();
            let (requirement_skills, ranked) = engine.rank(&vacancy_doc.text, &texts, limit);

            let report = RankingReport::new(
                &engine,
                &vacancy_doc,
                &requirement_skills,
                &ranked,
                candidate_docs.len(),
                start_time.elapsed().as_millis() as u64,
            );
            let generator = ReportGenerator::from_config(&config.output);
            println!("{}", generator.generate_ranking(&report, format)?);
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config)?;
                    println!("# {}\n{}", path.display(), content);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset to defaults: {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Print `content`, or write it to `save` (a file, or a directory that gets
/// a generated file name)
fn emit(content: &str, save: Option<&Path>, format: OutputFormat, source_name: &str) -> Result<()> {
    match save {
        Some(path) => {
            let target = if path.is_dir() {
                path.join(suggest_filename(format, source_name, true))
            } else {
                path.to_path_buf()
            };
            save_report_to_file(content, &target)?;
            info!("Report saved to {}", target.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
