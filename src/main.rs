//! Resume analyzer: LLM-powered resume analysis tool

use clap::Parser;
use log::{debug, error, info, warn};
use resume_analyzer::cli::{self, Cli, Commands, ConfigAction, PromptAction};
use resume_analyzer::config::{Config, OutputFormat};
use resume_analyzer::error::{Result, ResumeAnalyzerError};
use resume_analyzer::input::InputManager;
use resume_analyzer::llm::{GroqClient, PromptStore};
use resume_analyzer::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_analyzer::processing::{AnalysisTarget, ResumeAnalyzer};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            designation,
            experience,
            domain,
            model,
            temperature,
            prompts,
            output,
            save,
            show_text,
        } => {
            cli::validate_file_extension(&resume, cli::SUPPORTED_RESUME_EXTENSIONS)
                .map_err(|e| ResumeAnalyzerError::InvalidInput(format!("Resume file: {}", e)))?;

            let output_format = match output {
                Some(output) => cli::parse_output_format(&output).map_err(ResumeAnalyzerError::InvalidInput)?,
                None => config.output.format,
            };

            // Credential and prompts are resolved before any work so a bad setup fails fast
            let api_key = config.api_key()?;
            let prompt_file = prompts.or_else(|| config.prompts.file.clone());
            let prompt_store = PromptStore::load(prompt_file.as_deref())?;

            let client = GroqClient::new(
                &config.api.base_url,
                api_key,
                Duration::from_secs(config.api.timeout_secs),
            )?;
            debug!("Chat completions endpoint: {}", client.endpoint());

            let mut analyzer = ResumeAnalyzer::from_config(&config, Arc::new(client), prompt_store)?;
            if let Some(model) = model {
                analyzer = analyzer.with_model(model);
            }
            if let Some(temperature) = temperature {
                analyzer = analyzer.with_temperature(temperature);
            }

            println!("🚀 Resume analysis");
            println!("📄 Resume: {}", resume.display());
            println!("💼 Target: {} | {} | {}", designation, experience, domain);
            println!("🤖 Model: {}", analyzer.model_identifier());

            println!("\n📂 Extracting text...");
            let resume_text = InputManager::new().extract_text(&resume).await?;
            println!("Resume text length: {} characters", resume_text.chars().count());

            if resume_text.trim().is_empty() {
                warn!("No text extracted from {}", resume.display());
                println!("⚠️  No text could be extracted from the resume, nothing to analyze.");
                return Ok(());
            }

            if show_text {
                println!("\n📄 Extracted Text:\n{}", resume_text);
            }

            println!("\n🔍 Analyzing resume...");
            let target = AnalysisTarget::new(designation, experience, domain);
            let report = analyzer.analyze_resume_report(&resume_text, &target).await?;
            info!(
                "Analysis finished in {}ms over {} chunk(s)",
                report.metadata.processing_time_ms, report.metadata.chunk_count
            );

            if report.is_empty() {
                warn!("Model returned an empty analysis");
            }

            let generator = ReportGenerator::new(config.output.color_output);
            println!("{}", generator.generate_report(&report, output_format)?);

            let file_format = match output_format {
                OutputFormat::Json => OutputFormat::Json,
                _ => OutputFormat::Text,
            };
            let save_path = resolve_save_path(
                save.as_deref(),
                config.output.output_dir.as_deref(),
                file_format,
                &resume,
            );
            if let Some(target_path) = save_path {
                let content = generator.generate_report(&report, file_format)?;
                save_report_to_file(&content, &target_path)?;
                println!("💾 Analysis saved to {}", target_path.display());
            }
        }

        Commands::Extract { file } => {
            cli::validate_file_extension(&file, cli::SUPPORTED_RESUME_EXTENSIONS)
                .map_err(|e| ResumeAnalyzerError::InvalidInput(format!("Resume file: {}", e)))?;

            let text = InputManager::new().extract_text(&file).await?;
            println!("Extracted Text:");
            println!("{}", text);
        }

        Commands::Prompts { action } => match action {
            PromptAction::List { prompts } => {
                let prompt_file = prompts.or_else(|| config.prompts.file.clone());
                let store = PromptStore::load(prompt_file.as_deref())?;
                println!("📚 Prompt Templates\n");
                for (key, template) in store.iter() {
                    println!("  • {}", key);
                    if !template.description.is_empty() {
                        println!("    {}", template.description);
                    }
                }
            }

            PromptAction::Show { key, prompts } => {
                let prompt_file = prompts.or_else(|| config.prompts.file.clone());
                let store = PromptStore::load(prompt_file.as_deref())?;
                let template = store.get(&key)?;
                println!("📋 {}\n", key);
                if !template.description.is_empty() {
                    println!("{}\n", template.description);
                }
                println!("{}", template.template);
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("API Base URL: {}", config.api.base_url);
                println!("Model: {}", config.api.model);
                println!("Temperature: {}", config.api.temperature);
                println!("Timeout: {}s", config.api.timeout_secs);
                println!("API Key Variable: {}", config.api.api_key_env);
                println!("\nAnalysis:");
                println!("  Chunk Size: {} characters", config.analysis.chunk_size);
                println!("  Max Output Tokens: {}", config.analysis.max_output_tokens);
                println!("  Max Concurrent Requests: {}", config.analysis.max_concurrent_requests);
                if let Some(file) = &config.prompts.file {
                    println!("\nPrompts File: {}", file.display());
                }
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}
