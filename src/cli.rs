//! CLI interface for the resume analyzer

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-analyzer")]
#[command(about = "LLM-powered resume analysis tool")]
#[command(long_about = "Extract text from a PDF or DOCX resume, analyze it against a target role with a hosted LLM, and report strengths, areas to improve and a score")]
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
    /// Analyze a resume for a target role
    Analyze {
        /// Path to resume file (PDF, DOCX)
        #[arg(short, long)]
        resume: PathBuf,

        /// Target designation, e.g. "Backend Engineer"
        #[arg(short, long)]
        designation: String,

        /// Experience level, e.g. "3-5 years"
        #[arg(short, long)]
        experience: String,

        /// Industry or domain, e.g. "Fintech"
        #[arg(long)]
        domain: String,

        /// Model identifier to use instead of the configured one
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature to use instead of the configured one
        #[arg(short, long)]
        temperature: Option<f32>,

        /// JSON file with prompt templates overriding the built-in ones
        #[arg(long)]
        prompts: Option<PathBuf>,

        /// Output format: console, text, json (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,

        /// Save the analysis to a file (a directory picks a default file name)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Print the extracted resume text before analyzing
        #[arg(long)]
        show_text: bool,
    },

    /// Extract and print the text of a resume without analyzing it
    Extract {
        /// Path to resume file (PDF, DOCX)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Inspect prompt templates
    Prompts {
        #[command(subcommand)]
        action: PromptAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptAction {
    /// List available prompt keys
    List {
        /// Additional prompt file to load
        #[arg(long)]
        prompts: Option<PathBuf>,
    },

    /// Show the template stored under a key
    Show {
        /// Prompt key
        key: String,

        /// Additional prompt file to load
        #[arg(long)]
        prompts: Option<PathBuf>,
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

pub const SUPPORTED_RESUME_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "text" | "txt" => Ok(crate::config::OutputFormat::Text),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, text, json", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
