//! Error handling for the resume analyzer application

use crate::llm::client::LlmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeAnalyzerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("Prompt rendering error: {0}")]
    PromptRender(String),

    #[error("Model call failed: {0}")]
    ModelCall(#[from] LlmError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeAnalyzerError>;

/// Blocking extraction tasks that panic or get cancelled surface as extraction failures
impl From<tokio::task::JoinError> for ResumeAnalyzerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ResumeAnalyzerError::Extraction(format!("extraction task failed: {}", err))
    }
}

impl From<toml::de::Error> for ResumeAnalyzerError {
    fn from(err: toml::de::Error) -> Self {
        ResumeAnalyzerError::Configuration(format!("Failed to parse config: {}", err))
    }
}
