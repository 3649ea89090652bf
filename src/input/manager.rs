//! Input manager routing documents to the matching extractor

use crate::error::{Result, ResumeAnalyzerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{DocxExtractor, PdfExtractor, TextExtractor};
use log::{info, warn};
use std::path::Path;
use std::time::Duration;

const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(120);

pub struct InputManager {
    timeout: Duration,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_EXTRACTION_TIMEOUT,
        }
    }

    /// Extract text from a document on disk. Unsupported extensions yield
    /// an empty string rather than an error.
    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ResumeAnalyzerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        if file_type == FileType::Unknown {
            warn!("Unsupported file type, no text extracted: {}", path.display());
            return Ok(String::new());
        }

        let bytes = tokio::fs::read(path).await?;
        info!("Extracting text from {:?}: {} ({} bytes)", file_type, path.display(), bytes.len());
        self.extract_bytes(bytes, file_type).await
    }

    /// Extract text from an in-memory upload, dispatching on the file name's extension.
    pub async fn extract_upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<String> {
        let file_type = FileType::from_path(Path::new(file_name));
        if file_type == FileType::Unknown {
            warn!("Unsupported upload type, no text extracted: {}", file_name);
            return Ok(String::new());
        }
        self.extract_bytes(bytes, file_type).await
    }

    async fn extract_bytes(&self, bytes: Vec<u8>, file_type: FileType) -> Result<String> {
        let handle = tokio::task::spawn_blocking(move || match file_type {
            FileType::Pdf => PdfExtractor.extract(&bytes),
            FileType::Docx => DocxExtractor.extract(&bytes),
            FileType::Unknown => Ok(String::new()),
        });

        let text = match tokio::time::timeout(self.timeout, handle).await {
            Ok(joined) => joined??,
            Err(_) => {
                return Err(ResumeAnalyzerError::Extraction(format!(
                    "Text extraction timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        };

        info!("Extracted {} characters", text.chars().count());
        Ok(text)
    }
}
