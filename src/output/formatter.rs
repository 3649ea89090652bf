//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeAnalyzerError};
use crate::output::report::AnalysisReport;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal rendering
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// Plain text, suitable for the downloadable `.txt` file
pub struct TextFormatter;

pub struct JsonFormatter {
    pretty: bool,
}

pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    text_formatter: TextFormatter,
    json_formatter: JsonFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".blue().bold(), title.blue().bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let meta = &report.metadata;
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME ANALYSIS"));
        output.push_str(&format!(
            "Role: {} | Experience: {} | Domain: {}\n",
            meta.designation, meta.experience, meta.domain
        ));
        output.push_str(&self.colorize(
            &format!(
                "Model: {} | Chunks: {}{} | {}ms\n",
                meta.model,
                meta.chunk_count,
                if meta.merged { " (merged)" } else { "" },
                meta.processing_time_ms
            ),
            Color::BrightBlack,
        ));

        if let Some(score) = report.score {
            output.push_str(&format!("\n🎯 Score: {}/100 {}\n", score, self.format_score_badge(score)));
        }

        if !report.strengths.is_empty() {
            output.push_str(&self.format_header("💪 Strengths"));
            for item in &report.strengths {
                output.push_str(&format!("  {} {}\n", self.colorize("+", Color::Green), item));
            }
        }

        if !report.improvements.is_empty() {
            output.push_str(&self.format_header("🔧 Areas to Improve"));
            for item in &report.improvements {
                output.push_str(&format!("  {} {}\n", self.colorize("-", Color::Yellow), item));
            }
        }

        output.push_str(&self.format_header("📝 Full Analysis"));
        output.push_str(&report.analysis);
        output.push('\n');

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl OutputFormatter for TextFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let meta = &report.metadata;
        let mut output = String::new();

        output.push_str("Resume Analysis\n");
        output.push_str("===============\n\n");
        output.push_str(&format!("Designation: {}\n", meta.designation));
        output.push_str(&format!("Experience: {}\n", meta.experience));
        output.push_str(&format!("Domain: {}\n", meta.domain));
        output.push_str(&format!("Model: {}\n", meta.model));
        output.push_str(&format!("Generated: {}\n\n", meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")));
        output.push_str(report.analysis.trim());
        output.push('\n');

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        json.map_err(|e| ResumeAnalyzerError::OutputFormatting(format!("JSON serialization failed: {}", e)))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            text_formatter: TextFormatter,
            json_formatter: JsonFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Text => self.text_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(true)
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

/// Where to write the saved report, if anywhere. An explicit `--save` path is
/// a file unless it is an existing directory or ends with a separator. The
/// configured output directory is always a directory, created on save.
pub fn resolve_save_path(
    save: Option<&Path>,
    output_dir: Option<&Path>,
    format: OutputFormat,
    resume: &Path,
) -> Option<PathBuf> {
    let file_name = || suggest_filename(format, &resume.to_string_lossy(), true);

    match (save, output_dir) {
        (Some(save), _) => {
            let looks_like_dir = save.is_dir() || save.to_string_lossy().ends_with(std::path::MAIN_SEPARATOR);
            if looks_like_dir {
                Some(save.join(file_name()))
            } else {
                Some(save.to_path_buf())
            }
        }
        (None, Some(dir)) => Some(dir.join(file_name())),
        (None, None) => None,
    }
}

/// Console output is saved as plain text; the other formats keep their own extension.
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

    match format {
        OutputFormat::Console | OutputFormat::Text => format!("{}_analysis{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_analysis{}.json", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::ReportMetadata;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn report() -> AnalysisReport {
        let metadata = ReportMetadata {
            designation: "Frontend Developer".to_string(),
            experience: "Junior".to_string(),
            domain: "EdTech".to_string(),
            model: "gemma2-9b-it".to_string(),
            chunk_count: 2,
            merged: true,
            resume_characters: 4100,
            generated_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            processing_time_ms: 2300,
        };
        AnalysisReport::from_analysis(
            "Strengths:\n- React portfolio\n\nAreas to Improve:\n- Add testing experience\n\nScore: 81/100".to_string(),
            metadata,
        )
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_report(&report()).unwrap();
        assert!(output.contains("Score: 81/100 [VERY GOOD]"));
        assert!(output.contains("  + React portfolio"));
        assert!(output.contains("  - Add testing experience"));
        assert!(output.contains("Chunks: 2 (merged)"));
    }

    #[test]
    fn test_text_format_is_plain() {
        let output = TextFormatter.format_report(&report()).unwrap();
        assert!(output.starts_with("Resume Analysis\n"));
        assert!(output.contains("Designation: Frontend Developer"));
        assert!(output.contains("Generated: 2024-03-01 09:30:00 UTC"));
        assert!(output.trim_end().ends_with("Score: 81/100"));
        assert!(!output.contains('\u{1b}'));
        assert_eq!(TextFormatter.supports_format(), OutputFormat::Text);
    }

    #[test]
    fn test_json_round_trips_fields() {
        let output = ReportGenerator::new(false).generate_report(&report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["score"], 81);
        assert_eq!(value["metadata"]["chunk_count"], 2);
        assert_eq!(value["strengths"][0], "React portfolio");
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Text, "/tmp/jane_cv.pdf", false), "jane_cv_analysis.txt");
        assert_eq!(suggest_filename(OutputFormat::Console, "jane_cv.docx", false), "jane_cv_analysis.txt");
        assert_eq!(suggest_filename(OutputFormat::Json, "jane_cv.docx", false), "jane_cv_analysis.json");
        assert!(suggest_filename(OutputFormat::Text, "cv.pdf", true).starts_with("cv_analysis_"));
    }

    #[test]
    fn test_configured_output_dir_is_always_a_directory() {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("reports");

        let path = resolve_save_path(None, Some(reports.as_path()), OutputFormat::Text, Path::new("cv.pdf")).unwrap();
        assert_eq!(path.parent(), Some(reports.as_path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("cv_analysis_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_explicit_save_path() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("out.json");
        let resume = Path::new("cv.docx");

        assert_eq!(
            resolve_save_path(Some(file.as_path()), Some(dir.path()), OutputFormat::Json, resume),
            Some(file.clone())
        );

        let existing = resolve_save_path(Some(dir.path()), None, OutputFormat::Json, resume).unwrap();
        assert_eq!(existing.parent(), Some(dir.path()));
        assert!(existing.to_string_lossy().ends_with(".json"));

        assert_eq!(resolve_save_path(None, None, OutputFormat::Text, resume), None);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("cv_analysis.txt");
        save_report_to_file("hello", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
