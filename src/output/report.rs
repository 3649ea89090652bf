//! Report structures built from the model's analysis text

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The final analysis together with what could be parsed out of it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Full text returned by the model
    pub analysis: String,

    /// Overall score on a 0-100 scale, when the model stated one
    pub score: Option<u8>,

    /// Bullet points listed under a strengths heading
    pub strengths: Vec<String>,

    /// Bullet points listed under an improvement/weakness heading
    pub improvements: Vec<String>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub designation: String,
    pub experience: String,
    pub domain: String,
    pub model: String,
    pub chunk_count: usize,
    pub merged: bool,
    pub resume_characters: usize,
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Strengths,
    Improvements,
    Other,
}

impl AnalysisReport {
    pub fn from_analysis(analysis: String, metadata: ReportMetadata) -> Self {
        let parser = SectionParser::new();
        let score = parser.extract_score(&analysis);
        let (strengths, improvements) = parser.extract_sections(&analysis);

        Self {
            analysis,
            score,
            strengths,
            improvements,
            metadata,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.analysis.trim().is_empty()
    }
}

struct SectionParser {
    score: Regex,
    bullet: Regex,
    markdown_heading: Regex,
    bold_heading: Regex,
    label_heading: Regex,
}

impl SectionParser {
    fn new() -> Self {
        Self {
            score: Regex::new(r"(?i)\bscore\b[^\d\n]{0,30}(\d{1,3}(?:\.\d+)?)(?:\s*(?:/|out of)\s*(\d{1,3}))?")
                .expect("Invalid score regex"),
            bullet: Regex::new(r"^(?:[-*•]|\d{1,2}[.)])\s+(.+)$").expect("Invalid bullet regex"),
            markdown_heading: Regex::new(r"^#{1,6}\s*(.+)$").expect("Invalid heading regex"),
            bold_heading: Regex::new(r"^\*\*(.+?)\*\*:?$").expect("Invalid bold heading regex"),
            label_heading: Regex::new(r"^([A-Za-z][A-Za-z0-9 /&'()-]{0,40}):").expect("Invalid label regex"),
        }
    }

    /// First "score ... N" or "score ... N/D" in the text, normalized to 0-100.
    /// Fractional values such as `7.5/10` are rounded after scaling.
    fn extract_score(&self, text: &str) -> Option<u8> {
        for caps in self.score.captures_iter(text) {
            let value: f64 = match caps[1].parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            let scaled = match caps.get(2).and_then(|d| d.as_str().parse::<f64>().ok()) {
                Some(denominator) if denominator > 0.0 && value <= denominator => value * 100.0 / denominator,
                Some(_) => continue,
                None => value,
            };
            let rounded = scaled.round();
            if rounded <= 100.0 {
                return Some(rounded as u8);
            }
        }
        None
    }

    fn extract_sections(&self, text: &str) -> (Vec<String>, Vec<String>) {
        let mut strengths = Vec::new();
        let mut improvements = Vec::new();
        let mut current = Section::Other;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.bullet.captures(line) {
                let item = caps[1].replace("**", "").trim().to_string();
                match current {
                    Section::Strengths => strengths.push(item),
                    Section::Improvements => improvements.push(item),
                    Section::Other => {}
                }
                continue;
            }

            if let Some(title) = self.heading_title(line) {
                current = classify_heading(&title);
            }
        }

        (strengths, improvements)
    }

    fn heading_title(&self, line: &str) -> Option<String> {
        [&self.markdown_heading, &self.bold_heading, &self.label_heading]
            .iter()
            .find_map(|re| re.captures(line).map(|caps| caps[1].trim().to_string()))
    }
}

fn classify_heading(title: &str) -> Section {
    let lower = title.to_lowercase();
    if lower.contains("strength") {
        Section::Strengths
    } else if lower.contains("improve") || lower.contains("weakness") {
        Section::Improvements
    } else {
        Section::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            designation: "Backend Engineer".to_string(),
            experience: "2 years".to_string(),
            domain: "E-commerce".to_string(),
            model: "gemma2-9b-it".to_string(),
            chunk_count: 1,
            merged: false,
            resume_characters: 1200,
            generated_at: Utc::now(),
            processing_time_ms: 850,
        }
    }

    #[test]
    fn test_plain_headings() {
        let text = "Strengths:\n- Strong Rust experience\n- Open source work\n\nAreas to Improve:\n1. Quantify impact\n2) Add a summary\n\nScore: 78/100\n- Solid profile overall";
        let report = AnalysisReport::from_analysis(text.to_string(), metadata());

        assert_eq!(report.score, Some(78));
        assert_eq!(report.strengths, vec!["Strong Rust experience", "Open source work"]);
        assert_eq!(report.improvements, vec!["Quantify impact", "Add a summary"]);
    }

    #[test]
    fn test_markdown_headings() {
        let text = "## Key Strengths\n* **Leadership** of a 5 person team\n\n**Weaknesses**\n- No cloud certifications\n\n### Verdict\nOverall score: 65 out of 100.";
        let report = AnalysisReport::from_analysis(text.to_string(), metadata());

        assert_eq!(report.strengths, vec!["Leadership of a 5 person team"]);
        assert_eq!(report.improvements, vec!["No cloud certifications"]);
        assert_eq!(report.score, Some(65));
    }

    #[test]
    fn test_score_scaled_from_ten() {
        let report = AnalysisReport::from_analysis("Score: 7/10".to_string(), metadata());
        assert_eq!(report.score, Some(70));
    }

    #[test]
    fn test_fractional_scores_are_rounded() {
        let report = AnalysisReport::from_analysis("Score: 7.5/10".to_string(), metadata());
        assert_eq!(report.score, Some(75));

        let report = AnalysisReport::from_analysis("Final score: 82.6".to_string(), metadata());
        assert_eq!(report.score, Some(83));

        let report = AnalysisReport::from_analysis("Score: 3.3 out of 5".to_string(), metadata());
        assert_eq!(report.score, Some(66));
    }

    #[test]
    fn test_blank_analysis_is_empty() {
        let report = AnalysisReport::from_analysis("  \n ".to_string(), metadata());
        assert!(report.is_empty());
        assert_eq!(report.score, None);
    }

    #[test]
    fn test_out_of_range_score_ignored() {
        let report = AnalysisReport::from_analysis("Score: 450 points".to_string(), metadata());
        assert_eq!(report.score, None);
    }

    #[test]
    fn test_no_score_or_sections() {
        let report = AnalysisReport::from_analysis("The resume looks fine.".to_string(), metadata());
        assert_eq!(report.score, None);
        assert!(report.strengths.is_empty());
        assert!(report.improvements.is_empty());
        assert!(!report.is_empty());
    }
}
