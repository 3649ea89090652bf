//! Resume analysis facade: prompt construction on top of the pipeline

use crate::config::Config;
use crate::error::Result;
use crate::llm::client::ChatModel;
use crate::llm::prompts::{PromptStore, COMBINE_RESULTS, RESUME_ANALYSIS};
use crate::output::report::{AnalysisReport, ReportMetadata};
use crate::processing::pipeline::{AnalysisPipeline, AnalysisRequest};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// The category values a user selects before running an analysis
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTarget {
    pub designation: String,
    pub experience: String,
    pub domain: String,
}

impl AnalysisTarget {
    pub fn new(designation: impl Into<String>, experience: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            designation: designation.into(),
            experience: experience.into(),
            domain: domain.into(),
        }
    }
}

pub struct ResumeAnalyzer {
    pipeline: AnalysisPipeline,
    prompts: PromptStore,
    model_identifier: String,
    max_output_tokens: u32,
    temperature: f32,
}

impl ResumeAnalyzer {
    pub fn new(
        pipeline: AnalysisPipeline,
        prompts: PromptStore,
        model_identifier: impl Into<String>,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            pipeline,
            prompts,
            model_identifier: model_identifier.into(),
            max_output_tokens,
            temperature,
        }
    }

    /// Wire up the pipeline from configuration. The combine instruction is
    /// resolved here so a prompt file without it fails before any model call.
    pub fn from_config(config: &Config, model: Arc<dyn ChatModel>, prompts: PromptStore) -> Result<Self> {
        let combine_instruction = prompts.get_prompt(COMBINE_RESULTS, &[])?;
        let pipeline = AnalysisPipeline::new(model, combine_instruction, config.analysis.chunk_size)
            .with_max_concurrency(config.analysis.max_concurrent_requests);

        Ok(Self::new(
            pipeline,
            prompts,
            config.api.model.clone(),
            config.analysis.max_output_tokens,
            config.api.temperature,
        ))
    }

    pub fn with_model(mut self, model_identifier: impl Into<String>) -> Self {
        self.model_identifier = model_identifier.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model_identifier(&self) -> &str {
        &self.model_identifier
    }

    pub async fn analyze_resume(&self, text: &str, designation: &str, experience: &str, domain: &str) -> Result<String> {
        let request = self.build_request(text, &AnalysisTarget::new(designation, experience, domain))?;
        self.pipeline.analyze(&request).await
    }

    /// Run the analysis and wrap the result with parsed sections and metadata.
    pub async fn analyze_resume_report(&self, text: &str, target: &AnalysisTarget) -> Result<AnalysisReport> {
        let start = Instant::now();
        let request = self.build_request(text, target)?;
        let output = self.pipeline.run(&request).await?;

        let metadata = ReportMetadata {
            designation: target.designation.clone(),
            experience: target.experience.clone(),
            domain: target.domain.clone(),
            model: self.model_identifier.clone(),
            chunk_count: output.chunk_count,
            merged: output.merged,
            resume_characters: text.chars().count(),
            generated_at: Utc::now(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        Ok(AnalysisReport::from_analysis(output.text, metadata))
    }

    fn build_request(&self, text: &str, target: &AnalysisTarget) -> Result<AnalysisRequest> {
        let prompt = self.prompts.get_prompt(
            RESUME_ANALYSIS,
            &[
                ("designation", target.designation.as_str()),
                ("experience", target.experience.as_str()),
                ("domain", target.domain.as_str()),
            ],
        )?;

        Ok(AnalysisRequest::new(
            text,
            prompt,
            self.model_identifier.clone(),
            self.max_output_tokens,
            self.temperature,
        ))
    }
}
