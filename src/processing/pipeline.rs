//! Chunk-and-analyze pipeline
//!
//! Resume text is cut into fixed-size chunks, each chunk is sent to the
//! model together with the instruction prompt, and when there is more than
//! one chunk a final merge call consolidates the partial answers. Any failed
//! call aborts the whole analysis.

use crate::error::Result;
use crate::llm::client::{ChatModel, ChatRequest};
use crate::processing::chunker::{split_into_chunks, Chunk};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, error, info};
use std::sync::Arc;

/// Inputs for one analysis. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    resume_text: String,
    instruction_prompt: String,
    model_identifier: String,
    max_output_tokens: u32,
    temperature: f32,
}

impl AnalysisRequest {
    pub fn new(
        resume_text: impl Into<String>,
        instruction_prompt: impl Into<String>,
        model_identifier: impl Into<String>,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            resume_text: resume_text.into(),
            instruction_prompt: instruction_prompt.into(),
            model_identifier: model_identifier.into(),
            max_output_tokens,
            temperature,
        }
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn instruction_prompt(&self) -> &str {
        &self.instruction_prompt
    }

    pub fn model_identifier(&self) -> &str {
        &self.model_identifier
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// Final text plus how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub text: String,
    pub chunk_count: usize,
    pub merged: bool,
}

pub struct AnalysisPipeline {
    model: Arc<dyn ChatModel>,
    combine_instruction: String,
    chunk_size: usize,
    max_concurrent_requests: usize,
}

impl AnalysisPipeline {
    pub fn new(model: Arc<dyn ChatModel>, combine_instruction: impl Into<String>, chunk_size: usize) -> Self {
        Self {
            model,
            combine_instruction: combine_instruction.into(),
            chunk_size,
            max_concurrent_requests: 1,
        }
    }

    /// Allow up to `limit` chunk calls in flight. Results are still merged in chunk order.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit.max(1);
        self
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        Ok(self.run(request).await?.text)
    }

    pub async fn run(&self, request: &AnalysisRequest) -> Result<PipelineOutput> {
        let chunks = split_into_chunks(request.resume_text(), self.chunk_size)?;

        if chunks.is_empty() {
            info!("No resume text to analyze, skipping model calls");
            return Ok(PipelineOutput {
                text: String::new(),
                chunk_count: 0,
                merged: false,
            });
        }

        info!(
            "Analyzing {} characters in {} chunk(s) with model {}",
            request.resume_text().chars().count(),
            chunks.len(),
            request.model_identifier()
        );

        let partials: Vec<String> = stream::iter(chunks.iter())
            .map(|chunk| self.analyze_chunk(request, chunk, chunks.len()))
            .buffered(self.max_concurrent_requests)
            .try_collect()
            .await?;

        if partials.len() == 1 {
            let text = partials.into_iter().next().unwrap_or_default();
            return Ok(PipelineOutput {
                text,
                chunk_count: 1,
                merged: false,
            });
        }

        let chunk_count = partials.len();
        let combined = partials.join("\n\n");
        info!("Merging {} partial results", chunk_count);

        let merge_request = ChatRequest::instruction(
            &self.combine_instruction,
            &combined,
            request.model_identifier(),
            request.max_output_tokens(),
            request.temperature(),
        );
        let merged = self.model.complete(&merge_request).await.map_err(|e| {
            error!("Merge call failed: {}", e);
            e
        })?;

        Ok(PipelineOutput {
            text: merged.trim().to_string(),
            chunk_count,
            merged: true,
        })
    }

    async fn analyze_chunk(&self, request: &AnalysisRequest, chunk: &Chunk, total: usize) -> Result<String> {
        debug!(
            "Sending chunk {}/{} ({} chars)",
            chunk.chunk_id + 1,
            total,
            chunk.char_len()
        );

        let chat_request = ChatRequest::instruction(
            request.instruction_prompt(),
            &chunk.content,
            request.model_identifier(),
            request.max_output_tokens(),
            request.temperature(),
        );

        let response = self.model.complete(&chat_request).await.map_err(|e| {
            error!("Model call for chunk {}/{} failed: {}", chunk.chunk_id + 1, total, e);
            e
        })?;

        Ok(response.trim().to_string())
    }
}
