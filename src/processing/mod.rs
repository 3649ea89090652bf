//! Chunking, the analysis pipeline and the resume-analysis facade

pub mod chunker;
pub mod pipeline;
pub mod analyzer;

pub use analyzer::{AnalysisTarget, ResumeAnalyzer};
pub use pipeline::{AnalysisPipeline, AnalysisRequest, PipelineOutput};
