//! Hosted LLM integration module

pub mod client;
pub mod prompts;

pub use client::{ChatMessage, ChatModel, ChatRequest, GroqClient, LlmError};
pub use prompts::{PromptStore, PromptTemplate};
