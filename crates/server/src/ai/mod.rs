//! Diet plan generation backed by an OpenAI-compatible LLM

pub mod client;
pub mod generator;

pub use client::{CompletionConfig, CompletionProvider, LlmClient};
pub use generator::{DietPlanGenerator, GenerationOutcome, GeneratorConfig};
