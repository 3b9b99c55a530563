//! Article generation pipeline.
//!
//! Two LLM stages: scaffold (prompt to outline) and hydrate (outline to
//! prose), with optional reference links fetched from a search API. Both
//! stages are guarded by the fingerprint cache so repeated inputs never pay
//! for a second completion.

pub mod linker;
pub mod llm;
pub mod pipeline;

pub use linker::LinkFetcher;
pub use llm::{ChatMessage, LlmClient, LlmConfig};
pub use pipeline::{ArticleGenerator, GenerateRequest};
