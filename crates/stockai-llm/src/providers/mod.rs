//! Concrete LLM backend implementations

pub mod anthropic;
pub mod google;
pub mod openai;

pub use anthropic::AnthropicBackend;
pub use google::GoogleBackend;
pub use openai::OpenAiBackend;
