//! LLM provider abstraction layer for the StockAI advisor
//!
//! This crate provides provider-agnostic access to the Large Language Models
//! that back the optional narrative overlay of the analysis agents:
//!
//! - Message and completion request/response types
//! - A backend trait for LLM implementations
//! - Concrete OpenAI, Anthropic, and Google backends
//! - The failure-isolating gateway every agent calls through
//!
//! The gateway is the single point where provider failures are converted to a
//! [`NarrativeOutcome`]; callers above it never branch on provider-specific
//! error types.

pub mod backend;
pub mod completion;
pub mod error;
pub mod gateway;
pub mod messages;
pub mod providers;

// Re-export main types
pub use backend::LlmBackend;
pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{LlmError, Result};
pub use gateway::{LlmGateway, LlmProvider, NarrativeOutcome};
pub use messages::{Message, Role};
