//! Failure-isolating gateway over the LLM backends
//!
//! Every agent's narrative overlay goes through [`LlmGateway::call`]. The
//! gateway converts any backend error - transport, auth, parse, unsupported
//! provider - into [`NarrativeOutcome::Failed`], so the agents above it never
//! see a provider-specific error type. The legacy sentinel text
//! `"AI Analysis failed: ..."` exists only at the to/from-text boundary of
//! [`NarrativeOutcome`].

use crate::providers::{AnthropicBackend, GoogleBackend, OpenAiBackend};
use crate::{CompletionRequest, LlmBackend, LlmError, Message, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Sentinel prefix signaling a failed narrative through the text channel
const SENTINEL_PREFIX: &str = "AI Analysis failed:";

/// LLM provider selection, as sent by clients
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI GPT models
    OpenAi,
    /// Anthropic Claude models
    Anthropic,
    /// Google Gemini models
    Google,
    /// No LLM configured; agents stay deterministic
    #[default]
    None,
}

impl LlmProvider {
    /// Wire name of the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::None => "none",
        }
    }

    /// Default model used when the request leaves the model blank
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4-turbo-preview",
            Self::Anthropic => "claude-3-5-sonnet-20241022",
            Self::Google => "gemini-pro",
            Self::None => "",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "google" => Ok(Self::Google),
            "none" | "" => Ok(Self::None),
            other => Err(LlmError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Outcome of a narrative request
///
/// Agents decide whether to keep or replace their deterministic summary as a
/// pure function of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeOutcome {
    /// The LLM produced a narrative
    Narrative(String),
    /// The call failed; the reason is for logs, never for the client
    Failed(String),
}

impl NarrativeOutcome {
    /// The narrative text, if the call succeeded
    pub fn narrative(&self) -> Option<&str> {
        match self {
            Self::Narrative(text) => Some(text),
            Self::Failed(_) => None,
        }
    }

    /// Whether the call failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Parse from the text channel, recognizing the failure sentinel prefix
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if let Some(reason) = text.strip_prefix(SENTINEL_PREFIX) {
            Self::Failed(reason.trim_start().to_string())
        } else {
            Self::Narrative(text)
        }
    }

    /// Serialize into the text channel, applying the failure sentinel prefix
    pub fn into_text(self) -> String {
        match self {
            Self::Narrative(text) => text,
            Self::Failed(reason) => format!("{SENTINEL_PREFIX} {reason}"),
        }
    }
}

/// Uniform call surface over all supported LLM backends
///
/// Stateless; backends are constructed per call from the request-scoped API
/// key, mirroring the stateless agents above it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LlmGateway;

impl LlmGateway {
    /// Create a new gateway
    pub fn new() -> Self {
        Self
    }

    /// Request a narrative from the given provider
    ///
    /// An empty `model` selects the provider's default model. All failures
    /// collapse to [`NarrativeOutcome::Failed`]; this method never errors.
    pub async fn call(
        &self,
        provider: LlmProvider,
        api_key: &str,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> NarrativeOutcome {
        match self
            .dispatch(provider, api_key, model, system_prompt, user_prompt)
            .await
        {
            Ok(text) => NarrativeOutcome::Narrative(text),
            Err(e) => {
                warn!(provider = %provider, error = %e, "LLM call failed");
                NarrativeOutcome::Failed(e.to_string())
            }
        }
    }

    async fn dispatch(
        &self,
        provider: LlmProvider,
        api_key: &str,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let backend: Box<dyn LlmBackend> = match provider {
            LlmProvider::OpenAi => Box::new(OpenAiBackend::new(api_key)?),
            LlmProvider::Anthropic => Box::new(AnthropicBackend::new(api_key)?),
            LlmProvider::Google => Box::new(GoogleBackend::new(api_key)?),
            LlmProvider::None => {
                return Err(LlmError::UnsupportedProvider("none".to_string()));
            }
        };

        let model = if model.is_empty() {
            provider.default_model()
        } else {
            model
        };

        let request = CompletionRequest::builder(model)
            .system(system_prompt)
            .add_message(Message::user(user_prompt))
            .max_tokens(1024)
            .build();

        debug!(backend = backend.name(), model, "Dispatching completion");
        let response = backend.complete(request).await?;
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!("openai".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!(
            "Anthropic".parse::<LlmProvider>().unwrap(),
            LlmProvider::Anthropic
        );
        assert_eq!("none".parse::<LlmProvider>().unwrap(), LlmProvider::None);
        assert!("cohere".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_default_models() {
        assert_eq!(LlmProvider::OpenAi.default_model(), "gpt-4-turbo-preview");
        assert_eq!(
            LlmProvider::Anthropic.default_model(),
            "claude-3-5-sonnet-20241022"
        );
        assert_eq!(LlmProvider::Google.default_model(), "gemini-pro");
    }

    #[test]
    fn test_sentinel_round_trip() {
        let failed = NarrativeOutcome::Failed("timeout".to_string());
        let text = failed.clone().into_text();
        assert!(text.starts_with("AI Analysis failed:"));
        assert_eq!(NarrativeOutcome::from_text(text), failed);

        let ok = NarrativeOutcome::from_text("Strong growth story.");
        assert_eq!(ok.narrative(), Some("Strong growth story."));
        assert!(!ok.is_failed());
    }

    #[tokio::test]
    async fn test_none_provider_fails() {
        let gateway = LlmGateway::new();
        let outcome = gateway
            .call(LlmProvider::None, "", "", "system", "user")
            .await;
        assert!(outcome.is_failed());
        assert!(outcome.clone().into_text().starts_with("AI Analysis failed:"));
    }
}
