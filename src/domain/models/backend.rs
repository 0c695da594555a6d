#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::IntoEnumIterator;
use strum::VariantNames;
use thiserror::Error;

/// Prepended to every prompt sent to the model.
pub const SYSTEM_CONTEXT: &str = "You are Gemini, a large language model trained by Google.\nYou are being used in a personal chat project. Always be helpful and informative.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, VariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendName {
    Gemini,
}

impl BackendName {
    pub fn parse(text: &str) -> Option<BackendName> {
        return BackendName::iter().find(|e| return e.to_string() == text);
    }
}

pub struct BackendPrompt {
    pub text: String,
}

impl BackendPrompt {
    pub fn new(text: &str) -> BackendPrompt {
        return BackendPrompt {
            text: text.to_string(),
        };
    }

    /// Wraps the user's text with the system context. The result is sent as
    /// the only content part of the request.
    pub fn with_system_context(&self) -> String {
        return format!("{SYSTEM_CONTEXT}\n\nUser: {}", self.text);
    }
}

/// Everything that can go wrong between sending a prompt and getting text
/// back. The display form of each variant is what the user sees in place of
/// a reply.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("API Error: {0}")]
    Api(String),

    #[error("Error communicating with Gemini API: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Backend {
    fn name(&self) -> BackendName;

    /// Used at startup to verify the backend is reachable with the
    /// configured credentials.
    async fn health_check(&self) -> Result<()>;

    /// Sends a single prompt and returns the generated text of the first
    /// candidate.
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String, BackendError>;
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;
