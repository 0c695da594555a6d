#[cfg(test)]
#[path = "model_client_test.rs"]
mod tests;

use anyhow::Result;

use crate::domain::models::BackendBox;
use crate::domain::models::BackendPrompt;

const IDENTITY_TRIGGERS: [&str; 3] = ["who are you", "what are you", "introduce yourself"];

pub const IDENTITY_REPLY: &str = "I am a large language model called Gemini, trained by Google. I'm being used in this project to power an interactive chatbot. I'm designed to help answer questions and engage in conversations on a wide range of topics.";

/// Answers questions about the assistant itself locally, without asking the
/// backend.
pub fn identity_reply(prompt: &str) -> Option<&'static str> {
    let lowered = prompt.to_lowercase();
    if IDENTITY_TRIGGERS
        .iter()
        .any(|phrase| return lowered.contains(phrase))
    {
        return Some(IDENTITY_REPLY);
    }

    return None;
}

pub struct ModelClient {
    backend: BackendBox,
}

impl ModelClient {
    pub fn new(backend: BackendBox) -> ModelClient {
        return ModelClient { backend };
    }

    pub async fn health_check(&self) -> Result<()> {
        return self.backend.health_check().await;
    }

    /// Always returns text to show as the assistant's reply. Backend
    /// failures are rendered into the reply instead of being returned.
    pub async fn generate(&self, prompt: &str) -> String {
        if let Some(reply) = identity_reply(prompt) {
            tracing::debug!("answering identity prompt locally");
            return reply.to_string();
        }

        match self
            .backend
            .get_completion(BackendPrompt::new(prompt))
            .await
        {
            Ok(text) => return text,
            Err(err) => {
                tracing::error!(backend = %self.backend.name(), err = ?err, "completion failed");
                return err.to_string();
            }
        }
    }
}
