#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::BackendError;
use crate::domain::models::BackendName;
use crate::domain::models::BackendPrompt;

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> BackendError {
        return BackendError::Transport(err.to_string());
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> BackendError {
        return BackendError::Transport(err.to_string());
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionRequest {
    contents: Vec<Content>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ErrorEnvelope>,
}

impl CompletionResponse {
    fn into_text(self) -> Result<String, BackendError> {
        if let Some(err) = self.error {
            return Err(BackendError::Api(err.message));
        }

        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| return candidate.content)
            .and_then(|content| return content.parts.into_iter().next())
            .and_then(|part| return part.text);

        if let Some(text) = text {
            return Ok(text);
        }

        return Err(BackendError::Transport(
            "response did not contain any candidate text".to_string(),
        ));
    }
}

pub struct Gemini {
    url: String,
    token: String,
    model: String,
    timeout: String,
}

impl Default for Gemini {
    fn default() -> Gemini {
        return Gemini::new(
            &Config::get(ConfigKey::GeminiURL),
            &Config::get(ConfigKey::GeminiToken),
            &Config::get(ConfigKey::Model),
            &Config::get(ConfigKey::BackendHealthCheckTimeout),
        );
    }
}

impl Gemini {
    pub fn new(url: &str, token: &str, model: &str, timeout: &str) -> Gemini {
        return Gemini {
            url: url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            model: model.to_string(),
            timeout: timeout.to_string(),
        };
    }

    fn model_url(&self) -> String {
        return format!(
            "{url}/v1beta/models/{model}",
            url = self.url,
            model = self.model
        );
    }
}

#[async_trait]
impl Backend for Gemini {
    fn name(&self) -> BackendName {
        return BackendName::Gemini;
    }

    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Gemini URL is not defined");
        }
        if self.token.is_empty() {
            bail!("Gemini token is not defined");
        }

        let res = reqwest::Client::new()
            .get(format!("{url}?key={key}", url = self.model_url(), key = self.token))
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Gemini is not reachable");
                bail!("Gemini is not reachable");
            }
        };

        let status = res.status().as_u16();
        if status >= 400 {
            tracing::error!(status = status, "Gemini health check failed");
            bail!(format!("Gemini health check failed with status {status}"));
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion(&self, prompt: BackendPrompt) -> Result<String, BackendError> {
        let req = CompletionRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.with_system_context()),
                }],
            }],
        };

        let res = reqwest::Client::new()
            .post(format!(
                "{url}:generateContent?key={key}",
                url = self.model_url(),
                key = self.token,
            ))
            .json(&req)
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;

        if status != 200 {
            tracing::error!(
                status = status,
                "Failed to make completion request to Gemini"
            );
            return Err(BackendError::Status { status, body });
        }

        let payload: CompletionResponse = serde_json::from_str(&body)?;
        return payload.into_text();
    }
}
