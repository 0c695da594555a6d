#[cfg(test)]
#[path = "chat_session_test.rs"]
mod tests;

use anyhow::Result;

use super::ModelClient;
use crate::domain::models::Message;
use crate::domain::models::Notice;
use crate::domain::models::StoreBox;
use crate::domain::models::TranscriptSummary;

/// The active conversation and the only place it is mutated. Messages are
/// appended at the tail, replaced wholesale by a load, or cleared.
pub struct ChatSession {
    messages: Vec<Message>,
    model: ModelClient,
    store: StoreBox,
}

impl ChatSession {
    pub fn new(model: ModelClient, store: StoreBox) -> ChatSession {
        return ChatSession {
            messages: vec![],
            model,
            store,
        };
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    /// Appends the user's text, asks the model and appends its reply. Blank
    /// input is ignored and returns `None`.
    pub async fn submit(&mut self, text: &str) -> Option<&Message> {
        if text.trim().is_empty() {
            return None;
        }

        self.messages.push(Message::user(text));
        let reply = self.model.generate(text).await;
        self.messages.push(Message::assistant(&reply));

        tracing::info!(messages = self.messages.len(), "completed turn");
        return self.messages.last();
    }

    /// Persists the whole conversation as a new transcript. Nothing is saved
    /// and no notice is produced while the conversation is empty.
    pub async fn save(&self) -> Option<Notice> {
        if self.messages.is_empty() {
            return None;
        }

        match self.store.save(&self.messages).await {
            Ok(Some(id)) => {
                tracing::info!(id = %id, "chat history saved");
                return Some(Notice::success("Chat history saved successfully!"));
            }
            Ok(None) => {
                tracing::warn!("store did not return an id for the saved chat");
                return Some(Notice::warning("Failed to save chat history"));
            }
            Err(err) => {
                tracing::error!(err = ?err, "failed to save chat history");
                return Some(Notice::error(&format!(
                    "Error saving chat history: {err}"
                )));
            }
        }
    }

    /// Replaces the conversation with a saved transcript. When the
    /// transcript can't be found or read the conversation is left as is.
    pub async fn load(&mut self, id: &str) -> Notice {
        match self.store.load(id).await {
            Ok(Some(messages)) => {
                tracing::info!(id = id, messages = messages.len(), "chat loaded");
                self.messages = messages;
                return Notice::success("Chat loaded successfully!");
            }
            Ok(None) => {
                tracing::warn!(id = id, "no saved chat found");
            }
            Err(err) => {
                tracing::error!(id = id, err = ?err, "failed to load chat history");
            }
        }

        return Notice::error("Failed to load chat history");
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub async fn transcripts(&self) -> Result<Vec<TranscriptSummary>> {
        return self.store.list_all().await;
    }
}
