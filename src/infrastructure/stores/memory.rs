#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use super::create_id;
use super::create_timestamp;
use crate::domain::models::sort_newest_first;
use crate::domain::models::Message;
use crate::domain::models::Transcript;
use crate::domain::models::TranscriptStore;
use crate::domain::models::TranscriptSummary;

/// Keeps transcripts for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryStore {
    transcripts: DashMap<String, Transcript>,
}

impl MemoryStore {
    pub fn insert(&self, transcript: Transcript) {
        self.transcripts
            .insert(transcript.id.to_string(), transcript);
    }
}

#[async_trait]
impl TranscriptStore for MemoryStore {
    #[allow(clippy::implicit_return)]
    async fn save(&self, messages: &[Message]) -> Result<Option<String>> {
        if messages.is_empty() {
            return Ok(None);
        }

        let transcript = Transcript {
            id: create_id(),
            timestamp: Some(create_timestamp()),
            messages: messages.to_vec(),
        };
        let id = transcript.id.to_string();
        self.insert(transcript);

        return Ok(Some(id));
    }

    #[allow(clippy::implicit_return)]
    async fn load(&self, id: &str) -> Result<Option<Vec<Message>>> {
        return Ok(self
            .transcripts
            .get(id)
            .map(|transcript| return transcript.messages.clone()));
    }

    #[allow(clippy::implicit_return)]
    async fn list_all(&self) -> Result<Vec<TranscriptSummary>> {
        let mut summaries = self
            .transcripts
            .iter()
            .filter_map(|entry| return entry.value().summary())
            .collect::<Vec<TranscriptSummary>>();

        sort_newest_first(&mut summaries);
        return Ok(summaries);
    }
}
