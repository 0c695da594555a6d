use anyhow::Result;
use async_trait::async_trait;
use strum::EnumIter;
use strum::IntoEnumIterator;
use strum::VariantNames;

use super::Message;
use super::TranscriptSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, VariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StoreName {
    Document,
    Memory,
    Mongo,
}

impl StoreName {
    pub fn parse(text: &str) -> Option<StoreName> {
        return StoreName::iter().find(|e| return e.to_string() == text);
    }
}

/// A collection of saved transcripts. Records are only ever inserted.
#[async_trait]
pub trait TranscriptStore {
    /// Inserts a new timestamped record holding `messages`, returning its
    /// id. An empty conversation is never stored and yields `None`.
    async fn save(&self, messages: &[Message]) -> Result<Option<String>>;

    /// Returns the stored messages for `id`, or `None` if no record exists.
    async fn load(&self, id: &str) -> Result<Option<Vec<Message>>>;

    /// All records with a valid timestamp, newest first.
    async fn list_all(&self) -> Result<Vec<TranscriptSummary>>;
}

pub type StoreBox = Box<dyn TranscriptStore + Send + Sync>;
