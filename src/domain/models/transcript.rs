#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::FixedOffset;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Message;

pub const TIMESTAMP_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A saved transcript as stored in the document collection. The timestamp
/// is optional so that records written without one still deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub messages: Vec<Message>,
}

impl Transcript {
    pub fn summary(&self) -> Option<TranscriptSummary> {
        let raw = self.timestamp.as_ref()?;
        let timestamp = DateTime::parse_from_rfc3339(raw).ok()?;

        return Some(TranscriptSummary {
            id: self.id.to_string(),
            timestamp,
        });
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptSummary {
    pub id: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl TranscriptSummary {
    pub fn label(&self) -> String {
        return self.timestamp.format(TIMESTAMP_LABEL_FORMAT).to_string();
    }
}

/// Newest first, falling back to the id so equal timestamps list stably.
pub fn sort_newest_first(summaries: &mut [TranscriptSummary]) {
    summaries.sort_by(|a, b| {
        return b.timestamp.cmp(&a.timestamp).then_with(|| return a.id.cmp(&b.id));
    });
}
