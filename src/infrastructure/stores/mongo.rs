#[cfg(test)]
#[path = "mongo_test.rs"]
mod tests;

use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Local;
use chrono::TimeZone;
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::Bson;
use mongodb::bson::Document;
use mongodb::options::FindOptions;
use mongodb::Client;
use mongodb::Collection;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::domain::models::sort_newest_first;
use crate::domain::models::Message;
use crate::domain::models::TranscriptStore;
use crate::domain::models::TranscriptSummary;

/// A saved chat as kept in MongoDB, `{_id, timestamp, messages}`. The
/// timestamp holds the local wall clock time tagged as UTC, the way naive
/// datetimes are stored by other MongoDB clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<Bson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Bson>,
    pub messages: Vec<Message>,
}

impl ChatDocument {
    pub fn new(messages: &[Message], now: DateTime<Local>) -> ChatDocument {
        let wall_clock = now.naive_local().and_utc();
        return ChatDocument {
            id: None,
            timestamp: Some(Bson::DateTime(mongodb::bson::DateTime::from_millis(
                wall_clock.timestamp_millis(),
            ))),
            messages: messages.to_vec(),
        };
    }
}

/// The listing only needs the id and timestamp of each chat.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatHeader {
    #[serde(rename = "_id")]
    pub id: Bson,
    #[serde(default)]
    pub timestamp: Option<Bson>,
}

impl ChatHeader {
    pub fn summary(&self) -> Option<TranscriptSummary> {
        let id = id_to_string(&self.id)?;
        let timestamp = match self.timestamp.as_ref()? {
            Bson::DateTime(dt) => to_fixed_offset(dt.timestamp_millis())?,
            _ => return None,
        };

        return Some(TranscriptSummary { id, timestamp });
    }
}

fn to_fixed_offset(millis: i64) -> Option<DateTime<FixedOffset>> {
    return Utc
        .timestamp_millis_opt(millis)
        .single()
        .map(|e| return e.fixed_offset());
}

pub fn id_to_string(id: &Bson) -> Option<String> {
    return match id {
        Bson::ObjectId(oid) => Some(oid.to_hex()),
        Bson::String(text) => Some(text.to_string()),
        _ => None,
    };
}

/// Chats inserted by this app and most others carry an ObjectId, anything
/// that doesn't parse as one is looked up as a plain string id.
pub fn id_filter(id: &str) -> Document {
    if let Ok(oid) = ObjectId::parse_str(id) {
        return doc! { "_id": oid };
    }

    return doc! { "_id": id };
}

pub struct MongoStore {
    collection: Collection<ChatDocument>,
}

impl MongoStore {
    /// Connects and pings the server once. A store that can't be reached
    /// here stops the application from starting.
    pub async fn connect(url: &str, database: &str, collection: &str) -> Result<MongoStore> {
        let client = Client::with_uri_str(url)
            .await
            .with_context(|| return "Failed to parse the MongoDB connection string".to_string())?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .with_context(|| return format!("Failed to connect to MongoDB database '{database}'"))?;

        tracing::debug!(database = database, collection = collection, "connected to mongo store");
        return Ok(MongoStore {
            collection: db.collection::<ChatDocument>(collection),
        });
    }
}

#[async_trait]
impl TranscriptStore for MongoStore {
    #[allow(clippy::implicit_return)]
    async fn save(&self, messages: &[Message]) -> Result<Option<String>> {
        if messages.is_empty() {
            return Ok(None);
        }

        let res = self
            .collection
            .insert_one(ChatDocument::new(messages, Local::now()), None)
            .await?;
        let id = id_to_string(&res.inserted_id);

        tracing::info!(id = ?id, messages = messages.len(), "saved transcript");
        return Ok(id);
    }

    #[allow(clippy::implicit_return)]
    async fn load(&self, id: &str) -> Result<Option<Vec<Message>>> {
        let chat = self.collection.find_one(id_filter(id), None).await?;
        return Ok(chat.map(|e| return e.messages));
    }

    #[allow(clippy::implicit_return)]
    async fn list_all(&self) -> Result<Vec<TranscriptSummary>> {
        let options = FindOptions::builder()
            .sort(doc! { "timestamp": -1 })
            .projection(doc! { "_id": 1, "timestamp": 1 })
            .build();

        let mut cursor = self
            .collection
            .clone_with_type::<ChatHeader>()
            .find(None, options)
            .await?;

        let mut summaries: Vec<TranscriptSummary> = vec![];
        while cursor.advance().await? {
            let header = match cursor.deserialize_current() {
                Ok(header) => header,
                Err(err) => {
                    tracing::warn!(err = ?err, "skipping unreadable transcript");
                    continue;
                }
            };

            if let Some(summary) = header.summary() {
                summaries.push(summary);
            } else {
                tracing::debug!(id = ?header.id, "skipping transcript without timestamp");
            }
        }

        sort_newest_first(&mut summaries);
        return Ok(summaries);
    }
}
