use anyhow::Result;

use super::MemoryStore;
use crate::domain::models::Message;
use crate::domain::models::Transcript;
use crate::domain::models::TranscriptStore;

impl MemoryStore {
    fn count(&self) -> usize {
        return self.transcripts.len();
    }
}

fn conversation() -> Vec<Message> {
    return vec![
        Message::user("Hello"),
        Message::assistant("Hi! How can I help?"),
        Message::user("Tell me a joke"),
    ];
}

#[tokio::test]
async fn it_round_trips_messages() -> Result<()> {
    let store = MemoryStore::default();
    let id = store.save(&conversation()).await?.unwrap();

    assert_eq!(store.load(&id).await?, Some(conversation()));
    return Ok(());
}

#[tokio::test]
async fn it_skips_saving_empty_conversations() -> Result<()> {
    let store = MemoryStore::default();

    assert_eq!(store.save(&[]).await?, None);
    assert_eq!(store.count(), 0);
    return Ok(());
}

#[tokio::test]
async fn it_saves_a_new_record_every_time() -> Result<()> {
    let store = MemoryStore::default();
    let first = store.save(&conversation()).await?.unwrap();
    let second = store.save(&conversation()).await?.unwrap();

    assert_ne!(first, second);
    assert_eq!(store.count(), 2);
    return Ok(());
}

#[tokio::test]
async fn it_returns_none_for_unknown_ids() -> Result<()> {
    let store = MemoryStore::default();
    assert_eq!(store.load("missing").await?, None);
    return Ok(());
}

#[tokio::test]
async fn it_lists_newest_first_skipping_missing_timestamps() -> Result<()> {
    let store = MemoryStore::default();
    for (id, timestamp) in [
        ("a", Some("2024-01-01T08:00:00+00:00")),
        ("b", None),
        ("c", Some("2024-01-02T08:00:00+00:00")),
    ] {
        store.insert(Transcript {
            id: id.to_string(),
            timestamp: timestamp.map(|e| return e.to_string()),
            messages: vec![Message::user("Hello")],
        });
    }

    let ids = store
        .list_all()
        .await?
        .into_iter()
        .map(|e| return e.id)
        .collect::<Vec<String>>();

    assert_eq!(ids, vec!["c".to_string(), "a".to_string()]);
    return Ok(());
}
