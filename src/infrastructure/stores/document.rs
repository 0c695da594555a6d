#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::create_id;
use super::create_timestamp;
use crate::domain::models::sort_newest_first;
use crate::domain::models::Message;
use crate::domain::models::Transcript;
use crate::domain::models::TranscriptStore;
use crate::domain::models::TranscriptSummary;

/// A document collection kept on disk, one YAML document per transcript.
pub struct DocumentStore {
    pub collection_dir: path::PathBuf,
}

impl DocumentStore {
    pub async fn connect(store_dir: &path::Path, collection: &str) -> Result<DocumentStore> {
        if !is_valid_name(collection) {
            bail!(format!("Invalid store collection name '{collection}'"));
        }

        let collection_dir = store_dir.join(collection);
        fs::create_dir_all(&collection_dir).await.with_context(|| {
            return format!(
                "Failed to open transcript store at {}",
                collection_dir.to_string_lossy()
            );
        })?;

        tracing::debug!(dir = ?collection_dir, "connected to document store");
        return Ok(DocumentStore { collection_dir });
    }

    fn get_file_path(&self, id: &str) -> path::PathBuf {
        return self.collection_dir.join(format!("{id}.yaml"));
    }

    fn get_temp_file_path(&self, id: &str) -> path::PathBuf {
        return self.collection_dir.join(format!(".{id}.yaml.tmp"));
    }

    async fn read(&self, file_path: &path::Path) -> Result<Transcript> {
        let payload = fs::read_to_string(file_path).await?;
        let transcript: Transcript = serde_yaml::from_str(&payload)?;

        return Ok(transcript);
    }
}

/// Ids end up as file names, anything but alphanumerics, dashes and
/// underscores is refused.
fn is_valid_name(id: &str) -> bool {
    return !id.is_empty()
        && id
            .chars()
            .all(|c| return c.is_ascii_alphanumeric() || c == '-' || c == '_');
}

/// Writes the document next to its final location and moves it into place,
/// so a failed write never leaves a partial `{id}.yaml` behind.
async fn write_atomically(temp_path: &path::Path, file_path: &path::Path, payload: &str) -> Result<()> {
    let res = write_then_rename(temp_path, file_path, payload).await;
    if res.is_err() && temp_path.exists() {
        if let Err(err) = fs::remove_file(temp_path).await {
            tracing::warn!(file = ?temp_path, err = ?err, "failed to remove partial transcript");
        }
    }

    return res;
}

async fn write_then_rename(temp_path: &path::Path, file_path: &path::Path, payload: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .await?;
    file.write_all(payload.as_bytes()).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(temp_path, file_path).await?;
    return Ok(());
}

#[async_trait]
impl TranscriptStore for DocumentStore {
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

        let payload = serde_yaml::to_string(&transcript)?;
        write_atomically(
            &self.get_temp_file_path(&transcript.id),
            &self.get_file_path(&transcript.id),
            &payload,
        )
        .await?;

        tracing::info!(id = %transcript.id, messages = messages.len(), "saved transcript");
        return Ok(Some(transcript.id));
    }

    #[allow(clippy::implicit_return)]
    async fn load(&self, id: &str) -> Result<Option<Vec<Message>>> {
        if !is_valid_name(id) {
            return Ok(None);
        }

        let file_path = self.get_file_path(id);
        if !file_path.exists() {
            return Ok(None);
        }

        let transcript = self.read(&file_path).await?;
        return Ok(Some(transcript.messages));
    }

    #[allow(clippy::implicit_return)]
    async fn list_all(&self) -> Result<Vec<TranscriptSummary>> {
        let mut summaries: Vec<TranscriptSummary> = vec![];

        let mut dir = fs::read_dir(&self.collection_dir).await?;
        while let Some(file) = dir.next_entry().await? {
            let file_path = file.path();
            if file_path.extension().and_then(|e| return e.to_str()) != Some("yaml") {
                continue;
            }

            // Loads go through the file name, so that is the id listed.
            let id = match file_path.file_stem().and_then(|e| return e.to_str()) {
                Some(stem) if is_valid_name(stem) => stem.to_string(),
                _ => continue,
            };

            let transcript = match self.read(&file_path).await {
                Ok(transcript) => transcript,
                Err(err) => {
                    tracing::warn!(file = ?file_path, err = ?err, "skipping unreadable transcript");
                    continue;
                }
            };

            if transcript.id != id {
                tracing::warn!(file = ?file_path, id = %transcript.id, "transcript id does not match its file name");
            }

            if let Some(mut summary) = transcript.summary() {
                summary.id = id;
                summaries.push(summary);
            } else {
                tracing::debug!(id = %id, "skipping transcript without timestamp");
            }
        }

        sort_newest_first(&mut summaries);
        return Ok(summaries);
    }
}
