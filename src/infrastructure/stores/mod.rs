pub mod document;
pub mod memory;
pub mod mongo;

use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::Local;
use chrono::SecondsFormat;
use uuid::Uuid;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::StoreBox;
use crate::domain::models::StoreName;

pub struct StoreManager {}

impl StoreManager {
    /// Opens the configured store. Failing to open it is fatal, there is no
    /// reconnect later on.
    pub async fn get(name: &str) -> Result<StoreBox> {
        match StoreName::parse(name) {
            Some(StoreName::Document) => {
                let store = document::DocumentStore::connect(
                    path::Path::new(&Config::get(ConfigKey::StoreDir)),
                    &Config::get(ConfigKey::StoreCollection),
                )
                .await?;
                return Ok(Box::new(store));
            }
            Some(StoreName::Mongo) => {
                let store = mongo::MongoStore::connect(
                    &Config::get(ConfigKey::StoreURL),
                    &Config::get(ConfigKey::StoreDatabase),
                    &Config::get(ConfigKey::StoreCollection),
                )
                .await?;
                return Ok(Box::new(store));
            }
            Some(StoreName::Memory) => {
                return Ok(Box::<memory::MemoryStore>::default());
            }
            None => {
                bail!(format!("No store implemented for {name}"))
            }
        }
    }
}

pub fn create_id() -> String {
    return Uuid::new_v4().to_string();
}

pub fn create_timestamp() -> String {
    return Local::now().to_rfc3339_opts(SecondsFormat::Micros, false);
}
