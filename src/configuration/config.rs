#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;
use strum::VariantNames;
use tokio::fs;

use crate::domain::models::BackendName;
use crate::domain::models::StoreName;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, VariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    Address,
    ApiKeyFile,
    Backend,
    BackendHealthCheckTimeout,
    ConfigFile,
    GeminiToken,
    GeminiURL,
    Model,
    Store,
    StoreCollection,
    StoreDatabase,
    StoreDir,
    StoreURL,
}

impl ConfigKey {
    /// Keys that are only ever set by the application itself, never read
    /// from flags or the config file.
    fn is_internal(&self) -> bool {
        return *self == ConfigKey::ConfigFile || *self == ConfigKey::GeminiToken;
    }
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        let default_backend = BackendName::Gemini.to_string();
        let default_store = StoreName::Document.to_string();

        let config_path = dirs::config_dir()
            .unwrap_or_default()
            .join("chatline/config.toml")
            .to_string_lossy()
            .to_string();
        let store_dir = dirs::data_dir()
            .unwrap_or_default()
            .join("chatline")
            .to_string_lossy()
            .to_string();

        let res: &str = match key {
            ConfigKey::Address => "127.0.0.1:8501",
            ConfigKey::ApiKeyFile => "API",
            ConfigKey::Backend => &default_backend,
            ConfigKey::BackendHealthCheckTimeout => "1000",
            ConfigKey::GeminiURL => "https://generativelanguage.googleapis.com",
            ConfigKey::Model => "gemini-2.0-flash",
            ConfigKey::Store => &default_store,
            ConfigKey::StoreCollection => "chats",
            ConfigKey::StoreDatabase => "chatbot",
            ConfigKey::StoreDir => &store_dir,
            ConfigKey::StoreURL => "mongodb://localhost:27017/",

            // Special
            ConfigKey::ConfigFile => &config_path,
            ConfigKey::GeminiToken => "",
        };

        return res.to_string();
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if key.is_internal() {
                    continue;
                }

                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let mut possible_values = vec![];
                    if let Some(arg) = cmd
                        .get_arguments()
                        .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        possible_values = arg
                            .get_possible_values()
                            .iter()
                            .map(|e| return e.get_name().to_string())
                            .collect::<Vec<String>>();
                    }

                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        Config::set(key, val_str);
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            if key.is_internal() {
                continue;
            }

            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            address = Config::get(ConfigKey::Address),
            backend = Config::get(ConfigKey::Backend),
            model = Config::get(ConfigKey::Model),
            store = Config::get(ConfigKey::Store),
            store_dir = Config::get(ConfigKey::StoreDir),
            store_database = Config::get(ConfigKey::StoreDatabase),
            store_collection = Config::get(ConfigKey::StoreCollection),
            "config"
        );

        return Ok(());
    }

    /// Reads the API key from the configured key file. The key is read once
    /// at startup and an unreadable or empty file stops the server from
    /// starting.
    pub async fn load_credentials() -> Result<()> {
        let token = read_api_key(&Config::get(ConfigKey::ApiKeyFile)).await?;
        Config::set(ConfigKey::GeminiToken, &token);
        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key.is_internal() {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|e| return e.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                if !arg.get_possible_values().is_empty() {
                    let possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name().to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    description = format!("{description} [possible values: {}]", possible_values);
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i32>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{}\"", val.replace('\\', "\\\\"));
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }

    pub fn env_name(key: ConfigKey) -> String {
        return format!("CHATLINE_{}", key.to_string().replace('-', "_").to_uppercase());
    }

    pub fn variants() -> &'static [&'static str] {
        return ConfigKey::VARIANTS;
    }
}

pub async fn read_api_key(key_file: &str) -> Result<String> {
    let payload = fs::read_to_string(key_file)
        .await
        .with_context(|| return format!("Failed to read API key file {key_file}"))?;

    let token = payload.trim();
    if token.is_empty() {
        bail!(format!("API key file {key_file} is empty"));
    }

    return Ok(token.to_string());
}

pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("CHATLINE_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir().unwrap_or_default().join("chatline");
}
