use std::io::Write;

use anyhow::Result;

use super::read_api_key;
use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    assert!(res.contains("model = \"gemini-2.0-flash\""));
    assert!(res.contains("backend-health-check-timeout = 1000"));
    assert!(res.contains("[possible values: document, memory, mongo]"));
    assert!(res.contains("store-url = \"mongodb://localhost:27017/\""));
    assert!(!res.contains("gemini-token"));
    assert!(!res.contains("config-file"));
}

#[test]
fn it_has_defaults() {
    assert_eq!(Config::default(ConfigKey::Address), "127.0.0.1:8501");
    assert_eq!(Config::default(ConfigKey::Backend), "gemini");
    assert_eq!(Config::default(ConfigKey::Store), "document");
    assert_eq!(Config::default(ConfigKey::StoreCollection), "chats");
    assert_eq!(Config::default(ConfigKey::StoreDatabase), "chatbot");
    assert_eq!(Config::default(ConfigKey::StoreURL), "mongodb://localhost:27017/");
    assert_eq!(Config::default(ConfigKey::GeminiToken), "");
}

#[test]
fn it_builds_env_names() {
    assert_eq!(Config::env_name(ConfigKey::StoreDir), "CHATLINE_STORE_DIR");
    assert_eq!(Config::env_name(ConfigKey::GeminiURL), "CHATLINE_GEMINI_URL");
    assert_eq!(Config::env_name(ConfigKey::StoreURL), "CHATLINE_STORE_URL");
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["chatline", "-c", "./config.example.toml"])?;
    Config::load(cli::build(), vec![&matches]).await?;
    return Ok(());
}

#[tokio::test]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let matches =
        cli::build().try_get_matches_from(vec!["chatline", "-c", "./test/bad-config.toml"])?;
    let res = Config::load(cli::build(), vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}

#[tokio::test]
async fn it_reads_api_key_trimmed() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "  abc123  ")?;

    let token = read_api_key(&file.path().to_string_lossy()).await?;
    assert_eq!(token, "abc123");
    return Ok(());
}

#[tokio::test]
async fn it_fails_on_empty_api_key() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "   ")?;

    let res = read_api_key(&file.path().to_string_lossy()).await;
    assert!(res.is_err());
    return Ok(());
}

#[tokio::test]
async fn it_fails_on_missing_api_key_file() {
    let res = read_api_key("./test/does-not-exist").await;
    assert!(res.is_err());
}
