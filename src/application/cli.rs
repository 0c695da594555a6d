#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::log_dir;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendName;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::StoreName;
use crate::domain::models::TranscriptSummary;
use crate::infrastructure::stores::StoreManager;

/// What the caller should do once the command line has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Next {
    Exit,
    Serve,
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

pub fn format_transcript(summary: &TranscriptSummary, messages: &[Message]) -> String {
    let mut res = format!("- (ID: {}) {}", summary.id, summary.label());

    if let Some(first) = messages.iter().find(|e| return e.role == Role::User) {
        res = format!("{res}, {}", first.headline(70));
    }

    return res;
}

async fn print_transcripts_list() -> Result<()> {
    let store = StoreManager::get(&Config::get(ConfigKey::Store)).await?;
    let summaries = store.list_all().await?;

    if summaries.is_empty() {
        println!("There are no saved conversations yet. Save one from the chat first!");
        return Ok(());
    }

    for summary in summaries.iter() {
        let messages = store.load(&summary.id).await?.unwrap_or_default();
        println!("{}", format_transcript(summary, &messages));
    }

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running with environment variable RUST_LOG=chatline")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_transcripts() -> Command {
    return Command::new("transcripts")
        .about("Inspect saved conversations.")
        .arg_required_else_help(true)
        .subcommand(Command::new("dir").about("Print the directory saved conversations are written to."))
        .subcommand(Command::new("list").about("List all saved conversations, newest first."));
}

fn arg_config(key: ConfigKey, help: String) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(Config::env_name(key))
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("chatline")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(false)
        .subcommand(Command::new("serve").about("Start the chat web server. This is the default command."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_transcripts())
        .arg(
            arg_config(ConfigKey::ConfigFile, format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .short('c')
        )
        .arg(
            arg_config(ConfigKey::Address, format!("Address and port the web server listens on. [default: {}]", Config::default(ConfigKey::Address)))
                .short('a')
        )
        .arg(
            arg_config(ConfigKey::ApiKeyFile, format!("File containing the Gemini API key, read once at startup. [default: {}]", Config::default(ConfigKey::ApiKeyFile)))
        )
        .arg(
            arg_config(ConfigKey::Backend, format!("The backend hosting the model. [default: {}]", Config::default(ConfigKey::Backend)))
                .short('b')
                .value_parser(PossibleValuesParser::new(BackendName::VARIANTS))
        )
        .arg(
            arg_config(ConfigKey::BackendHealthCheckTimeout, format!("Time to wait in milliseconds before timing out when doing a healthcheck for a backend. [default: {}]", Config::default(ConfigKey::BackendHealthCheckTimeout)))
        )
        .arg(
            arg_config(ConfigKey::GeminiURL, format!("Gemini API URL. Can be swapped to a compatible proxy. [default: {}]", Config::default(ConfigKey::GeminiURL)))
        )
        .arg(
            arg_config(ConfigKey::Model, format!("The model to generate replies with. [default: {}]", Config::default(ConfigKey::Model)))
                .short('m')
        )
        .arg(
            arg_config(ConfigKey::Store, format!("Where saved conversations are kept. [default: {}]", Config::default(ConfigKey::Store)))
                .value_parser(PossibleValuesParser::new(StoreName::VARIANTS))
        )
        .arg(
            arg_config(ConfigKey::StoreCollection, format!("Collection holding saved conversations, a directory for the document store. [default: {}]", Config::default(ConfigKey::StoreCollection)))
        )
        .arg(
            arg_config(ConfigKey::StoreDatabase, format!("MongoDB database holding the collection. [default: {}]", Config::default(ConfigKey::StoreDatabase)))
        )
        .arg(
            arg_config(ConfigKey::StoreDir, format!("Directory of the document store. [default: {}]", Config::default(ConfigKey::StoreDir)))
        )
        .arg(
            arg_config(ConfigKey::StoreURL, format!("MongoDB connection string used by the mongo store. [default: {}]", Config::default(ConfigKey::StoreURL)))
        );
}

pub async fn parse() -> Result<Next> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_dir().join("debug.log").to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    println!("{}", Config::variants().join("\n"));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(Next::Exit);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(Next::Exit);
        }
        Some(("config", subcmd_matches)) => {
            match subcmd_matches.subcommand() {
                Some(("create", _)) => {
                    create_config_file().await?;
                }
                Some(("default", _)) => {
                    println!("{}", Config::serialize_default(build()));
                }
                Some(("path", _)) => {
                    println!("{}", Config::default(ConfigKey::ConfigFile));
                }
                _ => {
                    subcommand_config().print_long_help()?;
                }
            }
            return Ok(Next::Exit);
        }
        Some(("transcripts", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("dir", _)) => {
                    let dir = path::PathBuf::from(Config::get(ConfigKey::StoreDir))
                        .join(Config::get(ConfigKey::StoreCollection));
                    println!("{}", dir.to_string_lossy());
                }
                Some(("list", _)) => {
                    print_transcripts_list().await?;
                }
                _ => {
                    subcommand_transcripts().print_long_help()?;
                }
            }
            return Ok(Next::Exit);
        }
        Some(("serve", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(Next::Serve);
}
