#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use anyhow::Result;
use yansi::Paint;

use crate::application::cli;
use crate::application::web;
use crate::configuration::log_dir;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::ChatSession;
use crate::domain::services::ModelClient;
use crate::infrastructure::backends::BackendManager;
use crate::infrastructure::stores::StoreManager;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! Chatline has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {:#}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_GIT_DESCRIBE"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

async fn serve() -> Result<()> {
    Config::load_credentials().await?;

    let backend = BackendManager::get(&Config::get(ConfigKey::Backend))?;
    let store = StoreManager::get(&Config::get(ConfigKey::Store)).await?;
    let model = ModelClient::new(backend);

    if let Err(err) = model.health_check().await {
        tracing::warn!(err = ?err, "backend failed its health check");
        eprintln!(
            "{}",
            Paint::yellow(format!(
                "Hey, it looks like the backend isn't reachable right now. Replies will show the error until it is.\n\nError: {err}"
            ))
        );
    }

    return web::start(ChatSession::new(model, store)).await;
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let file_appender = tracing_appender::rolling::never(log_dir(), "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("chatline")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let next = match cli::parse().await {
        Ok(next) => next,
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    if next == cli::Next::Exit {
        return;
    }

    if let Err(err) = serve().await {
        handle_error(err);
    }
}
