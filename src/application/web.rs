#[cfg(test)]
#[path = "web_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Context;
use anyhow::Result;
use axum::extract::Path;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Form;
use axum::Router;
use minijinja::context;
use minijinja::Environment;
use minijinja::Value;
use once_cell::sync::Lazy;
use rust_embed::RustEmbed;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use super::markdown;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Message;
use crate::domain::models::Notice;
use crate::domain::services::ChatSession;

const TITLE: &str = "Gemini Chat";

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.set_loader(|name| {
        return Ok(Assets::get(name).map(|file| {
            return String::from_utf8_lossy(&file.data).to_string();
        }));
    });

    return env;
});

/// Failures while producing a page. Everything the user does is turned into
/// a page with a notice, so only rendering itself can end up here.
#[derive(Debug)]
pub enum WebError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound(path) => {
                return (StatusCode::NOT_FOUND, format!("Not found: {path}")).into_response();
            }
            WebError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
                    .into_response();
            }
        }
    }
}

impl From<minijinja::Error> for WebError {
    fn from(err: minijinja::Error) -> WebError {
        return WebError::Internal(format!("{err:#}"));
    }
}

/// The single chat session, shared with every handler. The lock makes each
/// interaction one atomic step against the conversation.
#[derive(Clone)]
pub struct WebState {
    session: Arc<Mutex<ChatSession>>,
    model: String,
}

impl WebState {
    pub fn new(session: ChatSession, model: &str) -> WebState {
        return WebState {
            session: Arc::new(Mutex::new(session)),
            model: model.to_string(),
        };
    }
}

#[derive(Deserialize)]
struct ChatForm {
    #[serde(default)]
    prompt: String,
}

#[derive(Serialize)]
struct TranscriptLink {
    id: String,
    label: String,
}

/// Message content goes through markdown and is marked safe, everything
/// else in the page stays auto-escaped.
fn message_view(message: &Message) -> Value {
    return context! {
        role => message.role,
        html => Value::from_safe_string(markdown::to_html(&message.content)),
    };
}

async fn render(
    state: &WebState,
    session: &ChatSession,
    notice: Option<Notice>,
) -> Result<Html<String>, WebError> {
    let mut notice = notice;
    let transcripts = match session.transcripts().await {
        Ok(summaries) => summaries
            .iter()
            .map(|summary| {
                return TranscriptLink {
                    id: summary.id.to_string(),
                    label: summary.label(),
                };
            })
            .collect::<Vec<TranscriptLink>>(),
        Err(err) => {
            tracing::error!(err = ?err, "failed to list saved conversations");
            if notice.is_none() {
                notice = Some(Notice::error("Failed to list saved conversations"));
            }
            vec![]
        }
    };

    let page = TEMPLATES.get_template("index.html")?.render(context! {
        title => TITLE,
        model => &state.model,
        messages => session.messages().iter().map(message_view).collect::<Vec<Value>>(),
        transcripts => transcripts,
        notice => notice,
    })?;

    return Ok(Html(page));
}

async fn index(State(state): State<WebState>) -> Result<Html<String>, WebError> {
    let session = state.session.lock().await;
    return render(&state, &session, None).await;
}

async fn chat(
    State(state): State<WebState>,
    Form(form): Form<ChatForm>,
) -> Result<Html<String>, WebError> {
    let mut session = state.session.lock().await;
    tracing::info!(chars = form.prompt.len(), "chat submitted");
    session.submit(&form.prompt).await;

    return render(&state, &session, None).await;
}

async fn save(State(state): State<WebState>) -> Result<Html<String>, WebError> {
    let session = state.session.lock().await;
    let notice = session.save().await;

    return render(&state, &session, notice).await;
}

async fn clear(State(state): State<WebState>) -> Result<Html<String>, WebError> {
    let mut session = state.session.lock().await;
    session.clear();
    tracing::info!("chat cleared");

    return render(&state, &session, None).await;
}

async fn load(
    State(state): State<WebState>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let mut session = state.session.lock().await;
    let notice = session.load(&id).await;

    return render(&state, &session, Some(notice)).await;
}

async fn asset(Path(path): Path<String>) -> Result<Response, WebError> {
    if !path.ends_with(".css") {
        return Err(WebError::NotFound(path));
    }

    if let Some(file) = Assets::get(&path) {
        return Ok((
            [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
            file.data.into_owned(),
        )
            .into_response());
    }

    return Err(WebError::NotFound(path));
}

pub fn router(state: WebState) -> Router {
    return Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .route("/save", post(save))
        .route("/clear", post(clear))
        .route("/load/{id}", post(load))
        .route("/assets/{*path}", get(asset))
        .with_state(state);
}

pub async fn start(session: ChatSession) -> Result<()> {
    let address = Config::get(ConfigKey::Address);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| return format!("Failed to listen on {address}"))?;

    tracing::info!(address = %address, "serving chat");
    println!("Chat is running at http://{address}");

    let state = WebState::new(session, &Config::get(ConfigKey::Model));
    axum::serve(listener, router(state)).await?;

    return Ok(());
}
