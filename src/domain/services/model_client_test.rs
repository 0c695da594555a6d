use test_utils::gemini_candidate_body;

use super::identity_reply;
use super::ModelClient;
use super::IDENTITY_REPLY;
use crate::infrastructure::backends::gemini::Gemini;

const COMPLETION_PATH: &str = "/v1beta/models/model-1:generateContent?key=abc";

fn client_for(url: String) -> ModelClient {
    return ModelClient::new(Box::new(Gemini::new(&url, "abc", "model-1", "200")));
}

#[test]
fn it_matches_identity_triggers_in_any_case() {
    for prompt in [
        "Who are you?",
        "so... WHAT ARE YOU exactly",
        "Please Introduce Yourself",
        "who are you",
    ] {
        assert_eq!(identity_reply(prompt), Some(IDENTITY_REPLY), "{prompt}");
    }
}

#[test]
fn it_ignores_other_prompts() {
    assert_eq!(identity_reply("Who is the president?"), None);
    assert_eq!(identity_reply("Hello"), None);
}

#[test]
fn it_matches_triggers_inside_longer_words() {
    assert_eq!(identity_reply("what are your hours"), Some(IDENTITY_REPLY));
}

#[tokio::test]
async fn it_answers_identity_prompts_without_calling_the_backend() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", COMPLETION_PATH)
        .with_status(200)
        .with_body(gemini_candidate_body("should not be used"))
        .expect(0)
        .create();

    let client = client_for(server.url());
    let reply = client.generate("Hey, who are you?").await;

    assert_eq!(reply, IDENTITY_REPLY);
    mock.assert();
}

#[tokio::test]
async fn it_returns_candidate_text() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", COMPLETION_PATH)
        .with_status(200)
        .with_body(gemini_candidate_body("Mexico City."))
        .create();

    let client = client_for(server.url());
    let reply = client.generate("What is the capital of Mexico?").await;

    assert_eq!(reply, "Mexico City.");
    mock.assert();
}

#[tokio::test]
async fn it_renders_status_errors_as_text() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", COMPLETION_PATH)
        .with_status(500)
        .with_body("server error")
        .create();

    let client = client_for(server.url());
    let reply = client.generate("Hello").await;

    assert_eq!(reply, "Error: 500 - server error");
    mock.assert();
}

#[tokio::test]
async fn it_renders_transport_errors_as_text() {
    let client = client_for("http://127.0.0.1:1".to_string());
    let reply = client.generate("Hello").await;

    assert!(reply.starts_with("Error communicating with Gemini API: "));
}
