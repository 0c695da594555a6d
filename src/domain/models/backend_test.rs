use super::BackendError;
use super::BackendName;
use super::BackendPrompt;

#[test]
fn it_adds_system_context() {
    let prompt = BackendPrompt::new("Hello world");

    insta::assert_snapshot!(prompt.with_system_context(), @r###"
    You are Gemini, a large language model trained by Google.
    You are being used in a personal chat project. Always be helpful and informative.

    User: Hello world
    "###);
}

#[test]
fn it_parses_backend_names() {
    assert_eq!(BackendName::parse("gemini"), Some(BackendName::Gemini));
    assert_eq!(BackendName::parse("ollama"), None);
}

#[test]
fn it_formats_status_errors() {
    let err = BackendError::Status {
        status: 500,
        body: "server error".to_string(),
    };
    assert_eq!(err.to_string(), "Error: 500 - server error");
}

#[test]
fn it_formats_api_errors() {
    let err = BackendError::Api("API key not valid".to_string());
    assert_eq!(err.to_string(), "API Error: API key not valid");
}

#[test]
fn it_formats_transport_errors() {
    let err = BackendError::Transport("connection refused".to_string());
    assert_eq!(
        err.to_string(),
        "Error communicating with Gemini API: connection refused"
    );
}
