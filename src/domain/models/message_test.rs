use super::Message;
use super::Role;

#[test]
fn it_executes_new() {
    let msg = Message::new(Role::User, "Hi there!");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.role.to_string(), "user");
    assert_eq!(msg.content, "Hi there!".to_string());
}

#[test]
fn it_executes_assistant() {
    let msg = Message::assistant("Hello!");
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.role.to_string(), "assistant");
}

#[test]
fn it_keeps_content_verbatim() {
    let msg = Message::user("\tindented\n  and multi line ");
    assert_eq!(msg.content, "\tindented\n  and multi line ");
}

#[test]
fn it_serializes_role_lowercase() {
    let payload = serde_json::to_string(&Message::user("Hello")).unwrap();
    insta::assert_snapshot!(payload, @r###"{"role":"user","content":"Hello"}"###);
}

#[test]
fn it_executes_headline() {
    let msg = Message::user("What is the capital of Mexico?\nAnd of Canada?");
    assert_eq!(msg.headline(70), "What is the capital of Mexico?");
}

#[test]
fn it_executes_headline_truncating() {
    let msg = Message::user("abcdefghijklmnop");
    assert_eq!(msg.headline(10), "abcdefg...");
}
