#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

/// Successful `generateContent` response body with a single candidate.
pub fn gemini_candidate_body(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n");
    return format!(
        r#"{{
  "candidates": [
    {{
      "content": {{
        "parts": [{{ "text": "{escaped}" }}],
        "role": "model"
      }},
      "finishReason": "STOP",
      "index": 0
    }}
  ]
}}"#
    );
}

/// Error envelope as returned by the Gemini API, including on a 200 status
/// from some proxies.
pub fn gemini_error_body(message: &str) -> String {
    return format!(
        r#"{{
  "error": {{
    "code": 400,
    "message": "{message}",
    "status": "INVALID_ARGUMENT"
  }}
}}"#
    );
}

/// A saved transcript document written by an older release, before records
/// carried a timestamp.
pub fn legacy_transcript_fixture(id: &str) -> String {
    return format!(
        r#"id: {id}
messages:
- role: user
  content: Is this an old chat?
- role: assistant
  content: It is.
"#
    );
}
