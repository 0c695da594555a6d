#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Role;

/// A single chat message. Once created a message is never edited, the
/// conversation only grows by appending new ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            role,
            content: content.to_string(),
        };
    }

    pub fn user(content: &str) -> Message {
        return Message::new(Role::User, content);
    }

    pub fn assistant(content: &str) -> Message {
        return Message::new(Role::Assistant, content);
    }

    /// First line of the message, shortened for one line listings.
    pub fn headline(&self, max_chars: usize) -> String {
        let line = self.content.split('\n').next().unwrap_or_default().trim();
        if line.chars().count() <= max_chars {
            return line.to_string();
        }

        let cut = line
            .chars()
            .take(max_chars.saturating_sub(3))
            .collect::<String>();
        return format!("{cut}...");
    }
}
