//! Core types and structures for medimind
//!
//! This crate provides the foundational types used across all medimind crates.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of attempts for a single `answer` call
pub const MAX_RETRIES: u32 = 3;

/// Largest image accepted for vision requests, measured before base64 encoding
pub const MAX_IMAGE_BYTES: u64 = 4 * 1024 * 1024;

/// End-of-sequence marker some models leak into streamed output
pub const END_OF_SEQUENCE_MARKER: &str = "</s>";

/// Default model used for streamed text completions
pub const DEFAULT_TEXT_MODEL: &str = "llama3-70b-8192";

/// Default model used for image analysis
pub const DEFAULT_VISION_MODEL: &str = "llama-3.2-90b-vision-preview";

/// Default assistant display name
pub const DEFAULT_ASSISTANT_NAME: &str = "MediMind AI";

/// Default user display name
pub const DEFAULT_USER_NAME: &str = "User";

// ============================================================================
// Message Types
// ============================================================================

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Label used when rendering history for a prompt. Anything that is not
    /// the user is shown as the assistant.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::System | Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role-tagged chat message. This is both the persisted chat log
/// entry and the unit sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_message_deserializes_from_log_entry() {
        let msg: Message =
            serde_json::from_str(r#"{"role": "user", "content": "headache"}"#).unwrap();
        assert_eq!(msg, Message::user("headache"));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let parsed = serde_json::from_str::<Message>(r#"{"role": "tool", "content": "x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_prompt_labels() {
        assert_eq!(Role::User.prompt_label(), "User");
        assert_eq!(Role::Assistant.prompt_label(), "Assistant");
        assert_eq!(Role::System.prompt_label(), "Assistant");
        assert_eq!(Role::System.to_string(), "system");
    }
}
