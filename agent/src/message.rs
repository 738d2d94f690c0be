//! Transcript message types.
//!
//! A [`Message`] is immutable once created. The transcript only ever appends
//! messages or swaps the pending placeholder for a fresh one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::{Display, IntoStaticStr};

/// Author of a transcript entry.
///
/// Assistant replies, the greeting and the placeholder all use [`Role::System`].
/// Serializes to the lowercase name used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    System,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A single transcript entry.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    role: Role,
    content: String,
    /// Creation time, only used for display.
    sent_at: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user<S: ToString>(content: S) -> Message {
        Message::new(Role::User, content)
    }

    /// Create a new system message.
    pub fn system<S: ToString>(content: S) -> Message {
        Message::new(Role::System, content)
    }

    fn new<S: ToString>(role: Role, content: S) -> Message {
        Message {
            role,
            content: content.to_string(),
            sent_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
