//! Core data models used throughout DocuChat.
//!
//! [`Document`] and [`ChatMessage`] are the two entities held by the
//! [`Store`](crate::store::Store). Both live for the lifetime of the process.

use serde::{Deserialize, Serialize};

/// Timestamp stamped on every document and chat message.
///
/// Uploads and chat turns are not clocked yet; clients only display it.
pub const PLACEHOLDER_TIMESTAMP: &str = "2024-01-01T00:00:00Z";

/// An uploaded plaintext document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: u64,
    pub filename: String,
    pub content: String,
    /// Length of `content` in characters.
    pub size: usize,
    pub uploaded_at: String,
}

/// A document that has been validated but not yet assigned an id.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub filename: String,
    pub content: String,
}

impl NewDocument {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub(crate) fn into_document(self, id: u64) -> Document {
        let size = self.content.chars().count();
        Document {
            id,
            filename: self.filename,
            content: self.content,
            size,
            uploaded_at: PLACEHOLDER_TIMESTAMP.to_string(),
        }
    }
}

/// Listing projection of a [`Document`], without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: u64,
    pub filename: String,
    pub size: usize,
    pub uploaded_at: String,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            size: doc.size,
            uploaded_at: doc.uploaded_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: PLACEHOLDER_TIMESTAMP.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_counts_characters_not_bytes() {
        let doc = NewDocument::new("notes.txt", "héllo").into_document(1);
        assert_eq!(doc.size, 5);
        assert_eq!(doc.content.len(), 6);
        assert_eq!(doc.uploaded_at, PLACEHOLDER_TIMESTAMP);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_value(ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["timestamp"], PLACEHOLDER_TIMESTAMP);
    }
}
