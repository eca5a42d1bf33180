//! In-memory [`Store`] implementation.
//!
//! Uses `Vec`s behind `std::sync::RwLock`. Nothing survives a restart.

use std::sync::{PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ChatMessage, Document, DocumentSummary, NewDocument};

use super::Store;

/// Process-lifetime store for documents and chat history.
pub struct InMemoryStore {
    documents: RwLock<Vec<Document>>,
    history: RwLock<Vec<ChatMessage>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            history: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn add_document(&self, doc: NewDocument) -> Result<Document> {
        // Id assignment and append share one write guard.
        let mut docs = self.documents.write().unwrap_or_else(PoisonError::into_inner);
        let id = docs.last().map_or(1, |d| d.id + 1);
        let stored = doc.into_document(id);
        docs.push(stored.clone());
        Ok(stored)
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let docs = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        Ok(docs.iter().map(DocumentSummary::from).collect())
    }

    async fn document_count(&self) -> Result<usize> {
        let docs = self.documents.read().unwrap_or_else(PoisonError::into_inner);
        Ok(docs.len())
    }

    async fn append_exchange(&self, user: ChatMessage, assistant: ChatMessage) -> Result<()> {
        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        history.push(user);
        history.push(assistant);
        Ok(())
    }

    async fn chat_history(&self) -> Result<Vec<ChatMessage>> {
        let history = self.history.read().unwrap_or_else(PoisonError::into_inner);
        Ok(history.clone())
    }
}
