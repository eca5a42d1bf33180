//! Storage abstraction for DocuChat.
//!
//! The [`Store`] trait owns the two append-only sequences the API works on:
//! uploaded documents and chat history. Handlers receive it through axum
//! state rather than reaching for process-wide globals.
//!
//! Implementations must be `Send + Sync` to be shared across request tasks.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ChatMessage, Document, DocumentSummary, NewDocument};

pub use memory::InMemoryStore;

/// Abstract storage backend.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`add_document`](Store::add_document) | Assign an id and append a document |
/// | [`list_documents`](Store::list_documents) | All documents, in upload order |
/// | [`document_count`](Store::document_count) | Number of stored documents |
/// | [`append_exchange`](Store::append_exchange) | Append a user/assistant pair |
/// | [`chat_history`](Store::chat_history) | Full chat history, in call order |
#[async_trait]
pub trait Store: Send + Sync {
    /// Append a document, returning it with its assigned id.
    ///
    /// Ids start at 1 and are strictly increasing in insertion order.
    async fn add_document(&self, doc: NewDocument) -> Result<Document>;

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>>;

    async fn document_count(&self) -> Result<usize>;

    /// Append one user message and the assistant's reply as a single unit.
    ///
    /// Concurrent exchanges never interleave, so history alternates
    /// user/assistant.
    async fn append_exchange(&self, user: ChatMessage, assistant: ChatMessage) -> Result<()>;

    async fn chat_history(&self) -> Result<Vec<ChatMessage>>;
}
