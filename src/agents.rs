//! Chat agents.
//!
//! A chat request names an agent type. The set of kinds is closed
//! ([`AgentKind`]) and each kind has one [`Agent`] implementation registered
//! in an [`AgentRegistry`]. Neither built-in agent searches or generates
//! anything yet: both answer with a fixed placeholder that echoes the
//! question.
//!
//! # Architecture
//!
//! ```text
//!   POST /api/chat { message, agent_type }
//!                │
//!                ▼
//!   AgentKind::from_tag(agent_type)
//!                │
//!        ┌───────┴─────────┐
//!        ▼                 ▼
//!  DocumentSearch    DocumentCreator
//! ```

use anyhow::Result;
use async_trait::async_trait;

use crate::store::Store;

/// Tag selecting the document-search agent. Also the default tag.
pub const DOCUMENT_SEARCH_TAG: &str = "document-search";

/// Tag reported for the document-creator agent.
pub const DOCUMENT_CREATOR_TAG: &str = "document-creator";

/// The closed set of agent kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    DocumentSearch,
    DocumentCreator,
}

impl AgentKind {
    /// Maps a caller-supplied tag onto a kind.
    ///
    /// Only the exact tag `"document-search"` selects document search; every
    /// other value, including the empty string, selects the document creator.
    pub fn from_tag(tag: &str) -> Self {
        if tag == DOCUMENT_SEARCH_TAG {
            Self::DocumentSearch
        } else {
            Self::DocumentCreator
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::DocumentSearch => DOCUMENT_SEARCH_TAG,
            Self::DocumentCreator => DOCUMENT_CREATOR_TAG,
        }
    }
}

/// What an agent may look at while answering.
pub struct AgentContext<'a> {
    /// Uploaded documents, for agents that retrieve over them. The
    /// placeholder agents only need `document_count`.
    pub store: &'a dyn Store,
    /// Document count observed when the request was accepted.
    pub document_count: usize,
}

/// A chat agent that turns a user message into a reply.
///
/// Replacing the placeholder behaviour of a kind means registering a new
/// implementation for it; the chat handler does not change.
#[async_trait]
pub trait Agent: Send + Sync {
    fn kind(&self) -> AgentKind;

    fn description(&self) -> &str;

    /// Produce the assistant reply for `message`.
    async fn respond(&self, message: &str, ctx: &AgentContext<'_>) -> Result<String>;
}

/// Placeholder for retrieval over uploaded documents.
pub struct DocumentSearchAgent;

#[async_trait]
impl Agent for DocumentSearchAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::DocumentSearch
    }

    fn description(&self) -> &str {
        "Searches uploaded documents (pending)"
    }

    async fn respond(&self, message: &str, ctx: &AgentContext<'_>) -> Result<String> {
        Ok(format!(
            "🔍 **Document Search Agent** (PENDING)\n\n\
             I searched through {} uploaded documents for: '{}'\n\n\
             *This is a placeholder response. RAG functionality will be implemented later \
             with proper document embedding and similarity search.*",
            ctx.document_count, message
        ))
    }
}

/// Placeholder for document generation.
pub struct DocumentCreatorAgent;

#[async_trait]
impl Agent for DocumentCreatorAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::DocumentCreator
    }

    fn description(&self) -> &str {
        "Drafts new documents (pending)"
    }

    async fn respond(&self, message: &str, _ctx: &AgentContext<'_>) -> Result<String> {
        Ok(format!(
            "📝 **Document Creator Agent** (PENDING)\n\n\
             I would create a document about: '{}'\n\n\
             *This is a placeholder response. Document generation functionality will be \
             implemented later with AI assistance.*",
            message
        ))
    }
}

/// One agent per [`AgentKind`].
pub struct AgentRegistry {
    agents: Vec<Box<dyn Agent>>,
}

impl AgentRegistry {
    /// Create an empty agent registry.
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Registry holding the two placeholder agents.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DocumentSearchAgent));
        registry.register(Box::new(DocumentCreatorAgent));
        registry
    }

    /// Register an agent, replacing any agent already registered for its kind.
    pub fn register(&mut self, agent: Box<dyn Agent>) {
        self.agents.retain(|a| a.kind() != agent.kind());
        self.agents.push(agent);
    }

    pub fn agents(&self) -> &[Box<dyn Agent>] {
        &self.agents
    }

    pub fn find(&self, kind: AgentKind) -> Option<&dyn Agent> {
        self.agents
            .iter()
            .find(|a| a.kind() == kind)
            .map(|a| a.as_ref())
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn only_exact_tag_selects_search() {
        assert_eq!(AgentKind::from_tag("document-search"), AgentKind::DocumentSearch);
        assert_eq!(AgentKind::from_tag("document-creator"), AgentKind::DocumentCreator);
        assert_eq!(AgentKind::from_tag("Document-Search"), AgentKind::DocumentCreator);
        assert_eq!(AgentKind::from_tag(""), AgentKind::DocumentCreator);
        assert_eq!(AgentKind::from_tag("anything"), AgentKind::DocumentCreator);
    }

    #[tokio::test]
    async fn search_reply_reports_document_count() {
        let store = InMemoryStore::new();
        let ctx = AgentContext {
            store: &store,
            document_count: 3,
        };
        let reply = DocumentSearchAgent.respond("budget", &ctx).await.unwrap();
        assert!(reply.starts_with("🔍 **Document Search Agent** (PENDING)"));
        assert!(reply.contains("I searched through 3 uploaded documents for: 'budget'"));
        assert!(reply.ends_with("similarity search.*"));
    }

    #[tokio::test]
    async fn creator_reply_echoes_message() {
        let store = InMemoryStore::new();
        let ctx = AgentContext {
            store: &store,
            document_count: 0,
        };
        let reply = DocumentCreatorAgent.respond("a memo", &ctx).await.unwrap();
        assert!(reply.starts_with("📝 **Document Creator Agent** (PENDING)"));
        assert!(reply.contains("I would create a document about: 'a memo'"));
        assert!(reply.ends_with("with AI assistance.*"));
    }

    #[test]
    fn registry_has_one_agent_per_kind() {
        let mut registry = AgentRegistry::with_builtins();
        assert_eq!(registry.len(), 2);
        assert!(registry.find(AgentKind::DocumentSearch).is_some());
        assert!(registry.find(AgentKind::DocumentCreator).is_some());

        registry.register(Box::new(DocumentSearchAgent));
        assert_eq!(registry.len(), 2);

        let empty = AgentRegistry::new();
        assert!(empty.is_empty());
        assert!(empty.find(AgentKind::DocumentSearch).is_none());
    }
}
