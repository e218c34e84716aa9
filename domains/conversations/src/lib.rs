//! Conversations domain: specialist consultations, messages, AI turns

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Conversation, ConversationSummary, Message, MessageRole, NewMessage};
pub use domain::generator::{
    FallbackReason, Reply, ReplyGenerator, ReplySource, MISSING_API_KEY_MESSAGE,
    TRUNCATED_MESSAGE,
};
pub use domain::orchestrator::{ConversationOrchestrator, Turn, TurnError};
pub use domain::specialists::SpecialistType;
pub use domain::title::derive_title;

// Re-export repository types
#[cfg(any(test, feature = "test-support"))]
pub use repository::memory::InMemoryConversations;
pub use repository::{
    ConversationStore, ConversationsRepositories, MessageStore, PgConversationStore,
    PgMessageStore,
};

// Re-export API types
pub use api::routes;
pub use api::ConversationsState;
