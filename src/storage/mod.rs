//! On-disk state: conversation histories and the request audit log

pub mod audit_log;
pub mod conversation_store;

pub use audit_log::AuditLog;
pub use conversation_store::ConversationStore;
