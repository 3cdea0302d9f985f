//! All remote API functionality

pub mod client;
pub mod response;
pub mod transport;

// Re-export main types for convenience
pub use client::{GptClient, build_chat_messages};
pub use response::ApiResponse;
pub use transport::{HttpTransport, Transport};
