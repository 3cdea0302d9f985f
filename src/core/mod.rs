//! Configuration and data model shared by the client and the stores

pub mod config;
pub mod models;

pub use config::{ClientConfig, TemperatureEncoding};
pub use models::{ConversationId, Role, Turn};
