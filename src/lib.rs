//! gptlite - a small blocking client for OpenAI-compatible chat and completion APIs.
//!
//! The client sends one request per call, returns the decoded payload, and can
//! keep a per-conversation history on disk as plain JSON files.
//!
//! # Architecture
//!
//! - `ai`: the [`GptClient`], its [`Transport`] seam and response decoding
//! - `core`: [`ClientConfig`] and the `Turn`/`ConversationId` data model
//! - `storage`: conversation files and the request audit log
//! - `utils`: opt-in text helpers (`save_tokens`, `preparse_content`, `preparse_voice`)
//!
//! # Example
//!
//! ```no_run
//! use gptlite::{ClientConfig, GptClient};
//!
//! fn main() -> Result<(), gptlite::GptError> {
//!     gptlite::setup_logging();
//!
//!     let config = ClientConfig::new("sk-...")
//!         .with_conversation_path("./conversations")
//!         .with_log_path("./chat.log");
//!     let client = GptClient::new(config)?;
//!
//!     let conversation = client.create_conversation()?;
//!     let system = "You are an assistant that translates between any languages.";
//!
//!     let first = client.chat(
//!         system,
//!         "Translate the following sentence from English to Spanish: \"Hello, how are you?\"",
//!         Some(&conversation),
//!     )?;
//!     println!("{}", first.content().unwrap_or("<no reply>"));
//!
//!     let second = client.chat(
//!         system,
//!         "Now, please translate this: \"I am fine, thank you.\"",
//!         Some(&conversation),
//!     )?;
//!     println!("{}", second.content().unwrap_or("<no reply>"));
//!
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod ai;
pub mod core;
pub mod errors;
pub mod storage;
pub mod utils;

pub use ai::{ApiResponse, GptClient, HttpTransport, Transport};
pub use crate::core::{ClientConfig, ConversationId, Role, TemperatureEncoding, Turn};
pub use errors::GptError;
pub use utils::{estimate_tokens, preparse_content, preparse_voice, save_tokens};

/// Configure structured logging with JSON output.
///
/// Log levels come from `RUST_LOG` and default to `info`. Calling this more
/// than once is harmless; only the first call installs a subscriber.
///
/// # Example
///
/// ```
/// gptlite::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
