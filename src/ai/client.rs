//! Chat and completion client.
//!
//! Wraps the two endpoints of an OpenAI-compatible API and keeps optional
//! per-conversation history on disk.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use super::response::ApiResponse;
use super::transport::{HttpTransport, Transport};
use crate::core::config::ClientConfig;
use crate::core::models::{ConversationId, Turn};
use crate::errors::GptError;
use crate::storage::{AuditLog, ConversationStore};
use crate::utils::tokens::estimate_tokens;

/// Assembles the outbound message list: the system turn, the stored
/// history, then the new user turn.
#[must_use]
pub fn build_chat_messages(system_message: &str, user_message: &str, history: &[Turn]) -> Vec<Turn> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Turn::system(system_message));
    messages.extend_from_slice(history);
    messages.push(Turn::user(user_message));
    messages
}

pub struct GptClient {
    config: ClientConfig,
    headers: HeaderMap,
    transport: Box<dyn Transport>,
    store: Option<ConversationStore>,
    audit: Option<AuditLog>,
}

impl GptClient {
    /// Builds a client that talks to `config.base_url` over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns `GptError::ConfigError` if the configuration is invalid and
    /// `GptError::HttpError` if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, GptError> {
        let transport = HttpTransport::new(config.request_timeout)?;
        Self::with_transport(config, transport)
    }

    /// Builds a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns `GptError::ConfigError` if the configuration is invalid.
    pub fn with_transport(
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Result<Self, GptError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| GptError::ConfigError(format!("API key is not a valid header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let store = config.conversation_path.clone().map(ConversationStore::new);
        let audit = config.log_path.clone().map(AuditLog::new);

        Ok(Self {
            config,
            headers,
            transport: Box::new(transport),
            store,
            audit,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> Option<&ConversationStore> {
        self.store.as_ref()
    }

    /// Sends a chat request made of `system_message`, the stored history of
    /// `conversation_id` (if any) and `user_message`.
    ///
    /// When the reply carries assistant text and a conversation is in use,
    /// the user message and the reply are appended to its history. API-level
    /// errors come back as `Ok(ApiResponse::ApiError { .. })` and leave the
    /// history untouched.
    ///
    /// # Errors
    ///
    /// Fails if the conversation history cannot be loaded or updated, or if
    /// the request cannot be sent.
    pub fn chat(
        &self,
        system_message: &str,
        user_message: &str,
        conversation_id: Option<&ConversationId>,
    ) -> Result<ApiResponse, GptError> {
        let conversation = match (conversation_id, self.store.as_ref()) {
            (Some(id), Some(store)) => Some((id, store)),
            (Some(id), None) => {
                warn!("Ignoring conversation {id}: no conversation path configured");
                None
            }
            (None, _) => None,
        };

        let history = match conversation {
            Some((id, store)) => store.load(id)?,
            None => Vec::new(),
        };

        let messages = build_chat_messages(system_message, user_message, &history);

        #[cfg(feature = "debug-logs")]
        info!("Using chat prompt:\n{:?}", messages);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            "Sending chat request to model {} with {} messages ({} from history)",
            self.config.model,
            messages.len(),
            history.len()
        );

        let estimated_input_tokens = messages
            .iter()
            .map(|turn| estimate_tokens(&turn.content))
            .sum::<usize>();
        debug!("Estimated input tokens: {}", estimated_input_tokens);

        let body = json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.wire_temperature(),
        });

        let raw = self.send_request(&self.config.chat_url(), &self.headers, &body)?;
        let response = ApiResponse::from_chat_body(&raw);

        match &response {
            ApiResponse::Success { content, .. } => {
                if let Some((id, store)) = conversation {
                    let stored = store.append(
                        id,
                        &[Turn::user(user_message), Turn::assistant(content.clone())],
                    )?;
                    debug!("Conversation {id} now holds {stored} turns");
                }
            }
            ApiResponse::ApiError {
                message, error_type, ..
            } => {
                warn!(
                    "Chat request returned an API error ({}): {message}",
                    error_type.as_deref().unwrap_or("unknown")
                );
            }
            ApiResponse::Unrecognized(_) | ApiResponse::Undecodable(_) => {
                warn!("Chat response did not contain choices[0].message.content");
            }
        }

        Ok(response)
    }

    /// Sends a single prompt to the completions endpoint. No history is read
    /// or written.
    ///
    /// # Errors
    ///
    /// Fails if the request cannot be sent.
    pub fn completion(&self, prompt: &str) -> Result<ApiResponse, GptError> {
        info!(
            "Sending completion request to model {} (~{} tokens)",
            self.config.model,
            estimate_tokens(prompt)
        );

        let body = json!({
            "model": self.config.model,
            "prompt": prompt,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.wire_temperature(),
        });

        let raw = self.send_request(&self.config.completions_url(), &self.headers, &body)?;
        let response = ApiResponse::from_completion_body(&raw);

        if let ApiResponse::ApiError { message, .. } = &response {
            warn!("Completion request returned an API error: {message}");
        }

        Ok(response)
    }

    /// Allocates a new conversation with an empty history.
    ///
    /// # Errors
    ///
    /// Returns `GptError::ConfigError` if no conversation path is configured
    /// or it is not a directory, and `GptError::StorageError` if the file
    /// cannot be written.
    pub fn create_conversation(&self) -> Result<ConversationId, GptError> {
        let store = self.store.as_ref().ok_or_else(|| {
            GptError::ConfigError("conversation path is not set".to_string())
        })?;
        store.ensure_dir()?;

        let id = ConversationId::generate();
        store.create(&id)?;

        info!("Created conversation {id} in {}", store.dir().display());
        Ok(id)
    }

    /// Posts `body` as JSON to `url` and returns the raw response body.
    ///
    /// The HTTP status is not inspected. When a log path is configured the
    /// exchange is appended to it; a failing log write is reported but does
    /// not fail the request.
    ///
    /// # Errors
    ///
    /// Returns `GptError::HttpError` if the transport fails and
    /// `GptError::SerializationError` if `body` cannot be serialized.
    pub fn send_request(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: &Value,
    ) -> Result<String, GptError> {
        let payload = serde_json::to_string(body)?;

        let raw = self
            .transport
            .post(url, headers, &payload)
            .inspect_err(|e| error!("Request to {url} failed: {e}"))?;

        if let Some(audit) = &self.audit {
            match audit.record(url, &payload, &raw) {
                Ok(()) => debug!("Logged exchange with {url} to {}", audit.path().display()),
                Err(e) => warn!("Could not write request log: {e}"),
            }
        }

        Ok(raw)
    }
}

impl std::fmt::Debug for GptClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GptClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .field("store", &self.store)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}
