//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use gptlite::{GptError, Transport};
use reqwest::header::HeaderMap;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Stands in for the network: records every request and answers with
/// queued bodies in order.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn replying<I, S>(bodies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let transport = Self::default();
        transport
            .replies
            .lock()
            .unwrap()
            .extend(bodies.into_iter().map(|b| Ok(b.into())));
        Arc::new(transport)
    }

    pub fn failing(message: &str) -> Arc<Self> {
        let transport = Self::default();
        transport
            .replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        Arc::new(transport)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn post(&self, url: &str, headers: &HeaderMap, body: &str) -> Result<String, GptError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: serde_json::from_str(body).expect("client always sends JSON"),
        });

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(GptError::HttpError(message)),
            None => Err(GptError::HttpError("no reply queued".to_string())),
        }
    }
}

pub fn chat_reply(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn completion_reply(text: &str) -> String {
    json!({
        "id": "cmpl-test",
        "object": "text_completion",
        "choices": [{ "index": 0, "text": text, "finish_reason": "length" }]
    })
    .to_string()
}

pub fn error_reply(message: &str) -> String {
    json!({
        "error": { "message": message, "type": "invalid_request_error", "code": "invalid_api_key" }
    })
    .to_string()
}
