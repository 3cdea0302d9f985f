use std::error::Error;
use gptlite::GptError;

#[test]
fn test_gpt_error_implements_error_trait() {
    // Verify GptError implements the Error trait
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    let error = GptError::ConfigError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_gpt_error_display() {
    let error = GptError::ConfigError("API key is not set".to_string());
    assert_eq!(
        format!("{error}"),
        "Invalid client configuration: API key is not set"
    );

    let error = GptError::HttpError("Connection refused".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection refused"
    );

    let error = GptError::ConversationNotFound("645756bcd4697".to_string());
    assert_eq!(format!("{error}"), "Conversation not found: 645756bcd4697");
}

#[test]
fn test_gpt_error_from_conversions() {
    // io errors are storage failures
    let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let gpt_err: GptError = err.into();
    match gpt_err {
        GptError::StorageError(msg) => assert!(msg.contains("read-only")),
        _ => panic!("Unexpected error type"),
    }

    // serde_json errors are serialization failures
    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let gpt_err: GptError = err.into();
    assert!(matches!(gpt_err, GptError::SerializationError(_)));

    // reqwest::Error can't be built directly; this only checks the conversion exists
    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> GptError {
        GptError::from(err)
    }
}

#[cfg(feature = "cli")]
#[test]
fn test_gpt_error_from_anyhow() {
    let err = anyhow::anyhow!("OPENAI_API_KEY is not set");
    let gpt_err: GptError = err.into();
    match gpt_err {
        GptError::ConfigError(msg) => assert_eq!(msg, "OPENAI_API_KEY is not set"),
        other => panic!("Unexpected error type: {other:?}"),
    }
}
