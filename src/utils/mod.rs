pub mod sanitize;
pub mod tokens;

pub use sanitize::{preparse_content, preparse_voice};
pub use tokens::{estimate_tokens, save_tokens};
