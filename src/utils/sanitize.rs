//! Post-processing of model output for HTML and voice rendering.

use std::sync::LazyLock;

use regex::Regex;

/// Removed in this order, so `<?php` goes before its `<?` prefix.
pub const SCRIPT_DELIMITERS: [&str; 3] = ["<?php", "?>", "<?"];

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\n\r|\n|\r").expect("line break regex compiles"));

static FENCED_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("fenced block regex compiles"));

#[must_use]
pub fn strip_script_delimiters(input: &str) -> String {
    SCRIPT_DELIMITERS
        .iter()
        .fold(input.to_string(), |acc, delimiter| acc.replace(delimiter, ""))
}

/// Escapes `&`, `<` and `>`; quotes are left alone.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Inserts `<br />` before every line break, keeping the break itself.
#[must_use]
pub fn newlines_to_br(input: &str) -> String {
    LINE_BREAK_RE.replace_all(input, "<br />$0").into_owned()
}

/// Makes model output safe to drop into an HTML page.
///
/// Script delimiters and NUL bytes are removed, then every `&`, `<` and `>`
/// is escaped, so any markup in the input shows up as text instead of being
/// interpreted. Line breaks get a `<br />` in front.
///
/// ```
/// use gptlite::utils::sanitize::preparse_content;
///
/// assert_eq!(preparse_content("<b>hi</b>\nbye"), "&lt;b&gt;hi&lt;/b&gt;<br />\nbye");
/// ```
#[must_use]
pub fn preparse_content(input: &str) -> String {
    let stripped = strip_script_delimiters(input).replace('\0', "");
    newlines_to_br(&escape_html(&stripped))
}

/// Prepares model output for text-to-speech: script delimiters and whole
/// triple-backtick blocks are removed, surrounding text is kept verbatim.
#[must_use]
pub fn preparse_voice(input: &str) -> String {
    FENCED_BLOCK_RE
        .replace_all(&strip_script_delimiters(input), "")
        .into_owned()
}
