//! Token-saving text compaction.
//!
//! [`save_tokens`] is lossy: it drops punctuation, articles and whitespace
//! and swaps common words for chat abbreviations. Nothing in the client
//! applies it automatically; callers opt in per message.

use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("please", "plz"),
    ("people", "ppl"),
    ("great", "gr8"),
    ("through", "thru"),
    ("tonight", "2nite"),
    ("tomorrow", "2morrow"),
    ("message", "msg"),
    ("later", "l8r"),
    ("between", "btwn"),
    ("because", "cuz"),
    ("your", "ur"),
    ("thanks", "thx"),
    ("see", "c"),
    ("be right back", "brb"),
    ("laughing out loud", "lol"),
    ("by the way", "btw"),
];

pub const CONTRACTIONS: &[(&str, &str)] = &[
    ("you are", "ure"),
    ("we are", "were"),
    ("they are", "theyre"),
    ("he is", "hes"),
    ("she is", "shes"),
    ("that is", "thats"),
    ("there is", "theres"),
    ("where is", "wheres"),
    ("how is", "hows"),
    ("will not", "wont"),
    ("have not", "havent"),
    ("has not", "hasnt"),
    ("had not", "hadnt"),
    ("could not", "couldnt"),
    ("should not", "shouldnt"),
    ("would not", "wouldnt"),
    ("did not", "didnt"),
    ("does not", "doesnt"),
];

static LINE_BREAKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t]+").expect("line break regex compiles"));

// Not an HTML parser: a tag is `<` up to the next `>`, everything else is text.
static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>|[^<>]+").expect("segment regex compiles"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex compiles"));

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,!¿¡?:;`]+").expect("punctuation regex compiles"));

static ARTICLES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:el|la|los|las|un|una|unos|unas|the|a|an)\b")
        .expect("articles regex compiles")
});

static ABBREVIATIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = ABBREVIATIONS
        .iter()
        .map(|(full, _)| regex::escape(full))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})\b")).expect("abbreviations regex compiles")
});

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Compacts `input` to use fewer tokens.
///
/// Stages, in order: line breaks and tabs become spaces; whitespace runs
/// outside `<...>` tags collapse to one space; punctuation (`.,!¿¡?:;` and
/// backtick) is dropped; English and Spanish articles are dropped
/// (case-sensitive, whole words); words from [`ABBREVIATIONS`] are replaced
/// (case-insensitive, whole words); phrases from [`CONTRACTIONS`] are
/// replaced (case-sensitive); finally all whitespace outside tags is removed.
/// Tag interiors are never touched by the whitespace stages.
///
/// ```
/// use gptlite::utils::tokens::save_tokens;
///
/// assert_eq!(save_tokens("Please see you tomorrow, thanks!"), "plzcyou2morrowthx");
/// ```
#[must_use]
pub fn save_tokens(input: &str) -> String {
    let text = LINE_BREAKS_RE.replace_all(input, " ");
    let text = map_text_segments(&text, |segment| {
        WHITESPACE_RE.replace_all(segment, " ").into_owned()
    });
    let text = PUNCTUATION_RE.replace_all(&text, "");
    let text = ARTICLES_RE.replace_all(&text, "");
    let text = ABBREVIATIONS_RE.replace_all(&text, |caps: &Captures| {
        let matched = &caps[0];
        ABBREVIATIONS
            .iter()
            .find(|(full, _)| full.eq_ignore_ascii_case(matched))
            .map_or_else(|| matched.to_string(), |(_, short)| (*short).to_string())
    });
    let text = CONTRACTIONS
        .iter()
        .fold(text.into_owned(), |acc, (full, short)| acc.replace(full, short));

    map_text_segments(&text, |segment| {
        WHITESPACE_RE.replace_all(segment, "").into_owned()
    })
}

fn map_text_segments(input: &str, transform: impl Fn(&str) -> String) -> String {
    SEGMENT_RE
        .replace_all(input, |caps: &Captures| {
            let segment = &caps[0];
            if segment.starts_with('<') {
                segment.to_string()
            } else {
                transform(segment)
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("hello"), 2);
        assert_eq!(estimate_tokens("ñandú"), 2);
    }

    #[test]
    fn tag_interiors_keep_their_spaces() {
        assert_eq!(
            save_tokens("<p class=\"note big\">Hello   world</p>"),
            "<p class=\"note big\">Helloworld</p>"
        );
    }

    #[test]
    fn stray_angle_brackets_pass_through() {
        assert_eq!(save_tokens("x > y"), "x>y");
    }
}
