use gptlite::utils::sanitize::strip_script_delimiters;
use gptlite::{estimate_tokens, preparse_content, preparse_voice, save_tokens};

// Tests for the opt-in text helpers.

#[test]
fn test_save_tokens_documented_example() {
    let compacted = save_tokens("Please see you tomorrow, thanks!");

    assert!(compacted.contains("plz"), "got {compacted}");
    assert!(compacted.contains("2morrow"), "got {compacted}");
    assert!(compacted.contains("thx"), "got {compacted}");
    for punctuation in ['.', ',', '!', '?', ':', ';', '¿', '¡', '`'] {
        assert!(!compacted.contains(punctuation));
    }
    assert_eq!(compacted, "plzcyou2morrowthx");
}

#[test]
fn test_save_tokens_drops_line_breaks_and_whitespace() {
    assert_eq!(save_tokens("line one\nline\ttwo\r\n  three"), "lineonelinetwothree");
}

#[test]
fn test_save_tokens_removes_articles_case_sensitively() {
    assert_eq!(save_tokens("the cat and a dog"), "catanddog");
    assert_eq!(save_tokens("The cat"), "Thecat");
    assert_eq!(save_tokens("el perro y la gata"), "perroygata");
    // whole words only
    assert_eq!(save_tokens("another theme"), "anothertheme");
}

#[test]
fn test_save_tokens_abbreviations_ignore_case() {
    assert_eq!(save_tokens("THANKS people"), "thxppl");
    assert_eq!(save_tokens("be right back later"), "brbl8r");
    assert_eq!(save_tokens("Great message"), "gr8msg");
    // partial words are left alone
    assert_eq!(save_tokens("seen"), "seen");
}

#[test]
fn test_save_tokens_contractions() {
    assert_eq!(
        save_tokens("I will not go because you are late"),
        "Iwontgocuzurelate"
    );
    assert_eq!(save_tokens("she is here, he is not"), "shesherehesnot");
    // case-sensitive
    assert_eq!(save_tokens("You are"), "Youare");
}

#[test]
fn test_save_tokens_leaves_tag_interiors() {
    assert_eq!(
        save_tokens("<div id=\"main box\">\n  Hello   world\n</div>"),
        "<div id=\"main box\">Helloworld</div>"
    );
}

#[test]
fn test_estimate_tokens() {
    assert_eq!(estimate_tokens(""), 1);
    let text = "This is a longer sentence that should be approximately twelve tokens.";
    assert_eq!(estimate_tokens(text), 18);
    // counted in characters, not bytes
    assert_eq!(estimate_tokens("ñandú ñandú"), 3);
}

#[test]
fn test_preparse_voice_removes_fenced_blocks() {
    assert_eq!(preparse_voice("before ```code block``` after"), "before  after");
}

#[test]
fn test_preparse_voice_multiline_and_non_greedy() {
    let reply = "Run this:\n```rust\nfn main() {}\n```\nthen this:\n```sh\ncargo run\n```\nDone.";
    assert_eq!(preparse_voice(reply), "Run this:\n\nthen this:\n\nDone.");
}

#[test]
fn test_preparse_voice_strips_script_delimiters() {
    assert_eq!(preparse_voice("<?php echo 'hi'; ?> spoken"), " echo 'hi';  spoken");
    assert_eq!(preparse_voice("unclosed ``` fence"), "unclosed ``` fence");
}

#[test]
fn test_preparse_content_escapes_markup() {
    assert_eq!(
        preparse_content("<script>alert(\"x\")</script>"),
        "&lt;script&gt;alert(\"x\")&lt;/script&gt;"
    );
    assert_eq!(preparse_content("a & b"), "a &amp; b");
}

#[test]
fn test_preparse_content_line_breaks() {
    assert_eq!(
        preparse_content("first\nsecond\r\nthird"),
        "first<br />\nsecond<br />\r\nthird"
    );
}

#[test]
fn test_preparse_content_removes_script_delimiters() {
    assert_eq!(preparse_content("<?php echo 1; ?>"), " echo 1; ");
    assert_eq!(strip_script_delimiters("no code here"), "no code here");
}

#[test]
fn test_preparse_content_drops_nul_bytes() {
    assert_eq!(preparse_content("a\0b<?php"), "ab");
    assert_eq!(preparse_content("\0<i>\0</i>"), "&lt;i&gt;&lt;/i&gt;");
}
