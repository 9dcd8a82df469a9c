// Code Normalization Service
// Strips comments and tags snippets with their language before classification

use crate::models::LanguageTag;
use regex::Regex;
use std::sync::OnceLock;

static PYTHON_COMMENT_LINE: OnceLock<Regex> = OnceLock::new();
static LINE_COMMENT: OnceLock<Regex> = OnceLock::new();
static BLOCK_COMMENT: OnceLock<Regex> = OnceLock::new();

/// Whole lines whose first non-blank character is `#`, including the newline.
/// `\s*` may also swallow blank lines directly above the comment.
fn python_comment_line() -> &'static Regex {
    PYTHON_COMMENT_LINE
        .get_or_init(|| Regex::new(r"(?m)^\s*#.*\n?").expect("python comment regex"))
}

fn line_comment() -> &'static Regex {
    LINE_COMMENT.get_or_init(|| Regex::new(r"//.*").expect("line comment regex"))
}

/// Non-greedy, spans newlines.
fn block_comment() -> &'static Regex {
    BLOCK_COMMENT.get_or_init(|| Regex::new(r"/\*[\s\S]*?\*/").expect("block comment regex"))
}

/// Remove comments from source code.
///
/// Rules are cumulative: Python comment lines first (Python only), then `//`
/// and `/* */` comments for every language. Being regex based, comment
/// markers inside string literals are stripped too.
pub fn remove_comments(code: &str, language: &LanguageTag) -> String {
    let mut s = code.to_string();

    if *language == LanguageTag::Python {
        s = python_comment_line().replace_all(&s, "").into_owned();
    }
    s = line_comment().replace_all(&s, "").into_owned();
    s = block_comment().replace_all(&s, "").into_owned();

    s
}

/// Unicode whitespace plus the ASCII separators `\x1c`..=`\x1f`.
fn is_code_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Build the canonical classifier input: `Language: <tag>\n\n<code>`.
pub fn normalize_code(code: &str, language: &LanguageTag) -> String {
    let trimmed = code.trim_matches('\n');
    let stripped = remove_comments(trimmed, language);
    format!("Language: {}\n\n{}", language, stripped.trim_matches(is_code_space))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_keeps_prefix() {
        assert_eq!(normalize_code("", &LanguageTag::C), "Language: C\n\n");
    }

    #[test]
    fn test_python_comment_lines_removed() {
        let out = normalize_code("  # note\nx = 1", &LanguageTag::Python);
        assert_eq!(out, "Language: Python\n\nx = 1");
    }

    #[test]
    fn test_python_end_to_end_example() {
        let out = normalize_code("# hi\nprint(1)", &LanguageTag::Python);
        assert_eq!(out, "Language: Python\n\nprint(1)");
    }

    #[test]
    fn test_python_comment_swallows_blank_lines_above() {
        let out = normalize_code("x=1\n\n  # c\ny=2", &LanguageTag::Python);
        assert_eq!(out, "Language: Python\n\nx=1\ny=2");
    }

    #[test]
    fn test_ascii_separators_trimmed() {
        assert_eq!(normalize_code("a\x1c", &LanguageTag::C), "Language: C\n\na");
        assert_eq!(
            normalize_code("\x1f\tint x;\x1d \n", &LanguageTag::C),
            "Language: C\n\nint x;"
        );
    }

    #[test]
    fn test_python_inline_hash_is_kept() {
        // Only lines starting with `#` are removed.
        let out = normalize_code("x = 1  # trailing\ny = 2", &LanguageTag::Python);
        assert_eq!(out, "Language: Python\n\nx = 1  # trailing\ny = 2");
    }

    #[test]
    fn test_hash_lines_kept_for_c() {
        let out = normalize_code("#include <stdio.h>\nint main() {}", &LanguageTag::C);
        assert_eq!(out, "Language: C\n\n#include <stdio.h>\nint main() {}");
    }

    #[test]
    fn test_line_comments_removed_for_every_language() {
        for lang in ["C", "C++", "Java", "Python", "Go"] {
            let tag = LanguageTag::parse(lang);
            let out = normalize_code("x = 1 // keep?", &tag);
            assert_eq!(out, format!("Language: {}\n\nx = 1", lang));
        }
    }

    #[test]
    fn test_block_comment_is_non_greedy_and_multiline() {
        let code = "int a; /* one\n two\n three */ int b; /* four */ int c;";
        let out = normalize_code(code, &LanguageTag::Java);
        assert_eq!(out, "Language: Java\n\nint a;  int b;  int c;");
    }

    #[test]
    fn test_surrounding_blank_lines_trimmed() {
        let code = "\n\n/* header */\nint main() { return 0; }\n\n";
        let out = normalize_code(code, &LanguageTag::Cpp);
        assert_eq!(out, "Language: C++\n\nint main() { return 0; }");
    }

    #[test]
    fn test_unknown_language_skips_python_rule() {
        let tag = LanguageTag::parse("Ruby");
        let out = normalize_code("# ruby comment\nputs 1", &tag);
        assert_eq!(out, "Language: Ruby\n\n# ruby comment\nputs 1");
    }

    #[test]
    fn test_string_literals_are_mangled() {
        let out = normalize_code("url = \"http://example.com\"", &LanguageTag::Python);
        assert_eq!(out, "Language: Python\n\nurl = \"http:");
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let code = "# a\n/* b */ def f():\n    return 1 // c";
        let first = normalize_code(code, &LanguageTag::Python);
        let second = normalize_code(code, &LanguageTag::Python);
        assert_eq!(first, second);
        assert!(first.starts_with("Language: Python\n\n"));
    }
}
