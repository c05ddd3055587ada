//! Definition filter: scrubs candidate symbol lists before ingestion.
//!
//! Summaries arrive with raw ctag and key-point token lists that mix real
//! identifiers with prose. The filter drops stop words, language
//! keywords, short noise tokens, and anything that does not look like an
//! identifier, so the graph only ever tracks definition names. Scoped
//! tokens (`ns::name`), destructors (`Class::~Dtor`), operators, and
//! lambda markers survive identifier validation as special cases.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::core::Summary;

/// Common English stop words that should be filtered out
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "or", "but", "not",
        "this", "they", "have", "had", "what", "when", "where", "who", "which", "why", "how",
    ]
    .into_iter()
    .collect()
});

/// Language keywords that are never definition names
static LANGUAGE_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "auto", "break", "case", "catch", "class", "const", "continue", "default", "delete",
        "do", "else", "enum", "explicit", "extern", "false", "finally", "for", "friend", "goto",
        "if", "inline", "int", "long", "namespace", "new", "null", "nullptr", "operator",
        "private", "protected", "public", "return", "short", "signed", "sizeof", "static",
        "struct", "switch", "template", "this", "throw", "true", "try", "typedef", "typename",
        "union", "unsigned", "using", "virtual", "void", "volatile", "while", "bool", "char",
        "double", "float", "string", "vector", "map", "set", "list", "array", "function",
        "method", "variable", "object", "type", "include", "define", "ifdef", "ifndef",
        "endif", "pragma",
    ]
    .into_iter()
    .collect()
});

/// Short abbreviations and generic nouns that carry no signal
static NOISE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "tmp", "temp", "val", "var", "ptr", "ref", "obj", "cnt", "num", "idx", "len", "str",
        "msg", "err", "ret", "res", "arg", "param", "data", "info", "item", "node", "elem",
        "key", "value", "size", "count", "index", "length", "width", "height", "min", "max",
        "sum", "avg", "std", "dev", "test", "debug", "log", "print", "output", "input", "file",
        "path", "name", "uid", "pid", "tid", "time", "date", "year", "month", "day", "hour",
        "minute", "second", "sec",
    ]
    .into_iter()
    .collect()
});

/// Statistics about one filtering run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterStats {
    pub total_words: usize,
    pub filtered_words: usize,
    pub remaining_words: usize,
    pub filter_ratio: f64,
}

impl FilterStats {
    pub fn from_counts(total: usize, remaining: usize) -> Self {
        let filtered = total.saturating_sub(remaining);
        Self {
            total_words: total,
            filtered_words: filtered,
            remaining_words: remaining,
            filter_ratio: if total > 0 {
                filtered as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

/// Trimmed, lowercased form used for the word-set checks
fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

fn is_too_short(word: &str) -> bool {
    word.len() <= 2
}

/// Whether a token reads as an identifier. Scoping, destructor, operator,
/// and lambda spellings are accepted whole.
fn is_valid_identifier(word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    if word.starts_with("lambda[") || word.starts_with("operator") || word.contains("::~") {
        return true;
    }

    let mut chars = word.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    if !word
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
    {
        return false;
    }
    word.chars().any(|c| c.is_ascii_alphabetic())
}

/// Whether a candidate token should be dropped
pub fn should_filter(word: &str) -> bool {
    let normalized = normalize_word(word);
    if normalized.is_empty() || is_too_short(&normalized) {
        return true;
    }

    // Scoped identifiers are judged whole, never by their parts
    if word.contains("::") {
        return !is_valid_identifier(word);
    }

    if STOP_WORDS.contains(normalized.as_str())
        || LANGUAGE_KEYWORDS.contains(normalized.as_str())
        || NOISE_WORDS.contains(normalized.as_str())
    {
        return true;
    }
    if !is_valid_identifier(word) {
        return true;
    }
    normalized.chars().all(|c| c.is_ascii_digit())
}

/// Pass a single candidate through the filter
pub fn filter_definition(word: &str) -> Option<&str> {
    if should_filter(word) {
        None
    } else {
        Some(word)
    }
}

/// Filter a candidate list, keeping input order
pub fn filter_definitions(definitions: Vec<String>) -> Vec<String> {
    definitions
        .into_iter()
        .filter(|word| !should_filter(word))
        .collect()
}

/// Scrub both symbol lists of a summary in place
pub fn filter_summary(summary: &mut Summary) {
    summary.ctag_definitions = filter_definitions(std::mem::take(&mut summary.ctag_definitions));
    summary.regex_definitions = filter_definitions(std::mem::take(&mut summary.regex_definitions));
}

/// Scrub every summary in the stream
pub fn filter_summaries(summaries: &mut [Summary]) {
    for summary in summaries.iter_mut() {
        filter_summary(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words_filtered() {
        assert!(should_filter("the"));
        assert!(should_filter("The"));
        assert!(should_filter("which"));
    }

    #[test]
    fn test_keywords_and_noise_filtered() {
        assert!(should_filter("namespace"));
        assert!(should_filter("while"));
        assert!(should_filter("tmp"));
        assert!(should_filter("count"));
    }

    #[test]
    fn test_short_and_numeric_tokens_filtered() {
        assert!(should_filter("x"));
        assert!(should_filter("ab"));
        assert!(should_filter("1234"));
        assert!(should_filter("  "));
    }

    #[test]
    fn test_invalid_identifiers_filtered() {
        assert!(should_filter("3cats"));
        assert!(should_filter("foo-bar"));
        assert!(should_filter("hello world"));
    }

    #[test]
    fn test_real_identifiers_survive() {
        assert!(!should_filter("parseConfig"));
        assert!(!should_filter("_internal_state"));
        assert!(!should_filter("HttpServer2"));
    }

    #[test]
    fn test_special_cases_survive() {
        assert!(!should_filter("app::net::Server"));
        assert!(!should_filter("Widget::~Widget"));
        assert!(!should_filter("operator<<"));
        assert!(!should_filter("lambda[closure#1]"));
    }

    #[test]
    fn test_filter_definitions_keeps_order() {
        let input = vec![
            "the".to_string(),
            "renderHtml".to_string(),
            "x".to_string(),
            "parse_css".to_string(),
        ];
        assert_eq!(filter_definitions(input), ["renderHtml", "parse_css"]);
    }

    #[test]
    fn test_filter_summary_scrubs_both_lists() {
        let mut summary = Summary::new("c1");
        summary.ctag_definitions = vec!["for".into(), "handleRequest".into()];
        summary.regex_definitions = vec!["42".into(), "openSocket".into()];
        filter_summary(&mut summary);

        assert_eq!(summary.ctag_definitions, ["handleRequest"]);
        assert_eq!(summary.regex_definitions, ["openSocket"]);
    }

    #[test]
    fn test_filter_stats() {
        let stats = FilterStats::from_counts(10, 4);
        assert_eq!(stats.filtered_words, 6);
        assert!((stats.filter_ratio - 0.6).abs() < 1e-12);
        assert_eq!(FilterStats::from_counts(0, 0).filter_ratio, 0.0);
    }
}
