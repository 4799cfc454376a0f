//! Line text preparation before synthesis.

use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("url pattern"));
static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*#{1,6}\s+").expect("heading pattern"));
static RULE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*[*_-](?:\s*[*_-]){2,}\s*$").expect("rule pattern")
});
static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("code pattern"));
static STRONG_STAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^*\s](?:[^*]*[^*\s])?)\*\*").expect("strong pattern")
});
static STRONG_UNDERSCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w])__([^_\s](?:[^_]*[^_\s])?)__([^\w]|$)").expect("strong pattern")
});
// Emphasis delimiters must not touch a word on their outer side, so
// `snake_case` and `2*3*4` survive.
static EM_STAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w*])\*([^*\s](?:[^*]*[^*\s])?)\*([^\w*]|$)").expect("emphasis pattern")
});
static EM_UNDERSCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w])_([^_\s](?:[^_]*[^_\s])?)_([^\w]|$)").expect("emphasis pattern")
});
static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static SENTENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?]+\s+)").expect("sentence pattern"));

/// Strip markdown markup and URLs, collapse whitespace
///
/// Only paired emphasis, inline code, headings and rules are removed; literal
/// symbols such as `C#`, `snake_case` or `5 * 3` are spoken as written.
pub fn clean_line(text: &str) -> String {
    let text = URL_PATTERN.replace_all(text, "");
    let text = HEADING_PATTERN.replace_all(&text, "");
    let text = RULE_PATTERN.replace_all(&text, "");
    let text = CODE_PATTERN.replace_all(&text, "$1");
    let text = STRONG_STAR_PATTERN.replace_all(&text, "$1");
    let text = STRONG_UNDERSCORE_PATTERN.replace_all(&text, "${1}${2}${3}");
    let text = EM_STAR_PATTERN.replace_all(&text, "${1}${2}${3}");
    let text = EM_UNDERSCORE_PATTERN.replace_all(&text, "${1}${2}${3}");
    let normalized = WHITESPACE_PATTERN.replace_all(&text, " ");
    normalized.trim().to_string()
}

/// First `max_chars` characters, for progress display
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most `max_len` bytes; text without boundaries is split by characters.
pub fn split_into_batches(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current_batch = String::new();
    let mut last_end = 0;

    for mat in SENTENCE_PATTERN.find_iter(text) {
        let sentence = &text[last_end..mat.end()];
        if !current_batch.is_empty() && current_batch.len() + sentence.len() > max_len {
            batches.push(current_batch.trim().to_string());
            current_batch.clear();
        }
        if sentence.len() > max_len {
            batches.extend(hard_split(sentence, max_len));
        } else {
            current_batch.push_str(sentence);
        }
        last_end = mat.end();
    }

    if last_end < text.len() {
        let remaining = &text[last_end..];
        if !current_batch.is_empty() && current_batch.len() + remaining.len() > max_len {
            batches.push(current_batch.trim().to_string());
            current_batch.clear();
        }
        if remaining.len() > max_len {
            batches.extend(hard_split(remaining, max_len));
        } else {
            current_batch.push_str(remaining);
        }
    }

    if !current_batch.trim().is_empty() {
        batches.push(current_batch.trim().to_string());
    }

    batches.retain(|b| !b.is_empty());
    batches
}

fn hard_split(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    for ch in text.chars() {
        if chunk.len() + ch.len_utf8() > max_len {
            chunks.push(std::mem::take(&mut chunk));
        }
        chunk.push(ch);
    }
    if !chunk.trim().is_empty() {
        chunks.push(chunk);
    }
    chunks
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}
