use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9][A-Za-z0-9+#.\-/]*[A-Za-z0-9+#]|[A-Za-z0-9]")
        .expect("token pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Default)]
pub struct TextAnalyzer;

impl TextAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn sentences<'a>(&self, text: &'a str) -> Vec<Sentence<'a>> {
        let bytes = text.as_bytes();
        let mut sentences = Vec::new();
        let mut start = 0;

        for (i, &b) in bytes.iter().enumerate() {
            let boundary = match b {
                b'\n' | b'\r' => Some(i),
                b'.' | b'!' | b'?' => {
                    let next = bytes.get(i + 1);
                    if next.map_or(true, |n| n.is_ascii_whitespace()) {
                        Some(i + 1)
                    } else {
                        None
                    }
                }
                _ => None,
            };

            if let Some(end) = boundary {
                push_sentence(text, start, end, &mut sentences);
                start = end.max(i + 1);
            }
        }
        push_sentence(text, start, text.len(), &mut sentences);

        sentences
    }

    pub fn tokens<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        TOKEN_PATTERN
            .find_iter(text)
            .map(|m| Token {
                text: m.as_str(),
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }

    pub fn phrase_runs(&self, text: &str, tokens: &[Token<'_>]) -> Vec<std::ops::Range<usize>> {
        let mut runs = Vec::new();
        let mut run_start = 0;

        for i in 1..=tokens.len() {
            let connected = i < tokens.len() && {
                let gap = &text[tokens[i - 1].end..tokens[i].start];
                !gap.is_empty() && gap.bytes().all(|b| b == b' ' || b == b'\t')
            };
            if !connected {
                if run_start < i {
                    runs.push(run_start..i);
                }
                run_start = i;
            }
        }

        runs
    }

    pub fn token_window<'a>(
        &self,
        text: &'a str,
        tokens: &[Token<'_>],
        first: usize,
        last: usize,
        radius: usize,
    ) -> &'a str {
        if tokens.is_empty() {
            return "";
        }
        let last = last.min(tokens.len() - 1);
        let from = first.saturating_sub(radius);
        let to = (last + radius).min(tokens.len() - 1);
        &text[tokens[from].start..tokens[to].end]
    }

    pub fn char_window<'a>(&self, text: &'a str, start: usize, end: usize, radius: usize) -> &'a str {
        let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = text[end..].find('\n').map_or(text.len(), |i| end + i);

        let from = floor_boundary(text, start.saturating_sub(radius).max(line_start));
        let to = ceil_boundary(text, (end + radius).min(line_end));
        text[from..to].trim()
    }
}

fn push_sentence<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Sentence<'a>>) {
    if start >= end {
        return;
    }
    let slice = &text[start..end];
    let trimmed_start = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    if !trimmed.is_empty() {
        out.push(Sentence {
            text: trimmed,
            start: start + trimmed_start,
        });
    }
}

pub fn floor_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

pub fn ceil_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Truncates `text` to at most `max_bytes`, on a character boundary.
pub fn truncate(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        text
    } else {
        &text[..floor_boundary(text, max_bytes)]
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_phrase_byte(b: u8) -> bool {
    is_word_byte(b) || b == b'-'
}

fn bounded_matches(haystack: &str, needle: &str, word: fn(u8) -> bool, strict: bool) -> Vec<(usize, usize)> {
    let needle = needle.trim();
    if needle.is_empty() {
        return Vec::new();
    }

    let hay = haystack.to_ascii_lowercase();
    let pattern = needle.to_ascii_lowercase();
    let bytes = hay.as_bytes();
    let first = pattern.as_bytes()[0];
    let last = pattern.as_bytes()[pattern.len() - 1];
    let single = pattern.len() == 1;

    let mut found = Vec::new();
    for (start, _) in hay.match_indices(pattern.as_str()) {
        let end = start + pattern.len();

        if word(first) && start > 0 {
            let prev = bytes[start - 1];
            if word(prev) || (strict && single && matches!(prev, b'-' | b'&' | b'\'' | b'/' | b'.')) {
                continue;
            }
        }

        if word(last) {
            if let Some(&next) = bytes.get(end) {
                if word(next) {
                    continue;
                }
                // "C" must not match inside "C++" or "C#".
                if strict && matches!(next, b'+' | b'#') {
                    continue;
                }
                if strict && single {
                    let after = bytes.get(end + 1).copied();
                    let dotted = next == b'.' && after.map_or(false, |a| !a.is_ascii_whitespace());
                    if dotted || matches!(next, b'-' | b'&' | b'\'' | b'/') {
                        continue;
                    }
                }
            }
        }

        found.push((start, end));
    }

    found
}

pub fn find_words(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
    bounded_matches(haystack, needle, is_word_byte, true)
}

pub fn contains_word(haystack: &str, needle: &str) -> bool {
    !find_words(haystack, needle).is_empty()
}

pub fn count_phrase(haystack: &str, phrase: &str) -> usize {
    bounded_matches(haystack, phrase, is_phrase_byte, false).len()
}
