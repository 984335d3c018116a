//! Signals deciding whether a quote line starts a new quotation.
//!
//! Every signal used by the quote parser lives here so the policy can be
//! read and changed in one place. It is a heuristic: each signal is
//! tested, none is guaranteed.

/// Sentence-final characters, checked after trailing closing quotes are removed.
const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?', '…', '。', '！', '？'];

const CLOSING_MARKS: &[char] = &['"', '\'', '”', '’', '»', ')', '*', '_'];

/// Words that introduce a citation or a new quotation.
const CITATION_WORDS: &[&str] = &[
    "quote",
    "citation",
    "cite",
    "source",
    "zitat",
    "quelle",
    "cita",
    "citazione",
    "fonte",
    "引用",
    "出典",
];

/// Longer line at least this many times the shorter one.
const ASYMMETRY_RATIO: usize = 5;
/// Asymmetry only counts when the longer line is at least this long.
const ASYMMETRY_MIN_LEN: usize = 60;

/// True when `next` should start a new quote node instead of continuing `prev`.
pub fn looks_like_independent_quote(prev: &str, next: &str) -> bool {
    let prev = prev.trim();
    let next = next.trim();
    if prev.is_empty() || next.is_empty() {
        return false;
    }
    sentence_boundary(prev, next) || starts_with_citation(next) || length_asymmetry(prev, next)
}

pub fn sentence_boundary(prev: &str, next: &str) -> bool {
    let ended = prev
        .trim_end_matches(CLOSING_MARKS)
        .ends_with(TERMINAL_PUNCTUATION);
    ended && next.chars().next().is_some_and(char::is_uppercase)
}

pub fn starts_with_citation(next: &str) -> bool {
    let lower = next.to_lowercase();
    CITATION_WORDS.iter().any(|word| {
        lower.strip_prefix(word).is_some_and(|after| {
            after
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric())
        })
    })
}

pub fn length_asymmetry(prev: &str, next: &str) -> bool {
    let (a, b) = (prev.chars().count(), next.chars().count());
    let (short, long) = if a < b { (a, b) } else { (b, a) };
    long >= ASYMMETRY_MIN_LEN && long >= short * ASYMMETRY_RATIO
}
