use std::sync::OnceLock;

use regex::Regex;

use super::types::{ContentClassification, ContentKind, Metadata};

pub const WRAPPED_CONFIDENCE: f64 = 0.85;
pub const ENVIRONMENT_CONFIDENCE: f64 = 0.8;
const COMMAND_BASE_CONFIDENCE: f64 = 0.55;
const COMMAND_MAX_CONFIDENCE: f64 = 0.75;
/// Loose math needs at least this many known commands.
const MIN_COMMANDS: usize = 2;
/// Loose math longer than this is prose that happens to contain math.
const MAX_LOOSE_LINES: usize = 20;

fn command_regex() -> &'static Regex {
    static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(
            r"\\(?:frac|dfrac|sqrt|sum|int|iint|oint|prod|lim|alpha|beta|gamma|delta|epsilon|varepsilon|theta|lambda|mu|pi|sigma|omega|phi|psi|infty|partial|nabla|cdot|times|div|pm|leq|geq|neq|approx|equiv|sim|mathbb|mathrm|mathbf|mathcal|left|right|begin|end|text|over|hat|bar|vec|dot|sin|cos|tan|log|ln|exp|forall|exists|in|subset|cup|cap|to|rightarrow|Rightarrow|quad|binom)\b",
        )
        .expect("Invalid LaTeX command regex")
    })
}

fn markdown_line_regex() -> &'static Regex {
    static MARKDOWN_LINE_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKDOWN_LINE_REGEX.get_or_init(|| {
        Regex::new(r"(?m)^(?:#{1,6}\s|\s*[-*+]\s|\s*\d+\.\s|>|```)")
            .expect("Invalid markdown line regex")
    })
}

/// Strips `$$…$$`, `\[…\]` or `$…$` wrappers, reporting display mode.
pub fn unwrap_math(text: &str) -> Option<(&str, bool)> {
    let t = text.trim();
    let wrapped = |open: &str, close: &str| {
        t.strip_prefix(open)
            .and_then(|s| s.strip_suffix(close))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };
    if let Some(inner) = wrapped("$$", "$$").or_else(|| wrapped("\\[", "\\]")) {
        return Some((inner, true));
    }
    wrapped("$", "$")
        .filter(|inner| !inner.contains('$'))
        .map(|inner| (inner, false))
}

pub fn detect(text: &str) -> Option<ContentClassification> {
    if text.starts_with('{') || text.starts_with('[') && !text.starts_with("\\[") {
        return None;
    }

    if let Some((inner, display)) = unwrap_math(text) {
        let looks_like_math = command_regex().is_match(inner)
            || inner.contains(['^', '_', '='])
            || inner.len() <= 40;
        if looks_like_math {
            return Some(classification(WRAPPED_CONFIDENCE, display));
        }
    }

    if text.starts_with("\\begin{") && text.contains("\\end{") {
        return Some(classification(ENVIRONMENT_CONFIDENCE, true));
    }

    if text.lines().take(MAX_LOOSE_LINES + 1).count() > MAX_LOOSE_LINES
        || markdown_line_regex().is_match(text)
    {
        return None;
    }
    let commands = command_regex().find_iter(text).take(16).count();
    if commands < MIN_COMMANDS {
        return None;
    }
    let confidence = (COMMAND_BASE_CONFIDENCE + 0.05 * (commands - MIN_COMMANDS) as f64)
        .min(COMMAND_MAX_CONFIDENCE);
    Some(classification(confidence, false))
}

fn classification(confidence: f64, display: bool) -> ContentClassification {
    let metadata = Metadata {
        display: Some(display),
        ..Metadata::default()
    };
    ContentClassification::new(ContentKind::Latex, confidence).with_metadata(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_display_math() {
        let c = detect("$$\\frac{a}{b}$$").unwrap();
        assert_eq!(c.confidence, WRAPPED_CONFIDENCE);
        assert_eq!(c.metadata.display, Some(true));
        assert_eq!(detect("\\[ x^2 \\]").unwrap().metadata.display, Some(true));
    }

    #[test]
    fn inline_wrapped_math() {
        let c = detect("$x^2 + y^2$").unwrap();
        assert_eq!(c.metadata.display, Some(false));
    }

    #[test]
    fn environments() {
        let c = detect("\\begin{align}\nx &= 1\n\\end{align}").unwrap();
        assert_eq!(c.confidence, ENVIRONMENT_CONFIDENCE);
    }

    #[test]
    fn loose_commands() {
        let c = detect("\\alpha + \\beta = \\gamma").unwrap();
        assert!(c.confidence > 0.5 && c.confidence <= COMMAND_MAX_CONFIDENCE);
    }

    #[test]
    fn windows_paths_and_prose_are_not_latex() {
        assert!(detect("C:\\Users\\name\\Documents").is_none());
        assert!(detect("It costs $5 and $6").is_none());
        assert!(detect("# Notes\n\n\\alpha and \\beta").is_none());
    }
}
