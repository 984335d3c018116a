use super::{
    kinds::{Emphasis, Strikethrough},
    types::RichTextSpan,
};

/// Renders spans back to inline markup.
///
/// Leading and trailing whitespace is kept outside the markers so the
/// result parses back to the same spans with [`super::from_markup`].
pub fn to_markup(spans: &[RichTextSpan]) -> String {
    spans.iter().map(span_markup).collect()
}

fn span_markup(span: &RichTextSpan) -> String {
    if span.is_plain() {
        return span.text.clone();
    }

    let trimmed = span.text.trim();
    if trimmed.is_empty() {
        return span.text.clone();
    }
    let lead = &span.text[..span.text.len() - span.text.trim_start().len()];
    let trail = &span.text[span.text.trim_end().len()..];

    let mut body = if span.equation {
        format!("${trimmed}$")
    } else if span.code {
        if trimmed.contains('`') {
            format!("`` {trimmed} ``")
        } else {
            format!("`{trimmed}`")
        }
    } else {
        trimmed.to_string()
    };

    if span.underline {
        body = format!("<u>{body}</u>");
    }
    if span.strikethrough {
        body = format!("{m}{body}{m}", m = Strikethrough::MARKER);
    }
    if span.italic {
        body = format!("{m}{body}{m}", m = Emphasis::EM);
    }
    if span.bold {
        body = format!("{m}{body}{m}", m = Emphasis::STRONG);
    }
    if let Some(url) = &span.link {
        body = format!("[{body}]({url})");
    }

    format!("{lead}{body}{trail}")
}
