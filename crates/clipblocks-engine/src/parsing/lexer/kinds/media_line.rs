/// A line holding nothing but an image, a link or a bare URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaLine {
    Image { alt: String, url: String },
    Link { title: Option<String>, url: String },
}

impl MediaLine {
    pub const IMAGE_OPEN: &'static str = "![";
    pub const SCHEMES: [&'static str; 2] = ["https://", "http://"];

    pub fn parse(rest: &str) -> Option<MediaLine> {
        let t = rest.trim();
        if let Some(after) = t.strip_prefix(Self::IMAGE_OPEN) {
            let (alt, url) = Self::label_and_url(after)?;
            return Some(MediaLine::Image {
                alt: alt.to_string(),
                url: url.to_string(),
            });
        }
        if let Some(after) = t.strip_prefix('[') {
            let (title, url) = Self::label_and_url(after)?;
            if !Self::is_web_url(url) {
                return None;
            }
            let title = title.trim();
            return Some(MediaLine::Link {
                title: (!title.is_empty()).then(|| title.to_string()),
                url: url.to_string(),
            });
        }
        Self::is_web_url(t).then(|| MediaLine::Link {
            title: None,
            url: t.to_string(),
        })
    }

    pub fn is_web_url(s: &str) -> bool {
        Self::SCHEMES
            .iter()
            .any(|scheme| {
                s.len() > scheme.len()
                    && s.get(..scheme.len())
                        .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
            })
            && !s.contains(char::is_whitespace)
    }

    /// Splits `label](url)` where the line must end right after `)`.
    fn label_and_url(after_open: &str) -> Option<(&str, &str)> {
        let close = after_open.find("](")?;
        let label = &after_open[..close];
        if label.contains(']') {
            return None;
        }
        let url = after_open[close + 2..].strip_suffix(')')?.trim();
        if url.is_empty() || url.contains(char::is_whitespace) || url.contains(')') {
            return None;
        }
        Some((label, url))
    }
}
