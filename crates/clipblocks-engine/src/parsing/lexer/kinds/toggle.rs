/// Disclosure-triangle markers that start a collapsible section.
pub struct ToggleMarker;

impl ToggleMarker {
    pub const MARKERS: [char; 3] = ['▶', '▸', '►'];

    /// Returns the summary text after the marker.
    pub fn parse(rest: &str) -> Option<&str> {
        let first = rest.chars().next()?;
        if !Self::MARKERS.contains(&first) {
            return None;
        }
        let after = &rest[first.len_utf8()..];
        let after = after.strip_prefix('\u{fe0f}').unwrap_or(after);
        if !after.is_empty() && !after.starts_with(char::is_whitespace) {
            return None;
        }
        Some(after.trim())
    }
}
