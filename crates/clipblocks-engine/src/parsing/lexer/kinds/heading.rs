/// ATX heading marker (`#` to `######`).
pub struct Heading;

impl Heading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Returns the source level (1..=6) and heading text.
    pub fn parse(rest: &str) -> Option<(u8, &str)> {
        let level = rest.bytes().take_while(|&b| b == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let after = &rest[level..];
        if !after.is_empty() && !after.starts_with([' ', '\t']) {
            return None;
        }
        let text = after.trim();
        // closing sequence: `## Title ##`
        let stripped = text.trim_end_matches('#');
        let text = if stripped.len() < text.len() && (stripped.is_empty() || stripped.ends_with(' ')) {
            stripped.trim_end()
        } else {
            text
        };
        Some((level as u8, text))
    }
}
