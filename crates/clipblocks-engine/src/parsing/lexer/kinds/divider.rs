/// Thematic break: three or more `-`, `*` or `_`, optionally spaced.
pub struct Divider;

impl Divider {
    pub const MARKERS: [char; 3] = ['-', '*', '_'];
    pub const LITERAL: &'static str = "---";

    pub fn matches(rest: &str) -> bool {
        let t = rest.trim();
        let Some(first) = t.chars().next() else {
            return false;
        };
        if !Self::MARKERS.contains(&first) {
            return false;
        }
        let mut count = 0;
        for c in t.chars() {
            match c {
                c if c == first => count += 1,
                ' ' | '\t' => {}
                _ => return false,
            }
        }
        count >= 3
    }
}
