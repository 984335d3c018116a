/// `>` prefixes shared by quotes, callouts and toggles.
pub struct BlockQuote;

impl BlockQuote {
    pub const PREFIX: char = '>';

    /// Splits a quoted line into its depth and the text after the last
    /// prefix. `>> a` and `> > a` are both depth 2; one space or tab after
    /// each `>` belongs to the prefix. `None` for unquoted lines.
    pub fn strip(line: &str) -> Option<(u8, &str)> {
        let mut depth = 0u8;
        let mut rest = line;
        loop {
            let Some(after) = rest.trim_start_matches([' ', '\t']).strip_prefix(Self::PREFIX) else {
                break;
            };
            depth = depth.saturating_add(1);
            rest = after.strip_prefix([' ', '\t']).unwrap_or(after);
        }
        (depth > 0).then_some((depth, rest))
    }
}
