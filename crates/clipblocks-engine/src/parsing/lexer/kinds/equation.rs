/// Equation delimiters: `$inline$`, `$$display$$` and `\begin{env}…\end{env}`.
pub struct Equation;

impl Equation {
    pub const DOLLAR: &'static str = "$";
    pub const DISPLAY: &'static str = "$$";
    pub const BEGIN: &'static str = "\\begin{";
    pub const END: &'static str = "\\end{";

    /// A whole line `$$ … $$`, returning the body.
    pub fn single_line_display(line: &str) -> Option<&str> {
        let t = line.trim();
        let body = t.strip_prefix(Self::DISPLAY)?.strip_suffix(Self::DISPLAY)?;
        (!body.trim().is_empty()).then(|| body.trim())
    }

    /// A line opening a multi-line `$$` block, returning any text after the opener.
    pub fn opens_display(line: &str) -> Option<&str> {
        let t = line.trim();
        let rest = t.strip_prefix(Self::DISPLAY)?;
        (!rest.contains(Self::DISPLAY)).then(|| rest.trim())
    }

    /// A line closing a `$$` block, returning any text before the closer.
    pub fn closes_display(line: &str) -> Option<&str> {
        line.trim().strip_suffix(Self::DISPLAY).map(str::trim)
    }

    /// A whole line `$ … $` (exactly one dollar on each side).
    pub fn single_line_inline(line: &str) -> Option<&str> {
        let t = line.trim();
        if t.starts_with(Self::DISPLAY) || t.ends_with(Self::DISPLAY) {
            return None;
        }
        let body = t.strip_prefix(Self::DOLLAR)?.strip_suffix(Self::DOLLAR)?;
        let ok = !body.is_empty()
            && !body.contains('$')
            && !body.starts_with(char::is_whitespace)
            && !body.ends_with(char::is_whitespace);
        ok.then_some(body)
    }

    /// Environment name of a `\begin{env}` line.
    pub fn begin_env(line: &str) -> Option<&str> {
        let rest = line.trim().strip_prefix(Self::BEGIN)?;
        let name = &rest[..rest.find('}')?];
        (!name.is_empty()).then_some(name)
    }

    /// Every environment closed on this line, e.g. `align` for `\end{align}`.
    pub fn end_envs(line: &str) -> impl Iterator<Item = &str> {
        line.split(Self::END).skip(1).filter_map(|tail| {
            let name = &tail[..tail.find('}')?];
            (!name.is_empty()).then_some(name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Equation::single_line_display("$$ E = mc^2 $$"), Some("E = mc^2"));
        assert_eq!(Equation::single_line_display("$$$$"), None);
        assert_eq!(Equation::opens_display("$$"), Some(""));
        assert_eq!(Equation::opens_display("$$x$$"), None);
        assert_eq!(Equation::closes_display("y $$"), Some("y"));
    }

    #[test]
    fn inline_line() {
        assert_eq!(Equation::single_line_inline("$x^2$"), Some("x^2"));
        assert_eq!(Equation::single_line_inline("$5 and $6"), None);
        assert_eq!(Equation::single_line_inline("$$x$$"), None);
        assert_eq!(Equation::single_line_inline("$ x $"), None);
    }

    #[test]
    fn environments() {
        assert_eq!(Equation::begin_env("\\begin{align}"), Some("align"));
        assert_eq!(Equation::begin_env("\\begin{}"), None);
        assert_eq!(Equation::end_envs("\\end{align}").collect::<Vec<_>>(), vec!["align"]);
        assert_eq!(
            Equation::end_envs("x \\end{b} \\end{a}").collect::<Vec<_>>(),
            vec!["b", "a"]
        );
        assert_eq!(Equation::end_envs("\\end{} \\end{open").count(), 0);
    }
}
