#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

/// An opening or closing fence: its character kind and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceSig {
    pub kind: FenceKind,
    pub len: usize,
}

impl FenceKind {
    pub fn marker(self) -> char {
        match self {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        }
    }
}

pub struct CodeFence;

impl CodeFence {
    /// Shortest marker run that opens a fence.
    pub const MIN_RUN: usize = 3;

    pub fn sig(line: &str) -> Option<FenceSig> {
        let kind = match line.chars().next()? {
            '`' => FenceKind::Backticks,
            '~' => FenceKind::Tildes,
            _ => return None,
        };
        let len = line.chars().take_while(|&c| c == kind.marker()).count();
        (len >= Self::MIN_RUN).then_some(FenceSig { kind, len })
    }

    /// Language hint after an opening fence, e.g. `rust` in ```` ```rust ````.
    pub fn info(remainder: &str, sig: FenceSig) -> Option<String> {
        let word = remainder[sig.len..].split_whitespace().next()?;
        (!word.is_empty()).then(|| word.to_string())
    }

    /// A closer must use the same character, be at least as long and carry no info.
    pub fn closes(open: FenceSig, line: &str) -> bool {
        match Self::sig(line.trim_start()) {
            Some(sig) => {
                sig.kind == open.kind
                    && sig.len >= open.len
                    && line.trim()[sig.len..].trim().is_empty()
            }
            None => false,
        }
    }
}
