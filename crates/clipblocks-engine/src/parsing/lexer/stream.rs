use super::token::Token;

/// Tokens in source order plus a read position.
///
/// Lookahead is plain indexing, and nested constructs receive their own
/// stream over the tokens they own, so no parser can observe another's
/// position.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
    /// How many [`TokenStream::take_indented`] calls produced this stream.
    depth: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// Token `n` positions ahead of the current one (`peek_nth(0) == peek()`).
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    /// First non-blank token at or after `n` positions ahead.
    pub fn peek_non_blank(&self, n: usize) -> Option<&Token> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .skip(n)
            .find(|t| !t.is_blank())
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.tokens.len()
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.pos)
    }

    pub(crate) fn checkpoint(&self) -> usize {
        self.pos
    }

    pub(crate) fn rewind(&mut self, checkpoint: usize) {
        self.pos = checkpoint.min(self.tokens.len());
    }

    /// Skips blank tokens, returning how many were skipped.
    pub fn skip_blank(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(Token::is_blank) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Consumes the block of tokens indented deeper than `base`.
    ///
    /// Interior blank lines belong to the block when an indented token
    /// follows them; trailing blanks are left in place.
    pub fn take_indented(&mut self, base: usize) -> TokenStream {
        let start = self.pos;
        let mut end = self.pos;
        let mut i = self.pos;
        while let Some(tok) = self.tokens.get(i) {
            if tok.is_blank() {
                i += 1;
                continue;
            }
            if tok.indent <= base {
                break;
            }
            i += 1;
            end = i;
        }
        self.pos = end;
        TokenStream {
            tokens: self.tokens[start..end].to_vec(),
            pos: 0,
            depth: self.depth + 1,
        }
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        Some(tok)
    }
}
