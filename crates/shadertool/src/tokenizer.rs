//! A cursor over the [tokens](Token) of one shader stage.

use crate::lexer::Token;

/// Saved cursor position, see [`Tokenizer::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Linear cursor with forward movement and explicit rewinding.
///
/// Running past the end with [`Tokenizer::next`] is a bug in the caller,
/// who is expected to check [`Tokenizer::has_next`] first.
#[derive(Debug, Clone)]
pub struct Tokenizer<'tokens> {
    /// The token stream.
    tokens: &'tokens [Token],
    /// Index of the next token to hand out.
    position: usize,
}

impl<'tokens> Tokenizer<'tokens> {
    /// Make a new `Tokenizer` positioned before the first token.
    #[inline]
    #[must_use]
    pub const fn new(tokens: &'tokens [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Whether [`Self::next`] may be called.
    #[inline]
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Consumes and returns the next token text.
    ///
    /// # Panics
    ///
    /// Panics when the stream is exhausted.
    #[inline]
    #[expect(clippy::should_implement_trait, reason = "not an iterator, it can rewind")]
    #[expect(clippy::panic, reason = "reading past the end is an invariant violation")]
    pub fn next(&mut self) -> &'tokens str {
        let Some(token) = self.tokens.get(self.position) else {
            panic!(
                "token stream exhausted after {} tokens, check `has_next` first",
                self.tokens.len()
            );
        };
        self.position += 1;
        log::trace!("token: {}", token.text);
        &token.text
    }

    /// Returns the next token text without consuming it.
    #[inline]
    #[must_use]
    pub fn peek_next(&self) -> Option<&'tokens str> {
        self.tokens
            .get(self.position)
            .map(|token| token.text.as_str())
    }

    /// Steps back exactly one token.
    #[inline]
    pub fn prev(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Saves the current position.
    #[inline]
    #[must_use]
    pub const fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.position)
    }

    /// Returns to a position saved with [`Self::checkpoint`].
    #[inline]
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.0.min(self.tokens.len());
    }

    /// Line of the most recently consumed token, `0` before the first one.
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .map_or(0, |token| token.line)
    }
}
