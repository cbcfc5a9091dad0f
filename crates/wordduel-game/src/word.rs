//! Five-letter words and the seam that picks each round's solution.

use std::fmt;

use rand::seq::IndexedRandom;
use wordduel_protocol::WORD_LEN;

use crate::GameError;
use crate::words::WORDS;

/// Exactly [`WORD_LEN`] lowercase ASCII letters.
///
/// Stored as bytes so scoring can index letters directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word([u8; WORD_LEN]);

impl Word {
    /// Parses a word, requiring five lowercase ASCII letters.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidWord`] for any other input.
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let bytes: [u8; WORD_LEN] = text
            .as_bytes()
            .try_into()
            .map_err(|_| GameError::InvalidWord(text.to_string()))?;
        if !bytes.iter().all(u8::is_ascii_lowercase) {
            return Err(GameError::InvalidWord(text.to_string()));
        }
        Ok(Self(bytes))
    }

    pub fn letters(&self) -> &[u8; WORD_LEN] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII letters ever get in, see `parse`.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chooses the solution for a new room or a new round.
///
/// Any `FnMut() -> Word` closure is a picker, which is how tests pin the
/// solution.
pub trait SolutionPicker: Send + 'static {
    fn pick(&mut self) -> Word;
}

impl<F> SolutionPicker for F
where
    F: FnMut() -> Word + Send + 'static,
{
    fn pick(&mut self) -> Word {
        self()
    }
}

/// Draws uniformly from the built-in corpus.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl SolutionPicker for RandomPicker {
    fn pick(&mut self) -> Word {
        let word = WORDS.choose(&mut rand::rng()).copied().unwrap_or("crane");
        // Corpus entries are validated by the words tests.
        Word::parse(word).unwrap_or(Word(*b"crane"))
    }
}
