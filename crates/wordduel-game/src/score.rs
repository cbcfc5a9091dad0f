//! Guess scoring.
//!
//! Two passes over the letters. Greens are claimed first, then yellows are
//! handed out left to right from whatever solution letters are still
//! unmatched, so a repeated guess letter never earns more marks than the
//! solution has copies of it.

use wordduel_protocol::{Feedback, Mark, WORD_LEN};

use crate::Word;

/// Scores `guess` against `solution`.
pub fn score(guess: &Word, solution: &Word) -> Feedback {
    let guess = guess.letters();
    let solution = solution.letters();

    let mut marks = [Mark::Black; WORD_LEN];
    let mut unmatched = [0u8; 26];

    for i in 0..WORD_LEN {
        if guess[i] == solution[i] {
            marks[i] = Mark::Green;
        } else {
            unmatched[letter_index(solution[i])] += 1;
        }
    }

    for i in 0..WORD_LEN {
        if marks[i] == Mark::Green {
            continue;
        }
        let slot = &mut unmatched[letter_index(guess[i])];
        if *slot > 0 {
            marks[i] = Mark::Yellow;
            *slot -= 1;
        }
    }

    marks
}

fn letter_index(letter: u8) -> usize {
    usize::from(letter - b'a')
}
