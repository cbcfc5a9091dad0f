//! Error types for the game core.
//!
//! None of these are fatal. The registry turns [`GameError::NotInWordList`]
//! into a private `guess:rejected` and logs the rest as ignored events.

use wordduel_protocol::{RoomId, Sid};

/// Reasons a game operation did not apply.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Text that is not five lowercase ASCII letters.
    #[error("not a valid word: {0:?}")]
    InvalidWord(String),

    /// A well-formed guess that is not in the corpus.
    #[error("{0:?} is not in the word list")]
    NotInWordList(String),

    /// Guess text with the wrong number of letters.
    #[error("guess has {0} letters")]
    WrongLength(usize),

    /// The connection never joined a room.
    #[error("{0} is not in any room")]
    NotInAnyRoom(Sid),

    /// The membership index points at a room that does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The connection is a spectator, or not in this room at all.
    #[error("{0} is not a player in room {1}")]
    NotAPlayer(Sid, RoomId),

    /// The player already solved the word or used every guess.
    #[error("{0} has finished this round")]
    PlayerDone(Sid),
}
