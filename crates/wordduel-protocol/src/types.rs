//! Wire types for wordduel.
//!
//! Field names on the wire are camelCase because the browser client reads
//! them directly (`roomId`, `youArePlayer`, `winnerSid`).

use std::fmt;

use serde::{Deserialize, Serialize};
use wordduel_transport::ConnectionId;

// ---------------------------------------------------------------------------
// Game constants shared by both ends of the wire
// ---------------------------------------------------------------------------

/// Letters per word.
pub const WORD_LEN: usize = 5;

/// Guesses each player gets per round. Sent to clients in `room:hello`.
pub const MAX_GUESSES: usize = 6;

/// Guessing slots per room. Later joiners become spectators.
pub const MAX_PLAYERS: usize = 2;

/// Room used when a client joins with a blank room id.
pub const LOBBY_ROOM_ID: &str = "lobby";

/// Reason sent with `guess:rejected` for a word outside the list.
pub const NOT_IN_WORD_LIST: &str = "Not in word list";

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Session id of one connected client.
///
/// One-to-one with the transport's [`ConnectionId`]; serialized as a plain
/// number so clients can compare it against `players` in a roster.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sid(pub u64);

impl From<ConnectionId> for Sid {
    fn from(id: ConnectionId) -> Self {
        Self(id.into_inner())
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// Name of a room, chosen by the clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Builds a room id from client input: surrounding whitespace is
    /// dropped and a blank id maps to [`LOBBY_ROOM_ID`].
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self(LOBBY_ROOM_ID.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Per-letter result of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mark {
    /// Right letter, right position.
    #[serde(rename = "g")]
    Green,
    /// Letter is in the solution elsewhere (and not yet accounted for).
    #[serde(rename = "y")]
    Yellow,
    /// Letter absent, or all of its occurrences already matched.
    #[default]
    #[serde(rename = "b")]
    Black,
}

/// Marks for a whole guess, left to right.
pub type Feedback = [Mark; WORD_LEN];

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive a server event.
///
/// The game core returns `(Recipient, ServerEvent)` pairs; the gateway
/// resolves room-scoped recipients against current room membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every player and spectator in the room.
    Room(RoomId),
    /// Every occupant of the room except one connection.
    RoomExcept(RoomId, Sid),
    /// One connection only.
    Connection(Sid),
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// `room:join` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JoinPayload {
    pub room_id: String,
}

/// `typing` payload: how many letters the player has typed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingPayload {
    pub length: usize,
}

/// `guess` payload: the submitted word, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuessPayload {
    pub guess: String,
}

/// Events a client may send.
///
/// Connect and disconnect are transport lifecycle, not frames, so they
/// have no variant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "room:join")]
    Join(JoinPayload),
    #[serde(rename = "typing")]
    Typing(TypingPayload),
    #[serde(rename = "guess")]
    Guess(GuessPayload),
    #[serde(rename = "reset_room")]
    ResetRoom,
}

impl ClientEvent {
    /// Wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join(_) => "room:join",
            Self::Typing(_) => "typing",
            Self::Guess(_) => "guess",
            Self::ResetRoom => "reset_room",
        }
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// `room:hello`, sent privately to a connection right after it joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloPayload {
    pub you_are_player: bool,
    pub max_guesses: usize,
}

/// `room:roster`, broadcast whenever room membership changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPayload {
    pub room_id: RoomId,
    /// Player sids in join order.
    pub players: Vec<Sid>,
    pub num_players: usize,
    pub num_spectators: usize,
}

/// `room:opponent_joined`, sent to the waiting player when the second
/// player arrives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentJoinedPayload {
    pub sid: Sid,
}

/// `typing:update`, relayed to everyone in the room but the typist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingUpdatePayload {
    pub sid: Sid,
    pub length: usize,
}

/// `guess:result`, broadcast to the room after an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResultPayload {
    pub sid: Sid,
    /// Zero-based board row the guess landed on.
    pub row: usize,
    pub guess: String,
    pub feedback: Feedback,
    pub solved: bool,
    pub done: bool,
    pub winner_sid: Option<Sid>,
}

/// `guess:rejected`, sent only to the guesser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRejectedPayload {
    pub reason: String,
}

/// `room:finished`, broadcast once every player is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedPayload {
    pub solution: String,
    pub winner_sid: Option<Sid>,
}

/// `room:reset`, broadcast after a new round starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPayload {
    pub msg: String,
}

impl Default for ResetPayload {
    fn default() -> Self {
        Self {
            msg: "reset".to_string(),
        }
    }
}

/// Events the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "room:hello")]
    Hello(HelloPayload),
    #[serde(rename = "room:roster")]
    Roster(RosterPayload),
    #[serde(rename = "room:opponent_joined")]
    OpponentJoined(OpponentJoinedPayload),
    #[serde(rename = "typing:update")]
    TypingUpdate(TypingUpdatePayload),
    #[serde(rename = "guess:result")]
    GuessResult(GuessResultPayload),
    #[serde(rename = "guess:rejected")]
    GuessRejected(GuessRejectedPayload),
    #[serde(rename = "room:finished")]
    RoomFinished(FinishedPayload),
    #[serde(rename = "room:reset")]
    RoomReset(ResetPayload),
}

impl ServerEvent {
    /// Wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hello(_) => "room:hello",
            Self::Roster(_) => "room:roster",
            Self::OpponentJoined(_) => "room:opponent_joined",
            Self::TypingUpdate(_) => "typing:update",
            Self::GuessResult(_) => "guess:result",
            Self::GuessRejected(_) => "guess:rejected",
            Self::RoomFinished(_) => "room:finished",
            Self::RoomReset(_) => "room:reset",
        }
    }
}
