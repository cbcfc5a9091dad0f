//! Wire protocol for wordduel.
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Sid`], [`RoomId`],
//!   [`Mark`], [`Recipient`]): what travels between browser and server.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events become
//!   frames.
//! - **Errors** ([`ProtocolError`]).
//!
//! Every frame is an envelope of the form
//! `{"event": "<name>", "data": { ... }}`. Event names follow the
//! `scope:action` convention the browser client listens on
//! (`room:join`, `guess:result`, ...).
//!
//! ```text
//! Transport (frames) → Protocol (events) → Game (rooms, players, scoring)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientEvent, Feedback, FinishedPayload, GuessPayload, GuessRejectedPayload, GuessResultPayload,
    HelloPayload, JoinPayload, LOBBY_ROOM_ID, MAX_GUESSES, MAX_PLAYERS, Mark, NOT_IN_WORD_LIST,
    OpponentJoinedPayload, Recipient, ResetPayload, RoomId, RosterPayload, ServerEvent, Sid,
    TypingPayload, TypingUpdatePayload, WORD_LEN,
};
