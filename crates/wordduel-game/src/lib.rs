//! Game core for wordduel.
//!
//! Two players share a room and each tries to find the same hidden
//! five-letter word in six guesses. Anyone joining a full room watches as
//! a spectator.
//!
//! # Key types
//!
//! - [`score`]: per-letter feedback for a guess
//! - [`Word`] and [`SolutionPicker`]: words and where solutions come from
//! - [`Room`] / [`Player`]: the per-room state machine
//! - [`RoomRegistry`]: every room, plus the connection → room index
//!
//! Nothing here does I/O. Operations return the events they produce and
//! the gateway delivers them.

mod error;
mod registry;
mod room;
mod score;
mod word;
pub mod words;

pub use error::GameError;
pub use registry::{Outbound, RoomRegistry};
pub use room::{Player, PlayerStatus, Role, Room, RoomPhase};
pub use score::score;
pub use word::{RandomPicker, SolutionPicker, Word};
