//! Room registry: owns every room and knows which room each connection
//! is in.
//!
//! Every operation returns the events it produced as
//! `(Recipient, ServerEvent)` pairs and leaves delivery to the caller.
//! Operations from connections with no room, or that don't apply to the
//! caller, produce nothing.

use std::collections::HashMap;

use wordduel_protocol::{
    GuessRejectedPayload, HelloPayload, MAX_GUESSES, MAX_PLAYERS, NOT_IN_WORD_LIST,
    OpponentJoinedPayload, Recipient, ResetPayload, RoomId, ServerEvent, Sid, TypingUpdatePayload,
};

use crate::{GameError, RandomPicker, Role, Room, RoomPhase, SolutionPicker};

/// An event and who it is for.
pub type Outbound = (Recipient, ServerEvent);

/// All rooms for the life of the process.
///
/// Rooms are created on first join and never removed. A connection is in
/// at most one room; `memberships` is the reverse index that enforces it.
pub struct RoomRegistry<P: SolutionPicker = RandomPicker> {
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<Sid, RoomId>,
    picker: P,
}

impl RoomRegistry<RandomPicker> {
    /// Creates an empty registry that draws random solutions.
    pub fn new() -> Self {
        Self::with_picker(RandomPicker)
    }
}

impl Default for RoomRegistry<RandomPicker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SolutionPicker> RoomRegistry<P> {
    /// Creates an empty registry with a custom solution source.
    pub fn with_picker(picker: P) -> Self {
        Self {
            rooms: HashMap::new(),
            memberships: HashMap::new(),
            picker,
        }
    }

    /// Returns the room for `raw_id`, creating it with a fresh solution if
    /// needed. The id is normalized first (trimmed, blank → lobby).
    pub fn get_or_create(&mut self, raw_id: &str) -> &mut Room {
        let picker = &mut self.picker;
        self.rooms
            .entry(RoomId::normalize(raw_id))
            .or_insert_with_key(|room_id| {
                tracing::info!(%room_id, "room created");
                Room::new(room_id.clone(), picker.pick())
            })
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// The room `sid` is currently in.
    pub fn room_of(&self, sid: Sid) -> Option<&RoomId> {
        self.memberships.get(&sid)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Everyone in the room right now; empty for an unknown room.
    pub fn occupants(&self, room_id: &RoomId) -> Vec<Sid> {
        self.rooms
            .get(room_id)
            .map(Room::occupants)
            .unwrap_or_default()
    }

    /// Resolves a recipient against current membership.
    pub fn recipients(&self, recipient: &Recipient) -> Vec<Sid> {
        match recipient {
            Recipient::Room(room_id) => self.occupants(room_id),
            Recipient::RoomExcept(room_id, skip) => self
                .occupants(room_id)
                .into_iter()
                .filter(|sid| sid != skip)
                .collect(),
            Recipient::Connection(sid) => vec![*sid],
        }
    }

    /// Puts `sid` in a room as a player if a slot is free, otherwise as a
    /// spectator.
    ///
    /// A connection already in a different room leaves it first. Joining
    /// the room it is already in keeps its seat and just repeats the
    /// hello and roster.
    pub fn join(&mut self, sid: Sid, raw_room_id: &str) -> (Role, Vec<Outbound>) {
        let room_id = RoomId::normalize(raw_room_id);
        let mut out = Vec::new();

        if let Some(current) = self.memberships.get(&sid).cloned() {
            if current == room_id {
                if let Some(room) = self.rooms.get(&room_id) {
                    if let Some(role) = room.role_of(sid) {
                        out.push(hello(sid, role));
                        out.push((Recipient::Room(room_id), ServerEvent::Roster(room.roster())));
                        return (role, out);
                    }
                }
            } else {
                out.extend(self.leave(sid));
            }
        }

        let room = self.get_or_create(room_id.as_str());
        let role = room.admit(sid);
        tracing::info!(%room_id, %sid, ?role, "joined room");

        if role == Role::Player && room.players().len() == MAX_PLAYERS {
            for other in room.players().iter().filter(|p| p.sid() != sid) {
                out.push((
                    Recipient::Connection(other.sid()),
                    ServerEvent::OpponentJoined(OpponentJoinedPayload { sid }),
                ));
            }
        }
        out.push(hello(sid, role));
        out.push((Recipient::Room(room_id.clone()), ServerEvent::Roster(room.roster())));

        self.memberships.insert(sid, room_id);
        (role, out)
    }

    /// Removes `sid` from its room and tells the rest of the room.
    pub fn leave(&mut self, sid: Sid) -> Vec<Outbound> {
        let Some(room_id) = self.memberships.remove(&sid) else {
            return Vec::new();
        };
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Vec::new();
        };
        if !room.remove(sid) {
            return Vec::new();
        }
        tracing::info!(%room_id, %sid, "left room");
        let roster = ServerEvent::Roster(room.roster());
        vec![(Recipient::Room(room_id), roster)]
    }

    /// Relays a player's in-progress guess length to the rest of the room.
    pub fn set_typing(&mut self, sid: Sid, length: usize) -> Vec<Outbound> {
        let result = self
            .room_of_mut(sid)
            .and_then(|(room_id, room)| room.set_typing(sid, length).map(|()| room_id.clone()));
        match result {
            Ok(room_id) => vec![(
                Recipient::RoomExcept(room_id, sid),
                ServerEvent::TypingUpdate(TypingUpdatePayload { sid, length }),
            )],
            Err(e) => {
                tracing::debug!(%sid, error = %e, "typing ignored");
                Vec::new()
            }
        }
    }

    /// Scores a guess and broadcasts the result, plus the reveal once
    /// every player in the room is done.
    pub fn submit_guess(&mut self, sid: Sid, text: &str) -> Vec<Outbound> {
        let (room_id, room) = match self.room_of_mut(sid) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(%sid, error = %e, "guess ignored");
                return Vec::new();
            }
        };

        match room.submit_guess(sid, text) {
            Ok(result) => {
                tracing::debug!(%room_id, %sid, row = result.row, solved = result.solved, "guess scored");
                let mut out = vec![(Recipient::Room(room_id.clone()), ServerEvent::GuessResult(result))];
                if room.phase() == RoomPhase::Finished {
                    tracing::info!(%room_id, winner = ?room.winner(), "round finished");
                    out.push((
                        Recipient::Room(room_id.clone()),
                        ServerEvent::RoomFinished(room.finished_payload()),
                    ));
                }
                out
            }
            Err(GameError::NotInWordList(word)) => {
                tracing::debug!(%room_id, %sid, %word, "guess rejected");
                vec![(
                    Recipient::Connection(sid),
                    ServerEvent::GuessRejected(GuessRejectedPayload {
                        reason: NOT_IN_WORD_LIST.to_string(),
                    }),
                )]
            }
            Err(e) => {
                tracing::debug!(%room_id, %sid, error = %e, "guess ignored");
                Vec::new()
            }
        }
    }

    /// Starts a new round in `room_id` with a fresh solution.
    pub fn reset(&mut self, room_id: &RoomId) -> Vec<Outbound> {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return Vec::new();
        };
        room.reset(self.picker.pick());
        tracing::info!(%room_id, "room reset");
        vec![(
            Recipient::Room(room_id.clone()),
            ServerEvent::RoomReset(ResetPayload::default()),
        )]
    }

    /// Resets whichever room `sid` is in.
    pub fn reset_for(&mut self, sid: Sid) -> Vec<Outbound> {
        match self.memberships.get(&sid).cloned() {
            Some(room_id) => self.reset(&room_id),
            None => {
                tracing::debug!(%sid, "reset ignored, not in a room");
                Vec::new()
            }
        }
    }

    fn room_of_mut(&mut self, sid: Sid) -> Result<(&RoomId, &mut Room), GameError> {
        let room_id = self
            .memberships
            .get(&sid)
            .ok_or(GameError::NotInAnyRoom(sid))?;
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| GameError::RoomNotFound(room_id.clone()))?;
        Ok((room_id, room))
    }
}

fn hello(sid: Sid, role: Role) -> Outbound {
    (
        Recipient::Connection(sid),
        ServerEvent::Hello(HelloPayload {
            you_are_player: role == Role::Player,
            max_guesses: MAX_GUESSES,
        }),
    )
}
