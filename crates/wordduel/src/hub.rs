//! Event hub: applies inbound client events to the room registry and
//! fans the resulting server events out to connected peers.
//!
//! The hub owns all shared state. The server keeps exactly one behind a
//! mutex, so each inbound event is applied as a single atomic step.

use std::collections::HashMap;

use tokio::sync::mpsc;
use wordduel_game::{Outbound, RandomPicker, RoomRegistry, SolutionPicker};
use wordduel_protocol::{ClientEvent, ServerEvent, Sid};

/// Outbound channel for one connection. The connection task owns the
/// receiving half and writes each event to its socket.
pub type PeerSender = mpsc::UnboundedSender<ServerEvent>;

pub struct Hub<P: SolutionPicker = RandomPicker> {
    registry: RoomRegistry<P>,
    peers: HashMap<Sid, PeerSender>,
}

impl Default for Hub<RandomPicker> {
    fn default() -> Self {
        Self::new(RoomRegistry::new())
    }
}

impl<P: SolutionPicker> Hub<P> {
    pub fn new(registry: RoomRegistry<P>) -> Self {
        Self {
            registry,
            peers: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &RoomRegistry<P> {
        &self.registry
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Registers a freshly connected peer. It is in no room until it
    /// sends `room:join`.
    pub fn connect(&mut self, sid: Sid, tx: PeerSender) {
        self.peers.insert(sid, tx);
    }

    /// Applies one inbound event from `sid`.
    pub fn dispatch(&mut self, sid: Sid, event: ClientEvent) {
        let out = match event {
            ClientEvent::Join(payload) => self.registry.join(sid, &payload.room_id).1,
            ClientEvent::Typing(payload) => self.registry.set_typing(sid, payload.length),
            ClientEvent::Guess(payload) => self.registry.submit_guess(sid, &payload.guess),
            ClientEvent::ResetRoom => self.registry.reset_for(sid),
        };
        self.deliver(out);
    }

    /// Removes `sid` from its room and forgets its channel.
    ///
    /// Safe to call more than once.
    pub fn disconnect(&mut self, sid: Sid) {
        let out = self.registry.leave(sid);
        self.peers.remove(&sid);
        self.deliver(out);
    }

    fn deliver(&self, out: Vec<Outbound>) {
        for (recipient, event) in out {
            for sid in self.registry.recipients(&recipient) {
                let Some(tx) = self.peers.get(&sid) else {
                    continue;
                };
                if tx.send(event.clone()).is_err() {
                    tracing::debug!(%sid, event = event.name(), "peer channel closed, event dropped");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::UnboundedReceiver;
    use wordduel_game::Word;
    use wordduel_protocol::{GuessPayload, JoinPayload, TypingPayload};

    use super::*;

    fn hub() -> Hub<impl SolutionPicker> {
        Hub::new(RoomRegistry::with_picker(|| Word::parse("slate").unwrap()))
    }

    fn peer(hub: &mut Hub<impl SolutionPicker>, id: u64) -> UnboundedReceiver<ServerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        hub.connect(Sid(id), tx);
        rx
    }

    fn join(room: &str) -> ClientEvent {
        ClientEvent::Join(JoinPayload {
            room_id: room.to_string(),
        })
    }

    fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<&'static str> {
        let mut names = Vec::new();
        while let Ok(event) = rx.try_recv() {
            names.push(event.name());
        }
        names
    }

    #[test]
    fn test_join_delivers_hello_and_roster() {
        let mut hub = hub();
        let mut a = peer(&mut hub, 1);
        hub.dispatch(Sid(1), join("r1"));
        assert_eq!(drain(&mut a), vec!["room:hello", "room:roster"]);
    }

    #[test]
    fn test_second_join_fans_out() {
        let mut hub = hub();
        let mut a = peer(&mut hub, 1);
        let mut b = peer(&mut hub, 2);
        hub.dispatch(Sid(1), join("r1"));
        drain(&mut a);

        hub.dispatch(Sid(2), join("r1"));
        assert_eq!(drain(&mut a), vec!["room:opponent_joined", "room:roster"]);
        assert_eq!(drain(&mut b), vec!["room:hello", "room:roster"]);
    }

    #[test]
    fn test_typing_skips_sender() {
        let mut hub = hub();
        let mut a = peer(&mut hub, 1);
        let mut b = peer(&mut hub, 2);
        hub.dispatch(Sid(1), join("r1"));
        hub.dispatch(Sid(2), join("r1"));
        drain(&mut a);
        drain(&mut b);

        hub.dispatch(Sid(1), ClientEvent::Typing(TypingPayload { length: 2 }));
        assert!(drain(&mut a).is_empty());
        assert_eq!(drain(&mut b), vec!["typing:update"]);
    }

    #[test]
    fn test_rejection_only_reaches_sender() {
        let mut hub = hub();
        let mut a = peer(&mut hub, 1);
        let mut b = peer(&mut hub, 2);
        hub.dispatch(Sid(1), join("r1"));
        hub.dispatch(Sid(2), join("r1"));
        drain(&mut a);
        drain(&mut b);

        hub.dispatch(
            Sid(1),
            ClientEvent::Guess(GuessPayload {
                guess: "zzzzz".into(),
            }),
        );
        assert_eq!(drain(&mut a), vec!["guess:rejected"]);
        assert!(drain(&mut b).is_empty());
    }

    #[test]
    fn test_disconnect_updates_room() {
        let mut hub = hub();
        let _a = peer(&mut hub, 1);
        let mut b = peer(&mut hub, 2);
        hub.dispatch(Sid(1), join("r1"));
        hub.dispatch(Sid(2), join("r1"));
        drain(&mut b);

        hub.disconnect(Sid(1));
        assert_eq!(hub.peer_count(), 1);
        assert_eq!(drain(&mut b), vec!["room:roster"]);
        assert!(hub.registry().room_of(Sid(1)).is_none());

        hub.disconnect(Sid(1));
        assert!(drain(&mut b).is_empty());
    }

    #[test]
    fn test_closed_peer_does_not_block_others() {
        let mut hub = hub();
        let a = peer(&mut hub, 1);
        let mut b = peer(&mut hub, 2);
        hub.dispatch(Sid(1), join("r1"));
        hub.dispatch(Sid(2), join("r1"));
        drop(a);
        drain(&mut b);

        hub.dispatch(Sid(2), ClientEvent::ResetRoom);
        assert_eq!(drain(&mut b), vec!["room:reset"]);
    }

    #[test]
    fn test_events_before_join_are_ignored() {
        let mut hub = hub();
        let mut a = peer(&mut hub, 1);
        hub.dispatch(Sid(1), ClientEvent::Typing(TypingPayload { length: 1 }));
        hub.dispatch(
            Sid(1),
            ClientEvent::Guess(GuessPayload {
                guess: "crane".into(),
            }),
        );
        hub.dispatch(Sid(1), ClientEvent::ResetRoom);
        assert!(drain(&mut a).is_empty());
    }
}
