//! Room and player state.
//!
//! A player moves `Active → Solved` on the correct guess, or
//! `Active → Exhausted` after the last failed guess. Both are terminal
//! until the room is reset. The room itself is `Finished` once it has at
//! least one player and every player is done.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use wordduel_protocol::{
    FinishedPayload, GuessResultPayload, MAX_GUESSES, MAX_PLAYERS, RoomId, RosterPayload, Sid,
    WORD_LEN,
};

use crate::{GameError, Word, score, words};

/// What a connection became on joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,
    Spectator,
}

/// Where a player is in the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    #[default]
    Active,
    Solved,
    Exhausted,
}

impl PlayerStatus {
    pub fn is_solved(self) -> bool {
        matches!(self, Self::Solved)
    }

    /// Solved or out of guesses.
    pub fn is_done(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Solved => write!(f, "Solved"),
            Self::Exhausted => write!(f, "Exhausted"),
        }
    }
}

/// Derived room state. Never stored, always computed from the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Playing,
    Finished,
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => write!(f, "Playing"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// A connection holding one of the room's guessing slots.
#[derive(Debug, Clone)]
pub struct Player {
    sid: Sid,
    guesses: Vec<Word>,
    status: PlayerStatus,
}

impl Player {
    fn new(sid: Sid) -> Self {
        Self {
            sid,
            guesses: Vec::with_capacity(MAX_GUESSES),
            status: PlayerStatus::Active,
        }
    }

    pub fn sid(&self) -> Sid {
        self.sid
    }

    /// Accepted guesses, oldest first.
    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    fn reset(&mut self) {
        self.guesses.clear();
        self.status = PlayerStatus::Active;
    }
}

/// One game session: a solution, up to two players, any number of
/// spectators.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    solution: Word,
    /// Join order is kept; the roster lists players in it.
    players: Vec<Player>,
    spectators: BTreeSet<Sid>,
    /// In-progress guess length per player.
    typing: HashMap<Sid, usize>,
    winner: Option<Sid>,
}

impl Room {
    pub fn new(id: RoomId, solution: Word) -> Self {
        Self {
            id,
            solution,
            players: Vec::with_capacity(MAX_PLAYERS),
            spectators: BTreeSet::new(),
            typing: HashMap::new(),
            winner: None,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn solution(&self) -> &Word {
        &self.solution
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, sid: Sid) -> Option<&Player> {
        self.players.iter().find(|p| p.sid == sid)
    }

    pub fn spectator_count(&self) -> usize {
        self.spectators.len()
    }

    /// First player to solve the current word, if any.
    pub fn winner(&self) -> Option<Sid> {
        self.winner
    }

    pub fn typing_length(&self, sid: Sid) -> Option<usize> {
        self.typing.get(&sid).copied()
    }

    pub fn role_of(&self, sid: Sid) -> Option<Role> {
        if self.player(sid).is_some() {
            Some(Role::Player)
        } else if self.spectators.contains(&sid) {
            Some(Role::Spectator)
        } else {
            None
        }
    }

    /// Players in join order, then spectators.
    pub fn occupants(&self) -> Vec<Sid> {
        self.players
            .iter()
            .map(|p| p.sid)
            .chain(self.spectators.iter().copied())
            .collect()
    }

    pub fn phase(&self) -> RoomPhase {
        if !self.players.is_empty() && self.players.iter().all(|p| p.status.is_done()) {
            RoomPhase::Finished
        } else {
            RoomPhase::Playing
        }
    }

    pub fn roster(&self) -> RosterPayload {
        RosterPayload {
            room_id: self.id.clone(),
            players: self.players.iter().map(|p| p.sid).collect(),
            num_players: self.players.len(),
            num_spectators: self.spectators.len(),
        }
    }

    pub fn finished_payload(&self) -> FinishedPayload {
        FinishedPayload {
            solution: self.solution.to_string(),
            winner_sid: self.winner,
        }
    }

    /// Seats `sid` as a player if a slot is free, otherwise as a spectator.
    pub(crate) fn admit(&mut self, sid: Sid) -> Role {
        if self.players.len() < MAX_PLAYERS {
            self.players.push(Player::new(sid));
            Role::Player
        } else {
            self.spectators.insert(sid);
            Role::Spectator
        }
    }

    /// Drops `sid` from the room. Returns `false` if it was not here.
    pub(crate) fn remove(&mut self, sid: Sid) -> bool {
        self.typing.remove(&sid);
        let before = self.players.len();
        self.players.retain(|p| p.sid != sid);
        let was_player = self.players.len() != before;
        let was_spectator = self.spectators.remove(&sid);
        was_player || was_spectator
    }

    /// Records how many letters a player has typed.
    ///
    /// # Errors
    /// [`GameError::NotAPlayer`] for spectators and strangers.
    pub fn set_typing(&mut self, sid: Sid, length: usize) -> Result<(), GameError> {
        if self.player(sid).is_none() {
            return Err(GameError::NotAPlayer(sid, self.id.clone()));
        }
        self.typing.insert(sid, length);
        Ok(())
    }

    /// Applies one guess from a player and returns the result to broadcast.
    ///
    /// The text is lowercased first. A word outside the corpus is refused
    /// without using up a guess.
    ///
    /// # Errors
    /// - [`GameError::WrongLength`] unless the text has five letters
    /// - [`GameError::NotAPlayer`] for spectators and strangers
    /// - [`GameError::PlayerDone`] once solved or out of guesses
    /// - [`GameError::NotInWordList`] for an unknown word
    pub fn submit_guess(&mut self, sid: Sid, text: &str) -> Result<GuessResultPayload, GameError> {
        let text = text.to_lowercase();
        let len = text.chars().count();
        if len != WORD_LEN {
            return Err(GameError::WrongLength(len));
        }

        let player = self
            .players
            .iter_mut()
            .find(|p| p.sid == sid)
            .ok_or_else(|| GameError::NotAPlayer(sid, self.id.clone()))?;
        if player.status.is_done() || player.guesses.len() >= MAX_GUESSES {
            return Err(GameError::PlayerDone(sid));
        }
        if !words::is_accepted(&text) {
            return Err(GameError::NotInWordList(text));
        }

        let guess = Word::parse(&text)?;
        let feedback = score(&guess, &self.solution);
        player.guesses.push(guess);

        if guess == self.solution {
            player.status = PlayerStatus::Solved;
            self.winner.get_or_insert(sid);
        } else if player.guesses.len() >= MAX_GUESSES {
            player.status = PlayerStatus::Exhausted;
        }

        Ok(GuessResultPayload {
            sid,
            row: player.guesses.len() - 1,
            guess: text,
            feedback,
            solved: player.status.is_solved(),
            done: player.status.is_done(),
            winner_sid: self.winner,
        })
    }

    /// Starts a new round on `solution`. Occupants stay; progress goes.
    pub fn reset(&mut self, solution: Word) {
        self.solution = solution;
        self.winner = None;
        self.typing.clear();
        for player in &mut self.players {
            player.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordduel_protocol::Mark;

    fn word(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    fn room(solution: &str) -> Room {
        Room::new(RoomId::normalize("test"), word(solution))
    }

    /// Six accepted words, none of them "slate".
    const MISSES: [&str; MAX_GUESSES] = ["crane", "about", "house", "world", "pilot", "fruit"];

    #[test]
    fn test_first_two_are_players_then_spectators() {
        let mut r = room("slate");
        assert_eq!(r.admit(Sid(1)), Role::Player);
        assert_eq!(r.admit(Sid(2)), Role::Player);
        assert_eq!(r.admit(Sid(3)), Role::Spectator);
        assert_eq!(r.admit(Sid(4)), Role::Spectator);
        assert_eq!(r.players().len(), MAX_PLAYERS);
        assert_eq!(r.spectator_count(), 2);
        assert_eq!(r.occupants(), vec![Sid(1), Sid(2), Sid(3), Sid(4)]);
    }

    #[test]
    fn test_freed_slot_goes_to_next_joiner() {
        let mut r = room("slate");
        r.admit(Sid(1));
        r.admit(Sid(2));
        assert!(r.remove(Sid(1)));
        assert_eq!(r.admit(Sid(3)), Role::Player);
        assert_eq!(r.roster().players, vec![Sid(2), Sid(3)]);
    }

    #[test]
    fn test_remove_unknown_returns_false() {
        let mut r = room("slate");
        assert!(!r.remove(Sid(9)));
    }

    #[test]
    fn test_remove_clears_typing() {
        let mut r = room("slate");
        r.admit(Sid(1));
        r.set_typing(Sid(1), 3).unwrap();
        assert_eq!(r.typing_length(Sid(1)), Some(3));
        r.remove(Sid(1));
        assert_eq!(r.typing_length(Sid(1)), None);
    }

    #[test]
    fn test_spectator_cannot_type() {
        let mut r = room("slate");
        r.admit(Sid(1));
        r.admit(Sid(2));
        r.admit(Sid(3));
        assert!(matches!(r.set_typing(Sid(3), 2), Err(GameError::NotAPlayer(..))));
    }

    #[test]
    fn test_correct_guess_solves_and_wins() {
        let mut r = room("slate");
        r.admit(Sid(1));
        let result = r.submit_guess(Sid(1), "SLATE").unwrap();
        assert_eq!(result.row, 0);
        assert_eq!(result.guess, "slate");
        assert_eq!(result.feedback, [Mark::Green; WORD_LEN]);
        assert!(result.solved && result.done);
        assert_eq!(result.winner_sid, Some(Sid(1)));
        assert_eq!(r.player(Sid(1)).unwrap().status(), PlayerStatus::Solved);
    }

    #[test]
    fn test_second_solver_does_not_take_win() {
        let mut r = room("slate");
        r.admit(Sid(1));
        r.admit(Sid(2));
        r.submit_guess(Sid(2), "slate").unwrap();
        let result = r.submit_guess(Sid(1), "slate").unwrap();
        assert!(result.solved);
        assert_eq!(result.winner_sid, Some(Sid(2)));
    }

    #[test]
    fn test_sixth_miss_exhausts_player() {
        let mut r = room("slate");
        r.admit(Sid(1));
        for (i, guess) in MISSES.iter().enumerate() {
            let result = r.submit_guess(Sid(1), guess).unwrap();
            assert_eq!(result.row, i);
            assert!(!result.solved);
            assert_eq!(result.done, i == MAX_GUESSES - 1);
        }
        assert_eq!(r.player(Sid(1)).unwrap().status(), PlayerStatus::Exhausted);
        assert!(matches!(r.submit_guess(Sid(1), "slate"), Err(GameError::PlayerDone(_))));
    }

    #[test]
    fn test_unknown_word_does_not_use_a_guess() {
        let mut r = room("slate");
        r.admit(Sid(1));
        assert!(matches!(
            r.submit_guess(Sid(1), "zzzzz"),
            Err(GameError::NotInWordList(w)) if w == "zzzzz"
        ));
        assert!(r.player(Sid(1)).unwrap().guesses().is_empty());
        assert_eq!(r.submit_guess(Sid(1), "crane").unwrap().row, 0);
    }

    #[test]
    fn test_wrong_length_checked_before_membership() {
        let mut r = room("slate");
        assert!(matches!(r.submit_guess(Sid(1), "cran"), Err(GameError::WrongLength(4))));
        assert!(matches!(r.submit_guess(Sid(1), "crane"), Err(GameError::NotAPlayer(..))));
    }

    #[test]
    fn test_phase_needs_every_player_done() {
        let mut r = room("slate");
        assert_eq!(r.phase(), RoomPhase::Playing, "empty room is not finished");
        r.admit(Sid(1));
        r.admit(Sid(2));
        r.submit_guess(Sid(1), "slate").unwrap();
        assert_eq!(r.phase(), RoomPhase::Playing);
        for guess in MISSES {
            r.submit_guess(Sid(2), guess).unwrap();
        }
        assert_eq!(r.phase(), RoomPhase::Finished);
        assert_eq!(r.finished_payload().solution, "slate");
        assert_eq!(r.finished_payload().winner_sid, Some(Sid(1)));
    }

    #[test]
    fn test_reset_clears_progress_keeps_occupants() {
        let mut r = room("slate");
        r.admit(Sid(1));
        r.admit(Sid(2));
        r.admit(Sid(3));
        r.set_typing(Sid(2), 4).unwrap();
        r.submit_guess(Sid(1), "slate").unwrap();

        r.reset(word("crane"));

        assert_eq!(r.solution().as_str(), "crane");
        assert_eq!(r.winner(), None);
        assert_eq!(r.typing_length(Sid(2)), None);
        assert_eq!(r.occupants(), vec![Sid(1), Sid(2), Sid(3)]);
        for p in r.players() {
            assert!(p.guesses().is_empty());
            assert_eq!(p.status(), PlayerStatus::Active);
        }
        assert_eq!(r.phase(), RoomPhase::Playing);
    }

    #[test]
    fn test_status_flags() {
        assert!(!PlayerStatus::Active.is_done());
        assert!(PlayerStatus::Solved.is_done() && PlayerStatus::Solved.is_solved());
        assert!(PlayerStatus::Exhausted.is_done() && !PlayerStatus::Exhausted.is_solved());
        assert_eq!(PlayerStatus::Exhausted.to_string(), "Exhausted");
        assert_eq!(RoomPhase::Finished.to_string(), "Finished");
    }
}
