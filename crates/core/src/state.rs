use crate::{MatchResult, Outcome, KNOCKOUT_WICKETS, MAX_SPINS};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerState {
    pub score: u32,
    pub wickets: u32,
}

impl PlayerState {
    pub fn is_knocked_out(&self) -> bool {
        self.wickets >= KNOCKOUT_WICKETS
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchState {
    pub player1: PlayerState,
    pub player2: PlayerState,
    pub active_player: PlayerId,
    pub spin_count: u32,
    pub phase: Phase,
}

impl MatchState {
    pub fn reset() -> Self {
        Self {
            player1: PlayerState::default(),
            player2: PlayerState::default(),
            active_player: PlayerId::One,
            spin_count: 0,
            phase: Phase::InProgress,
        }
    }

    pub fn player(&self, id: PlayerId) -> &PlayerState {
        match id {
            PlayerId::One => &self.player1,
            PlayerId::Two => &self.player2,
        }
    }

    fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        match id {
            PlayerId::One => &mut self.player1,
            PlayerId::Two => &mut self.player2,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn spins_left(&self) -> u32 {
        MAX_SPINS.saturating_sub(self.spin_count)
    }

    /// Credits `outcome` to the active player and advances the turn.
    /// A finished match is returned unchanged.
    pub fn apply_outcome(self, outcome: Outcome) -> Self {
        if self.is_finished() {
            return self;
        }
        let mut next = self;
        let batter = next.player_mut(next.active_player);
        match outcome.runs() {
            Some(runs) => batter.score += runs,
            None => batter.wickets += 1,
        }
        next.spin_count += 1;
        // Either side may already sit at the limit, so check both.
        if next.player1.is_knocked_out()
            || next.player2.is_knocked_out()
            || next.spin_count >= MAX_SPINS
        {
            next.phase = Phase::Finished;
        } else {
            next.active_player = next.active_player.other();
        }
        next
    }

    /// `Some` only once the match is over.
    pub fn result(&self) -> Option<MatchResult> {
        self.is_finished().then(|| crate::determine_result(self))
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::reset()
    }
}
