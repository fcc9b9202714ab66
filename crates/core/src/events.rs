use crate::{MatchResult, Outcome, PlayerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IgnoreReason {
    InFlight,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    MatchStarted {
        seed: Option<u64>,
    },
    SpinStarted {
        player: PlayerId,
        outcome: Outcome,
        wheel_angle: f64,
    },
    SpinIgnored {
        reason: IgnoreReason,
    },
    OutcomeApplied {
        player: PlayerId,
        outcome: Outcome,
        score: u32,
        wickets: u32,
        spin: u32,
    },
    TurnChanged {
        player: PlayerId,
    },
    MatchFinished {
        result: MatchResult,
    },
}

/// Presentation cue a front end may play or flash for an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cue {
    Spin,
    Wicket,
    Boundary,
    GameOver,
}

impl Event {
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Event::SpinStarted { .. } => Some(Cue::Spin),
            Event::OutcomeApplied { outcome, .. } if outcome.is_dismissal() => Some(Cue::Wicket),
            Event::OutcomeApplied { outcome, .. } if outcome.is_boundary() => Some(Cue::Boundary),
            Event::MatchFinished { .. } => Some(Cue::GameOver),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
