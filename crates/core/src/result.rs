use crate::{MatchState, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WinMargin {
    Knockout,
    Runs(u32),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchResult {
    Win { winner: PlayerId, margin: WinMargin },
    Draw,
}

/// Knockout outranks any run total; player 1 is checked first.
pub fn determine_result(state: &MatchState) -> MatchResult {
    let (p1, p2) = (&state.player1, &state.player2);
    if p1.is_knocked_out() {
        return MatchResult::Win {
            winner: PlayerId::Two,
            margin: WinMargin::Knockout,
        };
    }
    if p2.is_knocked_out() {
        return MatchResult::Win {
            winner: PlayerId::One,
            margin: WinMargin::Knockout,
        };
    }
    if p1.score > p2.score {
        MatchResult::Win {
            winner: PlayerId::One,
            margin: WinMargin::Runs(p1.score - p2.score),
        }
    } else if p2.score > p1.score {
        MatchResult::Win {
            winner: PlayerId::Two,
            margin: WinMargin::Runs(p2.score - p1.score),
        }
    } else {
        MatchResult::Draw
    }
}

impl MatchResult {
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            MatchResult::Win { winner, .. } => Some(*winner),
            MatchResult::Draw => None,
        }
    }

    pub fn is_knockout(&self) -> bool {
        matches!(
            self,
            MatchResult::Win {
                margin: WinMargin::Knockout,
                ..
            }
        )
    }

    /// Banner shown when the match ends.
    pub fn announcement(&self) -> String {
        match self {
            MatchResult::Win {
                winner,
                margin: WinMargin::Knockout,
            } => format!("{} is knocked out! {} Wins!", winner.other(), winner),
            MatchResult::Win {
                winner,
                margin: WinMargin::Runs(runs),
            } => format!("{winner} Wins by {runs} runs!"),
            MatchResult::Draw => "It's a Draw!".to_string(),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Win {
                winner,
                margin: WinMargin::Knockout,
            } => write!(f, "{winner} wins by knockout"),
            MatchResult::Win {
                winner,
                margin: WinMargin::Runs(runs),
            } => write!(f, "{winner} wins by {runs} runs"),
            MatchResult::Draw => f.write_str("It's a draw"),
        }
    }
}
