use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    Run1,
    Run2,
    Run4,
    Run6,
    Caught,
    Bowled,
    RunOut,
}

impl Outcome {
    pub const ALL: [Outcome; 7] = [
        Outcome::Run1,
        Outcome::Run2,
        Outcome::Run4,
        Outcome::Run6,
        Outcome::Caught,
        Outcome::Bowled,
        Outcome::RunOut,
    ];

    /// Runs credited to the batter; `None` for a dismissal.
    pub fn runs(self) -> Option<u32> {
        match self {
            Outcome::Run1 => Some(1),
            Outcome::Run2 => Some(2),
            Outcome::Run4 => Some(4),
            Outcome::Run6 => Some(6),
            Outcome::Caught | Outcome::Bowled | Outcome::RunOut => None,
        }
    }

    pub fn is_dismissal(self) -> bool {
        self.runs().is_none()
    }

    pub fn is_boundary(self) -> bool {
        matches!(self, Outcome::Run4 | Outcome::Run6)
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Run1 => "1",
            Outcome::Run2 => "2",
            Outcome::Run4 => "4",
            Outcome::Run6 => "6",
            Outcome::Caught => "Caught",
            Outcome::Bowled => "Bowled",
            Outcome::RunOut => "Run Out",
        }
    }

    /// Centre of the wheel slice this outcome occupies, in degrees.
    pub fn wheel_angle(self) -> f64 {
        match self {
            Outcome::Run1 => 36.0,
            Outcome::Run2 => 117.0,
            Outcome::Run4 => 189.0,
            Outcome::Run6 => 234.0,
            Outcome::Caught => 270.0,
            Outcome::Bowled => 306.0,
            Outcome::RunOut => 342.0,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.runs() {
            Some(_) => write!(f, "{} runs!", self.label()),
            None => f.write_str(self.label()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("outcome table is empty")]
    Empty,
    #[error("outcome table has zero total weight")]
    ZeroWeight,
    #[error("outcome table weights overflow u32")]
    Overflow,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeightedOutcome {
    pub outcome: Outcome,
    pub weight: u32,
}

/// Discrete distribution over outcomes, sampled by walking cumulative weights.
/// Serialized as its entry list; decoding goes through [`WeightedOutcomeTable::new`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    try_from = "Vec<WeightedOutcome>",
    into = "Vec<WeightedOutcome>"
)]
pub struct WeightedOutcomeTable {
    entries: Vec<WeightedOutcome>,
    total_weight: u32,
}

impl WeightedOutcomeTable {
    pub fn new(entries: Vec<WeightedOutcome>) -> Result<Self, TableError> {
        if entries.is_empty() {
            return Err(TableError::Empty);
        }
        let total_weight = entries
            .iter()
            .try_fold(0u32, |acc, entry| acc.checked_add(entry.weight))
            .ok_or(TableError::Overflow)?;
        if total_weight == 0 {
            return Err(TableError::ZeroWeight);
        }
        Ok(Self {
            entries,
            total_weight,
        })
    }

    /// 1 ×4, 2 ×5, 4 ×3, 6 ×2, Caught ×2, Bowled ×2, Run Out ×2.
    pub fn reference() -> Self {
        let entries = [
            (Outcome::Run1, 4),
            (Outcome::Run2, 5),
            (Outcome::Run4, 3),
            (Outcome::Run6, 2),
            (Outcome::Caught, 2),
            (Outcome::Bowled, 2),
            (Outcome::RunOut, 2),
        ]
        .into_iter()
        .map(|(outcome, weight)| WeightedOutcome { outcome, weight })
        .collect::<Vec<_>>();
        Self {
            entries,
            total_weight: 20,
        }
    }

    pub fn entries(&self) -> &[WeightedOutcome] {
        &self.entries
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    pub fn weight_of(&self, outcome: Outcome) -> u32 {
        self.entries
            .iter()
            .filter(|entry| entry.outcome == outcome)
            .map(|entry| entry.weight)
            .sum()
    }

    /// Maps a ticket in `0..total_weight` to its outcome. Tickets past the end
    /// clamp to the last entry.
    pub fn pick(&self, ticket: u32) -> Outcome {
        let mut remaining = ticket;
        for entry in &self.entries {
            if remaining < entry.weight {
                return entry.outcome;
            }
            remaining -= entry.weight;
        }
        self.entries[self.entries.len() - 1].outcome
    }
}

impl TryFrom<Vec<WeightedOutcome>> for WeightedOutcomeTable {
    type Error = TableError;

    fn try_from(entries: Vec<WeightedOutcome>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<WeightedOutcomeTable> for Vec<WeightedOutcome> {
    fn from(table: WeightedOutcomeTable) -> Self {
        table.entries
    }
}

impl Default for WeightedOutcomeTable {
    fn default() -> Self {
        Self::reference()
    }
}
