use crate::{Outcome, RngState, TableError, WeightedOutcomeTable};

/// Anything that can produce the next spin outcome.
pub trait OutcomeSource {
    fn draw(&mut self) -> Outcome;

    /// Seed that reproduces this source, when it has one.
    fn seed(&self) -> Option<u64> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct OutcomeSelector {
    table: WeightedOutcomeTable,
    rng: RngState,
}

impl OutcomeSelector {
    pub fn new(table: WeightedOutcomeTable, seed: u64) -> Self {
        Self {
            table,
            rng: RngState::from_seed(seed),
        }
    }

    pub fn reference(seed: u64) -> Self {
        Self::new(WeightedOutcomeTable::reference(), seed)
    }

    pub fn table(&self) -> &WeightedOutcomeTable {
        &self.table
    }
}

impl OutcomeSource for OutcomeSelector {
    fn draw(&mut self) -> Outcome {
        let ticket = self.rng.next_below(self.table.total_weight());
        self.table.pick(ticket)
    }

    fn seed(&self) -> Option<u64> {
        Some(self.rng.seed())
    }
}

/// Replays a fixed sequence, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct ScriptedOutcomes {
    outcomes: Vec<Outcome>,
    cursor: usize,
}

impl ScriptedOutcomes {
    pub fn new(outcomes: Vec<Outcome>) -> Result<Self, TableError> {
        if outcomes.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self {
            outcomes,
            cursor: 0,
        })
    }

    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl OutcomeSource for ScriptedOutcomes {
    fn draw(&mut self) -> Outcome {
        let outcome = self.outcomes[self.cursor % self.outcomes.len()];
        self.cursor += 1;
        outcome
    }
}

impl<S: OutcomeSource + ?Sized> OutcomeSource for Box<S> {
    fn draw(&mut self) -> Outcome {
        (**self).draw()
    }

    fn seed(&self) -> Option<u64> {
        (**self).seed()
    }
}
