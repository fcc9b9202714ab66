use crate::{MatchRecord, OutcomeCount, SimConfig, SimError, SimSummary, StepRecord};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;
use wicketspin_core::{
    determine_result, EventBus, MatchSession, Outcome, OutcomeSelector, OutcomeSource, PlayerId,
};

/// Drives one session through back-to-back matches with no spin delay.
#[derive(Debug)]
pub struct Simulator<S = OutcomeSelector> {
    pub session: MatchSession<S>,
    pub events: EventBus,
    played: u32,
}

impl Simulator<OutcomeSelector> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(OutcomeSelector::reference(seed))
    }
}

impl<S: OutcomeSource> Simulator<S> {
    pub fn new(source: S) -> Self {
        let mut events = EventBus::default();
        let mut session = MatchSession::new(source, Duration::ZERO);
        session.start(&mut events);
        Self {
            session,
            events,
            played: 0,
        }
    }

    pub fn played(&self) -> u32 {
        self.played
    }

    /// Plays the current match to the end, restarting first if one was
    /// already played.
    pub fn play_match(&mut self) -> MatchRecord {
        if self.played > 0 {
            self.session.reset(&mut self.events);
        }
        let mut steps = Vec::new();
        while self.session.can_spin() {
            self.session.request_spin(Duration::ZERO, &mut self.events);
            if let Some(commit) = self.session.poll(Duration::ZERO, &mut self.events) {
                steps.push(StepRecord {
                    spin: commit.state.spin_count,
                    player: commit.player,
                    outcome: commit.outcome,
                    player1: commit.state.player1,
                    player2: commit.state.player2,
                });
            }
        }
        self.events.drain().for_each(drop);
        let state = *self.session.state();
        let record = MatchRecord {
            index: self.played,
            result: determine_result(&state),
            spins: state.spin_count,
            player1: state.player1,
            player2: state.player2,
            steps,
        };
        self.played += 1;
        record
    }
}

pub fn simulate(config: &SimConfig) -> Result<SimSummary, SimError> {
    if config.matches == 0 {
        return Err(SimError::NoMatches);
    }
    let mut simulator = Simulator::seeded(config.seed);
    let mut records = Vec::with_capacity(config.matches as usize);
    for _ in 0..config.matches {
        records.push(simulator.play_match());
    }
    let summary = summarize(config, records);
    info!(
        matches = summary.matches,
        player1_wins = summary.player1_wins,
        player2_wins = summary.player2_wins,
        draws = summary.draws,
        "simulation finished"
    );
    Ok(summary)
}

fn summarize(config: &SimConfig, mut records: Vec<MatchRecord>) -> SimSummary {
    let mut player1_wins = 0;
    let mut player2_wins = 0;
    let mut draws = 0;
    let mut knockouts = 0;
    let mut total_spins = 0u64;
    let mut counts: HashMap<Outcome, u64> = HashMap::new();
    for record in &records {
        match record.result.winner() {
            Some(PlayerId::One) => player1_wins += 1,
            Some(PlayerId::Two) => player2_wins += 1,
            None => draws += 1,
        }
        if record.result.is_knockout() {
            knockouts += 1;
        }
        total_spins += u64::from(record.spins);
        for step in &record.steps {
            *counts.entry(step.outcome).or_insert(0) += 1;
        }
    }
    if !config.record_traces {
        for record in &mut records {
            record.steps.clear();
        }
    }
    let matches = records.len() as u32;
    SimSummary {
        seed: config.seed,
        matches,
        player1_wins,
        player2_wins,
        draws,
        knockouts,
        mean_spins: total_spins as f64 / f64::from(matches.max(1)),
        outcome_counts: Outcome::ALL
            .iter()
            .map(|outcome| OutcomeCount {
                outcome: *outcome,
                count: counts.get(outcome).copied().unwrap_or(0),
            })
            .collect(),
        records,
    }
}

/// Share of matches won by `player`, in `0.0..=1.0`.
pub fn win_rate(summary: &SimSummary, player: PlayerId) -> f64 {
    let wins = match player {
        PlayerId::One => summary.player1_wins,
        PlayerId::Two => summary.player2_wins,
    };
    f64::from(wins) / f64::from(summary.matches.max(1))
}
