use crate::SimError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use wicketspin_core::{MatchResult, Outcome, PlayerId, PlayerState};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepRecord {
    pub spin: u32,
    pub player: PlayerId,
    pub outcome: Outcome,
    pub player1: PlayerState,
    pub player2: PlayerState,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    pub index: u32,
    pub result: MatchResult,
    pub spins: u32,
    pub player1: PlayerState,
    pub player2: PlayerState,
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeCount {
    pub outcome: Outcome,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimSummary {
    pub seed: u64,
    pub matches: u32,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub draws: u32,
    pub knockouts: u32,
    pub mean_spins: f64,
    pub outcome_counts: Vec<OutcomeCount>,
    pub records: Vec<MatchRecord>,
}

impl SimSummary {
    pub fn total_spins(&self) -> u64 {
        self.outcome_counts.iter().map(|item| item.count).sum()
    }

    pub fn count_of(&self, outcome: Outcome) -> u64 {
        self.outcome_counts
            .iter()
            .find(|item| item.outcome == outcome)
            .map(|item| item.count)
            .unwrap_or(0)
    }

    pub fn to_text_report(&self) -> String {
        let mut lines = vec![
            format!("seed: {}", self.seed),
            format!("matches: {}", self.matches),
            format!(
                "player 1 wins: {}  player 2 wins: {}  draws: {}",
                self.player1_wins, self.player2_wins, self.draws
            ),
            format!("knockouts: {}", self.knockouts),
            format!("mean spins per match: {:.2}", self.mean_spins),
            String::new(),
            "outcomes:".to_string(),
        ];
        let total = self.total_spins().max(1) as f64;
        for item in &self.outcome_counts {
            lines.push(format!(
                "  {:>7} {:>8} ({:>5.1}%)",
                item.outcome.label(),
                item.count,
                item.count as f64 * 100.0 / total
            ));
        }
        for record in self.records.iter().filter(|record| !record.steps.is_empty()) {
            lines.push(String::new());
            lines.push(format!("match {}: {}", record.index, record.result));
            for step in &record.steps {
                lines.push(format!(
                    "  spin {:>2} | {} | {:>7} | {}/{} - {}/{}",
                    step.spin,
                    step.player,
                    step.outcome.label(),
                    step.player1.score,
                    step.player1.wickets,
                    step.player2.score,
                    step.player2.wickets
                ));
            }
        }
        lines.join("\n")
    }
}

pub fn write_json(path: &Path, summary: &SimSummary) -> Result<(), SimError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(summary)?;
    fs::write(path, body)?;
    Ok(())
}

pub fn write_text(path: &Path, summary: &SimSummary) -> Result<(), SimError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, summary.to_text_report())?;
    Ok(())
}
