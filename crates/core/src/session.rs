use crate::{
    Event, EventBus, IgnoreReason, MatchResult, MatchState, Outcome, OutcomeSelector,
    OutcomeSource, PlayerId, SessionConfig,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// A drawn outcome waiting for the wheel to stop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PendingSpin {
    pub player: PlayerId,
    pub outcome: Outcome,
    pub ready_at: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinRequest {
    Accepted(PendingSpin),
    Ignored(IgnoreReason),
}

impl SpinRequest {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SpinRequest::Accepted(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinCommit {
    pub player: PlayerId,
    pub outcome: Outcome,
    pub state: MatchState,
    pub result: Option<MatchResult>,
}

/// Owns one match and holds at most one spin in flight.
///
/// Time is supplied by the caller as elapsed time since some fixed start, so
/// the session never sleeps or reads a clock itself.
#[derive(Debug)]
pub struct MatchSession<S = OutcomeSelector> {
    state: MatchState,
    source: S,
    pending: Option<PendingSpin>,
    spin_delay: Duration,
    matches_started: u32,
}

impl MatchSession<OutcomeSelector> {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(OutcomeSelector::reference(config.seed), config.spin_delay())
    }
}

impl<S: OutcomeSource> MatchSession<S> {
    pub fn new(source: S, spin_delay: Duration) -> Self {
        Self {
            state: MatchState::reset(),
            source,
            pending: None,
            spin_delay,
            matches_started: 1,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingSpin> {
        self.pending.as_ref()
    }

    pub fn is_spinning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.state.result()
    }

    pub fn spin_delay(&self) -> Duration {
        self.spin_delay
    }

    pub fn matches_started(&self) -> u32 {
        self.matches_started
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether a spin request right now would be accepted.
    pub fn can_spin(&self) -> bool {
        self.pending.is_none() && !self.state.is_finished()
    }

    pub fn time_remaining(&self, now: Duration) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.ready_at.saturating_sub(now))
    }

    /// Announces the current match. Front ends call this once on load.
    pub fn start(&mut self, events: &mut EventBus) {
        events.push(Event::MatchStarted {
            seed: self.source.seed(),
        });
    }

    /// Drops any spin in flight and begins a fresh match.
    pub fn reset(&mut self, events: &mut EventBus) {
        if let Some(pending) = self.pending.take() {
            debug!(outcome = ?pending.outcome, "discarding pending spin on reset");
        }
        self.state = MatchState::reset();
        self.matches_started += 1;
        self.start(events);
    }

    pub fn request_spin(&mut self, now: Duration, events: &mut EventBus) -> SpinRequest {
        let reason = if self.pending.is_some() {
            Some(IgnoreReason::InFlight)
        } else if self.state.is_finished() {
            Some(IgnoreReason::Finished)
        } else {
            None
        };
        if let Some(reason) = reason {
            debug!(?reason, "spin request ignored");
            events.push(Event::SpinIgnored { reason });
            return SpinRequest::Ignored(reason);
        }
        let outcome = self.source.draw();
        let pending = PendingSpin {
            player: self.state.active_player,
            outcome,
            ready_at: now + self.spin_delay,
        };
        debug!(player = %pending.player, ?outcome, "spin started");
        events.push(Event::SpinStarted {
            player: pending.player,
            outcome,
            wheel_angle: outcome.wheel_angle(),
        });
        self.pending = Some(pending);
        SpinRequest::Accepted(pending)
    }

    /// Applies the pending spin once its delay has elapsed.
    pub fn poll(&mut self, now: Duration, events: &mut EventBus) -> Option<SpinCommit> {
        match self.pending {
            Some(pending) if now >= pending.ready_at => self.commit_now(events),
            _ => None,
        }
    }

    /// Applies the pending spin regardless of the delay.
    pub fn commit_now(&mut self, events: &mut EventBus) -> Option<SpinCommit> {
        let pending = self.pending.take()?;
        self.state = self.state.apply_outcome(pending.outcome);
        let batter = self.state.player(pending.player);
        events.push(Event::OutcomeApplied {
            player: pending.player,
            outcome: pending.outcome,
            score: batter.score,
            wickets: batter.wickets,
            spin: self.state.spin_count,
        });
        let result = self.state.result();
        match result {
            Some(result) => {
                info!(spins = self.state.spin_count, %result, "match finished");
                events.push(Event::MatchFinished { result });
            }
            None => events.push(Event::TurnChanged {
                player: self.state.active_player,
            }),
        }
        Some(SpinCommit {
            player: pending.player,
            outcome: pending.outcome,
            state: self.state,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Phase, ScriptedOutcomes, WinMargin};

    const DELAY: Duration = Duration::from_millis(7000);

    fn scripted(outcomes: Vec<Outcome>) -> MatchSession<ScriptedOutcomes> {
        MatchSession::new(ScriptedOutcomes::new(outcomes).expect("script"), DELAY)
    }

    fn secs(value: u64) -> Duration {
        Duration::from_secs(value)
    }

    #[test]
    fn result_waits_for_the_delay() {
        let mut session = scripted(vec![Outcome::Run4]);
        let mut events = EventBus::default();
        let request = session.request_spin(secs(1), &mut events);
        assert!(request.is_accepted());
        assert!(session.is_spinning());
        assert_eq!(session.time_remaining(secs(3)), Some(secs(5)));
        assert!(session.poll(secs(7), &mut events).is_none());
        assert_eq!(session.state().spin_count, 0);
        let commit = session.poll(secs(8), &mut events).expect("commit");
        assert_eq!(commit.outcome, Outcome::Run4);
        assert_eq!(commit.player, PlayerId::One);
        assert_eq!(session.state().player1.score, 4);
        assert_eq!(session.state().active_player, PlayerId::Two);
        assert!(!session.is_spinning());
    }

    #[test]
    fn second_request_while_spinning_is_ignored() {
        let mut session = scripted(vec![Outcome::Run1, Outcome::Run6]);
        let mut events = EventBus::default();
        session.request_spin(secs(0), &mut events);
        let before = *session.state();
        let pending_before = session.pending().copied();
        let second = session.request_spin(secs(2), &mut events);
        assert_eq!(second, SpinRequest::Ignored(IgnoreReason::InFlight));
        assert_eq!(*session.state(), before);
        assert_eq!(session.pending().copied(), pending_before);
        assert_eq!(session.source().drawn(), 1);
    }

    #[test]
    fn finished_match_ignores_spins() {
        let mut session = MatchSession::new(
            ScriptedOutcomes::new(vec![Outcome::Bowled, Outcome::Run2]).expect("script"),
            Duration::ZERO,
        );
        let mut events = EventBus::default();
        for _ in 0..3 {
            session.request_spin(Duration::ZERO, &mut events);
            session.poll(Duration::ZERO, &mut events);
        }
        assert_eq!(session.state().phase, Phase::Finished);
        assert!(!session.can_spin());
        assert_eq!(
            session.request_spin(Duration::ZERO, &mut events),
            SpinRequest::Ignored(IgnoreReason::Finished)
        );
        assert_eq!(
            session.result(),
            Some(MatchResult::Win {
                winner: PlayerId::Two,
                margin: WinMargin::Knockout
            })
        );
    }

    #[test]
    fn reset_discards_pending_spin() {
        let mut session = scripted(vec![Outcome::Run6]);
        let mut events = EventBus::default();
        session.request_spin(secs(0), &mut events);
        session.reset(&mut events);
        assert!(!session.is_spinning());
        assert!(session.poll(secs(60), &mut events).is_none());
        assert_eq!(*session.state(), MatchState::reset());
        assert_eq!(session.matches_started(), 2);
    }

    #[test]
    fn events_follow_the_spin() {
        let mut session = scripted(vec![Outcome::Caught]);
        let mut events = EventBus::default();
        session.start(&mut events);
        session.request_spin(secs(0), &mut events);
        session.poll(DELAY, &mut events);
        let drained: Vec<Event> = events.drain().collect();
        assert_eq!(
            drained,
            vec![
                Event::MatchStarted { seed: None },
                Event::SpinStarted {
                    player: PlayerId::One,
                    outcome: Outcome::Caught,
                    wheel_angle: 270.0,
                },
                Event::OutcomeApplied {
                    player: PlayerId::One,
                    outcome: Outcome::Caught,
                    score: 0,
                    wickets: 1,
                    spin: 1,
                },
                Event::TurnChanged {
                    player: PlayerId::Two
                },
            ]
        );
        assert!(events.is_empty());
    }

    #[test]
    fn commit_now_skips_the_wait() {
        let mut session = scripted(vec![Outcome::Run2]);
        let mut events = EventBus::default();
        assert!(session.commit_now(&mut events).is_none());
        session.request_spin(secs(0), &mut events);
        let commit = session.commit_now(&mut events).expect("commit");
        assert_eq!(commit.state.player1.score, 2);
        assert!(commit.result.is_none());
    }

    #[test]
    fn seeded_session_reports_seed() {
        let mut session = MatchSession::from_config(&SessionConfig::instant(99));
        let mut events = EventBus::default();
        session.start(&mut events);
        assert_eq!(
            events.drain().next(),
            Some(Event::MatchStarted { seed: Some(99) })
        );
        assert_eq!(session.spin_delay(), Duration::ZERO);
    }
}
