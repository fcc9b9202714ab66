use std::collections::VecDeque;
use std::time::{Duration, Instant};
use wicketspin_core::{
    Cue, Event, EventBus, MatchSession, MatchState, Phase, PlayerId, SessionConfig,
    SpinRequest,
};

const MAX_EVENT_LOG: usize = 200;

pub struct App {
    pub seed: u64,
    pub session: MatchSession,
    pub events: EventBus,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub result_line: String,
    pub last_cue: Option<Cue>,
    pub show_help: bool,
    pub should_quit: bool,
    started: Instant,
}

impl App {
    pub fn new(config: SessionConfig) -> Self {
        let mut app = Self {
            seed: config.seed,
            session: MatchSession::from_config(&config),
            events: EventBus::default(),
            event_log: VecDeque::new(),
            status_line: String::new(),
            result_line: String::new(),
            last_cue: None,
            show_help: false,
            should_quit: false,
            started: Instant::now(),
        };
        app.session.start(&mut app.events);
        app.refresh_lines();
        app.flush_events();
        app
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn state(&self) -> &MatchState {
        self.session.state()
    }

    pub fn on_tick(&mut self) {
        let now = self.elapsed();
        self.tick_at(now);
    }

    pub fn tick_at(&mut self, now: Duration) {
        if self.session.poll(now, &mut self.events).is_some() {
            self.refresh_lines();
        }
        self.flush_events();
    }

    pub fn spin(&mut self) {
        let now = self.elapsed();
        self.spin_at(now);
    }

    /// Stray presses while spinning or after the match are swallowed.
    pub fn spin_at(&mut self, now: Duration) {
        if let SpinRequest::Accepted(_) = self.session.request_spin(now, &mut self.events) {
            self.result_line = "Spinning...".to_string();
        }
        self.flush_events();
    }

    pub fn restart(&mut self) {
        self.session.reset(&mut self.events);
        self.last_cue = None;
        self.refresh_lines();
        self.flush_events();
    }

    /// Fraction of the current spin's delay already elapsed.
    pub fn spin_progress(&self) -> Option<f64> {
        self.spin_progress_at(self.elapsed())
    }

    pub fn spin_progress_at(&self, now: Duration) -> Option<f64> {
        let remaining = self.session.time_remaining(now)?;
        let delay = self.session.spin_delay();
        if delay.is_zero() {
            return Some(1.0);
        }
        Some(1.0 - remaining.as_secs_f64() / delay.as_secs_f64())
    }

    pub fn is_active(&self, player: PlayerId) -> bool {
        let state = self.state();
        state.phase == Phase::InProgress && state.active_player == player
    }

    pub fn announcement(&self) -> Option<String> {
        self.session.result().map(|result| result.announcement())
    }

    pub fn next_hint(&self) -> &'static str {
        if self.session.is_spinning() {
            "wait for the wheel"
        } else if self.state().is_finished() {
            "r to play again"
        } else {
            "space to spin"
        }
    }

    fn refresh_lines(&mut self) {
        let state = *self.session.state();
        match state.phase {
            Phase::InProgress => {
                self.status_line = format!("{}'s Turn", state.active_player);
                if state.spin_count == 0 {
                    self.result_line = "Press Space to Start!".to_string();
                }
            }
            Phase::Finished => self.status_line = "Game Over".to_string(),
        }
    }

    pub fn flush_events(&mut self) {
        let drained: Vec<Event> = self.events.drain().collect();
        for event in drained {
            if let Some(cue) = event.cue() {
                self.last_cue = Some(cue);
            }
            if let Event::OutcomeApplied { outcome, .. } = &event {
                self.result_line = format!("Result: {outcome}");
            }
            if let Some(line) = format_event(&event) {
                self.push_event_line(line);
            }
        }
    }

    pub fn push_event_line(&mut self, line: String) {
        self.event_log.push_back(line);
        while self.event_log.len() > MAX_EVENT_LOG {
            self.event_log.pop_front();
        }
    }
}

fn format_event(event: &Event) -> Option<String> {
    let line = match event {
        Event::MatchStarted { seed: Some(seed) } => format!("match started (seed {seed})"),
        Event::MatchStarted { seed: None } => "match started".to_string(),
        Event::SpinStarted { player, .. } => format!("{player} spins"),
        Event::SpinIgnored { .. } => return None,
        Event::OutcomeApplied {
            player,
            outcome,
            score,
            wickets,
            spin,
        } => format!(
            "spin {spin}: {player} {} -> {score}/{wickets}",
            outcome.label()
        ),
        Event::TurnChanged { player } => format!("{player}'s turn"),
        Event::MatchFinished { result } => format!("match over: {result}"),
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicketspin_core::SPIN_DELAY;

    fn app() -> App {
        App::new(SessionConfig::with_seed(1))
    }

    #[test]
    fn fresh_app_prompts_player_one() {
        let app = app();
        assert_eq!(app.status_line, "Player 1's Turn");
        assert_eq!(app.result_line, "Press Space to Start!");
        assert!(app.is_active(PlayerId::One));
        assert!(app.event_log.iter().any(|line| line.contains("seed 1")));
    }

    #[test]
    fn spin_resolves_after_delay() {
        let mut app = app();
        app.spin_at(Duration::ZERO);
        assert_eq!(app.result_line, "Spinning...");
        assert_eq!(app.spin_progress_at(SPIN_DELAY / 2), Some(0.5));
        app.tick_at(SPIN_DELAY / 2);
        assert_eq!(app.state().spin_count, 0);
        app.tick_at(SPIN_DELAY);
        assert_eq!(app.state().spin_count, 1);
        assert!(app.result_line.starts_with("Result: "));
        assert!(app.spin_progress_at(SPIN_DELAY).is_none());
    }

    #[test]
    fn double_press_counts_once() {
        let mut app = app();
        app.spin_at(Duration::ZERO);
        app.spin_at(Duration::from_millis(10));
        app.tick_at(SPIN_DELAY * 2);
        assert_eq!(app.state().spin_count, 1);
    }

    #[test]
    fn restart_clears_the_board() {
        let mut app = app();
        app.spin_at(Duration::ZERO);
        app.tick_at(SPIN_DELAY);
        app.restart();
        assert_eq!(*app.state(), MatchState::reset());
        assert_eq!(app.result_line, "Press Space to Start!");
        assert!(app.last_cue.is_none());
    }
}
