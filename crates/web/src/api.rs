use serde::{Deserialize, Serialize};
use std::time::Duration;
use wicketspin_core::{
    Event, EventBus, MatchSession, Outcome, Phase, PlayerState, SessionConfig, SpinRequest,
    MAX_SPINS,
};

pub struct AppState {
    pub session: MatchSession,
    pub events: EventBus,
}

impl AppState {
    pub fn new(config: &SessionConfig) -> Self {
        let mut session = MatchSession::from_config(config);
        let mut events = EventBus::default();
        session.start(&mut events);
        Self { session, events }
    }
}

#[derive(Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    pub error: Option<String>,
    pub state: UiState,
    pub events: Vec<Event>,
}

#[derive(Serialize)]
pub struct UiState {
    pub player1: PlayerState,
    pub player2: PlayerState,
    pub active_player: u8,
    pub spin_count: u32,
    pub spins_left: u32,
    pub max_spins: u32,
    pub phase: Phase,
    pub spinning: bool,
    pub can_spin: bool,
    pub pending: Option<UiPendingSpin>,
    pub status: String,
    pub last_result: Option<String>,
    pub announcement: Option<String>,
}

#[derive(Serialize)]
pub struct UiPendingSpin {
    pub outcome: Outcome,
    pub label: &'static str,
    pub wheel_angle: f64,
    pub remaining_ms: u64,
}

#[derive(Deserialize)]
pub struct ActionRequest {
    pub action: String,
}

/// Commits any spin whose delay has run out before the state is read.
pub fn poll(state: &mut AppState, now: Duration) {
    state.session.poll(now, &mut state.events);
}

pub fn apply_action(state: &mut AppState, req: ActionRequest, now: Duration) -> Option<String> {
    match req.action.as_str() {
        "spin" => {
            // Ignored spins are not errors; the page just keeps waiting.
            if let SpinRequest::Accepted(pending) =
                state.session.request_spin(now, &mut state.events)
            {
                tracing::debug!(outcome = ?pending.outcome, "spin accepted");
            }
            None
        }
        "reset" | "restart" => {
            state.session.reset(&mut state.events);
            None
        }
        _ => Some("unknown action".to_string()),
    }
}

pub fn parse_action(body: &str) -> Result<ActionRequest, String> {
    serde_json::from_str(body).map_err(|err| format!("invalid request: {err}"))
}

pub fn build_response(state: &mut AppState, err: Option<String>, now: Duration) -> ApiResponse {
    let events: Vec<_> = state.events.drain().collect();
    ApiResponse {
        ok: err.is_none(),
        error: err,
        state: snapshot_state(&state.session, &events, now),
        events,
    }
}

fn snapshot_state(session: &MatchSession, events: &[Event], now: Duration) -> UiState {
    let match_state = session.state();
    let pending = session.pending().map(|pending| UiPendingSpin {
        outcome: pending.outcome,
        label: pending.outcome.label(),
        wheel_angle: pending.outcome.wheel_angle(),
        remaining_ms: pending.ready_at.saturating_sub(now).as_millis() as u64,
    });
    let last_result = events.iter().rev().find_map(|event| match event {
        Event::OutcomeApplied { outcome, .. } => Some(format!("Result: {outcome}")),
        _ => None,
    });
    let status = match match_state.phase {
        Phase::InProgress => format!("{}'s Turn", match_state.active_player),
        Phase::Finished => "Game Over".to_string(),
    };
    UiState {
        player1: match_state.player1,
        player2: match_state.player2,
        active_player: match_state.active_player.number(),
        spin_count: match_state.spin_count,
        spins_left: match_state.spins_left(),
        max_spins: MAX_SPINS,
        phase: match_state.phase,
        spinning: session.is_spinning(),
        can_spin: session.can_spin(),
        pending,
        status,
        last_result,
        announcement: session.result().map(|result| result.announcement()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicketspin_core::SPIN_DELAY;

    fn app() -> AppState {
        AppState::new(&SessionConfig::with_seed(8))
    }

    fn spin() -> ActionRequest {
        ActionRequest {
            action: "spin".to_string(),
        }
    }

    #[test]
    fn initial_response_reports_fresh_match() {
        let mut state = app();
        let response = build_response(&mut state, None, Duration::ZERO);
        assert!(response.ok);
        assert_eq!(response.state.active_player, 1);
        assert_eq!(response.state.spins_left, MAX_SPINS);
        assert_eq!(response.state.status, "Player 1's Turn");
        assert!(response.state.can_spin);
        assert_eq!(response.events, vec![Event::MatchStarted { seed: Some(8) }]);
    }

    #[test]
    fn spin_exposes_pending_angle_then_commits() {
        let mut state = app();
        assert!(apply_action(&mut state, spin(), Duration::ZERO).is_none());
        let response = build_response(&mut state, None, Duration::from_secs(2));
        let pending = response.state.pending.expect("pending spin");
        assert_eq!(pending.remaining_ms, 5000);
        assert_eq!(pending.wheel_angle, pending.outcome.wheel_angle());
        assert!(response.state.spinning);
        assert!(!response.state.can_spin);

        poll(&mut state, SPIN_DELAY);
        let response = build_response(&mut state, None, SPIN_DELAY);
        assert!(response.state.pending.is_none());
        assert_eq!(response.state.spin_count, 1);
        assert!(response
            .state
            .last_result
            .expect("result line")
            .starts_with("Result: "));
    }

    #[test]
    fn repeated_spin_is_silently_ignored() {
        let mut state = app();
        apply_action(&mut state, spin(), Duration::ZERO);
        assert!(apply_action(&mut state, spin(), Duration::from_millis(5)).is_none());
        poll(&mut state, SPIN_DELAY * 3);
        assert_eq!(state.session.state().spin_count, 1);
    }

    #[test]
    fn unknown_action_and_bad_body_are_reported() {
        let mut state = app();
        let req = ActionRequest {
            action: "bowl".to_string(),
        };
        assert_eq!(
            apply_action(&mut state, req, Duration::ZERO),
            Some("unknown action".to_string())
        );
        assert!(parse_action("{not json").is_err());
        assert_eq!(parse_action(r#"{"action":"reset"}"#).map(|r| r.action), Ok("reset".to_string()));
    }

    #[test]
    fn snapshot_serializes() {
        let mut state = app();
        apply_action(&mut state, spin(), Duration::ZERO);
        let response = build_response(&mut state, None, Duration::ZERO);
        let body = serde_json::to_value(&response).expect("json");
        assert_eq!(body["state"]["phase"], "InProgress");
        assert_eq!(body["state"]["spinning"], true);
        assert!(body["state"]["pending"]["wheel_angle"].is_number());
    }
}
