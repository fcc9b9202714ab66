use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use wicketspin_core::{
    Event, EventBus, MatchSession, MatchState, Phase, PlayerId, SessionConfig, SpinRequest,
    DEFAULT_SEED, MAX_SPINS,
};
use wicketspin_sim::{simulate, write_json, write_text, SimConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CliOptions {
    cui: bool,
    instant: bool,
    seed: Option<u64>,
    simulate: Option<u32>,
    trace: Option<PathBuf>,
    text_report: bool,
}

impl CliOptions {
    fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    fn session_config(&self) -> SessionConfig {
        if self.instant {
            SessionConfig::instant(self.seed())
        } else {
            SessionConfig::with_seed(self.seed())
        }
    }
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions {
        seed: std::env::var("WICKETSPIN_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok()),
        ..CliOptions::default()
    };
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--cui" => options.cui = true,
            "--instant" => options.instant = true,
            "--text" => options.text_report = true,
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--simulate" => {
                if let Some(value) = args.get(idx + 1) {
                    options.simulate = value.parse::<u32>().ok();
                    idx += 1;
                }
            }
            "--trace" => {
                if let Some(value) = args.get(idx + 1) {
                    options.trace = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    options
}

/// The terminal UI owns the screen, so only the plain modes log to stderr.
fn installs_log_subscriber(options: &CliOptions) -> bool {
    !options.cui
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if installs_log_subscriber(&options) {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(io::stderr)
            .init();
    }
    let outcome = if options.cui {
        let launch = wicketspin_cui::LaunchOptions {
            seed: options.seed,
            instant: options.instant,
        };
        wicketspin_cui::run(launch).context("cui launch")
    } else if let Some(matches) = options.simulate {
        run_simulation(&options, matches)
    } else {
        run_line_mode(&options)
    };
    if let Err(err) = outcome {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run_simulation(options: &CliOptions, matches: u32) -> Result<()> {
    let config = SimConfig {
        seed: options.seed(),
        matches,
        record_traces: options.trace.is_some(),
    };
    let summary = simulate(&config).context("run simulation")?;
    if let Some(path) = options.trace.as_ref() {
        if options.text_report {
            write_text(path, &summary)
        } else {
            write_json(path, &summary)
        }
        .with_context(|| format!("write trace to {}", path.display()))?;
    }
    if options.text_report {
        println!("{}", summary.to_text_report());
    } else {
        let mut compact = summary.clone();
        compact.records.clear();
        println!(
            "{}",
            serde_json::to_string_pretty(&compact).context("encode summary")?
        );
    }
    Ok(())
}

fn run_line_mode(options: &CliOptions) -> Result<()> {
    let mut session = MatchSession::from_config(&options.session_config());
    let mut events = EventBus::default();
    let started = Instant::now();
    session.start(&mut events);
    println!("Wicket Spin: Enter spin | r restart | q quit");
    drain_events(&mut events);
    print_state(session.state());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", prompt_text(session.state()));
        io::stdout().flush().context("flush prompt")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read command")?;
        match parse_command(&line) {
            Command::Spin => {
                let request = session.request_spin(started.elapsed(), &mut events);
                drain_events(&mut events);
                if let SpinRequest::Accepted(_) = request {
                    println!("Spinning...");
                    if let Some(wait) = session.time_remaining(started.elapsed()) {
                        std::thread::sleep(wait);
                    }
                    session.poll(started.elapsed(), &mut events);
                    drain_events(&mut events);
                    print_state(session.state());
                } else if session.state().is_finished() {
                    println!("The match is over. Type r to play again.");
                }
            }
            Command::Restart => {
                session.reset(&mut events);
                drain_events(&mut events);
                print_state(session.state());
            }
            Command::Status => print_state(session.state()),
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Unknown(word) => println!("unknown command: {word} (try help)"),
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Spin,
    Restart,
    Status,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "spin" => Command::Spin,
        "r" | "restart" | "reset" => Command::Restart,
        "st" | "status" => Command::Status,
        "h" | "?" | "help" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

fn prompt_text(state: &MatchState) -> String {
    match state.phase {
        Phase::InProgress => format!("P{}", state.active_player.number()),
        Phase::Finished => "over".to_string(),
    }
}

fn print_help() {
    println!("Enter or spin   spin the wheel");
    println!("r / restart     start a new match");
    println!("status          show the scoreboard");
    println!("q / quit        leave");
}

fn scoreboard(state: &MatchState) -> Vec<String> {
    let mut lines = Vec::new();
    for player in [PlayerId::One, PlayerId::Two] {
        let stats = state.player(player);
        let marker = if state.phase == Phase::InProgress && state.active_player == player {
            '*'
        } else {
            ' '
        };
        lines.push(format!(
            "{marker} {player}: {} runs, {} wickets",
            stats.score, stats.wickets
        ));
    }
    lines.push(format!("  spins {}/{MAX_SPINS}", state.spin_count));
    lines
}

fn print_state(state: &MatchState) {
    for line in scoreboard(state) {
        println!("{line}");
    }
    match state.result() {
        Some(result) => println!("Game Over! {}", result.announcement()),
        None => println!("{}'s Turn", state.active_player),
    }
}

fn drain_events(events: &mut EventBus) {
    for event in events.drain() {
        if let Event::OutcomeApplied { outcome, .. } = event {
            println!("Result: {outcome}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wicketspin_core::Outcome;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_simulation_flags() {
        let options = parse_cli_options(&args(&[
            "--simulate",
            "250",
            "--seed",
            "9",
            "--trace",
            "out/trace.json",
            "--text",
        ]));
        assert_eq!(options.simulate, Some(250));
        assert_eq!(options.seed, Some(9));
        assert_eq!(options.trace, Some(PathBuf::from("out/trace.json")));
        assert!(options.text_report);
        assert!(!options.cui);
    }

    #[test]
    fn instant_flag_drops_the_delay() {
        let options = parse_cli_options(&args(&["--instant", "--seed", "1"]));
        assert_eq!(options.session_config().spin_delay(), Duration::ZERO);
        let options = parse_cli_options(&args(&["--cui"]));
        assert!(options.cui);
        assert_eq!(
            options.session_config().spin_delay(),
            wicketspin_core::SPIN_DELAY
        );
    }

    #[test]
    fn terminal_ui_runs_without_stderr_logging() {
        assert!(!installs_log_subscriber(&parse_cli_options(&args(&["--cui"]))));
        assert!(!installs_log_subscriber(&parse_cli_options(&args(&[
            "--cui",
            "--simulate",
            "10"
        ]))));
        assert!(installs_log_subscriber(&parse_cli_options(&args(&[
            "--simulate",
            "10"
        ]))));
        assert!(installs_log_subscriber(&parse_cli_options(&args(&[]))));
    }

    #[test]
    fn commands_accept_short_forms() {
        assert_eq!(parse_command(""), Command::Spin);
        assert_eq!(parse_command(" SPIN "), Command::Spin);
        assert_eq!(parse_command("r"), Command::Restart);
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command("bat"), Command::Unknown("bat".to_string()));
    }

    #[test]
    fn scoreboard_marks_the_batter() {
        let state = MatchState::reset().apply_outcome(Outcome::Run6);
        let lines = scoreboard(&state);
        assert_eq!(lines[0], "  Player 1: 6 runs, 0 wickets");
        assert_eq!(lines[1], "* Player 2: 0 runs, 0 wickets");
        assert_eq!(lines[2], "  spins 1/12");
        assert_eq!(prompt_text(&state), "P2");
    }
}
