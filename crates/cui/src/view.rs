use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use wicketspin_core::{Cue, PlayerId, KNOCKOUT_WICKETS, MAX_SPINS};

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Min(6),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let players = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(root[1]);
    draw_player(frame, players[0], app, PlayerId::One);
    draw_player(frame, players[1], app, PlayerId::Two);

    draw_wheel(frame, root[2], app);
    draw_events(frame, root[3], app);

    if let Some(text) = app.announcement() {
        draw_game_over(frame, &text);
    }
    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.state();
    let lines = vec![
        Line::from(format!("Wicket Spin | Hint: {}", app.next_hint()).bold()),
        Line::from(format!(
            "Spins {}/{}  ({} left)  Seed {}",
            state.spin_count,
            state.spin_count + state.spins_left(),
            state.spins_left(),
            app.seed
        )),
        Line::from(app.status_line.clone().fg(Color::Cyan)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Match");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_player(frame: &mut Frame, area: Rect, app: &App, player: PlayerId) {
    let stats = app.state().player(player);
    let active = app.is_active(player);
    let wickets_style = if stats.wickets + 1 >= KNOCKOUT_WICKETS {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let lines = vec![
        Line::from(format!("Runs: {}", stats.score)).bold(),
        Line::from(format!("Wickets: {}/{}", stats.wickets, KNOCKOUT_WICKETS)).style(wickets_style),
        Line::from(if active { "> batting" } else { "" }),
    ];
    let mut block = Block::default()
        .title(player.to_string())
        .borders(Borders::ALL);
    if active {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn draw_wheel(frame: &mut Frame, area: Rect, app: &App) {
    let color = match app.last_cue {
        Some(Cue::Wicket) => Color::Red,
        Some(Cue::Boundary) => Color::Green,
        Some(Cue::GameOver) => Color::Magenta,
        Some(Cue::Spin) | None => Color::Blue,
    };
    let ratio = app.spin_progress().unwrap_or(0.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Wheel"))
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(app.result_line.clone());
    frame.render_widget(gauge, area);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .event_log
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Events"));
    frame.render_widget(list, area);
}

fn draw_game_over(frame: &mut Frame, text: &str) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("Game Over!".bold()),
        Line::from(""),
        Line::from(text.to_string()),
        Line::from(""),
        Line::from("r play again | q quit"),
    ];
    let block = Block::default()
        .title("Result")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("Space/Enter spin the wheel"),
        Line::from("r restart the match"),
        Line::from("? toggle help | Esc close | q quit"),
        Line::from(""),
        Line::from(format!(
            "{KNOCKOUT_WICKETS} wickets knock a player out; otherwise most runs after {MAX_SPINS} spins wins"
        )),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
