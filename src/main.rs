use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::debug;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{self, stdout, Stdout},
    time::{Duration, Instant},
};

use blockfall::game::{
    self, Cell, Command, Config, GameEvent, GameState, PieceKind, Session, DEFAULT_COLS,
    DEFAULT_FALL_DELAY, DEFAULT_ROWS,
};

// ============================================================================
// Command Line
// ============================================================================

/// Falling-block puzzle game for the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Board height in cells.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,
    /// Board width in cells.
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,
    /// Ticks per one-row drop at the start of a game.
    #[arg(long, default_value_t = DEFAULT_FALL_DELAY)]
    fall_delay: u32,
    /// Milliseconds between ticks.
    #[arg(long, default_value_t = 300)]
    tick_ms: u64,
    /// Seed for a reproducible piece sequence.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            rows: self.rows,
            cols: self.cols,
            fall_delay: self.fall_delay,
            seed: self.seed,
        }
    }
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";
const EMPTY_COLOR: Color = Color::Blue;

const BONUS_MESSAGE: &str = "Bonus mode: next piece preview, speed rises with score";

fn palette_color(color: game::Color) -> Color {
    match color {
        game::Color::Red => Color::Red,
        game::Color::Yellow => Color::Yellow,
        game::Color::Magenta => Color::Magenta,
        game::Color::Pink => Color::Rgb(255, 192, 203),
        game::Color::Cyan => Color::Cyan,
        game::Color::Green => Color::Green,
        game::Color::Orange => Color::Rgb(255, 165, 0),
    }
}

// ============================================================================
// Rendering
// ============================================================================

struct View<'a> {
    session: &'a Session,
    message: Option<&'static str>,
}

fn render(frame: &mut Frame, view: &View) {
    let session = view.session;
    let area = frame.size();

    let rows = session.board().rows() as u16;
    let cols = session.board().cols() as u16;
    let grid_display_width = cols * CELL_WIDTH + 2;
    let grid_display_height = rows + 2;
    let side_width = 16;
    let total_width = grid_display_width + side_width + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(side_width),
    ])
    .split(vertical[0]);

    let side = Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).split(horizontal[1]);

    render_grid(frame, session, horizontal[0]);
    render_info(frame, session, side[0]);
    if session.bonus_mode() {
        render_preview(frame, session, side[1]);
    }

    let hint = view
        .message
        .unwrap_or("←→: Move | ↓: Drop | ↑: Rotate | Space: Hard drop | P B R | Q: Quit");
    let controls = Paragraph::new(vec![Line::from(hint)])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(controls, vertical[1]);

    match session.state() {
        GameState::Playing => {}
        GameState::Paused => render_banner(frame, horizontal[0], "Paused", Color::White),
        GameState::GameOver => render_banner(frame, horizontal[0], "Game Over!", Color::Yellow),
    }
}

fn render_grid(frame: &mut Frame, session: &Session, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Score: {} ", session.score()))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = session
        .render_grid()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => Span::styled(EMPTY_CHAR, Style::default().bg(EMPTY_COLOR)),
                    Cell::Locked(color) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(palette_color(*color)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, session: &Session, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let mode = if session.bonus_mode() { "Bonus" } else { "Normal" };
    let lines = vec![
        Line::from(format!("Score: {}", session.score())),
        Line::from(format!("Delay: {}", session.fall_delay())),
        Line::from(format!("Mode:  {}", mode)),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_preview(frame: &mut Frame, session: &Session, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(kind) = session.next_piece() else {
        return;
    };

    frame.render_widget(Paragraph::new(preview_lines(kind)), inner);
}

fn preview_lines(kind: PieceKind) -> Vec<Line<'static>> {
    let shape = kind.shape();
    let color = palette_color(kind.color());

    (0..shape.rows())
        .map(|row| {
            let mut spans = vec![Span::raw(" ")];
            for col in 0..shape.cols() {
                if shape.is_filled(row, col) {
                    spans.push(Span::styled(BLOCK_CHAR, Style::default().fg(color)));
                } else {
                    spans.push(Span::raw(EMPTY_CHAR));
                }
            }
            Line::from(spans)
        })
        .collect()
}

fn render_banner(frame: &mut Frame, grid_area: Rect, text: &str, color: Color) {
    let banner = centered_rect(grid_area.width.saturating_sub(2), 3, grid_area);
    frame.render_widget(Clear, banner);
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(text.to_string())])
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).bg(Color::Black));
    frame.render_widget(paragraph, banner);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Input
// ============================================================================

enum Input {
    Quit,
    Command(Command),
}

fn map_key(code: KeyCode) -> Option<Input> {
    let command = match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Input::Quit),
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Down => Command::SoftDrop,
        KeyCode::Up => Command::Rotate,
        KeyCode::Char(' ') => Command::HardDrop,
        KeyCode::Char('p') | KeyCode::Char('P') => Command::TogglePause,
        KeyCode::Char('b') | KeyCode::Char('B') => Command::ActivateBonusMode,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        _ => return None,
    };
    Some(Input::Command(command))
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, args: &Args) -> Result<()> {
    let mut session = Session::new(args.config()).context("invalid game configuration")?;
    let tick_duration = Duration::from_millis(args.tick_ms);
    let mut last_tick = Instant::now();
    let mut message = None;

    loop {
        terminal.draw(|frame| {
            render(
                frame,
                &View {
                    session: &session,
                    message,
                },
            )
        })?;

        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match map_key(key.code) {
                        Some(Input::Quit) => break,
                        Some(Input::Command(command)) => session.apply(command),
                        None => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_duration {
            session.apply(Command::Tick);
            last_tick = Instant::now();
        }

        for event in session.take_events() {
            debug!("{:?}", event);
            match event {
                GameEvent::BonusModeActivated => message = Some(BONUS_MESSAGE),
                GameEvent::GameRestarted => message = None,
                _ => {}
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Reject a bad configuration before touching the terminal.
    args.config().validate()?;

    enable_raw_mode().context("failed to enable raw mode")?;
    stdout()
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, &args);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}
